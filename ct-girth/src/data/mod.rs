use ndarray::{Array3, ArrayView, Axis, Ix3};

use crate::{DiameterError, DiameterResult, Idx3d};

pub mod slice;
pub mod spacing;

pub use slice::{Extent, MaskSlice, ScanSlice};
pub use spacing::VoxelSpacing;

/// 一个 CT 序列的计算输入: HU 体数据, 与之形状相同的病人掩膜体数据,
/// 以及每个水平切片的体素分辨率.
///
/// 数据按照 `(z, h, w)` 组织, 即第一维为切片索引. HU 值以 `f32` 保存.
/// 该结构只能通过会校验一致性的构造函数创建, 创建后不可修改.
#[derive(Debug, Clone)]
pub struct CtSeries {
    scan: Array3<f32>,
    mask: Array3<bool>,
    spacing: Vec<VoxelSpacing>,
}

/// 将 `(h, w, z)` 排布的数据转换为 `(z, h, w)` 的标准布局.
#[inline]
fn hwz_to_zhw<A: Clone>(data: Array3<A>) -> Array3<A> {
    let data = data.permuted_axes([2, 0, 1]);
    if data.is_standard_layout() {
        data
    } else {
        data.as_standard_layout().to_owned()
    }
}

impl CtSeries {
    /// 以 `(z, h, w)` 排布的 HU 体数据 `scan`, 病人掩膜 `mask` 和每个切片的分辨率
    /// `spacing` 构建.
    ///
    /// # 返回值
    ///
    /// - `scan` 与 `mask` 形状不一致时, 返回 `Err(DiameterError::ShapeMismatch)`;
    /// - `spacing` 的长度不等于切片数时, 返回 `Err(DiameterError::SpacingCount)`;
    /// - 其他情况下成功.
    pub fn new(
        scan: Array3<f32>,
        mask: Array3<bool>,
        spacing: Vec<VoxelSpacing>,
    ) -> DiameterResult<Self> {
        if scan.shape() != mask.shape() {
            return Err(DiameterError::ShapeMismatch {
                image: scan.shape().to_vec(),
                mask: mask.shape().to_vec(),
            });
        }
        let slices = scan.len_of(Axis(0));
        if spacing.len() != slices {
            return Err(DiameterError::SpacingCount {
                spacings: spacing.len(),
                slices,
            });
        }
        Ok(Self {
            scan,
            mask,
            spacing,
        })
    }

    /// 以 `(h, w, z)` (行, 列, 切片) 排布的数据构建. 内部会转换为 `(z, h, w)`.
    ///
    /// 校验规则同 [`CtSeries::new`].
    pub fn from_hwz(
        scan: Array3<f32>,
        mask: Array3<bool>,
        spacing: Vec<VoxelSpacing>,
    ) -> DiameterResult<Self> {
        if scan.shape() != mask.shape() {
            return Err(DiameterError::ShapeMismatch {
                image: scan.shape().to_vec(),
                mask: mask.shape().to_vec(),
            });
        }
        Self::new(hwz_to_zhw(scan), hwz_to_zhw(mask), spacing)
    }

    /// 以 `(z, h, w)` 排布的标签体数据构建, 标签非零处为病人.
    pub fn from_labels(
        scan: Array3<f32>,
        labels: ArrayView<u8, Ix3>,
        spacing: Vec<VoxelSpacing>,
    ) -> DiameterResult<Self> {
        Self::new(scan, labels.mapv(|v| v != 0), spacing)
    }

    /// 获取数据形状 `(z, h, w)`.
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.scan.dim()
    }

    /// 获取水平切片个数.
    #[inline]
    pub fn len_z(&self) -> usize {
        self.shape().0
    }

    /// 序列是否不含任何切片?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len_z() == 0
    }

    /// 获取每个切片的体素分辨率.
    #[inline]
    pub fn spacing(&self) -> &[VoxelSpacing] {
        &self.spacing
    }

    /// 获得 HU 体数据的一份不可变 shallow copy.
    #[inline]
    pub fn scan(&self) -> ArrayView<'_, f32, Ix3> {
        self.scan.view()
    }

    /// 获得掩膜体数据的一份不可变 shallow copy.
    #[inline]
    pub fn mask(&self) -> ArrayView<'_, bool, Ix3> {
        self.mask.view()
    }

    /// 依次获取第 `z_index` 层的扫描切片、掩膜切片和体素分辨率.
    ///
    /// 当 `z_index` 越界时 panic.
    #[inline]
    pub fn slice_at(&self, z_index: usize) -> (ScanSlice<'_>, MaskSlice<'_>, &VoxelSpacing) {
        (
            ScanSlice::new(self.scan.index_axis(Axis(0), z_index)),
            MaskSlice::new(self.mask.index_axis(Axis(0), z_index)),
            &self.spacing[z_index],
        )
    }

    /// 获取能按升序迭代 (扫描, 掩膜, 分辨率) 切片三元组的迭代器.
    pub fn slice_iter(
        &self,
    ) -> impl ExactSizeIterator<Item = (ScanSlice<'_>, MaskSlice<'_>, &VoxelSpacing)> {
        self.scan
            .axis_iter(Axis(0))
            .zip(self.mask.axis_iter(Axis(0)))
            .zip(self.spacing.iter())
            .map(|((scan, mask), spacing)| (ScanSlice::new(scan), MaskSlice::new(mask), spacing))
    }
}
