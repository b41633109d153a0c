use super::iter::PosIter;
use crate::eight::neighbour4;
use crate::{DiameterError, DiameterResult, Idx2d};
use itertools::{Itertools, MinMaxResult};
use ndarray::{ArrayView, ArrayView2, Dimension, Ix2};
use std::ops::Index;

/// 检查 `ndim` 是否为 2, 否则返回维度错误.
#[inline]
pub(crate) fn expect_2d(ndim: usize) -> DiameterResult<()> {
    if ndim == 2 {
        Ok(())
    } else {
        Err(DiameterError::Dimension {
            expected: 2,
            found: ndim,
        })
    }
}

/// 将任意维度视图转换为二维视图. 如果不是二维的, 则返回维度错误.
pub(crate) fn view_2d<'a, A, D: Dimension>(
    view: ArrayView<'a, A, D>,
) -> DiameterResult<ArrayView2<'a, A>> {
    let found = view.ndim();
    expect_2d(found)?;
    view.into_dimensionality::<Ix2>()
        .map_err(|_| DiameterError::Dimension { expected: 2, found })
}

/// 前景像素在两个基本方向上的外接范围 (闭区间).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Extent {
    /// 行 (高) 方向的最小、最大索引.
    pub h: (usize, usize),

    /// 列 (宽) 方向的最小、最大索引.
    pub w: (usize, usize),
}

impl Extent {
    /// 行方向跨越的像素个数 (前后方向, AP).
    #[inline]
    pub fn height_px(&self) -> usize {
        self.h.1 - self.h.0 + 1
    }

    /// 列方向跨越的像素个数 (左右方向, LAT).
    #[inline]
    pub fn width_px(&self) -> usize {
        self.w.1 - self.w.0 + 1
    }
}

/// 不可变、借用的二维病人掩膜切片. `true` 代表病人 (前景).
#[derive(Copy, Clone, Debug)]
pub struct MaskSlice<'a> {
    /// 底层数据的轻量级视图.
    ///
    /// 这里有意把代码写死为 `ArrayView2<bool>` 降低灵活性, 但使结构的意图更加明确.
    data: ArrayView2<'a, bool>,
}

impl Index<Idx2d> for MaskSlice<'_> {
    type Output = bool;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

impl<'a> From<ArrayView2<'a, bool>> for MaskSlice<'a> {
    #[inline]
    fn from(data: ArrayView2<'a, bool>) -> Self {
        Self { data }
    }
}

impl<'a> MaskSlice<'a> {
    /// 直接初始化.
    #[inline]
    pub fn new(data: ArrayView2<'a, bool>) -> Self {
        Self { data }
    }

    /// 从任意维度的视图构建. 如果 `view` 不是二维的 (例如误传了整个体数据),
    /// 则返回 `Err(DiameterError::Dimension)`.
    #[inline]
    pub fn try_from_view<D: Dimension>(view: ArrayView<'a, bool, D>) -> DiameterResult<Self> {
        Ok(Self::new(view_2d(view)?))
    }

    /// 获得 **底层** 数据的一份不可变 shallow copy.
    #[inline]
    pub fn array_view(&self) -> ArrayView2<'a, bool> {
        self.data
    }

    /// 获取给定位置 (高, 宽) 的像素值. 越界时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx2d) -> Option<&bool> {
        self.data.get(pos)
    }

    /// 图像的分辨率 (高, 宽).
    #[inline]
    pub fn shape(&self) -> Idx2d {
        self.data.dim()
    }

    /// 获得图像的高.
    #[inline]
    pub fn height(&self) -> usize {
        self.shape().0
    }

    /// 获得图像的宽.
    #[inline]
    pub fn width(&self) -> usize {
        self.shape().1
    }

    /// 前景像素个数.
    #[inline]
    pub fn count(&self) -> usize {
        self.data.iter().filter(|p| **p).count()
    }

    /// 以行优先规则, 获取能迭代图像所有索引的迭代器.
    #[inline]
    pub fn pos_iter(&self) -> PosIter {
        PosIter::new(self.shape())
    }

    /// 以行优先规则, 获取能迭代所有前景像素索引的迭代器.
    pub fn foreground_pos(&self) -> impl Iterator<Item = Idx2d> + '_ {
        self.data
            .indexed_iter()
            .filter_map(|(pos, &inside)| inside.then_some(pos))
    }

    /// 判断一个索引是否位于图像的边缘.
    #[inline]
    pub fn is_at_border(&self, (h, w): Idx2d) -> bool {
        h == 0
            || h.saturating_add(1) == self.height()
            || w == 0
            || w.saturating_add(1) == self.width()
    }

    /// 判断 `pos` 的 4-邻域是否含有背景像素. 越界的邻居不计入.
    pub fn is_n4_containing_background(&self, pos: Idx2d) -> bool {
        neighbour4(pos)
            .into_iter()
            .any(|p| matches!(self.get(p), Some(&false)))
    }

    /// 判断 `pos` 是否为前景边缘像素: 它是前景, 且位于图像边缘,
    /// 或者 4-邻域中含有背景.
    #[inline]
    pub fn is_edge(&self, pos: Idx2d) -> bool {
        self[pos] && (self.is_at_border(pos) || self.is_n4_containing_background(pos))
    }

    /// 以行优先规则收集所有前景边缘像素.
    pub fn edge_pos(&self) -> Vec<Idx2d> {
        self.pos_iter().filter(|p| self.is_edge(*p)).collect()
    }

    /// 前景像素在行、列两个方向上的外接范围. 全背景时返回 `None`.
    pub fn extent(&self) -> Option<Extent> {
        fn bounds(r: MinMaxResult<usize>) -> Option<(usize, usize)> {
            match r {
                MinMaxResult::NoElements => None,
                MinMaxResult::OneElement(v) => Some((v, v)),
                MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
            }
        }

        let h = bounds(self.foreground_pos().map(|(h, _)| h).minmax())?;
        let w = bounds(self.foreground_pos().map(|(_, w)| w).minmax())?;
        Some(Extent { h, w })
    }
}

/// 不可变、借用的二维 CT 扫描切片, 像素值为 HU.
#[derive(Copy, Clone, Debug)]
pub struct ScanSlice<'a> {
    /// 底层数据的轻量级视图, 借用于 [`crate::CtSeries`] 或用户数据.
    data: ArrayView2<'a, f32>,
}

impl Index<Idx2d> for ScanSlice<'_> {
    type Output = f32;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

impl<'a> From<ArrayView2<'a, f32>> for ScanSlice<'a> {
    #[inline]
    fn from(data: ArrayView2<'a, f32>) -> Self {
        Self { data }
    }
}

impl<'a> ScanSlice<'a> {
    /// 直接初始化.
    #[inline]
    pub fn new(data: ArrayView2<'a, f32>) -> Self {
        Self { data }
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView2<'a, f32> {
        self.data
    }
}
