//! 角度投影宽度分析.
//!
//! 在 `[0, 180)` 度内以固定步长扫描投影方向, 测量病人掩膜在每个方向上的投影宽度,
//! 取其中的最大/最小宽度及其对应角度, 并由二者的几何平均得到等效直径.
//!
//! 目前有两种可以互相替换的实现:
//!
//! 1. [`RadonProjector`]: 对掩膜做 Radon 变换 (正弦图), 由每个投影的非零区间得到宽度;
//! 2. [`HoughProjector`]: 在掩膜边缘像素的 Hough 参数空间中寻找最外侧的两条支撑线.

use crate::consts::WIDTH_TIE_EPS;
use crate::{DiameterError, DiameterResult, MaskSlice, VoxelSpacing};
use ndarray::{ArrayView, Dimension};

#[cfg(feature = "serde")]
use serde::Serialize;

mod hough;
mod radon;
mod sweep;

pub use hough::{HoughProjector, HoughSpace};
pub use radon::{Projection, RadonProjector, Sinogram};
pub use sweep::AngleSweep;

/// 角度投影分析方法.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ProjectionMethod {
    /// 正弦图 (Radon 变换).
    Sinogram,

    /// Hough 直线检测.
    LineDetection,
}

impl ProjectionMethod {
    /// 方法的简短名称.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sinogram => "radon",
            Self::LineDetection => "hough",
        }
    }
}

/// 掩膜在某个角度上的投影宽度.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProjectedWidth {
    angle: f64,
    span: f64,
}

impl ProjectedWidth {
    #[inline]
    pub(crate) fn new(angle: f64, span: f64) -> Self {
        Self { angle, span }
    }

    /// 投影角度, 度.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// 最外侧两个像素中心在投影轴上的距离 (像素), 连续值.
    #[inline]
    pub fn span(&self) -> f64 {
        self.span
    }

    /// 投影宽度, 像素: 从第一个到最后一个非空单位区间的区间个数.
    #[inline]
    pub fn pixels(&self) -> usize {
        self.span.round() as usize + 1
    }
}

/// 单个切片的角度投影分析结果.
///
/// 只能由本 crate 的计算函数创建.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SinogramData {
    #[cfg_attr(feature = "serde", serde(rename = "MaxPixels"))]
    max_pixels: usize,
    #[cfg_attr(feature = "serde", serde(rename = "MinPixels"))]
    min_pixels: usize,
    #[cfg_attr(feature = "serde", serde(rename = "MaxCm"))]
    max_cm: f64,
    #[cfg_attr(feature = "serde", serde(rename = "MinCm"))]
    min_cm: f64,
    #[cfg_attr(feature = "serde", serde(rename = "MaxAngle"))]
    max_angle: f64,
    #[cfg_attr(feature = "serde", serde(rename = "MinAngle"))]
    min_angle: f64,
    #[cfg_attr(feature = "serde", serde(rename = "EquivalentDiameter"))]
    equivalent_diameter: f64,
}

impl SinogramData {
    /// 最大投影宽度, 像素.
    #[inline]
    pub fn max_pixels(&self) -> usize {
        self.max_pixels
    }

    /// 最小投影宽度, 像素.
    #[inline]
    pub fn min_pixels(&self) -> usize {
        self.min_pixels
    }

    /// 最大投影宽度, 厘米.
    #[inline]
    pub fn max_cm(&self) -> f64 {
        self.max_cm
    }

    /// 最小投影宽度, 厘米.
    #[inline]
    pub fn min_cm(&self) -> f64 {
        self.min_cm
    }

    /// 最大投影宽度所在角度, 度.
    #[inline]
    pub fn max_angle(&self) -> f64 {
        self.max_angle
    }

    /// 最小投影宽度所在角度, 度.
    #[inline]
    pub fn min_angle(&self) -> f64 {
        self.min_angle
    }

    /// `sqrt(max_cm * min_cm)`, 厘米.
    #[inline]
    pub fn equivalent_diameter(&self) -> f64 {
        self.equivalent_diameter
    }
}

/// 从每个角度的投影宽度中选出最大值和最小值.
///
/// 比较使用连续宽度 [`ProjectedWidth::span`]. 差值不超过 [`WIDTH_TIE_EPS`] 时视为相等,
/// 此时取角度最小 (扫描顺序中最先出现) 的一个. `widths` 应按角度升序排列.
///
/// 长度换算统一使用 `x` 方向分辨率. `widths` 为空时返回 `Err(DiameterError::EmptyMask)`.
pub fn extremes(widths: &[ProjectedWidth], spacing: &VoxelSpacing) -> DiameterResult<SinogramData> {
    let (first, rest) = widths.split_first().ok_or(DiameterError::EmptyMask)?;
    let (mut max, mut min) = (first, first);
    for w in rest {
        if w.span > max.span + WIDTH_TIE_EPS {
            max = w;
        }
        if w.span < min.span - WIDTH_TIE_EPS {
            min = w;
        }
    }

    let (max_pixels, min_pixels) = (max.pixels(), min.pixels());
    let max_cm = spacing.px_to_cm(max_pixels as f64);
    let min_cm = spacing.px_to_cm(min_pixels as f64);
    Ok(SinogramData {
        max_pixels,
        min_pixels,
        max_cm,
        min_cm,
        max_angle: max.angle,
        min_angle: min.angle,
        equivalent_diameter: (max_cm * min_cm).sqrt(),
    })
}

/// 角度投影分析的统一接口.
pub trait AngularProjection: Send + Sync {
    /// 分析方法.
    fn method(&self) -> ProjectionMethod;

    /// 该实例使用的角度扫描.
    fn sweep(&self) -> &AngleSweep;

    /// 按角度升序计算 `mask` 在每个扫描角度上的投影宽度.
    ///
    /// 掩膜为空时返回 `Err(DiameterError::EmptyMask)`.
    fn widths(&self, mask: &MaskSlice) -> DiameterResult<Vec<ProjectedWidth>>;

    /// 分析 `mask`, 得到最大/最小投影宽度及等效直径.
    fn analyze(&self, mask: &MaskSlice, spacing: &VoxelSpacing) -> DiameterResult<SinogramData> {
        let widths = self.widths(mask)?;
        let data = extremes(&widths, spacing)?;
        log::trace!(
            "{}: max {} px @ {}°, min {} px @ {}°",
            self.method().name(),
            data.max_pixels,
            data.max_angle,
            data.min_pixels,
            data.min_angle
        );
        Ok(data)
    }

    /// 与 [`AngularProjection::analyze`] 相同, 但接受任意维度的数组.
    ///
    /// `mask` 不是二维时返回 `Err(DiameterError::Dimension)`, 不会尝试降维.
    fn analyze_array<D: Dimension>(
        &self,
        mask: ArrayView<bool, D>,
        spacing: &VoxelSpacing,
    ) -> DiameterResult<SinogramData>
    where
        Self: Sized,
    {
        self.analyze(&MaskSlice::try_from_view(mask)?, spacing)
    }
}
