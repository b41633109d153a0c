//! 单切片等效直径.
//!
//! 从一张 HU 图像和对应的二值病人掩膜出发, 计算:
//!
//! 1. 面积等效直径 EAD: 与掩膜面积相等的圆的直径;
//! 2. 水等效直径 WED: 将每个像素按相对水的密度加权后的 EAD;
//! 3. 有效直径 EED: 左右 (LAT) 与前后 (AP) 外接尺寸的几何平均;
//! 4. 掩膜内 HU 的均值和中位数.

use crate::consts::hu::relative_density;
use crate::data::slice::view_2d;
use crate::{DiameterError, DiameterResult, MaskSlice, ScanSlice, VoxelSpacing};
use ndarray::{ArrayView, ArrayView2, Dimension};
use num::ToPrimitive;
use ordered_float::NotNan;
use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::Serialize;

/// 单个切片的面积/密度等效直径计算结果.
///
/// 只能由本 crate 的计算函数创建.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EquivalentDiameterData {
    #[cfg_attr(feature = "serde", serde(rename = "Area_px"))]
    area_px: usize,
    #[cfg_attr(feature = "serde", serde(rename = "EAD_px"))]
    ead_px: f64,
    #[cfg_attr(feature = "serde", serde(rename = "EAD_cm"))]
    ead_cm: f64,
    #[cfg_attr(feature = "serde", serde(rename = "EquivalentAreaCircumference_cm"))]
    circumference_cm: f64,
    #[cfg_attr(feature = "serde", serde(rename = "MeanHU"))]
    mean_hu: f64,
    #[cfg_attr(feature = "serde", serde(rename = "MedianHU"))]
    median_hu: f64,
    #[cfg_attr(feature = "serde", serde(rename = "LAT_cm"))]
    lat_cm: f64,
    #[cfg_attr(feature = "serde", serde(rename = "AP_cm"))]
    ap_cm: f64,
    #[cfg_attr(feature = "serde", serde(rename = "WED_px"))]
    wed_px: f64,
    #[cfg_attr(feature = "serde", serde(rename = "WED_cm"))]
    wed_cm: f64,
    #[cfg_attr(feature = "serde", serde(rename = "EED_px"))]
    eed_px: f64,
    #[cfg_attr(feature = "serde", serde(rename = "EED_cm"))]
    eed_cm: f64,
}

impl EquivalentDiameterData {
    /// 掩膜面积 (像素个数).
    #[inline]
    pub fn area_px(&self) -> usize {
        self.area_px
    }

    /// 面积等效直径, 像素.
    #[inline]
    pub fn ead_px(&self) -> f64 {
        self.ead_px
    }

    /// 面积等效直径, 厘米.
    #[inline]
    pub fn ead_cm(&self) -> f64 {
        self.ead_cm
    }

    /// 面积等效圆的周长, 厘米.
    #[inline]
    pub fn equivalent_area_circumference_cm(&self) -> f64 {
        self.circumference_cm
    }

    /// 掩膜内 HU 均值.
    #[inline]
    pub fn mean_hu(&self) -> f64 {
        self.mean_hu
    }

    /// 掩膜内 HU 中位数.
    #[inline]
    pub fn median_hu(&self) -> f64 {
        self.median_hu
    }

    /// 左右方向 (列) 外接尺寸, 厘米.
    #[inline]
    pub fn lat_cm(&self) -> f64 {
        self.lat_cm
    }

    /// 前后方向 (行) 外接尺寸, 厘米.
    #[inline]
    pub fn ap_cm(&self) -> f64 {
        self.ap_cm
    }

    /// 水等效直径, 像素.
    #[inline]
    pub fn wed_px(&self) -> f64 {
        self.wed_px
    }

    /// 水等效直径, 厘米.
    #[inline]
    pub fn wed_cm(&self) -> f64 {
        self.wed_cm
    }

    /// 有效直径, 像素 (以 `x` 方向分辨率换算).
    #[inline]
    pub fn eed_px(&self) -> f64 {
        self.eed_px
    }

    /// 有效直径, 厘米.
    #[inline]
    pub fn eed_cm(&self) -> f64 {
        self.eed_cm
    }
}

/// 掩膜范围内的 HU 统计量.
struct HuStats {
    area: usize,
    mean: f64,
    median: f64,
    density_sum: f64,
}

/// 收集掩膜内的 HU 值并计算统计量. 全背景时返回 `Err(DiameterError::EmptyMask)`.
fn hu_stats<A>(image: ArrayView2<A>, mask: ArrayView2<bool>) -> DiameterResult<HuStats>
where
    A: ToPrimitive,
{
    let mut values = Vec::new();
    for (pos, &inside) in mask.indexed_iter() {
        if !inside {
            continue;
        }
        let v = image[pos]
            .to_f64()
            .filter(|v| v.is_finite())
            .ok_or(DiameterError::InvalidHu { pos })?;
        values.push(NotNan::new(v).map_err(|_| DiameterError::InvalidHu { pos })?);
    }
    if values.is_empty() {
        return Err(DiameterError::EmptyMask);
    }

    let area = values.len();
    let sum: f64 = values.iter().map(|v| v.into_inner()).sum();
    let density_sum: f64 = values.iter().map(|v| relative_density(v.into_inner())).sum();

    values.sort_unstable();
    let mid = area / 2;
    let median = if area % 2 == 0 {
        (values[mid - 1].into_inner() + values[mid].into_inner()) / 2.0
    } else {
        values[mid].into_inner()
    };

    Ok(HuStats {
        area,
        mean: sum / area as f64,
        median,
        density_sum,
    })
}

/// 与面积 `area` 相等的圆的直径.
#[inline]
fn circle_diameter(area: f64) -> f64 {
    2.0 * (area / PI).sqrt()
}

/// 计算 HU 图像 `image` 在病人掩膜 `mask` 内的等效直径.
///
/// `image` 的元素可以是任意能转换为 `f64` 的数值类型 (如 `i16`, `f32`).
///
/// # 返回值
///
/// 在进行任何计算前依次检查:
///
/// 1. `image` 不是二维的, 返回 `Err(DiameterError::Dimension)`;
/// 2. `mask` 不是二维的, 返回 `Err(DiameterError::Dimension)`;
/// 3. 两者形状不同, 返回 `Err(DiameterError::ShapeMismatch)`.
///
/// 之后, 掩膜为空时返回 `Err(DiameterError::EmptyMask)`, 掩膜内存在无法转换为有限数值的
/// 像素时返回 `Err(DiameterError::InvalidHu)`.
pub fn equivalent_diameter<A, D1, D2>(
    image: ArrayView<A, D1>,
    mask: ArrayView<bool, D2>,
    spacing: &VoxelSpacing,
) -> DiameterResult<EquivalentDiameterData>
where
    A: ToPrimitive,
    D1: Dimension,
    D2: Dimension,
{
    let image = view_2d(image)?;
    let mask = view_2d(mask)?;
    if image.shape() != mask.shape() {
        return Err(DiameterError::ShapeMismatch {
            image: image.shape().to_vec(),
            mask: mask.shape().to_vec(),
        });
    }
    calc(image, MaskSlice::new(mask), spacing)
}

/// 与 [`equivalent_diameter`] 相同, 但直接接受本 crate 的切片类型.
pub fn slice_equivalent_diameter(
    scan: &ScanSlice,
    mask: &MaskSlice,
    spacing: &VoxelSpacing,
) -> DiameterResult<EquivalentDiameterData> {
    equivalent_diameter(scan.data(), mask.array_view(), spacing)
}

fn calc<A: ToPrimitive>(
    image: ArrayView2<A>,
    mask: MaskSlice,
    spacing: &VoxelSpacing,
) -> DiameterResult<EquivalentDiameterData> {
    let stats = hu_stats(image, mask.array_view())?;
    let extent = mask.extent().ok_or(DiameterError::EmptyMask)?;

    let ead_px = circle_diameter(stats.area as f64);
    let ead_cm = spacing.px_to_cm(ead_px);
    // 密度总和为负时 (几乎全是低于空气的值) 没有对应的圆.
    let wed_px = circle_diameter(stats.density_sum.max(0.0));

    let lat_cm = spacing.px_to_cm(extent.width_px() as f64);
    let ap_cm = spacing.height_px_to_cm(extent.height_px() as f64);
    let eed_cm = (lat_cm * ap_cm).sqrt();

    log::trace!(
        "area = {} px, EAD = {ead_cm:.3} cm, LAT = {lat_cm:.3} cm, AP = {ap_cm:.3} cm",
        stats.area
    );

    Ok(EquivalentDiameterData {
        area_px: stats.area,
        ead_px,
        ead_cm,
        circumference_cm: PI * ead_cm,
        mean_hu: stats.mean,
        median_hu: stats.median,
        lat_cm,
        ap_cm,
        wed_px,
        wed_cm: spacing.px_to_cm(wed_px),
        eed_px: spacing.cm_to_px(eed_cm),
        eed_cm,
    })
}
