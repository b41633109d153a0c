//! 合成体模. 用于测试与消融实验.
//!
//! 角度约定与 [`crate::projection`] 相同: 在 `(w, h)` 平面上, 0 度指向列 (宽) 增大的方向,
//! 90 度指向行 (高) 增大的方向.

use crate::{CtSeries, DiameterError, DiameterResult, Idx2d, Idx2dF, VoxelSpacing};
use ndarray::{Array2, Array3, Axis};

/// 在形状为 `shape` 的图像上绘制实心椭圆.
///
/// `centre` 为中心 `(h, w)`; `semi_axes` 为 `(a, b)`, 其中 `a` 为沿 `angle_deg` 方向的半轴,
/// `b` 为与之垂直的半轴, 单位均为像素. 像素中心落在椭圆内 (含边界) 即为前景.
pub fn ellipse(shape: Idx2d, centre: Idx2dF, semi_axes: Idx2dF, angle_deg: f64) -> Array2<bool> {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let (a, b) = semi_axes;
    Array2::from_shape_fn(shape, |(h, w)| {
        let dh = h as f64 - centre.0;
        let dw = w as f64 - centre.1;
        let u = dw * cos + dh * sin;
        let v = -dw * sin + dh * cos;
        (u / a).powi(2) + (v / b).powi(2) <= 1.0
    })
}

/// 在形状为 `shape` 的图像上绘制左上角为 `top_left`, 大小为 `size` (高, 宽) 的实心矩形.
/// 超出图像的部分被截断.
pub fn rectangle(shape: Idx2d, top_left: Idx2d, size: Idx2d) -> Array2<bool> {
    let (h0, w0) = top_left;
    let (h1, w1) = (h0.saturating_add(size.0), w0.saturating_add(size.1));
    Array2::from_shape_fn(shape, |(h, w)| (h0..h1).contains(&h) && (w0..w1).contains(&w))
}

/// HU 值处处为 `hu` 的扫描切片.
#[inline]
pub fn uniform_scan(shape: Idx2d, hu: f32) -> Array2<f32> {
    Array2::from_elem(shape, hu)
}

/// 将若干 (扫描, 掩膜) 切片堆叠为一个 CT 序列, 所有切片使用相同的分辨率 `spacing`.
///
/// 任一切片的扫描与掩膜形状不同, 或者切片之间形状不同时, 返回
/// `Err(DiameterError::ShapeMismatch)`.
pub fn stack(slices: &[(Array2<f32>, Array2<bool>)], spacing: VoxelSpacing) -> DiameterResult<CtSeries> {
    let shape = slices.first().map_or((0, 0), |(s, _)| s.dim());
    for (scan, mask) in slices {
        for other in [scan.dim(), mask.dim()] {
            if other != shape {
                return Err(DiameterError::ShapeMismatch {
                    image: scan.shape().to_vec(),
                    mask: mask.shape().to_vec(),
                });
            }
        }
    }

    let (h, w) = shape;
    let mut scan = Array3::<f32>::zeros((slices.len(), h, w));
    let mut mask = Array3::<bool>::default((slices.len(), h, w));
    for (z, (s, m)) in slices.iter().enumerate() {
        scan.index_axis_mut(Axis(0), z).assign(s);
        mask.index_axis_mut(Axis(0), z).assign(m);
    }
    CtSeries::new(scan, mask, vec![spacing; slices.len()])
}
