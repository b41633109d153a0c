//! 合成椭圆体模测试集. 每个用例都有解析的最大/最小宽度.

use ct_girth::phantom;
use ct_girth::VoxelSpacing;
use ndarray::Array2;
use std::env;

/// 默认图像边长 (像素).
const DEFAULT_IMAGE_SIZE: usize = 512;

/// 默认像素分辨率 (毫米).
const DEFAULT_SPACING_MM: f64 = 0.7;

/// 椭圆半轴 (像素), 依次为: 成人腹部, 成人胸部, 接近圆形的头部, 儿童.
const SEMI_AXES: [(f64, f64); 4] = [(170.0, 115.0), (150.0, 100.0), (90.0, 85.0), (60.0, 35.0)];

/// 旋转角度步长 (度).
const ROTATION_STEP: usize = 15;

/// 单个体模用例.
pub struct Case {
    /// 用例名称.
    pub name: String,
    /// 椭圆半轴 `(a, b)`, 像素. `a` 沿 `angle` 方向.
    pub semi_axes: (f64, f64),
    /// 长轴方向, 度.
    pub angle: f64,
    /// 掩膜.
    pub mask: Array2<bool>,
    /// 扫描切片 (水, 0 HU).
    pub scan: Array2<f32>,
    /// 像素分辨率.
    pub spacing: VoxelSpacing,
}

impl Case {
    /// 解析的最大宽度 (像素): 长轴长度.
    #[inline]
    pub fn analytic_max_px(&self) -> f64 {
        2.0 * self.semi_axes.0
    }

    /// 解析的最小宽度 (像素): 短轴长度.
    #[inline]
    pub fn analytic_min_px(&self) -> f64 {
        2.0 * self.semi_axes.1
    }

    /// 解析的等效直径 (厘米).
    #[inline]
    pub fn analytic_diameter_cm(&self) -> f64 {
        let max = self.spacing.px_to_cm(self.analytic_max_px());
        let min = self.spacing.px_to_cm(self.analytic_min_px());
        (max * min).sqrt()
    }
}

/// 获取图像边长.
///
/// 1. 若环境变量 `$AGREEMENT_IMAGE_SIZE` 为合法正整数, 则返回其值;
/// 2. 否则, 返回 512.
pub fn image_size_from_env_or_default() -> usize {
    env::var("AGREEMENT_IMAGE_SIZE")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|s: &usize| *s > 0)
        .unwrap_or(DEFAULT_IMAGE_SIZE)
}

/// 用例总数.
pub fn case_count() -> usize {
    SEMI_AXES.len() * (180 / ROTATION_STEP)
}

/// 获取能惰性生成所有用例的迭代器. 用例位于边长为 `size` 的正方形图像中央,
/// 超出图像的半轴会按比例缩小.
pub fn ellipse_cases(size: usize) -> impl Iterator<Item = Case> {
    let centre = (size / 2) as f64;
    let limit = (centre - 2.0).max(1.0);
    let spacing = VoxelSpacing::new(DEFAULT_SPACING_MM, DEFAULT_SPACING_MM)
        .expect("default spacing is valid");

    SEMI_AXES.into_iter().flat_map(move |(a, b)| {
        let (a, b) = if a > limit { (limit, b * (limit / a)) } else { (a, b) };
        (0..180).step_by(ROTATION_STEP).map(move |angle| {
            let angle = angle as f64;
            Case {
                name: format!("ellipse-{a:.0}x{b:.0}@{angle:.0}"),
                semi_axes: (a, b),
                angle,
                mask: phantom::ellipse((size, size), (centre, centre), (a, b), angle),
                scan: phantom::uniform_scan((size, size), 0.0),
                spacing,
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cases() {
        let cases: Vec<_> = ellipse_cases(64).collect();
        assert_eq!(cases.len(), case_count());
        assert!(cases.iter().all(|c| c.mask.iter().any(|p| *p)));
        // 小图像中长半轴被截到 30 像素, 短半轴按比例缩小.
        assert!(cases.iter().all(|c| c.semi_axes.0 == 30.0));
        assert!(cases.iter().all(|c| c.semi_axes.1 < c.semi_axes.0));

        // 足够大的图像中保持原样.
        let c = ellipse_cases(512).next().unwrap();
        assert_eq!(c.semi_axes, (170.0, 115.0));
    }
}
