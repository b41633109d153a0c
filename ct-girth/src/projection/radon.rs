//! 基于正弦图 (Radon 变换) 的投影宽度.

use super::sweep::{AngleSweep, Direction};
use super::{AngularProjection, ProjectedWidth, ProjectionMethod};
use crate::{DiameterError, DiameterResult, Idx2d, MaskSlice};
use itertools::Itertools;
use ndarray::Array2;

/// 掩膜在单个角度上的一维投影.
///
/// 投影轴按单位长度分箱, 第 0 个箱子的中心位于最小投影坐标处.
/// 每个前景像素按最近邻规则落入一个箱子.
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    angle: f64,
    rho_min: f64,
    rho_max: f64,
    bins: Vec<u32>,
}

impl Projection {
    /// 将 `points` 沿 `dir` 方向投影. `points` 不能为空.
    fn new(dir: &Direction, points: &[Idx2d]) -> Self {
        let rho: Vec<f64> = points.iter().map(|p| dir.project(*p)).collect();
        let (rho_min, rho_max) = rho
            .iter()
            .copied()
            .minmax_by(f64::total_cmp)
            .into_option()
            .unwrap_or_default();

        let len = (rho_max - rho_min).round() as usize + 1;
        let mut bins = vec![0; len];
        for r in rho {
            let i = ((r - rho_min).round() as usize).min(len - 1);
            bins[i] += 1;
        }
        Self {
            angle: dir.angle(),
            rho_min,
            rho_max,
            bins,
        }
    }

    /// 投影角度, 度.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// 最小投影坐标, 即第 0 个箱子的中心.
    #[inline]
    pub fn rho_min(&self) -> f64 {
        self.rho_min
    }

    /// 每个箱子中的像素个数.
    #[inline]
    pub fn bins(&self) -> &[u32] {
        &self.bins
    }

    /// 投影的总质量. 对二值掩膜而言等于前景像素个数.
    #[inline]
    pub fn mass(&self) -> u64 {
        self.bins.iter().map(|b| *b as u64).sum()
    }

    /// 第一个到最后一个非空箱子的箱子个数.
    pub fn occupied(&self) -> usize {
        let first = self.bins.iter().position(|b| *b > 0);
        let last = self.bins.iter().rposition(|b| *b > 0);
        match (first, last) {
            (Some(a), Some(b)) => b - a + 1,
            _ => 0,
        }
    }

    /// 投影宽度.
    #[inline]
    pub fn width(&self) -> ProjectedWidth {
        ProjectedWidth::new(self.angle, self.rho_max - self.rho_min)
    }
}

/// 二值掩膜的正弦图: 按角度升序排列的一组投影.
#[derive(Clone, Debug, PartialEq)]
pub struct Sinogram {
    projections: Vec<Projection>,
}

impl Sinogram {
    /// 以扫描 `sweep` 计算 `mask` 的正弦图.
    ///
    /// 掩膜为空时返回 `Err(DiameterError::EmptyMask)`.
    pub fn from_mask(mask: &MaskSlice, sweep: &AngleSweep) -> DiameterResult<Self> {
        let points: Vec<Idx2d> = mask.foreground_pos().collect();
        if points.is_empty() {
            return Err(DiameterError::EmptyMask);
        }
        let projections = sweep
            .directions()
            .iter()
            .map(|d| Projection::new(d, &points))
            .collect();
        Ok(Self { projections })
    }

    /// 所有投影.
    #[inline]
    pub fn projections(&self) -> &[Projection] {
        &self.projections
    }

    /// 投影 (角度) 个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.projections.len()
    }

    /// 是否不含任何投影?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.projections.is_empty()
    }

    /// 每个角度上的投影宽度.
    pub fn widths(&self) -> Vec<ProjectedWidth> {
        self.projections.iter().map(Projection::width).collect()
    }

    /// 转换为二维数组形式: 行为角度, 列为投影箱子, 长度不足的行以 0 填充.
    pub fn to_array(&self) -> Array2<u32> {
        let cols = self
            .projections
            .iter()
            .map(|p| p.bins.len())
            .max()
            .unwrap_or(0);
        let mut arr = Array2::zeros((self.len(), cols));
        for (mut row, p) in arr.outer_iter_mut().zip(self.projections.iter()) {
            for (dst, src) in row.iter_mut().zip(p.bins.iter()) {
                *dst = *src;
            }
        }
        arr
    }
}

/// 正弦图法角度投影分析.
#[derive(Clone, Debug, Default)]
pub struct RadonProjector {
    sweep: AngleSweep,
}

impl RadonProjector {
    /// 以给定的角度扫描构建.
    #[inline]
    pub fn new(sweep: AngleSweep) -> Self {
        Self { sweep }
    }
}

impl AngularProjection for RadonProjector {
    fn method(&self) -> ProjectionMethod {
        ProjectionMethod::Sinogram
    }

    fn sweep(&self) -> &AngleSweep {
        &self.sweep
    }

    fn widths(&self, mask: &MaskSlice) -> DiameterResult<Vec<ProjectedWidth>> {
        Ok(Sinogram::from_mask(mask, &self.sweep)?.widths())
    }
}

#[cfg(test)]
mod tests {
    use super::Sinogram;
    use crate::projection::tests::cross;
    use crate::projection::AngleSweep;
    use crate::MaskSlice;
    use ndarray::{s, Array2};

    #[test]
    fn test_projection_mass_equals_area() {
        let mut m = Array2::<bool>::default((30, 40));
        m.slice_mut(s![5..25, 8..33]).fill(true);
        m.slice_mut(s![10..12, 2..8]).fill(true);
        let mask = MaskSlice::new(m.view());
        let area = mask.count() as u64;

        let sino = Sinogram::from_mask(&mask, &AngleSweep::default()).unwrap();
        assert_eq!(sino.len(), 180);
        for p in sino.projections() {
            assert_eq!(p.mass(), area);
            assert_eq!(p.occupied(), p.bins().len());
            assert_eq!(p.occupied(), p.width().pixels());
        }
    }

    #[test]
    fn test_cross_projections() {
        let m = cross();
        let sino = Sinogram::from_mask(&MaskSlice::new(m.view()), &AngleSweep::default()).unwrap();
        // 0 度: 按列投影, 中间一列包含竖条.
        assert_eq!(sino.projections()[0].bins(), &[3, 3, 9, 3, 3]);
        // 90 度: 按行投影.
        assert_eq!(
            sino.projections()[90].bins(),
            &[1, 1, 1, 5, 5, 5, 1, 1, 1]
        );
        assert_eq!(sino.projections()[90].rho_min(), 1.0);

        let arr = sino.to_array();
        assert_eq!(arr.nrows(), 180);
        assert_eq!(arr.row(0).sum(), 21);
    }
}
