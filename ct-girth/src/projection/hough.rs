//! 基于 Hough 直线检测的投影宽度.
//!
//! 每个角度 `θ` 对应一族法线方向为 `θ` 的直线 `w * cos θ + h * sin θ = ρ`.
//! 掩膜的边缘像素在参数空间 `(θ, ρ)` 中投票, 每个角度下得票的最外侧两条直线即为掩膜的
//! 两条支撑线, 二者的距离就是掩膜在该方向上的宽度.

use super::sweep::{AngleSweep, Direction};
use super::{AngularProjection, ProjectedWidth, ProjectionMethod};
use crate::{DiameterError, DiameterResult, Idx2d, MaskSlice};
use ndarray::{Array2, ArrayView2};

/// 边缘像素的 Hough 累加器.
///
/// 行对应扫描角度, 列对应单位长度的 `ρ` 区间. 第 `j` 列的中心为 `j - offset`.
#[derive(Clone, Debug, PartialEq)]
pub struct HoughSpace {
    directions: Vec<Direction>,
    edges: Vec<Idx2d>,
    offset: f64,
    votes: Array2<u32>,
}

impl HoughSpace {
    /// 将形状为 `shape` 的图像上的边缘像素 `edges` 投票到参数空间中.
    ///
    /// `edges` 为空时返回 `Err(DiameterError::EmptyMask)`.
    pub fn from_edges(edges: &[Idx2d], shape: Idx2d, sweep: &AngleSweep) -> DiameterResult<Self> {
        if edges.is_empty() {
            return Err(DiameterError::EmptyMask);
        }
        let (h, w) = shape;
        // θ ∈ [0, 180) 时 ρ ∈ [-(w - 1), (h - 1) + (w - 1)].
        let offset = w.saturating_sub(1) as f64;
        let n_rho = h + 2 * w;

        let directions = sweep.directions();
        let mut votes = Array2::<u32>::zeros((directions.len(), n_rho));
        for (dir, mut row) in directions.iter().zip(votes.outer_iter_mut()) {
            for &p in edges {
                row[bin_of(dir.project(p), offset, n_rho)] += 1;
            }
        }

        Ok(Self {
            directions,
            edges: edges.to_vec(),
            offset,
            votes,
        })
    }

    /// 以行优先规则提取 `mask` 的边缘并构建参数空间.
    pub fn from_mask(mask: &MaskSlice, sweep: &AngleSweep) -> DiameterResult<Self> {
        Self::from_edges(&mask.edge_pos(), mask.shape(), sweep)
    }

    /// 扫描角度.
    pub fn angles(&self) -> Vec<f64> {
        self.directions.iter().map(Direction::angle).collect()
    }

    /// 累加器.
    #[inline]
    pub fn votes(&self) -> ArrayView2<'_, u32> {
        self.votes.view()
    }

    /// 第 `j` 列对应的 `ρ`.
    #[inline]
    pub fn rho_of(&self, j: usize) -> f64 {
        j as f64 - self.offset
    }

    /// 第 `i` 个角度下最外侧两条得票直线所在的列 (闭区间).
    /// 该行没有任何票时返回 `None`.
    ///
    /// 当 `i` 越界时 panic.
    pub fn outermost_bins(&self, i: usize) -> Option<(usize, usize)> {
        let row = self.votes.row(i);
        let first = row.iter().position(|v| *v > 0)?;
        let last = row.iter().rposition(|v| *v > 0)?;
        Some((first, last))
    }

    /// 第 `i` 个角度下的两条支撑线 `(ρ_min, ρ_max)`.
    ///
    /// 先在累加器中找到最外侧的两条得票直线, 再取投入这两个箱子的边缘像素的精确 `ρ`.
    /// 该行没有任何票时返回 `None`. 当 `i` 越界时 panic.
    pub fn support_lines(&self, i: usize) -> Option<(f64, f64)> {
        let (first, last) = self.outermost_bins(i)?;
        let dir = &self.directions[i];
        let n_rho = self.votes.ncols();
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for &p in &self.edges {
            let rho = dir.project(p);
            let j = bin_of(rho, self.offset, n_rho);
            if j == first {
                lo = lo.min(rho);
            }
            if j == last {
                hi = hi.max(rho);
            }
        }
        Some((lo, hi))
    }

    /// 第 `i` 个角度下得票最多的直线 `(ρ, 票数)`. 票数相同时取 `ρ` 较小者.
    ///
    /// 当 `i` 越界时 panic.
    pub fn strongest_line(&self, i: usize) -> (f64, u32) {
        let (j, v) = self
            .votes
            .row(i)
            .iter()
            .enumerate()
            .fold((0, 0), |best, (j, &v)| if v > best.1 { (j, v) } else { best });
        (self.rho_of(j), v)
    }

    /// 每个角度上两条支撑线之间的距离.
    ///
    /// 某个角度下没有检测到任何直线时返回 `Err(DiameterError::EmptyMask)`.
    pub fn widths(&self) -> DiameterResult<Vec<ProjectedWidth>> {
        self.directions
            .iter()
            .enumerate()
            .map(|(i, dir)| {
                let (lo, hi) = self.support_lines(i).ok_or(DiameterError::EmptyMask)?;
                Ok(ProjectedWidth::new(dir.angle(), hi - lo))
            })
            .collect()
    }
}

/// `ρ` 所在的列. 超出范围的值落入两端的列.
#[inline]
fn bin_of(rho: f64, offset: f64, n_rho: usize) -> usize {
    ((rho + offset).round().max(0.0) as usize).min(n_rho - 1)
}

/// Hough 直线检测法角度投影分析.
///
/// 取掩膜 4-邻域意义下的边缘 (前景像素, 且位于图像边缘或者 4-邻域含背景) 投票.
/// 任何方向上投影最远的像素必然是边缘像素, 因此结果与正弦图法一致.
#[derive(Clone, Debug, Default)]
pub struct HoughProjector {
    sweep: AngleSweep,
}

impl HoughProjector {
    /// 以给定的角度扫描构建.
    #[inline]
    pub fn new(sweep: AngleSweep) -> Self {
        Self { sweep }
    }
}

impl AngularProjection for HoughProjector {
    fn method(&self) -> ProjectionMethod {
        ProjectionMethod::LineDetection
    }

    fn sweep(&self) -> &AngleSweep {
        &self.sweep
    }

    fn widths(&self, mask: &MaskSlice) -> DiameterResult<Vec<ProjectedWidth>> {
        HoughSpace::from_mask(mask, &self.sweep)?.widths()
    }
}

#[cfg(test)]
mod tests {
    use super::HoughSpace;
    use crate::projection::tests::{cross, stub_cross};
    use crate::projection::{AngleSweep, Sinogram};
    use crate::{DiameterError, MaskSlice};
    use ndarray::{s, Array2};

    fn block() -> Array2<bool> {
        // 5x5 图像中央的 3x3 实心块, 共 8 个边缘像素.
        let mut m = Array2::<bool>::default((5, 5));
        m.slice_mut(s![1..4, 1..4]).fill(true);
        m
    }

    #[test]
    fn test_votes_and_lines() {
        let m = block();
        let mask = MaskSlice::new(m.view());
        let sweep = AngleSweep::new(90.0).unwrap();
        let space = HoughSpace::from_mask(&mask, &sweep).unwrap();

        assert_eq!(space.angles(), vec![0.0, 90.0]);
        assert_eq!(space.votes().dim(), (2, 15));
        assert_eq!(space.votes().row(0).sum(), 8);

        // 0 度: ρ = w, 三列分别得 3, 2, 3 票.
        assert_eq!(space.support_lines(0), Some((1.0, 3.0)));
        let (a, b) = space.outermost_bins(0).unwrap();
        assert_eq!((space.rho_of(a), space.rho_of(b)), (1.0, 3.0));
        assert_eq!(space.strongest_line(0), (1.0, 3));
        assert_eq!(space.support_lines(1), Some((1.0, 3.0)));
    }

    #[test]
    fn test_lines_follow_votes() {
        let m = block();
        let mask = MaskSlice::new(m.view());
        let sweep = AngleSweep::new(90.0).unwrap();
        let mut space = HoughSpace::from_mask(&mask, &sweep).unwrap();

        // 抹去 ρ = 1 的直线后, 最外侧直线退到 ρ = 2.
        let (first, _) = space.outermost_bins(0).unwrap();
        space.votes[(0, first)] = 0;
        assert_eq!(space.support_lines(0), Some((2.0, 3.0)));
        assert_eq!(space.widths().unwrap()[0].span(), 1.0);
        // 其他角度不受影响.
        assert_eq!(space.support_lines(1), Some((1.0, 3.0)));

        // 整行无票时没有直线.
        space.votes.row_mut(1).fill(0);
        assert_eq!(space.outermost_bins(1), None);
        assert_eq!(space.widths(), Err(DiameterError::EmptyMask));
    }

    #[test]
    fn test_lines_within_outermost_bins() {
        let owned = stub_cross();
        let mask = MaskSlice::new(owned.view());
        let space = HoughSpace::from_mask(&mask, &AngleSweep::default()).unwrap();
        for i in 0..space.angles().len() {
            let (a, b) = space.outermost_bins(i).unwrap();
            let (lo, hi) = space.support_lines(i).unwrap();
            assert!((lo - space.rho_of(a)).abs() <= 0.5);
            assert!((hi - space.rho_of(b)).abs() <= 0.5);
        }
    }

    #[test]
    fn test_agrees_with_sinogram() {
        let mut m = Array2::<bool>::default((40, 50));
        m.slice_mut(s![5..30, 10..45]).fill(true);
        m.slice_mut(s![30..36, 20..26]).fill(true);
        m[(37, 3)] = true;
        let sweep = AngleSweep::default();
        for owned in [m, cross(), stub_cross()] {
            let mask = MaskSlice::new(owned.view());
            let hough = HoughSpace::from_mask(&mask, &sweep).unwrap().widths().unwrap();
            let radon = Sinogram::from_mask(&mask, &sweep).unwrap().widths();
            assert_eq!(hough, radon);
        }
    }

    #[test]
    fn test_empty_edges() {
        let sweep = AngleSweep::default();
        assert_eq!(
            HoughSpace::from_edges(&[], (4, 4), &sweep),
            Err(DiameterError::EmptyMask)
        );
    }
}
