//! 三维 CT 序列的逐切片等效直径计算.

use crate::consts::DEFAULT_AGREEMENT_TOLERANCE;
use crate::diameter::{slice_equivalent_diameter, EquivalentDiameterData};
use crate::projection::{
    AngleSweep, AngularProjection, HoughProjector, ProjectionMethod, RadonProjector, SinogramData,
};
use crate::{CtSeries, DiameterError, DiameterResult, MaskSlice, ScanSlice, VoxelSpacing};

#[cfg(feature = "serde")]
use serde::Serialize;

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IntoParallelIterator, ParallelIterator};
    }
}

/// 计算配置.
///
/// 默认只启用正弦图法, 角度步长 1 度, 交叉校验容差 5%.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DiameterConfig {
    sweep: AngleSweep,
    use_radon: bool,
    use_hough: bool,
    agreement_tolerance: f64,
}

impl Default for DiameterConfig {
    fn default() -> Self {
        Self {
            sweep: AngleSweep::default(),
            use_radon: true,
            use_hough: false,
            agreement_tolerance: DEFAULT_AGREEMENT_TOLERANCE,
        }
    }
}

impl DiameterConfig {
    /// 指定是否启用正弦图法 `use_radon` 和 Hough 直线检测法 `use_hough`, 其余取默认值.
    pub fn new(use_radon: bool, use_hough: bool) -> Self {
        Self {
            use_radon,
            use_hough,
            ..Default::default()
        }
    }

    /// 使用角度扫描 `sweep`.
    pub fn with_sweep(self, sweep: AngleSweep) -> Self {
        Self { sweep, ..self }
    }

    /// 设置交叉校验时允许的相对偏差. `tolerance` 必须是有限非负数,
    /// 否则返回 `Err(DiameterError::InvalidTolerance)`.
    pub fn with_agreement_tolerance(self, tolerance: f64) -> DiameterResult<Self> {
        if tolerance.is_finite() && tolerance >= 0.0 {
            Ok(Self {
                agreement_tolerance: tolerance,
                ..self
            })
        } else {
            Err(DiameterError::InvalidTolerance(tolerance))
        }
    }

    /// 角度扫描.
    #[inline]
    pub fn sweep(&self) -> &AngleSweep {
        &self.sweep
    }

    /// 是否启用正弦图法?
    #[inline]
    pub fn use_radon(&self) -> bool {
        self.use_radon
    }

    /// 是否启用 Hough 直线检测法?
    #[inline]
    pub fn use_hough(&self) -> bool {
        self.use_hough
    }

    /// 交叉校验容差.
    #[inline]
    pub fn agreement_tolerance(&self) -> f64 {
        self.agreement_tolerance
    }
}

/// 单个切片的全部结果.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SliceDiameters {
    equivalent: EquivalentDiameterData,
    radon: Option<SinogramData>,
    hough: Option<SinogramData>,
}

impl SliceDiameters {
    /// 面积/密度等效直径.
    #[inline]
    pub fn equivalent(&self) -> &EquivalentDiameterData {
        &self.equivalent
    }

    /// 正弦图法结果. 未启用时为 `None`.
    #[inline]
    pub fn radon(&self) -> Option<&SinogramData> {
        self.radon.as_ref()
    }

    /// Hough 直线检测法结果. 未启用时为 `None`.
    #[inline]
    pub fn hough(&self) -> Option<&SinogramData> {
        self.hough.as_ref()
    }

    /// 已启用方法的结果.
    fn projections(&self) -> impl Iterator<Item = (ProjectionMethod, &SinogramData)> {
        let radon = self.radon.iter().map(|d| (ProjectionMethod::Sinogram, d));
        let hough = self.hough.iter().map(|d| (ProjectionMethod::LineDetection, d));
        radon.chain(hough)
    }
}

/// 整个序列的结果: 三组与切片一一对应的序列. 未启用的方法对应 `None`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct VolumeDiameters {
    equivalent: Vec<EquivalentDiameterData>,
    radon: Option<Vec<SinogramData>>,
    hough: Option<Vec<SinogramData>>,
}

impl VolumeDiameters {
    fn from_slices(slices: Vec<SliceDiameters>, methods: &[ProjectionMethod]) -> Self {
        let collect = |m: ProjectionMethod| {
            methods.contains(&m).then(|| {
                slices
                    .iter()
                    .filter_map(|s| match m {
                        ProjectionMethod::Sinogram => s.radon,
                        ProjectionMethod::LineDetection => s.hough,
                    })
                    .collect::<Vec<_>>()
            })
        };
        Self {
            radon: collect(ProjectionMethod::Sinogram),
            hough: collect(ProjectionMethod::LineDetection),
            equivalent: slices.iter().map(|s| s.equivalent).collect(),
        }
    }

    /// 每个切片的面积/密度等效直径.
    #[inline]
    pub fn equivalent(&self) -> &[EquivalentDiameterData] {
        &self.equivalent
    }

    /// 每个切片的正弦图法结果.
    #[inline]
    pub fn radon(&self) -> Option<&[SinogramData]> {
        self.radon.as_deref()
    }

    /// 每个切片的 Hough 直线检测法结果.
    #[inline]
    pub fn hough(&self) -> Option<&[SinogramData]> {
        self.hough.as_deref()
    }

    /// 切片个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.equivalent.len()
    }

    /// 是否不含任何切片?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.equivalent.is_empty()
    }

    /// 消费自我, 获得三组序列.
    #[allow(clippy::type_complexity)]
    pub fn into_parts(
        self,
    ) -> (
        Vec<EquivalentDiameterData>,
        Option<Vec<SinogramData>>,
        Option<Vec<SinogramData>>,
    ) {
        (self.equivalent, self.radon, self.hough)
    }
}

/// 两个非负量的相对偏差 `|a - b| / max(|a|, |b|)`. 二者均为 0 时返回 0.
pub fn relative_difference(a: f64, b: f64) -> f64 {
    let scale = a.abs().max(b.abs());
    if scale == 0.0 {
        0.0
    } else {
        (a - b).abs() / scale
    }
}

/// 逐切片计算流水线. 持有所有启用的角度投影分析方法.
pub struct DiameterPipeline {
    projectors: Vec<Box<dyn AngularProjection>>,
    tolerance: f64,
}

impl DiameterPipeline {
    /// 按照配置 `config` 创建.
    pub fn new(config: &DiameterConfig) -> Self {
        let mut projectors: Vec<Box<dyn AngularProjection>> = Vec::with_capacity(2);
        if config.use_radon {
            projectors.push(Box::new(RadonProjector::new(config.sweep)));
        }
        if config.use_hough {
            projectors.push(Box::new(HoughProjector::new(config.sweep)));
        }
        Self {
            projectors,
            tolerance: config.agreement_tolerance,
        }
    }

    /// 启用的角度投影分析方法.
    pub fn methods(&self) -> Vec<ProjectionMethod> {
        self.projectors.iter().map(|p| p.method()).collect()
    }

    fn compute(
        &self,
        scan: &ScanSlice,
        mask: &MaskSlice,
        spacing: &VoxelSpacing,
    ) -> DiameterResult<SliceDiameters> {
        let mut out = SliceDiameters {
            equivalent: slice_equivalent_diameter(scan, mask, spacing)?,
            radon: None,
            hough: None,
        };
        for p in self.projectors.iter() {
            let d = p.analyze(mask, spacing)?;
            match p.method() {
                ProjectionMethod::Sinogram => out.radon = Some(d),
                ProjectionMethod::LineDetection => out.hough = Some(d),
            }
        }
        Ok(out)
    }

    /// 交叉校验各方法的结果. 相对偏差超过容差时输出警告, 不影响结果.
    fn check_agreement(&self, index: Option<usize>, d: &SliceDiameters) {
        let at = index.map_or_else(String::new, |i| format!("第 {i} 个切片: "));
        let eed = d.equivalent.eed_cm();
        for (m, s) in d.projections() {
            let r = relative_difference(s.equivalent_diameter(), eed);
            if r > self.tolerance {
                log::warn!(
                    "{at}{} 等效直径 {:.3} cm 与 EED {eed:.3} cm 相差 {:.1}%",
                    m.name(),
                    s.equivalent_diameter(),
                    r * 100.0
                );
            }
        }
        if let (Some(a), Some(b)) = (&d.radon, &d.hough) {
            let r = relative_difference(a.equivalent_diameter(), b.equivalent_diameter());
            if r > self.tolerance {
                log::warn!(
                    "{at}radon ({:.3} cm) 与 hough ({:.3} cm) 结果相差 {:.1}%",
                    a.equivalent_diameter(),
                    b.equivalent_diameter(),
                    r * 100.0
                );
            }
        }
    }

    /// 计算单个切片.
    pub fn slice(
        &self,
        scan: &ScanSlice,
        mask: &MaskSlice,
        spacing: &VoxelSpacing,
    ) -> DiameterResult<SliceDiameters> {
        let d = self.compute(scan, mask, spacing)?;
        self.check_agreement(None, &d);
        Ok(d)
    }

    /// 计算序列中的第 `index` 个切片. 出错时错误中携带切片索引.
    fn indexed(
        &self,
        index: usize,
        (scan, mask, spacing): (ScanSlice, MaskSlice, &VoxelSpacing),
    ) -> DiameterResult<SliceDiameters> {
        let d = self
            .compute(&scan, &mask, spacing)
            .map_err(|e| e.at_slice(index))?;
        log::debug!(
            "第 {index} 个切片: EAD = {:.3} cm, EED = {:.3} cm",
            d.equivalent.ead_cm(),
            d.equivalent.eed_cm()
        );
        self.check_agreement(Some(index), &d);
        Ok(d)
    }

    /// 按切片顺序计算整个序列. 任一切片失败时立即返回该切片的错误.
    pub fn run(&self, series: &CtSeries) -> DiameterResult<VolumeDiameters> {
        let slices = series
            .slice_iter()
            .enumerate()
            .map(|(z, s)| self.indexed(z, s))
            .collect::<DiameterResult<Vec<_>>>()?;
        Ok(VolumeDiameters::from_slices(slices, &self.methods()))
    }

    /// 借助 `rayon`, 并行地计算整个序列. 结果与 [`DiameterPipeline::run`] 完全相同;
    /// 多个切片失败时, 返回索引最小的切片的错误.
    #[cfg(feature = "rayon")]
    pub fn par_run(&self, series: &CtSeries) -> DiameterResult<VolumeDiameters> {
        let results: Vec<_> = (0..series.len_z())
            .into_par_iter()
            .map(|z| self.indexed(z, series.slice_at(z)))
            .collect();
        let slices = results.into_iter().collect::<DiameterResult<Vec<_>>>()?;
        Ok(VolumeDiameters::from_slices(slices, &self.methods()))
    }
}

/// 按切片计算整个序列的等效直径.
///
/// 面积/密度等效直径总是计算; `use_radon` 与 `use_hough` 分别控制是否启用正弦图法和
/// Hough 直线检测法. 其余配置取 [`DiameterConfig::default`].
///
/// 任一切片失败 (例如掩膜为空) 时整体失败, 返回 `Err(DiameterError::Slice)`.
pub fn calculate_area_equivalent_diameter(
    series: &CtSeries,
    use_radon: bool,
    use_hough: bool,
) -> DiameterResult<VolumeDiameters> {
    let config = DiameterConfig::new(use_radon, use_hough);
    DiameterPipeline::new(&config).run(series)
}
