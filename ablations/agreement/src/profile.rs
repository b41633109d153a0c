//! 算法运行统计.

use std::time::{Duration, Instant};

/// ablation/benchmark 计时器.
///
/// 该计时器支持 "中途中断" 与 "结束中断, 继续开始计时".
#[derive(Clone, Debug)]
struct AccTimer {
    consumed: Duration,
    since: Instant,
}

impl AccTimer {
    /// 初始化计时器. 初始化时会视为已经开始计时 (`self.start()`).
    #[inline]
    pub fn new() -> Self {
        Self {
            consumed: Duration::ZERO,
            since: Instant::now(),
        }
    }

    /// 开始计时.
    #[inline]
    pub fn start(&mut self) {
        self.since = Instant::now();
    }

    /// 结束计时, 并将这一区间的时间累加. 返回本轮计时时长.
    ///
    /// # 注意
    ///
    /// 上一次调用必须是 `self.start()`, 否则计算时间值无意义.
    #[inline]
    pub fn elapsed(&mut self) -> Duration {
        let d = self.since.elapsed();
        self.consumed += d;
        d
    }

    /// 获得总共累计下来的时间 (以微秒为单位).
    #[inline]
    pub fn get_total_us(&self) -> u64 {
        self.consumed.as_micros() as u64
    }
}

impl Default for AccTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// 单个角度投影方法的统计.
#[derive(Clone, Debug)]
pub struct Profile {
    /// 成功分析的用例个数.
    cases: u64,

    /// 分析失败的用例个数.
    failures: u64,

    /// 分析用例花费的总时间.
    case_time: AccTimer,

    /// 整个任务花费的总时间 (包括生成体模的时间).
    real_time: AccTimer,

    /// 最耗时的一次分析.
    most: Option<Duration>,

    /// 等效直径相对解析值的偏差之和与最大值.
    analytic_sum: f64,
    analytic_max: f64,

    /// 等效直径相对 EED 的最大偏差.
    eed_max: f64,

    /// 最大投影宽度方向与椭圆长轴方向的最大夹角 (度).
    angle_max: f64,
}

impl Profile {
    /// 初始化.
    #[inline]
    pub fn new() -> Self {
        Self {
            cases: 0,
            failures: 0,
            case_time: AccTimer::default(),
            real_time: AccTimer::default(),
            most: None,
            analytic_sum: 0.0,
            analytic_max: 0.0,
            eed_max: 0.0,
            angle_max: 0.0,
        }
    }

    /// 开始一次用例计时.
    #[inline]
    pub fn case_start(&mut self) {
        self.case_time.start();
    }

    /// 结束一次用例计时.
    #[inline]
    pub fn case_elapsed(&mut self) {
        let d = self.case_time.elapsed();
        self.most = Some(self.most.map_or(d, |m| m.max(d)));
    }

    /// 记录一个失败的用例.
    #[inline]
    pub fn count_failure(&mut self) {
        self.failures += 1;
    }

    /// 记录一个成功的用例及其偏差.
    pub fn count_case(&mut self, analytic: f64, eed: f64, angle: f64) {
        self.cases += 1;
        self.analytic_sum += analytic;
        self.analytic_max = self.analytic_max.max(analytic);
        self.eed_max = self.eed_max.max(eed);
        self.angle_max = self.angle_max.max(angle);
    }

    /// 结束全部计时.
    #[inline]
    pub fn finish(mut self) -> Self {
        self.real_time.elapsed();
        self
    }

    /// 获得成功用例个数.
    #[inline]
    pub fn get_cases(&self) -> u64 {
        self.cases
    }

    /// 获得失败用例个数.
    #[inline]
    pub fn get_failures(&self) -> u64 {
        self.failures
    }

    /// 以微秒为单位获得分析用例的总时间.
    #[inline]
    pub fn get_case_time_us(&self) -> u64 {
        self.case_time.get_total_us()
    }

    /// 以微秒为单位获得运行到目前的总自然时间.
    #[inline]
    pub fn get_real_time_us(&self) -> u64 {
        self.real_time.get_total_us()
    }

    /// 以微秒为单位获得分析用例的平均时间.
    #[inline]
    pub fn get_avg_case_time_us(&self) -> Option<f64> {
        match self.cases {
            0 => None,
            n => Some(self.get_case_time_us() as f64 / n as f64),
        }
    }

    /// 获得相对解析值的平均偏差.
    #[inline]
    pub fn get_avg_analytic_deviation(&self) -> Option<f64> {
        match self.cases {
            0 => None,
            n => Some(self.analytic_sum / n as f64),
        }
    }

    /// 获得相对解析值的最大偏差.
    #[inline]
    pub fn get_max_analytic_deviation(&self) -> Option<f64> {
        (self.cases > 0).then_some(self.analytic_max)
    }

    /// 获得相对 EED 的最大偏差.
    #[inline]
    pub fn get_max_eed_deviation(&self) -> Option<f64> {
        (self.cases > 0).then_some(self.eed_max)
    }

    /// 获得最大方向误差 (度).
    #[inline]
    pub fn get_max_angle_error(&self) -> Option<f64> {
        (self.cases > 0).then_some(self.angle_max)
    }

    /// 获取最耗时的一次分析所消耗的时间. 如果不存在任务, 则返回 `None`.
    #[inline]
    pub fn get_most_time_consuming(&self) -> Option<Duration> {
        self.most
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Profile;

    #[test]
    fn test_profile_statistics() {
        let mut p = Profile::new();
        assert_eq!(p.get_avg_analytic_deviation(), None);
        assert_eq!(p.get_most_time_consuming(), None);

        p.case_start();
        p.case_elapsed();
        p.count_case(0.02, 0.1, 1.0);
        p.count_case(0.04, 0.05, 3.0);
        p.count_failure();
        let p = p.finish();

        assert_eq!(p.get_cases(), 2);
        assert_eq!(p.get_failures(), 1);
        assert!((p.get_avg_analytic_deviation().unwrap() - 0.03).abs() < 1e-12);
        assert_eq!(p.get_max_analytic_deviation(), Some(0.04));
        assert_eq!(p.get_max_eed_deviation(), Some(0.1));
        assert_eq!(p.get_max_angle_error(), Some(3.0));
        assert!(p.get_most_time_consuming().is_some());
    }
}
