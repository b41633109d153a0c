//! 通用常量.

/// HU (Hounsfield Unit) 相关常量.
pub mod hu {
    /// 水的 HU 值.
    pub const WATER: f64 = 0.0;

    /// 空气的 HU 值.
    pub const AIR: f64 = -1000.0;

    /// HU 值到相对 (于水的) 密度的换算尺度.
    pub const DENSITY_SCALE: f64 = 1000.0;

    /// 将 HU 值换算为相对于水的物理密度: 水为 `1.0`, 空气为 `0.0`.
    ///
    /// 低于空气的值得到负的密度, 不做截断.
    #[inline]
    pub fn relative_density(hu: f64) -> f64 {
        (hu - AIR) / DENSITY_SCALE
    }
}

/// 一厘米对应的毫米数. 体素分辨率以毫米保存, 直径以厘米输出.
pub const MM_PER_CM: f64 = 10.0;

/// 默认角度扫描步长 (单位: 度).
pub const DEFAULT_ANGLE_STEP: f64 = 1.0;

/// 角度扫描区间 `[0, ANGLE_RANGE_END)` 的上界 (单位: 度).
pub const ANGLE_RANGE_END: f64 = 180.0;

/// 两个投影宽度之差不超过该值 (单位: 像素) 时视为相等.
pub const WIDTH_TIE_EPS: f64 = 1e-9;

/// 交叉校验时默认允许的相对偏差.
pub const DEFAULT_AGREEMENT_TOLERANCE: f64 = 0.05;
