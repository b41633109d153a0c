//! 体型特异性剂量估计 (SSDE).
//!
//! 根据 AAPM Report 204, 换算系数 `f` 是病人等效直径 `D` (厘米) 的指数函数
//! `f(D) = a * exp(-b * D)`, `SSDE = f(D) * CTDIvol`. 参数取决于 CTDIvol 所用的参考体模.
//!
//! `D` 可以取 EED 或 EAD (Report 204), 也可以取 WED (Report 220).

#[cfg(feature = "serde")]
use serde::Serialize;

/// CTDIvol 的参考体模.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ReferencePhantom {
    /// 直径 32 cm 的体部体模.
    Body32,

    /// 直径 16 cm 的头部体模.
    Head16,
}

impl ReferencePhantom {
    /// 指数拟合参数 `(a, b)`.
    #[inline]
    pub fn coefficients(&self) -> (f64, f64) {
        match self {
            Self::Body32 => (3.704369, 0.03671937),
            Self::Head16 => (1.874799, 0.03871313),
        }
    }
}

/// 等效直径为 `diameter_cm` 时的换算系数. 直径不是有限正数时返回 `None`.
pub fn conversion_factor(diameter_cm: f64, phantom: ReferencePhantom) -> Option<f64> {
    if !(diameter_cm.is_finite() && diameter_cm > 0.0) {
        return None;
    }
    let (a, b) = phantom.coefficients();
    Some(a * (-b * diameter_cm).exp())
}

/// 由 CTDIvol (mGy) 和等效直径 (厘米) 计算 SSDE (mGy).
#[inline]
pub fn ssde(ctdi_vol: f64, diameter_cm: f64, phantom: ReferencePhantom) -> Option<f64> {
    conversion_factor(diameter_cm, phantom).map(|f| f * ctdi_vol)
}
