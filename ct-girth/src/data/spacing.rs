//! 体素分辨率.

use crate::consts::MM_PER_CM;
use crate::{DiameterError, DiameterResult};

#[cfg(feature = "serde")]
use serde::Serialize;

/// 单个切片的物理像素尺寸, 以毫米为单位.
///
/// `x` 为宽 (自然图像的水平方向, 即列方向) 分辨率, `y` 为高 (垂直方向, 即行方向)
/// 分辨率, `z` 为可选的层厚方向分辨率.
///
/// 该结构是只读的. 若要修改, 你应该创建新的实例.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct VoxelSpacing {
    x: f64,
    y: f64,
    z: Option<f64>,
}

/// 检查 `value` 是否为合法的分辨率分量.
#[inline]
fn checked(axis: char, value: f64) -> DiameterResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(DiameterError::InvalidSpacing { axis, value })
    }
}

impl VoxelSpacing {
    /// 以宽 `x` 和高 `y` 方向的分辨率 (毫米) 构建.
    ///
    /// 两者都必须是有限正数, 否则返回 `Err(DiameterError::InvalidSpacing)`.
    pub fn new(x: f64, y: f64) -> DiameterResult<Self> {
        Ok(Self {
            x: checked('x', x)?,
            y: checked('y', y)?,
            z: None,
        })
    }

    /// 附加层厚方向分辨率 `z` (毫米).
    pub fn with_z(self, z: f64) -> DiameterResult<Self> {
        Ok(Self {
            z: Some(checked('z', z)?),
            ..self
        })
    }

    /// 宽方向 (列) 分辨率, 毫米.
    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// 高方向 (行) 分辨率, 毫米.
    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// 层厚方向分辨率, 毫米. 未知时返回 `None`.
    #[inline]
    pub fn z(&self) -> Option<f64> {
        self.z
    }

    /// 以 `x` 方向分辨率将像素长度换算为厘米.
    #[inline]
    pub fn px_to_cm(&self, px: f64) -> f64 {
        px * self.x / MM_PER_CM
    }

    /// 以 `x` 方向分辨率将厘米换算回像素长度.
    #[inline]
    pub fn cm_to_px(&self, cm: f64) -> f64 {
        cm * MM_PER_CM / self.x
    }

    /// 以 `y` 方向分辨率将 (行方向) 像素长度换算为厘米.
    #[inline]
    pub fn height_px_to_cm(&self, px: f64) -> f64 {
        px * self.y / MM_PER_CM
    }
}

#[cfg(test)]
mod tests {
    use super::VoxelSpacing;
    use crate::DiameterError;

    #[test]
    fn test_spacing_invalid_input() {
        assert_eq!(
            VoxelSpacing::new(0.0, 1.0).unwrap_err(),
            DiameterError::InvalidSpacing {
                axis: 'x',
                value: 0.0
            }
        );
        assert!(VoxelSpacing::new(1.0, -0.5).is_err());
        assert!(VoxelSpacing::new(f64::NAN, 1.0).is_err());
        assert!(VoxelSpacing::new(1.0, f64::INFINITY).is_err());
        let s = VoxelSpacing::new(1.0, 1.0).unwrap();
        assert!(matches!(
            s.with_z(0.0),
            Err(DiameterError::InvalidSpacing { axis: 'z', .. })
        ));
    }

    #[test]
    fn test_spacing_conversion() {
        let s = VoxelSpacing::new(0.5, 0.8).unwrap().with_z(2.5).unwrap();
        assert_eq!(s.z(), Some(2.5));
        assert_eq!(s.px_to_cm(100.0), 5.0);
        assert_eq!(s.cm_to_px(5.0), 100.0);
        assert_eq!(s.height_px_to_cm(100.0), 8.0);
    }
}
