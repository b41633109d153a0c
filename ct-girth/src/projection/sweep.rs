//! 角度扫描配置.

use crate::consts::{ANGLE_RANGE_END, DEFAULT_ANGLE_STEP};
use crate::{DiameterError, DiameterResult, Idx2d};

#[cfg(feature = "serde")]
use serde::Serialize;

/// 投影角度扫描. 角度范围固定为 `[0, 180)` 度, 依次为 `0, step, 2 * step, ...`.
///
/// 0 度方向测量水平 (列方向, 左右) 宽度, 90 度方向测量垂直 (行方向, 前后) 宽度.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AngleSweep {
    step: f64,
}

impl Default for AngleSweep {
    /// 以 1 度为步长.
    fn default() -> Self {
        Self {
            step: DEFAULT_ANGLE_STEP,
        }
    }
}

impl AngleSweep {
    /// 以步长 `step_degrees` (单位: 度) 构建. 步长必须是 `(0, 90]` 内的有限数,
    /// 否则返回 `Err(DiameterError::InvalidAngleStep)`.
    pub fn new(step_degrees: f64) -> DiameterResult<Self> {
        if step_degrees.is_finite() && step_degrees > 0.0 && step_degrees <= 90.0 {
            Ok(Self { step: step_degrees })
        } else {
            Err(DiameterError::InvalidAngleStep(step_degrees))
        }
    }

    /// 扫描步长, 度.
    #[inline]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// 按升序获取所有扫描角度 (度).
    pub fn angles(&self) -> impl Iterator<Item = f64> {
        let step = self.step;
        (0..)
            .map(move |i| i as f64 * step)
            .take_while(|a| *a < ANGLE_RANGE_END)
    }

    /// 扫描角度个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.angles().count()
    }

    /// 是否不含任何角度? 合法的扫描至少包含 0 度, 因此总是返回 `false`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// 按升序获取所有扫描方向.
    pub(crate) fn directions(&self) -> Vec<Direction> {
        self.angles().map(Direction::new).collect()
    }
}

/// 一个投影方向, 缓存了正余弦值.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Direction {
    angle: f64,
    sin: f64,
    cos: f64,
}

impl Direction {
    /// 以角度 `angle` (度) 构建. 0 度与 90 度使用精确的正余弦值,
    /// 使得坐标轴方向的投影与外接范围严格一致.
    pub(crate) fn new(angle: f64) -> Self {
        let (sin, cos) = if angle == 0.0 {
            (0.0, 1.0)
        } else if angle == 90.0 {
            (1.0, 0.0)
        } else {
            angle.to_radians().sin_cos()
        };
        Self { angle, sin, cos }
    }

    #[inline]
    pub(crate) fn angle(&self) -> f64 {
        self.angle
    }

    /// 像素中心 `(h, w)` 在该方向上的投影坐标 `w * cos + h * sin`.
    #[inline]
    pub(crate) fn project(&self, (h, w): Idx2d) -> f64 {
        w as f64 * self.cos + h as f64 * self.sin
    }
}

#[cfg(test)]
mod tests {
    use super::{AngleSweep, Direction};
    use crate::DiameterError;
    use rstest::rstest;

    #[test]
    fn test_default_sweep() {
        let s = AngleSweep::default();
        assert_eq!(s.len(), 180);
        let angles: Vec<_> = s.angles().collect();
        assert_eq!(angles[0], 0.0);
        assert_eq!(angles[90], 90.0);
        assert_eq!(angles[179], 179.0);
    }

    #[rstest]
    #[case(90.0, 2)]
    #[case(45.0, 4)]
    #[case(7.0, 26)]
    #[case(0.5, 360)]
    fn test_sweep_len(#[case] step: f64, #[case] len: usize) {
        let s = AngleSweep::new(step).unwrap();
        assert_eq!(s.len(), len);
        assert!(s.angles().all(|a| (0.0..180.0).contains(&a)));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(90.5)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_invalid_step(#[case] step: f64) {
        assert!(matches!(
            AngleSweep::new(step),
            Err(DiameterError::InvalidAngleStep(_))
        ));
    }

    #[test]
    fn test_cardinal_directions_are_exact() {
        let d0 = Direction::new(0.0);
        let d90 = Direction::new(90.0);
        assert_eq!(d0.project((7, 3)), 3.0);
        assert_eq!(d90.project((7, 3)), 7.0);
        assert_eq!(d90.angle(), 90.0);
    }
}
