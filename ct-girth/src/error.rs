//! 运行时错误.

use crate::Idx2d;
use thiserror::Error;

/// 等效直径计算的结果类型.
pub type DiameterResult<T> = Result<T, DiameterError>;

/// 等效直径计算的运行时错误.
///
/// 所有错误都在计算开始前 (或在发现退化输入时) 同步产生, 不会重试, 也不会被降级为警告.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiameterError {
    /// 体素分辨率不是有限正数. `axis` 为出错的轴 (`'x'`, `'y'` 或 `'z'`).
    #[error("非法体素分辨率: {axis} = {value} mm")]
    InvalidSpacing {
        /// 出错的轴.
        axis: char,
        /// 原始值.
        value: f64,
    },

    /// 图像在 `pos` 处的值无法转换为有限的 HU 值.
    #[error("位置 {pos:?} 处的 HU 值不是有限数值")]
    InvalidHu {
        /// 像素位置 `(h, w)`.
        pos: Idx2d,
    },

    /// 角度扫描步长不在 `(0, 90]` 度内.
    #[error("非法角度扫描步长: {0}°")]
    InvalidAngleStep(f64),

    /// 交叉校验容差不是有限非负数.
    #[error("非法交叉校验容差: {0}")]
    InvalidTolerance(f64),

    /// 输入数组维度不对, 例如把整个体数据当作单个切片传入.
    #[error("维度不符: 期望 {expected} 维数组, 实际为 {found} 维")]
    Dimension {
        /// 期望的维度.
        expected: usize,
        /// 实际维度.
        found: usize,
    },

    /// 图像与掩膜形状不一致.
    #[error("形状不一致: 图像 {image:?}, 掩膜 {mask:?}")]
    ShapeMismatch {
        /// 图像形状.
        image: Vec<usize>,
        /// 掩膜形状.
        mask: Vec<usize>,
    },

    /// 体素分辨率个数与切片个数不符.
    #[error("体素分辨率个数 {spacings} 与切片数 {slices} 不符")]
    SpacingCount {
        /// 体素分辨率个数.
        spacings: usize,
        /// 切片个数.
        slices: usize,
    },

    /// 掩膜中没有任何前景像素, 无可测量的解剖结构.
    #[error("掩膜为空, 无可测量的解剖结构")]
    EmptyMask,

    /// 第 `index` 个切片计算失败.
    #[error("第 {index} 个切片: {source}")]
    Slice {
        /// 切片索引.
        index: usize,
        /// 切片上的原始错误.
        #[source]
        source: Box<DiameterError>,
    },
}

/// 错误分类.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// 输入不是期望的类型或取值 (分辨率、HU 值、配置参数).
    InvalidType,

    /// 形状/维度不符.
    InvalidShape,

    /// 退化输入 (空掩膜).
    DegenerateInput,
}

impl DiameterError {
    /// 包装为带切片索引的错误.
    #[inline]
    pub(crate) fn at_slice(self, index: usize) -> Self {
        Self::Slice {
            index,
            source: Box::new(self),
        }
    }

    /// 获取错误分类. 对 [`DiameterError::Slice`] 返回其内部错误的分类.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSpacing { .. }
            | Self::InvalidHu { .. }
            | Self::InvalidAngleStep(_)
            | Self::InvalidTolerance(_) => ErrorKind::InvalidType,
            Self::Dimension { .. } | Self::ShapeMismatch { .. } | Self::SpacingCount { .. } => {
                ErrorKind::InvalidShape
            }
            Self::EmptyMask => ErrorKind::DegenerateInput,
            Self::Slice { source, .. } => source.kind(),
        }
    }

    /// 出错的切片索引. 如果错误与具体切片无关, 则返回 `None`.
    #[inline]
    pub fn slice_index(&self) -> Option<usize> {
        match self {
            Self::Slice { index, .. } => Some(*index),
            _ => None,
        }
    }
}
