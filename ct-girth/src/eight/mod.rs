//! 邻域索引操作. 用于提取掩膜的前景边缘.

use crate::Idx2d;

/// 获得 `(h, w)` 的 4-邻居索引. 不检查越界.
///
/// 越过左/上边界的分量会回绕为 `usize::MAX`, 因此总会被后续的越界检查过滤掉.
#[inline]
pub(crate) fn neighbour4((h, w): Idx2d) -> [Idx2d; 4] {
    [
        (h.wrapping_sub(1), w),
        (h.saturating_add(1), w),
        (h, w.wrapping_sub(1)),
        (h, w.saturating_add(1)),
    ]
}
