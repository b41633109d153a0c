//! CT 扫描/病人掩膜二维切片对象.

mod core;
mod iter;

pub(crate) use self::core::view_2d;
pub use self::core::{Extent, MaskSlice, ScanSlice};
