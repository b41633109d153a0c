#![warn(missing_docs)] // <= 合适时移除它.

//! 核心库. 从 CT 扫描的 HU 图像和 (已分割好的) 病人掩膜出发, 逐切片估计病人横截面的
//! "尺寸", 即剂量归一化 (如 SSDE) 所需的各类等效直径.
//!
//! 该 crate 只消费已经计算好的二值掩膜和 HU 体数据, 不负责 DICOM 解析、
//! 病人掩膜分割以及任何文件读写.
//!
//! # 注意
//!
//! 1. 所有公开的计算接口在输入不合法时返回 [`DiameterError`], 而不会 panic.
//!   少数以 `_at` 结尾的索引访问方法在越界时 panic, 与 `ndarray` 的行为一致.
//! 2. 给定相同的输入, 所有结果逐位可复现 (角度扫描集合是固定的).
//!
//! # 开发计划
//!
//! ### 单切片面积/密度等效直径 ✅
//!
//! EAD, WED, EED 以及 LAT/AP 外接尺寸, 掩膜内 HU 均值和中位数.
//!
//! 实现位于 `ct-girth/src/diameter`.
//!
//! ### 正弦图 (Radon) 角度扫描 ✅
//!
//! 对掩膜做 `[0, 180)` 度的投影扫描, 取最大/最小投影宽度及其角度.
//!
//! 实现位于 `ct-girth/src/projection/radon.rs`.
//!
//! ### Hough 直线检测角度扫描 ✅
//!
//! 先提取掩膜 4-邻域边缘, 再在 Hough 参数空间中寻找每个角度下最外侧的两条支撑线.
//! 在对称测试掩膜上与正弦图方法的结果完全一致.
//!
//! 实现位于 `ct-girth/src/projection/hough.rs`.
//!
//! ### 三维体数据逐切片调度 ✅
//!
//! 1. 三组结果序列与切片一一对应. ✅
//! 2. 任一切片失败即整体失败, 错误中携带切片索引. ✅
//! 3. 基于 `rayon` 的并行版本 (保持切片顺序). ✅
//! 4. 不同方法之间的交叉校验, 超出容差时输出警告日志. ✅
//!
//! 实现位于 `ct-girth/src/volume.rs`.
//!
//! ### SSDE 换算系数 ✅
//!
//! AAPM Report 204 的指数拟合.
//!
//! 实现位于 `ct-girth/src/ssde.rs`.
//!
//! ### 三维 (多切片) 等效直径 ❌
//!
//! 不在计划内.
//!
//! # 坐标约定
//!
//! 二维切片一律按 `(h, w)` 索引, 即 (行, 列). 行方向对应病人的前后 (AP) 方向,
//! 列方向对应左右 (LAT) 方向. 体数据按 `(z, h, w)` 存储.

/// 二维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx2d = (usize, usize);

/// 三维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx3d = (usize, usize, usize);

/// 高精度通用索引 / 向量.
pub type Idx2dF = (f64, f64);

/// CT 序列、切片视图与体素分辨率.
mod data;

pub use data::{CtSeries, Extent, MaskSlice, ScanSlice, VoxelSpacing};

pub mod consts;

pub mod diameter;

mod eight;

pub mod error;

pub use error::{DiameterError, DiameterResult, ErrorKind};

pub mod phantom;

pub mod prelude;

pub mod projection;

pub mod ssde;

pub mod volume;
