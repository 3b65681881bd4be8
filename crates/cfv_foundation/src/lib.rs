// crates/cfv_foundation/src/lib.rs

//! CFV 基础层
//!
//! 提供整个工作区共享的基础设施：
//! - [`error`]: 统一错误类型 [`FvError`]
//! - [`tolerance`]: 数值容差常量
//!
//! 本层不依赖工作区内任何其他 crate，禁止引入网格、物理等高层概念。

pub mod error;
pub mod tolerance;

pub use error::{FvError, FvResult};
pub use tolerance::{SMALL_NUMBER, ZERO_TOL};

/// 空间维数（本求解器为二维）
pub const NDIM: usize = 2;

/// 守恒变量个数：(ρ, ρu, ρv, ρE)
pub const NVARS: usize = 4;
