// crates/cfv_physics/src/numerics/linear_algebra/mod.rs

//! 线性代数后端
//!
//! 隐式装配的目标是 4×4 块稀疏矩阵，经 [`BlockMatrix`] 接口写入。
//! [`BsrMatrix`] 为自带的块 CSR 实现，供测试与自含求解使用；
//! 外部线性求解器只需实现同一接口。

pub mod bsr;

pub use bsr::{BlockMatrix, BsrMatrix};
