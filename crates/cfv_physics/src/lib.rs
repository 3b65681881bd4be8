// crates/cfv_physics/src/lib.rs

//! CFV 物理求解核心
//!
//! 二维单元中心有限体积法的空间离散：给定单元守恒变量场，计算半离散
//! 残差 r(u) = Σ_f (F_inv − F_visc)·len，并可选装配隐式求解所需的
//! 4×4 块稀疏雅可比 ∂r/∂u。
//!
//! # 模块概览
//!
//! - [`gas`]: 理想气体物性、原始/守恒变换及其解析导数
//! - [`schemes`]: 无粘数值通量族（LLF/Van Leer/AUSM/AUSM+/Roe/HLL/HLLC）
//! - [`boundary`]: 边界条件族（幽灵状态及其雅可比）
//! - [`numerics`]: 梯度格式、面值重构/限制器、块稀疏矩阵
//! - [`spatial`]: 残差/雅可比组装器、粘性通量、表面数据
//!
//! # 符号约定
//!
//! 残差按 −r(u) 装配：du/dt + r(u) = 0 存储为 du/dt = residual / A。
//! 每个面的 F·len 从左单元减去、加到右单元。雅可比装配的是正残差的
//! ∂r/∂u，供 Newton 迭代直接使用。

pub mod boundary;
pub mod gas;
pub mod numerics;
pub mod schemes;
pub mod spatial;

pub use gas::IdealGasPhysics;
pub use schemes::{create_inviscid_flux, InviscidFlux};
pub use boundary::{create_boundary_registry, BcRegistry, FlowBc};
pub use numerics::gradient::{create_gradient_scheme, GradientScheme};
pub use numerics::linear_algebra::{BlockMatrix, BsrMatrix};
pub use numerics::reconstruction::{create_reconstruction, SolutionReconstruction};
pub use spatial::{create_solver, FlowAssembler, FlowSolver, SurfaceData};
