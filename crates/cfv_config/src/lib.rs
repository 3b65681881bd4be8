// crates/cfv_config/src/lib.rs

//! CFV 配置层
//!
//! 全 f64、serde 可序列化的求解器配置。配置错误在加载/校验阶段一次性
//! 报出，进入组装流程后不再出现配置类错误。
//!
//! # 模块概览
//!
//! - [`solver_config`]: 物理/数值/边界条件配置与枚举
//! - [`error`]: 配置错误类型

pub mod error;
pub mod solver_config;

pub use error::ConfigError;
pub use solver_config::{
    BoundaryKindSpec, BoundarySpec, FluxScheme, GradientSchemeKind, MeshSection, NumericsConfig,
    PhysicsConfig, ReconstructionKind, RunSection, SolverConfig,
};
