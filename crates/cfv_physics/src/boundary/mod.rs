// crates/cfv_physics/src/boundary/mod.rs

//! 边界条件族
//!
//! 每个边界条件根据内部状态与面外法向给出幽灵状态 u_g 及
//! ∂u_g/∂u_i（NVARS×NVARS）。幽灵单元统一内部与边界的通量格式：
//! 边界面通量即 F(u_i, u_g, n̂)。
//!
//! - [`conditions`]: [`FlowBc`] 接口与全部边界条件实现
//! - [`registry`]: 标记 → 边界条件对象的注册表与覆盖性检查
//!
//! 周期边界不产生幽灵状态：边界状态填充阶段直接通过网格的周期映射
//! 复制配对面的内侧值，注册表只记录周期标记。

pub mod conditions;
pub mod registry;

pub use conditions::{
    AdiabaticWall, Extrapolation, Farfield, FlowBc, InOutFlow, IsothermalWall, SlipWall,
    SubsonicInflow,
};
pub use registry::{create_boundary_registry, BcRegistry};
