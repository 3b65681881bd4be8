// crates/cfv_physics/src/spatial/mod.rs

//! 空间离散组装器
//!
//! - [`assembler`]: [`FlowAssembler`]，边界状态填充、可选二阶重构、
//!   面通量累加、谱半径累加与雅可比装配
//! - [`viscous`]: 粘性通量（修正平均面梯度）及其薄层雅可比
//! - [`surface`]: 壁面压力/摩擦系数与升阻力系数
//! - [`accumulate`]: 面并行的原子 f64 累加缓冲
//!
//! 二阶开关与常粘性开关是编译期常量参数（四个特化），由
//! [`create_solver`] 按配置选择，消除每面分支。

pub mod accumulate;
pub mod assembler;
pub mod surface;
pub mod viscous;

pub use assembler::FlowAssembler;
pub use surface::SurfaceData;

use crate::numerics::gradient::CellGradients;
use crate::numerics::linear_algebra::BlockMatrix;
use cfv_config::SolverConfig;
use cfv_foundation::{FvResult, NVARS};
use cfv_mesh::UnstructuredMesh2d;

/// 空间离散对外接口
///
/// 残差按 −r(u) 装配；雅可比装配正残差的 ∂r/∂u。
pub trait FlowSolver: Send + Sync {
    /// 单元数
    fn n_cells(&self) -> usize;

    /// 来流守恒状态
    fn freestream(&self) -> [f64; NVARS];

    /// 以来流状态初始化未知量
    fn initialize_unknowns(&self) -> Vec<[f64; NVARS]>;

    /// 组装残差；`time_steps` 给定时同时计算各单元的局部时间步
    fn assemble_residual(
        &self,
        u: &[[f64; NVARS]],
        residual: &mut [[f64; NVARS]],
        time_steps: Option<&mut [f64]>,
    ) -> FvResult<()>;

    /// 向块稀疏矩阵累加 ∂r/∂u
    fn assemble_jacobian(&self, u: &[[f64; NVARS]], matrix: &dyn BlockMatrix) -> FvResult<()>;

    /// 守恒变量的单元梯度（幽灵状态由边界条件补全）
    fn compute_gradients(&self, u: &[[f64; NVARS]]) -> FvResult<Vec<CellGradients>>;

    /// 指定壁面标记的表面数据
    fn compute_surface_data(
        &self,
        u: &[[f64; NVARS]],
        grads: &[CellGradients],
        wall_marker: i32,
    ) -> SurfaceData;
}

/// 按配置构建空间离散
///
/// 二阶与常粘性两个布尔在此处一次性特化为四个组装器之一。
pub fn create_solver<'m>(
    mesh: &'m UnstructuredMesh2d,
    config: &SolverConfig,
) -> FvResult<Box<dyn FlowSolver + 'm>> {
    let solver: Box<dyn FlowSolver + 'm> = match (config.numerics.order2, config.physics.const_visc)
    {
        (true, true) => Box::new(FlowAssembler::<true, true>::new(mesh, config)?),
        (true, false) => Box::new(FlowAssembler::<true, false>::new(mesh, config)?),
        (false, true) => Box::new(FlowAssembler::<false, true>::new(mesh, config)?),
        (false, false) => Box::new(FlowAssembler::<false, false>::new(mesh, config)?),
    };
    Ok(solver)
}
