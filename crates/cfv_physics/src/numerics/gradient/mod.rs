// crates/cfv_physics/src/numerics/gradient/mod.rs

//! 单元梯度格式
//!
//! 输入单元场值与幽灵单元值（含幽灵中心坐标），输出每单元
//! NVARS 个分量的梯度向量。一阶格式使用零梯度。

pub mod green_gauss;
pub mod least_squares;
pub mod traits;
pub mod zero;

#[cfg(test)]
pub(crate) mod test_support;

pub use green_gauss::GreenGaussGradient;
pub use least_squares::WeightedLeastSquaresGradient;
pub use traits::{CellGradients, GradientScheme};
pub use zero::ZeroGradient;

use cfv_config::GradientSchemeKind;
use cfv_mesh::UnstructuredMesh2d;
use glam::DVec2;
use tracing::info;

/// 按配置枚举创建梯度格式
///
/// `rc` 为实单元与幽灵单元中心坐标（长度 n_cells + n_boundary_faces），
/// 最小二乘格式在构造期缓存各单元分解后的法方程。
pub fn create_gradient_scheme(
    kind: GradientSchemeKind,
    mesh: &UnstructuredMesh2d,
    rc: &[DVec2],
) -> Box<dyn GradientScheme> {
    let scheme: Box<dyn GradientScheme> = match kind {
        GradientSchemeKind::None => Box::new(ZeroGradient),
        GradientSchemeKind::Greengauss => Box::new(GreenGaussGradient),
        GradientSchemeKind::Leastsquares => {
            Box::new(WeightedLeastSquaresGradient::new(mesh, rc))
        }
    };
    info!("gradient scheme: {}", scheme.name());
    scheme
}
