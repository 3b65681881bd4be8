// crates/cfv_physics/src/numerics/gradient/zero.rs

//! 零梯度（一阶格式）

use super::traits::{CellGradients, GradientScheme};
use cfv_foundation::NVARS;
use cfv_mesh::UnstructuredMesh2d;
use glam::DVec2;

/// 零梯度
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroGradient;

impl GradientScheme for ZeroGradient {
    fn name(&self) -> &'static str {
        "none"
    }

    fn compute_gradients(
        &self,
        _mesh: &UnstructuredMesh2d,
        _rc: &[DVec2],
        _u: &[[f64; NVARS]],
        _ug: &[[f64; NVARS]],
        grads: &mut [CellGradients],
    ) {
        for g in grads.iter_mut() {
            *g = [DVec2::ZERO; NVARS];
        }
    }
}
