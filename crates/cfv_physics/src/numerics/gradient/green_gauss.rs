// crates/cfv_physics/src/numerics/gradient/green_gauss.rs

//! Green-Gauss 梯度
//!
//! ∇u_c = (1/A_c) Σ_{f∈c} ū_f n_f len_f，面值 ū_f 为两侧单元中心值的
//! 反距离加权平均（边界面用幽灵值与幽灵中心）。逐单元并行，无写冲突。

use super::traits::{neighbor_value, CellGradients, GradientScheme};
use cfv_foundation::{NVARS, SMALL_NUMBER};
use cfv_mesh::UnstructuredMesh2d;
use glam::DVec2;
use rayon::prelude::*;

/// Green-Gauss 梯度
#[derive(Debug, Clone, Copy, Default)]
pub struct GreenGaussGradient;

impl GreenGaussGradient {
    fn cell_gradient(
        &self,
        mesh: &UnstructuredMesh2d,
        rc: &[DVec2],
        u: &[[f64; NVARS]],
        ug: &[[f64; NVARS]],
        cell: usize,
    ) -> CellGradients {
        let area = mesh.cell_area(cell);
        let center = rc[cell];
        let mut grad = [DVec2::ZERO; NVARS];

        for &face in mesh.cell_faces(cell) {
            let nb = mesh.neighbor_across(cell, face);
            let (unb, rnb) = neighbor_value(mesh, rc, u, ug, nb);

            // 法向从左指向右：本单元为右侧时取负号
            let sign = if mesh.face_left(face) == cell { 1.0 } else { -1.0 };
            let ds = mesh.face_normal(face) * (mesh.face_length(face) * sign);

            let mid = mesh.face_midpoint(face);
            let d_self = (mid - center).length();
            let d_nb = (mid - rnb).length();
            let denom = d_self + d_nb;

            for var in 0..NVARS {
                // 反距离加权：靠近面的单元权重大
                let uf = if denom < SMALL_NUMBER {
                    0.5 * (u[cell][var] + unb[var])
                } else {
                    (u[cell][var] * d_nb + unb[var] * d_self) / denom
                };
                grad[var] += ds * uf;
            }
        }

        for g in grad.iter_mut() {
            *g /= area;
        }
        grad
    }
}

impl GradientScheme for GreenGaussGradient {
    fn name(&self) -> &'static str {
        "Green-Gauss"
    }

    fn compute_gradients(
        &self,
        mesh: &UnstructuredMesh2d,
        rc: &[DVec2],
        u: &[[f64; NVARS]],
        ug: &[[f64; NVARS]],
        grads: &mut [CellGradients],
    ) {
        grads
            .par_iter_mut()
            .enumerate()
            .for_each(|(cell, g)| *g = self.cell_gradient(mesh, rc, u, ug, cell));
    }
}
