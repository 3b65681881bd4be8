// crates/cfv_physics/src/numerics/reconstruction/linear.rs

//! 无限制线性重构
//!
//! u_face = u_c + ∇u_c·(r_face − r_c)，面取值点为面中点。

use super::traits::SolutionReconstruction;
use crate::numerics::gradient::CellGradients;
use cfv_foundation::NVARS;
use cfv_mesh::UnstructuredMesh2d;
use glam::DVec2;
use rayon::prelude::*;

/// 无限制线性重构
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearReconstruction;

impl SolutionReconstruction for LinearReconstruction {
    fn name(&self) -> &'static str {
        "unlimited linear"
    }

    fn compute_face_values(
        &self,
        mesh: &UnstructuredMesh2d,
        rc: &[DVec2],
        u: &[[f64; NVARS]],
        _ug: &[[f64; NVARS]],
        grads: &[CellGradients],
        uleft: &mut [[f64; NVARS]],
        uright: &mut [[f64; NVARS]],
    ) {
        let nbf = mesh.n_boundary_faces();
        uleft
            .par_iter_mut()
            .zip(uright.par_iter_mut())
            .enumerate()
            .for_each(|(face, (ul, ur))| {
                let mid = mesh.face_midpoint(face);
                let l = mesh.face_left(face);
                for var in 0..NVARS {
                    ul[var] = u[l][var] + grads[l][var].dot(mid - rc[l]);
                }
                if face >= nbf {
                    let r = mesh.face_right(face);
                    for var in 0..NVARS {
                        ur[var] = u[r][var] + grads[r][var].dot(mid - rc[r]);
                    }
                }
            });
    }
}
