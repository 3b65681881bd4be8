// crates/cfv_physics/src/numerics/reconstruction/muscl.rs

//! MUSCL van Albada 重构
//!
//! 沿面轴（两单元中心连线）做一维 MUSCL 插值，k = 1/3：
//!
//! Δ̄  = u_R − u_L（中心差分），
//! Δ⁻ = 2∇u_L·d − Δ̄（左侧回退差分），Δ⁺ = 2∇u_R·d − Δ̄，
//! φ  = max(0, (2ΔΔ̄ + ϵ)/(Δ² + Δ̄² + ϵ))（van Albada），
//! u_L^f = u_L + φ_L/4[(1−kφ_L)Δ⁻ + (1+kφ_L)Δ̄]，右侧对称取负。

use super::traits::{across, SolutionReconstruction};
use crate::numerics::gradient::CellGradients;
use cfv_foundation::NVARS;
use cfv_mesh::UnstructuredMesh2d;
use glam::DVec2;
use rayon::prelude::*;

const MUSCL_K: f64 = 1.0 / 3.0;
const VA_EPS: f64 = 1e-14;

/// MUSCL van Albada 重构
#[derive(Debug, Clone, Copy, Default)]
pub struct MusclVanAlbada;

/// van Albada 限制因子
#[inline]
fn van_albada(a: f64, b: f64) -> f64 {
    ((2.0 * a * b + VA_EPS) / (a * a + b * b + VA_EPS)).max(0.0)
}

impl SolutionReconstruction for MusclVanAlbada {
    fn name(&self) -> &'static str {
        "MUSCL van Albada"
    }

    fn compute_face_values(
        &self,
        mesh: &UnstructuredMesh2d,
        rc: &[DVec2],
        u: &[[f64; NVARS]],
        ug: &[[f64; NVARS]],
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
                let l = mesh.face_left(face);
                let nb = mesh.face_right(face);
                let (unb, rnb) = across(mesh, rc, u, ug, nb);
                let d = rnb - rc[l];

                for var in 0..NVARS {
                    let central = unb[var] - u[l][var];
                    let backward = 2.0 * grads[l][var].dot(d) - central;
                    let phi = van_albada(backward, central);
                    ul[var] = u[l][var]
                        + 0.25
                            * phi
                            * ((1.0 - MUSCL_K * phi) * backward
                                + (1.0 + MUSCL_K * phi) * central);
                }

                if face >= nbf {
                    for var in 0..NVARS {
                        let central = unb[var] - u[l][var];
                        let forward = 2.0 * grads[nb][var].dot(d) - central;
                        let phi = van_albada(forward, central);
                        ur[var] = unb[var]
                            - 0.25
                                * phi
                                * ((1.0 - MUSCL_K * phi) * forward
                                    + (1.0 + MUSCL_K * phi) * central);
                    }
                }
            });
    }
}
