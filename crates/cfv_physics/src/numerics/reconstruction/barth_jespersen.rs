// crates/cfv_physics/src/numerics/reconstruction/barth_jespersen.rs

//! Barth-Jespersen 限制重构
//!
//! 每个单元对每个变量取
//! φ = min_f ψ(Δ⁺, Δ⁻_f)，ψ 为钳制到 [0,1] 的比值限制，
//! Δ⁺ 为邻居极值与单元值之差，Δ⁻_f = ∇u_c·(r_f − r_c)。
//! 重构使用 φ∇u_c，保证面值不越过邻居数据范围。

use super::traits::{across, SolutionReconstruction};
use crate::numerics::gradient::CellGradients;
use cfv_foundation::{NVARS, SMALL_NUMBER};
use cfv_mesh::UnstructuredMesh2d;
use glam::DVec2;
use rayon::prelude::*;

/// Barth-Jespersen 限制重构
#[derive(Debug, Clone, Copy, Default)]
pub struct BarthJespersenReconstruction;

/// 每单元每变量的限制因子
pub(super) fn cell_limiters<F>(
    mesh: &UnstructuredMesh2d,
    rc: &[DVec2],
    u: &[[f64; NVARS]],
    ug: &[[f64; NVARS]],
    grads: &[CellGradients],
    psi: F,
) -> Vec<[f64; NVARS]>
where
    F: Fn(f64, f64, usize) -> f64 + Sync,
{
    (0..mesh.n_cells())
        .into_par_iter()
        .map(|cell| {
            // 邻居极值
            let mut umin = u[cell];
            let mut umax = u[cell];
            for &face in mesh.cell_faces(cell) {
                let nb = mesh.neighbor_across(cell, face);
                let (unb, _) = across(mesh, rc, u, ug, nb);
                for var in 0..NVARS {
                    umin[var] = umin[var].min(unb[var]);
                    umax[var] = umax[var].max(unb[var]);
                }
            }

            let mut phi = [1.0_f64; NVARS];
            for &face in mesh.cell_faces(cell) {
                let mid = mesh.face_midpoint(face);
                for var in 0..NVARS {
                    let dm = grads[cell][var].dot(mid - rc[cell]);
                    if dm.abs() < SMALL_NUMBER {
                        continue;
                    }
                    let dp = if dm > 0.0 {
                        umax[var] - u[cell][var]
                    } else {
                        umin[var] - u[cell][var]
                    };
                    phi[var] = phi[var].min(psi(dp, dm, cell));
                }
            }
            phi
        })
        .collect()
}

/// 用限制后的梯度填充面值
pub(super) fn fill_face_values(
    mesh: &UnstructuredMesh2d,
    rc: &[DVec2],
    u: &[[f64; NVARS]],
    grads: &[CellGradients],
    phi: &[[f64; NVARS]],
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
                ul[var] = u[l][var] + phi[l][var] * grads[l][var].dot(mid - rc[l]);
            }
            if face >= nbf {
                let r = mesh.face_right(face);
                for var in 0..NVARS {
                    ur[var] = u[r][var] + phi[r][var] * grads[r][var].dot(mid - rc[r]);
                }
            }
        });
}

impl SolutionReconstruction for BarthJespersenReconstruction {
    fn name(&self) -> &'static str {
        "Barth-Jespersen"
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
        let phi = cell_limiters(mesh, rc, u, ug, grads, |dp, dm, _| {
            (dp / dm).clamp(0.0, 1.0)
        });
        fill_face_values(mesh, rc, u, grads, &phi, uleft, uright);
    }
}
