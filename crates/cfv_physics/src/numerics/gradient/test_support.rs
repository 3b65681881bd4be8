// crates/cfv_physics/src/numerics/gradient/test_support.rs

//! 梯度格式测试工具：线性场精确性检验

use super::traits::{CellGradients, GradientScheme};
use cfv_foundation::NVARS;
use cfv_mesh::{rectangle_grid, RectangleMarkers, UnstructuredMesh2d};
use glam::DVec2;

/// 实单元 + 幽灵单元中心（幽灵中心为关于面中点的反射）
pub fn ghost_centers(mesh: &UnstructuredMesh2d) -> Vec<DVec2> {
    let mut rc = Vec::with_capacity(mesh.n_cells() + mesh.n_boundary_faces());
    for c in 0..mesh.n_cells() {
        rc.push(mesh.cell_center(c));
    }
    for f in 0..mesh.n_boundary_faces() {
        let mid = mesh.face_midpoint(f);
        rc.push(2.0 * mid - mesh.cell_center(mesh.face_left(f)));
    }
    rc
}

/// 线性场 u_var = a_var·x + b_var·y + c_var 上梯度应精确为 (a, b)
pub fn linear_field_check(scheme: &dyn GradientScheme, tol: f64) {
    let mesh = rectangle_grid(5, 4, 1.2, 0.9, RectangleMarkers::default()).unwrap();
    let rc = ghost_centers(&mesh);

    let a = [0.7, -0.3, 1.2, 0.5];
    let b = [-0.2, 0.9, 0.4, -1.1];
    let c = [1.0, 0.5, -0.8, 2.0];
    let eval = |p: DVec2| -> [f64; NVARS] {
        let mut u = [0.0; NVARS];
        for var in 0..NVARS {
            u[var] = a[var] * p.x + b[var] * p.y + c[var];
        }
        u
    };

    let u: Vec<[f64; NVARS]> = (0..mesh.n_cells()).map(|i| eval(rc[i])).collect();
    let ug: Vec<[f64; NVARS]> = (0..mesh.n_boundary_faces())
        .map(|f| eval(rc[mesh.n_cells() + f]))
        .collect();

    let mut grads = vec![[DVec2::ZERO; NVARS]; mesh.n_cells()];
    scheme.compute_gradients(&mesh, &rc, &u, &ug, &mut grads);

    for (cell, g) in grads.iter().enumerate() {
        for var in 0..NVARS {
            assert!(
                (g[var].x - a[var]).abs() < tol && (g[var].y - b[var]).abs() < tol,
                "{}: cell {} var {}: got ({}, {}), want ({}, {})",
                scheme.name(),
                cell,
                var,
                g[var].x,
                g[var].y,
                a[var],
                b[var]
            );
        }
    }
}
