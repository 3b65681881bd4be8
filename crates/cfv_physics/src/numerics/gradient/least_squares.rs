// crates/cfv_physics/src/numerics/gradient/least_squares.rs

//! 加权最小二乘梯度
//!
//! 每个单元解
//! min Σ_j w_j²|(u_j − u_c) − ∇u_c·(r_j − r_c)|²，w_j = 1/|r_j − r_c|，
//! 邻居取跨面单元（边界面取幽灵单元）。
//!
//! 2×2 对称正定法方程的逆在构造期逐单元缓存；残差计算阶段只组装
//! 右端并应用缓存的逆矩阵。

use super::traits::{neighbor_value, CellGradients, GradientScheme};
use cfv_foundation::{NVARS, SMALL_NUMBER};
use cfv_mesh::UnstructuredMesh2d;
use glam::DVec2;
use rayon::prelude::*;

/// 缓存的 2×2 逆矩阵（行优先）
#[derive(Debug, Clone, Copy)]
struct Inverse2 {
    a: [[f64; 2]; 2],
}

/// 加权最小二乘梯度
#[derive(Debug, Clone)]
pub struct WeightedLeastSquaresGradient {
    inv: Vec<Inverse2>,
}

impl WeightedLeastSquaresGradient {
    /// 构造并缓存各单元法方程的逆
    pub fn new(mesh: &UnstructuredMesh2d, rc: &[DVec2]) -> Self {
        let inv = (0..mesh.n_cells())
            .map(|cell| {
                let center = rc[cell];
                let (mut a00, mut a01, mut a11) = (0.0, 0.0, 0.0);
                for &face in mesh.cell_faces(cell) {
                    let nb = mesh.neighbor_across(cell, face);
                    let dr = rc[nb] - center;
                    let w2 = 1.0 / dr.length_squared().max(SMALL_NUMBER);
                    a00 += w2 * dr.x * dr.x;
                    a01 += w2 * dr.x * dr.y;
                    a11 += w2 * dr.y * dr.y;
                }
                let det = a00 * a11 - a01 * a01;
                Inverse2 {
                    a: [
                        [a11 / det, -a01 / det],
                        [-a01 / det, a00 / det],
                    ],
                }
            })
            .collect();
        Self { inv }
    }

    fn cell_gradient(
        &self,
        mesh: &UnstructuredMesh2d,
        rc: &[DVec2],
        u: &[[f64; NVARS]],
        ug: &[[f64; NVARS]],
        cell: usize,
    ) -> CellGradients {
        let center = rc[cell];
        let mut rhs = [DVec2::ZERO; NVARS];

        for &face in mesh.cell_faces(cell) {
            let nb = mesh.neighbor_across(cell, face);
            let (unb, rnb) = neighbor_value(mesh, rc, u, ug, nb);
            let dr = rnb - center;
            let w2 = 1.0 / dr.length_squared().max(SMALL_NUMBER);
            for var in 0..NVARS {
                rhs[var] += dr * (w2 * (unb[var] - u[cell][var]));
            }
        }

        let inv = &self.inv[cell].a;
        let mut grad = [DVec2::ZERO; NVARS];
        for var in 0..NVARS {
            grad[var] = DVec2::new(
                inv[0][0] * rhs[var].x + inv[0][1] * rhs[var].y,
                inv[1][0] * rhs[var].x + inv[1][1] * rhs[var].y,
            );
        }
        grad
    }
}

impl GradientScheme for WeightedLeastSquaresGradient {
    fn name(&self) -> &'static str {
        "weighted least-squares"
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerics::gradient::test_support::{ghost_centers, linear_field_check};
    use cfv_mesh::{rectangle_grid, RectangleMarkers};

    #[test]
    fn test_least_squares_linear_exact() {
        let mesh = rectangle_grid(5, 4, 1.2, 0.9, RectangleMarkers::default()).unwrap();
        let rc = ghost_centers(&mesh);
        let scheme = WeightedLeastSquaresGradient::new(&mesh, &rc);
        linear_field_check(&scheme, 1e-10);
    }

    #[test]
    fn test_cached_inverse_spd() {
        let mesh = rectangle_grid(3, 3, 1.0, 1.0, RectangleMarkers::default()).unwrap();
        let rc = ghost_centers(&mesh);
        let scheme = WeightedLeastSquaresGradient::new(&mesh, &rc);
        // 逆矩阵对称且对角为正
        for inv in &scheme.inv {
            assert!((inv.a[0][1] - inv.a[1][0]).abs() < 1e-14);
            assert!(inv.a[0][0] > 0.0 && inv.a[1][1] > 0.0);
        }
    }
}
