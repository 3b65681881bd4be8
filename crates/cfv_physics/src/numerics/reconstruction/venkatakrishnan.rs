// crates/cfv_physics/src/numerics/reconstruction/venkatakrishnan.rs

//! Venkatakrishnan 限制重构
//!
//! Barth-Jespersen 的光滑变体：min 比值替换为有理光滑函数
//!
//! ψ = (1/Δ⁻)·[(Δ⁺² + ε²)Δ⁻ + 2Δ⁻²Δ⁺] / [Δ⁺² + 2Δ⁻² + Δ⁺Δ⁻ + ε²]
//!
//! 阈值 ε² = (K·h)³（h 为单元特征长度），使光滑流动中限制器不被触发，
//! 保持收敛到定常解的能力。K 由调用方的限制器参数给出。

use super::barth_jespersen::{cell_limiters, fill_face_values};
use super::traits::SolutionReconstruction;
use crate::numerics::gradient::CellGradients;
use cfv_foundation::{NVARS, SMALL_NUMBER};
use cfv_mesh::UnstructuredMesh2d;
use glam::DVec2;

/// Venkatakrishnan 限制重构
#[derive(Debug, Clone, Copy)]
pub struct VenkatakrishnanReconstruction {
    /// K 参数：大 → 弱限制（光滑流动），小 → 强限制（激波）
    k: f64,
}

impl VenkatakrishnanReconstruction {
    /// 以 K 参数创建
    pub fn new(k: f64) -> Self {
        Self { k }
    }

    /// 光滑限制函数
    #[inline]
    fn psi(dp: f64, dm: f64, eps2: f64) -> f64 {
        let num = (dp * dp + eps2) * dm + 2.0 * dm * dm * dp;
        let den = dp * dp + 2.0 * dm * dm + dp * dm + eps2;
        if den.abs() < SMALL_NUMBER {
            return 1.0;
        }
        (num / den / dm).min(1.0)
    }
}

impl SolutionReconstruction for VenkatakrishnanReconstruction {
    fn name(&self) -> &'static str {
        "Venkatakrishnan"
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
        let k = self.k;
        let phi = cell_limiters(mesh, rc, u, ug, grads, |dp, dm, cell| {
            // h 取等效边长 √A
            let h = mesh.cell_area(cell).sqrt();
            let eps2 = (k * h).powi(3);
            Self::psi(dp, dm, eps2)
        });
        fill_face_values(mesh, rc, u, grads, &phi, uleft, uright);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerics::reconstruction::recon_tests::check_linear_exactness;

    #[test]
    fn test_psi_range_and_smooth_limit() {
        // Δ⁺ = 2Δ⁻ 时 ψ 恰为 1（线性场情形）
        assert!((VenkatakrishnanReconstruction::psi(0.4, 0.2, 0.0) - 1.0).abs() < 1e-13);
        // 大 ε²（光滑流判据）下 ψ → 1
        assert!((VenkatakrishnanReconstruction::psi(0.01, 0.05, 10.0) - 1.0).abs() < 1e-2);
        // 极值附近（Δ⁺ = 0）强限制
        let psi = VenkatakrishnanReconstruction::psi(0.0, 0.3, 1e-6);
        assert!(psi > 0.0 && psi < 0.1);
    }

    #[test]
    fn test_k_monotonicity() {
        // K 越大限制越弱
        let mut prev = 0.0;
        for &k3 in &[1e-6, 1e-3, 1.0, 1e3] {
            let psi = VenkatakrishnanReconstruction::psi(0.05, 0.2, k3);
            assert!(psi >= prev);
            prev = psi;
        }
    }

    #[test]
    fn test_venkatakrishnan_linear_field() {
        check_linear_exactness(&VenkatakrishnanReconstruction::new(2.0), 1e-10);
    }
}
