// crates/cfv_physics/src/spatial/surface.rs

//! 壁面表面数据
//!
//! 指定壁面标记上逐面输出 (x, y, C_p, C_f)，并累积升力与压差/摩擦
//! 阻力系数。无量纲约定下 C_p = 2(p − p_∞)，C_f = 2τ_w。

use cfv_foundation::NVARS;

use super::assembler::FlowAssembler;
use crate::numerics::gradient::CellGradients;

/// 表面数据
#[derive(Debug, Clone, Default)]
pub struct SurfaceData {
    /// 升力系数
    pub cl: f64,
    /// 压差阻力系数
    pub cdp: f64,
    /// 摩擦阻力系数
    pub cdf: f64,
    /// 逐面记录 [x, y, C_p, C_f]
    pub records: Vec<[f64; 4]>,
}

impl<'m, const SECOND_ORDER: bool, const CONST_VISC: bool>
    FlowAssembler<'m, SECOND_ORDER, CONST_VISC>
{
    /// 计算指定壁面标记的表面数据
    ///
    /// `grads` 为守恒变量梯度（[`super::FlowSolver::compute_gradients`]
    /// 的输出），摩擦系数从其速度梯度张量重构。
    pub(super) fn surface_data(
        &self,
        u: &[[f64; NVARS]],
        grads: &[CellGradients],
        wall_marker: i32,
    ) -> SurfaceData {
        let phys = &self.physics;
        let mesh = self.mesh;
        let pinf = phys.freestream_pressure();

        // 来流方向与其法向
        let av = [self.aoa.cos(), self.aoa.sin()];
        let flownormal = [-av[1], av[0]];

        let mut data = SurfaceData::default();
        let mut total_len = 0.0;

        for face in 0..mesh.n_boundary_faces() {
            if mesh.face_marker(face) != wall_marker {
                continue;
            }
            let lelem = mesh.face_left(face);
            let n = mesh.face_normal(face);
            let len = mesh.face_length(face);
            total_len += len;

            let mid = mesh.face_midpoint(face);
            let cp = (phys.pressure(&u[lelem]) - pinf) * 2.0;

            // 守恒梯度 → 速度梯度张量：∂(m/ρ) = (ρ∂m − m∂ρ)/ρ²
            let rho = u[lelem][0];
            let g = &grads[lelem];
            let mut gradu = [[0.0; 2]; 2];
            for i in 0..2 {
                // gradu[j][i] = ∂_i v_j
                let di = [g[0].x, g[0].y][i];
                gradu[0][i] = ([g[1].x, g[1].y][i] * rho - u[lelem][1] * di) / (rho * rho);
                gradu[1][i] = ([g[2].x, g[2].y][i] * rho - u[lelem][2] * di) / (rho * rho);
            }

            let muhat = phys.viscosity(&u[lelem]);
            // τ_w = (μ(∇v + ∇vᵀ)·n̂)·t̂，t̂ = (n_y, −n_x)
            let tauw = muhat
                * ((2.0 * gradu[0][0] * n.x + (gradu[0][1] + gradu[1][0]) * n.y) * n.y
                    + ((gradu[1][0] + gradu[0][1]) * n.x + 2.0 * gradu[1][1] * n.y) * (-n.x));
            let cf = 2.0 * tauw;

            data.records.push([mid.x, mid.y, cp, cf]);

            let ndotf = n.x * av[0] + n.y * av[1];
            let ndotnf = n.x * flownormal[0] + n.y * flownormal[1];
            let tdotf = n.y * av[0] - n.x * av[1];
            data.cdp += cp * ndotf * len;
            data.cdf += cf * tdotf * len;
            data.cl += cp * ndotnf * len;
        }

        if total_len > 0.0 {
            data.cdp /= total_len;
            data.cdf /= total_len;
            data.cl /= total_len;
        }
        data
    }
}
