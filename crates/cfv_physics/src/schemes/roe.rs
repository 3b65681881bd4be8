// crates/cfv_physics/src/schemes/roe.rs

//! Roe-Pike 通量差分分裂
//!
//! F = ½(F_L + F_R) − ½|Ã|(u_R − u_L)，|Ã| 按 Roe 平均的特征分解展开为
//! 三组波贡献（声波 1、对流波 2/3/4 合并、声波 5）。声学特征值施加
//! Harten-Hyman 熵修正：|λ| < ε 时 |λ| ← (λ² + ε²)/(2ε)，
//! ε = ε₀(|ṽ_n| + c̃)。
//!
//! 雅可比对 Roe 平均量做完整链式求导，熵修正分支也参与求导。

use super::roe_average::{roe_average, roe_average_with_jacobian};
use super::traits::{FluxJacobian, InviscidFlux};
use crate::gas::IdealGasPhysics;
use cfv_foundation::NVARS;
use glam::DVec2;

/// 熵修正比例 ε₀
const FIX_EPS: f64 = 1.0e-4;

/// Roe-Pike 通量
#[derive(Debug, Clone, Copy)]
pub struct RoeFlux {
    physics: IdealGasPhysics,
    fixeps: f64,
}

/// |λ| 的熵修正值
#[inline]
fn abs_fixed(lambda: f64, eps: f64) -> f64 {
    if lambda.abs() < eps {
        (lambda * lambda + eps * eps) / (2.0 * eps)
    } else {
        lambda.abs()
    }
}

/// |λ| 的熵修正值及 d|λ|（给定 dλ 与 dε）
#[inline]
fn abs_fixed_with_derivative(lambda: f64, dlambda: f64, eps: f64, deps: f64) -> (f64, f64) {
    if lambda.abs() < eps {
        let val = (lambda * lambda + eps * eps) / (2.0 * eps);
        let dval = lambda / eps * dlambda + (0.5 - lambda * lambda / (2.0 * eps * eps)) * deps;
        (val, dval)
    } else {
        (lambda.abs(), lambda.signum() * dlambda)
    }
}

impl RoeFlux {
    /// 创建 Roe 通量
    pub fn new(physics: IdealGasPhysics) -> Self {
        Self {
            physics,
            fixeps: FIX_EPS,
        }
    }
}

impl InviscidFlux for RoeFlux {
    fn name(&self) -> &'static str {
        "Roe"
    }

    fn flux(&self, ul: &[f64; NVARS], ur: &[f64; NVARS], n: DVec2) -> [f64; NVARS] {
        let phys = &self.physics;
        let avg = roe_average(phys, ul, ur, n);

        let eps = self.fixeps * (avg.vn.abs() + avg.c);
        let l1 = abs_fixed(avg.vn - avg.c, eps);
        let lm = avg.vn.abs();
        let l4 = abs_fixed(avg.vn + avg.c, eps);

        let dp = phys.pressure(ur) - phys.pressure(ul);
        let drho = ur[0] - ul[0];
        let vl = phys.velocity(ul);
        let vr = phys.velocity(ur);
        let dvx = vr.x - vl.x;
        let dvy = vr.y - vl.y;
        let dvn = phys.normal_velocity(ur, n) - phys.normal_velocity(ul, n);

        let c2 = avg.c * avg.c;
        let w1 = (dp - avg.rho * avg.c * dvn) / (2.0 * c2);
        let w4 = (dp + avg.rho * avg.c * dvn) / (2.0 * c2);
        let s = drho - dp / c2;

        let r1 = [
            1.0,
            avg.vx - avg.c * n.x,
            avg.vy - avg.c * n.y,
            avg.h - avg.c * avg.vn,
        ];
        let r4 = [
            1.0,
            avg.vx + avg.c * n.x,
            avg.vy + avg.c * n.y,
            avg.h + avg.c * avg.vn,
        ];
        let e = [1.0, avg.vx, avg.vy, 0.5 * avg.vm2];
        let f = [
            0.0,
            dvx - n.x * dvn,
            dvy - n.y * dvn,
            avg.vx * dvx + avg.vy * dvy - avg.vn * dvn,
        ];

        let fl = phys.euler_flux(ul, n);
        let fr = phys.euler_flux(ur, n);
        let mut flux = [0.0; NVARS];
        for i in 0..NVARS {
            let diss = l1 * w1 * r1[i] + lm * (s * e[i] + avg.rho * f[i]) + l4 * w4 * r4[i];
            flux[i] = 0.5 * (fl[i] + fr[i] - diss);
        }
        flux
    }

    fn jacobian(
        &self,
        ul: &[f64; NVARS],
        ur: &[f64; NVARS],
        n: DVec2,
        dfdl: &mut FluxJacobian,
        dfdr: &mut FluxJacobian,
    ) {
        let phys = &self.physics;
        let (avg, ajac) = roe_average_with_jacobian(phys, ul, ur, n);

        let eps = self.fixeps * (avg.vn.abs() + avg.c);
        let c2 = avg.c * avg.c;

        let pl = phys.pressure(ul);
        let pr = phys.pressure(ur);
        let dp_delta = pr - pl;
        let drho_delta = ur[0] - ul[0];
        let vl = phys.velocity(ul);
        let vr = phys.velocity(ur);
        let dvx_delta = vr.x - vl.x;
        let dvy_delta = vr.y - vl.y;
        let dvn_delta = phys.normal_velocity(ur, n) - phys.normal_velocity(ul, n);

        let w1 = (dp_delta - avg.rho * avg.c * dvn_delta) / (2.0 * c2);
        let w4 = (dp_delta + avg.rho * avg.c * dvn_delta) / (2.0 * c2);
        let s = drho_delta - dp_delta / c2;

        let r1 = [
            1.0,
            avg.vx - avg.c * n.x,
            avg.vy - avg.c * n.y,
            avg.h - avg.c * avg.vn,
        ];
        let r4 = [
            1.0,
            avg.vx + avg.c * n.x,
            avg.vy + avg.c * n.y,
            avg.h + avg.c * avg.vn,
        ];
        let e = [1.0, avg.vx, avg.vy, 0.5 * avg.vm2];
        let f = [
            0.0,
            dvx_delta - n.x * dvn_delta,
            dvy_delta - n.y * dvn_delta,
            avg.vx * dvx_delta + avg.vy * dvy_delta - avg.vn * dvn_delta,
        ];

        let al = phys.euler_flux_jacobian(ul, n);
        let ar = phys.euler_flux_jacobian(ur, n);

        // 两侧导数统一展开：side = 0 为左，1 为右
        for side in 0..2 {
            let sgn = if side == 0 { -1.0 } else { 1.0 };
            let u = if side == 0 { ul } else { ur };

            // Roe 平均量导数
            let (davg_rho, davg_vx, davg_vy, davg_vm2, davg_vn, davg_h, davg_c) = if side == 0 {
                (
                    ajac.drho_l, ajac.dvx_l, ajac.dvy_l, ajac.dvm2_l, ajac.dvn_l, ajac.dh_l,
                    ajac.dc_l,
                )
            } else {
                (
                    ajac.drho_r, ajac.dvx_r, ajac.dvy_r, ajac.dvm2_r, ajac.dvn_r, ajac.dh_r,
                    ajac.dc_r,
                )
            };

            // 差量导数：δq = q_R − q_L，对本侧守恒量
            let dp_side = phys.dpressure(u);
            let dvx_side = phys.dvx(u);
            let dvy_side = phys.dvy(u);
            let dvn_side = phys.dnormal_velocity(u, n);

            let out = if side == 0 { &mut *dfdl } else { &mut *dfdr };
            let a_side = if side == 0 { &al } else { &ar };

            for k in 0..NVARS {
                let d_dp = sgn * dp_side[k];
                let d_drho = sgn * if k == 0 { 1.0 } else { 0.0 };
                let d_dvx = sgn * dvx_side[k];
                let d_dvy = sgn * dvy_side[k];
                let d_dvn = sgn * dvn_side[k];

                // 特征值及熵修正
                let deps = self.fixeps * (avg.vn.signum() * davg_vn[k] + davg_c[k]);
                let (l1, dl1) = abs_fixed_with_derivative(
                    avg.vn - avg.c,
                    davg_vn[k] - davg_c[k],
                    eps,
                    deps,
                );
                let (l4, dl4) = abs_fixed_with_derivative(
                    avg.vn + avg.c,
                    davg_vn[k] + davg_c[k],
                    eps,
                    deps,
                );
                let lm = avg.vn.abs();
                let dlm = avg.vn.signum() * davg_vn[k];

                // 波强度导数
                let dw1 = (d_dp
                    - (davg_rho[k] * avg.c + avg.rho * davg_c[k]) * dvn_delta
                    - avg.rho * avg.c * d_dvn)
                    / (2.0 * c2)
                    - 2.0 * w1 * davg_c[k] / avg.c;
                let dw4 = (d_dp
                    + (davg_rho[k] * avg.c + avg.rho * davg_c[k]) * dvn_delta
                    + avg.rho * avg.c * d_dvn)
                    / (2.0 * c2)
                    - 2.0 * w4 * davg_c[k] / avg.c;
                let ds = d_drho - d_dp / c2 + 2.0 * dp_delta * davg_c[k] / (c2 * avg.c);

                // 特征向量导数
                let dr1 = [
                    0.0,
                    davg_vx[k] - davg_c[k] * n.x,
                    davg_vy[k] - davg_c[k] * n.y,
                    davg_h[k] - davg_c[k] * avg.vn - avg.c * davg_vn[k],
                ];
                let dr4 = [
                    0.0,
                    davg_vx[k] + davg_c[k] * n.x,
                    davg_vy[k] + davg_c[k] * n.y,
                    davg_h[k] + davg_c[k] * avg.vn + avg.c * davg_vn[k],
                ];
                let de = [0.0, davg_vx[k], davg_vy[k], 0.5 * davg_vm2[k]];
                let df = [
                    0.0,
                    d_dvx - n.x * d_dvn,
                    d_dvy - n.y * d_dvn,
                    davg_vx[k] * dvx_delta + avg.vx * d_dvx + davg_vy[k] * dvy_delta
                        + avg.vy * d_dvy
                        - davg_vn[k] * dvn_delta
                        - avg.vn * d_dvn,
                ];

                for i in 0..NVARS {
                    let ddiss = dl1 * w1 * r1[i]
                        + l1 * dw1 * r1[i]
                        + l1 * w1 * dr1[i]
                        + dlm * (s * e[i] + avg.rho * f[i])
                        + lm * (ds * e[i] + s * de[i] + davg_rho[k] * f[i] + avg.rho * df[i])
                        + dl4 * w4 * r4[i]
                        + l4 * dw4 * r4[i]
                        + l4 * w4 * dr4[i];
                    out[i][k] = 0.5 * (a_side[i][k] - ddiss);
                }
            }
        }
    }
}
