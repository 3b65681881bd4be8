// crates/cfv_physics/src/schemes/ausm.rs

//! AUSM 族通量：对流量与压力分别分裂
//!
//! - [`AusmFlux`]: Liou-Steffen 原始 AUSM。其自身雅可比不可靠，
//!   按惯例以冻结谱半径的 LLF 雅可比作为替代。
//! - [`AusmPlusFlux`]: Liou AUSM+，四次多项式分裂 + 界面声速，
//!   雅可比沿界面声速的 min/max 分支完整链式求导。

use super::llf::LocalLaxFriedrichsFlux;
use super::traits::{FluxJacobian, InviscidFlux};
use crate::gas::IdealGasPhysics;
use cfv_foundation::NVARS;
use glam::DVec2;

// ============================================================
// Liou-Steffen AUSM
// ============================================================

/// Liou-Steffen AUSM 通量
#[derive(Debug, Clone, Copy)]
pub struct AusmFlux {
    physics: IdealGasPhysics,
    /// 雅可比替代格式
    jac_surrogate: LocalLaxFriedrichsFlux,
}

impl AusmFlux {
    /// 创建 AUSM 通量
    pub fn new(physics: IdealGasPhysics) -> Self {
        Self {
            physics,
            jac_surrogate: LocalLaxFriedrichsFlux::new(physics),
        }
    }
}

impl InviscidFlux for AusmFlux {
    fn name(&self) -> &'static str {
        "AUSM"
    }

    fn flux(&self, ul: &[f64; NVARS], ur: &[f64; NVARS], n: DVec2) -> [f64; NVARS] {
        let phys = &self.physics;
        let cl = phys.sound_speed(ul);
        let cr = phys.sound_speed(ur);
        let ml = phys.normal_velocity(ul, n) / cl;
        let mr = phys.normal_velocity(ur, n) / cr;
        let pl = phys.pressure(ul);
        let pr = phys.pressure(ur);

        // 马赫数分裂
        let m_plus = if ml.abs() <= 1.0 {
            0.25 * (ml + 1.0) * (ml + 1.0)
        } else {
            0.5 * (ml + ml.abs())
        };
        let m_minus = if mr.abs() <= 1.0 {
            -0.25 * (mr - 1.0) * (mr - 1.0)
        } else {
            0.5 * (mr - mr.abs())
        };
        let m_half = m_plus + m_minus;

        // 压力分裂
        let p_plus = if ml.abs() <= 1.0 {
            0.25 * pl * (ml + 1.0) * (ml + 1.0) * (2.0 - ml)
        } else {
            0.5 * pl * (ml + ml.abs()) / ml
        };
        let p_minus = if mr.abs() <= 1.0 {
            0.25 * pr * (mr - 1.0) * (mr - 1.0) * (2.0 + mr)
        } else {
            0.5 * pr * (mr - mr.abs()) / mr
        };
        let p_half = p_plus + p_minus;

        // 对流量：cΨ，Ψ = (ρ, ρu, ρv, ρH)
        let hl = phys.total_enthalpy(ul);
        let hr = phys.total_enthalpy(ur);
        let psi_l = [cl * ul[0], cl * ul[1], cl * ul[2], cl * ul[0] * hl];
        let psi_r = [cr * ur[0], cr * ur[1], cr * ur[2], cr * ur[0] * hr];

        let mut f = [0.0; NVARS];
        for i in 0..NVARS {
            f[i] = 0.5 * m_half * (psi_l[i] + psi_r[i])
                - 0.5 * m_half.abs() * (psi_r[i] - psi_l[i]);
        }
        f[1] += p_half * n.x;
        f[2] += p_half * n.y;
        f
    }

    /// AUSM 自身的雅可比不可靠，使用 LLF 冻结谱半径雅可比替代
    fn jacobian(
        &self,
        ul: &[f64; NVARS],
        ur: &[f64; NVARS],
        n: DVec2,
        dfdl: &mut FluxJacobian,
        dfdr: &mut FluxJacobian,
    ) {
        self.jac_surrogate.jacobian(ul, ur, n, dfdl, dfdr);
    }
}

// ============================================================
// AUSM+
// ============================================================

/// AUSM+ 多项式常数
const AUSM_BETA: f64 = 1.0 / 8.0;
const AUSM_ALPHA: f64 = 3.0 / 16.0;

/// 单侧量及其导数向量
struct SideQuantities {
    vn: f64,
    p: f64,
    h: f64,
    dvn: [f64; NVARS],
    dp: [f64; NVARS],
    dh: [f64; NVARS],
}

/// Liou AUSM+ 通量
#[derive(Debug, Clone, Copy)]
pub struct AusmPlusFlux {
    physics: IdealGasPhysics,
}

impl AusmPlusFlux {
    /// 创建 AUSM+ 通量
    pub fn new(physics: IdealGasPhysics) -> Self {
        Self { physics }
    }

    fn side(&self, u: &[f64; NVARS], n: DVec2) -> SideQuantities {
        let phys = &self.physics;
        SideQuantities {
            vn: phys.normal_velocity(u, n),
            p: phys.pressure(u),
            h: phys.total_enthalpy(u),
            dvn: phys.dnormal_velocity(u, n),
            dp: phys.dpressure(u),
            dh: phys.denthalpy(u),
        }
    }

    /// 数值声速 ĉ = c*²/max(c*, |v_n|) 及 dĉ/du
    fn numerical_sound_speed(&self, q: &SideQuantities) -> (f64, [f64; NVARS]) {
        let g = self.physics.gamma;
        // 临界声速 c*² = 2(γ−1)/(γ+1) H
        let cs2 = 2.0 * (g - 1.0) / (g + 1.0) * q.h;
        let cs = cs2.sqrt();
        let mut dcs2 = [0.0; NVARS];
        for k in 0..NVARS {
            dcs2[k] = 2.0 * (g - 1.0) / (g + 1.0) * q.dh[k];
        }

        if cs >= q.vn.abs() {
            let mut dcs = [0.0; NVARS];
            for k in 0..NVARS {
                dcs[k] = dcs2[k] / (2.0 * cs);
            }
            (cs, dcs)
        } else {
            let chat = cs2 / q.vn.abs();
            let mut dchat = [0.0; NVARS];
            for k in 0..NVARS {
                dchat[k] =
                    dcs2[k] / q.vn.abs() - cs2 * q.vn.signum() * q.dvn[k] / (q.vn * q.vn);
            }
            (chat, dchat)
        }
    }

    /// 马赫数分裂 M±(M) 及 dM±/dM
    fn mach_split(m: f64, plus: bool) -> (f64, f64) {
        let s = if plus { 1.0 } else { -1.0 };
        if m.abs() >= 1.0 {
            let val = 0.5 * (m + s * m.abs());
            let deriv = 0.5 * (1.0 + s * m.signum());
            (val, deriv)
        } else if plus {
            let val = 0.25 * (m + 1.0) * (m + 1.0) + AUSM_BETA * (m * m - 1.0).powi(2);
            let deriv = 0.5 * (m + 1.0) + 4.0 * AUSM_BETA * m * (m * m - 1.0);
            (val, deriv)
        } else {
            let val = -0.25 * (m - 1.0) * (m - 1.0) - AUSM_BETA * (m * m - 1.0).powi(2);
            let deriv = -0.5 * (m - 1.0) - 4.0 * AUSM_BETA * m * (m * m - 1.0);
            (val, deriv)
        }
    }

    /// 压力分裂 P±(M) 及 dP±/dM
    fn pressure_split(m: f64, plus: bool) -> (f64, f64) {
        let s = if plus { 1.0 } else { -1.0 };
        if m.abs() >= 1.0 {
            (0.5 * (1.0 + s * m.signum()), 0.0)
        } else if plus {
            let val = 0.25 * (m + 1.0) * (m + 1.0) * (2.0 - m)
                + AUSM_ALPHA * m * (m * m - 1.0).powi(2);
            let deriv = 0.25 * (2.0 * (m + 1.0) * (2.0 - m) - (m + 1.0) * (m + 1.0))
                + AUSM_ALPHA * ((m * m - 1.0).powi(2) + 4.0 * m * m * (m * m - 1.0));
            (val, deriv)
        } else {
            let val = 0.25 * (m - 1.0) * (m - 1.0) * (2.0 + m)
                - AUSM_ALPHA * m * (m * m - 1.0).powi(2);
            let deriv = 0.25 * (2.0 * (m - 1.0) * (2.0 + m) + (m - 1.0) * (m - 1.0))
                - AUSM_ALPHA * ((m * m - 1.0).powi(2) + 4.0 * m * m * (m * m - 1.0));
            (val, deriv)
        }
    }

    /// 界面声速 a½ = min(ĉ_L, ĉ_R) 及其对两侧的导数
    fn interface_sound_speed(
        &self,
        ql: &SideQuantities,
        qr: &SideQuantities,
    ) -> (f64, [f64; NVARS], [f64; NVARS]) {
        let (cl, dcl) = self.numerical_sound_speed(ql);
        let (cr, dcr) = self.numerical_sound_speed(qr);
        if cl <= cr {
            (cl, dcl, [0.0; NVARS])
        } else {
            (cr, [0.0; NVARS], dcr)
        }
    }
}

impl InviscidFlux for AusmPlusFlux {
    fn name(&self) -> &'static str {
        "AUSM+"
    }

    fn flux(&self, ul: &[f64; NVARS], ur: &[f64; NVARS], n: DVec2) -> [f64; NVARS] {
        let ql = self.side(ul, n);
        let qr = self.side(ur, n);
        let (a_half, _, _) = self.interface_sound_speed(&ql, &qr);

        let ml = ql.vn / a_half;
        let mr = qr.vn / a_half;
        let m_half = Self::mach_split(ml, true).0 + Self::mach_split(mr, false).0;
        let p_half =
            Self::pressure_split(ml, true).0 * ql.p + Self::pressure_split(mr, false).0 * qr.p;

        // 迎风侧对流量 Φ = (ρ, ρu, ρv, ρH)
        let (u_up, h_up) = if m_half >= 0.0 { (ul, ql.h) } else { (ur, qr.h) };
        let phi = [u_up[0], u_up[1], u_up[2], u_up[0] * h_up];

        let mdot = a_half * m_half;
        let mut f = [0.0; NVARS];
        for i in 0..NVARS {
            f[i] = mdot * phi[i];
        }
        f[1] += p_half * n.x;
        f[2] += p_half * n.y;
        f
    }

    fn jacobian(
        &self,
        ul: &[f64; NVARS],
        ur: &[f64; NVARS],
        n: DVec2,
        dfdl: &mut FluxJacobian,
        dfdr: &mut FluxJacobian,
    ) {
        let ql = self.side(ul, n);
        let qr = self.side(ur, n);
        let (a_half, dal, dar) = self.interface_sound_speed(&ql, &qr);

        let ml = ql.vn / a_half;
        let mr = qr.vn / a_half;

        // dM_L = dv_nL/a½ − M_L/a½ · da½（对两侧）
        let mut dml_l = [0.0; NVARS];
        let mut dml_r = [0.0; NVARS];
        let mut dmr_l = [0.0; NVARS];
        let mut dmr_r = [0.0; NVARS];
        for k in 0..NVARS {
            dml_l[k] = ql.dvn[k] / a_half - ml / a_half * dal[k];
            dml_r[k] = -ml / a_half * dar[k];
            dmr_l[k] = -mr / a_half * dal[k];
            dmr_r[k] = qr.dvn[k] / a_half - mr / a_half * dar[k];
        }

        let (mp, dmp_dm) = Self::mach_split(ml, true);
        let (mm, dmm_dm) = Self::mach_split(mr, false);
        let m_half = mp + mm;
        let (pp, dpp_dm) = Self::pressure_split(ml, true);
        let (pm, dpm_dm) = Self::pressure_split(mr, false);

        let mut dmhalf_l = [0.0; NVARS];
        let mut dmhalf_r = [0.0; NVARS];
        let mut dphalf_l = [0.0; NVARS];
        let mut dphalf_r = [0.0; NVARS];
        for k in 0..NVARS {
            dmhalf_l[k] = dmp_dm * dml_l[k] + dmm_dm * dmr_l[k];
            dmhalf_r[k] = dmp_dm * dml_r[k] + dmm_dm * dmr_r[k];
            dphalf_l[k] = dpp_dm * dml_l[k] * ql.p + pp * ql.dp[k] + dpm_dm * dmr_l[k] * qr.p;
            dphalf_r[k] = dpp_dm * dml_r[k] * ql.p + dpm_dm * dmr_r[k] * qr.p + pm * qr.dp[k];
        }

        // 迎风侧
        let left_upwind = m_half >= 0.0;
        let (u_up, q_up) = if left_upwind { (ul, &ql) } else { (ur, &qr) };
        let phi = [u_up[0], u_up[1], u_up[2], u_up[0] * q_up.h];
        // dΦ 对迎风侧自身守恒量
        let mut dphi_own = [[0.0; NVARS]; NVARS];
        dphi_own[0][0] = 1.0;
        dphi_own[1][1] = 1.0;
        dphi_own[2][2] = 1.0;
        for k in 0..NVARS {
            dphi_own[3][k] = u_up[0] * q_up.dh[k];
        }
        dphi_own[3][0] += q_up.h;

        let mdot = a_half * m_half;
        // dṁ = da½·m½ + a½·dm½
        let mut dmdot_l = [0.0; NVARS];
        let mut dmdot_r = [0.0; NVARS];
        for k in 0..NVARS {
            dmdot_l[k] = dal[k] * m_half + a_half * dmhalf_l[k];
            dmdot_r[k] = dar[k] * m_half + a_half * dmhalf_r[k];
        }

        for i in 0..NVARS {
            for k in 0..NVARS {
                dfdl[i][k] = dmdot_l[k] * phi[i];
                dfdr[i][k] = dmdot_r[k] * phi[i];
                if left_upwind {
                    dfdl[i][k] += mdot * dphi_own[i][k];
                } else {
                    dfdr[i][k] += mdot * dphi_own[i][k];
                }
            }
        }
        for k in 0..NVARS {
            dfdl[1][k] += dphalf_l[k] * n.x;
            dfdl[2][k] += dphalf_l[k] * n.y;
            dfdr[1][k] += dphalf_r[k] * n.x;
            dfdr[2][k] += dphalf_r[k] * n.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemes::scheme_tests::*;

    #[test]
    fn test_ausm_properties() {
        let flux = AusmFlux::new(physics());
        check_consistency(&flux);
        check_conservation(&flux);
        check_rotational_invariance(&flux);
        // AUSM 雅可比为 LLF 替代，不做差分校验
    }

    #[test]
    fn test_ausm_plus_properties() {
        let flux = AusmPlusFlux::new(physics());
        check_consistency(&flux);
        check_conservation(&flux);
        check_rotational_invariance(&flux);
    }

    #[test]
    fn test_ausm_plus_jacobian_vs_fd() {
        check_jacobian_vs_fd(&AusmPlusFlux::new(physics()));
    }

    #[test]
    fn test_ausm_pressure_split_consistency() {
        // 同侧分裂之和恢复单位压力系数
        for &m in &[-0.8, -0.3, 0.0, 0.4, 0.9] {
            let (pp, _) = AusmPlusFlux::pressure_split(m, true);
            let (pm, _) = AusmPlusFlux::pressure_split(m, false);
            assert!((pp + pm - 1.0).abs() < 1e-14);

            let (mp, _) = AusmPlusFlux::mach_split(m, true);
            let (mm, _) = AusmPlusFlux::mach_split(m, false);
            assert!((mp + mm - m).abs() < 1e-14);
        }
    }
}
