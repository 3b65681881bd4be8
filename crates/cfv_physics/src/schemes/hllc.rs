// crates/cfv_physics/src/schemes/hllc.rs

//! HLLC 通量
//!
//! 在 HLL 的基础上以接触波速 S_M 恢复接触间断（Batten 公式）：
//!
//! S_M = (ρ_R v_nR(S_R−v_nR) − ρ_L v_nL(S_L−v_nL) + p_L − p_R)
//!       / (ρ_R(S_R−v_nR) − ρ_L(S_L−v_nL))
//!
//! 星区状态由 Rankine-Hugoniot 关系给出，四区通量：
//! F_L | F_L + S_L(u*_L − u_L) | F_R + S_R(u*_R − u_R) | F_R。
//!
//! 雅可比沿 S_L、S_R、S_M、p* 与星区状态完整链式求导。

use super::hll::{einfeldt_speeds, wave_speed_jacobian, WaveSpeedJac, WaveSpeeds};
use super::roe_average::roe_average_with_jacobian;
use super::traits::{add_outer, FluxJacobian, InviscidFlux};
use crate::gas::IdealGasPhysics;
use cfv_foundation::NVARS;
use glam::DVec2;

/// HLLC 通量
#[derive(Debug, Clone, Copy)]
pub struct HllcFlux {
    physics: IdealGasPhysics,
}

/// 接触波速及其导数
struct ContactWave {
    sm: f64,
    dsm_l: [f64; NVARS],
    dsm_r: [f64; NVARS],
}

impl HllcFlux {
    /// 创建 HLLC 通量
    pub fn new(physics: IdealGasPhysics) -> Self {
        Self { physics }
    }

    /// 接触波速 S_M
    fn contact_speed(
        &self,
        ul: &[f64; NVARS],
        ur: &[f64; NVARS],
        n: DVec2,
        speeds: &WaveSpeeds,
    ) -> f64 {
        let phys = &self.physics;
        let vnl = phys.normal_velocity(ul, n);
        let vnr = phys.normal_velocity(ur, n);
        let pl = phys.pressure(ul);
        let pr = phys.pressure(ur);
        let ql = ul[0] * (speeds.sl - vnl);
        let qr = ur[0] * (speeds.sr - vnr);
        (vnr * qr - vnl * ql + pl - pr) / (qr - ql)
    }

    /// 接触波速及对两侧的导数
    fn contact_speed_with_jacobian(
        &self,
        ul: &[f64; NVARS],
        ur: &[f64; NVARS],
        n: DVec2,
        speeds: &WaveSpeeds,
        sjac: &WaveSpeedJac,
    ) -> ContactWave {
        let phys = &self.physics;
        let vnl = phys.normal_velocity(ul, n);
        let vnr = phys.normal_velocity(ur, n);
        let pl = phys.pressure(ul);
        let pr = phys.pressure(ur);
        let dvnl = phys.dnormal_velocity(ul, n);
        let dvnr = phys.dnormal_velocity(ur, n);
        let dpl = phys.dpressure(ul);
        let dpr = phys.dpressure(ur);

        let ql = ul[0] * (speeds.sl - vnl);
        let qr = ur[0] * (speeds.sr - vnr);
        let den = qr - ql;
        let sm = (vnr * qr - vnl * ql + pl - pr) / den;

        let mut dsm_l = [0.0; NVARS];
        let mut dsm_r = [0.0; NVARS];
        for k in 0..NVARS {
            let e0 = if k == 0 { 1.0 } else { 0.0 };
            // 左侧
            let dql = e0 * (speeds.sl - vnl) + ul[0] * (sjac.dsl_l[k] - dvnl[k]);
            let dqr = ur[0] * sjac.dsr_l[k];
            let dnum = vnr * dqr - dvnl[k] * ql - vnl * dql + dpl[k];
            let dden = dqr - dql;
            dsm_l[k] = (dnum - sm * dden) / den;
            // 右侧
            let dql = ul[0] * sjac.dsl_r[k];
            let dqr = e0 * (speeds.sr - vnr) + ur[0] * (sjac.dsr_r[k] - dvnr[k]);
            let dnum = dvnr[k] * qr + vnr * dqr - vnl * dql - dpr[k];
            let dden = dqr - dql;
            dsm_r[k] = (dnum - sm * dden) / den;
        }

        ContactWave { sm, dsm_l, dsm_r }
    }

    /// 星区状态（Batten 公式）
    ///
    /// `u`、`vn`、`p` 为星区外侧状态，`ss` 为该侧信号速度。
    fn star_state(u: &[f64; NVARS], n: DVec2, vn: f64, p: f64, ss: f64, sm: f64) -> [f64; NVARS] {
        let a = ss - vn;
        let b = ss - sm;
        let p_star = p + u[0] * a * (sm - vn);
        [
            u[0] * a / b,
            (u[1] * a + (p_star - p) * n.x) / b,
            (u[2] * a + (p_star - p) * n.y) / b,
            (u[3] * a - p * vn + p_star * sm) / b,
        ]
    }

    /// 星区状态及其雅可比
    ///
    /// 对"本侧"状态的导数包含直接项与经 S、S_M 的间接项；
    /// 对"另一侧"状态只经 S、S_M 传递。
    #[allow(clippy::too_many_arguments)]
    fn star_state_and_jacobian(
        u: &[f64; NVARS],
        n: DVec2,
        vn: f64,
        p: f64,
        ss: f64,
        sm: f64,
        dvn: &[f64; NVARS],
        dp: &[f64; NVARS],
        dss_own: &[f64; NVARS],
        dss_other: &[f64; NVARS],
        dsm_own: &[f64; NVARS],
        dsm_other: &[f64; NVARS],
    ) -> ([f64; NVARS], FluxJacobian, FluxJacobian) {
        let a = ss - vn;
        let b = ss - sm;
        let p_star = p + u[0] * a * (sm - vn);
        let ustar = Self::star_state(u, n, vn, p, ss, sm);

        let mut down: FluxJacobian = [[0.0; NVARS]; NVARS];
        let mut dother: FluxJacobian = [[0.0; NVARS]; NVARS];

        for k in 0..NVARS {
            let e = |idx: usize| if k == idx { 1.0 } else { 0.0 };
            let da_own = dss_own[k] - dvn[k];
            let db_own = dss_own[k] - dsm_own[k];
            let db_other = dss_other[k] - dsm_other[k];

            let dpstar_own = dp[k]
                + e(0) * a * (sm - vn)
                + u[0] * da_own * (sm - vn)
                + u[0] * a * (dsm_own[k] - dvn[k]);
            let dpstar_other = u[0] * dss_other[k] * (sm - vn) + u[0] * a * dsm_other[k];

            // 质量
            let dnum_own = e(0) * a + u[0] * da_own;
            let dnum_other = u[0] * dss_other[k];
            down[0][k] = (dnum_own - ustar[0] * db_own) / b;
            dother[0][k] = (dnum_other - ustar[0] * db_other) / b;

            // 动量
            for dim in 0..2 {
                let nd = if dim == 0 { n.x } else { n.y };
                let dnum_own =
                    e(dim + 1) * a + u[dim + 1] * da_own + (dpstar_own - dp[k]) * nd;
                let dnum_other = u[dim + 1] * dss_other[k] + dpstar_other * nd;
                down[dim + 1][k] = (dnum_own - ustar[dim + 1] * db_own) / b;
                dother[dim + 1][k] = (dnum_other - ustar[dim + 1] * db_other) / b;
            }

            // 能量
            let dnum_own = e(3) * a + u[3] * da_own - dp[k] * vn - p * dvn[k]
                + dpstar_own * sm
                + p_star * dsm_own[k];
            let dnum_other = u[3] * dss_other[k] + dpstar_other * sm + p_star * dsm_other[k];
            down[3][k] = (dnum_own - ustar[3] * db_own) / b;
            dother[3][k] = (dnum_other - ustar[3] * db_other) / b;
        }

        (ustar, down, dother)
    }
}

impl InviscidFlux for HllcFlux {
    fn name(&self) -> &'static str {
        "HLLC"
    }

    fn flux(&self, ul: &[f64; NVARS], ur: &[f64; NVARS], n: DVec2) -> [f64; NVARS] {
        let phys = &self.physics;
        let speeds = einfeldt_speeds(phys, ul, ur, n);

        if speeds.sl > 0.0 {
            return phys.euler_flux(ul, n);
        }
        if speeds.sr < 0.0 {
            return phys.euler_flux(ur, n);
        }

        let sm = self.contact_speed(ul, ur, n, &speeds);
        if sm >= 0.0 {
            let vn = phys.normal_velocity(ul, n);
            let p = phys.pressure(ul);
            let ustar = Self::star_state(ul, n, vn, p, speeds.sl, sm);
            let fl = phys.euler_flux(ul, n);
            let mut f = [0.0; NVARS];
            for i in 0..NVARS {
                f[i] = fl[i] + speeds.sl * (ustar[i] - ul[i]);
            }
            f
        } else {
            let vn = phys.normal_velocity(ur, n);
            let p = phys.pressure(ur);
            let ustar = Self::star_state(ur, n, vn, p, speeds.sr, sm);
            let fr = phys.euler_flux(ur, n);
            let mut f = [0.0; NVARS];
            for i in 0..NVARS {
                f[i] = fr[i] + speeds.sr * (ustar[i] - ur[i]);
            }
            f
        }
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
        let (_, ajac) = roe_average_with_jacobian(phys, ul, ur, n);
        let speeds = einfeldt_speeds(phys, ul, ur, n);

        if speeds.sl > 0.0 {
            *dfdl = phys.euler_flux_jacobian(ul, n);
            *dfdr = [[0.0; NVARS]; NVARS];
            return;
        }
        if speeds.sr < 0.0 {
            *dfdl = [[0.0; NVARS]; NVARS];
            *dfdr = phys.euler_flux_jacobian(ur, n);
            return;
        }

        let sjac = wave_speed_jacobian(phys, ul, ur, n, &speeds, &ajac);
        let contact = self.contact_speed_with_jacobian(ul, ur, n, &speeds, &sjac);

        if contact.sm >= 0.0 {
            // 左星区：F = F_L + S_L(u* − u_L)
            let vn = phys.normal_velocity(ul, n);
            let p = phys.pressure(ul);
            let (ustar, dstar_own, dstar_other) = Self::star_state_and_jacobian(
                ul,
                n,
                vn,
                p,
                speeds.sl,
                contact.sm,
                &phys.dnormal_velocity(ul, n),
                &phys.dpressure(ul),
                &sjac.dsl_l,
                &sjac.dsl_r,
                &contact.dsm_l,
                &contact.dsm_r,
            );
            let al = phys.euler_flux_jacobian(ul, n);
            let mut du = [0.0; NVARS];
            for i in 0..NVARS {
                du[i] = ustar[i] - ul[i];
            }
            for i in 0..NVARS {
                for k in 0..NVARS {
                    dfdl[i][k] = al[i][k] + speeds.sl * dstar_own[i][k];
                    dfdr[i][k] = speeds.sl * dstar_other[i][k];
                }
                dfdl[i][i] -= speeds.sl;
            }
            add_outer(dfdl, 1.0, &du, &sjac.dsl_l);
            add_outer(dfdr, 1.0, &du, &sjac.dsl_r);
        } else {
            // 右星区：F = F_R + S_R(u* − u_R)
            let vn = phys.normal_velocity(ur, n);
            let p = phys.pressure(ur);
            let (ustar, dstar_own, dstar_other) = Self::star_state_and_jacobian(
                ur,
                n,
                vn,
                p,
                speeds.sr,
                contact.sm,
                &phys.dnormal_velocity(ur, n),
                &phys.dpressure(ur),
                &sjac.dsr_r,
                &sjac.dsr_l,
                &contact.dsm_r,
                &contact.dsm_l,
            );
            let ar = phys.euler_flux_jacobian(ur, n);
            let mut du = [0.0; NVARS];
            for i in 0..NVARS {
                du[i] = ustar[i] - ur[i];
            }
            for i in 0..NVARS {
                for k in 0..NVARS {
                    dfdr[i][k] = ar[i][k] + speeds.sr * dstar_own[i][k];
                    dfdl[i][k] = speeds.sr * dstar_other[i][k];
                }
                dfdr[i][i] -= speeds.sr;
            }
            add_outer(dfdr, 1.0, &du, &sjac.dsr_r);
            add_outer(dfdl, 1.0, &du, &sjac.dsr_l);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemes::scheme_tests::*;

    #[test]
    fn test_hllc_properties() {
        let flux = HllcFlux::new(physics());
        check_consistency(&flux);
        check_conservation(&flux);
        check_rotational_invariance(&flux);
    }

    #[test]
    fn test_hllc_jacobian_vs_fd() {
        check_jacobian_vs_fd(&HllcFlux::new(physics()));
    }

    #[test]
    fn test_hllc_resolves_contact() {
        // 等压等速的纯接触间断应被精确保持：质量通量 = ρ_upwind·v_n
        let phys = physics();
        let flux = HllcFlux::new(phys);
        let ul = state(1.0, 0.3, 0.0, 1.0);
        let ur = state(0.5, 0.3, 0.0, 1.0);
        let n = DVec2::new(1.0, 0.0);
        let f = flux.flux(&ul, &ur, n);
        // v_n > 0，迎风侧为左
        assert!((f[0] - 1.0 * 0.3).abs() < 1e-12);
        assert!((f[1] - (1.0 * 0.3 * 0.3 + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_hllc_star_pressure_equal() {
        // 两侧星区压力一致
        let phys = physics();
        let flux = HllcFlux::new(phys);
        let (ul, ur) = generic_pair();
        let n = DVec2::new(0.6, 0.8);
        let speeds = einfeldt_speeds(&phys, &ul, &ur, n);
        let sm = flux.contact_speed(&ul, &ur, n, &speeds);

        let vnl = phys.normal_velocity(&ul, n);
        let vnr = phys.normal_velocity(&ur, n);
        let pl = phys.pressure(&ul);
        let pr = phys.pressure(&ur);
        let ps_l = pl + ul[0] * (speeds.sl - vnl) * (sm - vnl);
        let ps_r = pr + ur[0] * (speeds.sr - vnr) * (sm - vnr);
        assert!((ps_l - ps_r).abs() < 1e-12);
    }
}
