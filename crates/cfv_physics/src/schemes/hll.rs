// crates/cfv_physics/src/schemes/hll.rs

//! HLL 通量
//!
//! Einfeldt 波速估计：S_L = min(v_nL − c_L, ṽ_n − c̃)，
//! S_R = max(v_nR + c_R, ṽ_n + c̃)（~ 为 Roe 平均）。三区公式：
//!
//! S_L ≥ 0 → F_L；S_R ≤ 0 → F_R；否则
//! F = (S_R F_L − S_L F_R + S_L S_R (u_R − u_L))/(S_R − S_L)。
//!
//! 雅可比沿波速的 min/max 活动分支链式求导。

use super::roe_average::{roe_average, roe_average_with_jacobian, RoeAverageJac};
use super::traits::{FluxJacobian, InviscidFlux};
use crate::gas::IdealGasPhysics;
use cfv_foundation::NVARS;
use glam::DVec2;

/// HLL 通量
#[derive(Debug, Clone, Copy)]
pub struct HllFlux {
    physics: IdealGasPhysics,
}

/// 波速及活动分支（true 表示取物理侧而非 Roe 侧）
pub(super) struct WaveSpeeds {
    pub sl: f64,
    pub sr: f64,
    pub sl_physical: bool,
    pub sr_physical: bool,
}

/// Einfeldt 波速估计
pub(super) fn einfeldt_speeds(
    phys: &IdealGasPhysics,
    ul: &[f64; NVARS],
    ur: &[f64; NVARS],
    n: DVec2,
) -> WaveSpeeds {
    let avg = roe_average(phys, ul, ur, n);
    let sl_phys = phys.normal_velocity(ul, n) - phys.sound_speed(ul);
    let sl_roe = avg.vn - avg.c;
    let sr_phys = phys.normal_velocity(ur, n) + phys.sound_speed(ur);
    let sr_roe = avg.vn + avg.c;
    WaveSpeeds {
        sl: sl_phys.min(sl_roe),
        sr: sr_phys.max(sr_roe),
        sl_physical: sl_phys <= sl_roe,
        sr_physical: sr_phys >= sr_roe,
    }
}

/// 波速对两侧守恒量的导数
pub(super) struct WaveSpeedJac {
    pub dsl_l: [f64; NVARS],
    pub dsl_r: [f64; NVARS],
    pub dsr_l: [f64; NVARS],
    pub dsr_r: [f64; NVARS],
}

/// 按活动分支装配波速导数
pub(super) fn wave_speed_jacobian(
    phys: &IdealGasPhysics,
    ul: &[f64; NVARS],
    ur: &[f64; NVARS],
    n: DVec2,
    speeds: &WaveSpeeds,
    ajac: &RoeAverageJac,
) -> WaveSpeedJac {
    let mut jac = WaveSpeedJac {
        dsl_l: [0.0; NVARS],
        dsl_r: [0.0; NVARS],
        dsr_l: [0.0; NVARS],
        dsr_r: [0.0; NVARS],
    };
    if speeds.sl_physical {
        let dvn = phys.dnormal_velocity(ul, n);
        let dc = phys.dsound_speed(ul);
        for k in 0..NVARS {
            jac.dsl_l[k] = dvn[k] - dc[k];
        }
    } else {
        for k in 0..NVARS {
            jac.dsl_l[k] = ajac.dvn_l[k] - ajac.dc_l[k];
            jac.dsl_r[k] = ajac.dvn_r[k] - ajac.dc_r[k];
        }
    }
    if speeds.sr_physical {
        let dvn = phys.dnormal_velocity(ur, n);
        let dc = phys.dsound_speed(ur);
        for k in 0..NVARS {
            jac.dsr_r[k] = dvn[k] + dc[k];
        }
    } else {
        for k in 0..NVARS {
            jac.dsr_l[k] = ajac.dvn_l[k] + ajac.dc_l[k];
            jac.dsr_r[k] = ajac.dvn_r[k] + ajac.dc_r[k];
        }
    }
    jac
}

impl HllFlux {
    /// 创建 HLL 通量
    pub fn new(physics: IdealGasPhysics) -> Self {
        Self { physics }
    }
}

impl InviscidFlux for HllFlux {
    fn name(&self) -> &'static str {
        "HLL"
    }

    fn flux(&self, ul: &[f64; NVARS], ur: &[f64; NVARS], n: DVec2) -> [f64; NVARS] {
        let phys = &self.physics;
        let speeds = einfeldt_speeds(phys, ul, ur, n);

        if speeds.sl >= 0.0 {
            return phys.euler_flux(ul, n);
        }
        if speeds.sr <= 0.0 {
            return phys.euler_flux(ur, n);
        }

        let fl = phys.euler_flux(ul, n);
        let fr = phys.euler_flux(ur, n);
        let inv = 1.0 / (speeds.sr - speeds.sl);
        let mut f = [0.0; NVARS];
        for i in 0..NVARS {
            f[i] = (speeds.sr * fl[i] - speeds.sl * fr[i]
                + speeds.sl * speeds.sr * (ur[i] - ul[i]))
                * inv;
        }
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
        let phys = &self.physics;
        let (_, ajac) = roe_average_with_jacobian(phys, ul, ur, n);
        let speeds = einfeldt_speeds(phys, ul, ur, n);

        if speeds.sl >= 0.0 {
            *dfdl = phys.euler_flux_jacobian(ul, n);
            *dfdr = [[0.0; NVARS]; NVARS];
            return;
        }
        if speeds.sr <= 0.0 {
            *dfdl = [[0.0; NVARS]; NVARS];
            *dfdr = phys.euler_flux_jacobian(ur, n);
            return;
        }

        let sjac = wave_speed_jacobian(phys, ul, ur, n, &speeds, &ajac);
        let fl = phys.euler_flux(ul, n);
        let fr = phys.euler_flux(ur, n);
        let al = phys.euler_flux_jacobian(ul, n);
        let ar = phys.euler_flux_jacobian(ur, n);
        let (sl, sr) = (speeds.sl, speeds.sr);
        let inv = 1.0 / (sr - sl);

        let mut hll = [0.0; NVARS];
        for i in 0..NVARS {
            hll[i] = (sr * fl[i] - sl * fr[i] + sl * sr * (ur[i] - ul[i])) * inv;
        }

        for k in 0..NVARS {
            for i in 0..NVARS {
                let du = ur[i] - ul[i];
                // 左侧
                let mut num = sjac.dsr_l[k] * fl[i] + sr * al[i][k] - sjac.dsl_l[k] * fr[i]
                    + (sjac.dsl_l[k] * sr + sl * sjac.dsr_l[k]) * du;
                if i == k {
                    num -= sl * sr;
                }
                dfdl[i][k] = num * inv - hll[i] * (sjac.dsr_l[k] - sjac.dsl_l[k]) * inv;

                // 右侧
                let mut num = sjac.dsr_r[k] * fl[i] - sjac.dsl_r[k] * fr[i] - sl * ar[i][k]
                    + (sjac.dsl_r[k] * sr + sl * sjac.dsr_r[k]) * du;
                if i == k {
                    num += sl * sr;
                }
                dfdr[i][k] = num * inv - hll[i] * (sjac.dsr_r[k] - sjac.dsl_r[k]) * inv;
            }
        }
    }
}
