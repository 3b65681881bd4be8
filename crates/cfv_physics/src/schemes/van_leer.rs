// crates/cfv_physics/src/schemes/van_leer.rs

//! Van Leer 通量矢量分裂
//!
//! F = F⁺(u_L) + F⁻(u_R)。亚声速 (|M| < 1) 区间使用马赫数多项式分裂：
//!
//! f⁺_mass = ±ρc(M±1)²/4，
//! F± 的动量分量含 (−v_n ± 2c)/γ 的法向修正，
//! 能量分量为 ((γ−1)v_n ± 2c)²/(2(γ²−1)) + (|v|² − v_n²)/2。
//!
//! |M| ≥ 1 时整支退化为单侧 Euler 通量。雅可比对各分支逐项解析求导。

use super::traits::{zero_jacobian, FluxJacobian, InviscidFlux};
use crate::gas::IdealGasPhysics;
use cfv_foundation::NVARS;
use glam::DVec2;

/// Van Leer 通量矢量分裂
#[derive(Debug, Clone, Copy)]
pub struct VanLeerFlux {
    physics: IdealGasPhysics,
}

/// 分裂方向
#[derive(Clone, Copy, PartialEq)]
enum Side {
    Plus,
    Minus,
}

impl VanLeerFlux {
    /// 创建 Van Leer 通量
    pub fn new(physics: IdealGasPhysics) -> Self {
        Self { physics }
    }

    /// 单侧分裂通量 F±(u)
    fn split_flux(&self, u: &[f64; NVARS], n: DVec2, side: Side) -> [f64; NVARS] {
        let phys = &self.physics;
        let g = phys.gamma;
        let rho = u[0];
        let v = phys.velocity(u);
        let vn = phys.normal_velocity(u, n);
        let c = phys.sound_speed(u);
        let m = vn / c;

        match side {
            Side::Plus => {
                if m >= 1.0 {
                    return phys.euler_flux(u, n);
                }
                if m <= -1.0 {
                    return [0.0; NVARS];
                }
                let fmass = 0.25 * rho * c * (m + 1.0) * (m + 1.0);
                let corr = (-vn + 2.0 * c) / g;
                let en = ((g - 1.0) * vn + 2.0 * c).powi(2) / (2.0 * (g * g - 1.0))
                    + 0.5 * (phys.vmag2(u) - vn * vn);
                [
                    fmass,
                    fmass * (v.x + n.x * corr),
                    fmass * (v.y + n.y * corr),
                    fmass * en,
                ]
            }
            Side::Minus => {
                if m <= -1.0 {
                    return phys.euler_flux(u, n);
                }
                if m >= 1.0 {
                    return [0.0; NVARS];
                }
                let fmass = -0.25 * rho * c * (m - 1.0) * (m - 1.0);
                let corr = (-vn - 2.0 * c) / g;
                let en = ((g - 1.0) * vn - 2.0 * c).powi(2) / (2.0 * (g * g - 1.0))
                    + 0.5 * (phys.vmag2(u) - vn * vn);
                [
                    fmass,
                    fmass * (v.x + n.x * corr),
                    fmass * (v.y + n.y * corr),
                    fmass * en,
                ]
            }
        }
    }

    /// 单侧分裂通量雅可比 dF±/du
    fn split_jacobian(&self, u: &[f64; NVARS], n: DVec2, side: Side, out: &mut FluxJacobian) {
        let phys = &self.physics;
        let g = phys.gamma;
        let rho = u[0];
        let v = phys.velocity(u);
        let vn = phys.normal_velocity(u, n);
        let c = phys.sound_speed(u);
        let m = vn / c;

        // 超声速分支
        let supersonic_full = match side {
            Side::Plus => m >= 1.0,
            Side::Minus => m <= -1.0,
        };
        let supersonic_zero = match side {
            Side::Plus => m <= -1.0,
            Side::Minus => m >= 1.0,
        };
        if supersonic_full {
            *out = phys.euler_flux_jacobian(u, n);
            return;
        }
        if supersonic_zero {
            zero_jacobian(out);
            return;
        }

        let drho = [1.0, 0.0, 0.0, 0.0];
        let dvx = phys.dvx(u);
        let dvy = phys.dvy(u);
        let dvn = phys.dnormal_velocity(u, n);
        let dc = phys.dsound_speed(u);
        let dvm2 = phys.dvmag2(u);
        let mut dm = [0.0; NVARS];
        for k in 0..NVARS {
            dm[k] = dvn[k] / c - vn / (c * c) * dc[k];
        }

        let sign = match side {
            Side::Plus => 1.0,
            Side::Minus => -1.0,
        };
        // fmass = s·ρc(M+s... Plus: +¼ρc(M+1)²; Minus: −¼ρc(M−1)²
        let mterm = m + sign;
        let fmass = sign * 0.25 * rho * c * mterm * mterm;
        let mut dfmass = [0.0; NVARS];
        for k in 0..NVARS {
            dfmass[k] = sign
                * 0.25
                * (drho[k] * c * mterm * mterm
                    + rho * dc[k] * mterm * mterm
                    + 2.0 * rho * c * mterm * dm[k]);
        }

        // corr = (−vn ± 2c)/γ
        let corr = (-vn + sign * 2.0 * c) / g;
        let mut dcorr = [0.0; NVARS];
        for k in 0..NVARS {
            dcorr[k] = (-dvn[k] + sign * 2.0 * dc[k]) / g;
        }

        // en = ((γ−1)vn ± 2c)²/(2(γ²−1)) + (|v|²−vn²)/2
        let a = (g - 1.0) * vn + sign * 2.0 * c;
        let en = a * a / (2.0 * (g * g - 1.0)) + 0.5 * (phys.vmag2(u) - vn * vn);
        let mut den = [0.0; NVARS];
        for k in 0..NVARS {
            den[k] = a * ((g - 1.0) * dvn[k] + sign * 2.0 * dc[k]) / (g * g - 1.0)
                + 0.5 * dvm2[k]
                - vn * dvn[k];
        }

        let psi = [
            1.0,
            v.x + n.x * corr,
            v.y + n.y * corr,
            en,
        ];
        let dpsi = [
            [0.0; NVARS],
            {
                let mut d = [0.0; NVARS];
                for k in 0..NVARS {
                    d[k] = dvx[k] + n.x * dcorr[k];
                }
                d
            },
            {
                let mut d = [0.0; NVARS];
                for k in 0..NVARS {
                    d[k] = dvy[k] + n.y * dcorr[k];
                }
                d
            },
            den,
        ];

        for i in 0..NVARS {
            for k in 0..NVARS {
                out[i][k] = dfmass[k] * psi[i] + fmass * dpsi[i][k];
            }
        }
    }
}

impl InviscidFlux for VanLeerFlux {
    fn name(&self) -> &'static str {
        "VanLeer"
    }

    fn flux(&self, ul: &[f64; NVARS], ur: &[f64; NVARS], n: DVec2) -> [f64; NVARS] {
        let fp = self.split_flux(ul, n, Side::Plus);
        let fm = self.split_flux(ur, n, Side::Minus);
        let mut f = [0.0; NVARS];
        for i in 0..NVARS {
            f[i] = fp[i] + fm[i];
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
        self.split_jacobian(ul, n, Side::Plus, dfdl);
        self.split_jacobian(ur, n, Side::Minus, dfdr);
    }
}
