// crates/cfv_physics/src/schemes/mod.rs

//! 无粘数值通量族
//!
//! 每个格式一个子模块，统一实现 [`InviscidFlux`]：
//! - [`llf`]: 局部 Lax-Friedrichs（默认冻结谱半径雅可比 + 精确变体）
//! - [`van_leer`]: Van Leer 通量矢量分裂
//! - [`ausm`]: Liou-Steffen AUSM 与 Liou AUSM+
//! - [`roe`]: Roe-Pike 通量差分分裂（Harten-Hyman 熵修正）
//! - [`hll`]: HLL（Einfeldt 波速估计）
//! - [`hllc`]: HLLC（Batten 星区状态）
//!
//! 依赖 Roe 平均的格式共享 [`roe_average`] 的平均量及其导数链。

pub mod ausm;
pub mod hll;
pub mod hllc;
pub mod llf;
pub mod roe;
pub mod roe_average;
pub mod traits;
pub mod van_leer;

pub use ausm::{AusmFlux, AusmPlusFlux};
pub use hll::HllFlux;
pub use hllc::HllcFlux;
pub use llf::LocalLaxFriedrichsFlux;
pub use roe::RoeFlux;
pub use traits::{FluxJacobian, InviscidFlux};
pub use van_leer::VanLeerFlux;

use crate::gas::IdealGasPhysics;
use cfv_config::FluxScheme;
use tracing::info;

/// 按配置枚举创建无粘通量对象
pub fn create_inviscid_flux(kind: FluxScheme, physics: IdealGasPhysics) -> Box<dyn InviscidFlux> {
    let flux: Box<dyn InviscidFlux> = match kind {
        FluxScheme::Vanleer => Box::new(VanLeerFlux::new(physics)),
        FluxScheme::Roe => Box::new(RoeFlux::new(physics)),
        FluxScheme::Hll => Box::new(HllFlux::new(physics)),
        FluxScheme::Hllc => Box::new(HllcFlux::new(physics)),
        FluxScheme::Llf => Box::new(LocalLaxFriedrichsFlux::new(physics)),
        FluxScheme::Ausm => Box::new(AusmFlux::new(physics)),
        FluxScheme::Ausmplus => Box::new(AusmPlusFlux::new(physics)),
    };
    info!("inviscid flux: using {} scheme", flux.name());
    flux
}

#[cfg(test)]
pub(crate) mod scheme_tests {
    //! 各通量格式共享的性质测试工具

    use super::traits::{FluxJacobian, InviscidFlux};
    use crate::gas::IdealGasPhysics;
    use cfv_foundation::NVARS;
    use glam::DVec2;

    pub fn physics() -> IdealGasPhysics {
        IdealGasPhysics::new(1.4, 0.5, 288.15, 1.0e5, 0.72)
    }

    pub fn state(rho: f64, vx: f64, vy: f64, p: f64) -> [f64; NVARS] {
        physics().primitive_to_conserved(&[rho, vx, vy, p])
    }

    /// 左右亚声速通用状态对
    pub fn generic_pair() -> ([f64; NVARS], [f64; NVARS]) {
        (state(1.2, 0.35, -0.1, 0.9), state(0.9, 0.25, 0.15, 0.7))
    }

    /// 一致性：F(u, u, n̂) = F(u)·n̂
    pub fn check_consistency(flux: &dyn InviscidFlux) {
        let phys = physics();
        let u = state(1.1, 0.3, -0.2, 0.8);
        for n in [DVec2::new(1.0, 0.0), DVec2::new(0.6, 0.8)] {
            let f = flux.flux(&u, &u, n);
            let fe = phys.euler_flux(&u, n);
            for i in 0..NVARS {
                assert!(
                    (f[i] - fe[i]).abs() < 1e-12 * (1.0 + fe[i].abs()),
                    "{}: consistency failed at {}: {} vs {}",
                    flux.name(),
                    i,
                    f[i],
                    fe[i]
                );
            }
        }
    }

    /// 守恒性：F(u_L, u_R, n̂) = −F(u_R, u_L, −n̂)
    pub fn check_conservation(flux: &dyn InviscidFlux) {
        let (ul, ur) = generic_pair();
        let n = DVec2::new(0.6, 0.8);
        let f = flux.flux(&ul, &ur, n);
        let g = flux.flux(&ur, &ul, -n);
        for i in 0..NVARS {
            assert!(
                (f[i] + g[i]).abs() < 1e-12 * (1.0 + f[i].abs()),
                "{}: conservation failed at {}",
                flux.name(),
                i
            );
        }
    }

    /// 旋转不变性：F(Ru_L, Ru_R, Rn̂) = R F(u_L, u_R, n̂)
    pub fn check_rotational_invariance(flux: &dyn InviscidFlux) {
        let (ul, ur) = generic_pair();
        let n = DVec2::new(0.6, 0.8);
        let theta = 0.7_f64;
        let (s, c) = theta.sin_cos();
        let rot = |u: &[f64; NVARS]| -> [f64; NVARS] {
            [
                u[0],
                c * u[1] - s * u[2],
                s * u[1] + c * u[2],
                u[3],
            ]
        };
        let rn = DVec2::new(c * n.x - s * n.y, s * n.x + c * n.y);

        let f = flux.flux(&ul, &ur, n);
        let fr = flux.flux(&rot(&ul), &rot(&ur), rn);
        let f_rotated = rot(&f);
        for i in 0..NVARS {
            assert!(
                (fr[i] - f_rotated[i]).abs() < 1e-12 * (1.0 + f_rotated[i].abs()),
                "{}: rotational invariance failed at {}",
                flux.name(),
                i
            );
        }
    }

    /// 解析雅可比与中心差分对比（相对误差 < 1e-6）
    pub fn check_jacobian_vs_fd(flux: &dyn InviscidFlux) {
        let (ul, ur) = generic_pair();
        let n = DVec2::new(0.6, 0.8);
        let mut dfdl: FluxJacobian = [[0.0; NVARS]; NVARS];
        let mut dfdr: FluxJacobian = [[0.0; NVARS]; NVARS];
        flux.jacobian(&ul, &ur, n, &mut dfdl, &mut dfdr);

        let mut norm = 0.0;
        let mut err_l = 0.0;
        let mut err_r = 0.0;
        for k in 0..NVARS {
            let h = 1e-7 * (1.0 + ul[k].abs());
            let mut up = ul;
            let mut um = ul;
            up[k] += h;
            um[k] -= h;
            let fp = flux.flux(&up, &ur, n);
            let fm = flux.flux(&um, &ur, n);

            let hr = 1e-7 * (1.0 + ur[k].abs());
            let mut rp = ur;
            let mut rm = ur;
            rp[k] += hr;
            rm[k] -= hr;
            let gp = flux.flux(&ul, &rp, n);
            let gm = flux.flux(&ul, &rm, n);

            for i in 0..NVARS {
                let fd_l = (fp[i] - fm[i]) / (2.0 * h);
                let fd_r = (gp[i] - gm[i]) / (2.0 * hr);
                err_l += (dfdl[i][k] - fd_l).powi(2);
                err_r += (dfdr[i][k] - fd_r).powi(2);
                norm += fd_l * fd_l + fd_r * fd_r;
            }
        }
        let rel = ((err_l + err_r) / norm.max(1e-300)).sqrt();
        assert!(
            rel < 1e-6,
            "{}: jacobian mismatch, relative error {:.3e}",
            flux.name(),
            rel
        );
    }
}
