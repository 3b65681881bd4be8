// crates/cfv_physics/src/schemes/roe_average.rs

//! Roe 平均量及其对守恒变量的导数链
//!
//! R = √(ρ_R/ρ_L)，ρ̃ = Rρ_L，ṽ = (Rv_R + v_L)/(R+1)，H̃ 同理，
//! c̃ = √((γ−1)(H̃ − |ṽ|²/2))。
//!
//! Roe/HLL/HLLC 三个格式共享本模块：通量计算只用平均量本身，
//! 雅可比计算沿平均量的导数向量做链式法则。

use crate::gas::IdealGasPhysics;
use cfv_foundation::NVARS;
use glam::DVec2;

/// Roe 平均量
#[derive(Debug, Clone, Copy)]
pub struct RoeAverage {
    /// 密度比根 R = √(ρ_R/ρ_L)
    pub rij: f64,
    /// 平均密度
    pub rho: f64,
    /// 平均速度
    pub vx: f64,
    /// 平均速度
    pub vy: f64,
    /// 平均速度模方
    pub vm2: f64,
    /// 平均法向速度
    pub vn: f64,
    /// 平均总焓
    pub h: f64,
    /// 平均声速
    pub c: f64,
}

/// Roe 平均量对左右守恒状态的导数向量
#[derive(Debug, Clone, Copy, Default)]
pub struct RoeAverageJac {
    pub drho_l: [f64; NVARS],
    pub drho_r: [f64; NVARS],
    pub dvx_l: [f64; NVARS],
    pub dvx_r: [f64; NVARS],
    pub dvy_l: [f64; NVARS],
    pub dvy_r: [f64; NVARS],
    pub dvm2_l: [f64; NVARS],
    pub dvm2_r: [f64; NVARS],
    pub dvn_l: [f64; NVARS],
    pub dvn_r: [f64; NVARS],
    pub dh_l: [f64; NVARS],
    pub dh_r: [f64; NVARS],
    pub dc_l: [f64; NVARS],
    pub dc_r: [f64; NVARS],
}

/// 计算 Roe 平均量
pub fn roe_average(
    phys: &IdealGasPhysics,
    ul: &[f64; NVARS],
    ur: &[f64; NVARS],
    n: DVec2,
) -> RoeAverage {
    let rij = (ur[0] / ul[0]).sqrt();
    let vl = phys.velocity(ul);
    let vr = phys.velocity(ur);
    let hl = phys.total_enthalpy(ul);
    let hr = phys.total_enthalpy(ur);

    let w = 1.0 / (rij + 1.0);
    let vx = (rij * vr.x + vl.x) * w;
    let vy = (rij * vr.y + vl.y) * w;
    let h = (rij * hr + hl) * w;
    let vm2 = vx * vx + vy * vy;
    let vn = vx * n.x + vy * n.y;
    let c = ((phys.gamma - 1.0) * (h - 0.5 * vm2)).sqrt();

    RoeAverage {
        rij,
        rho: rij * ul[0],
        vx,
        vy,
        vm2,
        vn,
        h,
        c,
    }
}

/// 计算 Roe 平均量及导数链
pub fn roe_average_with_jacobian(
    phys: &IdealGasPhysics,
    ul: &[f64; NVARS],
    ur: &[f64; NVARS],
    n: DVec2,
) -> (RoeAverage, RoeAverageJac) {
    let avg = roe_average(phys, ul, ur, n);
    let mut jac = RoeAverageJac::default();

    let rij = avg.rij;
    let w = 1.0 / (rij + 1.0);

    // dR/du：只含密度分量
    let mut drij_l = [0.0; NVARS];
    let mut drij_r = [0.0; NVARS];
    drij_l[0] = -rij / (2.0 * ul[0]);
    drij_r[0] = 1.0 / (2.0 * rij * ul[0]);

    // ρ̃ = Rρ_L
    jac.drho_l[0] = ul[0] * drij_l[0] + rij;
    jac.drho_r[0] = ul[0] * drij_r[0];

    // 加权平均量 q̃ = (Rq_R + q_L)/(R+1)：
    // dq̃_L = (dq_L + dR_L(q_R − q̃))/(R+1)，dq̃_R = (R·dq_R + dR_R(q_R − q̃))/(R+1)
    let weighted = |ql_d: &[f64; NVARS],
                    qr_d: &[f64; NVARS],
                    qr_val: f64,
                    q_avg: f64|
     -> ([f64; NVARS], [f64; NVARS]) {
        let mut dl = [0.0; NVARS];
        let mut dr = [0.0; NVARS];
        for k in 0..NVARS {
            dl[k] = (ql_d[k] + drij_l[k] * (qr_val - q_avg)) * w;
            dr[k] = (rij * qr_d[k] + drij_r[k] * (qr_val - q_avg)) * w;
        }
        (dl, dr)
    };

    let vr = phys.velocity(ur);
    let hr = phys.total_enthalpy(ur);
    (jac.dvx_l, jac.dvx_r) = weighted(&phys.dvx(ul), &phys.dvx(ur), vr.x, avg.vx);
    (jac.dvy_l, jac.dvy_r) = weighted(&phys.dvy(ul), &phys.dvy(ur), vr.y, avg.vy);
    (jac.dh_l, jac.dh_r) = weighted(&phys.denthalpy(ul), &phys.denthalpy(ur), hr, avg.h);

    for k in 0..NVARS {
        jac.dvm2_l[k] = 2.0 * avg.vx * jac.dvx_l[k] + 2.0 * avg.vy * jac.dvy_l[k];
        jac.dvm2_r[k] = 2.0 * avg.vx * jac.dvx_r[k] + 2.0 * avg.vy * jac.dvy_r[k];
        jac.dvn_l[k] = jac.dvx_l[k] * n.x + jac.dvy_l[k] * n.y;
        jac.dvn_r[k] = jac.dvx_r[k] * n.x + jac.dvy_r[k] * n.y;
        // c̃² = (γ−1)(H̃ − |ṽ|²/2)
        jac.dc_l[k] =
            (phys.gamma - 1.0) * (jac.dh_l[k] - 0.5 * jac.dvm2_l[k]) / (2.0 * avg.c);
        jac.dc_r[k] =
            (phys.gamma - 1.0) * (jac.dh_r[k] - 0.5 * jac.dvm2_r[k]) / (2.0 * avg.c);
    }

    (avg, jac)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physics() -> IdealGasPhysics {
        IdealGasPhysics::new(1.4, 0.5, 288.15, 1.0e5, 0.72)
    }

    #[test]
    fn test_roe_average_equal_states() {
        let phys = physics();
        let u = phys.primitive_to_conserved(&[1.2, 0.4, -0.2, 0.9]);
        let n = DVec2::new(0.6, 0.8);
        let avg = roe_average(&phys, &u, &u, n);
        // 等状态的 Roe 平均退化为该状态
        assert!((avg.rij - 1.0).abs() < 1e-14);
        assert!((avg.rho - u[0]).abs() < 1e-14);
        assert!((avg.vn - phys.normal_velocity(&u, n)).abs() < 1e-14);
        assert!((avg.c - phys.sound_speed(&u)).abs() < 1e-13);
        assert!((avg.h - phys.total_enthalpy(&u)).abs() < 1e-14);
    }

    #[test]
    fn test_roe_average_jacobian_vs_fd() {
        let phys = physics();
        let ul = phys.primitive_to_conserved(&[1.2, 0.35, -0.1, 0.9]);
        let ur = phys.primitive_to_conserved(&[0.9, 0.25, 0.15, 0.7]);
        let n = DVec2::new(0.6, 0.8);
        let (_, jac) = roe_average_with_jacobian(&phys, &ul, &ur, n);

        let quantities: [(fn(&RoeAverage) -> f64, [f64; NVARS], [f64; NVARS]); 5] = [
            (|a| a.rho, jac.drho_l, jac.drho_r),
            (|a| a.vx, jac.dvx_l, jac.dvx_r),
            (|a| a.vn, jac.dvn_l, jac.dvn_r),
            (|a| a.h, jac.dh_l, jac.dh_r),
            (|a| a.c, jac.dc_l, jac.dc_r),
        ];

        for (get, dl, dr) in quantities {
            for k in 0..NVARS {
                let h = 1e-7 * (1.0 + ul[k].abs());
                let mut up = ul;
                let mut um = ul;
                up[k] += h;
                um[k] -= h;
                let fd = (get(&roe_average(&phys, &up, &ur, n))
                    - get(&roe_average(&phys, &um, &ur, n)))
                    / (2.0 * h);
                assert!(
                    (fd - dl[k]).abs() < 1e-6 * (1.0 + fd.abs()),
                    "left derivative component {}: fd {} vs {}",
                    k,
                    fd,
                    dl[k]
                );

                let hr = 1e-7 * (1.0 + ur[k].abs());
                let mut rp = ur;
                let mut rm = ur;
                rp[k] += hr;
                rm[k] -= hr;
                let fd = (get(&roe_average(&phys, &ul, &rp, n))
                    - get(&roe_average(&phys, &ul, &rm, n)))
                    / (2.0 * hr);
                assert!(
                    (fd - dr[k]).abs() < 1e-6 * (1.0 + fd.abs()),
                    "right derivative component {}: fd {} vs {}",
                    k,
                    fd,
                    dr[k]
                );
            }
        }
    }
}
