// crates/cfv_physics/tests/periodic_advection.rs

//! 周期边界密度波输运
//!
//! 左右两侧周期配对，均匀速度场携带密度鼓包走完一个周期：
//! 鼓包应从一侧流出、另一侧流入而无反射，总质量精确守恒，
//! 回到初始位置后与初值保持良好吻合。

use cfv_config::{
    BoundaryKindSpec, BoundarySpec, FluxScheme, GradientSchemeKind, ReconstructionKind,
    SolverConfig,
};
use cfv_foundation::NVARS;
use cfv_mesh::{rectangle_grid, RectangleMarkers};
use cfv_physics::{create_solver, FlowSolver, IdealGasPhysics};

fn total_mass(mesh: &cfv_mesh::UnstructuredMesh2d, u: &[[f64; NVARS]]) -> f64 {
    (0..mesh.n_cells())
        .map(|c| u[c][0] * mesh.cell_area(c))
        .sum()
}

/// 两步 Runge-Kutta (Heun) 推进一个时间步
fn rk2_step(
    solver: &dyn FlowSolver,
    mesh: &cfv_mesh::UnstructuredMesh2d,
    u: &mut Vec<[f64; NVARS]>,
    dt: f64,
) {
    let n = mesh.n_cells();
    let mut residual = vec![[0.0; NVARS]; n];

    solver.assemble_residual(u, &mut residual, None).unwrap();
    let u1: Vec<[f64; NVARS]> = (0..n)
        .map(|c| {
            let f = dt / mesh.cell_area(c);
            let mut v = u[c];
            for i in 0..NVARS {
                v[i] += f * residual[c][i];
            }
            v
        })
        .collect();

    solver.assemble_residual(&u1, &mut residual, None).unwrap();
    for c in 0..n {
        let f = dt / mesh.cell_area(c);
        for i in 0..NVARS {
            u[c][i] = 0.5 * u[c][i] + 0.5 * (u1[c][i] + f * residual[c][i]);
        }
    }
}

#[test]
fn test_density_bump_advects_through_periodic_pair() {
    let nx = 64;
    let markers = RectangleMarkers::default(); // 下1 右2 上3 左4
    let mut mesh = rectangle_grid(nx, 1, 1.0, 1.0 / nx as f64, markers).unwrap();
    mesh.pair_periodic_markers(2, 4).unwrap();

    let mut config = SolverConfig::default();
    config.numerics.conv_numflux = FluxScheme::Hllc;
    config.numerics.order2 = true;
    config.numerics.gradient_scheme = GradientSchemeKind::Greengauss;
    config.numerics.reconstruction = ReconstructionKind::None;
    for (marker, kind, opts) in [
        (1, BoundaryKindSpec::Slipwall, vec![]),
        (2, BoundaryKindSpec::Periodic, vec![4]),
        (3, BoundaryKindSpec::Slipwall, vec![]),
        (4, BoundaryKindSpec::Periodic, vec![2]),
    ] {
        config.boundaries.push(BoundarySpec {
            marker,
            kind,
            values: vec![],
            opts,
        });
    }

    let solver = create_solver(&mesh, &config).unwrap();
    let phys = IdealGasPhysics::new(1.4, 0.5, 288.15, 1.0e5, 0.72);

    // 均匀速度 + 高斯密度鼓包（纯对流的熵波）
    let advect_speed = 1.0;
    let amplitude = 0.2;
    let init = |x: f64| -> [f64; NVARS] {
        let r = (x - 0.3) / 0.08;
        phys.primitive_to_conserved(&[1.0 + amplitude * (-r * r).exp(), advect_speed, 0.0, 1.0])
    };
    let mut u: Vec<[f64; NVARS]> = (0..mesh.n_cells())
        .map(|c| init(mesh.cell_center(c).x))
        .collect();
    let u0 = u.clone();
    let mass0 = total_mass(&mesh, &u);

    // 一个输运周期
    let t_end = 1.0 / advect_speed;
    let mut dtm = vec![0.0; mesh.n_cells()];
    let mut residual = vec![[0.0; NVARS]; mesh.n_cells()];
    solver
        .assemble_residual(&u, &mut residual, Some(&mut dtm))
        .unwrap();
    let dt_base = 0.3 * dtm.iter().cloned().fold(f64::INFINITY, f64::min);

    let mut t = 0.0;
    while t < t_end {
        let dt = dt_base.min(t_end - t);
        rk2_step(solver.as_ref(), &mesh, &mut u, dt);
        t += dt;
    }

    // 质量精确守恒（周期面两侧通量反号相消）
    let mass = total_mass(&mesh, &u);
    assert!(
        (mass - mass0).abs() < 1e-10 * mass0,
        "mass drift {:.3e}",
        mass - mass0
    );

    // 回到初始位置：与初值的 L2 偏差远小于鼓包能量
    let mut err2 = 0.0;
    let mut ref2 = 0.0;
    let mut rho_max: f64 = 0.0;
    for c in 0..mesh.n_cells() {
        err2 += (u[c][0] - u0[c][0]).powi(2);
        ref2 += (u0[c][0] - 1.0).powi(2);
        rho_max = rho_max.max(u[c][0]);
    }
    let rel = (err2 / ref2).sqrt();
    assert!(rel < 0.3, "L2 error after one transit: {:.3}", rel);

    // 峰值保持（无反射、无过度耗散）
    assert!(
        rho_max > 1.0 + 0.6 * amplitude,
        "bump amplitude lost: max rho {:.4}",
        rho_max
    );
    // 无明显下冲
    for c in 0..mesh.n_cells() {
        assert!(u[c][0] > 0.95, "spurious undershoot: {:.4}", u[c][0]);
    }
}

#[test]
fn test_periodic_residual_antisymmetry() {
    // 周期对上的面通量互为相反数，滑移壁不产生质量通量：
    // 任意场的质量残差总和应为零
    let nx = 16;
    let mut mesh =
        rectangle_grid(nx, 1, 1.0, 1.0 / nx as f64, RectangleMarkers::default()).unwrap();
    mesh.pair_periodic_markers(2, 4).unwrap();

    let mut config = SolverConfig::default();
    config.numerics.conv_numflux = FluxScheme::Roe;
    for (marker, kind, opts) in [
        (1, BoundaryKindSpec::Slipwall, vec![]),
        (2, BoundaryKindSpec::Periodic, vec![4]),
        (3, BoundaryKindSpec::Slipwall, vec![]),
        (4, BoundaryKindSpec::Periodic, vec![2]),
    ] {
        config.boundaries.push(BoundarySpec {
            marker,
            kind,
            values: vec![],
            opts,
        });
    }
    let solver = create_solver(&mesh, &config).unwrap();
    let phys = IdealGasPhysics::new(1.4, 0.5, 288.15, 1.0e5, 0.72);

    let u: Vec<[f64; NVARS]> = (0..mesh.n_cells())
        .map(|c| {
            let x = mesh.cell_center(c).x;
            phys.primitive_to_conserved(&[1.0 + 0.1 * (6.28 * x).sin(), 0.8, 0.0, 1.0])
        })
        .collect();
    let mut residual = vec![[0.0; NVARS]; mesh.n_cells()];
    solver.assemble_residual(&u, &mut residual, None).unwrap();

    // 滑移壁与周期边界都不产生净质量源
    let net_mass: f64 = residual.iter().map(|r| r[0]).sum();
    assert!(net_mass.abs() < 1e-12, "net mass residual {:.3e}", net_mass);
}
