// crates/cfv_physics/tests/jacobian_consistency.rs

//! 雅可比-残差一致性
//!
//! 对可取的状态场 u 与随机扰动方向 δu，装配的 ∂r/∂u 应满足
//! ‖(r(u+εδu) − r(u))/ε − J·δu‖/‖J·δu‖ → 0（一阶收敛）。
//! r(u) 为正残差（组装输出的相反数）。

use cfv_config::{BoundaryKindSpec, BoundarySpec, FluxScheme, SolverConfig};
use cfv_foundation::NVARS;
use cfv_mesh::{rectangle_grid, RectangleMarkers, UnstructuredMesh2d};
use cfv_physics::{create_solver, BsrMatrix, IdealGasPhysics};

/// 确定性伪随机序列（测试可复现）
fn lcg(seed: &mut u64) -> f64 {
    *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (*seed >> 11) as f64 / (1u64 << 53) as f64 - 0.5
}

/// 扰动的来流状态场
fn perturbed_field(mesh: &UnstructuredMesh2d, phys: &IdealGasPhysics) -> Vec<[f64; NVARS]> {
    (0..mesh.n_cells())
        .map(|c| {
            let p = mesh.cell_center(c);
            let s = (3.1 * p.x).sin() * (2.3 * p.y).cos();
            phys.primitive_to_conserved(&[
                1.0 + 0.08 * s,
                0.9 + 0.05 * (4.0 * p.y).sin(),
                0.1 * (2.0 * p.x).cos(),
                phys.freestream_pressure() * (1.0 + 0.06 * s),
            ])
        })
        .collect()
}

fn positive_residual(
    solver: &dyn cfv_physics::FlowSolver,
    u: &[[f64; NVARS]],
    n: usize,
) -> Vec<f64> {
    let mut residual = vec![[0.0; NVARS]; n];
    solver.assemble_residual(u, &mut residual, None).unwrap();
    residual.iter().flat_map(|r| r.iter().map(|v| -v)).collect()
}

fn directional_derivative_check(config: SolverConfig) {
    let mesh = rectangle_grid(5, 4, 1.0, 0.8, RectangleMarkers::default()).unwrap();
    let solver = create_solver(&mesh, &config).unwrap();
    let p = &config.physics;
    let phys = IdealGasPhysics::new(p.gamma, p.minf, p.tinf, p.reinf, p.pr);

    let u = perturbed_field(&mesh, &phys);
    let r0 = positive_residual(solver.as_ref(), &u, mesh.n_cells());

    let matrix = BsrMatrix::from_mesh(&mesh);
    solver.assemble_jacobian(&u, &matrix).unwrap();

    // 随机方向，按状态量级缩放
    let mut seed = 0x5eed_u64;
    let du: Vec<[f64; NVARS]> = (0..mesh.n_cells())
        .map(|c| {
            let mut d = [0.0; NVARS];
            for (i, v) in d.iter_mut().enumerate() {
                *v = lcg(&mut seed) * (1.0 + u[c][i].abs());
            }
            d
        })
        .collect();
    let du_flat: Vec<f64> = du.iter().flat_map(|d| d.iter().copied()).collect();
    let mut jdu = vec![0.0; du_flat.len()];
    matrix.mul_vec(&du_flat, &mut jdu);
    let jdu_norm = jdu.iter().map(|v| v * v).sum::<f64>().sqrt();
    assert!(jdu_norm > 0.0);

    let mut errors = Vec::new();
    for eps in [1e-4, 1e-6] {
        let up: Vec<[f64; NVARS]> = u
            .iter()
            .zip(du.iter())
            .map(|(s, d)| {
                let mut v = *s;
                for i in 0..NVARS {
                    v[i] += eps * d[i];
                }
                v
            })
            .collect();
        let r1 = positive_residual(solver.as_ref(), &up, mesh.n_cells());

        let err: f64 = r0
            .iter()
            .zip(r1.iter())
            .zip(jdu.iter())
            .map(|((a, b), j)| {
                let fd = (b - a) / eps;
                (fd - j) * (fd - j)
            })
            .sum::<f64>()
            .sqrt()
            / jdu_norm;
        errors.push(err);
    }

    // 一阶收敛：ε 缩小两个量级，误差至少降一个量级
    assert!(
        errors[1] < 1e-4,
        "directional derivative mismatch: {:?}",
        errors
    );
    assert!(
        errors[1] < 0.1 * errors[0] || errors[0] < 1e-9,
        "no first-order decay: {:?}",
        errors
    );
}

fn base_config(jac_flux: FluxScheme) -> SolverConfig {
    let mut config = SolverConfig::default();
    config.numerics.conv_numflux = jac_flux;
    config.numerics.conv_numflux_jac = jac_flux;
    config.numerics.order2 = false;
    // 注意避开滑移壁：镜像状态使 HLLC 恰好落在接触波分支切换点
    // (S_M = 0)，方向导数在该折点处无定义，差分校验会误报。
    for (marker, kind) in [
        (1, BoundaryKindSpec::Extrapolation),
        (2, BoundaryKindSpec::Inoutflow),
        (3, BoundaryKindSpec::Farfield),
        (4, BoundaryKindSpec::Extrapolation),
    ] {
        config.boundaries.push(BoundarySpec {
            marker,
            kind,
            values: vec![],
            opts: vec![],
        });
    }
    config
}

#[test]
fn test_jacobian_consistency_roe() {
    directional_derivative_check(base_config(FluxScheme::Roe));
}

#[test]
fn test_jacobian_consistency_hllc() {
    directional_derivative_check(base_config(FluxScheme::Hllc));
}

#[test]
fn test_jacobian_consistency_hll() {
    directional_derivative_check(base_config(FluxScheme::Hll));
}

#[test]
fn test_jacobian_consistency_van_leer() {
    directional_derivative_check(base_config(FluxScheme::Vanleer));
}

#[test]
fn test_jacobian_consistency_viscous() {
    // 一阶时残差的修正平均梯度与雅可比的薄层梯度一致，
    // 粘性雅可比应通过方向导数校验
    let mut config = base_config(FluxScheme::Roe);
    config.physics.viscous_sim = true;
    config.physics.const_visc = true;
    directional_derivative_check(config);
}

#[test]
fn test_jacobian_rejects_periodic() {
    let mut config = SolverConfig::default();
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
    let mut mesh = rectangle_grid(4, 3, 1.0, 1.0, RectangleMarkers::default()).unwrap();
    mesh.pair_periodic_markers(2, 4).unwrap();

    let solver = create_solver(&mesh, &config).unwrap();
    let u = solver.initialize_unknowns();
    let matrix = BsrMatrix::from_mesh(&mesh);
    assert!(solver.assemble_jacobian(&u, &matrix).is_err());
}
