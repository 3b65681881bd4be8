// apps/cfv_cli/src/commands/run.rs

//! 定常求解命令
//!
//! 显式 Euler 局部时间步伪时间推进：
//! u_i ← u_i + CFL·Δt_i/A_i · residual_i（残差即 −r(u)）。

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use cfv_config::SolverConfig;
use cfv_foundation::NVARS;
use cfv_physics::create_solver;
use clap::Args;
use tracing::{info, warn};

/// run 参数
#[derive(Args)]
pub struct RunArgs {
    /// JSON 配置文件路径
    pub config: PathBuf,
}

/// 残差的 L2 范数
fn residual_norm(residual: &[[f64; NVARS]]) -> f64 {
    residual
        .iter()
        .map(|r| r.iter().map(|v| v * v).sum::<f64>())
        .sum::<f64>()
        .sqrt()
}

/// 执行定常求解
pub fn execute(args: RunArgs) -> anyhow::Result<()> {
    let config = SolverConfig::load(&args.config).context("loading config")?;
    let mesh = super::build_mesh(&config)?;
    info!(
        "mesh: {} cells, {} boundary faces, {} interior faces",
        mesh.n_cells(),
        mesh.n_boundary_faces(),
        mesh.n_interior_faces()
    );

    let solver = create_solver(&mesh, &config).context("building solver")?;
    let mut u = solver.initialize_unknowns();
    let mut residual = vec![[0.0; NVARS]; mesh.n_cells()];
    let mut dtm = vec![0.0; mesh.n_cells()];

    let run = &config.run;
    let start = Instant::now();
    let mut initial_norm = None;

    for iter in 0..run.max_iters {
        solver
            .assemble_residual(&u, &mut residual, Some(&mut dtm))
            .context("residual assembly failed")?;

        let norm = residual_norm(&residual);
        let norm0 = *initial_norm.get_or_insert(norm.max(f64::MIN_POSITIVE));
        let rel = norm / norm0;

        if iter % 50 == 0 {
            info!("iter {:6}: residual {:.6e} (relative {:.3e})", iter, norm, rel);
        }
        if rel < run.tolerance {
            info!(
                "converged at iter {} (relative residual {:.3e}, {:.2}s)",
                iter,
                rel,
                start.elapsed().as_secs_f64()
            );
            return Ok(());
        }
        if !norm.is_finite() {
            anyhow::bail!("residual diverged at iter {}", iter);
        }

        for (cell, state) in u.iter_mut().enumerate() {
            let factor = run.cfl * dtm[cell] / mesh.cell_area(cell);
            for i in 0..NVARS {
                state[i] += factor * residual[cell][i];
            }
        }
    }

    warn!(
        "not converged after {} iterations ({:.2}s)",
        run.max_iters,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
