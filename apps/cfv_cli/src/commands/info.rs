// apps/cfv_cli/src/commands/info.rs

//! 配置与网格信息命令

use std::path::PathBuf;

use anyhow::Context;
use cfv_config::SolverConfig;
use clap::Args;

/// info 参数
#[derive(Args)]
pub struct InfoArgs {
    /// JSON 配置文件路径
    pub config: PathBuf,
}

/// 打印配置与网格摘要
pub fn execute(args: InfoArgs) -> anyhow::Result<()> {
    let config = SolverConfig::load(&args.config).context("loading config")?;
    let mesh = super::build_mesh(&config)?;

    println!("physics:");
    println!("  gamma = {}", config.physics.gamma);
    println!("  Minf  = {}", config.physics.minf);
    println!("  Reinf = {}", config.physics.reinf);
    println!("  aoa   = {} rad", config.physics.aoa);
    println!("  viscous = {}", config.physics.viscous_sim);
    println!("numerics:");
    println!("  flux          = {:?}", config.numerics.conv_numflux);
    println!("  flux (jac)    = {:?}", config.numerics.conv_numflux_jac);
    println!("  gradients     = {:?}", config.numerics.gradient_scheme);
    println!("  reconstruction= {:?}", config.numerics.reconstruction);
    println!("  order2        = {}", config.numerics.order2);
    println!("mesh:");
    println!("  cells          = {}", mesh.n_cells());
    println!("  boundary faces = {}", mesh.n_boundary_faces());
    println!("  interior faces = {}", mesh.n_interior_faces());
    println!("  markers        = {:?}", mesh.active_markers());
    println!("boundaries:");
    for bc in &config.boundaries {
        println!("  marker {} -> {:?}", bc.marker, bc.kind);
    }
    Ok(())
}
