// apps/cfv_cli/src/commands/validate.rs

//! 配置校验命令

use std::path::PathBuf;

use cfv_config::SolverConfig;
use clap::Args;
use tracing::info;

/// validate 参数
#[derive(Args)]
pub struct ValidateArgs {
    /// JSON 配置文件路径
    pub config: PathBuf,
}

/// 加载并校验配置
pub fn execute(args: ValidateArgs) -> anyhow::Result<()> {
    match SolverConfig::load(&args.config) {
        Ok(_) => {
            info!("{}: configuration valid", args.config.display());
            Ok(())
        }
        Err(err) => {
            anyhow::bail!("{}: {}", args.config.display(), err);
        }
    }
}
