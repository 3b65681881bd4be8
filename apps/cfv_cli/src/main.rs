// apps/cfv_cli/src/main.rs

//! CFV 命令行界面
//!
//! 空间离散核心之外的定常驱动层：读取 JSON 配置、生成矩形网格、
//! 以局部时间步的显式 Euler 伪时间推进到定常。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// CFV 可压缩流求解器命令行工具
#[derive(Parser)]
#[command(name = "cfv_cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "CFV compressible flow solver", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行定常求解
    Run(commands::run::RunArgs),
    /// 显示配置与网格信息
    Info(commands::info::InfoArgs),
    /// 校验配置文件
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
