// crates/cfv_config/src/error.rs

//! 配置错误类型

use std::path::PathBuf;
use thiserror::Error;

/// 配置加载与校验错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("cannot read config file {path}: {source}")]
    Io {
        /// 文件路径
        path: PathBuf,
        /// 底层 IO 错误
        source: std::io::Error,
    },

    /// JSON 反序列化失败
    #[error("cannot parse config file {path}: {source}")]
    Parse {
        /// 文件路径
        path: PathBuf,
        /// 底层 serde 错误
        source: serde_json::Error,
    },

    /// 数值参数超出合法范围
    #[error("parameter `{field}` violates constraint: {constraint}")]
    OutOfRange {
        /// 参数名
        field: &'static str,
        /// 约束描述
        constraint: &'static str,
    },

    /// 边界条件列表不完整或冲突
    #[error("boundary configuration error: {0}")]
    Boundary(String),
}
