// crates/cfv_foundation/src/error.rs

//! 统一错误类型
//!
//! 错误分类与求解流程对应：
//! - 配置错误在构造期报告，组装期不再出现；
//! - 状态错误（负密度/负压力）默认不中断计算，仅在显式检查时返回；
//! - 拓扑错误与矩阵后端错误由组装调用以返回值形式上报，无重试。

use thiserror::Error;

/// 统一结果类型别名
pub type FvResult<T> = Result<T, FvError>;

/// CFV 错误类型
#[derive(Debug, Clone, Error)]
pub enum FvError {
    /// 配置错误：未知格式名、非法数值参数等
    #[error("configuration error: {0}")]
    Config(String),

    /// 边界标记缺少对应的边界条件
    #[error("no boundary condition registered for marker {marker}")]
    MissingBoundaryCondition {
        /// 网格中的边界标记
        marker: i32,
    },

    /// 网格拓扑违反约定
    #[error("mesh topology violation: {0}")]
    Topology(String),

    /// 非物理状态（负密度或负压力）
    #[error("invalid state in cell {cell}: {what}")]
    InvalidState {
        /// 出现问题的单元编号
        cell: usize,
        /// 问题描述
        what: &'static str,
    },

    /// 矩阵后端返回的错误
    #[error("matrix backend error: {0}")]
    Matrix(String),
}

impl FvError {
    /// 便捷构造：配置错误
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// 便捷构造：拓扑错误
    pub fn topology(msg: impl Into<String>) -> Self {
        Self::Topology(msg.into())
    }
}
