// crates/cfv_config/src/solver_config.rs

//! 求解器配置（全 f64）
//!
//! 对应控制文件中可识别的全部选项：对流数值通量及其雅可比格式、
//! 梯度格式、重构/限制器、二阶开关、粘性开关、气体参数与边界条件列表。
//! 所有枚举使用大写串名序列化，与控制文件书写习惯一致。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

// ============================================================
// 格式枚举
// ============================================================

/// 对流数值通量格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum FluxScheme {
    /// Van Leer 通量矢量分裂
    Vanleer,
    /// Roe-Pike 通量差分分裂
    #[default]
    Roe,
    /// HLL 近似黎曼求解器
    Hll,
    /// HLLC（接触波修复）
    Hllc,
    /// 局部 Lax-Friedrichs
    Llf,
    /// Liou-Steffen AUSM
    Ausm,
    /// Liou AUSM+
    Ausmplus,
}

/// 梯度计算格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum GradientSchemeKind {
    /// 零梯度（一阶）
    None,
    /// Green-Gauss
    Greengauss,
    /// 加权最小二乘
    #[default]
    Leastsquares,
}

/// 面值重构 / 限制器格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReconstructionKind {
    /// 无限制线性重构
    #[default]
    None,
    /// WENO 加权梯度
    Weno,
    /// MUSCL van Albada
    Vanalbada,
    /// Barth-Jespersen
    Barthjespersen,
    /// Venkatakrishnan
    Venkatakrishnan,
}

/// 边界条件种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BoundaryKindSpec {
    /// 滑移壁
    Slipwall,
    /// 远场（恒定自由来流）
    Farfield,
    /// 进出流（压力出口 / 来流入口）
    Inoutflow,
    /// 亚声速入口（给定总压与总温，速度垂直边界）
    Inflow,
    /// 外推
    Extrapolation,
    /// 绝热无滑移壁
    Adiabaticwall,
    /// 等温无滑移壁
    Isothermalwall,
    /// 周期边界（成对出现）
    Periodic,
}

// ============================================================
// 配置结构
// ============================================================

/// 气体与来流物理配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// 比热比 γ
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    /// 来流马赫数 M∞
    #[serde(default = "default_minf")]
    pub minf: f64,
    /// 来流温度 T∞ [K]（Sutherland 公式用）
    #[serde(default = "default_tinf")]
    pub tinf: f64,
    /// 来流雷诺数 Re∞
    #[serde(default = "default_reinf")]
    pub reinf: f64,
    /// Prandtl 数
    #[serde(default = "default_pr")]
    pub pr: f64,
    /// 攻角 [rad]
    #[serde(default)]
    pub aoa: f64,
    /// 是否求解 Navier-Stokes（否则为 Euler）
    #[serde(default)]
    pub viscous_sim: bool,
    /// 使用常粘性系数替代 Sutherland 公式
    #[serde(default)]
    pub const_visc: bool,
}

fn default_gamma() -> f64 {
    1.4
}
fn default_minf() -> f64 {
    0.5
}
fn default_tinf() -> f64 {
    288.15
}
fn default_reinf() -> f64 {
    1.0e5
}
fn default_pr() -> f64 {
    0.72
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gamma: default_gamma(),
            minf: default_minf(),
            tinf: default_tinf(),
            reinf: default_reinf(),
            pr: default_pr(),
            aoa: 0.0,
            viscous_sim: false,
            const_visc: false,
        }
    }
}

/// 数值格式配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericsConfig {
    /// 残差用对流通量格式
    #[serde(default)]
    pub conv_numflux: FluxScheme,
    /// 雅可比用对流通量格式（隐式求解）
    #[serde(default = "default_jac_flux")]
    pub conv_numflux_jac: FluxScheme,
    /// 梯度格式
    #[serde(default)]
    pub gradient_scheme: GradientSchemeKind,
    /// 面值重构 / 限制器
    #[serde(default)]
    pub reconstruction: ReconstructionKind,
    /// 限制器参数：Venkatakrishnan 的 K 或 WENO 的 ε
    #[serde(default = "default_limiter_param")]
    pub limiter_param: f64,
    /// 是否启用二阶重构
    #[serde(default)]
    pub order2: bool,
}

fn default_jac_flux() -> FluxScheme {
    FluxScheme::Llf
}
fn default_limiter_param() -> f64 {
    2.0
}

impl Default for NumericsConfig {
    fn default() -> Self {
        Self {
            conv_numflux: FluxScheme::default(),
            conv_numflux_jac: default_jac_flux(),
            gradient_scheme: GradientSchemeKind::default(),
            reconstruction: ReconstructionKind::default(),
            limiter_param: default_limiter_param(),
            order2: false,
        }
    }
}

/// 单个边界标记的边界条件配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundarySpec {
    /// 网格边界标记
    pub marker: i32,
    /// 边界条件种类
    pub kind: BoundaryKindSpec,
    /// 数值参数
    ///
    /// - Inflow: [总压, 总温]
    /// - Adiabaticwall: [壁面切向速度]
    /// - Isothermalwall: [壁面切向速度, 壁面温度]
    #[serde(default)]
    pub values: Vec<f64>,
    /// 整型参数（Periodic: [配对标记]）
    #[serde(default)]
    pub opts: Vec<i32>,
}

/// CLI 驱动用网格段（矩形生成参数）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshSection {
    /// x 方向单元数
    pub nx: usize,
    /// y 方向单元数
    pub ny: usize,
    /// 域长
    pub lx: f64,
    /// 域宽
    pub ly: f64,
    /// 四边标记：下、右、上、左
    pub markers: [i32; 4],
}

impl Default for MeshSection {
    fn default() -> Self {
        Self {
            nx: 32,
            ny: 32,
            lx: 1.0,
            ly: 1.0,
            markers: [1, 2, 3, 4],
        }
    }
}

/// CLI 驱动用迭代控制段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSection {
    /// CFL 数
    #[serde(default = "default_cfl")]
    pub cfl: f64,
    /// 最大迭代步数
    #[serde(default = "default_max_iters")]
    pub max_iters: usize,
    /// 相对残差收敛容差
    #[serde(default = "default_tol")]
    pub tolerance: f64,
}

fn default_cfl() -> f64 {
    0.5
}
fn default_max_iters() -> usize {
    10000
}
fn default_tol() -> f64 {
    1e-8
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            cfl: default_cfl(),
            max_iters: default_max_iters(),
            tolerance: default_tol(),
        }
    }
}

/// 求解器总配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SolverConfig {
    /// 物理配置
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// 数值配置
    #[serde(default)]
    pub numerics: NumericsConfig,
    /// 边界条件列表
    #[serde(default)]
    pub boundaries: Vec<BoundarySpec>,
    /// 网格生成段
    #[serde(default)]
    pub mesh: MeshSection,
    /// 迭代控制段
    #[serde(default)]
    pub run: RunSection,
}

impl SolverConfig {
    /// 从 JSON 文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 校验数值参数与边界条件列表
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.physics.gamma <= 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "gamma",
                constraint: "gamma > 1",
            });
        }
        if self.physics.minf <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "minf",
                constraint: "minf > 0",
            });
        }
        if self.physics.reinf <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "reinf",
                constraint: "reinf > 0",
            });
        }
        if self.physics.pr <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "pr",
                constraint: "pr > 0",
            });
        }
        if self.numerics.limiter_param <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "limiter_param",
                constraint: "limiter_param > 0",
            });
        }
        if self.run.cfl <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "run.cfl",
                constraint: "cfl > 0",
            });
        }

        // 同一标记不得重复配置
        let mut markers: Vec<i32> = self.boundaries.iter().map(|b| b.marker).collect();
        markers.sort_unstable();
        let before = markers.len();
        markers.dedup();
        if markers.len() != before {
            return Err(ConfigError::Boundary(
                "duplicate boundary marker in configuration".into(),
            ));
        }

        // 各类边界的参数个数
        for bc in &self.boundaries {
            let needed = match bc.kind {
                BoundaryKindSpec::Inflow => 2,
                BoundaryKindSpec::Adiabaticwall => 1,
                BoundaryKindSpec::Isothermalwall => 2,
                _ => 0,
            };
            if bc.values.len() < needed {
                return Err(ConfigError::Boundary(format!(
                    "marker {}: {:?} needs {} value(s), got {}",
                    bc.marker,
                    bc.kind,
                    needed,
                    bc.values.len()
                )));
            }
            if bc.kind == BoundaryKindSpec::Periodic && bc.opts.is_empty() {
                return Err(ConfigError::Boundary(format!(
                    "marker {}: periodic boundary needs the partner marker in opts",
                    bc.marker
                )));
            }
        }
        Ok(())
    }
}

// ============================================================
// 测试
// ============================================================
