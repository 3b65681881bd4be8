// crates/cfv_physics/src/gas.rs

//! 理想气体物性与解析导数
//!
//! 无量纲化约定：ρ∞ = 1，|v∞| = 1，p∞ = 1/(γM∞²)，T∞ = 1。
//! 气体常数 R = 1/(γM∞²)，使 p = ρRT 成立。粘性系数为 Sutherland
//! 公式除以 Re∞ 的无量纲值。
//!
//! 所有函数均为纯函数。对守恒变量 u = (ρ, ρu, ρv, ρE) 的导数以长度
//! NVARS 的导数向量返回，供通量与边界条件的解析雅可比链式使用。
//!
//! # 变量组
//!
//! - 守恒量: (ρ, ρu, ρv, ρE)
//! - 原始量: (ρ, u, v, p)
//! - 原始量-2: (ρ, u, v, T)

use cfv_foundation::NVARS;
use glam::DVec2;

/// Sutherland 常数 [K]
const SUTHERLAND_S: f64 = 110.4;

/// 理想气体物性
///
/// 持有气体与来流常数，随空间离散对象构造一次，只读共享。
#[derive(Debug, Clone, Copy)]
pub struct IdealGasPhysics {
    /// 比热比 γ
    pub gamma: f64,
    /// 来流马赫数
    pub minf: f64,
    /// 来流温度 [K]
    pub tinf: f64,
    /// 来流雷诺数
    pub reinf: f64,
    /// Prandtl 数
    pub pr: f64,
}

impl IdealGasPhysics {
    /// 创建物性对象
    pub fn new(gamma: f64, minf: f64, tinf: f64, reinf: f64, pr: f64) -> Self {
        Self {
            gamma,
            minf,
            tinf,
            reinf,
            pr,
        }
    }

    // ------------------------------------------------------------
    // 基本量
    // ------------------------------------------------------------

    /// 无量纲气体常数 R = 1/(γM∞²)
    #[inline]
    pub fn gas_constant(&self) -> f64 {
        1.0 / (self.gamma * self.minf * self.minf)
    }

    /// 来流静压 p∞ = 1/(γM∞²)
    #[inline]
    pub fn freestream_pressure(&self) -> f64 {
        self.gas_constant()
    }

    /// 速度向量
    #[inline]
    pub fn velocity(&self, u: &[f64; NVARS]) -> DVec2 {
        DVec2::new(u[1] / u[0], u[2] / u[0])
    }

    /// 速度模方 |v|²
    #[inline]
    pub fn vmag2(&self, u: &[f64; NVARS]) -> f64 {
        (u[1] * u[1] + u[2] * u[2]) / (u[0] * u[0])
    }

    /// 静压 p = (γ−1)(ρE − ½ρ|v|²)
    #[inline]
    pub fn pressure(&self, u: &[f64; NVARS]) -> f64 {
        (self.gamma - 1.0) * (u[3] - 0.5 * (u[1] * u[1] + u[2] * u[2]) / u[0])
    }

    /// 声速 c = √(γp/ρ)
    #[inline]
    pub fn sound_speed(&self, u: &[f64; NVARS]) -> f64 {
        (self.gamma * self.pressure(u) / u[0]).sqrt()
    }

    /// 总焓 H = (ρE + p)/ρ
    #[inline]
    pub fn total_enthalpy(&self, u: &[f64; NVARS]) -> f64 {
        (u[3] + self.pressure(u)) / u[0]
    }

    /// 马赫数
    #[inline]
    pub fn mach(&self, u: &[f64; NVARS]) -> f64 {
        self.vmag2(u).sqrt() / self.sound_speed(u)
    }

    /// 法向速度 v·n̂
    #[inline]
    pub fn normal_velocity(&self, u: &[f64; NVARS], n: DVec2) -> f64 {
        (u[1] * n.x + u[2] * n.y) / u[0]
    }

    /// 温度 T = p/(ρR)
    #[inline]
    pub fn temperature(&self, rho: f64, p: f64) -> f64 {
        p / (rho * self.gas_constant())
    }

    /// 状态是否物理（正密度、正压力）
    #[inline]
    pub fn is_physical(&self, u: &[f64; NVARS]) -> bool {
        u[0] > 0.0 && self.pressure(u) > 0.0
    }

    // ------------------------------------------------------------
    // 变量组转换
    // ------------------------------------------------------------

    /// 守恒量 → 原始量 (ρ, u, v, p)
    #[inline]
    pub fn conserved_to_primitive(&self, u: &[f64; NVARS]) -> [f64; NVARS] {
        [u[0], u[1] / u[0], u[2] / u[0], self.pressure(u)]
    }

    /// 原始量 → 守恒量
    #[inline]
    pub fn primitive_to_conserved(&self, w: &[f64; NVARS]) -> [f64; NVARS] {
        let ke = 0.5 * w[0] * (w[1] * w[1] + w[2] * w[2]);
        [
            w[0],
            w[0] * w[1],
            w[0] * w[2],
            w[3] / (self.gamma - 1.0) + ke,
        ]
    }

    /// 守恒量 → 原始量-2 (ρ, u, v, T)
    #[inline]
    pub fn conserved_to_primitive2(&self, u: &[f64; NVARS]) -> [f64; NVARS] {
        let p = self.pressure(u);
        [u[0], u[1] / u[0], u[2] / u[0], self.temperature(u[0], p)]
    }

    /// 原始量-2 → 守恒量
    #[inline]
    pub fn primitive2_to_conserved(&self, w: &[f64; NVARS]) -> [f64; NVARS] {
        let p = w[0] * self.gas_constant() * w[3];
        self.primitive_to_conserved(&[w[0], w[1], w[2], p])
    }

    /// 由攻角生成来流守恒状态
    ///
    /// ρ = 1，v = (cos α, sin α)，p = 1/(γM∞²)。
    pub fn freestream_state(&self, aoa: f64) -> [f64; NVARS] {
        self.primitive_to_conserved(&[1.0, aoa.cos(), aoa.sin(), self.freestream_pressure()])
    }

    // ------------------------------------------------------------
    // 导数向量（对守恒变量）
    // ------------------------------------------------------------

    /// d(vx)/du
    #[inline]
    pub fn dvx(&self, u: &[f64; NVARS]) -> [f64; NVARS] {
        [-u[1] / (u[0] * u[0]), 1.0 / u[0], 0.0, 0.0]
    }

    /// d(vy)/du
    #[inline]
    pub fn dvy(&self, u: &[f64; NVARS]) -> [f64; NVARS] {
        [-u[2] / (u[0] * u[0]), 0.0, 1.0 / u[0], 0.0]
    }

    /// d(|v|²)/du
    #[inline]
    pub fn dvmag2(&self, u: &[f64; NVARS]) -> [f64; NVARS] {
        let v = self.velocity(u);
        [
            -2.0 * self.vmag2(u) / u[0],
            2.0 * v.x / u[0],
            2.0 * v.y / u[0],
            0.0,
        ]
    }

    /// dp/du
    #[inline]
    pub fn dpressure(&self, u: &[f64; NVARS]) -> [f64; NVARS] {
        let g1 = self.gamma - 1.0;
        let v = self.velocity(u);
        [0.5 * g1 * self.vmag2(u), -g1 * v.x, -g1 * v.y, g1]
    }

    /// dc/du
    #[inline]
    pub fn dsound_speed(&self, u: &[f64; NVARS]) -> [f64; NVARS] {
        let c = self.sound_speed(u);
        let p = self.pressure(u);
        let dp = self.dpressure(u);
        let mut d = [0.0; NVARS];
        for k in 0..NVARS {
            d[k] = self.gamma / (2.0 * c * u[0]) * dp[k];
        }
        d[0] -= self.gamma * p / (2.0 * c * u[0] * u[0]);
        d
    }

    /// dH/du
    #[inline]
    pub fn denthalpy(&self, u: &[f64; NVARS]) -> [f64; NVARS] {
        let h = self.total_enthalpy(u);
        let dp = self.dpressure(u);
        let mut d = [0.0; NVARS];
        for k in 0..NVARS {
            d[k] = dp[k] / u[0];
        }
        d[0] -= h / u[0];
        d[3] += 1.0 / u[0];
        d
    }

    /// d(v·n̂)/du
    #[inline]
    pub fn dnormal_velocity(&self, u: &[f64; NVARS], n: DVec2) -> [f64; NVARS] {
        let vn = self.normal_velocity(u, n);
        [-vn / u[0], n.x / u[0], n.y / u[0], 0.0]
    }

    /// dT/du
    #[inline]
    pub fn dtemperature(&self, u: &[f64; NVARS]) -> [f64; NVARS] {
        let r = self.gas_constant();
        let p = self.pressure(u);
        let dp = self.dpressure(u);
        let mut d = [0.0; NVARS];
        for k in 0..NVARS {
            d[k] = dp[k] / (u[0] * r);
        }
        d[0] -= p / (u[0] * u[0] * r);
        d
    }

    /// 原始量-2 (ρ, u, v, T) 对守恒量的雅可比（按行）
    pub fn jacobian_primitive2(&self, u: &[f64; NVARS]) -> [[f64; NVARS]; NVARS] {
        [
            [1.0, 0.0, 0.0, 0.0],
            self.dvx(u),
            self.dvy(u),
            self.dtemperature(u),
        ]
    }

    // ------------------------------------------------------------
    // Euler 解析通量
    // ------------------------------------------------------------

    /// 法向 Euler 通量 F(u)·n̂
    pub fn euler_flux(&self, u: &[f64; NVARS], n: DVec2) -> [f64; NVARS] {
        let vn = self.normal_velocity(u, n);
        let p = self.pressure(u);
        [
            u[0] * vn,
            u[1] * vn + p * n.x,
            u[2] * vn + p * n.y,
            (u[3] + p) * vn,
        ]
    }

    /// 法向 Euler 通量雅可比 ∂(F·n̂)/∂u
    pub fn euler_flux_jacobian(&self, u: &[f64; NVARS], n: DVec2) -> [[f64; NVARS]; NVARS] {
        let vn = self.normal_velocity(u, n);
        let p = self.pressure(u);
        let dvn = self.dnormal_velocity(u, n);
        let dp = self.dpressure(u);
        let nd = [n.x, n.y];

        let mut a = [[0.0; NVARS]; NVARS];
        a[0] = [0.0, n.x, n.y, 0.0];
        for dim in 0..2 {
            for k in 0..NVARS {
                a[dim + 1][k] = u[dim + 1] * dvn[k] + nd[dim] * dp[k];
            }
            a[dim + 1][dim + 1] += vn;
        }
        for k in 0..NVARS {
            a[3][k] = (u[3] + p) * dvn[k] + vn * dp[k];
        }
        a[3][3] += vn;
        a
    }

    // ------------------------------------------------------------
    // 输运物性
    // ------------------------------------------------------------

    /// 常粘性系数（无量纲，= 1/Re∞）
    #[inline]
    pub fn constant_viscosity(&self) -> f64 {
        1.0 / self.reinf
    }

    /// Sutherland 粘性系数（无量纲，已除以 Re∞）
    ///
    /// μ(T) = (1+S*)/(T+S*) · T^{3/2} / Re∞，S* = 110.4/T∞。
    pub fn viscosity(&self, u: &[f64; NVARS]) -> f64 {
        let t = self.temperature(u[0], self.pressure(u));
        let s = SUTHERLAND_S / self.tinf;
        (1.0 + s) / (t + s) * t.powf(1.5) / self.reinf
    }

    /// dμ/du（Sutherland）
    pub fn dviscosity(&self, u: &[f64; NVARS]) -> [f64; NVARS] {
        let t = self.temperature(u[0], self.pressure(u));
        let s = SUTHERLAND_S / self.tinf;
        // dμ/dT = (1+S*)/Re · √T (T/2 + 3S*/2)/(T+S*)²
        let dmu_dt = (1.0 + s) / self.reinf * t.sqrt() * (0.5 * t + 1.5 * s)
            / ((t + s) * (t + s));
        let dt = self.dtemperature(u);
        let mut d = [0.0; NVARS];
        for k in 0..NVARS {
            d[k] = dmu_dt * dt[k];
        }
        d
    }

    /// 导热系数 k = μγ/((γ−1)Pr)
    #[inline]
    pub fn thermal_conductivity(&self, mu: f64) -> f64 {
        mu * self.gamma / ((self.gamma - 1.0) * self.pr)
    }

    /// 由 dμ/du 得 dk/du
    #[inline]
    pub fn dthermal_conductivity(&self, dmu: &[f64; NVARS]) -> [f64; NVARS] {
        let factor = self.gamma / ((self.gamma - 1.0) * self.pr);
        let mut d = [0.0; NVARS];
        for k in 0..NVARS {
            d[k] = dmu[k] * factor;
        }
        d
    }

    /// 由原始量梯度得温度梯度分量
    ///
    /// T = p/(ρR)，故 ∂T = (∂p − T·R·∂ρ... ) 展开为
    /// ∂T = (∂p/ρ − p·∂ρ/ρ²)/R。
    #[inline]
    pub fn grad_temperature(&self, rho: f64, grad_rho: f64, p: f64, grad_p: f64) -> f64 {
        (grad_p / rho - p * grad_rho / (rho * rho)) / self.gas_constant()
    }

    // ------------------------------------------------------------
    // 粘性应力
    // ------------------------------------------------------------

    /// 偏应力张量
    ///
    /// 输入 `grad[dir][var]` 为原始量-2 的面梯度（var 1、2 为速度分量）。
    /// τ_ij = μ(∂_i v_j + ∂_j v_i − (2/3)δ_ij ∇·v)。
    pub fn stress_tensor(&self, mu: f64, grad: &[[f64; NVARS]; 2]) -> [[f64; 2]; 2] {
        let div = grad[0][1] + grad[1][2];
        let mut tau = [[0.0; 2]; 2];
        for i in 0..2 {
            for j in 0..2 {
                let mut t = grad[i][j + 1] + grad[j][i + 1];
                if i == j {
                    t -= 2.0 / 3.0 * div;
                }
                tau[i][j] = mu * t;
            }
        }
        tau
    }

    /// 偏应力张量及其对一侧守恒量的雅可比
    ///
    /// `dgrad[dir][var][k]` 为面梯度对该侧守恒量的导数，
    /// `dmu` 为粘性系数对该侧守恒量的导数（常粘性时为零）。
    pub fn stress_tensor_and_jacobian(
        &self,
        mu: f64,
        dmu: &[f64; NVARS],
        grad: &[[f64; NVARS]; 2],
        dgrad: &[[[f64; NVARS]; NVARS]; 2],
    ) -> ([[f64; 2]; 2], [[[f64; NVARS]; 2]; 2]) {
        let div = grad[0][1] + grad[1][2];
        let mut tau = [[0.0; 2]; 2];
        let mut dtau = [[[0.0; NVARS]; 2]; 2];
        for i in 0..2 {
            for j in 0..2 {
                let mut t = grad[i][j + 1] + grad[j][i + 1];
                if i == j {
                    t -= 2.0 / 3.0 * div;
                }
                tau[i][j] = mu * t;
                for k in 0..NVARS {
                    let mut dt = dgrad[i][j + 1][k] + dgrad[j][i + 1][k];
                    if i == j {
                        dt -= 2.0 / 3.0 * (dgrad[0][1][k] + dgrad[1][2][k]);
                    }
                    dtau[i][j][k] = dmu[k] * t + mu * dt;
                }
            }
        }
        (tau, dtau)
    }
}

// ============================================================
// 测试
// ============================================================
