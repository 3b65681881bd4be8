// crates/cfv_physics/src/schemes/traits.rs

//! 无粘数值通量统一接口
//!
//! 给定面两侧守恒状态与单位法向，计算数值通量 F(u_L, u_R, n̂) 及其对
//! 左右状态的解析雅可比。雅可比输出为**赋值**语义：实现必须覆盖输出
//! 数组的全部元素，调用方不做清零。

use cfv_foundation::NVARS;
use glam::DVec2;

/// NVARS×NVARS 雅可比块
pub type FluxJacobian = [[f64; NVARS]; NVARS];

/// 无粘数值通量
///
/// 实现者只读共享，可跨线程在每面调用一次。
pub trait InviscidFlux: Send + Sync {
    /// 格式名称
    fn name(&self) -> &'static str;

    /// 计算面数值通量
    ///
    /// `n` 为从左单元指向右单元的单位法向。
    fn flux(&self, ul: &[f64; NVARS], ur: &[f64; NVARS], n: DVec2) -> [f64; NVARS];

    /// 计算通量对左右守恒状态的雅可比 ∂F/∂u_L、∂F/∂u_R
    ///
    /// 输出被整体赋值，先前内容丢弃。
    fn jacobian(
        &self,
        ul: &[f64; NVARS],
        ur: &[f64; NVARS],
        n: DVec2,
        dfdl: &mut FluxJacobian,
        dfdr: &mut FluxJacobian,
    );
}

/// 雅可比清零辅助
#[inline]
pub fn zero_jacobian(j: &mut FluxJacobian) {
    for row in j.iter_mut() {
        for v in row.iter_mut() {
            *v = 0.0;
        }
    }
}

/// 外积累加：j[i][k] += coeff * a[i] * b[k]
#[inline]
pub fn add_outer(j: &mut FluxJacobian, coeff: f64, a: &[f64; NVARS], b: &[f64; NVARS]) {
    for i in 0..NVARS {
        for k in 0..NVARS {
            j[i][k] += coeff * a[i] * b[k];
        }
    }
}
