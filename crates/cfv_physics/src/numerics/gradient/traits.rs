// crates/cfv_physics/src/numerics/gradient/traits.rs

//! 梯度格式接口

use cfv_foundation::NVARS;
use cfv_mesh::UnstructuredMesh2d;
use glam::DVec2;

/// 每单元各变量的梯度
pub type CellGradients = [DVec2; NVARS];

/// 梯度格式接口
///
/// `rc` 为实单元 + 幽灵单元中心（幽灵中心排在 n_cells 之后，按边界面
/// 顺序），`ug` 为幽灵单元场值（长度 = 边界面数）。实现只读共享。
pub trait GradientScheme: Send + Sync {
    /// 格式名称
    fn name(&self) -> &'static str;

    /// 计算所有单元梯度
    ///
    /// `grads` 长度为 n_cells，整体被覆盖。
    fn compute_gradients(
        &self,
        mesh: &UnstructuredMesh2d,
        rc: &[DVec2],
        u: &[[f64; NVARS]],
        ug: &[[f64; NVARS]],
        grads: &mut [CellGradients],
    );
}

/// 取面另一侧的场值与中心（实单元或幽灵单元）
#[inline]
pub(super) fn neighbor_value<'a>(
    mesh: &UnstructuredMesh2d,
    rc: &'a [DVec2],
    u: &'a [[f64; NVARS]],
    ug: &'a [[f64; NVARS]],
    nb: usize,
) -> (&'a [f64; NVARS], DVec2) {
    if nb < mesh.n_cells() {
        (&u[nb], rc[nb])
    } else {
        (&ug[nb - mesh.n_cells()], rc[nb])
    }
}
