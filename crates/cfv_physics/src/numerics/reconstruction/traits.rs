// crates/cfv_physics/src/numerics/reconstruction/traits.rs

//! 面值重构接口

use crate::numerics::gradient::CellGradients;
use cfv_foundation::NVARS;
use cfv_mesh::UnstructuredMesh2d;
use glam::DVec2;

/// 面值重构接口
///
/// `uleft`/`uright` 按面索引；内部面两侧均被写入，边界面只写左侧。
/// 实现只读共享，可并行调用。
pub trait SolutionReconstruction: Send + Sync {
    /// 格式名称
    fn name(&self) -> &'static str;

    /// 由单元值、幽灵值与单元梯度计算面值
    fn compute_face_values(
        &self,
        mesh: &UnstructuredMesh2d,
        rc: &[DVec2],
        u: &[[f64; NVARS]],
        ug: &[[f64; NVARS]],
        grads: &[CellGradients],
        uleft: &mut [[f64; NVARS]],
        uright: &mut [[f64; NVARS]],
    );
}

/// 面另一侧的场值与中心
#[inline]
pub(super) fn across<'a>(
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
