// crates/cfv_physics/src/numerics/reconstruction/mod.rs

//! 面值重构与限制器
//!
//! 由单元值与单元梯度得到每个面的左右状态 (u_L, u_R)。所有格式作用于
//! 原始变量，守恒 ↔ 原始的转换由组装器负责。边界面只产生左侧值，
//! 右侧（幽灵）值由边界条件在守恒变量上另行计算。

pub mod barth_jespersen;
pub mod linear;
pub mod muscl;
pub mod traits;
pub mod venkatakrishnan;
pub mod weno;

pub use barth_jespersen::BarthJespersenReconstruction;
pub use linear::LinearReconstruction;
pub use muscl::MusclVanAlbada;
pub use traits::SolutionReconstruction;
pub use venkatakrishnan::VenkatakrishnanReconstruction;
pub use weno::WenoReconstruction;

use cfv_config::ReconstructionKind;
use tracing::info;

/// 按配置枚举创建重构格式
///
/// `param` 为限制器参数：Venkatakrishnan 的 K 或 WENO 的 ε。
pub fn create_reconstruction(kind: ReconstructionKind, param: f64) -> Box<dyn SolutionReconstruction> {
    let recon: Box<dyn SolutionReconstruction> = match kind {
        ReconstructionKind::None => Box::new(LinearReconstruction),
        ReconstructionKind::Weno => Box::new(WenoReconstruction::new(param)),
        ReconstructionKind::Vanalbada => Box::new(MusclVanAlbada),
        ReconstructionKind::Barthjespersen => Box::new(BarthJespersenReconstruction),
        ReconstructionKind::Venkatakrishnan => Box::new(VenkatakrishnanReconstruction::new(param)),
    };
    info!("reconstruction: {}", recon.name());
    recon
}

#[cfg(test)]
pub(crate) mod recon_tests {
    //! 重构格式共享测试工具

    use super::traits::SolutionReconstruction;
    use crate::numerics::gradient::test_support::ghost_centers;
    use crate::numerics::gradient::{GradientScheme, GreenGaussGradient};
    use cfv_foundation::NVARS;
    use cfv_mesh::{rectangle_grid, RectangleMarkers};
    use glam::DVec2;

    /// 线性场上重构的面值应精确等于线性场在面中点的取值
    ///
    /// 对任何不在极值处起作用的限制器都应成立（光滑场限制因子为 1）。
    pub fn check_linear_exactness(recon: &dyn SolutionReconstruction, tol: f64) {
        let mesh = rectangle_grid(6, 5, 1.2, 1.0, RectangleMarkers::default()).unwrap();
        let rc = ghost_centers(&mesh);
        let a = [0.4, -0.2, 0.3, 0.6];
        let b = [0.1, 0.5, -0.4, 0.2];
        let c = [2.0, 1.5, 1.8, 2.2];
        let eval = |p: DVec2| -> [f64; NVARS] {
            let mut u = [0.0; NVARS];
            for var in 0..NVARS {
                u[var] = a[var] * p.x + b[var] * p.y + c[var];
            }
            u
        };
        let u: Vec<[f64; NVARS]> = (0..mesh.n_cells()).map(|i| eval(rc[i])).collect();
        let ug: Vec<[f64; NVARS]> = (0..mesh.n_boundary_faces())
            .map(|f| eval(rc[mesh.n_cells() + f]))
            .collect();

        let mut grads = vec![[DVec2::ZERO; NVARS]; mesh.n_cells()];
        GreenGaussGradient.compute_gradients(&mesh, &rc, &u, &ug, &mut grads);

        let mut ul = vec![[0.0; NVARS]; mesh.n_faces()];
        let mut ur = vec![[0.0; NVARS]; mesh.n_faces()];
        recon.compute_face_values(&mesh, &rc, &u, &ug, &grads, &mut ul, &mut ur);

        for f in mesh.n_boundary_faces()..mesh.n_faces() {
            let exact = eval(mesh.face_midpoint(f));
            for var in 0..NVARS {
                assert!(
                    (ul[f][var] - exact[var]).abs() < tol,
                    "{}: face {} var {} left: {} vs {}",
                    recon.name(),
                    f,
                    var,
                    ul[f][var],
                    exact[var]
                );
                assert!(
                    (ur[f][var] - exact[var]).abs() < tol,
                    "{}: face {} var {} right: {} vs {}",
                    recon.name(),
                    f,
                    var,
                    ur[f][var],
                    exact[var]
                );
            }
        }
    }

    /// 重构值必须落在相邻单元值范围内（有界性，限制器类格式）
    pub fn check_boundedness(recon: &dyn SolutionReconstruction) {
        let mesh = rectangle_grid(8, 1, 8.0, 1.0, RectangleMarkers::default()).unwrap();
        let rc = ghost_centers(&mesh);
        // 阶梯场（激波状）
        let step = |p: DVec2| -> [f64; NVARS] {
            let v = if p.x < 4.0 { 1.0 } else { 0.1 };
            [v; NVARS]
        };
        let u: Vec<[f64; NVARS]> = (0..mesh.n_cells()).map(|i| step(rc[i])).collect();
        let ug: Vec<[f64; NVARS]> = (0..mesh.n_boundary_faces())
            .map(|f| step(rc[mesh.n_cells() + f]))
            .collect();

        let mut grads = vec![[DVec2::ZERO; NVARS]; mesh.n_cells()];
        GreenGaussGradient.compute_gradients(&mesh, &rc, &u, &ug, &mut grads);

        let mut ul = vec![[0.0; NVARS]; mesh.n_faces()];
        let mut ur = vec![[0.0; NVARS]; mesh.n_faces()];
        recon.compute_face_values(&mesh, &rc, &u, &ug, &grads, &mut ul, &mut ur);

        let eps = 1e-10;
        for f in mesh.n_boundary_faces()..mesh.n_faces() {
            for var in 0..NVARS {
                for v in [ul[f][var], ur[f][var]] {
                    assert!(
                        (0.1 - eps..=1.0 + eps).contains(&v),
                        "{}: face {} value {} out of data range",
                        recon.name(),
                        f,
                        v
                    );
                }
            }
        }
    }
}
