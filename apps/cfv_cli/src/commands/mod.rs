// apps/cfv_cli/src/commands/mod.rs

//! CLI 子命令

pub mod info;
pub mod run;
pub mod validate;

use anyhow::Context;
use cfv_config::{BoundaryKindSpec, SolverConfig};
use cfv_mesh::{rectangle_grid, RectangleMarkers, UnstructuredMesh2d};

/// 按配置生成矩形网格并建立周期配对
pub fn build_mesh(config: &SolverConfig) -> anyhow::Result<UnstructuredMesh2d> {
    let m = &config.mesh;
    let markers = RectangleMarkers {
        bottom: m.markers[0],
        right: m.markers[1],
        top: m.markers[2],
        left: m.markers[3],
    };
    let mut mesh =
        rectangle_grid(m.nx, m.ny, m.lx, m.ly, markers).context("mesh generation failed")?;

    // 周期对只处理一次（marker < partner）
    for bc in &config.boundaries {
        if bc.kind == BoundaryKindSpec::Periodic {
            let partner = bc.opts[0];
            if bc.marker < partner {
                mesh.pair_periodic_markers(bc.marker, partner)
                    .context("periodic pairing failed")?;
            }
        }
    }
    Ok(mesh)
}
