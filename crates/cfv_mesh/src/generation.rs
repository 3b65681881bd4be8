// crates/cfv_mesh/src/generation.rs

//! 结构化矩形网格生成
//!
//! 生成 nx×ny 的四边形网格并冻结为非结构视图，供测试与 CLI 使用。
//! 边界面按 下、右、上、左 的顺序排在面数组最前，满足视图的排序不变量。

use crate::mesh::{RawMesh2d, UnstructuredMesh2d};
use cfv_foundation::{FvError, FvResult};
use glam::DVec2;

/// 矩形域四条边的边界标记
#[derive(Debug, Clone, Copy)]
pub struct RectangleMarkers {
    /// 下边界 (y = 0)
    pub bottom: i32,
    /// 右边界 (x = lx)
    pub right: i32,
    /// 上边界 (y = ly)
    pub top: i32,
    /// 左边界 (x = 0)
    pub left: i32,
}

impl Default for RectangleMarkers {
    fn default() -> Self {
        Self {
            bottom: 1,
            right: 2,
            top: 3,
            left: 4,
        }
    }
}

impl RectangleMarkers {
    /// 四边同一标记
    pub fn uniform(marker: i32) -> Self {
        Self {
            bottom: marker,
            right: marker,
            top: marker,
            left: marker,
        }
    }
}

/// 生成 [0,lx]×[0,ly] 上 nx×ny 的四边形网格
pub fn rectangle_grid(
    nx: usize,
    ny: usize,
    lx: f64,
    ly: f64,
    markers: RectangleMarkers,
) -> FvResult<UnstructuredMesh2d> {
    if nx == 0 || ny == 0 {
        return Err(FvError::config("rectangle_grid: nx and ny must be positive"));
    }
    if lx <= 0.0 || ly <= 0.0 {
        return Err(FvError::config("rectangle_grid: domain lengths must be positive"));
    }

    let dx = lx / nx as f64;
    let dy = ly / ny as f64;
    let node = |i: usize, j: usize| j * (nx + 1) + i;
    let cell = |i: usize, j: usize| j * nx + i;
    let n_cells = nx * ny;

    let mut nodes = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            nodes.push(DVec2::new(i as f64 * dx, j as f64 * dy));
        }
    }

    // 单元-节点（逆时针）
    let mut cell_node_offsets = Vec::with_capacity(n_cells + 1);
    let mut cell_node_indices = Vec::with_capacity(4 * n_cells);
    cell_node_offsets.push(0);
    for j in 0..ny {
        for i in 0..nx {
            cell_node_indices.extend_from_slice(&[
                node(i, j),
                node(i + 1, j),
                node(i + 1, j + 1),
                node(i, j + 1),
            ]);
            cell_node_offsets.push(cell_node_indices.len());
        }
    }

    let mut face_cells: Vec<[usize; 2]> = Vec::new();
    let mut face_nodes: Vec<[usize; 2]> = Vec::new();
    let mut face_markers: Vec<i32> = Vec::new();

    // 边界面：下、右、上、左
    for i in 0..nx {
        face_cells.push([cell(i, 0), n_cells + face_markers.len()]);
        face_nodes.push([node(i, 0), node(i + 1, 0)]);
        face_markers.push(markers.bottom);
    }
    for j in 0..ny {
        face_cells.push([cell(nx - 1, j), n_cells + face_markers.len()]);
        face_nodes.push([node(nx, j), node(nx, j + 1)]);
        face_markers.push(markers.right);
    }
    for i in 0..nx {
        face_cells.push([cell(i, ny - 1), n_cells + face_markers.len()]);
        face_nodes.push([node(i, ny), node(i + 1, ny)]);
        face_markers.push(markers.top);
    }
    for j in 0..ny {
        face_cells.push([cell(0, j), n_cells + face_markers.len()]);
        face_nodes.push([node(0, j), node(0, j + 1)]);
        face_markers.push(markers.left);
    }

    // 内部面：竖向（法向 +x），横向（法向 +y）
    for j in 0..ny {
        for i in 0..nx - 1 {
            face_cells.push([cell(i, j), cell(i + 1, j)]);
            face_nodes.push([node(i + 1, j), node(i + 1, j + 1)]);
        }
    }
    for j in 0..ny - 1 {
        for i in 0..nx {
            face_cells.push([cell(i, j), cell(i, j + 1)]);
            face_nodes.push([node(i, j + 1), node(i + 1, j + 1)]);
        }
    }

    UnstructuredMesh2d::from_raw(RawMesh2d {
        nodes,
        cell_node_offsets,
        cell_node_indices,
        face_cells,
        face_nodes,
        face_markers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cell() {
        let mesh = rectangle_grid(1, 1, 1.0, 1.0, RectangleMarkers::default()).unwrap();
        assert_eq!(mesh.n_cells(), 1);
        assert_eq!(mesh.n_boundary_faces(), 4);
        assert_eq!(mesh.n_interior_faces(), 0);
        assert!((mesh.cell_area(0) - 1.0).abs() < 1e-14);
        assert!((mesh.cell_center(0) - DVec2::new(0.5, 0.5)).length() < 1e-14);
    }

    #[test]
    fn test_markers_per_side() {
        let markers = RectangleMarkers {
            bottom: 10,
            right: 20,
            top: 30,
            left: 40,
        };
        let mesh = rectangle_grid(3, 2, 3.0, 2.0, markers).unwrap();
        let mut seen = [0usize; 4];
        for f in 0..mesh.n_boundary_faces() {
            match mesh.face_marker(f) {
                10 => seen[0] += 1,
                20 => seen[1] += 1,
                30 => seen[2] += 1,
                40 => seen[3] += 1,
                _ => panic!("unexpected marker"),
            }
        }
        assert_eq!(seen, [3, 2, 3, 2]);
        assert_eq!(mesh.active_markers(), vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_uniform_spacing_lengths() {
        let mesh = rectangle_grid(5, 4, 1.0, 1.0, RectangleMarkers::uniform(1)).unwrap();
        for f in 0..mesh.n_faces() {
            let len = mesh.face_length(f);
            assert!((len - 0.2).abs() < 1e-14 || (len - 0.25).abs() < 1e-14);
        }
    }
}
