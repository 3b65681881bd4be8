// crates/cfv_mesh/src/coloring.rs

//! 单元贪心着色（层调度）
//!
//! 将单元划分为若干独立层：同层内任意两个单元不共享面。
//! 供并行累加的无原子实现使用：逐层并行即可保证无写冲突。

use crate::mesh::UnstructuredMesh2d;

/// 着色结果
#[derive(Debug, Clone)]
pub struct CellColoring {
    /// 每个单元的颜色
    pub cell_colors: Vec<usize>,
    /// 颜色数
    pub num_colors: usize,
    /// 每个颜色包含的单元
    pub color_cells: Vec<Vec<usize>>,
}

impl CellColoring {
    /// 对网格单元做贪心着色
    pub fn greedy(mesh: &UnstructuredMesh2d) -> Self {
        let n = mesh.n_cells();
        let mut cell_colors = vec![usize::MAX; n];
        let mut num_colors = 0;

        let mut used = Vec::new();
        for c in 0..n {
            used.clear();
            used.resize(num_colors + 1, false);
            for &f in mesh.cell_faces(c) {
                let nb = mesh.neighbor_across(c, f);
                if nb < n && cell_colors[nb] != usize::MAX {
                    used[cell_colors[nb]] = true;
                }
            }
            let mut color = 0;
            while color < used.len() && used[color] {
                color += 1;
            }
            cell_colors[c] = color;
            num_colors = num_colors.max(color + 1);
        }

        let mut color_cells = vec![Vec::new(); num_colors];
        for (c, &k) in cell_colors.iter().enumerate() {
            color_cells[k].push(c);
        }

        Self {
            cell_colors,
            num_colors,
            color_cells,
        }
    }

    /// 校验：同层单元不得跨面相邻
    pub fn is_valid(&self, mesh: &UnstructuredMesh2d) -> bool {
        for f in mesh.n_boundary_faces()..mesh.n_faces() {
            let l = mesh.face_left(f);
            let r = mesh.face_right(f);
            if self.cell_colors[l] == self.cell_colors[r] {
                return false;
            }
        }
        true
    }

    /// 某颜色的单元列表
    pub fn cells_with_color(&self, color: usize) -> &[usize] {
        self.color_cells.get(color).map_or(&[], |v| v.as_slice())
    }
}
