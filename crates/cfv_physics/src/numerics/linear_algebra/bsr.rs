// crates/cfv_physics/src/numerics/linear_algebra/bsr.rs

//! 4×4 块 CSR 矩阵
//!
//! 稀疏模式由网格邻接关系构建：每行一个对角块加面邻居块，列索引有序，
//! 块定位用二分查找。`add_block` 在互斥锁下串行化；接口只要求并发
//! 调用对同一目标的累加是原子观察到的，组装热路径的争用由调用方的
//! 面并行粒度摊薄。

use std::sync::Mutex;

use cfv_foundation::{FvError, FvResult, NVARS};
use cfv_mesh::UnstructuredMesh2d;

/// 4×4 块
pub type Block = [[f64; NVARS]; NVARS];

/// 块稀疏矩阵写入接口
///
/// 线性求解后端实现此接口即可接入雅可比装配。`add_block` 必须线程安全：
/// 并发对同一 (row, col) 的累加不得丢失更新。
pub trait BlockMatrix: Send + Sync {
    /// 向 (row, col) 块累加
    fn add_block(&self, row: usize, col: usize, block: &Block) -> FvResult<()>;
}

/// 块 CSR 矩阵
pub struct BsrMatrix {
    n_block_rows: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Mutex<Vec<Block>>,
}

impl BsrMatrix {
    /// 按网格邻接关系构建稀疏模式（对角块 + 面邻居块）
    pub fn from_mesh(mesh: &UnstructuredMesh2d) -> Self {
        let n = mesh.n_cells();
        let mut row_ptr = Vec::with_capacity(n + 1);
        let mut col_idx = Vec::new();
        row_ptr.push(0);
        for cell in 0..n {
            let mut cols = vec![cell];
            for &face in mesh.cell_faces(cell) {
                let nb = mesh.neighbor_across(cell, face);
                if nb < n {
                    cols.push(nb);
                }
            }
            cols.sort_unstable();
            col_idx.extend_from_slice(&cols);
            row_ptr.push(col_idx.len());
        }
        let nnzb = col_idx.len();
        Self {
            n_block_rows: n,
            row_ptr,
            col_idx,
            values: Mutex::new(vec![[[0.0; NVARS]; NVARS]; nnzb]),
        }
    }

    /// 块行数
    #[inline]
    pub fn n_block_rows(&self) -> usize {
        self.n_block_rows
    }

    /// 定位 (row, col) 的块索引
    fn find(&self, row: usize, col: usize) -> Option<usize> {
        let start = self.row_ptr[row];
        let end = self.row_ptr[row + 1];
        self.col_idx[start..end]
            .binary_search(&col)
            .ok()
            .map(|local| start + local)
    }

    /// 全部块清零
    pub fn clear(&self) {
        let mut values = self.values.lock().unwrap();
        for b in values.iter_mut() {
            *b = [[0.0; NVARS]; NVARS];
        }
    }

    /// 读取 (row, col) 块的副本
    pub fn block(&self, row: usize, col: usize) -> Option<Block> {
        let idx = self.find(row, col)?;
        Some(self.values.lock().unwrap()[idx])
    }

    /// 块稀疏矩阵-向量乘：y = A·x
    ///
    /// `x`、`y` 为单元优先的展平向量（长度 = 块行数 × NVARS）。
    pub fn mul_vec(&self, x: &[f64], y: &mut [f64]) {
        assert_eq!(x.len(), self.n_block_rows * NVARS);
        assert_eq!(y.len(), self.n_block_rows * NVARS);
        let values = self.values.lock().unwrap();
        for row in 0..self.n_block_rows {
            let mut acc = [0.0; NVARS];
            for idx in self.row_ptr[row]..self.row_ptr[row + 1] {
                let col = self.col_idx[idx];
                let block = &values[idx];
                for i in 0..NVARS {
                    for k in 0..NVARS {
                        acc[i] += block[i][k] * x[col * NVARS + k];
                    }
                }
            }
            y[row * NVARS..(row + 1) * NVARS].copy_from_slice(&acc);
        }
    }
}

impl BlockMatrix for BsrMatrix {
    fn add_block(&self, row: usize, col: usize, block: &Block) -> FvResult<()> {
        let idx = self.find(row, col).ok_or_else(|| {
            FvError::Matrix(format!("block ({}, {}) outside sparsity pattern", row, col))
        })?;
        let mut values = self.values.lock().unwrap();
        for i in 0..NVARS {
            for k in 0..NVARS {
                values[idx][i][k] += block[i][k];
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfv_mesh::{rectangle_grid, RectangleMarkers};

    #[test]
    fn test_pattern_from_mesh() {
        let mesh = rectangle_grid(3, 3, 1.0, 1.0, RectangleMarkers::default()).unwrap();
        let m = BsrMatrix::from_mesh(&mesh);
        assert_eq!(m.n_block_rows(), 9);
        // 中心单元：对角 + 4 邻居
        assert_eq!(m.row_ptr[5] - m.row_ptr[4], 5);
        // 角单元：对角 + 2 邻居
        assert_eq!(m.row_ptr[1] - m.row_ptr[0], 3);
        assert!(m.find(4, 4).is_some());
        assert!(m.find(0, 8).is_none());
    }

    #[test]
    fn test_add_and_spmv() {
        let mesh = rectangle_grid(2, 1, 2.0, 1.0, RectangleMarkers::default()).unwrap();
        let m = BsrMatrix::from_mesh(&mesh);

        let mut eye = [[0.0; NVARS]; NVARS];
        for i in 0..NVARS {
            eye[i][i] = 2.0;
        }
        m.add_block(0, 0, &eye).unwrap();
        m.add_block(0, 1, &eye).unwrap();
        m.add_block(0, 1, &eye).unwrap(); // 累加语义

        let x: Vec<f64> = (0..2 * NVARS).map(|i| i as f64).collect();
        let mut y = vec![0.0; 2 * NVARS];
        m.mul_vec(&x, &mut y);
        for i in 0..NVARS {
            // 行 0：2·x₀ + 4·x₁
            assert!((y[i] - (2.0 * x[i] + 4.0 * x[NVARS + i])).abs() < 1e-14);
            // 行 1 未写入
            assert_eq!(y[NVARS + i], 0.0);
        }

        // 模式外的块报错
        let mesh3 = rectangle_grid(3, 1, 3.0, 1.0, RectangleMarkers::default()).unwrap();
        let m3 = BsrMatrix::from_mesh(&mesh3);
        assert!(m3.add_block(0, 2, &eye).is_err());
    }

    #[test]
    fn test_concurrent_accumulation() {
        use rayon::prelude::*;
        let mesh = rectangle_grid(2, 2, 1.0, 1.0, RectangleMarkers::default()).unwrap();
        let m = BsrMatrix::from_mesh(&mesh);
        let mut one = [[0.0; NVARS]; NVARS];
        one[0][0] = 1.0;

        (0..1000).into_par_iter().for_each(|_| {
            m.add_block(1, 1, &one).unwrap();
        });
        assert!((m.block(1, 1).unwrap()[0][0] - 1000.0).abs() < 1e-12);
    }
}
