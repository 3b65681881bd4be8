// crates/cfv_mesh/src/mesh.rs

//! 非结构网格只读视图
//!
//! [`UnstructuredMesh2d`] 由原始数组（节点、单元-节点、面）冻结而成，
//! 构造时一次性计算所有派生量：面法向与长度、单元面积与中心、
//! 单元-面与单元-邻居邻接表。冻结后所有访问均为只读，可安全跨线程共享。
//!
//! # 不变量
//!
//! - 边界面在面数组最前，内部面随后；
//! - 内部面满足 `right < n_cells`；
//! - 边界面 `i` 满足 `right == n_cells + i`（幽灵编号）；
//! - 周期映射是匹配边界面上的对合：`pair(pair(f)) == f`。

use cfv_foundation::{FvError, FvResult, SMALL_NUMBER};
use glam::DVec2;

// ============================================================
// 原始输入
// ============================================================

/// 网格原始数组
///
/// 由网格生成器或外部转换器填充，经 [`UnstructuredMesh2d::from_raw`]
/// 冻结为只读视图。
#[derive(Debug, Clone, Default)]
pub struct RawMesh2d {
    /// 节点坐标
    pub nodes: Vec<DVec2>,
    /// 单元-节点偏移（CSR，长度 n_cells+1）
    pub cell_node_offsets: Vec<usize>,
    /// 单元-节点索引
    pub cell_node_indices: Vec<usize>,
    /// 每面 (左单元, 右单元)；边界面右单元为幽灵编号
    pub face_cells: Vec<[usize; 2]>,
    /// 每面两端节点
    pub face_nodes: Vec<[usize; 2]>,
    /// 边界面标记（长度 = 边界面数）
    pub face_markers: Vec<i32>,
}

// ============================================================
// 只读视图
// ============================================================

/// 二维非结构网格只读视图
#[derive(Debug, Clone)]
pub struct UnstructuredMesh2d {
    n_cells: usize,
    n_boundary_faces: usize,
    nodes: Vec<DVec2>,
    face_cells: Vec<[usize; 2]>,
    face_nodes: Vec<[usize; 2]>,
    face_normal: Vec<DVec2>,
    face_length: Vec<f64>,
    face_markers: Vec<i32>,
    cell_area: Vec<f64>,
    cell_center: Vec<DVec2>,
    cell_face_offsets: Vec<usize>,
    cell_face_indices: Vec<usize>,
    periodic_map: Vec<Option<usize>>,
}

impl UnstructuredMesh2d {
    /// 由原始数组冻结网格视图
    ///
    /// 计算面法向（单位化，从左单元指向右单元）、面长度、
    /// 单元面积（多边形叠加公式）、单元中心（节点平均）与邻接表。
    pub fn from_raw(raw: RawMesh2d) -> FvResult<Self> {
        let n_cells = raw.cell_node_offsets.len().saturating_sub(1);
        let n_faces = raw.face_cells.len();
        let n_boundary_faces = raw.face_markers.len();

        if n_cells == 0 || n_faces == 0 {
            return Err(FvError::topology("empty mesh"));
        }
        if n_boundary_faces > n_faces {
            return Err(FvError::topology("more boundary faces than faces"));
        }

        // 单元中心：节点坐标平均（与重构方案一致，非形心）
        let mut cell_center = vec![DVec2::ZERO; n_cells];
        let mut cell_area = vec![0.0; n_cells];
        for c in 0..n_cells {
            let start = raw.cell_node_offsets[c];
            let end = raw.cell_node_offsets[c + 1];
            let cn = &raw.cell_node_indices[start..end];
            let mut ctr = DVec2::ZERO;
            let mut area = 0.0;
            for k in 0..cn.len() {
                let a = raw.nodes[cn[k]];
                let b = raw.nodes[cn[(k + 1) % cn.len()]];
                ctr += a;
                area += a.x * b.y - b.x * a.y;
            }
            cell_center[c] = ctr / cn.len() as f64;
            cell_area[c] = 0.5 * area.abs();
            if cell_area[c] < SMALL_NUMBER {
                return Err(FvError::topology(format!("cell {} has zero area", c)));
            }
        }

        // 面法向与长度；法向统一指向右单元一侧
        let mut face_normal = vec![DVec2::ZERO; n_faces];
        let mut face_length = vec![0.0; n_faces];
        for f in 0..n_faces {
            let [na, nb] = raw.face_nodes[f];
            let d = raw.nodes[nb] - raw.nodes[na];
            let len = d.length();
            if len < SMALL_NUMBER {
                return Err(FvError::topology(format!("face {} has zero length", f)));
            }
            let mut n = DVec2::new(d.y, -d.x) / len;

            let lelem = raw.face_cells[f][0];
            let mid = 0.5 * (raw.nodes[na] + raw.nodes[nb]);
            // 左单元中心指向面中点的方向应与法向同侧
            if n.dot(mid - cell_center[lelem]) < 0.0 {
                n = -n;
            }
            face_normal[f] = n;
            face_length[f] = len;
        }

        // 单元-面邻接表
        let mut counts = vec![0usize; n_cells];
        for f in 0..n_faces {
            let [l, r] = raw.face_cells[f];
            counts[l] += 1;
            if r < n_cells {
                counts[r] += 1;
            }
        }
        let mut cell_face_offsets = vec![0usize; n_cells + 1];
        for c in 0..n_cells {
            cell_face_offsets[c + 1] = cell_face_offsets[c] + counts[c];
        }
        let mut cursor = cell_face_offsets.clone();
        let mut cell_face_indices = vec![0usize; cell_face_offsets[n_cells]];
        for f in 0..n_faces {
            let [l, r] = raw.face_cells[f];
            cell_face_indices[cursor[l]] = f;
            cursor[l] += 1;
            if r < n_cells {
                cell_face_indices[cursor[r]] = f;
                cursor[r] += 1;
            }
        }

        let mesh = Self {
            n_cells,
            n_boundary_faces,
            nodes: raw.nodes,
            face_cells: raw.face_cells,
            face_nodes: raw.face_nodes,
            face_normal,
            face_length,
            face_markers: raw.face_markers,
            cell_area,
            cell_center,
            cell_face_offsets,
            cell_face_indices,
            periodic_map: vec![None; n_boundary_faces],
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// 校验拓扑不变量
    pub fn validate(&self) -> FvResult<()> {
        for f in 0..self.n_faces() {
            let [l, r] = self.face_cells[f];
            if l >= self.n_cells {
                return Err(FvError::topology(format!(
                    "face {}: left cell {} out of range",
                    f, l
                )));
            }
            if f < self.n_boundary_faces {
                if r != self.n_cells + f {
                    return Err(FvError::topology(format!(
                        "boundary face {}: ghost index {} != {}",
                        f,
                        r,
                        self.n_cells + f
                    )));
                }
            } else if r >= self.n_cells {
                return Err(FvError::topology(format!(
                    "interior face {}: right cell {} out of range",
                    f, r
                )));
            }
        }
        // 周期映射必须是对合
        for f in 0..self.n_boundary_faces {
            if let Some(p) = self.periodic_map[f] {
                if self.periodic_map.get(p).copied().flatten() != Some(f) {
                    return Err(FvError::topology(format!(
                        "periodic map not involutive at face {}",
                        f
                    )));
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------
    // 规模
    // ------------------------------------------------------------

    /// 单元数
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    /// 边界面数
    #[inline]
    pub fn n_boundary_faces(&self) -> usize {
        self.n_boundary_faces
    }

    /// 总面数（边界面 + 内部面）
    #[inline]
    pub fn n_faces(&self) -> usize {
        self.face_cells.len()
    }

    /// 内部面数
    #[inline]
    pub fn n_interior_faces(&self) -> usize {
        self.n_faces() - self.n_boundary_faces
    }

    /// 每面节点数（线性单元恒为 2）
    #[inline]
    pub fn nodes_per_face(&self) -> usize {
        2
    }

    // ------------------------------------------------------------
    // 面访问
    // ------------------------------------------------------------

    /// 面左单元
    #[inline]
    pub fn face_left(&self, f: usize) -> usize {
        self.face_cells[f][0]
    }

    /// 面右单元（边界面返回幽灵编号）
    #[inline]
    pub fn face_right(&self, f: usize) -> usize {
        self.face_cells[f][1]
    }

    /// 面两端节点
    #[inline]
    pub fn face_node_pair(&self, f: usize) -> [usize; 2] {
        self.face_nodes[f]
    }

    /// 面单位法向（从左单元指向右单元）
    #[inline]
    pub fn face_normal(&self, f: usize) -> DVec2 {
        self.face_normal[f]
    }

    /// 面长度
    #[inline]
    pub fn face_length(&self, f: usize) -> f64 {
        self.face_length[f]
    }

    /// 面中点
    #[inline]
    pub fn face_midpoint(&self, f: usize) -> DVec2 {
        let [a, b] = self.face_nodes[f];
        0.5 * (self.nodes[a] + self.nodes[b])
    }

    /// 是否为边界面
    #[inline]
    pub fn is_boundary_face(&self, f: usize) -> bool {
        f < self.n_boundary_faces
    }

    /// 边界面标记
    #[inline]
    pub fn face_marker(&self, f: usize) -> i32 {
        self.face_markers[f]
    }

    /// 所有出现过的边界标记（去重、升序）
    pub fn active_markers(&self) -> Vec<i32> {
        let mut m = self.face_markers.clone();
        m.sort_unstable();
        m.dedup();
        m
    }

    // ------------------------------------------------------------
    // 单元访问
    // ------------------------------------------------------------

    /// 单元面积
    #[inline]
    pub fn cell_area(&self, c: usize) -> f64 {
        self.cell_area[c]
    }

    /// 单元中心（节点平均）
    #[inline]
    pub fn cell_center(&self, c: usize) -> DVec2 {
        self.cell_center[c]
    }

    /// 单元关联的面
    #[inline]
    pub fn cell_faces(&self, c: usize) -> &[usize] {
        &self.cell_face_indices[self.cell_face_offsets[c]..self.cell_face_offsets[c + 1]]
    }

    /// 跨面邻居：返回单元 `c` 在面 `f` 另一侧的编号
    ///
    /// 边界面返回幽灵编号。
    #[inline]
    pub fn neighbor_across(&self, c: usize, f: usize) -> usize {
        let [l, r] = self.face_cells[f];
        if l == c {
            r
        } else {
            l
        }
    }

    /// 节点坐标
    #[inline]
    pub fn node(&self, i: usize) -> DVec2 {
        self.nodes[i]
    }

    // ------------------------------------------------------------
    // 周期边界
    // ------------------------------------------------------------

    /// 边界面的周期配对面（未配对返回 None）
    #[inline]
    pub fn periodic_pair(&self, f: usize) -> Option<usize> {
        self.periodic_map[f]
    }

    /// 按面中点平移匹配两组标记的边界面，建立周期映射
    ///
    /// 平移向量取两组面中点均值之差；每个 `marker_a` 面的中点加平移后
    /// 必须与唯一的 `marker_b` 面中点重合（容差内），否则报拓扑错误。
    pub fn pair_periodic_markers(&mut self, marker_a: i32, marker_b: i32) -> FvResult<()> {
        let fa: Vec<usize> = (0..self.n_boundary_faces)
            .filter(|&f| self.face_markers[f] == marker_a)
            .collect();
        let fb: Vec<usize> = (0..self.n_boundary_faces)
            .filter(|&f| self.face_markers[f] == marker_b)
            .collect();
        if fa.is_empty() || fa.len() != fb.len() {
            return Err(FvError::topology(format!(
                "periodic markers {} and {} have {} and {} faces",
                marker_a,
                marker_b,
                fa.len(),
                fb.len()
            )));
        }

        let mean = |faces: &[usize]| -> DVec2 {
            faces.iter().map(|&f| self.face_midpoint(f)).sum::<DVec2>() / faces.len() as f64
        };
        let shift = mean(&fb) - mean(&fa);
        let tol = 1e-8 * (1.0 + shift.length());

        for &f in &fa {
            let target = self.face_midpoint(f) + shift;
            let hit = fb
                .iter()
                .copied()
                .find(|&g| (self.face_midpoint(g) - target).length() < tol)
                .ok_or_else(|| {
                    FvError::topology(format!("no periodic partner for boundary face {}", f))
                })?;
            self.periodic_map[f] = Some(hit);
            self.periodic_map[hit] = Some(f);
        }
        self.validate()
    }
}

// ============================================================
// 测试
// ============================================================
