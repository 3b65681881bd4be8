// crates/cfv_mesh/src/lib.rs

//! CFV 网格层
//!
//! 提供空间离散所需的二维非结构混合网格只读视图：
//! - [`mesh`]: [`UnstructuredMesh2d`] 及其拓扑约定
//! - [`generation`]: 结构化矩形网格生成（测试与 CLI 用）
//! - [`coloring`]: 单元贪心着色（层调度），用于无锁并行累加
//!
//! # 拓扑约定
//!
//! 面数组中边界面排在最前。每个面存储 (左单元, 右单元, 节点 a, 节点 b)、
//! 单位外法向（从左指向右）与长度。边界面的右单元是虚拟的幽灵编号，
//! 取值范围 [n_cells, n_cells + n_boundary_faces)。
//!
//! 网格文件读写与完整拓扑重建不在本层范围内；求解器只借用本视图。

pub mod coloring;
pub mod generation;
pub mod mesh;

pub use coloring::CellColoring;
pub use generation::{rectangle_grid, RectangleMarkers};
pub use mesh::{RawMesh2d, UnstructuredMesh2d};
