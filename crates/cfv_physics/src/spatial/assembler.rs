// crates/cfv_physics/src/spatial/assembler.rs

//! 残差与雅可比组装器
//!
//! 每次残差组装的流水线：
//! 1. 清零残差与谱半径积分器；
//! 2. 边界面左值 ← 内侧单元值；
//! 3. 二阶时：幽灵状态 → 原始变量 → 单元梯度 → 限制重构 → 面值
//!    转回守恒变量；一阶时面值直接取单元值；
//! 4. 面并行：无粘通量（+ 粘性通量）× 面长，原子累加入残差
//!    （左减右加），谱半径 (|v_n|+c)·len 累加入积分器；
//! 5. 需要时 dt_i = A_i / integ_i。
//!
//! 单个面的错误不中止并行循环；所有面都被计算，返回第一个错误码。
//!
//! 雅可比装配的是正残差的 ∂r/∂u：边界面给 (L,L) 对角块
//! len·(∂F/∂u_L + ∂F/∂u_R·G)，内部面按 ±len·∂F/∂u 写四个块。

use glam::DVec2;
use rayon::prelude::*;
use std::sync::Mutex;

use cfv_config::SolverConfig;
use cfv_foundation::{FvError, FvResult, NVARS};
use cfv_mesh::UnstructuredMesh2d;

use super::accumulate::AtomicF64Buffer;
use super::{FlowSolver, SurfaceData};
use crate::boundary::{create_boundary_registry, BcRegistry};
use crate::gas::IdealGasPhysics;
use crate::numerics::gradient::{create_gradient_scheme, CellGradients, GradientScheme};
use crate::numerics::linear_algebra::BlockMatrix;
use crate::numerics::reconstruction::{create_reconstruction, SolutionReconstruction};
use crate::schemes::{create_inviscid_flux, FluxJacobian, InviscidFlux};

/// 并行循环的首个错误记录
pub(super) struct ErrorSlot(Mutex<Option<FvError>>);

impl ErrorSlot {
    pub(super) fn new() -> Self {
        Self(Mutex::new(None))
    }

    /// 记录第一个错误，后续错误被丢弃
    pub(super) fn record(&self, err: FvError) {
        let mut slot = self.0.lock().unwrap();
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    pub(super) fn into_result(self) -> FvResult<()> {
        match self.0.into_inner().unwrap() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// 有限体积空间离散组装器
///
/// `SECOND_ORDER` 与 `CONST_VISC` 为编译期特化；粘性项是否参与
/// 由运行期标志 `viscous_sim` 控制。
pub struct FlowAssembler<'m, const SECOND_ORDER: bool, const CONST_VISC: bool> {
    pub(super) mesh: &'m UnstructuredMesh2d,
    pub(super) physics: IdealGasPhysics,
    pub(super) uinf: [f64; NVARS],
    pub(super) aoa: f64,
    pub(super) viscous_sim: bool,
    inviscid_flux: Box<dyn InviscidFlux>,
    jacobian_flux: Box<dyn InviscidFlux>,
    gradient: Box<dyn GradientScheme>,
    reconstruction: Box<dyn SolutionReconstruction>,
    pub(super) bcs: BcRegistry,
    /// 实单元 + 幽灵单元中心（幽灵中心为左单元中心关于面中点的反射）
    pub(super) rc: Vec<DVec2>,
    has_periodic: bool,
}

impl<'m, const SECOND_ORDER: bool, const CONST_VISC: bool>
    FlowAssembler<'m, SECOND_ORDER, CONST_VISC>
{
    /// 由网格与配置构建
    ///
    /// 配置类错误（未知格式、边界覆盖缺失、周期面未配对）全部在此
    /// 报出，组装阶段不再出现。
    pub fn new(mesh: &'m UnstructuredMesh2d, config: &SolverConfig) -> FvResult<Self> {
        let p = &config.physics;
        let physics = IdealGasPhysics::new(p.gamma, p.minf, p.tinf, p.reinf, p.pr);
        let uinf = physics.freestream_state(p.aoa);

        // 实单元中心 + 关于面中点反射的幽灵中心
        let mut rc = Vec::with_capacity(mesh.n_cells() + mesh.n_boundary_faces());
        for c in 0..mesh.n_cells() {
            rc.push(mesh.cell_center(c));
        }
        for f in 0..mesh.n_boundary_faces() {
            let mid = mesh.face_midpoint(f);
            rc.push(2.0 * mid - mesh.cell_center(mesh.face_left(f)));
        }

        let bcs = create_boundary_registry(&config.boundaries, physics, uinf)?;
        bcs.check_coverage(&mesh.active_markers())?;

        // 周期标记的每个面都必须在网格中配对
        let mut has_periodic = false;
        for f in 0..mesh.n_boundary_faces() {
            if bcs.is_periodic(mesh.face_marker(f)) {
                has_periodic = true;
                if mesh.periodic_pair(f).is_none() {
                    return Err(FvError::topology(format!(
                        "boundary face {} has a periodic marker but no mesh pairing",
                        f
                    )));
                }
            }
        }

        Ok(Self {
            mesh,
            physics,
            uinf,
            aoa: p.aoa,
            viscous_sim: p.viscous_sim,
            inviscid_flux: create_inviscid_flux(config.numerics.conv_numflux, physics),
            jacobian_flux: create_inviscid_flux(config.numerics.conv_numflux_jac, physics),
            gradient: create_gradient_scheme(config.numerics.gradient_scheme, mesh, &rc),
            reconstruction: create_reconstruction(
                config.numerics.reconstruction,
                config.numerics.limiter_param,
            ),
            bcs,
            rc,
            has_periodic,
        })
    }

    /// 物性对象
    pub fn physics(&self) -> &IdealGasPhysics {
        &self.physics
    }

    /// 边界面右值填充：幽灵状态或周期复制
    ///
    /// `ins` 为各边界面的内侧状态（长度 = 总面数，只读前 nbface 段
    /// 亦可），周期面从配对面的内侧值复制。
    fn populate_boundary_states(
        &self,
        ins: &[[f64; NVARS]],
        out: &mut [[f64; NVARS]],
        errors: &ErrorSlot,
    ) {
        let mesh = self.mesh;
        out[..mesh.n_boundary_faces()]
            .par_iter_mut()
            .enumerate()
            .for_each(|(face, ghost)| {
                let marker = mesh.face_marker(face);
                if self.bcs.is_periodic(marker) {
                    // 周期面绕过幽灵计算：复制配对面的内侧状态
                    if let Some(pair) = mesh.periodic_pair(face) {
                        *ghost = ins[pair];
                    }
                    return;
                }
                match self.bcs.get(marker) {
                    Ok(bc) => *ghost = bc.ghost(&ins[face], mesh.face_normal(face)),
                    Err(err) => errors.record(err),
                }
            });
    }

    /// 面状态的物理性检查（负密度/负压力只记录，不中止）
    #[inline]
    fn check_face_state(&self, cell: usize, state: &[f64; NVARS], errors: &ErrorSlot) {
        if state[0] <= 0.0 {
            errors.record(FvError::InvalidState {
                cell,
                what: "non-positive density",
            });
        } else if self.physics.pressure(state) <= 0.0 {
            errors.record(FvError::InvalidState {
                cell,
                what: "non-positive pressure",
            });
        }
    }

    /// 左右面值准备：一阶直接取单元值，二阶经原始变量重构
    ///
    /// 返回（uleft, uright, 幽灵原始值, 原始梯度）；后两者仅二阶时非空。
    #[allow(clippy::type_complexity)]
    fn prepare_face_states(
        &self,
        u: &[[f64; NVARS]],
        errors: &ErrorSlot,
    ) -> (
        Vec<[f64; NVARS]>,
        Vec<[f64; NVARS]>,
        Vec<[f64; NVARS]>,
        Vec<CellGradients>,
    ) {
        let mesh = self.mesh;
        let phys = &self.physics;
        let nbf = mesh.n_boundary_faces();
        let mut uleft = vec![[0.0; NVARS]; mesh.n_faces()];
        let mut uright = vec![[0.0; NVARS]; mesh.n_faces()];

        // 边界面左值 ← 内侧单元值
        for face in 0..nbf {
            uleft[face] = u[mesh.face_left(face)];
        }

        let (ugp, grads) = if SECOND_ORDER {
            // 幽灵守恒状态
            let ins: Vec<[f64; NVARS]> = (0..nbf).map(|f| uleft[f]).collect();
            let mut ug = vec![[0.0; NVARS]; nbf];
            self.populate_boundary_states(&ins, &mut ug, errors);

            // 全部转原始变量
            let ugp: Vec<[f64; NVARS]> = ug
                .par_iter()
                .map(|g| phys.conserved_to_primitive(g))
                .collect();
            let up: Vec<[f64; NVARS]> = u
                .par_iter()
                .map(|c| phys.conserved_to_primitive(c))
                .collect();

            // 原始变量梯度与限制重构
            let mut grads = vec![[DVec2::ZERO; NVARS]; mesh.n_cells()];
            self.gradient
                .compute_gradients(mesh, &self.rc, &up, &ugp, &mut grads);
            self.reconstruction
                .compute_face_values(mesh, &self.rc, &up, &ugp, &grads, &mut uleft, &mut uright);

            // 面值转回守恒变量（梯度保持原始变量）
            uleft
                .par_iter_mut()
                .for_each(|w| *w = phys.primitive_to_conserved(w));
            uright[nbf..]
                .par_iter_mut()
                .for_each(|w| *w = phys.primitive_to_conserved(w));

            (ugp, grads)
        } else {
            // 一阶：面值即单元值
            uleft[nbf..]
                .par_iter_mut()
                .zip(uright[nbf..].par_iter_mut())
                .enumerate()
                .for_each(|(k, (ul, ur))| {
                    let face = nbf + k;
                    *ul = u[mesh.face_left(face)];
                    *ur = u[mesh.face_right(face)];
                });
            (Vec::new(), Vec::new())
        };

        // 边界面右值：幽灵状态（守恒变量）
        let ins = uleft.clone();
        self.populate_boundary_states(&ins, &mut uright, errors);

        (uleft, uright, ugp, grads)
    }
}

impl<'m, const SECOND_ORDER: bool, const CONST_VISC: bool> FlowSolver
    for FlowAssembler<'m, SECOND_ORDER, CONST_VISC>
{
    fn n_cells(&self) -> usize {
        self.mesh.n_cells()
    }

    fn freestream(&self) -> [f64; NVARS] {
        self.uinf
    }

    fn initialize_unknowns(&self) -> Vec<[f64; NVARS]> {
        vec![self.uinf; self.mesh.n_cells()]
    }

    fn assemble_residual(
        &self,
        u: &[[f64; NVARS]],
        residual: &mut [[f64; NVARS]],
        time_steps: Option<&mut [f64]>,
    ) -> FvResult<()> {
        let mesh = self.mesh;
        let phys = &self.physics;
        let errors = ErrorSlot::new();
        let get_dt = time_steps.is_some();

        let (uleft, uright, ugp, grads) = self.prepare_face_states(u, &errors);

        let res = AtomicF64Buffer::zeros(mesh.n_cells() * NVARS);
        let integ = AtomicF64Buffer::zeros(mesh.n_cells());

        (0..mesh.n_faces()).into_par_iter().for_each(|face| {
            let n = mesh.face_normal(face);
            let len = mesh.face_length(face);
            let lelem = mesh.face_left(face);
            let relem = mesh.face_right(face);
            let ul = &uleft[face];
            let ur = &uright[face];

            self.check_face_state(lelem, ul, &errors);
            self.check_face_state(lelem, ur, &errors);

            let mut fluxes = self.inviscid_flux.flux(ul, ur, n);
            for f in fluxes.iter_mut() {
                *f *= len;
            }

            if self.viscous_sim {
                let ucell_r = if relem < mesh.n_cells() {
                    Some(&u[relem])
                } else {
                    None
                };
                let vflux =
                    self.viscous_flux(face, &u[lelem], ucell_r, &ugp, &grads, ul, ur);
                for (f, v) in fluxes.iter_mut().zip(vflux.iter()) {
                    *f += v * len;
                }
            }

            // 残差为 −r(u)：左减右加
            for i in 0..NVARS {
                res.add(lelem * NVARS + i, -fluxes[i]);
            }
            if relem < mesh.n_cells() {
                for i in 0..NVARS {
                    res.add(relem * NVARS + i, fluxes[i]);
                }
            }

            if get_dt {
                let ci = phys.sound_speed(ul);
                let cj = phys.sound_speed(ur);
                let vni = phys.normal_velocity(ul, n);
                let vnj = phys.normal_velocity(ur, n);
                let mut specradi = (vni.abs() + ci) * len;
                let mut specradj = (vnj.abs() + cj) * len;

                if self.viscous_sim {
                    let (mui, muj) = if CONST_VISC {
                        (phys.constant_viscosity(), phys.constant_viscosity())
                    } else {
                        (phys.viscosity(ul), phys.viscosity(ur))
                    };
                    let coi = (4.0 / (3.0 * ul[0])).max(phys.gamma / ul[0]);
                    let coj = (4.0 / (3.0 * ur[0])).max(phys.gamma / ur[0]);
                    specradi += coi * mui / phys.pr * len * len / mesh.cell_area(lelem);
                    if relem < mesh.n_cells() {
                        specradj += coj * muj / phys.pr * len * len / mesh.cell_area(relem);
                    }
                }

                integ.add(lelem, specradi);
                if relem < mesh.n_cells() {
                    integ.add(relem, specradj);
                }
            }
        });

        let res = res.into_vec();
        for (cell, out) in residual.iter_mut().enumerate() {
            for i in 0..NVARS {
                out[i] = res[cell * NVARS + i];
            }
        }
        if let Some(dtm) = time_steps {
            for (cell, dt) in dtm.iter_mut().enumerate() {
                *dt = mesh.cell_area(cell) / integ.load(cell);
            }
        }

        errors.into_result()
    }

    fn assemble_jacobian(&self, u: &[[f64; NVARS]], matrix: &dyn BlockMatrix) -> FvResult<()> {
        if self.has_periodic {
            return Err(FvError::config(
                "periodic boundaries are not supported in Jacobian assembly",
            ));
        }
        let mesh = self.mesh;
        let errors = ErrorSlot::new();

        // 边界面：对角块 len·(∂F/∂u_L + ∂F/∂u_R·G)
        (0..mesh.n_boundary_faces()).into_par_iter().for_each(|face| {
            let n = mesh.face_normal(face);
            let len = mesh.face_length(face);
            let lelem = mesh.face_left(face);

            let bc = match self.bcs.get(mesh.face_marker(face)) {
                Ok(bc) => bc,
                Err(err) => {
                    errors.record(err);
                    return;
                }
            };
            let (ughost, g) = bc.ghost_and_jacobian(&u[lelem], n);

            let mut al: FluxJacobian = [[0.0; NVARS]; NVARS];
            let mut ar: FluxJacobian = [[0.0; NVARS]; NVARS];
            self.jacobian_flux.jacobian(&u[lelem], &ughost, n, &mut al, &mut ar);
            if self.viscous_sim {
                self.viscous_flux_jacobian(face, &u[lelem], &ughost, &mut al, &mut ar);
            }

            // al + ar·G，整体乘面长
            let mut block = [[0.0; NVARS]; NVARS];
            for i in 0..NVARS {
                for k in 0..NVARS {
                    let mut v = al[i][k];
                    for j in 0..NVARS {
                        v += ar[i][j] * g[j][k];
                    }
                    block[i][k] = len * v;
                }
            }
            if let Err(err) = matrix.add_block(lelem, lelem, &block) {
                errors.record(err);
            }
        });

        // 内部面：四个块
        (mesh.n_boundary_faces()..mesh.n_faces())
            .into_par_iter()
            .for_each(|face| {
                let n = mesh.face_normal(face);
                let len = mesh.face_length(face);
                let lelem = mesh.face_left(face);
                let relem = mesh.face_right(face);

                let mut al: FluxJacobian = [[0.0; NVARS]; NVARS];
                let mut ar: FluxJacobian = [[0.0; NVARS]; NVARS];
                self.jacobian_flux
                    .jacobian(&u[lelem], &u[relem], n, &mut al, &mut ar);
                if self.viscous_sim {
                    self.viscous_flux_jacobian(face, &u[lelem], &u[relem], &mut al, &mut ar);
                }

                let mut pos_l = [[0.0; NVARS]; NVARS];
                let mut pos_r = [[0.0; NVARS]; NVARS];
                let mut neg_l = [[0.0; NVARS]; NVARS];
                let mut neg_r = [[0.0; NVARS]; NVARS];
                for i in 0..NVARS {
                    for k in 0..NVARS {
                        pos_l[i][k] = len * al[i][k];
                        pos_r[i][k] = len * ar[i][k];
                        neg_l[i][k] = -len * al[i][k];
                        neg_r[i][k] = -len * ar[i][k];
                    }
                }

                // r_L = +F·len：行 L 得 +len·A；r_R = −F·len：行 R 得 −len·A
                for result in [
                    matrix.add_block(lelem, lelem, &pos_l),
                    matrix.add_block(lelem, relem, &pos_r),
                    matrix.add_block(relem, lelem, &neg_l),
                    matrix.add_block(relem, relem, &neg_r),
                ] {
                    if let Err(err) = result {
                        errors.record(err);
                    }
                }
            });

        errors.into_result()
    }

    fn compute_gradients(&self, u: &[[f64; NVARS]]) -> FvResult<Vec<CellGradients>> {
        let mesh = self.mesh;
        let errors = ErrorSlot::new();

        // 守恒变量的幽灵状态
        let ins: Vec<[f64; NVARS]> = (0..mesh.n_boundary_faces())
            .map(|f| u[mesh.face_left(f)])
            .collect();
        let mut ug = vec![[0.0; NVARS]; mesh.n_boundary_faces()];
        self.populate_boundary_states(&ins, &mut ug, &errors);
        errors.into_result()?;

        let mut grads = vec![[DVec2::ZERO; NVARS]; mesh.n_cells()];
        self.gradient
            .compute_gradients(mesh, &self.rc, u, &ug, &mut grads);
        Ok(grads)
    }

    fn compute_surface_data(
        &self,
        u: &[[f64; NVARS]],
        grads: &[CellGradients],
        wall_marker: i32,
    ) -> SurfaceData {
        self.surface_data(u, grads, wall_marker)
    }
}
