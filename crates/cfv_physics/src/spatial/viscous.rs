// crates/cfv_physics/src/spatial/viscous.rs

//! 粘性通量与其雅可比
//!
//! 残差使用修正平均面梯度：
//!
//! ∇_f u = ½(∇u_L + ∇u_R) − (½(∇u_L + ∇u_R)·d̂)d̂ + ((u_R − u_L)/|d|)d̂
//!
//! 即把平均梯度沿单元中心连线方向的分量替换为直接差分，对网格偏斜
//! 不敏感。雅可比默认取薄层近似（只保留直接差分项），这是有意的
//! 不一致：以牺牲一点 Newton 收敛速度换取隐式迭代的稳定性。
//!
//! 通量分量按负残差约定取负号：F_v = −(0, τ·n̂, (τ·v̄ + k∇T)·n̂)，
//! 与无粘通量同号累加。

use cfv_foundation::NVARS;
use glam::DVec2;

use super::assembler::FlowAssembler;
use crate::numerics::gradient::CellGradients;
use crate::schemes::FluxJacobian;

/// 方向 × 变量的面梯度
type FaceGradient = [[f64; NVARS]; 2];

impl<'m, const SECOND_ORDER: bool, const CONST_VISC: bool>
    FlowAssembler<'m, SECOND_ORDER, CONST_VISC>
{
    /// 单元中心连线的单位向量与距离
    #[inline]
    fn center_line(&self, face: usize) -> (DVec2, f64) {
        let lelem = self.mesh.face_left(face);
        let relem = self.mesh.face_right(face);
        let d = self.rc[relem] - self.rc[lelem];
        let dist = d.length();
        (d / dist, dist)
    }

    /// 修正平均面梯度
    fn modified_average_gradient(
        &self,
        face: usize,
        ucl: &[f64; NVARS],
        ucr: &[f64; NVARS],
        gradl: &FaceGradient,
        gradr: &FaceGradient,
    ) -> FaceGradient {
        let (dhat, dist) = self.center_line(face);
        let dh = [dhat.x, dhat.y];
        let mut grad = [[0.0; NVARS]; 2];
        for var in 0..NVARS {
            let davg = [
                0.5 * (gradl[0][var] + gradr[0][var]),
                0.5 * (gradl[1][var] + gradr[1][var]),
            ];
            let ddr = davg[0] * dh[0] + davg[1] * dh[1];
            let corr = (ucr[var] - ucl[var]) / dist;
            for dir in 0..2 {
                grad[dir][var] = davg[dir] - ddr * dh[dir] + corr * dh[dir];
            }
        }
        grad
    }

    /// 粘性面通量
    ///
    /// `ucell_r` 为右单元守恒状态（边界面为 None），`ugp` 为幽灵原始
    /// 状态、`grads` 为原始变量梯度（仅二阶非空），`ul`/`ur` 为面上的
    /// 守恒状态。
    pub(super) fn viscous_flux(
        &self,
        face: usize,
        ucell_l: &[f64; NVARS],
        ucell_r: Option<&[f64; NVARS]>,
        ugp: &[[f64; NVARS]],
        grads: &[CellGradients],
        ul: &[f64; NVARS],
        ur: &[f64; NVARS],
    ) -> [f64; NVARS] {
        let phys = &self.physics;
        let mesh = self.mesh;
        let lelem = mesh.face_left(face);

        // 单元中心的原始量-2 状态与单侧梯度（一阶时梯度为零）
        let mut ucl;
        let mut ucr;
        let mut gradl = [[0.0; NVARS]; 2];
        let mut gradr = [[0.0; NVARS]; 2];

        match ucell_r {
            None => {
                // 边界面
                if SECOND_ORDER {
                    ucl = phys.conserved_to_primitive(ucell_l);
                    ucr = ugp[face];
                    for dir in 0..2 {
                        for var in 0..NVARS {
                            gradl[dir][var] = grads[lelem][var][dir];
                        }
                        // 压力梯度换成温度梯度
                        gradl[dir][3] = phys.grad_temperature(
                            ucl[0],
                            gradl[dir][0],
                            ucl[3],
                            gradl[dir][3],
                        );
                    }
                    // 边界面两侧用同一梯度（只剩单侧信息）
                    gradr = gradl;
                } else {
                    ucl = phys.conserved_to_primitive(ucell_l);
                    ucr = phys.conserved_to_primitive(ur);
                }
            }
            Some(ucr_state) => {
                let relem = mesh.face_right(face);
                ucl = phys.conserved_to_primitive(ucell_l);
                ucr = phys.conserved_to_primitive(ucr_state);
                if SECOND_ORDER {
                    for dir in 0..2 {
                        for var in 0..NVARS {
                            gradl[dir][var] = grads[lelem][var][dir];
                            gradr[dir][var] = grads[relem][var][dir];
                        }
                        gradl[dir][3] = phys.grad_temperature(
                            ucl[0],
                            gradl[dir][0],
                            ucl[3],
                            gradl[dir][3],
                        );
                        gradr[dir][3] = phys.grad_temperature(
                            ucr[0],
                            gradr[dir][0],
                            ucr[3],
                            gradr[dir][3],
                        );
                    }
                }
            }
        }

        // 原始量 → 原始量-2：压力换温度
        ucl[3] = phys.temperature(ucl[0], ucl[3]);
        ucr[3] = phys.temperature(ucr[0], ucr[3]);

        let grad = self.modified_average_gradient(face, &ucl, &ucr, &gradl, &gradr);

        let mu = if CONST_VISC {
            phys.constant_viscosity()
        } else {
            0.5 * (phys.viscosity(ul) + phys.viscosity(ur))
        };
        let kdiff = phys.thermal_conductivity(mu);
        let stress = phys.stress_tensor(mu, &grad);

        let n = mesh.face_normal(face);
        let nd = [n.x, n.y];
        let mut vflux = [0.0; NVARS];
        for i in 0..2 {
            for j in 0..2 {
                vflux[i + 1] -= stress[i][j] * nd[j];
            }
        }

        // 能量耗散：动量通量做功 + 热流
        let vavg = [
            0.5 * (ul[1] / ul[0] + ur[1] / ur[0]),
            0.5 * (ul[2] / ul[0] + ur[2] / ur[0]),
        ];
        for i in 0..2 {
            let mut comp = 0.0;
            for j in 0..2 {
                comp += stress[i][j] * vavg[j];
            }
            comp += kdiff * grad[i][3];
            vflux[3] -= comp * nd[i];
        }
        vflux
    }

    /// 粘性通量雅可比（薄层梯度），累加进 `a_l`/`a_r`
    ///
    /// 面梯度取 ∇_f u ≈ ((u_R − u_L)/|d|)d̂，
    /// 故 ∂∇_f/∂u = ±(d̂/|d|)·∂(原始量-2)/∂(守恒量)。
    pub(super) fn viscous_flux_jacobian(
        &self,
        face: usize,
        ul: &[f64; NVARS],
        ur: &[f64; NVARS],
        a_l: &mut FluxJacobian,
        a_r: &mut FluxJacobian,
    ) {
        let phys = &self.physics;
        let (dhat, dist) = self.center_line(face);
        let dh = [dhat.x, dhat.y];

        let upl = phys.conserved_to_primitive2(ul);
        let upr = phys.conserved_to_primitive2(ur);
        let dupl = phys.jacobian_primitive2(ul);
        let dupr = phys.jacobian_primitive2(ur);

        // 薄层面梯度及其导数
        let mut grad = [[0.0; NVARS]; 2];
        let mut dgradl = [[[0.0; NVARS]; NVARS]; 2];
        let mut dgradr = [[[0.0; NVARS]; NVARS]; 2];
        for var in 0..NVARS {
            let corr = (upr[var] - upl[var]) / dist;
            for dir in 0..2 {
                grad[dir][var] = corr * dh[dir];
                for k in 0..NVARS {
                    dgradl[dir][var][k] = -dupl[var][k] / dist * dh[dir];
                    dgradr[dir][var][k] = dupr[var][k] / dist * dh[dir];
                }
            }
        }

        let mu = if CONST_VISC {
            phys.constant_viscosity()
        } else {
            0.5 * (phys.viscosity(ul) + phys.viscosity(ur))
        };
        let kdiff = phys.thermal_conductivity(mu);

        let mut dmul = [0.0; NVARS];
        let mut dmur = [0.0; NVARS];
        let mut dkdl = [0.0; NVARS];
        let mut dkdr = [0.0; NVARS];
        if !CONST_VISC {
            dmul = phys.dviscosity(ul);
            dmur = phys.dviscosity(ur);
            for k in 0..NVARS {
                dmul[k] *= 0.5;
                dmur[k] *= 0.5;
            }
            dkdl = phys.dthermal_conductivity(&dmul);
            dkdr = phys.dthermal_conductivity(&dmur);
        }

        let (stress, dstressl) = phys.stress_tensor_and_jacobian(mu, &dmul, &grad, &dgradl);
        let (_, dstressr) = phys.stress_tensor_and_jacobian(mu, &dmur, &grad, &dgradr);

        let n = self.mesh.face_normal(face);
        let nd = [n.x, n.y];

        // 动量行：F_{i+1} = −Σ_j τ_ij n_j
        for i in 0..2 {
            for j in 0..2 {
                for k in 0..NVARS {
                    a_l[i + 1][k] -= dstressl[i][j][k] * nd[j];
                    a_r[i + 1][k] -= dstressr[i][j][k] * nd[j];
                }
            }
        }

        // 能量行
        let vavg = [
            0.5 * (ul[1] / ul[0] + ur[1] / ur[0]),
            0.5 * (ul[2] / ul[0] + ur[2] / ur[0]),
        ];
        let mut dvavgl = [[0.0; NVARS]; 2];
        let mut dvavgr = [[0.0; NVARS]; 2];
        for j in 0..2 {
            dvavgl[j][0] = -0.5 * ul[j + 1] / (ul[0] * ul[0]);
            dvavgr[j][0] = -0.5 * ur[j + 1] / (ur[0] * ur[0]);
            dvavgl[j][j + 1] = 0.5 / ul[0];
            dvavgr[j][j + 1] = 0.5 / ur[0];
        }

        for i in 0..2 {
            for k in 0..NVARS {
                let mut dcompl = 0.0;
                let mut dcompr = 0.0;
                for j in 0..2 {
                    dcompl += dstressl[i][j][k] * vavg[j] + stress[i][j] * dvavgl[j][k];
                    dcompr += dstressr[i][j][k] * vavg[j] + stress[i][j] * dvavgr[j][k];
                }
                dcompl += dkdl[k] * grad[i][3] + kdiff * dgradl[i][3][k];
                dcompr += dkdr[k] * grad[i][3] + kdiff * dgradr[i][3][k];
                a_l[3][k] -= dcompl * nd[i];
                a_r[3][k] -= dcompr * nd[i];
            }
        }
    }

    /// 粘性通量近似雅可比：只保留 −μ/(ρ̄|d|) 的对角贡献
    ///
    /// 更粗但更便宜的备选；精度要求不高的隐式预条件可用。
    #[allow(dead_code)]
    pub(super) fn viscous_flux_approximate_jacobian(
        &self,
        face: usize,
        ul: &[f64; NVARS],
        ur: &[f64; NVARS],
        a_l: &mut FluxJacobian,
        a_r: &mut FluxJacobian,
    ) {
        let phys = &self.physics;
        let (_, dist) = self.center_line(face);
        let mu = if CONST_VISC {
            phys.constant_viscosity()
        } else {
            0.5 * (phys.viscosity(ul) + phys.viscosity(ur))
        };
        let rho = 0.5 * (ul[0] + ur[0]);
        for i in 0..NVARS {
            a_l[i][i] += mu / (rho * dist);
            a_r[i][i] -= mu / (rho * dist);
        }
    }

    /// 薄层梯度下的粘性通量（雅可比的被差分函数，测试用）
    #[cfg(test)]
    pub(crate) fn viscous_flux_thin_layer(
        &self,
        face: usize,
        ul: &[f64; NVARS],
        ur: &[f64; NVARS],
    ) -> [f64; NVARS] {
        let phys = &self.physics;
        let (dhat, dist) = self.center_line(face);
        let dh = [dhat.x, dhat.y];

        let upl = phys.conserved_to_primitive2(ul);
        let upr = phys.conserved_to_primitive2(ur);
        let mut grad = [[0.0; NVARS]; 2];
        for var in 0..NVARS {
            let corr = (upr[var] - upl[var]) / dist;
            for dir in 0..2 {
                grad[dir][var] = corr * dh[dir];
            }
        }

        let mu = if CONST_VISC {
            phys.constant_viscosity()
        } else {
            0.5 * (phys.viscosity(ul) + phys.viscosity(ur))
        };
        let kdiff = phys.thermal_conductivity(mu);
        let stress = phys.stress_tensor(mu, &grad);

        let n = self.mesh.face_normal(face);
        let nd = [n.x, n.y];
        let mut vflux = [0.0; NVARS];
        for i in 0..2 {
            for j in 0..2 {
                vflux[i + 1] -= stress[i][j] * nd[j];
            }
        }
        let vavg = [
            0.5 * (ul[1] / ul[0] + ur[1] / ur[0]),
            0.5 * (ul[2] / ul[0] + ur[2] / ur[0]),
        ];
        for i in 0..2 {
            let mut comp = 0.0;
            for j in 0..2 {
                comp += stress[i][j] * vavg[j];
            }
            comp += kdiff * grad[i][3];
            vflux[3] -= comp * nd[i];
        }
        vflux
    }
}
