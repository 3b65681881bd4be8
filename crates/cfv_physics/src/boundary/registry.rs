// crates/cfv_physics/src/boundary/registry.rs

//! 边界条件注册表
//!
//! 标记 → 边界条件对象的映射，每个激活标记恰好一个条目。周期标记单独
//! 记录：它们不产生幽灵状态，组装阶段通过网格周期映射处理。
//! 覆盖性在构造期检查，组装期不再出现配置错误。

use std::collections::{BTreeMap, BTreeSet};

use cfv_config::{BoundaryKindSpec, BoundarySpec};
use cfv_foundation::{FvError, FvResult, NVARS};
use tracing::info;

use super::conditions::{
    AdiabaticWall, Extrapolation, Farfield, FlowBc, InOutFlow, IsothermalWall, SlipWall,
    SubsonicInflow,
};
use crate::gas::IdealGasPhysics;

/// 边界条件注册表
pub struct BcRegistry {
    bcs: BTreeMap<i32, Box<dyn FlowBc>>,
    periodic_markers: BTreeSet<i32>,
}

impl BcRegistry {
    /// 取标记对应的边界条件
    pub fn get(&self, marker: i32) -> FvResult<&dyn FlowBc> {
        self.bcs
            .get(&marker)
            .map(|b| b.as_ref())
            .ok_or(FvError::MissingBoundaryCondition { marker })
    }

    /// 标记是否为周期边界
    #[inline]
    pub fn is_periodic(&self, marker: i32) -> bool {
        self.periodic_markers.contains(&marker)
    }

    /// 检查网格激活标记全部有配置（周期标记亦视为覆盖）
    pub fn check_coverage(&self, active_markers: &[i32]) -> FvResult<()> {
        for &marker in active_markers {
            if !self.bcs.contains_key(&marker) && !self.is_periodic(marker) {
                return Err(FvError::MissingBoundaryCondition { marker });
            }
        }
        Ok(())
    }
}

/// 由配置列表构建注册表
///
/// `uinf` 为来流守恒状态，供远场与进出流边界使用。
pub fn create_boundary_registry(
    specs: &[BoundarySpec],
    physics: IdealGasPhysics,
    uinf: [f64; NVARS],
) -> FvResult<BcRegistry> {
    let mut bcs: BTreeMap<i32, Box<dyn FlowBc>> = BTreeMap::new();
    let mut periodic_markers = BTreeSet::new();

    for spec in specs {
        if bcs.contains_key(&spec.marker) || periodic_markers.contains(&spec.marker) {
            return Err(FvError::config(format!(
                "duplicate boundary condition for marker {}",
                spec.marker
            )));
        }
        let bc: Box<dyn FlowBc> = match spec.kind {
            BoundaryKindSpec::Slipwall => Box::new(SlipWall),
            BoundaryKindSpec::Farfield => Box::new(Farfield::new(uinf)),
            BoundaryKindSpec::Inoutflow => Box::new(InOutFlow::new(physics, uinf)),
            BoundaryKindSpec::Inflow => {
                let ptotal = spec.values[0];
                let ttotal = spec.values[1];
                Box::new(SubsonicInflow::new(physics, ptotal, ttotal))
            }
            BoundaryKindSpec::Extrapolation => Box::new(Extrapolation),
            BoundaryKindSpec::Adiabaticwall => {
                Box::new(AdiabaticWall::new(physics, spec.values[0]))
            }
            BoundaryKindSpec::Isothermalwall => {
                Box::new(IsothermalWall::new(physics, spec.values[0], spec.values[1]))
            }
            BoundaryKindSpec::Periodic => {
                periodic_markers.insert(spec.marker);
                info!("boundary marker {}: periodic", spec.marker);
                continue;
            }
        };
        info!("boundary marker {}: {}", spec.marker, bc.name());
        bcs.insert(spec.marker, bc);
    }

    Ok(BcRegistry {
        bcs,
        periodic_markers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physics() -> IdealGasPhysics {
        IdealGasPhysics::new(1.4, 0.5, 288.15, 1.0e5, 0.72)
    }

    #[test]
    fn test_registry_coverage() {
        let phys = physics();
        let uinf = phys.freestream_state(0.0);
        let specs = vec![
            BoundarySpec {
                marker: 1,
                kind: BoundaryKindSpec::Slipwall,
                values: vec![],
                opts: vec![],
            },
            BoundarySpec {
                marker: 2,
                kind: BoundaryKindSpec::Farfield,
                values: vec![],
                opts: vec![],
            },
        ];
        let registry = create_boundary_registry(&specs, phys, uinf).unwrap();
        registry.check_coverage(&[1, 2]).unwrap();
        assert!(registry.check_coverage(&[1, 2, 3]).is_err());
        assert!(registry.get(1).is_ok());
        assert!(matches!(
            registry.get(9),
            Err(FvError::MissingBoundaryCondition { marker: 9 })
        ));
    }

    #[test]
    fn test_periodic_markers_tracked() {
        let phys = physics();
        let uinf = phys.freestream_state(0.0);
        let specs = vec![
            BoundarySpec {
                marker: 7,
                kind: BoundaryKindSpec::Periodic,
                values: vec![],
                opts: vec![8],
            },
            BoundarySpec {
                marker: 8,
                kind: BoundaryKindSpec::Periodic,
                values: vec![],
                opts: vec![7],
            },
        ];
        let registry = create_boundary_registry(&specs, phys, uinf).unwrap();
        assert!(registry.is_periodic(7));
        assert!(registry.is_periodic(8));
        registry.check_coverage(&[7, 8]).unwrap();
        assert!(registry.get(7).is_err());
    }

    #[test]
    fn test_duplicate_marker_rejected() {
        let phys = physics();
        let uinf = phys.freestream_state(0.0);
        let spec = BoundarySpec {
            marker: 1,
            kind: BoundaryKindSpec::Slipwall,
            values: vec![],
            opts: vec![],
        };
        let specs = vec![spec.clone(), spec];
        assert!(create_boundary_registry(&specs, phys, uinf).is_err());
    }
}
