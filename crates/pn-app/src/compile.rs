//! Compilation of a `Scenario` into runtime values.
//!
//! Every name in the scenario (fluid, materials, catalogue fittings) is
//! resolved here, so evaluation never meets an unknown name halfway through
//! a solve.

use pn_components::{Branch, CostParameters, Fitting, LossContext, NetworkTopology, PipeSegment};
use pn_core::SegmentId;
use pn_core::units::{m, mm};
use pn_fluids::{FluidProperties, Library};
use pn_project::schema::{
    CellDef, CostDef, FittingDef, NetworkDef, SampleRowDef, Scenario, SegmentDef, UserLibraryDef,
};
use pn_solver::{Cell, SampleRow, ScaleRange};

use crate::error::{AppError, AppResult};

/// Runtime representation of a compiled scenario.
#[derive(Debug, Clone)]
pub struct ScenarioRuntime {
    pub name: String,
    pub library: Library,
    pub fluid: FluidProperties,
    pub topology: NetworkTopology,
    pub geometric_head_m: f64,
    pub pump: PumpTables,
    pub cost: CostInputs,
    pub sensitivity: ScaleRange,
}

impl ScenarioRuntime {
    pub fn loss_context(&self) -> LossContext<'_> {
        LossContext::new(self.fluid, &self.library)
    }
}

/// Raw pump tables, still unfitted.
#[derive(Debug, Clone)]
pub struct PumpTables {
    pub head: Vec<SampleRow>,
    pub efficiency: Vec<SampleRow>,
    pub degree: usize,
}

/// Cost inputs known before the operating point is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostInputs {
    pub motor_efficiency_pct: f64,
    pub hours_per_day: f64,
    pub tariff_per_kwh: f64,
}

impl CostInputs {
    /// Complete the cost parameters with the pump efficiency at the duty point.
    pub fn with_pump_efficiency(&self, pump_efficiency_pct: f64) -> CostParameters {
        CostParameters {
            pump_efficiency_pct,
            motor_efficiency_pct: self.motor_efficiency_pct,
            hours_per_day: self.hours_per_day,
            tariff_per_kwh: self.tariff_per_kwh,
        }
    }
}

/// Compile a scenario definition into runtime structures.
pub fn compile_scenario(scenario: &Scenario) -> AppResult<ScenarioRuntime> {
    let library = build_library(&scenario.library)?;
    let fluid = library.resolve_fluid(&scenario.fluid)?;
    let topology = build_topology(&scenario.network, &library)?;

    let pump = PumpTables {
        head: sample_rows(&scenario.pump.head_curve),
        efficiency: sample_rows(&scenario.pump.efficiency_curve),
        degree: scenario.pump.degree,
    };

    let CostDef {
        motor_efficiency_pct,
        hours_per_day,
        tariff_per_kwh,
    } = scenario.cost;

    tracing::debug!(
        name = %scenario.name,
        segments = topology.segments().count(),
        branches = topology.branches().len(),
        "scenario compiled"
    );

    Ok(ScenarioRuntime {
        name: scenario.name.clone(),
        library,
        fluid,
        topology,
        geometric_head_m: scenario.geometric_head_m,
        pump,
        cost: CostInputs {
            motor_efficiency_pct,
            hours_per_day,
            tariff_per_kwh,
        },
        sensitivity: ScaleRange::new(scenario.sensitivity.from_pct, scenario.sensitivity.to_pct),
    })
}

/// Built-in tables with the scenario's user entries layered on top.
pub fn build_library(def: &UserLibraryDef) -> AppResult<Library> {
    let mut library = Library::builtin();
    for material in &def.materials {
        library.add_user_material(&material.name, material.roughness_mm)?;
    }
    for fluid in &def.fluids {
        library.add_user_fluid(
            &fluid.name,
            fluid.density_kg_m3,
            fluid.kinematic_viscosity_m2_s,
        )?;
    }
    Ok(library)
}

pub fn build_topology(def: &NetworkDef, library: &Library) -> AppResult<NetworkTopology> {
    let segments = |defs: &[SegmentDef]| -> AppResult<Vec<PipeSegment>> {
        defs.iter().map(|s| build_segment(s, library)).collect()
    };

    let branches = def
        .branches
        .iter()
        .map(|b| Ok(Branch::new(b.name.clone(), segments(&b.segments)?)))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(NetworkTopology::from_parts(
        segments(&def.before)?,
        branches,
        segments(&def.after)?,
    )?)
}

pub fn build_segment(def: &SegmentDef, library: &Library) -> AppResult<PipeSegment> {
    library.resolve_material(&def.material)?;

    let mut segment = PipeSegment::new(m(def.length_m), mm(def.diameter_mm), def.material.clone());
    if let Some(id) = &def.id {
        let uuid = uuid::Uuid::parse_str(id)
            .map_err(|e| AppError::Compile(format!("Invalid segment id '{id}': {e}")))?;
        segment = segment.with_id(SegmentId::from_uuid(uuid));
    }

    for fitting in &def.fittings {
        segment = segment.with_fitting(build_fitting(fitting)?);
    }
    Ok(segment)
}

/// Explicit K wins; otherwise the name is looked up in the fitting catalogue.
pub fn build_fitting(def: &FittingDef) -> AppResult<Fitting> {
    let fitting = match def.k {
        Some(k) => Fitting::new(def.name.clone(), k, def.quantity)?,
        None => Fitting::from_catalog(&def.name, def.quantity).map_err(|e| {
            AppError::Compile(format!("Fitting '{}': {e}", def.name))
        })?,
    };
    Ok(fitting)
}

fn sample_rows(rows: &[SampleRowDef]) -> Vec<SampleRow> {
    rows.iter()
        .map(|row| SampleRow {
            flow: cell(row.flow.as_ref()),
            value: cell(row.value.as_ref()),
        })
        .collect()
}

fn cell(def: Option<&CellDef>) -> Cell {
    match def {
        Some(CellDef::Number(v)) => Cell::Number(*v),
        Some(CellDef::Text(s)) => Cell::Text(s.clone()),
        None => Cell::Missing,
    }
}
