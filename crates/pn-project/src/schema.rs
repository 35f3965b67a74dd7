//! Scenario schema definitions.

use serde::{Deserialize, Serialize};

/// Current scenario file version. Files with a higher version are rejected.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    /// Fluid name, resolved through the library
    pub fluid: String,
    /// Static lift between suction and discharge [m]
    pub geometric_head_m: f64,
    #[serde(default)]
    pub library: UserLibraryDef,
    pub pump: PumpDef,
    #[serde(default)]
    pub network: NetworkDef,
    pub cost: CostDef,
    #[serde(default)]
    pub sensitivity: SensitivityDef,
}

/// User entries layered over the built-in tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserLibraryDef {
    #[serde(default)]
    pub materials: Vec<MaterialDef>,
    #[serde(default)]
    pub fluids: Vec<FluidDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialDef {
    pub name: String,
    pub roughness_mm: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FluidDef {
    pub name: String,
    pub density_kg_m3: f64,
    pub kinematic_viscosity_m2_s: f64,
}

/// Tabulated pump data as entered by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PumpDef {
    /// `(flow [m³/h], head [m])` rows
    #[serde(default)]
    pub head_curve: Vec<SampleRowDef>,
    /// `(flow [m³/h], efficiency [%])` rows
    #[serde(default)]
    pub efficiency_curve: Vec<SampleRowDef>,
    #[serde(default = "default_degree")]
    pub degree: usize,
}

fn default_degree() -> usize {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SampleRowDef {
    #[serde(default)]
    pub flow: Option<CellDef>,
    #[serde(default)]
    pub value: Option<CellDef>,
}

/// A table cell: a number, or whatever text the user typed.
///
/// ```yaml
/// - { flow: 50, value: "35.0" }
/// - { flow: "n/a", value: 30 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CellDef {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NetworkDef {
    /// Segments between the pump and the split
    #[serde(default)]
    pub before: Vec<SegmentDef>,
    /// Parallel branches; fewer than two means no split
    #[serde(default)]
    pub branches: Vec<BranchDef>,
    /// Segments between the junction and the discharge
    #[serde(default)]
    pub after: Vec<SegmentDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BranchDef {
    pub name: String,
    #[serde(default)]
    pub segments: Vec<SegmentDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentDef {
    /// Optional stable id (UUID). Generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub length_m: f64,
    pub diameter_mm: f64,
    pub material: String,
    #[serde(default)]
    pub fittings: Vec<FittingDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FittingDef {
    pub name: String,
    /// Loss coefficient. Looked up in the fitting catalogue when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<f64>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostDef {
    pub motor_efficiency_pct: f64,
    pub hours_per_day: f64,
    pub tariff_per_kwh: f64,
}

/// Diameter scale range [%] for the sensitivity sweep.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensitivityDef {
    #[serde(default = "default_from_pct")]
    pub from_pct: f64,
    #[serde(default = "default_to_pct")]
    pub to_pct: f64,
}

fn default_from_pct() -> f64 {
    80.0
}

fn default_to_pct() -> f64 {
    120.0
}

impl Default for SensitivityDef {
    fn default() -> Self {
        Self {
            from_pct: default_from_pct(),
            to_pct: default_to_pct(),
        }
    }
}

impl SampleRowDef {
    pub fn numbers(flow: f64, value: f64) -> Self {
        Self {
            flow: Some(CellDef::Number(flow)),
            value: Some(CellDef::Number(value)),
        }
    }
}

impl SegmentDef {
    pub fn new(length_m: f64, diameter_mm: f64, material: impl Into<String>) -> Self {
        Self {
            id: None,
            length_m,
            diameter_mm,
            material: material.into(),
            fittings: Vec::new(),
        }
    }
}
