//! Scenario validation logic.
//!
//! Checks structure and ranges only. Name resolution against the library and
//! curve fitting happen later, when the scenario is compiled and evaluated.

use crate::schema::{
    BranchDef, CostDef, FittingDef, NetworkDef, SCHEMA_VERSION, Scenario, SegmentDef,
    UserLibraryDef,
};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > SCHEMA_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    non_empty("fluid", &scenario.fluid)?;
    finite("geometric_head_m", scenario.geometric_head_m)?;

    validate_library(&scenario.library)?;
    validate_network(&scenario.network)?;
    validate_cost(&scenario.cost)?;

    let range = &scenario.sensitivity;
    if !(range.from_pct.is_finite() && range.from_pct > 0.0) {
        return Err(invalid(
            "sensitivity.from_pct",
            range.from_pct,
            "must be positive",
        ));
    }
    if !(range.to_pct.is_finite() && range.to_pct >= range.from_pct) {
        return Err(invalid(
            "sensitivity.to_pct",
            range.to_pct,
            "must not be below from_pct",
        ));
    }

    Ok(())
}

fn validate_library(library: &UserLibraryDef) -> Result<(), ValidationError> {
    let mut names = HashSet::new();
    for material in &library.materials {
        non_empty("library.materials.name", &material.name)?;
        if !names.insert(&material.name) {
            return Err(duplicate(&material.name, "library materials"));
        }
        if !(material.roughness_mm.is_finite() && material.roughness_mm >= 0.0) {
            return Err(invalid(
                &format!("material '{}' roughness_mm", material.name),
                material.roughness_mm,
                "must be non-negative",
            ));
        }
    }

    let mut names = HashSet::new();
    for fluid in &library.fluids {
        non_empty("library.fluids.name", &fluid.name)?;
        if !names.insert(&fluid.name) {
            return Err(duplicate(&fluid.name, "library fluids"));
        }
        positive(
            &format!("fluid '{}' density_kg_m3", fluid.name),
            fluid.density_kg_m3,
        )?;
        positive(
            &format!("fluid '{}' kinematic_viscosity_m2_s", fluid.name),
            fluid.kinematic_viscosity_m2_s,
        )?;
    }

    Ok(())
}

fn validate_network(network: &NetworkDef) -> Result<(), ValidationError> {
    let mut ids = HashSet::new();

    for (i, segment) in network.before.iter().enumerate() {
        validate_segment(segment, &format!("before[{i}]"), &mut ids)?;
    }

    let mut branch_names = HashSet::new();
    for BranchDef { name, segments } in &network.branches {
        non_empty("branch name", name)?;
        if !branch_names.insert(name) {
            return Err(duplicate(name, "network branches"));
        }
        for (i, segment) in segments.iter().enumerate() {
            validate_segment(segment, &format!("branch '{name}'[{i}]"), &mut ids)?;
        }
    }

    for (i, segment) in network.after.iter().enumerate() {
        validate_segment(segment, &format!("after[{i}]"), &mut ids)?;
    }

    Ok(())
}

fn validate_segment<'a>(
    segment: &'a SegmentDef,
    location: &str,
    ids: &mut HashSet<&'a String>,
) -> Result<(), ValidationError> {
    if let Some(id) = &segment.id {
        if uuid::Uuid::parse_str(id).is_err() {
            return Err(invalid(&format!("{location}.id"), id, "not a UUID"));
        }
        if !ids.insert(id) {
            return Err(duplicate(id, "segment ids"));
        }
    }
    positive(&format!("{location}.length_m"), segment.length_m)?;
    positive(&format!("{location}.diameter_mm"), segment.diameter_mm)?;
    non_empty(&format!("{location}.material"), &segment.material)?;

    for FittingDef { name, k, quantity } in &segment.fittings {
        non_empty(&format!("{location} fitting name"), name)?;
        if *quantity == 0 {
            return Err(invalid(
                &format!("{location} fitting '{name}' quantity"),
                quantity,
                "must be at least 1",
            ));
        }
        match k {
            Some(k) if !(k.is_finite() && *k >= 0.0) => {
                return Err(invalid(
                    &format!("{location} fitting '{name}' k"),
                    k,
                    "must be non-negative",
                ));
            }
            _ => {}
        }
    }

    Ok(())
}

fn validate_cost(cost: &CostDef) -> Result<(), ValidationError> {
    if !(0.0..=100.0).contains(&cost.motor_efficiency_pct) {
        return Err(invalid(
            "cost.motor_efficiency_pct",
            cost.motor_efficiency_pct,
            "must be within 0..=100",
        ));
    }
    if !(0.0..=24.0).contains(&cost.hours_per_day) {
        return Err(invalid(
            "cost.hours_per_day",
            cost.hours_per_day,
            "must be within 0..=24",
        ));
    }
    if !(cost.tariff_per_kwh.is_finite() && cost.tariff_per_kwh >= 0.0) {
        return Err(invalid(
            "cost.tariff_per_kwh",
            cost.tariff_per_kwh,
            "must be non-negative",
        ));
    }
    Ok(())
}

fn invalid(field: &str, value: impl std::fmt::Display, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn duplicate(name: &str, context: &str) -> ValidationError {
    ValidationError::DuplicateName {
        name: name.to_string(),
        context: context.to_string(),
    }
}

fn non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid(field, "\"\"", "must not be empty"));
    }
    Ok(())
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(invalid(field, value, "must be finite"));
    }
    Ok(())
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(field, value, "must be positive"));
    }
    Ok(())
}
