//! Scenario loading, saving, validation, and introspection.

use pn_project::schema::Scenario;
use std::path::Path;

use crate::error::{AppError, AppResult};

/// Summary of a scenario for listing.
#[derive(Debug, Clone)]
pub struct ScenarioSummary {
    pub name: String,
    pub fluid: String,
    pub segment_count: usize,
    pub branch_count: usize,
    pub fitting_count: usize,
    pub user_materials: usize,
    pub user_fluids: usize,
}

/// Load a scenario from a YAML or JSON file (by extension) and validate it.
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    if !path.exists() {
        return Err(AppError::ScenarioFileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
        });
    }
    let scenario = pn_project::load_scenario(path)?;
    tracing::debug!(path = %path.display(), name = %scenario.name, "scenario loaded");
    Ok(scenario)
}

/// Save a scenario, format chosen by extension.
pub fn save_scenario(path: &Path, scenario: &Scenario) -> AppResult<()> {
    pn_project::save_scenario(path, scenario)?;
    Ok(())
}

/// Validate scenario structure.
pub fn validate_scenario(scenario: &Scenario) -> AppResult<()> {
    pn_project::validate_scenario(scenario)?;
    Ok(())
}

pub fn summarize(scenario: &Scenario) -> ScenarioSummary {
    let network = &scenario.network;
    let segments = || {
        network
            .before
            .iter()
            .chain(network.branches.iter().flat_map(|b| b.segments.iter()))
            .chain(network.after.iter())
    };

    ScenarioSummary {
        name: scenario.name.clone(),
        fluid: scenario.fluid.clone(),
        segment_count: segments().count(),
        branch_count: network.branches.len(),
        fitting_count: segments()
            .flat_map(|s| s.fittings.iter())
            .map(|f| f.quantity as usize)
            .sum(),
        user_materials: scenario.library.materials.len(),
        user_fluids: scenario.library.fluids.len(),
    }
}
