//! Query helpers for listing library and catalogue contents.

use pn_core::units::to_mm;
use pn_fluids::{Library, Tier, filter_fitting_catalog};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    pub name: String,
    pub roughness_mm: f64,
    pub user: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidEntry {
    pub name: String,
    pub density_kg_m3: f64,
    pub kinematic_viscosity_m2_s: f64,
    pub user: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittingEntry {
    pub name: String,
    pub k: f64,
}

/// Materials visible through `library`, shadowed built-ins excluded.
pub fn list_materials(library: &Library) -> Vec<MaterialEntry> {
    library
        .materials()
        .into_iter()
        .map(|(name, material, tier)| MaterialEntry {
            name: name.to_string(),
            roughness_mm: to_mm(material.roughness),
            user: tier == Tier::User,
        })
        .collect()
}

/// Fluids visible through `library`, shadowed built-ins excluded.
pub fn list_fluids(library: &Library) -> Vec<FluidEntry> {
    library
        .fluids()
        .into_iter()
        .map(|(name, fluid, tier)| FluidEntry {
            name: name.to_string(),
            density_kg_m3: fluid.rho(),
            kinematic_viscosity_m2_s: fluid.nu(),
            user: tier == Tier::User,
        })
        .collect()
}

/// Fitting catalogue entries matching `query` (all of them if empty).
pub fn list_fittings(query: &str) -> Vec<FittingEntry> {
    filter_fitting_catalog(query)
        .into_iter()
        .map(|entry| FittingEntry {
            name: entry.name.to_string(),
            k: entry.k,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_material_shadows_builtin_in_listing() {
        let library = Library::builtin()
            .with_user_material("Concrete", 1.5)
            .unwrap();
        let concrete: Vec<_> = list_materials(&library)
            .into_iter()
            .filter(|m| m.name == "Concrete")
            .collect();
        assert_eq!(concrete.len(), 1);
        assert!(concrete[0].user);
        assert!((concrete[0].roughness_mm - 1.5).abs() < 1e-12);
    }

    #[test]
    fn builtin_tables_are_listed() {
        let library = Library::builtin();
        assert_eq!(list_materials(&library).len(), 7);
        assert_eq!(list_fluids(&library).len(), 2);
        assert_eq!(list_fittings("").len(), 14);
        assert!(list_fittings("elbow").len() >= 3);
    }
}
