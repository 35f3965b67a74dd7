//! Built-in tables: pipe materials, fluids and fitting loss coefficients.

use crate::model::{FluidProperties, PipeMaterial};

/// Absolute roughness of common pipe materials [mm].
const BUILTIN_MATERIALS: [(&str, f64); 7] = [
    ("Carbon Steel (new)", 0.046),
    ("Carbon Steel (lightly used)", 0.1),
    ("Carbon Steel (rusted)", 0.2),
    ("Stainless Steel", 0.002),
    ("Cast Iron", 0.26),
    ("PVC / Plastic", 0.0015),
    ("Concrete", 0.5),
];

/// Density [kg/m³] and kinematic viscosity [m²/s].
const BUILTIN_FLUIDS: [(&str, f64, f64); 2] = [
    ("Water at 20°C", 998.2, 1.004e-6),
    ("Ethanol at 20°C", 789.0, 1.51e-6),
];

pub fn builtin_materials() -> impl Iterator<Item = (&'static str, PipeMaterial)> {
    BUILTIN_MATERIALS
        .iter()
        .map(|&(name, eps)| (name, PipeMaterial::from_mm(eps)))
}

pub fn builtin_fluids() -> impl Iterator<Item = (&'static str, FluidProperties)> {
    BUILTIN_FLUIDS
        .iter()
        .map(|&(name, rho, nu)| (name, FluidProperties::new(rho, nu)))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittingCatalogEntry {
    pub name: &'static str,
    /// Loss coefficient K
    pub k: f64,
    pub aliases: &'static [&'static str],
}

impl FittingCatalogEntry {
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return true;
        }

        self.name.to_ascii_lowercase().contains(&query)
            || self
                .aliases
                .iter()
                .any(|alias| alias.to_ascii_lowercase().contains(&query))
    }
}

const FITTING_CATALOG: [FittingCatalogEntry; 14] = [
    FittingCatalogEntry {
        name: "Sharp-Edged Entrance",
        k: 0.5,
        aliases: &["inlet", "entrance"],
    },
    FittingCatalogEntry {
        name: "Slightly Rounded Entrance",
        k: 0.2,
        aliases: &["inlet", "entrance"],
    },
    FittingCatalogEntry {
        name: "Well Rounded Entrance",
        k: 0.04,
        aliases: &["inlet", "bellmouth"],
    },
    FittingCatalogEntry {
        name: "Pipe Exit",
        k: 1.0,
        aliases: &["outlet", "discharge"],
    },
    FittingCatalogEntry {
        name: "Gate Valve (Fully Open)",
        k: 0.2,
        aliases: &["valve"],
    },
    FittingCatalogEntry {
        name: "Gate Valve (1/2 Open)",
        k: 5.6,
        aliases: &["valve", "throttled"],
    },
    FittingCatalogEntry {
        name: "Globe Valve (Fully Open)",
        k: 10.0,
        aliases: &["valve"],
    },
    FittingCatalogEntry {
        name: "Swing Check Valve",
        k: 2.5,
        aliases: &["valve", "non-return"],
    },
    FittingCatalogEntry {
        name: "90° Elbow (Long Radius)",
        k: 0.6,
        aliases: &["bend", "elbow 90"],
    },
    FittingCatalogEntry {
        name: "90° Elbow (Short Radius)",
        k: 0.9,
        aliases: &["bend", "elbow 90"],
    },
    FittingCatalogEntry {
        name: "45° Elbow",
        k: 0.4,
        aliases: &["bend", "elbow 45"],
    },
    FittingCatalogEntry {
        name: "180° Return Bend",
        k: 2.2,
        aliases: &["bend", "u-bend"],
    },
    FittingCatalogEntry {
        name: "Tee (Through Flow)",
        k: 0.6,
        aliases: &["tee", "run"],
    },
    FittingCatalogEntry {
        name: "Tee (Branch Flow)",
        k: 1.8,
        aliases: &["tee", "side"],
    },
];

pub fn fitting_catalog() -> &'static [FittingCatalogEntry] {
    &FITTING_CATALOG
}

pub fn filter_fitting_catalog(query: &str) -> Vec<FittingCatalogEntry> {
    fitting_catalog()
        .iter()
        .copied()
        .filter(|entry| entry.matches_query(query))
        .collect()
}

/// Exact-name lookup of a catalogue K factor.
pub fn fitting_k(name: &str) -> Option<f64> {
    fitting_catalog()
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| entry.k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn fitting_names_are_unique() {
        let mut seen = HashSet::new();
        for entry in fitting_catalog() {
            assert!(seen.insert(entry.name), "duplicate fitting: {}", entry.name);
        }
    }

    #[test]
    fn fitting_k_values_are_non_negative() {
        assert!(fitting_catalog().iter().all(|e| e.k >= 0.0));
    }

    #[test]
    fn globe_valve_k() {
        assert_eq!(fitting_k("Globe Valve (Fully Open)"), Some(10.0));
        assert_eq!(fitting_k("Butterfly"), None);
    }

    #[test]
    fn search_finds_valves() {
        let results = filter_fitting_catalog("valve");
        assert_eq!(results.len(), 4);
    }

    #[test]
    fn builtin_tables_are_populated() {
        assert_eq!(builtin_materials().count(), 7);
        let water = builtin_fluids()
            .find(|(name, _)| *name == "Water at 20°C")
            .map(|(_, f)| f)
            .unwrap();
        assert_eq!(water.rho(), 998.2);
    }
}
