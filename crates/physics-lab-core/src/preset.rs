use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named one-click set of parameter values for a simulation.
///
/// The selector treats this as opaque; only [`crate::PhysicsSimulation::apply_preset`]
/// looks inside `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationPreset {
    pub id: String,
    pub name_uz: String,
    pub description: String,
    /// Parameter id -> value.
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
}
