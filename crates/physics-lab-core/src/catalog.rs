//! Static content loaded at startup: simulation cards, their presets and the lab worksheets.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::experiment::LabExperiment;
use crate::experiments;
use crate::preset::SimulationPreset;
use crate::simulation::PhysicsSimulation;

const EMBEDDED_SIMULATIONS: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config/simulations.toml"));

#[derive(Deserialize)]
struct CatalogFile {
    simulations: Vec<PhysicsSimulation>,
    #[serde(default)]
    presets: Vec<PresetEntry>,
}

#[derive(Deserialize)]
struct PresetEntry {
    simulation: String,
    id: String,
    name_uz: String,
    description: String,
    #[serde(default)]
    values: BTreeMap<String, f64>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    pub simulations: Vec<PhysicsSimulation>,
    presets: BTreeMap<String, Vec<SimulationPreset>>,
    pub experiments: Vec<LabExperiment>,
}

impl Catalog {
    /// The catalog shipped with the crate plus the built-in lab worksheets.
    pub fn load_embedded() -> Result<Self> {
        Self::from_toml_str(EMBEDDED_SIMULATIONS)
    }

    /// Parses and validates a simulations TOML document. Lab worksheets are always the built-ins.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(source)?;

        let mut ids = HashSet::new();
        for sim in &file.simulations {
            if !ids.insert(sim.id.as_str()) {
                return Err(Error::DuplicateId {
                    kind: "simulation",
                    id: sim.id.clone(),
                });
            }
            sim.validate()?;
        }

        let mut presets: BTreeMap<String, Vec<SimulationPreset>> = BTreeMap::new();
        for entry in file.presets {
            let sim = file
                .simulations
                .iter()
                .find(|s| s.id == entry.simulation)
                .ok_or_else(|| Error::UnknownSimulation(entry.simulation.clone()))?;
            if let Some(parameter) = entry.values.keys().find(|k| sim.parameter(k).is_none()) {
                return Err(Error::UnknownPresetParameter {
                    preset: entry.id.clone(),
                    parameter: parameter.clone(),
                });
            }
            let list = presets.entry(entry.simulation).or_default();
            if list.iter().any(|p| p.id == entry.id) {
                return Err(Error::DuplicateId {
                    kind: "preset",
                    id: entry.id,
                });
            }
            list.push(SimulationPreset {
                id: entry.id,
                name_uz: entry.name_uz,
                description: entry.description,
                values: entry.values,
            });
        }

        let experiments = experiments::builtin();
        for exp in &experiments {
            exp.validate()?;
        }

        tracing::debug!(
            simulations = file.simulations.len(),
            presets = presets.values().map(Vec::len).sum::<usize>(),
            experiments = experiments.len(),
            "catalog loaded"
        );

        Ok(Self {
            simulations: file.simulations,
            presets,
            experiments,
        })
    }

    pub fn simulation(&self, id: &str) -> Option<&PhysicsSimulation> {
        self.simulations.iter().find(|s| s.id == id)
    }

    /// Presets authored for a simulation; `None` when it has none.
    pub fn presets_for(&self, simulation_id: &str) -> Option<&[SimulationPreset]> {
        self.presets.get(simulation_id).map(Vec::as_slice)
    }

    pub fn experiment(&self, id: &str) -> Option<&LabExperiment> {
        self.experiments.iter().find(|e| e.id == id)
    }
}
