//! physics-lab-core: shared types for the Physics Lab (simulations, presets, lab worksheets),
//! the static content catalog, and gateway configuration.

pub mod catalog;
pub mod config;
mod error;
pub mod experiment;
pub mod experiments;
mod preset;
pub mod simulation;

pub use catalog::Catalog;
pub use config::GatewayConfig;
pub use error::{Error, Result};
pub use experiment::{Calculation, LabExperiment, Measurements, TableColumn, TableRow};
pub use preset::SimulationPreset;
pub use simulation::{Locale, PhysicsSimulation, SimulationFormula, SimulationParameter};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
