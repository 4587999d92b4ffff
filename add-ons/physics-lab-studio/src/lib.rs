//! physics-lab-studio: egui front end for the Physics Lab.
//!
//! Pages are simulation cards and lab worksheets; navigation goes through a watch
//! channel into [`PageTransition`], which replays the enter fade on every change.

pub mod lab_table;
pub mod page_transition;
pub mod preset_selector;
pub mod simulation_panel;

pub use lab_table::LabWorksheet;
pub use page_transition::{navigation_channel, NavigationReceiver, NavigationSender, PageTransition, Stage};
pub use preset_selector::{preset_controls, preset_selector, PresetControl};
pub use simulation_panel::SimulationPanel;

use physics_lab_core::Catalog;

/// Content of one navigation location.
#[derive(Debug, Clone)]
pub enum Page {
    Home,
    Simulation(Box<SimulationPanel>),
    Lab(Box<LabWorksheet>),
    NotFound(String),
}

/// Rows a fresh worksheet starts with.
pub const DEFAULT_LAB_ROWS: u32 = 5;

impl Page {
    /// Builds the page for `location`: `/`, `/simulations/<id>` or `/labs/<id>`.
    pub fn for_location(catalog: &Catalog, location: &str) -> Page {
        let path = location.trim_end_matches('/');
        if path.is_empty() {
            return Page::Home;
        }
        if let Some(id) = path.strip_prefix("/simulations/") {
            if let Some(sim) = catalog.simulation(id) {
                let presets = catalog.presets_for(id).map(<[_]>::to_vec);
                return Page::Simulation(Box::new(SimulationPanel::new(sim.clone(), presets)));
            }
        }
        if let Some(id) = path.strip_prefix("/labs/") {
            if let Some(exp) = catalog.experiment(id) {
                return Page::Lab(Box::new(LabWorksheet::new(exp.clone(), DEFAULT_LAB_ROWS)));
            }
        }
        Page::NotFound(location.to_string())
    }
}
