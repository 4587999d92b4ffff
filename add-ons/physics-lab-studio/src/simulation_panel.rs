//! Simulation card: presets, parameter sliders, formulas and theory.

use egui::{Color32, RichText, Ui};
use physics_lab_core::{Locale, PhysicsSimulation, SimulationPreset};

use crate::preset_selector::preset_selector;

pub const ACCENT: Color32 = Color32::from_rgb(100, 180, 255);

#[derive(Debug, Clone)]
pub struct SimulationPanel {
    pub simulation: PhysicsSimulation,
    pub presets: Option<Vec<SimulationPreset>>,
    pub locale: Locale,
    /// Id of the last preset applied, shown next to the heading.
    pub active_preset: Option<String>,
}

impl SimulationPanel {
    pub fn new(simulation: PhysicsSimulation, presets: Option<Vec<SimulationPreset>>) -> Self {
        Self {
            simulation,
            presets,
            locale: Locale::Uz,
            active_preset: None,
        }
    }

    pub fn title(&self) -> &str {
        match self.locale {
            Locale::En => &self.simulation.title,
            Locale::Uz => &self.simulation.title_uz,
        }
    }

    /// Applies a preset and remembers it as the active one.
    pub fn select_preset(&mut self, preset: &SimulationPreset) {
        self.simulation.apply_preset(preset);
        self.active_preset = Some(preset.id.clone());
    }

    pub fn ui(&mut self, ui: &mut Ui) {
        ui.heading(RichText::new(self.title().to_string()).color(ACCENT));
        let description = match self.locale {
            Locale::En => &self.simulation.description,
            Locale::Uz => &self.simulation.description_uz,
        };
        ui.label(description.as_str());
        ui.separator();

        let mut chosen: Option<SimulationPreset> = None;
        preset_selector(ui, self.presets.as_deref(), |p| chosen = Some(p.clone()));
        if let Some(preset) = chosen {
            self.select_preset(&preset);
        }

        ui.group(|ui| {
            for p in &mut self.simulation.parameters {
                let label = format!("{} ({})", p.display_name(self.locale), p.unit);
                let mut value = p.value;
                if ui
                    .add(egui::Slider::new(&mut value, p.min..=p.max).step_by(p.step).text(label))
                    .changed()
                {
                    p.set_value(value);
                    self.active_preset = None;
                }
            }
        });

        if !self.simulation.formulas.is_empty() {
            ui.collapsing("Formulalar", |ui| {
                for f in &self.simulation.formulas {
                    let description = match self.locale {
                        Locale::En => &f.description,
                        Locale::Uz => &f.description_uz,
                    };
                    ui.horizontal(|ui| {
                        ui.monospace(f.formula.as_str());
                        ui.label(description.as_str());
                    });
                }
            });
        }

        if let Some(theory) = &self.simulation.theory {
            ui.collapsing("Nazariya", |ui| {
                ui.label(theory.as_str());
            });
        }
    }
}
