//! Preset selector: one button per preset, hover shows the description.
//!
//! Stateless; everything comes from the arguments. The only side effect is the
//! caller's `on_select`.

use egui::{RichText, Ui};
use physics_lab_core::SimulationPreset;

/// What one button shows, borrowed from the preset it activates.
#[derive(Debug, Clone, Copy)]
pub struct PresetControl<'a> {
    pub label: &'a str,
    pub hover_text: &'a str,
    pub preset: &'a SimulationPreset,
}

impl<'a> PresetControl<'a> {
    /// Hands the exact preset record to the callback, once, synchronously.
    pub fn activate(&self, on_select: &mut impl FnMut(&'a SimulationPreset)) {
        on_select(self.preset);
    }
}

/// Controls in preset order; empty for `None` or an empty slice.
pub fn preset_controls(presets: Option<&[SimulationPreset]>) -> Vec<PresetControl<'_>> {
    presets
        .unwrap_or_default()
        .iter()
        .map(|preset| PresetControl {
            label: &preset.name_uz,
            hover_text: &preset.description,
            preset,
        })
        .collect()
}

/// Renders the selector. Draws nothing at all when there are no presets.
pub fn preset_selector<'a>(
    ui: &mut Ui,
    presets: Option<&'a [SimulationPreset]>,
    mut on_select: impl FnMut(&'a SimulationPreset),
) {
    let controls = preset_controls(presets);
    if controls.is_empty() {
        return;
    }
    ui.horizontal_wrapped(|ui| {
        ui.label(RichText::new("Tayyor sozlamalar:").strong());
        for control in &controls {
            if ui
                .button(control.label)
                .on_hover_text(control.hover_text)
                .clicked()
            {
                control.activate(&mut on_select);
            }
        }
    });
}
