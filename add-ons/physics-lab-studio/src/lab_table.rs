//! Lab worksheet: procedure, equipment and the editable measurement table.

use std::collections::BTreeMap;

use egui::{RichText, Ui};
use physics_lab_core::{LabExperiment, Measurements, TableRow};

use crate::simulation_panel::ACCENT;

/// Parses a typed cell. Accepts a decimal comma; blank means "not entered".
pub fn parse_cell(text: &str) -> Option<f64> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }
    t.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.3}", v),
        None => "—".to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct LabWorksheet {
    pub experiment: LabExperiment,
    pub rows: Vec<TableRow>,
    /// Text typed into input cells, keyed by (row id, column id).
    drafts: BTreeMap<(String, String), String>,
    next_row: u32,
}

impl LabWorksheet {
    /// Starts with `initial_rows` blank rows.
    pub fn new(experiment: LabExperiment, initial_rows: u32) -> Self {
        let mut sheet = Self {
            experiment,
            rows: Vec::new(),
            drafts: BTreeMap::new(),
            next_row: 1,
        };
        for _ in 0..initial_rows {
            sheet.add_row();
        }
        sheet
    }

    pub fn add_row(&mut self) -> &TableRow {
        let id = format!("row-{}", self.next_row);
        self.next_row += 1;
        self.rows.push(self.experiment.new_row(id));
        &self.rows[self.rows.len() - 1]
    }

    pub fn remove_row(&mut self, row_id: &str) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.id != row_id);
        self.drafts.retain(|(r, _), _| r != row_id);
        self.rows.len() != before
    }

    /// Sets an input cell and recomputes the row. Computed columns cannot be set.
    pub fn set_cell(&mut self, row_id: &str, column_id: &str, value: Option<f64>) -> bool {
        let is_input = self
            .experiment
            .columns
            .iter()
            .any(|c| c.id == column_id && c.is_input);
        if !is_input {
            return false;
        }
        let Some(row) = self.rows.iter_mut().find(|r| r.id == row_id) else {
            return false;
        };
        row.set(column_id, value);
        self.experiment.compute_row(row);
        true
    }

    pub fn averages(&self) -> Measurements {
        self.experiment.averages(&self.rows)
    }

    pub fn ui(&mut self, ui: &mut Ui) {
        let exp = &self.experiment;
        ui.heading(RichText::new(exp.title_uz.as_str()).color(ACCENT));
        ui.label(RichText::new(exp.purpose_uz.as_str()).italics());

        ui.collapsing("Nazariya", |ui| {
            ui.label(exp.theory_uz.as_str());
        });
        ui.collapsing("Jihozlar", |ui| {
            for item in &exp.equipment_uz {
                ui.label(format!("• {item}"));
            }
        });
        ui.collapsing("Ish tartibi", |ui| {
            for (i, step) in exp.procedure_uz.iter().enumerate() {
                ui.label(format!("{}. {}", i + 1, step));
            }
        });
        ui.separator();

        let mut edits: Vec<(String, String, Option<f64>)> = Vec::new();
        let mut removed: Option<String> = None;
        let averages = self.averages();

        egui::Grid::new(("lab-table", exp.id.as_str()))
            .striped(true)
            .show(ui, |ui| {
                ui.label("№");
                for c in &exp.columns {
                    let header = if c.unit.is_empty() {
                        c.name_uz.clone()
                    } else {
                        format!("{}, {}", c.name_uz, c.unit)
                    };
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();

                for (n, row) in self.rows.iter().enumerate() {
                    ui.label((n + 1).to_string());
                    for c in &exp.columns {
                        if c.is_input {
                            let key = (row.id.clone(), c.id.clone());
                            let draft = self.drafts.entry(key).or_insert_with(|| {
                                row.get(&c.id).map(|v| v.to_string()).unwrap_or_default()
                            });
                            if ui
                                .add(egui::TextEdit::singleline(draft).desired_width(70.0))
                                .changed()
                            {
                                edits.push((row.id.clone(), c.id.clone(), parse_cell(draft)));
                            }
                        } else {
                            ui.label(format_value(row.get(&c.id)));
                        }
                    }
                    if ui.small_button("✖").clicked() {
                        removed = Some(row.id.clone());
                    }
                    ui.end_row();
                }

                ui.label(RichText::new("O'rtacha").strong());
                for c in &exp.columns {
                    ui.label(format_value(averages.get(&c.id).copied()));
                }
                ui.end_row();
            });

        if ui.button("Qator qo'shish").clicked() {
            self.add_row();
        }
        for (row, column, value) in edits {
            self.set_cell(&row, &column, value);
        }
        if let Some(row) = removed {
            self.remove_row(&row);
        }
    }
}
