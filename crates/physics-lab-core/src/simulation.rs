//! Simulation descriptions: tunable parameters, formulas, and the simulation card itself.
//!
//! Everything here is authored once (see [`crate::catalog`]) and only `SimulationParameter::value`
//! changes afterwards, driven by slider input or an applied preset.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::preset::SimulationPreset;

/// One tunable input of a simulation (e.g. launch angle in degrees).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameter {
    pub id: String,
    pub name: String,
    pub name_uz: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
    pub unit: String,
}

impl SimulationParameter {
    /// Checks `step > 0` and `min <= value <= max`.
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| {
            Err(Error::InvalidParameter {
                id: self.id.clone(),
                reason,
            })
        };
        if !(self.min.is_finite() && self.max.is_finite() && self.step.is_finite() && self.value.is_finite()) {
            return fail("range, step and value must be finite".to_string());
        }
        if self.step <= 0.0 {
            return fail(format!("step must be positive, got {}", self.step));
        }
        if self.min > self.max {
            return fail(format!("min {} exceeds max {}", self.min, self.max));
        }
        if self.value < self.min || self.value > self.max {
            return fail(format!(
                "value {} outside [{}, {}]",
                self.value, self.min, self.max
            ));
        }
        Ok(())
    }

    /// Sets the value, snapped to the step grid anchored at `min` and clamped into range.
    /// Returns the value actually stored.
    pub fn set_value(&mut self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.value;
        }
        let steps = ((value - self.min) / self.step).round();
        let snapped = self.min + steps * self.step;
        self.value = snapped.clamp(self.min, self.max);
        self.value
    }

    /// Display name for the given locale.
    pub fn display_name(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.name,
            Locale::Uz => &self.name_uz,
        }
    }
}

/// The two locales every locale-paired field carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Uz,
}

/// A formula shown next to the simulation, e.g. `R = v0^2 sin(2a) / g`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationFormula {
    pub formula: String,
    pub description: String,
    pub description_uz: String,
}

/// A simulation card: titles, ordered parameters, icon and optional theory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsSimulation {
    pub id: String,
    pub title: String,
    pub title_uz: String,
    pub description: String,
    pub description_uz: String,
    pub parameters: Vec<SimulationParameter>,
    pub icon: String,
    #[serde(default)]
    pub theory: Option<String>,
    #[serde(default)]
    pub formulas: Vec<SimulationFormula>,
}

impl PhysicsSimulation {
    pub fn parameter(&self, id: &str) -> Option<&SimulationParameter> {
        self.parameters.iter().find(|p| p.id == id)
    }

    pub fn parameter_mut(&mut self, id: &str) -> Option<&mut SimulationParameter> {
        self.parameters.iter_mut().find(|p| p.id == id)
    }

    /// Every parameter valid and parameter ids unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for p in &self.parameters {
            if !seen.insert(p.id.as_str()) {
                return Err(Error::DuplicateId {
                    kind: "parameter",
                    id: format!("{}.{}", self.id, p.id),
                });
            }
            p.validate()?;
        }
        Ok(())
    }

    /// Applies every value of the preset through [`SimulationParameter::set_value`].
    /// Returns the preset keys that name no parameter of this simulation; the
    /// remaining values are still applied.
    pub fn apply_preset(&mut self, preset: &SimulationPreset) -> Vec<String> {
        let mut unknown = Vec::new();
        for (id, value) in &preset.values {
            match self.parameter_mut(id) {
                Some(p) => {
                    p.set_value(*value);
                }
                None => unknown.push(id.clone()),
            }
        }
        if !unknown.is_empty() {
            tracing::warn!(
                simulation = %self.id,
                preset = %preset.id,
                ?unknown,
                "preset names parameters this simulation does not have"
            );
        }
        unknown
    }

    /// Current parameter values keyed by parameter id.
    pub fn values(&self) -> std::collections::BTreeMap<String, f64> {
        self.parameters
            .iter()
            .map(|p| (p.id.clone(), p.value))
            .collect()
    }
}
