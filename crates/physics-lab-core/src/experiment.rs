//! Lab-experiment worksheets: equipment, procedure, measurement table and the
//! derived-quantity calculation that fills computed columns.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Named numeric record: column id -> value.
pub type Measurements = BTreeMap<String, f64>;

/// Pure mapping from entered measurements to derived ones.
pub type Calculation = fn(&Measurements) -> Measurements;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub id: String,
    pub name: String,
    pub name_uz: String,
    pub unit: String,
    /// `true` when the student types the value; `false` when it is computed.
    pub is_input: bool,
}

/// One row of the measurement table. `None` means "not yet entered".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub id: String,
    pub values: BTreeMap<String, Option<f64>>,
}

impl TableRow {
    /// A row with every column present and empty.
    pub fn blank(id: impl Into<String>, columns: &[TableColumn]) -> Self {
        Self {
            id: id.into(),
            values: columns.iter().map(|c| (c.id.clone(), None)).collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied().flatten()
    }

    pub fn set(&mut self, column: &str, value: Option<f64>) {
        self.values.insert(column.to_string(), value);
    }
}

#[derive(Clone)]
pub struct LabExperiment {
    pub id: String,
    pub title: String,
    pub title_uz: String,
    pub purpose: String,
    pub purpose_uz: String,
    pub theory: String,
    pub theory_uz: String,
    pub equipment: Vec<String>,
    pub equipment_uz: Vec<String>,
    pub procedure: Vec<String>,
    pub procedure_uz: Vec<String>,
    pub columns: Vec<TableColumn>,
    pub calculate: Calculation,
}

impl fmt::Debug for LabExperiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabExperiment")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("columns", &self.columns.len())
            .finish_non_exhaustive()
    }
}

impl LabExperiment {
    /// Locale-paired lists must be index-aligned and column ids unique.
    pub fn validate(&self) -> Result<()> {
        let pairs = [
            ("equipment", &self.equipment, &self.equipment_uz),
            ("procedure", &self.procedure, &self.procedure_uz),
        ];
        for (field, left, right) in pairs {
            if left.len() != right.len() {
                return Err(Error::MisalignedLocales {
                    owner: self.id.clone(),
                    field,
                    left: left.len(),
                    right: right.len(),
                });
            }
        }
        let mut seen = HashSet::new();
        for c in &self.columns {
            if !seen.insert(c.id.as_str()) {
                return Err(Error::DuplicateId {
                    kind: "column",
                    id: format!("{}.{}", self.id, c.id),
                });
            }
        }
        Ok(())
    }

    pub fn input_columns(&self) -> impl Iterator<Item = &TableColumn> {
        self.columns.iter().filter(|c| c.is_input)
    }

    pub fn computed_columns(&self) -> impl Iterator<Item = &TableColumn> {
        self.columns.iter().filter(|c| !c.is_input)
    }

    pub fn new_row(&self, id: impl Into<String>) -> TableRow {
        TableRow::blank(id, &self.columns)
    }

    /// Fills the computed columns of `row`.
    ///
    /// Runs only when every input column holds a value; otherwise computed cells are
    /// cleared. Outputs that are not finite (e.g. division by a zero reading) or that
    /// name an input column are dropped. Returns whether the calculation ran.
    pub fn compute_row(&self, row: &mut TableRow) -> bool {
        let mut inputs = Measurements::new();
        for c in self.input_columns() {
            match row.get(&c.id) {
                Some(v) => {
                    inputs.insert(c.id.clone(), v);
                }
                None => {
                    for computed in self.computed_columns() {
                        row.set(&computed.id, None);
                    }
                    return false;
                }
            }
        }

        let outputs = (self.calculate)(&inputs);
        for c in self.computed_columns() {
            let value = outputs.get(&c.id).copied().filter(|v| v.is_finite());
            row.set(&c.id, value);
        }
        true
    }

    /// Per-column mean over the entered values of `rows`. Columns with no entries are omitted.
    pub fn averages(&self, rows: &[TableRow]) -> Measurements {
        let mut out = Measurements::new();
        for c in &self.columns {
            let entered: Vec<f64> = rows.iter().filter_map(|r| r.get(&c.id)).collect();
            if !entered.is_empty() {
                out.insert(c.id.clone(), entered.iter().sum::<f64>() / entered.len() as f64);
            }
        }
        out
    }
}
