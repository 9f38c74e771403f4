use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::model::{Unit, UnitDataset};
use crate::error::{Result, TuningError};

/// Which of a unit's two curves to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    #[default]
    Control,
    Laser,
}

impl CurveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurveKind::Control => "control",
            CurveKind::Laser => "laser",
        }
    }

    /// Borrow this kind of curve from a unit.
    pub fn curve<'a>(&self, unit: &'a Unit) -> &'a [f64] {
        match self {
            CurveKind::Control => &unit.control,
            CurveKind::Laser => &unit.laser,
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurveKind {
    type Err = TuningError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "control" => Ok(CurveKind::Control),
            "laser" => Ok(CurveKind::Laser),
            other => Err(TuningError::InvalidOption {
                option: "kind",
                value: other.to_string(),
                expected: "'control' | 'laser'",
            }),
        }
    }
}

/// Dense row-major matrix: one row per unit, one column per orientation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix {
    data: Vec<f64>,
    n_rows: usize,
    n_cols: usize,
}

impl Matrix {
    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Row `i`.  Panics if `i` is out of bounds.
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.n_rows, "row {i} out of bounds ({} rows)", self.n_rows);
        &self.data[i * self.n_cols..(i + 1) * self.n_cols]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.n_rows).map(move |i| self.row(i))
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.n_rows && col < self.n_cols).then(|| self.data[row * self.n_cols + col])
    }

    /// All values, row after row.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mean of every column across rows: the population tuning curve.
    /// Empty for a matrix without rows.
    pub fn column_means(&self) -> Vec<f64> {
        if self.n_rows == 0 {
            return Vec::new();
        }
        let mut sums = vec![0.0; self.n_cols];
        for row in self.rows() {
            for (acc, v) in sums.iter_mut().zip(row) {
                *acc += v;
            }
        }
        sums.iter().map(|s| s / self.n_rows as f64).collect()
    }
}

/// Stack the `kind` curves of the dataset's units into a matrix.
///
/// With `unit_ids`, only units whose id is in the set are kept, still in
/// dataset order.  Every selected curve must have the same length as the
/// first one.
pub fn build_matrix(
    dataset: &UnitDataset,
    kind: CurveKind,
    unit_ids: Option<&BTreeSet<i64>>,
) -> Result<Matrix> {
    let selected: Vec<&[f64]> = dataset
        .units
        .iter()
        .filter(|u| unit_ids.map_or(true, |ids| ids.contains(&u.id)))
        .map(|u| kind.curve(u))
        .collect();

    let n_cols = selected.first().map_or(0, |c| c.len());
    let mut data = Vec::with_capacity(selected.len() * n_cols);
    for curve in &selected {
        if curve.len() != n_cols {
            return Err(TuningError::InconsistentLength {
                expected: n_cols,
                found: curve.len(),
            });
        }
        data.extend_from_slice(curve);
    }

    log::debug!("Built {} matrix {}x{n_cols}", kind, selected.len());
    Ok(Matrix {
        data,
        n_rows: selected.len(),
        n_cols,
    })
}
