use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::model::{Unit, UnitDataset};
use crate::analysis::classify::Label;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Filter criteria: optional predicates combined by AND
// ---------------------------------------------------------------------------

/// Row selection criteria.  Every field is optional; an absent (or empty)
/// field imposes no constraint.  Ranges are inclusive `(lo, hi)` pairs and
/// serialize as `[lo, hi]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Keep units whose layer is one of these.
    pub layers: Option<Vec<String>>,
    /// Keep units in this group.  Ignored unless it is "MUL" or "MXH".
    pub group: Option<String>,
    /// Keep exactly these unit ids.
    pub ids: Option<BTreeSet<i64>>,
    /// Inclusive range on `osi_control`.
    pub osi: Option<(f64, f64)>,
    /// Inclusive range on `hbw_control`; units without a half-bandwidth fail it.
    pub hbw: Option<(f64, f64)>,
}

impl FilterCriteria {
    /// OSI in [0, 1] and half-bandwidth in [0, 180], nothing else.
    pub fn with_default_ranges() -> Self {
        FilterCriteria {
            osi: Some((0.0, 1.0)),
            hbw: Some((0.0, 180.0)),
            ..Default::default()
        }
    }

    /// Read criteria saved as JSON.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| {
            crate::error::TuningError::malformed(format!("parsing filter criteria: {e}"))
        })
    }

    /// Whether no field constrains anything.
    pub fn is_empty(&self) -> bool {
        self.active_layers().is_none()
            && self.active_group().is_none()
            && self.active_ids().is_none()
            && self.osi.is_none()
            && self.hbw.is_none()
    }

    fn active_layers(&self) -> Option<&[String]> {
        self.layers.as_deref().filter(|l| !l.is_empty())
    }

    fn active_group(&self) -> Option<&str> {
        self.group
            .as_deref()
            .filter(|g| g.parse::<Label>().is_ok())
    }

    fn active_ids(&self) -> Option<&BTreeSet<i64>> {
        self.ids.as_ref().filter(|ids| !ids.is_empty())
    }

    /// Whether a single unit passes every active predicate.
    ///
    /// Checked in order: layer, group, id, OSI range, HBW range.
    pub fn matches(&self, unit: &Unit) -> bool {
        if let Some(layers) = self.active_layers() {
            if !layers.iter().any(|l| *l == unit.layer) {
                return false;
            }
        }
        if let Some(group) = self.active_group() {
            if unit.group.as_deref() != Some(group) {
                return false;
            }
        }
        if let Some(ids) = self.active_ids() {
            if !ids.contains(&unit.id) {
                return false;
            }
        }
        if let Some(range) = self.osi {
            if !in_range(unit.osi_control, range) {
                return false;
            }
        }
        if let Some(range) = self.hbw {
            // Null half-bandwidth never satisfies a range.
            match unit.hbw_control {
                Some(hbw) if in_range(hbw, range) => {}
                _ => return false,
            }
        }
        true
    }
}

fn in_range(value: f64, (lo, hi): (f64, f64)) -> bool {
    lo <= value && value <= hi
}

// ---------------------------------------------------------------------------
// Applying criteria
// ---------------------------------------------------------------------------

/// Return indices of units that pass all active criteria, in dataset order.
pub fn filtered_indices(dataset: &UnitDataset, criteria: &FilterCriteria) -> Vec<usize> {
    if let Some(group) = &criteria.group {
        if group.parse::<Label>().is_err() {
            log::warn!("Ignoring unrecognized group filter '{group}'");
        }
    }

    dataset
        .units
        .iter()
        .enumerate()
        .filter(|(_, unit)| criteria.matches(unit))
        .map(|(i, _)| i)
        .collect()
}

/// Build a new dataset holding only the units that pass `criteria`.
/// Row order and every column are preserved; the input is untouched.
pub fn filter(dataset: &UnitDataset, criteria: &FilterCriteria) -> UnitDataset {
    let units: Vec<Unit> = filtered_indices(dataset, criteria)
        .into_iter()
        .map(|i| dataset.units[i].clone())
        .collect();
    log::debug!("Filter kept {} of {} units", units.len(), dataset.len());
    let mut kept = UnitDataset::from_units(units);
    kept.extra_columns = dataset.extra_columns.clone();
    kept
}
