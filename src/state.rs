use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};

use tuning_panda::analysis::{
    build_matrix, classify_dataset, summarize, CurveKind, GroupBy, GroupedSummary, Label,
    SummaryStat, DEFAULT_FLANK_DEG,
};
use tuning_panda::data::filter::{filter, filtered_indices, FilterCriteria};
use tuning_panda::data::loader::load_file;
use tuning_panda::data::model::{Orientations, UnitDataset};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<UnitDataset>,

    /// Orientation angles shared by every curve.
    pub orientations: Orientations,

    /// Active filter criteria (layers are driven by `selected_layers`).
    pub criteria: FilterCriteria,

    /// Layers ticked in the side panel.
    pub selected_layers: BTreeSet<String>,

    /// Indices of units passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Classification of every loaded unit.
    pub labels: BTreeMap<i64, Label>,

    /// Unit highlighted in the plot.
    pub selected_unit: Option<i64>,

    /// Which unit column is used for colouring.
    pub color_column: String,

    /// Active colour map.
    pub color_map: Option<ColorMap>,

    /// Draw laser curves next to control curves.
    pub show_laser: bool,

    /// Mean control curve of the visible units.
    pub population_curve: Vec<f64>,

    pub group_by: GroupBy,
    pub stat: SummaryStat,

    /// Summary of the visible units.
    pub summary: Option<GroupedSummary>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            orientations: Vec::new(),
            criteria: FilterCriteria::default(),
            selected_layers: BTreeSet::new(),
            visible_indices: Vec::new(),
            labels: BTreeMap::new(),
            selected_unit: None,
            color_column: "layer".to_string(),
            color_map: None,
            show_laser: true,
            population_curve: Vec::new(),
            group_by: GroupBy::Layer,
            stat: SummaryStat::Mean,
            summary: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Load a file and make it the current dataset.
    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        let (dataset, orientations) =
            load_file(path).with_context(|| format!("loading {}", path.display()))?;
        self.set_dataset(dataset, orientations)
    }

    /// Ingest a newly loaded dataset, classify its units, reset filters.
    pub fn set_dataset(&mut self, dataset: UnitDataset, orientations: Orientations) -> Result<()> {
        self.labels = classify_dataset(&dataset, DEFAULT_FLANK_DEG)
            .context("classifying units")?
            .into_iter()
            .collect();
        let n_mul = self.labels.values().filter(|l| **l == Label::Mul).count();
        log::info!(
            "Classified {} units: {n_mul} MUL, {} MXH",
            self.labels.len(),
            self.labels.len() - n_mul
        );

        self.criteria = FilterCriteria::default();
        self.selected_layers = dataset.layers.clone();
        self.selected_unit = None;
        self.color_map = Some(ColorMap::new(&self.color_column, &dataset));
        self.orientations = orientations;
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
        Ok(())
    }

    /// Recompute `visible_indices`, the population curve and the summary
    /// after a filter change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };

        self.criteria.layers = Some(self.selected_layers.iter().cloned().collect());
        // Nothing ticked hides everything rather than lifting the constraint.
        self.visible_indices = if self.selected_layers.is_empty() {
            Vec::new()
        } else {
            filtered_indices(ds, &self.criteria)
        };

        let visible = if self.selected_layers.is_empty() {
            UnitDataset {
                extra_columns: ds.extra_columns.clone(),
                ..Default::default()
            }
        } else {
            filter(ds, &self.criteria)
        };

        self.population_curve = match build_matrix(&visible, CurveKind::Control, None) {
            Ok(m) => m.column_means(),
            Err(e) => {
                log::warn!("Cannot build population curve: {e}");
                Vec::new()
            }
        };

        self.summary = match summarize(&visible, &self.group_by, self.stat) {
            Ok(summary) => {
                self.status_message = None;
                Some(summary)
            }
            Err(e) => {
                self.status_message = Some(format!("Error: {e}"));
                None
            }
        };
    }

    /// Set colour column and rebuild the map.
    pub fn set_color_column(&mut self, col: String) {
        self.color_column = col;
        if let Some(ds) = &self.dataset {
            self.color_map = Some(ColorMap::new(&self.color_column, ds));
        }
    }

    /// Toggle a layer in the layer filter.
    pub fn toggle_layer(&mut self, layer: &str) {
        if !self.selected_layers.remove(layer) {
            self.selected_layers.insert(layer.to_string());
        }
        self.refilter();
    }

    /// Select all layers.
    pub fn select_all_layers(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selected_layers = ds.layers.clone();
            self.refilter();
        }
    }

    /// Deselect all layers.
    pub fn select_no_layers(&mut self) {
        self.selected_layers.clear();
        self.refilter();
    }

    /// Columns offered for colouring and grouping.
    pub fn columns(&self) -> Vec<String> {
        let mut cols = vec!["layer".to_string(), "group".to_string()];
        if let Some(ds) = &self.dataset {
            cols.extend(ds.extra_columns.iter().cloned());
        }
        cols
    }
}
