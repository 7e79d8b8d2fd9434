use std::path::PathBuf;

use big4_dashboard::data::filter::{filtered_indices, FilterSelection};
use big4_dashboard::data::model::{AuditDataset, AuditRecord, Dimension, FieldValue};
use big4_dashboard::data::view::{DashboardView, ViewConfig};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file has been loaded).
    pub dataset: Option<AuditDataset>,

    /// Where the current dataset was read from.
    pub source: Option<PathBuf>,

    /// Per-dimension filter selections.
    pub selection: FilterSelection,

    /// Query knobs fixed at startup.
    pub config: ViewConfig,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Metrics and chart tables for the current selection (cached).
    pub view: DashboardView,

    /// Stable colours per firm and per AI flag.
    pub firm_colors: ColorMap,
    pub ai_colors: ColorMap,

    /// Show the filtered records table instead of the charts.
    pub show_table: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            dataset: None,
            source: None,
            selection: FilterSelection::default(),
            config,
            visible_indices: Vec::new(),
            view: DashboardView::empty(),
            firm_colors: ColorMap::default(),
            ai_colors: ColorMap::default(),
            show_table: false,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset, reset filters to "everything" and
    /// recompute the view.
    pub fn set_dataset(&mut self, dataset: AuditDataset, source: PathBuf) {
        self.selection = FilterSelection::all(&dataset);
        self.firm_colors = ColorMap::new(dataset.options(Dimension::FirmName));
        self.ai_colors = ColorMap::new(dataset.options(Dimension::AiUsedForAuditing));

        self.dataset = Some(dataset);
        self.source = Some(source);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible_indices` and `view` after a filter change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.visible_indices = filtered_indices(&ds.records, &self.selection);
        let rows: Vec<&AuditRecord> = self
            .visible_indices
            .iter()
            .map(|&i| &ds.records[i])
            .collect();
        self.view = DashboardView::compute(&rows, &self.config);
        log::debug!(
            "Recomputed dashboard: {} of {} records visible",
            rows.len(),
            ds.len()
        );
    }

    /// Records passing the current filters, in file order.
    pub fn visible_records(&self) -> impl Iterator<Item = &AuditRecord> {
        let records = self.dataset.as_ref().map(|ds| ds.records.as_slice()).unwrap_or(&[]);
        self.visible_indices.iter().filter_map(move |&i| records.get(i))
    }

    /// Toggle a single value in a dimension's filter.
    pub fn toggle_filter_value(&mut self, dim: Dimension, value: &FieldValue) {
        self.selection.toggle(dim, value);
        self.refilter();
    }

    /// Select all values in a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        if let Some(ds) = &self.dataset {
            self.selection.select_all(dim, ds.options(dim));
            self.refilter();
        }
    }

    /// Deselect all values in a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        self.selection.clear(dim);
        self.refilter();
    }
}
