// src/report.rs
use serde::Serialize;

use crate::aggregate::{category_charts, metrics, time_series, CategoryChart, Metrics, TimeSeriesPoint};
use crate::config::DashboardConfig;
use crate::filter::{FilterSpec, UniqueValueIndex};
use crate::selection::PanelView;
use crate::state::{ActiveFilter, DashboardState};

/// Read-only snapshot of everything the presentation layer draws.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub loaded_tickets: usize,
    pub filtered_tickets: usize,
    pub filters: Option<FilterSpec>,
    pub active_filters: Vec<ActiveFilter>,
    pub metrics: Metrics,
    pub time_series: Vec<TimeSeriesPoint>,
    pub categories: Vec<CategoryChart>,
    pub unique_values: UniqueValueIndex,
    pub selection: Option<PanelView>,
}

impl DashboardReport {
    pub fn build(state: &DashboardState, config: &DashboardConfig) -> Self {
        let filtered = state.filtered().unwrap_or_default();
        Self {
            loaded_tickets: state.processed().map_or(0, <[_]>::len),
            filtered_tickets: filtered.len(),
            filters: state.applied_filters().cloned(),
            active_filters: state.active_filters(),
            metrics: metrics(filtered),
            time_series: time_series(filtered),
            categories: category_charts(filtered, &config.chart_categories),
            unique_values: state.unique_values().clone(),
            selection: state.selection().map(|s| PanelView::new(Some(s))),
        }
    }
}
