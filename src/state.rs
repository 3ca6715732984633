//! Dashboard session state and the commands the presentation layer issues.
//!
//! Every command replaces whole values; nothing is mutated in place. Staged
//! filter edits (`filters`) never touch `filtered` until an apply runs, and an
//! apply always drops the active selection.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::filter::{apply_filters, FilterPatch, FilterSpec, UniqueValueIndex};
use crate::selection::{select_by_category, Selection};
use crate::source;
use crate::ticket::{normalize_rows, CanonicalTicket, RawRow};

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("no data found in the loaded sheet")]
    NoData,
    #[error("failed to read spreadsheet: {0:#}")]
    Source(anyhow::Error),
}

impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        DashboardError::Source(err)
    }
}

/// One applied-filter label/value pair, for the summary strip.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ActiveFilter {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    raw_data: Option<Vec<RawRow>>,
    processed: Option<Vec<CanonicalTicket>>,
    filtered: Option<Vec<CanonicalTicket>>,
    /// Working copy, edited by the user.
    filters: FilterSpec,
    /// Spec that produced `filtered`.
    applied: Option<FilterSpec>,
    default_filters: FilterSpec,
    unique_values: UniqueValueIndex,
    selection: Option<Selection>,
    panel_open: bool,
}

impl DashboardState {
    pub fn new(default_filters: FilterSpec) -> Self {
        Self {
            raw_data: None,
            processed: None,
            filtered: None,
            filters: default_filters.clone(),
            applied: None,
            default_filters,
            unique_values: UniqueValueIndex::default(),
            selection: None,
            panel_open: false,
        }
    }

    /// Defaults from `config`, with the date window ending at `now`.
    pub fn from_config(config: &DashboardConfig, now: DateTime<Utc>) -> Self {
        Self::new(config.default_filters(now))
    }

    pub fn raw_data(&self) -> Option<&[RawRow]> {
        self.raw_data.as_deref()
    }

    pub fn processed(&self) -> Option<&[CanonicalTicket]> {
        self.processed.as_deref()
    }

    pub fn filtered(&self) -> Option<&[CanonicalTicket]> {
        self.filtered.as_deref()
    }

    pub fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    pub fn applied_filters(&self) -> Option<&FilterSpec> {
        self.applied.as_ref()
    }

    pub fn unique_values(&self) -> &UniqueValueIndex {
        &self.unique_values
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    /// Replace the dataset with `rows` and re-apply the working filters.
    /// Zero rows is refused with [`DashboardError::NoData`]; the previous
    /// dataset stays in place. Returns the number of tickets loaded.
    #[tracing::instrument(level = "info", skip(self, rows), fields(rows = rows.len()))]
    pub fn load(&mut self, rows: Vec<RawRow>) -> Result<usize, DashboardError> {
        if rows.is_empty() {
            warn!("load refused: sheet has no rows");
            return Err(DashboardError::NoData);
        }
        let processed = normalize_rows(&rows);
        let unique_values = UniqueValueIndex::build(&processed);
        let count = processed.len();

        self.raw_data = Some(rows);
        self.processed = Some(processed);
        self.unique_values = unique_values;

        let spec = self.filters.clone();
        self.apply_filters(Some(spec));
        info!(tickets = count, "dataset loaded");
        Ok(count)
    }

    /// Read `path` off the calling task, then [`load`](Self::load) it. A failed
    /// read leaves the current dataset untouched.
    pub async fn load_file(&mut self, path: impl Into<PathBuf>) -> Result<usize, DashboardError> {
        let rows = source::read_rows_async(path.into()).await?;
        self.load(rows)
    }

    /// Merge `patch` into the working filters; apply them too when asked.
    pub fn update_filters(&mut self, patch: &FilterPatch, apply_immediately: bool) {
        self.filters = self.filters.merged(patch);
        debug!(?patch, apply_immediately, "filters updated");
        if apply_immediately {
            let spec = self.filters.clone();
            self.apply_filters(Some(spec));
        }
    }

    /// Recompute `filtered` from `spec`, or from the working filters when
    /// `None`. Clears any selection. No-op before the first load.
    pub fn apply_filters(&mut self, spec: Option<FilterSpec>) {
        let Some(processed) = self.processed.as_deref() else {
            debug!("apply skipped: nothing loaded");
            return;
        };
        let spec = spec.unwrap_or_else(|| self.filters.clone());
        let filtered = apply_filters(processed, &spec);
        debug!(
            total = processed.len(),
            kept = filtered.len(),
            "filters applied"
        );

        self.selection = None;
        self.filtered = Some(filtered);
        self.applied = Some(spec);
    }

    /// Back to the default filters, showing the whole dataset unfiltered.
    pub fn reset_filters(&mut self) {
        self.filters = self.default_filters.clone();
        self.applied = None;
        self.filtered = self.processed.clone();
    }

    /// Drill into the filtered tickets whose `category` equals `value`. Replaces
    /// any prior selection and opens the panel. No-op before the first load.
    pub fn select_by_category(&mut self, category: &str, value: &str) -> Option<&Selection> {
        let filtered = self.filtered.as_deref()?;
        let tickets = select_by_category(filtered, category, value);
        debug!(category, value, matched = tickets.len(), "selection");

        self.selection = Some(Selection {
            category: category.to_string(),
            value: value.to_string(),
            tickets,
        });
        self.panel_open = true;
        self.selection.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.panel_open = false;
    }

    /// Show or hide the panel; the selection itself is kept.
    pub fn toggle_panel(&mut self) {
        self.panel_open = !self.panel_open;
    }

    /// Summary strip: every categorical filter that is shown, whether set or not.
    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        let spec = self.applied.as_ref().unwrap_or(&self.filters);
        [
            ("Technology", &spec.technology),
            ("Client", &spec.client),
            ("Ticket Type", &spec.ticket_type),
            ("Status", &spec.status),
            ("Assigned To", &spec.assigned_to),
        ]
        .into_iter()
        .map(|(label, choice)| ActiveFilter {
            label,
            value: choice.to_string(),
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Choice;
    use chrono::TimeZone;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .collect()
    }

    fn state() -> DashboardState {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        DashboardState::new(FilterSpec::new(start, end))
    }

    fn rows() -> Vec<RawRow> {
        vec![
            row(&[("ID", "1"), ("Client", "Acme"), ("Assigned Date", "2024-01-02"), ("Status", "Closed")]),
            row(&[("ID", "2"), ("Client", "Initech"), ("Assigned Date", "2024-01-03"), ("Status", "Hold")]),
            row(&[("ID", "3"), ("Client", "Acme"), ("Assigned Date", "2023-06-01"), ("Status", "Hold")]),
        ]
    }

    #[test]
    fn empty_load_keeps_previous_dataset() {
        let mut s = state();
        s.load(rows()).unwrap();
        let err = s.load(Vec::new()).unwrap_err();
        assert!(matches!(err, DashboardError::NoData));
        assert_eq!(s.processed().map(|p| p.len()), Some(3));
        assert_eq!(s.raw_data().map(|r| r.len()), Some(3));
    }

    #[test]
    fn load_applies_working_filters() {
        let mut s = state();
        assert!(s.filtered().is_none());
        assert_eq!(s.load(rows()).unwrap(), 3);
        assert_eq!(s.filtered().unwrap().len(), 2);
        assert_eq!(s.unique_values().client, vec!["All", "Acme", "Initech"]);
    }

    #[test]
    fn staged_edits_do_not_touch_filtered() {
        let mut s = state();
        s.load(rows()).unwrap();
        let patch = FilterPatch {
            client: Some("Acme".into()),
            ..Default::default()
        };
        s.update_filters(&patch, false);
        assert_eq!(s.filters().client, Choice::Only("Acme".into()));
        assert_eq!(s.filtered().unwrap().len(), 2);
        assert_eq!(s.applied_filters().unwrap().client, Choice::All);

        s.apply_filters(None);
        assert_eq!(s.filtered().unwrap().len(), 1);

        s.update_filters(
            &FilterPatch {
                client: Some(Choice::All),
                ..Default::default()
            },
            true,
        );
        assert_eq!(s.filtered().unwrap().len(), 2);
    }

    #[test]
    fn apply_clears_selection() {
        let mut s = state();
        s.load(rows()).unwrap();
        let picked = s.select_by_category("client", "Acme").unwrap();
        assert_eq!(picked.tickets.len(), 1);
        assert!(s.is_panel_open());

        s.apply_filters(None);
        assert!(s.selection().is_none());
    }

    #[test]
    fn selection_replaces_and_clears() {
        let mut s = state();
        assert!(s.select_by_category("client", "Acme").is_none());
        s.load(rows()).unwrap();

        s.select_by_category("client", "Acme");
        s.select_by_category("Status", "Hold");
        let sel = s.selection().unwrap();
        assert_eq!((sel.category.as_str(), sel.value.as_str()), ("Status", "Hold"));
        assert_eq!(sel.tickets[0].id, "2");

        s.toggle_panel();
        assert!(!s.is_panel_open());
        assert!(s.selection().is_some());

        s.clear_selection();
        assert!(s.selection().is_none());
        assert!(!s.is_panel_open());
    }

    #[test]
    fn reset_shows_everything() {
        let mut s = state();
        s.load(rows()).unwrap();
        s.update_filters(
            &FilterPatch {
                status: Some("Closed".into()),
                ..Default::default()
            },
            true,
        );
        assert_eq!(s.filtered().unwrap().len(), 1);
        assert_eq!(s.active_filters()[3].value, "Closed");

        s.reset_filters();
        assert_eq!(s.filtered().unwrap().len(), 3);
        assert!(s.filters().status.is_all());
        assert!(s.active_filters().iter().all(|f| f.value == "All"));
    }
}
