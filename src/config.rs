// src/config.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::filter::FilterSpec;

/// Dashboard settings, read from YAML. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// The default filter window covers this many months up to now.
    pub default_window_months: u32,
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Category names charted in the report.
    pub chart_categories: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_window_months: 2,
            log_filter: "info,ticketdash=info".to_string(),
            chart_categories: ["Technology", "Client", "TicketType", "Status", "Assigned to"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing config {:?}", path))
    }

    /// [`load`](Self::load) when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn default_filters(&self, now: DateTime<Utc>) -> FilterSpec {
        FilterSpec::trailing_months(now, self.default_window_months)
    }
}
