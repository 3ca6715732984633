//! Chart-ready aggregates over a ticket subset. All pure.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::ticket::{
    date::{day_key, parse_ticket_date},
    resolve,
    status::{METRIC_OPEN_STATUSES, METRIC_RESOLVED_STATUSES},
    CanonicalTicket, TicketField,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSeriesPoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub tickets: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryChart {
    pub category: String,
    pub data: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_tickets: usize,
    pub open_tickets: usize,
    pub resolved_tickets: usize,
}

/// Tickets per calendar day (UTC), ascending. Tickets whose date does not
/// parse are left out.
pub fn time_series(records: &[CanonicalTicket]) -> Vec<TimeSeriesPoint> {
    let mut by_day: BTreeMap<String, usize> = BTreeMap::new();
    let mut undated = 0usize;
    for ticket in records {
        match parse_ticket_date(ticket.field(TicketField::Date)) {
            Some(dt) => *by_day.entry(day_key(&dt)).or_default() += 1,
            None => undated += 1,
        }
    }
    if undated > 0 {
        debug!(undated, "tickets without a usable date left out of time series");
    }
    by_day
        .into_iter()
        .map(|(date, tickets)| TimeSeriesPoint { date, tickets })
        .collect()
}

/// Ticket count per distinct value of `category`, in first-seen order.
/// Missing values count as `Unknown`.
pub fn category_counts(records: &[CanonicalTicket], category: &str) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();
    for ticket in records {
        let name = category_value(ticket, category);
        match slot.get(name) {
            Some(&i) => counts[i].value += 1,
            None => {
                slot.insert(name, counts.len());
                counts.push(CategoryCount {
                    name: name.to_string(),
                    value: 1,
                });
            }
        }
    }
    counts
}

/// Value a ticket contributes to a category chart; drill-down matches on the
/// same value.
pub fn category_value<'a>(ticket: &'a CanonicalTicket, category: &str) -> &'a str {
    resolve(ticket, category).unwrap_or("Unknown")
}

/// One chart per category name, e.g. `["Technology", "Assigned to"]`.
pub fn category_charts(records: &[CanonicalTicket], categories: &[String]) -> Vec<CategoryChart> {
    categories
        .iter()
        .map(|category| CategoryChart {
            category: category.clone(),
            data: category_counts(records, category),
        })
        .collect()
}

/// Summary card counts. Reads raw status text (falling back to the merged
/// `status` field), lowercased but not trimmed.
pub fn metrics(records: &[CanonicalTicket]) -> Metrics {
    let mut m = Metrics {
        total_tickets: records.len(),
        ..Metrics::default()
    };
    for ticket in records {
        let status = resolve(ticket, "Status").unwrap_or("").to_lowercase();
        if METRIC_OPEN_STATUSES.contains(&status.as_str()) {
            m.open_tickets += 1;
        } else if METRIC_RESOLVED_STATUSES.contains(&status.as_str()) {
            m.resolved_tickets += 1;
        }
    }
    m
}
