// src/filter/mod.rs
pub mod unique;

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ticket::{
    date::parse_ticket_date,
    status::{FILTER_CLOSED_STATUSES, FILTER_OPEN_STATUSES},
    CanonicalTicket, TicketField,
};

pub use unique::UniqueValueIndex;

/// Value of one categorical filter: everything, or one exact observed value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    pub const ALL_LABEL: &'static str = "All";

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Choice::All => Self::ALL_LABEL,
            Choice::Only(v) => v,
        }
    }

    /// `All` passes everything; otherwise exact string equality.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(v) => v == value,
        }
    }
}

impl From<String> for Choice {
    fn from(s: String) -> Self {
        if s == Self::ALL_LABEL {
            Choice::All
        } else {
            Choice::Only(s)
        }
    }
}

impl From<&str> for Choice {
    fn from(s: &str) -> Self {
        Choice::from(s.to_string())
    }
}

impl From<Choice> for String {
    fn from(c: Choice) -> Self {
        match c {
            Choice::All => Choice::ALL_LABEL.to_string(),
            Choice::Only(v) => v,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Date window plus one choice per categorical field. Both bounds inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub technology: Choice,
    #[serde(default)]
    pub client: Choice,
    #[serde(default)]
    pub ticket_type: Choice,
    #[serde(default)]
    pub assigned_to: Choice,
    #[serde(default)]
    pub status: Choice,
    #[serde(default)]
    pub ticket_number: Choice,
}

/// Partial update of a [`FilterSpec`]; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterPatch {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub technology: Option<Choice>,
    pub client: Option<Choice>,
    pub ticket_type: Option<Choice>,
    pub assigned_to: Option<Choice>,
    pub status: Option<Choice>,
    pub ticket_number: Option<Choice>,
}

impl FilterSpec {
    /// Window `[start, end]` with every categorical field at `All`.
    pub fn new(start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        Self {
            start_date,
            end_date,
            technology: Choice::All,
            client: Choice::All,
            ticket_type: Choice::All,
            assigned_to: Choice::All,
            status: Choice::All,
            ticket_number: Choice::All,
        }
    }

    /// The last `months` months up to `now`.
    pub fn trailing_months(now: DateTime<Utc>, months: u32) -> Self {
        let start = now
            .checked_sub_months(Months::new(months))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self::new(start, now)
    }

    /// Every representable date.
    pub fn unbounded() -> Self {
        Self::new(DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC)
    }

    /// Choice for a categorical field. `Id` and `Date` are not categorical.
    pub fn choice(&self, field: TicketField) -> Option<&Choice> {
        match field {
            TicketField::Technology => Some(&self.technology),
            TicketField::Client => Some(&self.client),
            TicketField::TicketType => Some(&self.ticket_type),
            TicketField::AssignedTo => Some(&self.assigned_to),
            TicketField::Status => Some(&self.status),
            TicketField::TicketNumber => Some(&self.ticket_number),
            TicketField::Id | TicketField::Date => None,
        }
    }

    /// Copy of `self` with every field set in `patch` replaced.
    pub fn merged(&self, patch: &FilterPatch) -> Self {
        let pick = |new: &Option<Choice>, old: &Choice| new.clone().unwrap_or_else(|| old.clone());
        Self {
            start_date: patch.start_date.unwrap_or(self.start_date),
            end_date: patch.end_date.unwrap_or(self.end_date),
            technology: pick(&patch.technology, &self.technology),
            client: pick(&patch.client, &self.client),
            ticket_type: pick(&patch.ticket_type, &self.ticket_type),
            assigned_to: pick(&patch.assigned_to, &self.assigned_to),
            status: pick(&patch.status, &self.status),
            ticket_number: pick(&patch.ticket_number, &self.ticket_number),
        }
    }

    /// Whether `ticket` passes every clause.
    pub fn matches(&self, ticket: &CanonicalTicket) -> bool {
        self.in_date_range(ticket)
            && [
                TicketField::Technology,
                TicketField::Client,
                TicketField::TicketType,
                TicketField::AssignedTo,
                TicketField::TicketNumber,
            ]
            .into_iter()
            .all(|field| self.choice(field).map_or(true, |c| c.matches(ticket.field(field))))
            && self.matches_status(ticket)
    }

    /// An unparseable date never falls inside the window.
    fn in_date_range(&self, ticket: &CanonicalTicket) -> bool {
        parse_ticket_date(ticket.field(TicketField::Date))
            .map_or(false, |d| d >= self.start_date && d <= self.end_date)
    }

    /// `Open` and `Closed` also accept fixed sets of raw status text; any value
    /// additionally matches the merged status field exactly.
    fn matches_status(&self, ticket: &CanonicalTicket) -> bool {
        let wanted = match &self.status {
            Choice::All => return true,
            Choice::Only(v) => v.as_str(),
        };
        let raw_in = |set: &[&str]| ticket.raw_status().map_or(false, |s| set.contains(&s));

        (wanted == "Open" && raw_in(&FILTER_OPEN_STATUSES))
            || (wanted == "Closed" && raw_in(&FILTER_CLOSED_STATUSES))
            || ticket.field(TicketField::Status) == wanted
    }
}

/// Tickets passing `spec`, in input order.
pub fn apply_filters(records: &[CanonicalTicket], spec: &FilterSpec) -> Vec<CanonicalTicket> {
    records.iter().filter(|t| spec.matches(t)).cloned().collect()
}
