// src/ticket/mod.rs
pub mod date;
pub mod fields;
pub mod normalize;
pub mod status;

use serde::{ser::SerializeMap, Serialize, Serializer};
use std::collections::BTreeMap;

pub use fields::{resolve, resolve_field, FieldSource, TicketField};
pub use normalize::{normalize_row, normalize_rows};
pub use status::{normalize_status, StatusBucket};

/// One spreadsheet row keyed by its header text. Empty cells are `None`.
pub type RawRow = BTreeMap<String, Option<String>>;

impl FieldSource for RawRow {
    fn get_field(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(|v| v.as_deref())
            .filter(|v| !v.is_empty())
    }
}

/// A ticket with fixed field names, whatever the source headers looked like.
///
/// The original row travels with the ticket in `raw`. Lookups by key go through
/// [`CanonicalTicket::value`], which overlays the raw fields on top of the
/// canonical ones: a raw header spelled exactly like a canonical key (`status`,
/// `client`, ...) shadows the normalized value. Null raw cells never shadow.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTicket {
    pub id: String,
    pub ticket_number: String,
    /// Unparsed date text, or the `Unknown` sentinel.
    pub date: String,
    pub technology: String,
    pub client: String,
    pub ticket_type: String,
    pub assigned_to: String,
    pub status: StatusBucket,
    pub response_time: Option<f64>,
    pub satisfaction: Option<f64>,
    pub raw: RawRow,
}

impl CanonicalTicket {
    /// Normalized value of `field`, ignoring any raw overlay.
    pub fn canonical(&self, field: TicketField) -> &str {
        match field {
            TicketField::Id => &self.id,
            TicketField::TicketNumber => &self.ticket_number,
            TicketField::Date => &self.date,
            TicketField::Technology => &self.technology,
            TicketField::Client => &self.client,
            TicketField::TicketType => &self.ticket_type,
            TicketField::AssignedTo => &self.assigned_to,
            TicketField::Status => self.status.as_str(),
        }
    }

    /// Merged value of a canonical field: raw wins on a key collision.
    pub fn field(&self, field: TicketField) -> &str {
        self.raw
            .get_field(field.key())
            .unwrap_or_else(|| self.canonical(field))
    }

    /// Merged lookup by arbitrary key.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.raw
            .get_field(key)
            .or_else(|| TicketField::from_key(key).map(|f| self.canonical(f)))
    }

    /// Status text as it appeared in the sheet, before bucketing.
    pub fn raw_status(&self) -> Option<&str> {
        resolve_field(&self.raw, TicketField::Status)
    }
}

impl FieldSource for CanonicalTicket {
    fn get_field(&self, key: &str) -> Option<&str> {
        self.value(key)
    }
}

impl Serialize for CanonicalTicket {
    /// Canonical keys first, then every raw pair on top, so the output has the
    /// same shape as the merged view.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for field in TicketField::ALL {
            if self.raw.get_field(field.key()).is_none() {
                map.serialize_entry(field.key(), self.canonical(field))?;
            }
        }
        for (key, number) in [
            ("responseTime", self.response_time),
            ("satisfaction", self.satisfaction),
        ] {
            if !self.raw.contains_key(key) {
                map.serialize_entry(key, &number)?;
            }
        }
        for (key, value) in &self.raw {
            let shadows = self.raw.get_field(key).is_some();
            if shadows || TicketField::from_key(key).is_none() {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}
