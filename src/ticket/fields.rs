//! Header alias resolution.
//!
//! Spreadsheet exports spell the same column many ways (`Technology/Platform`,
//! `Technology`, `technology`, ...). Every logical ticket field owns one ordered
//! alias list below; the first alias holding a non-empty value wins. Names that
//! are not ticket fields go through a generic probe of common spellings.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Anything that can hand back a cell value by exact key.
pub trait FieldSource {
    /// Non-empty value stored under exactly `key`.
    fn get_field(&self, key: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TicketField {
    Id,
    TicketNumber,
    Date,
    Technology,
    Client,
    TicketType,
    AssignedTo,
    Status,
}

/// Ordered source-header candidates per field. Each list ends with the
/// canonical key so a merged ticket view falls back to its normalized value.
const ALIAS_TABLE: [(TicketField, &[&str]); 8] = [
    (TicketField::Id, &["ID", "id"]),
    (
        TicketField::TicketNumber,
        &["Ticket Number", "TicketNumber", "ticketNumber"],
    ),
    (TicketField::Date, &["Assigned Date", "Date", "date"]),
    (
        TicketField::Technology,
        &["Technology/Platform", "Technology", "technology"],
    ),
    (TicketField::Client, &["Client", "client"]),
    (
        TicketField::TicketType,
        &["Ticket Type", "TicketType", "ticketType"],
    ),
    (
        TicketField::AssignedTo,
        &["AssignedTo", "Assigned to", "Assigned To", "assignedTo"],
    ),
    (TicketField::Status, &["Status", "status"]),
];

/// Folded spelling (lowercase alphanumerics) → field, for category names
/// coming from charts and drill-down requests.
static CATEGORY_INDEX: Lazy<HashMap<String, TicketField>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for (field, aliases) in ALIAS_TABLE {
        index.insert(fold(field.key()), field);
        for alias in aliases {
            index.entry(fold(alias)).or_insert(field);
        }
    }
    index
});

static UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Z])").expect("static regex"));
static SPACED_LOWER: Lazy<Regex> = Lazy::new(|| Regex::new(r" ([a-z])").expect("static regex"));

impl TicketField {
    pub const ALL: [TicketField; 8] = [
        TicketField::Id,
        TicketField::TicketNumber,
        TicketField::Date,
        TicketField::Technology,
        TicketField::Client,
        TicketField::TicketType,
        TicketField::AssignedTo,
        TicketField::Status,
    ];

    /// Canonical key, as it appears in a serialized ticket.
    pub fn key(self) -> &'static str {
        match self {
            TicketField::Id => "id",
            TicketField::TicketNumber => "ticketNumber",
            TicketField::Date => "date",
            TicketField::Technology => "technology",
            TicketField::Client => "client",
            TicketField::TicketType => "ticketType",
            TicketField::AssignedTo => "assignedTo",
            TicketField::Status => "status",
        }
    }

    pub fn aliases(self) -> &'static [&'static str] {
        ALIAS_TABLE
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[])
    }

    /// Value used when no alias resolves.
    pub fn default_value(self) -> &'static str {
        match self {
            TicketField::AssignedTo => "Unassigned",
            _ => "Unknown",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Loose match of a category name (`"Assigned to"`, `"TicketType"`,
    /// `"technology"`) onto a field.
    pub fn from_category(name: &str) -> Option<Self> {
        CATEGORY_INDEX.get(&fold(name)).copied()
    }

    /// Field whose alias list contains `header` verbatim.
    pub fn for_header(header: &str) -> Option<Self> {
        ALIAS_TABLE
            .iter()
            .find(|(_, aliases)| aliases.contains(&header))
            .map(|(field, _)| *field)
    }
}

/// First non-empty alias of `field` present in `source`.
pub fn resolve_field<S: FieldSource + ?Sized>(source: &S, field: TicketField) -> Option<&str> {
    field
        .aliases()
        .iter()
        .find_map(|alias| source.get_field(alias))
}

/// Resolve `name` against `source`. Ticket fields use their alias list; any
/// other name is probed as written, lowercased, space-split and capitalized
/// (`ticketType` → `Ticket Type`), and finally camel-contracted when it
/// contains spaces (`Ticket type` → `TicketType`).
pub fn resolve<'a, S: FieldSource + ?Sized>(source: &'a S, name: &str) -> Option<&'a str> {
    match TicketField::from_category(name) {
        Some(field) => resolve_field(source, field),
        None => generic_probes(name)
            .iter()
            .find_map(|key| source.get_field(key)),
    }
}

fn generic_probes(name: &str) -> Vec<String> {
    let mut probes = vec![name.to_string(), name.to_lowercase()];

    let spaced = UPPERCASE.replace_all(name, " $1");
    probes.push(capitalize(spaced.trim()));

    if name.contains(' ') {
        let camel = SPACED_LOWER.replace_all(name, |caps: &Captures| caps[1].to_uppercase());
        probes.push(camel.into_owned());
    }
    probes
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn fold(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::RawRow;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .collect()
    }

    #[test]
    fn compound_header_wins_over_plain_spellings() {
        let r = row(&[("Technology/Platform", "X")]);
        assert_eq!(resolve(&r, "technology"), Some("X"));

        let r = row(&[("Technology/Platform", "X"), ("technology", "Y")]);
        assert_eq!(resolve(&r, "technology"), Some("X"));
        assert_eq!(resolve_field(&r, TicketField::Technology), Some("X"));
    }

    #[test]
    fn category_names_fold_onto_fields() {
        assert_eq!(TicketField::from_category("Assigned to"), Some(TicketField::AssignedTo));
        assert_eq!(TicketField::from_category("assignedTo"), Some(TicketField::AssignedTo));
        assert_eq!(TicketField::from_category("TicketType"), Some(TicketField::TicketType));
        assert_eq!(TicketField::from_category("Technology"), Some(TicketField::Technology));
        assert_eq!(TicketField::from_category("Ticket Number"), Some(TicketField::TicketNumber));
        assert_eq!(TicketField::from_category("Priority"), None);
    }

    #[test]
    fn empty_cells_fall_through_to_next_alias() {
        let mut r = row(&[("Assigned to", "Dana")]);
        r.insert("AssignedTo".into(), Some(String::new()));
        assert_eq!(resolve(&r, "assignedTo"), Some("Dana"));

        r.insert("Assigned to".into(), None);
        assert_eq!(resolve(&r, "assignedTo"), None);
    }

    #[test]
    fn generic_probes_cover_common_spellings() {
        assert_eq!(
            generic_probes("priorityLevel"),
            vec!["priorityLevel", "prioritylevel", "Priority Level"]
        );
        assert_eq!(
            generic_probes("Priority level"),
            vec!["Priority level", "priority level", "Priority level", "PriorityLevel"]
        );

        let r = row(&[("Priority Level", "P1")]);
        assert_eq!(resolve(&r, "priorityLevel"), Some("P1"));
        let r = row(&[("priority", "P2")]);
        assert_eq!(resolve(&r, "Priority"), Some("P2"));
        assert_eq!(resolve(&r, "Severity"), None);
    }

    #[test]
    fn headers_map_back_to_fields() {
        assert_eq!(TicketField::for_header("Assigned Date"), Some(TicketField::Date));
        assert_eq!(TicketField::for_header("assigned date"), None);
        assert_eq!(TicketField::for_header("Client"), Some(TicketField::Client));
    }
}
