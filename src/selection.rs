// src/selection.rs
use serde::Serialize;

use crate::aggregate::category_value;
use crate::ticket::{
    date::{day_key, parse_day_key, parse_ticket_date},
    fields::capitalize,
    resolve, resolve_field, CanonicalTicket, TicketField,
};

/// Active drill-down: the category/value pair and the tickets it matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub category: String,
    pub value: String,
    pub tickets: Vec<CanonicalTicket>,
}

/// Tickets whose value for `category` equals `value` exactly.
///
/// The value is resolved the same way [`crate::aggregate::category_counts`]
/// labels its bars, so clicking a bar selects exactly the tickets counted in it.
/// For `date`, an ISO day (`YYYY-MM-DD`, the time-series label) also matches
/// any ticket dated on that day.
pub fn select_by_category(
    records: &[CanonicalTicket],
    category: &str,
    value: &str,
) -> Vec<CanonicalTicket> {
    let by_day =
        TicketField::from_category(category) == Some(TicketField::Date) && parse_day_key(value).is_some();

    records
        .iter()
        .filter(|ticket| {
            category_value(ticket, category) == value
                || (by_day
                    && parse_ticket_date(ticket.field(TicketField::Date))
                        .map_or(false, |dt| day_key(&dt) == value))
        })
        .cloned()
        .collect()
}

/// Columns of the drill-down table.
pub const PANEL_COLUMNS: [TicketField; 7] = [
    TicketField::TicketNumber,
    TicketField::Date,
    TicketField::Client,
    TicketField::Technology,
    TicketField::TicketType,
    TicketField::Status,
    TicketField::AssignedTo,
];

/// Tabular view of a selection, as the drill-down panel shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PanelView {
    pub fn new(selection: Option<&Selection>) -> Self {
        let Some(selection) = selection else {
            return Self {
                title: panel_title(None),
                columns: Vec::new(),
                rows: Vec::new(),
            };
        };
        let fields = if selection.tickets.is_empty() {
            Vec::new()
        } else {
            display_columns(Some(&selection.category))
        };
        Self {
            title: panel_title(Some(selection)),
            columns: fields.iter().map(|f| column_label(*f)).collect(),
            rows: selection
                .tickets
                .iter()
                .map(|t| fields.iter().map(|f| cell_value(t, *f)).collect())
                .collect(),
        }
    }
}

pub fn panel_title(selection: Option<&Selection>) -> String {
    match selection {
        Some(s) if !s.category.is_empty() && !s.value.is_empty() => {
            format!("{} {} Tickets", s.value, s.category)
        }
        _ => "Selected Tickets".to_string(),
    }
}

/// Panel columns minus the one the selection is about; repeating it on every
/// row adds nothing.
pub fn display_columns(category: Option<&str>) -> Vec<TicketField> {
    let exclude = category.and_then(|c| match c.to_lowercase().as_str() {
        "technology" => Some(TicketField::Technology),
        "client" => Some(TicketField::Client),
        "tickettype" => Some(TicketField::TicketType),
        "status" => Some(TicketField::Status),
        "assignedto" => Some(TicketField::AssignedTo),
        "date" => Some(TicketField::Date),
        "ticketnumber" => Some(TicketField::TicketNumber),
        _ => None,
    });
    PANEL_COLUMNS
        .into_iter()
        .filter(|f| Some(*f) != exclude)
        .collect()
}

pub fn column_label(field: TicketField) -> String {
    match field {
        TicketField::TicketNumber => "Ticket Number".to_string(),
        TicketField::TicketType => "Ticket Type".to_string(),
        TicketField::AssignedTo => "Assigned To".to_string(),
        other => {
            let key = other.key();
            let mut label = String::with_capacity(key.len() + 2);
            for (i, c) in key.chars().enumerate() {
                if i > 0 && c.is_uppercase() {
                    label.push(' ');
                }
                label.push(c);
            }
            capitalize(&label)
        }
    }
}

pub fn cell_value(ticket: &CanonicalTicket, field: TicketField) -> String {
    match field {
        TicketField::Date => {
            let raw = ticket.field(TicketField::Date);
            parse_ticket_date(raw)
                .map(|dt| day_key(&dt))
                .unwrap_or_else(|| raw.to_string())
        }
        TicketField::TicketNumber => ticket.field(TicketField::TicketNumber).to_string(),
        TicketField::Status => resolve(ticket, "Status").unwrap_or("N/A").to_string(),
        other => resolve_field(ticket, other).unwrap_or("N/A").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::category_counts;
    use crate::ticket::{normalize_rows, RawRow};

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .collect()
    }

    fn sample() -> Vec<CanonicalTicket> {
        normalize_rows(&[
            row(&[
                ("Ticket Number", "INC-1"),
                ("Technology/Platform", "AWS"),
                ("Assigned to", "Dana"),
                ("Assigned Date", "2024-01-05T09:00:00"),
                ("Status", "Hold"),
            ]),
            row(&[
                ("Ticket Number", "INC-2"),
                ("Technology", "Azure"),
                ("AssignedTo", "Lee"),
                ("Assigned Date", "2024-01-05"),
                ("Ticket Type", "Request"),
            ]),
            row(&[("Ticket Number", "INC-3"), ("Assigned Date", "2024-01-06")]),
        ])
    }

    fn numbers(tickets: &[CanonicalTicket]) -> Vec<&str> {
        tickets.iter().map(|t| t.ticket_number.as_str()).collect()
    }

    #[test]
    fn selects_through_aliases() {
        let tickets = sample();
        assert_eq!(numbers(&select_by_category(&tickets, "technology", "AWS")), ["INC-1"]);
        assert_eq!(numbers(&select_by_category(&tickets, "assignedTo", "Lee")), ["INC-2"]);
        assert_eq!(numbers(&select_by_category(&tickets, "Assigned to", "Dana")), ["INC-1"]);
        assert_eq!(numbers(&select_by_category(&tickets, "TicketType", "Request")), ["INC-2"]);
        assert!(select_by_category(&tickets, "technology", "aws").is_empty());
    }

    #[test]
    fn drill_down_matches_chart_counts() {
        let tickets = sample();
        for category in ["Technology", "Client", "TicketType", "Status", "Assigned to"] {
            for bar in category_counts(&tickets, category) {
                let picked = select_by_category(&tickets, category, &bar.name);
                assert_eq!(picked.len(), bar.value, "{category}={}", bar.name);
            }
        }
    }

    #[test]
    fn date_selection_matches_calendar_day() {
        let tickets = sample();
        assert_eq!(
            numbers(&select_by_category(&tickets, "date", "2024-01-05")),
            ["INC-1", "INC-2"]
        );
        assert_eq!(numbers(&select_by_category(&tickets, "date", "2024-01-06")), ["INC-3"]);
    }

    #[test]
    fn panel_hides_selected_column() {
        assert_eq!(display_columns(Some("Technology")).len(), 6);
        assert!(!display_columns(Some("assignedTo")).contains(&TicketField::AssignedTo));
        assert_eq!(display_columns(Some("Priority")), PANEL_COLUMNS.to_vec());
        assert_eq!(display_columns(None), PANEL_COLUMNS.to_vec());
    }

    #[test]
    fn panel_view_renders_rows() {
        let tickets = sample();
        let selection = Selection {
            category: "technology".into(),
            value: "AWS".into(),
            tickets: select_by_category(&tickets, "technology", "AWS"),
        };
        let view = PanelView::new(Some(&selection));
        assert_eq!(view.title, "AWS technology Tickets");
        assert_eq!(
            view.columns,
            ["Ticket Number", "Date", "Client", "Ticket Type", "Status", "Assigned To"]
        );
        assert_eq!(
            view.rows,
            vec![vec!["INC-1", "2024-01-05", "Unknown", "Unknown", "Hold", "Dana"]]
        );

        let empty = PanelView::new(None);
        assert_eq!(empty.title, "Selected Tickets");
        assert!(empty.rows.is_empty());
    }
}
