use serde::Serialize;
use std::collections::HashSet;

use super::Choice;
use crate::ticket::{CanonicalTicket, TicketField};

/// Distinct observed values per categorical field, `All` first, then in
/// first-seen order. Rebuilt wholesale on every load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueValueIndex {
    pub technology: Vec<String>,
    pub client: Vec<String>,
    pub ticket_type: Vec<String>,
    pub assigned_to: Vec<String>,
    pub status: Vec<String>,
    pub ticket_number: Vec<String>,
}

impl Default for UniqueValueIndex {
    fn default() -> Self {
        let all = || vec![Choice::ALL_LABEL.to_string()];
        Self {
            technology: all(),
            client: all(),
            ticket_type: all(),
            assigned_to: all(),
            status: all(),
            ticket_number: all(),
        }
    }
}

impl UniqueValueIndex {
    pub const FIELDS: [TicketField; 6] = [
        TicketField::Technology,
        TicketField::Client,
        TicketField::TicketType,
        TicketField::AssignedTo,
        TicketField::Status,
        TicketField::TicketNumber,
    ];

    pub fn build(tickets: &[CanonicalTicket]) -> Self {
        let mut index = Self::default();
        for field in Self::FIELDS {
            let mut seen: HashSet<String> = HashSet::from([Choice::ALL_LABEL.to_string()]);
            let Some(values) = index.values_mut(field) else {
                continue;
            };
            for ticket in tickets {
                let value = ticket.field(field);
                if !value.is_empty() && seen.insert(value.to_string()) {
                    values.push(value.to_string());
                }
            }
        }
        index
    }

    /// Options for `field`; empty for non-categorical fields.
    pub fn values(&self, field: TicketField) -> &[String] {
        match field {
            TicketField::Technology => &self.technology,
            TicketField::Client => &self.client,
            TicketField::TicketType => &self.ticket_type,
            TicketField::AssignedTo => &self.assigned_to,
            TicketField::Status => &self.status,
            TicketField::TicketNumber => &self.ticket_number,
            TicketField::Id | TicketField::Date => &[],
        }
    }

    fn values_mut(&mut self, field: TicketField) -> Option<&mut Vec<String>> {
        match field {
            TicketField::Technology => Some(&mut self.technology),
            TicketField::Client => Some(&mut self.client),
            TicketField::TicketType => Some(&mut self.ticket_type),
            TicketField::AssignedTo => Some(&mut self.assigned_to),
            TicketField::Status => Some(&mut self.status),
            TicketField::TicketNumber => Some(&mut self.ticket_number),
            TicketField::Id | TicketField::Date => None,
        }
    }
}
