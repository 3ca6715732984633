use tracing::debug;

use super::{normalize_status, resolve_field, CanonicalTicket, RawRow, StatusBucket, TicketField};

/// Build one canonical ticket per raw row, in input order.
#[tracing::instrument(level = "debug", skip(rows), fields(rows = rows.len()))]
pub fn normalize_rows(rows: &[RawRow]) -> Vec<CanonicalTicket> {
    let tickets: Vec<CanonicalTicket> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| normalize_row(i, row))
        .collect();

    let unknown_status = tickets
        .iter()
        .filter(|t| t.status == StatusBucket::Unknown)
        .count();
    debug!(tickets = tickets.len(), unknown_status, "normalized rows");
    tickets
}

/// `index` is the row's position in its batch; it names tickets without an `ID`.
pub fn normalize_row(index: usize, row: &RawRow) -> CanonicalTicket {
    let text = |field: TicketField| -> String {
        resolve_field(row, field)
            .unwrap_or_else(|| field.default_value())
            .to_string()
    };

    CanonicalTicket {
        id: resolve_field(row, TicketField::Id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("ticket-{}", index)),
        ticket_number: text(TicketField::TicketNumber),
        date: text(TicketField::Date),
        technology: text(TicketField::Technology),
        client: text(TicketField::Client),
        ticket_type: text(TicketField::TicketType),
        assigned_to: text(TicketField::AssignedTo),
        status: normalize_status(resolve_field(row, TicketField::Status).unwrap_or("Unknown")),
        response_time: None,
        satisfaction: None,
        raw: row.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .collect()
    }

    #[test]
    fn fills_defaults_for_missing_fields() {
        let tickets = normalize_rows(&[RawRow::new()]);
        let t = &tickets[0];
        assert_eq!(t.id, "ticket-0");
        assert_eq!(t.ticket_number, "Unknown");
        assert_eq!(t.date, "Unknown");
        assert_eq!(t.technology, "Unknown");
        assert_eq!(t.client, "Unknown");
        assert_eq!(t.ticket_type, "Unknown");
        assert_eq!(t.assigned_to, "Unassigned");
        assert_eq!(t.status, StatusBucket::Unknown);
        assert!(t.response_time.is_none() && t.satisfaction.is_none());
    }

    #[test]
    fn resolves_aliases_and_keeps_raw_pairs() {
        let rows = vec![
            row(&[
                ("ID", "T-9"),
                ("Ticket Number", "INC001"),
                ("Assigned Date", "2024-01-01"),
                ("Technology/Platform", "AWS"),
                ("Client", "Acme"),
                ("Ticket Type", "Incident"),
                ("Assigned to", "Dana"),
                ("Status", "In Progress"),
                ("Priority", "P1"),
            ]),
            row(&[("Technology", "Azure"), ("TicketType", "Request")]),
        ];
        let tickets = normalize_rows(&rows);

        let a = &tickets[0];
        assert_eq!(a.id, "T-9");
        assert_eq!(a.ticket_number, "INC001");
        assert_eq!(a.date, "2024-01-01");
        assert_eq!(a.technology, "AWS");
        assert_eq!(a.client, "Acme");
        assert_eq!(a.ticket_type, "Incident");
        assert_eq!(a.assigned_to, "Dana");
        assert_eq!(a.status, StatusBucket::Open);
        assert_eq!(a.value("Priority"), Some("P1"));

        let b = &tickets[1];
        assert_eq!(b.id, "ticket-1");
        assert_eq!(b.technology, "Azure");
        assert_eq!(b.ticket_type, "Request");
    }

    #[test]
    fn is_a_pure_function_of_input() {
        let rows = vec![row(&[("Status", "resolved"), ("Client", "Initech")])];
        assert_eq!(normalize_rows(&rows), normalize_rows(&rows));
    }
}
