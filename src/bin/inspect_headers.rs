use std::{collections::BTreeMap, env, path::Path, process::exit};
use ticketdash::{source::read_rows, ticket::TicketField};

fn main() {
    // Expect exactly one CLI argument: path to a spreadsheet.
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <SPREADSHEET>", args[0]);
        exit(1);
    }
    if let Err(e) = inspect_headers(Path::new(&args[1])) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

/// Print each header with its fill rate and the ticket field it feeds.
fn inspect_headers(path: &Path) -> anyhow::Result<()> {
    let rows = read_rows(path)?;

    // header → non-empty cell count
    let mut filled: BTreeMap<&str, usize> = BTreeMap::new();
    for row in &rows {
        for (header, cell) in row {
            let n = filled.entry(header.as_str()).or_default();
            if cell.as_deref().is_some_and(|v| !v.is_empty()) {
                *n += 1;
            }
        }
    }

    println!("=== Sheet: {} ===", path.display());
    println!("Data rows: {}", rows.len());
    println!();
    println!("=== Headers ===");
    for (header, count) in &filled {
        let field = TicketField::for_header(header)
            .map(|f| f.key().to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("- {:<30} | filled: {:>6} | field: {}", header, count, field);
    }
    println!();

    println!("=== Unresolved fields ===");
    for field in TicketField::ALL {
        if !field.aliases().iter().any(|a| filled.contains_key(a)) {
            let default = match field {
                TicketField::Id => "ticket-<row>",
                other => other.default_value(),
            };
            println!(
                "- {:<14} → default {:?} (looked for {:?})",
                field.key(),
                default,
                field.aliases()
            );
        }
    }
    Ok(())
}
