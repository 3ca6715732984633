use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use ticketdash::{
    report::DashboardReport, ticket::date::parse_ticket_date, Choice, DashboardConfig,
    DashboardError, DashboardState, FilterPatch,
};

#[derive(Parser)]
#[command(name = "ticketdash")]
#[command(about = "Summarize a support-ticket spreadsheet export as a JSON dashboard report")]
struct Args {
    /// Spreadsheet to load (.xlsx, .xls, .ods, .csv or .json)
    file: PathBuf,

    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start of the date window (inclusive)
    #[arg(long, value_parser = parse_when)]
    start: Option<DateTime<Utc>>,

    /// End of the date window (inclusive)
    #[arg(long, value_parser = parse_when)]
    end: Option<DateTime<Utc>>,

    /// Ignore the date window entirely
    #[arg(long, conflicts_with_all = ["start", "end"])]
    all_dates: bool,

    #[arg(long)]
    technology: Option<String>,
    #[arg(long)]
    client: Option<String>,
    #[arg(long)]
    ticket_type: Option<String>,
    #[arg(long)]
    assigned_to: Option<String>,
    /// `Open`, `Closed`, or an exact status value
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    ticket_number: Option<String>,

    /// Drill into `category=value`, e.g. `technology=AWS`
    #[arg(long, value_parser = parse_selection)]
    select: Option<(String, String)>,

    /// Pretty-print the report
    #[arg(short, long)]
    pretty: bool,
}

fn parse_when(s: &str) -> Result<DateTime<Utc>, String> {
    parse_ticket_date(s).ok_or_else(|| format!("not a date: {s:?}"))
}

fn parse_selection(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(c, v)| (c.trim().to_string(), v.to_string()))
        .filter(|(c, _)| !c.is_empty())
        .ok_or_else(|| format!("expected category=value, got {s:?}"))
}

impl Args {
    fn patch(&self) -> FilterPatch {
        let choice = |v: &Option<String>| v.as_deref().map(Choice::from);
        let (start_date, end_date) = if self.all_dates {
            (Some(DateTime::<Utc>::MIN_UTC), Some(DateTime::<Utc>::MAX_UTC))
        } else {
            (self.start, self.end)
        };
        FilterPatch {
            start_date,
            end_date,
            technology: choice(&self.technology),
            client: choice(&self.client),
            ticket_type: choice(&self.ticket_type),
            assigned_to: choice(&self.assigned_to),
            status: choice(&self.status),
            ticket_number: choice(&self.ticket_number),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = DashboardConfig::load_or_default(args.config.as_deref())?;

    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
    info!(file = %args.file.display(), "startup");

    // ─── 2) load sheet ───────────────────────────────────────────────
    let mut state = DashboardState::from_config(&config, Utc::now());
    state.update_filters(&args.patch(), false);
    match state.load_file(&args.file).await {
        Ok(n) => info!(tickets = n, "loaded"),
        Err(DashboardError::NoData) => {
            return Err(anyhow!("no data found in {}", args.file.display()));
        }
        Err(e) => return Err(e.into()),
    }

    // ─── 3) drill-down ───────────────────────────────────────────────
    if let Some((category, value)) = &args.select {
        match state.select_by_category(category, value) {
            Some(sel) => info!(%category, %value, matched = sel.tickets.len(), "selected"),
            None => warn!(%category, %value, "nothing to select from"),
        }
    }

    // ─── 4) report ───────────────────────────────────────────────────
    let report = DashboardReport::build(&state, &config);
    let out = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", out);
    Ok(())
}
