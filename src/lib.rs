//! Support-ticket analytics over spreadsheet exports.
//!
//! Raw rows come out of [`source`], get normalized into [`ticket::CanonicalTicket`]s,
//! narrowed by a [`filter::FilterSpec`], summarized by [`aggregate`], and drilled
//! into through [`selection`]. [`state::DashboardState`] ties the steps together
//! behind the commands a dashboard front end issues.

pub mod aggregate;
pub mod config;
pub mod filter;
pub mod report;
pub mod selection;
pub mod source;
pub mod state;
pub mod ticket;

pub use config::DashboardConfig;
pub use filter::{apply_filters, Choice, FilterPatch, FilterSpec, UniqueValueIndex};
pub use selection::Selection;
pub use state::{DashboardError, DashboardState};
pub use ticket::{CanonicalTicket, RawRow, StatusBucket, TicketField};
