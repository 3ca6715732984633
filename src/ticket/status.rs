use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse state derived from free-text status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusBucket {
    Open,
    Closed,
    Unknown,
}

impl StatusBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusBucket::Open => "Open",
            StatusBucket::Closed => "Closed",
            StatusBucket::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for StatusBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const OPEN_BUCKET: [&str; 3] = ["in progress", "hold", "in review"];
const CLOSED_BUCKET: [&str; 2] = ["closed", "resolved"];

/// Raw status text the `Open` status filter accepts. Case-sensitive.
pub const FILTER_OPEN_STATUSES: [&str; 4] = ["In Progress", "Hold", "Review", "Open"];
/// Raw status text the `Closed` status filter accepts. Case-sensitive.
pub const FILTER_CLOSED_STATUSES: [&str; 2] = ["Closed", "Resolved"];

/// Lowercased raw status counted as open in summary metrics.
pub const METRIC_OPEN_STATUSES: [&str; 6] = [
    "new",
    "in progress",
    "hold",
    "in review",
    "awaiting info",
    "pending",
];
/// Lowercased raw status counted as resolved in summary metrics.
pub const METRIC_RESOLVED_STATUSES: [&str; 3] = ["resolved", "closed", "cancelled"];

// The filter and metric vocabularies above do not agree with the buckets, nor
// with each other ("Review" vs "in review", "pending"). Downstream reports
// depend on each as-is.

/// Map raw status text onto a bucket: trimmed, case-insensitive, exact match.
pub fn normalize_status(raw: &str) -> StatusBucket {
    let s = raw.trim().to_lowercase();
    if OPEN_BUCKET.contains(&s.as_str()) {
        StatusBucket::Open
    } else if CLOSED_BUCKET.contains(&s.as_str()) {
        StatusBucket::Closed
    } else {
        StatusBucket::Unknown
    }
}
