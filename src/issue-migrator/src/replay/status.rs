//! Per-item replay states.

use serde::Serialize;

/// Where an item is in the replay: `Pending -> InFlight -> {Done, Failed}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemStatus {
    /// Not yet attempted.
    Pending,

    /// Currently being replayed.
    InFlight,

    /// Replayed successfully.
    Done {
        /// Number assigned by the destination.
        destination_number: u64,
        /// Whether the item was closed after creation.
        closed: bool,
    },

    /// Replay failed; later items were still attempted.
    Failed {
        /// Error message.
        error: String,
        /// Destination number, if the item got created before failing.
        destination_number: Option<u64>,
    },
}

impl ItemStatus {
    /// Returns the status as a string for logs and reports.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InFlight => "in_flight",
            Self::Done { .. } => "done",
            Self::Failed { .. } => "failed",
        }
    }

    /// Returns true once the item has reached `Done` or `Failed`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Failed { .. })
    }

    /// Returns the destination number of a successfully replayed item.
    #[must_use]
    pub fn destination_number(&self) -> Option<u64> {
        match self {
            Self::Done {
                destination_number, ..
            } => Some(*destination_number),
            _ => None,
        }
    }
}
