//! Per-item failure records.

use crate::model::ItemKind;
use serde::Serialize;

/// An item that needs manual attention after the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedItem {
    /// Source number.
    pub number: u64,

    /// How the item was being replayed.
    pub kind: ItemKind,

    /// Error message.
    pub error: String,

    /// Destination number, if the item was created before the failure.
    pub destination_number: Option<u64>,
}
