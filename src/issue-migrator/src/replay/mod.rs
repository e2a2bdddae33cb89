//! Sequential replay of migration items.
//!
//! Items are replayed strictly one at a time in ascending source-number
//! order, so that destination numbers are assigned in the same relative
//! order and every step of a pull request (branch, then pull request, then
//! state) completes before the next item starts. A failed item never stops
//! the batch.

mod status;

pub use status::ItemStatus;

use crate::forge::ForgeApi;
use crate::migrate::{BranchNaming, ItemMigrator};
use crate::model::{ItemKind, MigrationItem};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

/// Outcome of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRecord {
    /// Source number.
    pub number: u64,

    /// How the item was replayed.
    pub kind: ItemKind,

    /// Title, for reporting.
    pub title: String,

    /// Final state.
    pub status: ItemStatus,
}

/// Outcomes of a replay, in the order items were attempted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    /// One record per item.
    pub records: Vec<ItemRecord>,
}

impl ReplayReport {
    /// Returns the records of items that failed.
    pub fn failed(&self) -> impl Iterator<Item = &ItemRecord> {
        self.records
            .iter()
            .filter(|record| matches!(record.status, ItemStatus::Failed { .. }))
    }

    /// Returns the records of items that were replayed.
    pub fn succeeded(&self) -> impl Iterator<Item = &ItemRecord> {
        self.records
            .iter()
            .filter(|record| matches!(record.status, ItemStatus::Done { .. }))
    }

    /// Maps source numbers to destination numbers for replayed items.
    #[must_use]
    pub fn number_map(&self) -> HashMap<u64, u64> {
        self.records
            .iter()
            .filter_map(|record| {
                record
                    .status
                    .destination_number()
                    .map(|destination| (record.number, destination))
            })
            .collect()
    }
}

/// Replays items one at a time.
pub struct ReplayDriver<'a> {
    migrator: ItemMigrator<'a>,
}

impl<'a> ReplayDriver<'a> {
    /// Creates a driver writing to `destination`.
    pub fn new(destination: &'a dyn ForgeApi, naming: &'a BranchNaming) -> Self {
        Self {
            migrator: ItemMigrator::new(destination, naming),
        }
    }

    /// Attempts every item exactly once, in ascending number order.
    pub async fn run(&self, items: &[MigrationItem]) -> ReplayReport {
        self.run_with_progress(items, |_| {}).await
    }

    /// Like [`run`](Self::run), calling `on_item` as each item reaches a
    /// terminal state.
    pub async fn run_with_progress<F>(&self, items: &[MigrationItem], mut on_item: F) -> ReplayReport
    where
        F: FnMut(&ItemRecord),
    {
        let mut ordered: Vec<&MigrationItem> = items.iter().collect();
        ordered.sort_by_key(|item| item.number());

        let mut records: Vec<ItemRecord> = ordered
            .iter()
            .map(|item| ItemRecord {
                number: item.number(),
                kind: item.kind(),
                title: item.title().to_string(),
                status: ItemStatus::Pending,
            })
            .collect();

        let total = ordered.len();
        for (index, item) in ordered.into_iter().enumerate() {
            let record = &mut records[index];
            record.status = ItemStatus::InFlight;
            info!(
                number = record.number,
                kind = %record.kind,
                position = index + 1,
                total,
                "Replaying item"
            );

            record.status = match self.migrator.migrate(item).await {
                Ok(migrated) => ItemStatus::Done {
                    destination_number: migrated.destination_number,
                    closed: migrated.closed,
                },
                Err(e) => {
                    warn!(
                        number = record.number,
                        error = %e,
                        ref_conflict = e.is_ref_conflict(),
                        "Item failed, continuing with next"
                    );
                    ItemStatus::Failed {
                        error: e.to_string(),
                        destination_number: e.created_number(),
                    }
                }
            };

            on_item(record);
        }

        ReplayReport { records }
    }
}
