//! Merges the issue and pull request collections into migration items.

use crate::model::{Issue, MigrationItem, PullRequest};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Result of correlating the two source collections.
#[derive(Debug, Clone, Default)]
pub struct Correlation {
    /// Items in ascending source-number order.
    pub items: Vec<MigrationItem>,

    /// Pull requests dropped because no issue shares their number.
    pub orphaned_pulls: Vec<u64>,
}

impl Correlation {
    /// Returns the number of pull request items.
    #[must_use]
    pub fn pull_count(&self) -> usize {
        self.items.iter().filter(|item| item.pull.is_some()).count()
    }
}

/// Correlates issues with pull requests by number.
///
/// Each pull request's `base`/`head` are copied onto the issue of the same
/// number; issues without a pull request become plain items. Pull requests
/// with no issue counterpart are dropped and reported in
/// [`Correlation::orphaned_pulls`]. The output is sorted by number whatever
/// order the inputs arrived in.
pub fn correlate(issues: Vec<Issue>, pulls: &[PullRequest]) -> Correlation {
    let mut by_number: BTreeMap<u64, Issue> = BTreeMap::new();
    for issue in issues {
        let number = issue.number;
        if by_number.insert(number, issue).is_some() {
            warn!(number, "Duplicate issue number in source listing, keeping the last");
        }
    }

    let mut pulls_by_number: BTreeMap<u64, &PullRequest> = BTreeMap::new();
    let mut orphaned_pulls = Vec::new();
    for pull in pulls {
        if by_number.contains_key(&pull.number) {
            pulls_by_number.insert(pull.number, pull);
        } else {
            warn!(number = pull.number, "Pull request has no matching issue, skipping");
            orphaned_pulls.push(pull.number);
        }
    }
    orphaned_pulls.sort_unstable();
    orphaned_pulls.dedup();

    let items: Vec<MigrationItem> = by_number
        .into_iter()
        .map(|(number, issue)| match pulls_by_number.get(&number) {
            Some(pull) => MigrationItem::with_pull(issue, pull),
            None => MigrationItem::from_issue(issue),
        })
        .collect();

    debug!(
        items = items.len(),
        orphaned = orphaned_pulls.len(),
        "Correlated source collections"
    );

    Correlation {
        items,
        orphaned_pulls,
    }
}
