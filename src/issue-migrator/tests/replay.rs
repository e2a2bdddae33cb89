mod common;

use common::{issue, pull, timestamp, Call, FakeForge};
use issue_migrator::comments::{CommentKind, CommentStatus};
use issue_migrator::forge::CreateRefRequest;
use issue_migrator::model::{CommitComment, IssueComment, PullComment, User};
use issue_migrator::{
    BranchNaming, CommentReplayer, CommentSet, IssueState, ItemMigrationError, ItemMigrator,
    ItemStatus, MigrationItem, ReplayDriver,
};
use std::collections::HashMap;

fn plain(number: u64, state: IssueState) -> MigrationItem {
    MigrationItem::from_issue(issue(number, state))
}

fn pull_item(number: u64, state: IssueState) -> MigrationItem {
    MigrationItem::with_pull(issue(number, state), &pull(number, state))
}

fn created_titles(calls: &[Call]) -> Vec<String> {
    calls
        .iter()
        .filter_map(|call| match call {
            Call::CreateIssue(request) => Some(request.title.clone()),
            Call::CreatePull(request) => Some(request.title.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn closed_issue_is_created_then_closed() {
    let destination = FakeForge::new().numbering_from(40);
    let naming = BranchNaming::default();

    let migrated = ItemMigrator::new(&destination, &naming)
        .migrate(&plain(3, IssueState::Closed))
        .await
        .unwrap();

    assert_eq!(migrated.destination_number, 40);
    assert!(migrated.closed);

    let writes = destination.writes();
    assert_eq!(writes.len(), 2);
    assert!(matches!(&writes[0], Call::CreateIssue(request) if request.title == "Item 3"));
    assert_eq!(
        writes[1],
        Call::UpdateState {
            number: 40,
            state: IssueState::Closed,
        }
    );
}

#[tokio::test]
async fn open_issue_is_not_updated() {
    let destination = FakeForge::new();
    let naming = BranchNaming::default();

    let migrated = ItemMigrator::new(&destination, &naming)
        .migrate(&plain(3, IssueState::Open))
        .await
        .unwrap();

    assert!(!migrated.closed);
    let writes = destination.writes();
    assert_eq!(writes.len(), 1);
    assert!(matches!(writes[0], Call::CreateIssue(_)));
}

#[tokio::test]
async fn issue_body_keeps_original_text_and_provenance() {
    let destination = FakeForge::new();
    let naming = BranchNaming::default();

    ItemMigrator::new(&destination, &naming)
        .migrate(&plain(3, IssueState::Closed))
        .await
        .unwrap();

    let Call::CreateIssue(request) = &destination.writes()[0] else {
        panic!("expected an issue to be created first");
    };
    assert!(request
        .body
        .starts_with("Body of 3\r\n\r\n*GitHub Import*\r\n**Author:** octocat\r\n"));
    assert!(request.body.contains("(May 1st 2016, 12:00:00 pm)"));
    assert!(request.body.contains("**Closed:** "));
}

#[tokio::test]
async fn pull_request_creates_base_branch_before_pull() {
    let destination = FakeForge::new().numbering_from(12);
    let naming = BranchNaming::default();

    let migrated = ItemMigrator::new(&destination, &naming)
        .migrate(&pull_item(7, IssueState::Closed))
        .await
        .unwrap();

    assert_eq!(migrated.destination_number, 12);

    let writes = destination.writes();
    assert_eq!(writes.len(), 3);
    assert_eq!(
        writes[0],
        Call::CreateRef(CreateRefRequest::branch("pr7base", "base7"))
    );
    let Call::CreatePull(request) = &writes[1] else {
        panic!("expected the pull request after the branch");
    };
    assert_eq!(request.head, "pr/7/head");
    assert_eq!(request.base, "pr7base");
    assert_eq!(request.title, "Item 7");
    assert_eq!(
        writes[2],
        Call::UpdateState {
            number: 12,
            state: IssueState::Closed,
        }
    );
}

#[tokio::test]
async fn custom_branch_naming_is_used() {
    let destination = FakeForge::new();
    let naming = BranchNaming::new("import/{number}/base", "import/{number}/head");

    ItemMigrator::new(&destination, &naming)
        .migrate(&pull_item(5, IssueState::Open))
        .await
        .unwrap();

    let writes = destination.writes();
    assert_eq!(
        writes[0],
        Call::CreateRef(CreateRefRequest::branch("import/5/base", "base5"))
    );
    assert!(matches!(
        &writes[1],
        Call::CreatePull(request) if request.head == "import/5/head" && request.base == "import/5/base"
    ));
}

#[tokio::test]
async fn failed_branch_prevents_pull_creation() {
    let destination = FakeForge::new().fail_when(422, "Reference already exists", |call| {
        matches!(call, Call::CreateRef(_))
    });
    let naming = BranchNaming::default();

    let error = ItemMigrator::new(&destination, &naming)
        .migrate(&pull_item(7, IssueState::Open))
        .await
        .unwrap_err();

    assert!(matches!(error, ItemMigrationError::CreateBaseRef { ref branch, .. } if branch == "pr7base"));
    assert!(error.is_ref_conflict());
    assert!(destination
        .writes()
        .iter()
        .all(|call| !matches!(call, Call::CreatePull(_))));
}

#[tokio::test]
async fn failed_pull_is_not_closed() {
    let destination = FakeForge::new().fail_when(422, "No commits between branches", |call| {
        matches!(call, Call::CreatePull(_))
    });
    let naming = BranchNaming::default();

    let error = ItemMigrator::new(&destination, &naming)
        .migrate(&pull_item(7, IssueState::Closed))
        .await
        .unwrap_err();

    assert!(matches!(error, ItemMigrationError::CreatePull(_)));
    let writes = destination.writes();
    assert_eq!(writes.len(), 2);
    assert!(matches!(writes[0], Call::CreateRef(_)));
    assert!(matches!(writes[1], Call::CreatePull(_)));
    assert!(writes
        .iter()
        .all(|call| !matches!(call, Call::UpdateState { .. })));
}

#[tokio::test]
async fn failed_pull_does_not_stop_the_batch() {
    let destination = FakeForge::new().fail_when(422, "No commits between branches", |call| {
        matches!(call, Call::CreatePull(_))
    });
    let naming = BranchNaming::default();
    let items = vec![pull_item(7, IssueState::Closed), plain(8, IssueState::Closed)];

    let report = ReplayDriver::new(&destination, &naming).run(&items).await;

    assert!(matches!(
        &report.records[0].status,
        ItemStatus::Failed { destination_number: None, .. }
    ));
    assert_eq!(
        report.records[1].status,
        ItemStatus::Done {
            destination_number: 1,
            closed: true,
        }
    );
    assert_eq!(
        destination.writes().last(),
        Some(&Call::UpdateState {
            number: 1,
            state: IssueState::Closed,
        })
    );
}

#[tokio::test]
async fn failed_close_reports_created_number() {
    let destination = FakeForge::new()
        .numbering_from(9)
        .fail_when(500, "boom", |call| matches!(call, Call::UpdateState { .. }));
    let naming = BranchNaming::default();

    let error = ItemMigrator::new(&destination, &naming)
        .migrate(&plain(2, IssueState::Closed))
        .await
        .unwrap_err();

    assert!(matches!(error, ItemMigrationError::ReconcileState { number: 9, .. }));
    assert_eq!(error.created_number(), Some(9));
}

#[tokio::test]
async fn replays_in_ascending_order() {
    let destination = FakeForge::new();
    let naming = BranchNaming::default();
    let items = vec![
        plain(5, IssueState::Open),
        plain(1, IssueState::Open),
        pull_item(3, IssueState::Open),
    ];

    let report = ReplayDriver::new(&destination, &naming).run(&items).await;

    assert_eq!(
        created_titles(&destination.writes()),
        vec!["Item 1", "Item 3", "Item 5"]
    );
    let numbers: Vec<u64> = report.records.iter().map(|record| record.number).collect();
    assert_eq!(numbers, vec![1, 3, 5]);
    assert_eq!(report.number_map(), HashMap::from([(1, 1), (3, 2), (5, 3)]));
}

#[tokio::test]
async fn failed_item_does_not_stop_the_batch() {
    let destination = FakeForge::new().fail_when(422, "Validation Failed", |call| {
        matches!(call, Call::CreateIssue(request) if request.title == "Item 3")
    });
    let naming = BranchNaming::default();
    let items = vec![plain(3, IssueState::Open), plain(4, IssueState::Closed)];

    let report = ReplayDriver::new(&destination, &naming).run(&items).await;

    assert_eq!(report.records.len(), 2);
    assert!(matches!(
        &report.records[0].status,
        ItemStatus::Failed { error, destination_number: None } if error.contains("Validation Failed")
    ));
    assert_eq!(
        report.records[1].status,
        ItemStatus::Done {
            destination_number: 1,
            closed: true,
        }
    );
    assert_eq!(report.failed().count(), 1);
    assert_eq!(report.succeeded().count(), 1);
}

#[tokio::test]
async fn every_item_reaches_a_terminal_state_once() {
    let destination = FakeForge::new().fail_when(500, "boom", |call| {
        matches!(call, Call::CreateRef(_))
    });
    let naming = BranchNaming::default();
    let items = vec![
        plain(1, IssueState::Open),
        pull_item(2, IssueState::Open),
        plain(3, IssueState::Closed),
    ];

    let mut seen = Vec::new();
    let report = ReplayDriver::new(&destination, &naming)
        .run_with_progress(&items, |record| seen.push(record.number))
        .await;

    assert_eq!(seen, vec![1, 2, 3]);
    assert!(report.records.iter().all(|record| record.status.is_terminal()));
}

fn user() -> User {
    User {
        login: "hubot".to_string(),
    }
}

#[tokio::test]
async fn comments_follow_migrated_numbers() {
    let destination = FakeForge::new();
    let numbers = HashMap::from([(1, 10), (2, 11)]);
    let comments = CommentSet {
        issue_comments: vec![
            IssueComment {
                id: 501,
                issue_url: "https://api.github.com/repos/octo/old/issues/1".to_string(),
                body: Some("Second".to_string()),
                user: user(),
                created_at: timestamp(4),
            },
            IssueComment {
                id: 502,
                issue_url: "https://api.github.com/repos/octo/old/issues/3".to_string(),
                body: Some("On a failed item".to_string()),
                user: user(),
                created_at: timestamp(5),
            },
        ],
        pull_comments: vec![PullComment {
            id: 601,
            pull_request_url: "https://api.github.com/repos/octo/old/pulls/2".to_string(),
            body: Some("First".to_string()),
            user: user(),
            created_at: timestamp(3),
            original_commit_id: "head2".to_string(),
            path: "src/lib.rs".to_string(),
            original_position: Some(4),
        }],
        commit_comments: vec![CommitComment {
            id: 701,
            commit_id: "abc123".to_string(),
            body: Some("Third".to_string()),
            user: user(),
            created_at: timestamp(4),
            path: None,
            position: None,
        }],
    };

    let report = CommentReplayer::new(&destination, &numbers)
        .run(&comments)
        .await;

    let writes = destination.writes();
    assert_eq!(writes.len(), 3);
    assert!(matches!(
        &writes[0],
        Call::PullComment { number: 11, request }
            if request.commit_id == "head2" && request.position == Some(4)
    ));
    assert!(matches!(
        &writes[1],
        Call::IssueComment { number: 10, request } if request.body.starts_with("Second\r\n\r\n*GitHub Import*")
    ));
    assert!(matches!(&writes[2], Call::CommitComment { sha, .. } if sha == "abc123"));

    assert_eq!(report.created(), 3);
    assert_eq!(report.skipped(), 1);
    let skipped = report
        .records
        .iter()
        .find(|record| record.id == 502)
        .unwrap();
    assert_eq!(skipped.kind, CommentKind::Issue);
    assert!(matches!(skipped.status, CommentStatus::Skipped { .. }));
}
