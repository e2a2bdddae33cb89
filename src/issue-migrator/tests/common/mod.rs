//! In-memory [`ForgeApi`] that records every call.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use issue_migrator::forge::{
    CreateCommentRequest, CreateCommitCommentRequest, CreateIssueRequest, CreatePullRequest,
    CreateRefRequest, CreateReviewCommentRequest, CreatedComment, CreatedIssue,
};
use issue_migrator::model::{GitRef, User};
use issue_migrator::{ForgeApi, Issue, IssueState, ListResource, PullRequest, TransportError};
use std::collections::HashMap;
use std::sync::Mutex;

/// A recorded call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListPage {
        resource: ListResource,
        page: u32,
    },
    CreateIssue(CreateIssueRequest),
    UpdateState {
        number: u64,
        state: IssueState,
    },
    CreateRef(CreateRefRequest),
    CreatePull(CreatePullRequest),
    IssueComment {
        number: u64,
        request: CreateCommentRequest,
    },
    PullComment {
        number: u64,
        request: CreateReviewCommentRequest,
    },
    CommitComment {
        sha: String,
        request: CreateCommitCommentRequest,
    },
}

impl Call {
    pub fn is_write(&self) -> bool {
        !matches!(self, Call::ListPage { .. })
    }
}

type Matcher = Box<dyn Fn(&Call) -> bool + Send + Sync>;

struct Failure {
    matcher: Matcher,
    status: u16,
    message: String,
}

/// Records calls, assigns sequential numbers and ids, and fails the calls
/// registered with [`FakeForge::fail_when`].
pub struct FakeForge {
    calls: Mutex<Vec<Call>>,
    next_number: Mutex<u64>,
    next_comment_id: Mutex<u64>,
    pages: HashMap<ListResource, Vec<Vec<serde_json::Value>>>,
    failures: Vec<Failure>,
}

impl Default for FakeForge {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeForge {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_number: Mutex::new(1),
            next_comment_id: Mutex::new(1000),
            pages: HashMap::new(),
            failures: Vec::new(),
        }
    }

    /// Starts numbering created items at `number`.
    pub fn numbering_from(self, number: u64) -> Self {
        *self.next_number.lock().unwrap() = number;
        self
    }

    /// Serves `records` for `resource`, `per_page` at a time.
    pub fn with_records<T: serde::Serialize>(
        mut self,
        resource: ListResource,
        records: &[T],
        per_page: usize,
    ) -> Self {
        let values: Vec<serde_json::Value> = records
            .iter()
            .map(|record| serde_json::to_value(record).unwrap())
            .collect();
        self.pages.insert(
            resource,
            values.chunks(per_page).map(<[_]>::to_vec).collect(),
        );
        self
    }

    /// Fails every call matching `matcher` with `status`.
    pub fn fail_when(
        mut self,
        status: u16,
        message: &str,
        matcher: impl Fn(&Call) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.failures.push(Failure {
            matcher: Box::new(matcher),
            status,
            message: message.to_string(),
        });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    fn record(&self, call: Call) -> Result<(), TransportError> {
        let failure = self
            .failures
            .iter()
            .find(|failure| (failure.matcher)(&call))
            .map(|failure| TransportError::Status {
                status: failure.status,
                message: failure.message.clone(),
            });
        self.calls.lock().unwrap().push(call);
        failure.map_or(Ok(()), Err)
    }

    fn assign_number(&self) -> CreatedIssue {
        let mut next = self.next_number.lock().unwrap();
        let number = *next;
        *next += 1;
        CreatedIssue {
            number,
            html_url: None,
        }
    }

    fn assign_comment_id(&self) -> CreatedComment {
        let mut next = self.next_comment_id.lock().unwrap();
        let id = *next;
        *next += 1;
        CreatedComment { id }
    }
}

#[async_trait]
impl ForgeApi for FakeForge {
    async fn list_page(
        &self,
        resource: ListResource,
        page: u32,
    ) -> Result<Vec<serde_json::Value>, TransportError> {
        self.record(Call::ListPage { resource, page })?;
        Ok(self
            .pages
            .get(&resource)
            .and_then(|pages| pages.get(page as usize - 1))
            .cloned()
            .unwrap_or_default())
    }

    async fn create_issue(
        &self,
        request: &CreateIssueRequest,
    ) -> Result<CreatedIssue, TransportError> {
        self.record(Call::CreateIssue(request.clone()))?;
        Ok(self.assign_number())
    }

    async fn update_issue_state(
        &self,
        number: u64,
        state: IssueState,
    ) -> Result<(), TransportError> {
        self.record(Call::UpdateState { number, state })
    }

    async fn create_ref(&self, request: &CreateRefRequest) -> Result<(), TransportError> {
        self.record(Call::CreateRef(request.clone()))
    }

    async fn create_pull(
        &self,
        request: &CreatePullRequest,
    ) -> Result<CreatedIssue, TransportError> {
        self.record(Call::CreatePull(request.clone()))?;
        Ok(self.assign_number())
    }

    async fn create_issue_comment(
        &self,
        number: u64,
        request: &CreateCommentRequest,
    ) -> Result<CreatedComment, TransportError> {
        self.record(Call::IssueComment {
            number,
            request: request.clone(),
        })?;
        Ok(self.assign_comment_id())
    }

    async fn create_pull_comment(
        &self,
        number: u64,
        request: &CreateReviewCommentRequest,
    ) -> Result<CreatedComment, TransportError> {
        self.record(Call::PullComment {
            number,
            request: request.clone(),
        })?;
        Ok(self.assign_comment_id())
    }

    async fn create_commit_comment(
        &self,
        sha: &str,
        request: &CreateCommitCommentRequest,
    ) -> Result<CreatedComment, TransportError> {
        self.record(Call::CommitComment {
            sha: sha.to_string(),
            request: request.clone(),
        })?;
        Ok(self.assign_comment_id())
    }
}

pub fn timestamp(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 5, day, 12, 0, 0).unwrap()
}

pub fn issue(number: u64, state: IssueState) -> Issue {
    Issue {
        number,
        title: format!("Item {number}"),
        body: Some(format!("Body of {number}")),
        state,
        created_at: timestamp(1),
        closed_at: (state == IssueState::Closed).then(|| timestamp(2)),
        user: User {
            login: "octocat".to_string(),
        },
    }
}

pub fn pull(number: u64, state: IssueState) -> PullRequest {
    let issue = issue(number, state);
    PullRequest {
        number,
        title: issue.title,
        body: issue.body,
        state,
        created_at: issue.created_at,
        closed_at: issue.closed_at,
        user: issue.user,
        base: GitRef {
            name: "master".to_string(),
            sha: format!("base{number}"),
        },
        head: GitRef {
            name: format!("feature-{number}"),
            sha: format!("head{number}"),
        },
    }
}
