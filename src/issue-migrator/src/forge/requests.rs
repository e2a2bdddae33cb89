//! Request bodies for the creation and update routes.

use crate::model::IssueState;
use serde::Serialize;

/// `POST /issues`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateIssueRequest {
    pub title: String,
    pub body: String,
}

impl CreateIssueRequest {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// `PATCH /issues/{number}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateIssueRequest {
    pub state: IssueState,
}

/// `POST /git/refs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRefRequest {
    pub r#ref: String,
    pub sha: String,
}

impl CreateRefRequest {
    /// Creates a request for branch `branch` pointing at `sha`.
    pub fn branch(branch: impl AsRef<str>, sha: impl Into<String>) -> Self {
        Self {
            r#ref: format!("refs/heads/{}", branch.as_ref()),
            sha: sha.into(),
        }
    }
}

/// `POST /pulls`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatePullRequest {
    pub title: String,
    pub head: String,
    pub base: String,
    pub body: String,
}

impl CreatePullRequest {
    pub fn new(
        title: impl Into<String>,
        head: impl Into<String>,
        base: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            head: head.into(),
            base: base.into(),
            body: body.into(),
        }
    }
}

/// `POST /issues/{number}/comments`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateCommentRequest {
    pub body: String,
}

/// `POST /pulls/{number}/comments`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateReviewCommentRequest {
    pub body: String,
    pub commit_id: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
}

/// `POST /commits/{sha}/comments`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateCommitCommentRequest {
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_ref_is_qualified() {
        let request = CreateRefRequest::branch("pr7base", "abc");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "ref": "refs/heads/pr7base", "sha": "abc" })
        );
    }

    #[test]
    fn state_update_serializes_lowercase() {
        let json = serde_json::to_string(&UpdateIssueRequest {
            state: IssueState::Closed,
        })
        .unwrap();

        assert_eq!(json, r#"{"state":"closed"}"#);
    }

    #[test]
    fn commit_comment_omits_missing_position() {
        let json = serde_json::to_value(CreateCommitCommentRequest {
            body: "nice".to_string(),
            path: None,
            position: None,
        })
        .unwrap();

        assert_eq!(json, serde_json::json!({ "body": "nice" }));
    }
}
