//
//  scm-transport
//  scm/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Provider-agnostic source-control value types.
//!
//! These are the plain records embedded in webhook events: repositories,
//! users, commits, issues, pull requests and so on. Every provider adapter
//! normalizes its own payloads into these shapes.
//!
//! All types use camelCase keys on the wire and tolerate missing fields, so a
//! zero-valued record round-trips through JSON unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Action performed on a resource, as reported by a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Created,
    Updated,
    Deleted,
    Opened,
    Reopened,
    Closed,
    Merged,
    Synchronized,
    Edited,
    Labeled,
    Unlabeled,
    Assigned,
    Unassigned,
    ReviewRequested,
    ReadyForReview,
    ConvertedToDraft,
    Submitted,
    Dismissed,
    /// The provider reported an action this crate does not model.
    #[default]
    #[serde(other)]
    Unknown,
}

/// A hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Repository {
    pub id: String,
    pub namespace: String,
    pub name: String,
    pub full_name: String,
    /// Default branch.
    pub branch: String,
    pub private: bool,
    pub archived: bool,
    pub clone: String,
    #[serde(rename = "cloneSSH")]
    pub clone_ssh: String,
    pub link: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// A user account on the hosting service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub link: String,
    pub is_admin: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// Author or committer details attached to a commit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub date: DateTime<Utc>,
    pub login: String,
    pub avatar: String,
}

/// A single commit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub tree: String,
    pub author: Signature,
    pub committer: Signature,
    pub link: String,
}

/// General info about a commit carried in a push event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PushCommit {
    pub id: String,
    pub message: String,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<String>,
}

/// A git reference (branch or tag) and the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reference {
    pub name: String,
    pub path: String,
    pub sha: String,
}

/// A label attached to an issue or pull request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Label {
    pub url: String,
    pub name: String,
    pub description: String,
    pub color: String,
}

/// An issue in a repository's tracker.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Issue {
    pub number: i64,
    pub title: String,
    pub body: String,
    pub link: String,
    pub labels: Vec<String>,
    pub closed: bool,
    pub locked: bool,
    pub author: User,
    pub assignees: Vec<User>,
    pub pull_request: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// A comment on an issue or pull request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    pub id: i64,
    pub body: String,
    pub author: User,
    pub link: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// One side (source or target) of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PullRequestBranch {
    #[serde(rename = "ref")]
    pub reference: String,
    pub sha: String,
    pub repo: Repository,
}

/// A pull (or merge) request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PullRequest {
    pub number: i64,
    pub title: String,
    pub body: String,
    pub sha: String,
    #[serde(rename = "ref")]
    pub reference: String,
    /// Source branch name.
    pub source: String,
    /// Target branch name.
    pub target: String,
    pub base: PullRequestBranch,
    pub head: PullRequestBranch,
    pub fork: String,
    pub link: String,
    pub state: String,
    pub closed: bool,
    pub draft: bool,
    pub merged: bool,
    pub mergeable: bool,
    pub merge_sha: String,
    pub author: User,
    pub assignees: Vec<User>,
    pub reviewers: Vec<User>,
    pub labels: Vec<Label>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// A review comment left on a pull request diff.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Review {
    pub id: i64,
    pub body: String,
    pub path: String,
    pub sha: String,
    pub line: i64,
    pub link: String,
    pub state: String,
    pub author: User,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// Previous value of a changed field in a pull request event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PullRequestHookBranchFrom {
    pub from: String,
}

/// Previous state of a pull request's base branch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PullRequestHookBranch {
    #[serde(rename = "ref")]
    pub reference: PullRequestHookBranchFrom,
    pub sha: PullRequestHookBranchFrom,
    pub repo: Repository,
}

/// Changes reported alongside an edited pull request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PullRequestHookChanges {
    pub base: PullRequestHookBranch,
}
