//
//  scm-transport
//  webhook/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Webhook Event Model
//!
//! Provider-agnostic webhook events. Each provider adapter turns its own
//! delivery payloads into one of the nine concrete hook types below; consumers
//! then work with the closed [`Webhook`] union.
//!
//! ## Variants
//!
//! | Type | Discriminator |
//! |------|---------------|
//! | [`PushHook`] | `pushHook` |
//! | [`BranchHook`] | `branchHook` |
//! | [`TagHook`] | `tagHook` |
//! | [`DeployHook`] | `deployHook` |
//! | [`IssueHook`] | `issueHook` |
//! | [`IssueCommentHook`] | `issueCommentHook` |
//! | [`PullRequestHook`] | `pullRequestHook` |
//! | [`PullRequestCommentHook`] | `pullRequestCommentHook` |
//! | [`ReviewCommentHook`] | `reviewCommentHook` |
//!
//! Every variant carries the repository it was raised for, reachable through
//! [`Webhook::repository`] without matching on the variant.
//!
//! ## Wire Format
//!
//! Events serialize to a JSON object whose first key is `type` (the
//! discriminator) followed by the variant's fields in camelCase. See
//! [`codec`] for the encode/decode entry points.
//!
//! Adapters that accept inbound deliveries implement [`WebhookService`].
//!
//! ```rust
//! use scm_transport::webhook::{self, PushHook, Webhook};
//!
//! let hook = Webhook::from(PushHook {
//!     after: "6d2f1c".to_string(),
//!     ..Default::default()
//! });
//!
//! let bytes = webhook::encode(&hook).unwrap();
//! let decoded = webhook::decode(&bytes).unwrap();
//! assert_eq!(decoded.kind, "pushHook");
//! assert_eq!(decoded.webhook, hook);
//! ```

pub mod codec;

pub mod service;

pub use codec::{decode, encode, from_value, WebhookError, WebhookUnmarshaler};
pub use service::{verify_token, SecretFn, WebhookService};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::scm::{
    Action, Comment, Commit, Issue, Label, PullRequest, PullRequestHookChanges, PushCommit,
    Reference, Repository, Review, User,
};

/// Behaviour shared by every concrete hook type.
///
/// `KIND` is the discriminator written to and read from the `type` key; the
/// decode table in [`codec`] is built from these constants.
pub trait Hook: Serialize + DeserializeOwned + Into<Webhook> {
    /// Discriminator literal for this hook type.
    const KIND: &'static str;

    /// Repository the event was raised for.
    fn repository(&self) -> &Repository;
}

/// A push to a branch or tag.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PushHook {
    #[serde(rename = "ref")]
    pub reference: String,
    pub base_ref: String,
    pub repo: Repository,
    pub before: String,
    pub after: String,
    pub created: bool,
    pub deleted: bool,
    pub forced: bool,
    pub compare: String,
    pub commits: Vec<PushCommit>,
    /// Head commit of the push.
    pub commit: Commit,
    pub sender: User,
    pub guid: String,
}

/// A branch was created or deleted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BranchHook {
    #[serde(rename = "ref")]
    pub reference: Reference,
    pub repo: Repository,
    pub action: Action,
    pub sender: User,
}

/// A tag was created or deleted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TagHook {
    #[serde(rename = "ref")]
    pub reference: Reference,
    pub repo: Repository,
    pub action: Action,
    pub sender: User,
}

/// A deployment was requested.
///
/// `data` is the provider's free-form deployment payload and is kept as raw
/// JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeployHook {
    pub data: serde_json::Value,
    pub desc: String,
    #[serde(rename = "ref")]
    pub reference: Reference,
    pub repo: Repository,
    pub sender: User,
    pub target: String,
    pub target_url: String,
    pub task: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssueHook {
    pub action: Action,
    pub repo: Repository,
    pub issue: Issue,
    pub sender: User,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssueCommentHook {
    pub action: Action,
    pub repo: Repository,
    pub issue: Issue,
    pub comment: Comment,
    pub sender: User,
}

/// A pull request was opened, edited, labeled, merged, ...
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PullRequestHook {
    pub action: Action,
    pub repo: Repository,
    /// Label added or removed, for labeled/unlabeled actions.
    pub label: Label,
    pub pull_request: PullRequest,
    pub sender: User,
    pub changes: PullRequestHookChanges,
    pub guid: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PullRequestCommentHook {
    pub action: Action,
    pub repo: Repository,
    pub pull_request: PullRequest,
    pub comment: Comment,
    pub sender: User,
}

/// A review comment on a pull request diff.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewCommentHook {
    pub action: Action,
    pub repo: Repository,
    pub pull_request: PullRequest,
    pub review: Review,
}

/// Any webhook event.
///
/// Serializes with the `type` discriminator as its first key. Deserialization
/// goes through [`codec::from_value`] so unknown discriminators and shape
/// mismatches are reported as distinct errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Webhook {
    #[serde(rename = "pushHook")]
    Push(PushHook),
    #[serde(rename = "branchHook")]
    Branch(BranchHook),
    #[serde(rename = "tagHook")]
    Tag(TagHook),
    #[serde(rename = "deployHook")]
    Deploy(DeployHook),
    #[serde(rename = "issueHook")]
    Issue(IssueHook),
    #[serde(rename = "issueCommentHook")]
    IssueComment(IssueCommentHook),
    #[serde(rename = "pullRequestHook")]
    PullRequest(PullRequestHook),
    #[serde(rename = "pullRequestCommentHook")]
    PullRequestComment(PullRequestCommentHook),
    #[serde(rename = "reviewCommentHook")]
    ReviewComment(ReviewCommentHook),
}

macro_rules! impl_hook {
    ($hook:ty, $variant:ident, $kind:literal) => {
        impl Hook for $hook {
            const KIND: &'static str = $kind;

            fn repository(&self) -> &Repository {
                &self.repo
            }
        }

        impl From<$hook> for Webhook {
            fn from(hook: $hook) -> Self {
                Webhook::$variant(hook)
            }
        }
    };
}

impl_hook!(PushHook, Push, "pushHook");
impl_hook!(BranchHook, Branch, "branchHook");
impl_hook!(TagHook, Tag, "tagHook");
impl_hook!(DeployHook, Deploy, "deployHook");
impl_hook!(IssueHook, Issue, "issueHook");
impl_hook!(IssueCommentHook, IssueComment, "issueCommentHook");
impl_hook!(PullRequestHook, PullRequest, "pullRequestHook");
impl_hook!(PullRequestCommentHook, PullRequestComment, "pullRequestCommentHook");
impl_hook!(ReviewCommentHook, ReviewComment, "reviewCommentHook");

impl Webhook {
    /// Returns the repository this event belongs to.
    pub fn repository(&self) -> &Repository {
        match self {
            Webhook::Push(h) => h.repository(),
            Webhook::Branch(h) => h.repository(),
            Webhook::Tag(h) => h.repository(),
            Webhook::Deploy(h) => h.repository(),
            Webhook::Issue(h) => h.repository(),
            Webhook::IssueComment(h) => h.repository(),
            Webhook::PullRequest(h) => h.repository(),
            Webhook::PullRequestComment(h) => h.repository(),
            Webhook::ReviewComment(h) => h.repository(),
        }
    }

    /// Returns the discriminator this event is encoded with.
    pub fn kind(&self) -> &'static str {
        match self {
            Webhook::Push(_) => PushHook::KIND,
            Webhook::Branch(_) => BranchHook::KIND,
            Webhook::Tag(_) => TagHook::KIND,
            Webhook::Deploy(_) => DeployHook::KIND,
            Webhook::Issue(_) => IssueHook::KIND,
            Webhook::IssueComment(_) => IssueCommentHook::KIND,
            Webhook::PullRequest(_) => PullRequestHook::KIND,
            Webhook::PullRequestComment(_) => PullRequestCommentHook::KIND,
            Webhook::ReviewComment(_) => ReviewCommentHook::KIND,
        }
    }
}

impl<'de> Deserialize<'de> for Webhook {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        WebhookUnmarshaler::deserialize(deserializer).map(|unmarshaled| unmarshaled.webhook)
    }
}
