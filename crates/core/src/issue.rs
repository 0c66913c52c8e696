// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core issue types for the issue tracker.
//!
//! [`Issue`] is the stored record. The remaining types are the typed request
//! inputs ([`CreateIssue`], [`UpdateIssue`], [`DeleteIssue`]) and what the
//! handler hands to a store ([`IssueDraft`], [`IssuePatch`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A tracked ticket scoped to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Store-generated identifier, exposed as `_id` on the wire.
    #[serde(rename = "_id")]
    pub id: String,
    /// Project namespace, always taken from the route.
    pub project: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    /// Empty when nobody is assigned.
    pub assigned_to: String,
    pub status_text: String,
    pub created_on: DateTime<Utc>,
    /// Refreshed on every successful update.
    pub updated_on: DateTime<Utc>,
    pub open: bool,
}

impl Issue {
    /// Materializes a stored record from a draft and its assigned id.
    pub fn from_draft(id: String, draft: IssueDraft) -> Self {
        Issue {
            id,
            project: draft.project,
            issue_title: draft.issue_title,
            issue_text: draft.issue_text,
            created_by: draft.created_by,
            assigned_to: draft.assigned_to,
            status_text: draft.status_text,
            created_on: draft.created_on,
            updated_on: draft.updated_on,
            open: draft.open,
        }
    }
}

/// A fully defaulted issue awaiting an identifier from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueDraft {
    pub project: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub open: bool,
}

/// Body of a create request.
///
/// Every field is optional here so the handler, not the decoder, decides what
/// "missing" means. Keys outside this set (`project`, `_id`, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CreateIssue {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub created_on: Option<DateTime<Utc>>,
    pub updated_on: Option<DateTime<Utc>>,
    pub open: Option<bool>,
}

/// The updatable fields of an issue, each present only if supplied.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IssueChanges {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub created_on: Option<DateTime<Utc>>,
    pub open: Option<bool>,
}

impl IssueChanges {
    /// Returns true if no updatable field was supplied.
    pub fn is_empty(&self) -> bool {
        self.issue_title.is_none()
            && self.issue_text.is_none()
            && self.created_by.is_none()
            && self.assigned_to.is_none()
            && self.status_text.is_none()
            && self.created_on.is_none()
            && self.open.is_none()
    }

    /// Drops blank values for the fields an issue may never have empty.
    ///
    /// `assigned_to` and `status_text` keep an explicit `""`, which clears them.
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.issue_title,
            &mut self.issue_text,
            &mut self.created_by,
        ] {
            if field.as_deref().is_some_and(str::is_empty) {
                *field = None;
            }
        }
        self
    }

    /// Writes every supplied field into `issue`.
    pub fn apply(&self, issue: &mut Issue) {
        if let Some(ref v) = self.issue_title {
            issue.issue_title = v.clone();
        }
        if let Some(ref v) = self.issue_text {
            issue.issue_text = v.clone();
        }
        if let Some(ref v) = self.created_by {
            issue.created_by = v.clone();
        }
        if let Some(ref v) = self.assigned_to {
            issue.assigned_to = v.clone();
        }
        if let Some(ref v) = self.status_text {
            issue.status_text = v.clone();
        }
        if let Some(v) = self.created_on {
            issue.created_on = v;
        }
        if let Some(v) = self.open {
            issue.open = v;
        }
    }
}

/// Body of an update request: the target id plus the fields to change.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpdateIssue {
    #[serde(rename = "_id", deserialize_with = "scalar_id")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub changes: IssueChanges,
}

/// Body of a delete request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeleteIssue {
    #[serde(rename = "_id", deserialize_with = "scalar_id")]
    pub id: Option<String>,
}

/// A partial update as applied by a store: supplied fields plus the refresh time.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuePatch {
    pub changes: IssueChanges,
    pub updated_on: DateTime<Utc>,
}

impl IssuePatch {
    /// Creates a patch stamped with `updated_on`.
    pub fn new(changes: IssueChanges, updated_on: DateTime<Utc>) -> Self {
        IssuePatch {
            changes,
            updated_on,
        }
    }

    /// Applies the patch to an in-memory record.
    pub fn apply(&self, issue: &mut Issue) {
        self.changes.apply(issue);
        issue.updated_on = self.updated_on;
    }
}

/// An `_id` as clients send it. Numbers and booleans are kept as text so a
/// malformed identifier reaches the store and fails there, not in the decoder.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

fn scalar_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(s) => s,
        RawId::Integer(n) => n.to_string(),
        RawId::Float(n) => n.to_string(),
        RawId::Flag(b) => b.to_string(),
    }))
}

/// Non-blank identifier from a request body, if any.
pub(crate) fn supplied_id(id: Option<String>) -> Option<String> {
    id.filter(|id| !id.is_empty())
}

#[cfg(test)]
#[path = "issue_tests.rs"]
mod tests;
