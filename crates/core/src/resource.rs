// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The issue resource handler.
//!
//! An [`IssueResource`] is bound to one project for the duration of a request.
//! Each operation validates its input, performs at most one store call and
//! returns an outcome the HTTP layer renders as JSON.
//!
//! Wire contract:
//! - validation failures are reported before the store is touched
//! - update/delete failures share one payload shape whatever the cause;
//!   the cause is kept on the outcome as a [`Failure`] for logging only

use serde::Serialize;

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::issue::{
    supplied_id, CreateIssue, DeleteIssue, Issue, IssueDraft, IssuePatch, UpdateIssue,
};
use crate::store::{IssueKey, IssueStore};

pub const MISSING_FIELDS: &str = "required field(s) missing";
pub const MISSING_ID: &str = "missing _id";
pub const NO_UPDATE_FIELDS: &str = "no update field(s) sent";
pub const COULD_NOT_UPDATE: &str = "could not update";
pub const COULD_NOT_DELETE: &str = "could not delete";
pub const UPDATED: &str = "successfully updated";
pub const DELETED: &str = "successfully deleted";

/// Why an update or delete did not take effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The identifier is not well formed.
    InvalidId,
    /// No issue in the project has the identifier.
    NotFound,
    /// The store reported an error.
    Store(String),
}

impl Failure {
    /// Short label for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Failure::InvalidId => "invalid_id",
            Failure::NotFound => "not_found",
            Failure::Store(_) => "store",
        }
    }

    fn from_error(err: Error) -> Self {
        match err {
            Error::InvalidId(_) => Failure::InvalidId,
            other => Failure::Store(other.to_string()),
        }
    }
}

/// Result of a create request.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(Issue),
    MissingFields,
}

/// Result of an update request.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated { id: String },
    MissingId,
    NoFields { id: String },
    Failed { id: String, failure: Failure },
}

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted { id: String },
    MissingId,
    Failed { id: String, failure: Failure },
}

/// JSON acknowledgement body: `{result, _id}` or `{error[, _id]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Success {
        result: &'static str,
        #[serde(rename = "_id")]
        id: String,
    },
    Error {
        error: &'static str,
        #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
}

impl Reply {
    fn success(result: &'static str, id: String) -> Self {
        Reply::Success { result, id }
    }

    fn error(error: &'static str, id: Option<String>) -> Self {
        Reply::Error { error, id }
    }

    /// The payload for a create request lacking required fields.
    pub fn missing_fields() -> Self {
        Reply::error(MISSING_FIELDS, None)
    }
}

impl From<UpdateOutcome> for Reply {
    fn from(outcome: UpdateOutcome) -> Self {
        match outcome {
            UpdateOutcome::Updated { id } => Reply::success(UPDATED, id),
            UpdateOutcome::MissingId => Reply::error(MISSING_ID, None),
            UpdateOutcome::NoFields { id } => Reply::error(NO_UPDATE_FIELDS, Some(id)),
            UpdateOutcome::Failed { id, .. } => Reply::error(COULD_NOT_UPDATE, Some(id)),
        }
    }
}

impl From<DeleteOutcome> for Reply {
    fn from(outcome: DeleteOutcome) -> Self {
        match outcome {
            DeleteOutcome::Deleted { id } => Reply::success(DELETED, id),
            DeleteOutcome::MissingId => Reply::error(MISSING_ID, None),
            DeleteOutcome::Failed { id, .. } => Reply::error(COULD_NOT_DELETE, Some(id)),
        }
    }
}

/// Handler for `/api/issues/{project}`, bound to one project.
pub struct IssueResource<'a, S: IssueStore + ?Sized> {
    project: &'a str,
    store: &'a mut S,
    clock: &'a dyn Clock,
}

impl<'a, S: IssueStore + ?Sized> IssueResource<'a, S> {
    pub fn new(project: &'a str, store: &'a mut S, clock: &'a dyn Clock) -> Self {
        IssueResource {
            project,
            store,
            clock,
        }
    }

    /// Lists issues in the project matching every query pair.
    pub fn list<K, V>(&self, query: impl IntoIterator<Item = (K, V)>) -> Result<Vec<Issue>>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let filter = Filter::from_query(self.project, query)?;
        self.store.find(&filter)
    }

    /// Creates an issue, defaulting every optional field that is absent or blank.
    ///
    /// An explicit `open: false` is kept.
    pub fn create(&mut self, input: CreateIssue) -> Result<CreateOutcome> {
        let CreateIssue {
            issue_title,
            issue_text,
            created_by,
            assigned_to,
            status_text,
            created_on,
            updated_on,
            open,
        } = input;

        let (Some(issue_title), Some(issue_text), Some(created_by)) = (
            non_blank(issue_title),
            non_blank(issue_text),
            non_blank(created_by),
        ) else {
            return Ok(CreateOutcome::MissingFields);
        };

        let now = self.clock.now();
        let draft = IssueDraft {
            project: self.project.to_string(),
            issue_title,
            issue_text,
            created_by,
            assigned_to: assigned_to.unwrap_or_default(),
            status_text: status_text.unwrap_or_default(),
            created_on: created_on.unwrap_or(now),
            updated_on: updated_on.unwrap_or(now),
            open: open.unwrap_or(true),
        };

        let issue = self.store.insert_one(draft)?;
        Ok(CreateOutcome::Created(issue))
    }

    /// Applies a partial update to one issue and refreshes `updated_on`.
    pub fn update(&mut self, input: UpdateIssue) -> UpdateOutcome {
        let Some(id) = supplied_id(input.id) else {
            return UpdateOutcome::MissingId;
        };

        let changes = input.changes.normalized();
        if changes.is_empty() {
            return UpdateOutcome::NoFields { id };
        }

        let patch = IssuePatch::new(changes, self.clock.now());
        let key = IssueKey::new(self.project, id.clone());
        match self.store.update_one(&key, &patch) {
            Ok(result) if result.matched > 0 => UpdateOutcome::Updated { id },
            Ok(_) => UpdateOutcome::Failed {
                id,
                failure: Failure::NotFound,
            },
            Err(err) => UpdateOutcome::Failed {
                id,
                failure: Failure::from_error(err),
            },
        }
    }

    /// Deletes one issue.
    pub fn delete(&mut self, input: DeleteIssue) -> DeleteOutcome {
        let Some(id) = supplied_id(input.id) else {
            return DeleteOutcome::MissingId;
        };

        let key = IssueKey::new(self.project, id.clone());
        match self.store.delete_one(&key) {
            Ok(result) if result.deleted > 0 => DeleteOutcome::Deleted { id },
            Ok(_) => DeleteOutcome::Failed {
                id,
                failure: Failure::NotFound,
            },
            Err(err) => DeleteOutcome::Failed {
                id,
                failure: Failure::from_error(err),
            },
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
