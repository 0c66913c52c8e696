// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Document-collection abstraction the handler talks to.
//!
//! [`IssueStore`] mirrors a generic document collection: filtered find,
//! insert, partial update by key and delete by key. [`MemoryStore`] keeps
//! everything in a `Vec`; [`crate::db::Database`] persists to SQLite.

use chrono::Utc;

use crate::error::Result;
use crate::filter::Filter;
use crate::id;
use crate::issue::{Issue, IssueDraft, IssuePatch};

/// Selects a single issue: `{project, _id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueKey {
    pub project: String,
    pub id: String,
}

impl IssueKey {
    /// Creates a key for `id` within `project`.
    pub fn new(project: impl Into<String>, id: impl Into<String>) -> Self {
        IssueKey {
            project: project.into(),
            id: id.into(),
        }
    }

    /// Returns true if `issue` is the record this key selects.
    pub fn selects(&self, issue: &Issue) -> bool {
        issue.project == self.project && issue.id == self.id
    }
}

/// Outcome of [`IssueStore::update_one`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateResult {
    /// Number of records the key matched (0 or 1).
    pub matched: u64,
}

/// Outcome of [`IssueStore::delete_one`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteResult {
    /// Number of records removed (0 or 1).
    pub deleted: u64,
}

/// A collection of issue records.
///
/// Implementations reject a malformed identifier in a key with
/// [`crate::Error::InvalidId`].
pub trait IssueStore: Send {
    /// Returns every issue matching `filter`, in insertion order.
    fn find(&self, filter: &Filter) -> Result<Vec<Issue>>;

    /// Stores a new issue and returns it with its generated id.
    fn insert_one(&mut self, draft: IssueDraft) -> Result<Issue>;

    /// Applies `patch` to the issue selected by `key`, if any.
    fn update_one(&mut self, key: &IssueKey, patch: &IssuePatch) -> Result<UpdateResult>;

    /// Removes the issue selected by `key`, if any.
    fn delete_one(&mut self, key: &IssueKey) -> Result<DeleteResult>;
}

impl<S: IssueStore + ?Sized> IssueStore for Box<S> {
    fn find(&self, filter: &Filter) -> Result<Vec<Issue>> {
        (**self).find(filter)
    }

    fn insert_one(&mut self, draft: IssueDraft) -> Result<Issue> {
        (**self).insert_one(draft)
    }

    fn update_one(&mut self, key: &IssueKey, patch: &IssuePatch) -> Result<UpdateResult> {
        (**self).update_one(key, patch)
    }

    fn delete_one(&mut self, key: &IssueKey) -> Result<DeleteResult> {
        (**self).delete_one(key)
    }
}

/// In-process store for tests and throwaway servers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    issues: Vec<Issue>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of issues across all projects.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns true if the store holds no issues.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl IssueStore for MemoryStore {
    fn find(&self, filter: &Filter) -> Result<Vec<Issue>> {
        Ok(self
            .issues
            .iter()
            .filter(|issue| filter.matches(issue))
            .cloned()
            .collect())
    }

    fn insert_one(&mut self, draft: IssueDraft) -> Result<Issue> {
        let mut id = id::generate_id(&draft.project, &Utc::now());
        while self.issues.iter().any(|i| i.id == id) {
            id = id::generate_id(&draft.project, &Utc::now());
        }
        let issue = Issue::from_draft(id, draft);
        self.issues.push(issue.clone());
        Ok(issue)
    }

    fn update_one(&mut self, key: &IssueKey, patch: &IssuePatch) -> Result<UpdateResult> {
        id::validate_id(&key.id)?;
        let matched = match self.issues.iter_mut().find(|i| key.selects(i)) {
            Some(issue) => {
                patch.apply(issue);
                1
            }
            None => 0,
        };
        Ok(UpdateResult { matched })
    }

    fn delete_one(&mut self, key: &IssueKey) -> Result<DeleteResult> {
        id::validate_id(&key.id)?;
        let deleted = match self.issues.iter().position(|i| key.selects(i)) {
            Some(index) => {
                self.issues.remove(index);
                1
            }
            None => 0,
        };
        Ok(DeleteResult { deleted })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
pub(crate) mod tests;
