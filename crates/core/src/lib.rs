// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! issues-core: Shared library for the project-scoped issue tracker
//!
//! This crate provides the issue data model, the store abstraction with its
//! in-memory and SQLite implementations, and the request handler used by the
//! issues-server HTTP binary.

pub mod clock;
pub mod db;
pub mod error;
pub mod filter;
pub mod id;
pub mod issue;
pub mod resource;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use db::Database;
pub use error::{Error, Result};
pub use filter::{FieldValue, Filter, IssueField};
pub use issue::{CreateIssue, DeleteIssue, Issue, IssueChanges, IssueDraft, IssuePatch, UpdateIssue};
pub use resource::{CreateOutcome, DeleteOutcome, Failure, IssueResource, Reply, UpdateOutcome};
pub use store::{DeleteResult, IssueKey, IssueStore, MemoryStore, UpdateResult};
