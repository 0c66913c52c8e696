// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed issue store.
//!
//! The [`Database`] struct implements [`IssueStore`] over a single `issues`
//! table. Filters compile to a parameterized `WHERE` clause.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::path::Path;

use crate::error::{Error, Result};
use crate::filter::{FieldValue, Filter};
use crate::id;
use crate::issue::{Issue, IssueDraft, IssuePatch};
use crate::store::{DeleteResult, IssueKey, IssueStore, UpdateResult};

/// SQL schema for the issue store.
pub const SCHEMA: &str = r#"
-- seq preserves insertion order for unordered finds
CREATE TABLE IF NOT EXISTS issues (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    project TEXT NOT NULL,
    issue_title TEXT NOT NULL,
    issue_text TEXT NOT NULL,
    created_by TEXT NOT NULL,
    assigned_to TEXT NOT NULL DEFAULT '',
    status_text TEXT NOT NULL DEFAULT '',
    created_on TEXT NOT NULL,
    updated_on TEXT NOT NULL,
    open INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_issues_project ON issues(project);
"#;

const SELECT_COLUMNS: &str = "id, project, issue_title, issue_text, created_by, assigned_to,
        status_text, created_on, updated_on, open";

/// Format a timestamp for storage.
///
/// One instant always maps to one string, so equality filters work in SQL.
fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

fn row_to_issue(row: &Row<'_>) -> std::result::Result<Issue, rusqlite::Error> {
    let created_str: String = row.get(7)?;
    let updated_str: String = row.get(8)?;
    Ok(Issue {
        id: row.get(0)?,
        project: row.get(1)?,
        issue_title: row.get(2)?,
        issue_text: row.get(3)?,
        created_by: row.get(4)?,
        assigned_to: row.get(5)?,
        status_text: row.get(6)?,
        created_on: parse_timestamp(&created_str, "created_on")?,
        updated_on: parse_timestamp(&updated_str, "updated_on")?,
        open: row.get(9)?,
    })
}

fn to_sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(s) => Value::Text(s.clone()),
        FieldValue::Time(dt) => Value::Text(format_timestamp(dt)),
        FieldValue::Flag(b) => Value::Integer(i64::from(*b)),
    }
}

/// Run schema creation on a database connection.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// SQLite database connection holding issue records.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database connection at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // WAL lets readers proceed while a write is in flight
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Check whether an issue id is already taken in any project.
    pub fn issue_exists(&self, id: &str) -> Result<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM issues WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn unique_id(&self, project: &str) -> Result<String> {
        loop {
            let candidate = id::generate_id(project, &Utc::now());
            if !self.issue_exists(&candidate)? {
                return Ok(candidate);
            }
        }
    }
}

impl IssueStore for Database {
    fn find(&self, filter: &Filter) -> Result<Vec<Issue>> {
        if filter.is_unsatisfiable() {
            return Ok(Vec::new());
        }

        let mut clauses = Vec::with_capacity(filter.conditions().len());
        let mut values = Vec::with_capacity(filter.conditions().len());
        for (i, condition) in filter.conditions().iter().enumerate() {
            clauses.push(format!("{} = ?{}", condition.field.column(), i + 1));
            values.push(to_sql_value(&condition.value));
        }
        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let sql = format!("SELECT {SELECT_COLUMNS} FROM issues {where_clause} ORDER BY seq");
        let mut stmt = self.conn.prepare(&sql)?;
        let issues = stmt
            .query_map(params_from_iter(values), row_to_issue)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(issues)
    }

    fn insert_one(&mut self, draft: IssueDraft) -> Result<Issue> {
        let id = self.unique_id(&draft.project)?;
        let issue = Issue::from_draft(id, draft);
        self.conn.execute(
            "INSERT INTO issues (id, project, issue_title, issue_text, created_by,
             assigned_to, status_text, created_on, updated_on, open)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                issue.id,
                issue.project,
                issue.issue_title,
                issue.issue_text,
                issue.created_by,
                issue.assigned_to,
                issue.status_text,
                format_timestamp(&issue.created_on),
                format_timestamp(&issue.updated_on),
                issue.open,
            ],
        )?;
        Ok(issue)
    }

    fn update_one(&mut self, key: &IssueKey, patch: &IssuePatch) -> Result<UpdateResult> {
        id::validate_id(&key.id)?;

        let changes = &patch.changes;
        let mut assignments: Vec<(&str, Value)> = Vec::new();
        if let Some(ref v) = changes.issue_title {
            assignments.push(("issue_title", Value::Text(v.clone())));
        }
        if let Some(ref v) = changes.issue_text {
            assignments.push(("issue_text", Value::Text(v.clone())));
        }
        if let Some(ref v) = changes.created_by {
            assignments.push(("created_by", Value::Text(v.clone())));
        }
        if let Some(ref v) = changes.assigned_to {
            assignments.push(("assigned_to", Value::Text(v.clone())));
        }
        if let Some(ref v) = changes.status_text {
            assignments.push(("status_text", Value::Text(v.clone())));
        }
        if let Some(ref v) = changes.created_on {
            assignments.push(("created_on", Value::Text(format_timestamp(v))));
        }
        if let Some(v) = changes.open {
            assignments.push(("open", Value::Integer(i64::from(v))));
        }
        assignments.push(("updated_on", Value::Text(format_timestamp(&patch.updated_on))));

        let set_clause = assignments
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ?{}", column, i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let n = assignments.len();
        let sql = format!(
            "UPDATE issues SET {set_clause} WHERE project = ?{} AND id = ?{}",
            n + 1,
            n + 2
        );

        let mut values: Vec<Value> = assignments.into_iter().map(|(_, v)| v).collect();
        values.push(Value::Text(key.project.clone()));
        values.push(Value::Text(key.id.clone()));

        let matched = self.conn.execute(&sql, params_from_iter(values))?;
        Ok(UpdateResult {
            matched: matched as u64,
        })
    }

    fn delete_one(&mut self, key: &IssueKey) -> Result<DeleteResult> {
        id::validate_id(&key.id)?;
        let deleted = self.conn.execute(
            "DELETE FROM issues WHERE project = ?1 AND id = ?2",
            params![key.project, key.id],
        )?;
        Ok(DeleteResult {
            deleted: deleted as u64,
        })
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
