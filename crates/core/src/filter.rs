// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Equality filters over issue fields.
//!
//! A [`Filter`] is a conjunction of `field == value` conditions. The route
//! project is always the first condition; query-string pairs add more.
//! Raw query values are cast to the field's type before comparison.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::id;
use crate::issue::Issue;

/// A stored issue field, named as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueField {
    Id,
    Project,
    IssueTitle,
    IssueText,
    CreatedBy,
    AssignedTo,
    StatusText,
    CreatedOn,
    UpdatedOn,
    Open,
}

impl IssueField {
    /// Every field, in record order.
    pub const ALL: [IssueField; 10] = [
        IssueField::Id,
        IssueField::Project,
        IssueField::IssueTitle,
        IssueField::IssueText,
        IssueField::CreatedBy,
        IssueField::AssignedTo,
        IssueField::StatusText,
        IssueField::CreatedOn,
        IssueField::UpdatedOn,
        IssueField::Open,
    ];

    /// Returns the wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueField::Id => "_id",
            IssueField::Project => "project",
            IssueField::IssueTitle => "issue_title",
            IssueField::IssueText => "issue_text",
            IssueField::CreatedBy => "created_by",
            IssueField::AssignedTo => "assigned_to",
            IssueField::StatusText => "status_text",
            IssueField::CreatedOn => "created_on",
            IssueField::UpdatedOn => "updated_on",
            IssueField::Open => "open",
        }
    }

    /// Returns the storage column backing the field.
    pub fn column(&self) -> &'static str {
        match self {
            IssueField::Id => "id",
            other => other.as_str(),
        }
    }

    /// Casts a raw query value to this field's type.
    pub fn cast(&self, raw: &str) -> Result<FieldValue> {
        let invalid = || Error::InvalidFilter {
            field: self.as_str().to_string(),
            value: raw.to_string(),
        };
        match self {
            IssueField::Id => {
                if id::is_valid_id(raw) {
                    Ok(FieldValue::Text(raw.to_string()))
                } else {
                    Err(invalid())
                }
            }
            IssueField::CreatedOn | IssueField::UpdatedOn => {
                parse_time(raw).map(FieldValue::Time).ok_or_else(invalid)
            }
            IssueField::Open => parse_flag(raw).map(FieldValue::Flag).ok_or_else(invalid),
            _ => Ok(FieldValue::Text(raw.to_string())),
        }
    }

    /// Reads this field's value out of an issue.
    pub fn value_of(&self, issue: &Issue) -> FieldValue {
        match self {
            IssueField::Id => FieldValue::Text(issue.id.clone()),
            IssueField::Project => FieldValue::Text(issue.project.clone()),
            IssueField::IssueTitle => FieldValue::Text(issue.issue_title.clone()),
            IssueField::IssueText => FieldValue::Text(issue.issue_text.clone()),
            IssueField::CreatedBy => FieldValue::Text(issue.created_by.clone()),
            IssueField::AssignedTo => FieldValue::Text(issue.assigned_to.clone()),
            IssueField::StatusText => FieldValue::Text(issue.status_text.clone()),
            IssueField::CreatedOn => FieldValue::Time(issue.created_on),
            IssueField::UpdatedOn => FieldValue::Time(issue.updated_on),
            IssueField::Open => FieldValue::Flag(issue.open),
        }
    }
}

impl fmt::Display for IssueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IssueField {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        IssueField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or(())
    }
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Time(DateTime<Utc>),
    Flag(bool),
}

/// One `field == value` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: IssueField,
    pub value: FieldValue,
}

/// A conjunction of equality conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
    /// Set when a condition names a field no issue has.
    unsatisfiable: bool,
}

impl Filter {
    /// Matches every issue in `project`.
    pub fn for_project(project: &str) -> Self {
        Filter {
            conditions: vec![Condition {
                field: IssueField::Project,
                value: FieldValue::Text(project.to_string()),
            }],
            unsatisfiable: false,
        }
    }

    /// Builds a filter from the route project and raw query-string pairs.
    ///
    /// Unknown keys make the filter match nothing. A `project` key narrows
    /// further and never replaces the route project.
    pub fn from_query<K, V>(project: &str, pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = Filter::for_project(project);
        for (key, value) in pairs {
            match key.as_ref().parse::<IssueField>() {
                Ok(field) => {
                    let value = field.cast(value.as_ref())?;
                    filter = filter.and(field, value);
                }
                Err(()) => filter.unsatisfiable = true,
            }
        }
        Ok(filter)
    }

    /// Adds a condition (builder pattern).
    pub fn and(mut self, field: IssueField, value: FieldValue) -> Self {
        self.conditions.push(Condition { field, value });
        self
    }

    /// The conditions, route project first.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Returns true if no issue can ever match.
    pub fn is_unsatisfiable(&self) -> bool {
        self.unsatisfiable
    }

    /// Evaluates the filter against an issue.
    pub fn matches(&self, issue: &Issue) -> bool {
        !self.unsatisfiable
            && self
                .conditions
                .iter()
                .all(|c| c.field.value_of(issue) == c.value)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
