// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use serde_json::json;
use yare::parameterized;

fn sample_issue() -> Issue {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
    Issue {
        id: "65a1b2c3d4e5f60718293a4b".to_string(),
        project: "apitest".to_string(),
        issue_title: "Fix login".to_string(),
        issue_text: "Login fails on Safari".to_string(),
        created_by: "alice".to_string(),
        assigned_to: String::new(),
        status_text: String::new(),
        created_on: at,
        updated_on: at,
        open: true,
    }
}

#[test]
fn issue_serializes_id_as_underscore_id() {
    let value = serde_json::to_value(sample_issue()).unwrap();
    assert_eq!(value["_id"], "65a1b2c3d4e5f60718293a4b");
    assert!(value.get("id").is_none());
    assert_eq!(value["open"], true);
    assert_eq!(value["assigned_to"], "");
    assert_eq!(value.as_object().unwrap().len(), 10);
}

#[test]
fn issue_json_roundtrip_keeps_timestamps() {
    let issue = sample_issue();
    let text = serde_json::to_string(&issue).unwrap();
    let back: Issue = serde_json::from_str(&text).unwrap();
    assert_eq!(back, issue);
}

#[test]
fn create_issue_ignores_project_and_id_keys() {
    let input: CreateIssue = serde_json::from_value(json!({
        "issue_title": "t",
        "project": "elsewhere",
        "_id": "65a1b2c3d4e5f60718293a4b",
    }))
    .unwrap();
    assert_eq!(input.issue_title.as_deref(), Some("t"));
    assert_eq!(input.issue_text, None);
}

#[test]
fn create_issue_keeps_explicit_false() {
    let input: CreateIssue = serde_json::from_value(json!({"open": false})).unwrap();
    assert_eq!(input.open, Some(false));
}

#[test]
fn update_issue_splits_id_from_changes() {
    let input: UpdateIssue = serde_json::from_value(json!({
        "_id": "65a1b2c3d4e5f60718293a4b",
        "status_text": "In QA",
        "open": false,
    }))
    .unwrap();
    assert_eq!(input.id.as_deref(), Some("65a1b2c3d4e5f60718293a4b"));
    assert_eq!(input.changes.status_text.as_deref(), Some("In QA"));
    assert_eq!(input.changes.open, Some(false));
    assert!(!input.changes.is_empty());
}

#[test]
fn update_issue_ignores_updated_on_and_project() {
    let input: UpdateIssue = serde_json::from_value(json!({
        "_id": "65a1b2c3d4e5f60718293a4b",
        "updated_on": "2020-01-01T00:00:00Z",
        "project": "other",
    }))
    .unwrap();
    assert!(input.changes.is_empty());
}

#[parameterized(
    blank_title = { json!({"issue_title": ""}), true },
    blank_text = { json!({"issue_text": ""}), true },
    blank_author = { json!({"created_by": ""}), true },
    blank_assignee = { json!({"assigned_to": ""}), false },
    blank_status = { json!({"status_text": ""}), false },
    closed = { json!({"open": false}), false },
)]
fn changes_normalized_emptiness(body: serde_json::Value, empty_after: bool) {
    let changes: IssueChanges = serde_json::from_value(body).unwrap();
    assert!(!changes.is_empty());
    assert_eq!(changes.normalized().is_empty(), empty_after);
}

#[test]
fn patch_applies_supplied_fields_and_refreshes_updated_on() {
    let mut issue = sample_issue();
    let later = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let patch = IssuePatch::new(
        IssueChanges {
            issue_title: Some("Fix login on Safari".to_string()),
            open: Some(false),
            ..Default::default()
        },
        later,
    );

    patch.apply(&mut issue);

    assert_eq!(issue.issue_title, "Fix login on Safari");
    assert!(!issue.open);
    assert_eq!(issue.updated_on, later);
    assert_eq!(issue.issue_text, "Login fails on Safari");
    assert_ne!(issue.created_on, later);
}

#[test]
fn from_draft_copies_every_field() {
    let base = sample_issue();
    let draft = IssueDraft {
        project: base.project.clone(),
        issue_title: base.issue_title.clone(),
        issue_text: base.issue_text.clone(),
        created_by: base.created_by.clone(),
        assigned_to: base.assigned_to.clone(),
        status_text: base.status_text.clone(),
        created_on: base.created_on,
        updated_on: base.updated_on,
        open: base.open,
    };
    assert_eq!(Issue::from_draft(base.id.clone(), draft), base);
}

#[parameterized(
    missing = { None, None },
    blank = { Some(""), None },
    present = { Some("abc"), Some("abc") },
)]
fn supplied_id_treats_blank_as_missing(input: Option<&str>, expected: Option<&str>) {
    assert_eq!(
        supplied_id(input.map(str::to_string)).as_deref(),
        expected
    );
}

#[parameterized(
    text = { json!({"_id": "65a1b2c3d4e5f60718293a4b"}), Some("65a1b2c3d4e5f60718293a4b") },
    integer = { json!({"_id": 123}), Some("123") },
    negative = { json!({"_id": -7}), Some("-7") },
    float = { json!({"_id": 1.5}), Some("1.5") },
    flag = { json!({"_id": true}), Some("true") },
    null = { json!({"_id": null}), None },
    absent = { json!({}), None },
)]
fn scalar_ids_decode_as_text(body: serde_json::Value, expected: Option<&str>) {
    let delete: DeleteIssue = serde_json::from_value(body.clone()).unwrap();
    assert_eq!(delete.id.as_deref(), expected);

    let update: UpdateIssue = serde_json::from_value(body).unwrap();
    assert_eq!(update.id.as_deref(), expected);
}

#[test]
fn numeric_id_keeps_update_fields() {
    let input: UpdateIssue =
        serde_json::from_value(json!({"_id": 123, "issue_title": "a"})).unwrap();
    assert_eq!(input.id.as_deref(), Some("123"));
    assert_eq!(input.changes.issue_title.as_deref(), Some("a"));
}

#[test]
fn structured_id_is_rejected() {
    assert!(serde_json::from_value::<DeleteIssue>(json!({"_id": {"$ne": null}})).is_err());
}
