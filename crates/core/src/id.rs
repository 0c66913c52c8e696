// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Issue identifiers.
//!
//! Format: 24 lowercase hex characters. The first 8 encode the creation time in
//! Unix seconds, the remaining 16 come from a SHA-256 digest over the project,
//! the timestamp, the process id and a process-wide counter.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};

/// Length of an issue identifier in characters.
pub const ID_LEN: usize = 24;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh identifier for an issue in `project` created at `at`.
pub fn generate_id(project: &str, at: &DateTime<Utc>) -> String {
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let input = format!(
        "{}{}{}{}",
        project,
        at.to_rfc3339(),
        std::process::id(),
        seq
    );
    let hash = Sha256::digest(input.as_bytes());
    // Seconds are truncated to 32 bits, same as a document-store ObjectId.
    format!("{:08x}{}", at.timestamp() as u32, hex::encode(&hash[..8]))
}

/// Returns true if `id` is syntactically a valid identifier.
pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

/// Validate identifier syntax, failing with [`Error::InvalidId`].
pub fn validate_id(id: &str) -> Result<()> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(Error::InvalidId(id.to_string()))
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
