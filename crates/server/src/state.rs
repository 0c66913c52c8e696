// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server state management.
//!
//! Wraps the issue store and clock for shared access from request handlers.

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use issues_core::{Clock, Database, IssueStore, MemoryStore, Result, SystemClock};

use crate::config::StoreConfig;

/// Shared server state containing the issue store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// The issue store; one request holds it for one store call.
    store: Mutex<Box<dyn IssueStore>>,
    /// Time source for created_on/updated_on.
    clock: Box<dyn Clock>,
}

impl AppState {
    /// Creates state around `store` using the system clock.
    pub fn new(store: impl IssueStore + 'static) -> Self {
        Self::with_clock(store, SystemClock)
    }

    /// Creates state around `store` with a custom clock.
    pub fn with_clock(store: impl IssueStore + 'static, clock: impl Clock + 'static) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                store: Mutex::new(Box::new(store)),
                clock: Box::new(clock),
            }),
        }
    }

    /// Opens the store described by `config`.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Ok(match config {
            StoreConfig::Memory => Self::new(MemoryStore::new()),
            StoreConfig::Sqlite { path } => Self::new(Database::open(path)?),
        })
    }

    /// Waits for exclusive access to the store.
    pub async fn store(&self) -> MutexGuard<'_, Box<dyn IssueStore>> {
        self.inner.store.lock().await
    }

    /// The clock handlers stamp issues with.
    pub fn clock(&self) -> &dyn Clock {
        self.inner.clock.as_ref()
    }
}
