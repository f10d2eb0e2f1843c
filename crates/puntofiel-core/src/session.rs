//! # Session State
//!
//! Process-local, advisory state for one signed-in owner session.
//!
//! ## Thread Safety
//! The store is wrapped in a `Mutex` because several UI actions may touch
//! it concurrently; callers share it behind an `Arc`. It is created at
//! session start and cleared at logout — explicitly scoped and injectable,
//! never a module-level singleton, so tests cannot leak into each other.
//!
//! ## What Lives Here
//! When an owner creates an employee account without choosing a password,
//! a temporary one is generated and parked here so the owner can read it
//! back and hand it over. Entries expire after 24 hours and are swept
//! lazily on every read and write. None of this is consistency-critical:
//! losing the store loses nothing but a convenience display.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::TEMP_PASSWORD_TTL_HOURS;

#[derive(Debug, Clone)]
struct StoredPassword {
    password: String,
    issued_at: DateTime<Utc>,
}

/// Maps an employee-account id to its freshly generated temporary password.
#[derive(Debug)]
pub struct TempPasswordStore {
    ttl: Duration,
    entries: Mutex<HashMap<String, StoredPassword>>,
}

impl TempPasswordStore {
    /// Creates a store with the standard 24-hour entry lifetime.
    pub fn new() -> Self {
        TempPasswordStore {
            ttl: Duration::hours(TEMP_PASSWORD_TTL_HOURS),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a store with a custom lifetime.
    pub fn with_ttl(ttl: Duration) -> Self {
        TempPasswordStore {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Records a password for an employee id.
    pub fn insert(&self, employee_id: impl Into<String>, password: impl Into<String>) {
        self.insert_at(employee_id, password, Utc::now());
    }

    /// Returns the password for an employee id, if present and not expired.
    pub fn get(&self, employee_id: &str) -> Option<String> {
        self.get_at(employee_id, Utc::now())
    }

    /// Drops one entry (e.g. after the owner confirms the hand-over).
    pub fn remove(&self, employee_id: &str) {
        let mut entries = self.entries.lock().expect("password store mutex poisoned");
        entries.remove(employee_id);
    }

    /// Empties the store. Called at logout.
    pub fn clear(&self) {
        let mut entries = self.entries.lock().expect("password store mutex poisoned");
        entries.clear();
    }

    /// Number of live entries (expired ones are swept first).
    pub fn len(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.lock().expect("password store mutex poisoned");
        Self::sweep(&mut entries, self.ttl, now);
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Time-parameterized internals keep expiry testable without sleeping.

    fn insert_at(
        &self,
        employee_id: impl Into<String>,
        password: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        let mut entries = self.entries.lock().expect("password store mutex poisoned");
        Self::sweep(&mut entries, self.ttl, now);
        entries.insert(
            employee_id.into(),
            StoredPassword {
                password: password.into(),
                issued_at: now,
            },
        );
    }

    fn get_at(&self, employee_id: &str, now: DateTime<Utc>) -> Option<String> {
        let mut entries = self.entries.lock().expect("password store mutex poisoned");
        Self::sweep(&mut entries, self.ttl, now);
        entries.get(employee_id).map(|e| e.password.clone())
    }

    fn sweep(entries: &mut HashMap<String, StoredPassword>, ttl: Duration, now: DateTime<Utc>) {
        entries.retain(|_, e| now - e.issued_at <= ttl);
    }
}

impl Default for TempPasswordStore {
    fn default() -> Self {
        TempPasswordStore::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
