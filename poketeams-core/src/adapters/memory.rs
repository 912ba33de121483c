//! In-memory slot store
//!
//! Used when nothing should touch disk (tests, throwaway sessions). Can be
//! switched into a failing mode to exercise write-failure handling.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::domain::result::{Error, Result};
use crate::ports::SlotStore;

#[derive(Default)]
pub struct InMemorySlotStore {
    slots: Mutex<BTreeMap<String, String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl InMemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put` fail (simulates a full disk / quota error)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }
}

impl SlotStore for InMemorySlotStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::database("storage quota exceeded"));
        }
        self.lock()?.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
