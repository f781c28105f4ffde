//! String interner implementation using DashMap for concurrent access.
//!
//! Interned strings are leaked to obtain `'static` references. This is
//! bounded by source size and lets [`super::Symbol::as_str`] avoid any
//! lifetime bookkeeping.

use std::sync::{LazyLock, Mutex};

use ahash::RandomState;
use dashmap::DashMap;

/// Global string table instance, initialized on first use.
pub(super) static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(StringTable::new);

/// Thread-safe string table.
///
/// The forward map (string -> index) is a lock-free `DashMap` with `ahash`
/// hashing; the reverse table (index -> string) is a plain `Mutex<Vec<_>>`,
/// which also serializes index assignment on an intern miss.
pub(super) struct StringTable {
    map: DashMap<&'static str, u32, RandomState>,
    strings: Mutex<Vec<&'static str>>,
}

impl StringTable {
    fn new() -> Self {
        Self {
            map: DashMap::with_hasher(RandomState::new()),
            strings: Mutex::new(Vec::new()),
        }
    }

    /// Intern `s`, returning its stable index.
    pub(super) fn intern(&self, s: &str) -> u32 {
        if let Some(existing) = self.map.get(s) {
            return *existing.value();
        }

        let mut strings = self.strings.lock().expect("interner lock poisoned");
        // Double-check under the lock: another thread may have won the race.
        if let Some(existing) = self.map.get(s) {
            return *existing.value();
        }

        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let index = strings.len() as u32;
        strings.push(leaked);
        self.map.insert(leaked, index);
        index
    }

    /// Resolve an index back to its string.
    pub(super) fn get(&self, index: u32) -> &'static str {
        self.strings.lock().expect("interner lock poisoned")[index as usize]
    }
}
