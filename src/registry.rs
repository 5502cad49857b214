//! Process-wide table of live matcher instances, addressed by opaque
//! integer handles.
//!
//! Handles are monotonically increasing and never reused within the process,
//! so a stale handle from a closed instance can never silently alias a newer
//! one. The table's mutex guards only the map itself; matcher calls happen
//! outside it, against the per-instance lock.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};

use tracing::debug;

use crate::matcher::PatternMatcher;

pub struct Registry {
    inner: Mutex<Inner>,
}

struct Inner {
    next_handle: u64,
    instances: HashMap<u64, Arc<Mutex<PatternMatcher>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                // Handle 0 is never issued; callers may treat it as invalid.
                next_handle: 1,
                instances: HashMap::new(),
            }),
        }
    }

    /// Allocate a new matcher under the next handle and return the handle.
    pub fn create(&self) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        let handle = inner.next_handle;
        inner.next_handle += 1;
        inner
            .instances
            .insert(handle, Arc::new(Mutex::new(PatternMatcher::new())));
        debug!(handle, "created matcher instance");
        handle
    }

    /// Look up a live instance. `None` is a normal outcome, e.g. when the
    /// caller raced a close. The clone keeps the instance alive for the
    /// duration of the caller's use even if it is destroyed concurrently.
    pub fn get(&self, handle: u64) -> Option<Arc<Mutex<PatternMatcher>>> {
        self.inner.lock().unwrap().instances.get(&handle).map(Arc::clone)
    }

    /// Remove an instance. Unknown handles are a silent no-op, so close is
    /// idempotent.
    pub fn destroy(&self, handle: u64) {
        let removed = self.inner.lock().unwrap().instances.remove(&handle);
        if removed.is_some() {
            debug!(handle, "destroyed matcher instance");
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

/// The process-wide registry backing the handle API.
pub fn global() -> &'static Registry {
    &GLOBAL
}
