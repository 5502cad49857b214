//! Handle-based surface over the global registry: the operations a
//! foreign-runtime binding calls, with argument validation done here so
//! out-of-range values never reach a matcher.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use crate::error::Error;
use crate::matcher::PatternMatcher;
use crate::registry;

/// Largest accepted pattern id; ids must also be positive.
pub const MAX_PATTERN_ID: i64 = u32::MAX as i64;

fn instance(handle: u64) -> Result<Arc<Mutex<PatternMatcher>>, Error> {
    registry::global()
        .get(handle)
        .ok_or(Error::InvalidHandle(handle))
}

fn checked_id(pattern_id: i64) -> Result<u32, Error> {
    if (1..=MAX_PATTERN_ID).contains(&pattern_id) {
        Ok(pattern_id as u32)
    } else {
        Err(Error::InvalidPatternId(pattern_id))
    }
}

/// Create a fresh matcher instance and return its handle.
pub fn new_instance() -> u64 {
    registry::global().create()
}

/// Release an instance. Closing an unknown or already-closed handle is a
/// silent no-op.
pub fn close(handle: u64) {
    registry::global().destroy(handle);
}

pub fn add_pattern(
    handle: u64,
    pattern_id: i64,
    expression: &str,
    case_sensitive: bool,
) -> Result<(), Error> {
    let instance = instance(handle)?;
    let id = checked_id(pattern_id)?;
    instance
        .lock()
        .unwrap()
        .add_pattern(id, expression, case_sensitive);
    Ok(())
}

/// Remove every pattern with the given id; returns whether any existed.
pub fn remove_pattern(handle: u64, pattern_id: i64) -> Result<bool, Error> {
    let instance = instance(handle)?;
    let id = checked_id(pattern_id)?;
    Ok(instance.lock().unwrap().remove_pattern(id))
}

/// Compile the instance's pattern set. Must be called after any mutation and
/// before the next [`scan`].
pub fn prepare_patterns(handle: u64) -> Result<(), Error> {
    instance(handle)?.lock().unwrap().compile_patterns()
}

/// Match `input` against the instance's compiled set.
pub fn scan(handle: u64, input: &str) -> Result<BTreeSet<u32>, Error> {
    instance(handle)?.lock().unwrap().scan(input)
}

/// Owned wrapper around a registry handle, closing it on drop.
///
/// This is the shape an embedding runtime's matcher object takes: it never
/// owns the native matcher directly, only the handle into the registry.
pub struct RegexMatcher {
    handle: u64,
}

impl RegexMatcher {
    pub fn new() -> Self {
        Self {
            handle: new_instance(),
        }
    }

    pub fn handle(&self) -> u64 {
        self.handle
    }

    /// Add a pattern. Errors in the expression are not detected here; they
    /// surface from [`prepare_patterns`](Self::prepare_patterns).
    pub fn add_pattern(
        &self,
        pattern_id: i64,
        expression: &str,
        case_sensitive: bool,
    ) -> Result<(), Error> {
        add_pattern(self.handle, pattern_id, expression, case_sensitive)
    }

    pub fn remove_pattern(&self, pattern_id: i64) -> Result<bool, Error> {
        remove_pattern(self.handle, pattern_id)
    }

    pub fn prepare_patterns(&self) -> Result<(), Error> {
        prepare_patterns(self.handle)
    }

    pub fn scan(&self, input: &str) -> Result<BTreeSet<u32>, Error> {
        scan(self.handle, input)
    }
}

impl Drop for RegexMatcher {
    fn drop(&mut self) {
        close(self.handle);
    }
}
