//! Stateful wrapper that presents a mutable pattern set over the engine's
//! immutable databases.
//!
//! Mutations (`add_pattern`/`remove_pattern`) only touch the in-memory set
//! and flip the dirty flag; `compile_patterns` rebuilds the database from
//! scratch, and `scan` refuses to run against a stale database rather than
//! compiling on demand.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::engine::{CompileOptions, Database, Matching, PatternDef, PatternFlags, ScanError, Scratch};
use crate::error::Error;

#[derive(Debug, Clone)]
struct PatternSpec {
    expression: String,
    case_sensitive: bool,
}

struct Compiled {
    database: Database,
    scratch: Scratch,
}

/// Multi-pattern matcher with deferred compilation.
///
/// Several patterns may share one id; removal by id deletes them all. After
/// any mutation the set must be recompiled before the next [`scan`].
///
/// Instances are not intended for concurrent use; callers serialize access
/// externally (the registry wraps each instance in its own mutex for that).
///
/// [`scan`]: PatternMatcher::scan
pub struct PatternMatcher {
    patterns: BTreeMap<u32, Vec<PatternSpec>>,
    compiled: Option<Compiled>,
    dirty: bool,
    last_error: String,
    options: CompileOptions,
}

impl PatternMatcher {
    pub fn new() -> Self {
        Self::with_options(CompileOptions::default())
    }

    pub fn with_options(options: CompileOptions) -> Self {
        Self {
            patterns: BTreeMap::new(),
            compiled: None,
            dirty: true,
            last_error: String::new(),
            options,
        }
    }

    /// Add a pattern to the set. The expression is not validated here;
    /// validation happens in [`compile_patterns`].
    ///
    /// [`compile_patterns`]: PatternMatcher::compile_patterns
    pub fn add_pattern(&mut self, id: u32, expression: &str, case_sensitive: bool) {
        self.patterns.entry(id).or_default().push(PatternSpec {
            expression: expression.to_string(),
            case_sensitive,
        });
        self.mark_dirty();
    }

    /// Remove every pattern registered under `id`. Returns whether any
    /// existed. Removing an unknown id is a no-op, not an error, and leaves
    /// the compiled state untouched.
    pub fn remove_pattern(&mut self, id: u32) -> bool {
        if self.patterns.remove(&id).is_none() {
            return false;
        }
        self.mark_dirty();
        true
    }

    // A dirty matcher never holds a database; the stale one is dropped as
    // soon as the set diverges from it.
    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.compiled = None;
    }

    /// Number of pattern entries currently in the set (not distinct ids).
    pub fn pattern_count(&self) -> usize {
        self.patterns.values().map(Vec::len).sum()
    }

    /// Whether the set has changed since the last successful compile.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rebuild the pattern database. A no-op when the set is unchanged since
    /// the last compile. On failure the previous database is already gone and
    /// the matcher stays dirty; the error's `code` is the offending pattern
    /// id, or -1 when the failure is not attributable to a single pattern.
    pub fn compile_patterns(&mut self) -> Result<(), Error> {
        if !self.dirty {
            return Ok(());
        }
        self.compiled = None;
        if self.patterns.is_empty() {
            self.dirty = false;
            return Ok(());
        }

        // Flatten the id -> entries map into the parallel form the engine
        // compiles, id order first, insertion order within an id.
        let mut definitions = Vec::with_capacity(self.pattern_count());
        for (&id, specs) in &self.patterns {
            for spec in specs {
                definitions.push(PatternDef {
                    id,
                    expression: spec.expression.clone(),
                    flags: PatternFlags {
                        caseless: !spec.case_sensitive,
                        single_match: true,
                    },
                });
            }
        }

        match Database::compile(&definitions, &self.options) {
            Ok(database) => {
                let scratch = database.alloc_scratch();
                debug!(patterns = definitions.len(), "compiled pattern database");
                self.compiled = Some(Compiled { database, scratch });
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                let (code, message) = match err.expression {
                    Some(index) => {
                        let id = definitions[index].id;
                        (
                            i64::from(id),
                            format!(
                                "Unable to compile patterns: error = {}, erroneous pattern id = {}",
                                err.message, id
                            ),
                        )
                    }
                    None => (
                        -1,
                        format!(
                            "Unable to compile patterns: error = {}, unknown expression index",
                            err.message
                        ),
                    ),
                };
                self.last_error = message.clone();
                Err(Error::Preparation { code, message })
            }
        }
    }

    /// Match `input` against the compiled set and return the ids of every
    /// pattern that matched. Fails if the set is dirty; an empty set matches
    /// nothing and succeeds.
    pub fn scan(&mut self, input: &str) -> Result<BTreeSet<u32>, Error> {
        if self.dirty {
            let err = Error::NotCompiled;
            self.last_error = err.to_string();
            return Err(err);
        }
        if self.patterns.is_empty() {
            return Ok(BTreeSet::new());
        }
        // Non-dirty and non-empty implies a database is present; fail closed
        // if that ever breaks rather than panicking.
        let Some(compiled) = self.compiled.as_mut() else {
            let err = Error::NotCompiled;
            self.last_error = err.to_string();
            return Err(err);
        };

        let mut results = BTreeSet::new();
        let outcome = compiled.database.scan(
            input,
            &mut compiled.scratch,
            |id, _from, _to, _flags| {
                // Collect the full id set; never stop early on a match.
                results.insert(id);
                Matching::Continue
            },
            // An abandoned pattern means an undercounted result set; fail the
            // whole scan instead of returning partial results.
            |_event, _id| Matching::Terminate,
        );

        match outcome {
            Ok(()) => Ok(results),
            Err(ScanError::Terminated) => {
                let message =
                    "Due to backtracking limits of the underlying engine, the match was stopped."
                        .to_string();
                self.last_error = message.clone();
                Err(Error::Scan { message })
            }
            Err(err) => {
                let message = format!(
                    "An unexpected engine error occurred: error = {err}, input = {input}"
                );
                self.last_error = message.clone();
                Err(Error::Scan { message })
            }
        }
    }

    /// Diagnostic from the most recent failing operation. Stale until some
    /// operation has failed; never cleared automatically.
    pub fn last_error(&self) -> &str {
        &self.last_error
    }
}
