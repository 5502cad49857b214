//! Multi-pattern regex engine: batch compilation into an immutable database,
//! plus a callback-driven scan over that database.
//!
//! The backend is `fancy-regex`, which gives the backtracking feature set the
//! pattern syntax needs (lookaround, backreferences) together with a
//! configurable backtrack limit. A pattern that exhausts the limit during a
//! scan is reported through the error-event callback rather than silently
//! dropped.

use fancy_regex::{Error as BackendError, Regex, RegexBuilder, RuntimeError};
use thiserror::Error;

/// Verdict returned by scan callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matching {
    /// Keep scanning.
    Continue,
    /// Stop reporting for the current pattern, move on to the next one.
    Skip,
    /// Abort the whole scan; `scan` returns [`ScanError::Terminated`].
    Terminate,
}

/// Event delivered to the error callback when the backend gives up on a
/// pattern mid-scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorEvent {
    /// The backtrack limit was exhausted while matching a pattern.
    BacktrackLimit,
}

/// Per-pattern compile flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternFlags {
    /// Match case-insensitively. Realized as an `(?i)` prefix, so inline
    /// flags inside the expression still take precedence.
    pub caseless: bool,
    /// Report at most one match per pattern per scan.
    pub single_match: bool,
}

/// One pattern definition handed to [`Database::compile`].
#[derive(Debug, Clone)]
pub struct PatternDef {
    pub id: u32,
    pub expression: String,
    pub flags: PatternFlags,
}

/// Engine-wide compile options.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Upper bound on backtracking steps per pattern per scan.
    pub backtrack_limit: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
        }
    }
}

/// Backend default, kept explicit so callers can reason about it.
pub const DEFAULT_BACKTRACK_LIMIT: usize = 1_000_000;

/// Batch compilation failure.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CompileError {
    pub message: String,
    /// Index into the definition slice of the offending expression, when the
    /// failure is attributable to a single one.
    pub expression: Option<usize>,
}

/// Scan failure.
#[derive(Debug, Clone, Error)]
pub enum ScanError {
    #[error("scan terminated by callback")]
    Terminated,
    #[error("scratch was not allocated for this database")]
    MismatchedScratch,
    #[error("{0}")]
    Runtime(String),
}

#[derive(Debug)]
struct Program {
    id: u32,
    regex: Regex,
    flags: PatternFlags,
}

/// Immutable compiled pattern database. Build once, scan many times.
#[derive(Debug)]
pub struct Database {
    programs: Vec<Program>,
}

/// Per-database working memory for a scan: tracks which patterns have already
/// reported, so single-match mode fires at most once per pattern. Reusable
/// across scans, but not shareable across concurrent scans.
pub struct Scratch {
    matched: Vec<bool>,
}

impl Database {
    /// Compile every definition into one database. Stops at the first
    /// rejected expression and reports its index.
    pub fn compile(
        definitions: &[PatternDef],
        options: &CompileOptions,
    ) -> Result<Database, CompileError> {
        let mut programs = Vec::with_capacity(definitions.len());
        for (index, def) in definitions.iter().enumerate() {
            let expression = if def.flags.caseless {
                format!("(?i){}", def.expression)
            } else {
                def.expression.clone()
            };
            let regex = RegexBuilder::new(&expression)
                .backtrack_limit(options.backtrack_limit)
                .build()
                .map_err(|e| CompileError {
                    message: e.to_string(),
                    expression: Some(index),
                })?;
            programs.push(Program {
                id: def.id,
                regex,
                flags: def.flags,
            });
        }
        Ok(Database { programs })
    }

    pub fn pattern_count(&self) -> usize {
        self.programs.len()
    }

    /// Allocate working memory sized for this database.
    pub fn alloc_scratch(&self) -> Scratch {
        Scratch {
            matched: vec![false; self.programs.len()],
        }
    }

    /// Run every pattern over `input`, delivering matches to `on_match` and
    /// abandonment events to `on_error`. The scan covers the whole input from
    /// offset 0 and completes synchronously.
    pub fn scan<M, E>(
        &self,
        input: &str,
        scratch: &mut Scratch,
        mut on_match: M,
        mut on_error: E,
    ) -> Result<(), ScanError>
    where
        M: FnMut(u32, u64, u64, u32) -> Matching,
        E: FnMut(ErrorEvent, u32) -> Matching,
    {
        if scratch.matched.len() != self.programs.len() {
            return Err(ScanError::MismatchedScratch);
        }
        scratch.matched.fill(false);

        'patterns: for (index, program) in self.programs.iter().enumerate() {
            for found in program.regex.find_iter(input) {
                match found {
                    Ok(m) => {
                        if program.flags.single_match && scratch.matched[index] {
                            continue 'patterns;
                        }
                        scratch.matched[index] = true;
                        match on_match(program.id, m.start() as u64, m.end() as u64, 0) {
                            Matching::Continue => {
                                if program.flags.single_match {
                                    continue 'patterns;
                                }
                            }
                            Matching::Skip => continue 'patterns,
                            Matching::Terminate => return Err(ScanError::Terminated),
                        }
                    }
                    Err(BackendError::RuntimeError(RuntimeError::BacktrackLimitExceeded)) => {
                        match on_error(ErrorEvent::BacktrackLimit, program.id) {
                            Matching::Terminate => return Err(ScanError::Terminated),
                            Matching::Continue | Matching::Skip => continue 'patterns,
                        }
                    }
                    Err(e) => return Err(ScanError::Runtime(e.to_string())),
                }
            }
        }
        Ok(())
    }
}
