//! Failure taxonomy for the matcher, registry, and handle API.

use thiserror::Error;

/// Every failure a caller can observe, one variant per distinguishable
/// condition so a foreign-runtime binding can branch on it.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The handle does not name a live matcher instance (never issued, or
    /// already closed). A normal outcome when a caller races a close.
    #[error("Invalid instance handle: handle = {0}")]
    InvalidHandle(u64),

    /// Pattern ids must fit the positive range of an unsigned 32-bit value.
    /// Rejected at the handle boundary, before reaching the matcher.
    #[error("Pattern id out of range: id = {0} (expected 1..=4294967295)")]
    InvalidPatternId(i64),

    /// Compiling the pattern set failed. `code` is the id of the offending
    /// pattern when the engine could attribute the failure, -1 otherwise.
    #[error("Failed to prepare patterns: {message}")]
    Preparation { code: i64, message: String },

    /// The pattern set was modified after the last compile; the caller must
    /// recompile before matching.
    #[error("Pattern set was changed but not compiled.")]
    NotCompiled,

    /// A scan failed; the message carries the engine diagnostic.
    #[error("{message}")]
    Scan { message: String },
}
