//! Stateful multi-pattern regex matching.
//!
//! A [`PatternMatcher`] holds a mutable set of id-tagged patterns and
//! compiles them on demand into an immutable engine database; scanning an
//! input returns the ids of every pattern that matched. Pattern sets may be
//! edited at any time, but a modified set must be recompiled before the next
//! scan — the matcher fails closed instead of compiling implicitly.
//!
//! ```
//! use multimatch::PatternMatcher;
//!
//! let mut matcher = PatternMatcher::new();
//! matcher.add_pattern(1, "cat", true);
//! matcher.add_pattern(2, "dog", false);
//! matcher.compile_patterns()?;
//!
//! let ids = matcher.scan("a CAT and a DOG")?;
//! assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![2]);
//! # Ok::<(), multimatch::Error>(())
//! ```
//!
//! For embedding behind a foreign-runtime boundary, the [`api`] module offers
//! the same operations over opaque integer handles backed by a process-wide
//! [`registry`], so the embedder never holds the matcher itself.

pub mod api;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod registry;

use std::io::BufRead;

use anyhow::Result;

pub use api::RegexMatcher;
pub use error::Error;
pub use matcher::PatternMatcher;

use cli::Args;
use engine::CompileOptions;

/// Run the CLI. Returns the exit code: 0 = at least one input matched,
/// 1 = no input matched, 2 = error (mapped by `main`).
pub fn run(args: Args) -> Result<i32> {
    let entries = config::load_patterns(&args.patterns)?;

    let mut options = CompileOptions::default();
    if let Some(limit) = args.backtrack_limit {
        options.backtrack_limit = limit;
    }

    let mut matcher = PatternMatcher::with_options(options);
    for entry in &entries {
        matcher.add_pattern(entry.id, &entry.expression, entry.case_sensitive);
    }
    matcher.compile_patterns()?;

    let inputs: Vec<String> = if args.inputs.is_empty() {
        std::io::stdin().lock().lines().collect::<Result<_, _>>()?
    } else {
        args.inputs
    };

    let mut any_matched = false;
    let mut reports = Vec::with_capacity(inputs.len());
    for input in inputs {
        let ids = matcher.scan(&input)?;
        any_matched |= !ids.is_empty();
        reports.push((input, ids));
    }

    if args.format == "json" {
        let value: Vec<_> = reports
            .iter()
            .map(|(input, ids)| serde_json::json!({"input": input, "matches": ids}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        for (input, ids) in &reports {
            let list = ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            println!("{input}: {list}");
        }
    }

    Ok(if any_matched { 0 } else { 1 })
}
