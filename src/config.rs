//! Pattern-set files.
//!
//! A pattern set is a JSON array of entries:
//! `[{"id": 1, "expression": "^cat", "case_sensitive": false}, ...]`.
//! `case_sensitive` defaults to true when omitted.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternEntry {
    pub id: u32,
    pub expression: String,
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,
}

fn default_case_sensitive() -> bool {
    true
}

/// Load a pattern-set file. Expressions are not validated here; bad regex
/// syntax surfaces when the set is compiled.
pub fn load_patterns(path: &Path) -> Result<Vec<PatternEntry>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read pattern file: {}", path.display()))?;
    let entries: Vec<PatternEntry> = serde_json::from_str(&text)
        .with_context(|| format!("invalid pattern file: {}", path.display()))?;
    for entry in &entries {
        if entry.id == 0 {
            bail!("pattern id 0 is reserved: {}", path.display());
        }
    }
    Ok(entries)
}
