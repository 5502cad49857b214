use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "multimatch",
    version,
    about = "Match inputs against a set of named regex patterns"
)]
pub struct Args {
    /// JSON pattern-set file (array of {id, expression, case_sensitive})
    #[arg(short, long, value_name = "FILE")]
    pub patterns: PathBuf,

    /// Inputs to match; reads lines from stdin when empty
    pub inputs: Vec<String>,

    /// Output format
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Backtracking step limit for the regex engine
    #[arg(long, value_name = "N")]
    pub backtrack_limit: Option<usize>,
}
