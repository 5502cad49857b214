//! Integration tests for the full matching pipeline: the handle API over the
//! process-wide registry, the owned wrapper, and the CLI entry point. These
//! exercise the same call sequences an embedding runtime issues, including
//! the compile-before-scan protocol and handle lifecycle.

use std::collections::BTreeSet;
use std::io::Write;

use multimatch::cli::Args;
use multimatch::error::Error;
use multimatch::{RegexMatcher, api, run};

fn ids(set: BTreeSet<u32>) -> Vec<u32> {
    set.into_iter().collect()
}

#[test]
fn end_to_end_lifecycle() {
    let handle = api::new_instance();

    api::add_pattern(handle, 5, "cat", true).unwrap();
    api::prepare_patterns(handle).unwrap();
    assert_eq!(ids(api::scan(handle, "a cat sat").unwrap()), vec![5]);

    assert!(api::remove_pattern(handle, 5).unwrap());

    // The set changed; scanning without a recompile is a contract violation.
    assert!(matches!(
        api::scan(handle, "a cat sat"),
        Err(Error::NotCompiled)
    ));

    api::prepare_patterns(handle).unwrap();
    assert!(api::scan(handle, "a cat sat").unwrap().is_empty());

    api::close(handle);
}

#[test]
fn closed_handles_stay_invalid_and_are_never_reused() {
    let first = api::new_instance();
    api::close(first);

    assert!(matches!(
        api::prepare_patterns(first),
        Err(Error::InvalidHandle(_))
    ));

    let second = api::new_instance();
    assert!(second > first);
    api::close(second);
}

#[test]
fn anchored_patterns_match_whole_inputs_only() {
    let matcher = RegexMatcher::new();
    matcher.add_pattern(1, "^a+$", false).unwrap();
    matcher.add_pattern(2, "^(a|b)+$", false).unwrap();
    matcher.prepare_patterns().unwrap();

    assert!(matcher.scan("").unwrap().is_empty());
    assert_eq!(ids(matcher.scan("a").unwrap()), vec![1, 2]);
    assert_eq!(ids(matcher.scan("ab").unwrap()), vec![2]);
    assert_eq!(ids(matcher.scan("b").unwrap()), vec![2]);
}

#[test]
fn unanchored_patterns_match_substrings() {
    let matcher = RegexMatcher::new();
    matcher.add_pattern(1, "a+", false).unwrap();
    matcher.add_pattern(2, "(a|b)+", false).unwrap();
    matcher.prepare_patterns().unwrap();

    assert!(matcher.scan("").unwrap().is_empty());
    assert_eq!(ids(matcher.scan("a").unwrap()), vec![1, 2]);
    assert_eq!(ids(matcher.scan("ab").unwrap()), vec![1, 2]);
    assert_eq!(ids(matcher.scan("b").unwrap()), vec![2]);
}

#[test]
fn character_classes() {
    let matcher = RegexMatcher::new();
    matcher.add_pattern(1, r"^\w+$", false).unwrap();
    matcher.add_pattern(2, "^[[:digit:]]+$", false).unwrap();
    matcher.prepare_patterns().unwrap();

    assert_eq!(ids(matcher.scan("abcd1").unwrap()), vec![1]);
    assert_eq!(ids(matcher.scan("121").unwrap()), vec![1, 2]);
}

#[test]
fn instances_do_not_share_patterns() {
    let left = RegexMatcher::new();
    let right = RegexMatcher::new();
    left.add_pattern(1, "left", true).unwrap();
    right.add_pattern(2, "right", true).unwrap();
    left.prepare_patterns().unwrap();
    right.prepare_patterns().unwrap();

    assert_eq!(ids(left.scan("left right").unwrap()), vec![1]);
    assert_eq!(ids(right.scan("left right").unwrap()), vec![2]);
}

fn write_pattern_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn cli_args(file: &tempfile::NamedTempFile, inputs: &[&str], format: &str) -> Args {
    Args {
        patterns: file.path().to_path_buf(),
        inputs: inputs.iter().map(|s| s.to_string()).collect(),
        format: format.to_string(),
        backtrack_limit: None,
    }
}

#[test]
fn cli_reports_matching_ids() {
    let file = write_pattern_file(
        r#"[
            {"id": 5, "expression": "cat"},
            {"id": 7, "expression": "dog", "case_sensitive": false}
        ]"#,
    );

    // At least one input matched.
    let code = run(cli_args(&file, &["a cat sat", "a DOG ran"], "text")).unwrap();
    assert_eq!(code, 0);

    // No input matched.
    let code = run(cli_args(&file, &["nothing here"], "text")).unwrap();
    assert_eq!(code, 1);

    let code = run(cli_args(&file, &["cat and DOG"], "json")).unwrap();
    assert_eq!(code, 0);
}

#[test]
fn cli_surfaces_compile_failures() {
    let file = write_pattern_file(r#"[{"id": 9, "expression": "("}]"#);
    let err = run(cli_args(&file, &["x"], "text")).unwrap_err();
    assert!(err.to_string().contains("erroneous pattern id = 9"));
}
