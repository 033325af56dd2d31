//! End-to-end scenarios for the prefix idiom rewrite.
//!
//! Guarantees exercised here:
//! - `strncmp`/`substr` prefix checks become `str_starts_with`
//! - a length or offset that does not cover the needle is left alone
//! - `!==` yields the negated call
//! - the registry is deterministic on an unchanged node

use modernize_rules::{MatcherRegistry, Rector, StrStartsWithRector};
use modernize_test_utils::{first_identity_comparison, parse_php};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn rewrite_statement(statement: &str) -> String {
    let mut tree = parse_php(&format!("<?php\n{statement}\n"));
    StrStartsWithRector::default().refactor(&mut tree);
    tree.print()
        .trim_start_matches("<?php\n")
        .trim_end()
        .to_string()
}

/// Literal needle with its exact byte length.
#[test]
fn strncmp_with_literal_length_rewrites() {
    assert_eq!(
        rewrite_statement(r#"strncmp($str, "abc", 3) === 0;"#),
        r#"str_starts_with($str, "abc");"#
    );
}

/// A shorter length compares only part of the needle, so the semantics differ.
#[test]
fn strncmp_with_length_mismatch_is_kept() {
    assert_eq!(
        rewrite_statement(r#"strncmp($str, "abc", 2) === 0;"#),
        r#"strncmp($str, "abc", 2) === 0;"#
    );
}

/// `!== 0` is the negated prefix check.
#[test]
fn strncmp_negative_polarity() {
    assert_eq!(
        rewrite_statement(r#"strncmp($str, "abc", 3) !== 0;"#),
        r#"!str_starts_with($str, "abc");"#
    );
}

/// `substr` from zero with the needle's own length.
#[test]
fn substr_with_strlen_rewrites() {
    assert_eq!(
        rewrite_statement("substr($str, 0, strlen($needle)) === $needle;"),
        "str_starts_with($str, $needle);"
    );
}

/// Any offset other than zero checks an infix.
#[test]
fn substr_with_nonzero_offset_is_kept() {
    assert_eq!(
        rewrite_statement("substr($str, 1, strlen($needle)) === $needle;"),
        "substr($str, 1, strlen($needle)) === $needle;"
    );
}

/// Rewrites stay local: surrounding code and comments are untouched.
#[test]
fn surrounding_code_is_preserved() {
    let source = "<?php\n\n// check scheme\nif ($ok && strncmp($url, 'https', 5) === 0) {\n    return true; // secure\n}\n";
    let mut tree = parse_php(source);
    assert_eq!(StrStartsWithRector::default().refactor(&mut tree), 1);
    assert_eq!(
        tree.print(),
        "<?php\n\n// check scheme\nif ($ok && str_starts_with($url, 'https')) {\n    return true; // secure\n}\n"
    );
}

/// A prefix idiom statement and whether it proves prefix semantics
fn idiom() -> impl Strategy<Value = (String, bool)> {
    let needle = "[a-z]{1,6}";
    (needle, 0usize..8, any::<bool>(), any::<bool>(), any::<bool>(), 0usize..2).prop_map(
        |(needle, length, positive, swap, use_substr, offset)| {
            let op = if positive { "===" } else { "!==" };
            let (call, other, offset_ok) = if use_substr {
                (format!("substr($s, {offset}, {length})"), format!("'{needle}'"), offset == 0)
            } else {
                (format!("strncmp($s, '{needle}', {length})"), "0".to_string(), true)
            };
            let statement = if swap {
                format!("{other} {op} {call};")
            } else {
                format!("{call} {op} {other};")
            };
            (statement, offset_ok && length == needle.len())
        },
    )
}

proptest! {
    /// Offering the same node twice builds structurally identical replacements.
    #[test]
    fn registry_is_deterministic((statement, _) in idiom()) {
        let mut tree = parse_php(&format!("<?php {statement}"));
        let comparison = first_identity_comparison(&tree);
        let registry = MatcherRegistry::with_defaults();

        let first = registry
            .try_match_and_refactor(&mut tree, comparison)
            .map(|node| tree.print_node(node));
        let second = registry
            .try_match_and_refactor(&mut tree, comparison)
            .map(|node| tree.print_node(node));

        prop_assert_eq!(first, second);
        prop_assert!(!tree.has_changes());
    }

    /// The rewrite fires exactly when offset and length cover the needle.
    #[test]
    fn rewrite_requires_exact_length((statement, expected) in idiom()) {
        let rewritten = rewrite_statement(&statement).contains("str_starts_with");
        prop_assert_eq!(rewritten, expected, "{}", statement);
    }
}
