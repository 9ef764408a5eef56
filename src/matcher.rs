// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-regexp-like)

//! `regexp_like` — Tri-state regular expression match predicate.
//!
//! Tests whether a pattern matches anywhere in a subject string and encodes
//! the answer as an integer: `1` for a match, `0` for no match **or** for an
//! absent input. NULL handling is deliberate: a NULL subject or pattern
//! yields `0`, not NULL and not an error.
//!
//! # SQL Usage
//!
//! ```sql
//! -- Case-insensitive (flag = 0): returns 1
//! SELECT regexp_like('Hello World', 'hello', 0);
//!
//! -- Case-sensitive (any non-zero flag): returns 0
//! SELECT regexp_like('Hello World', 'hello', 1);
//!
//! -- Predicate position
//! SELECT * FROM logs WHERE regexp_like(line, 'disk \s+ full', 1) = 1;
//! ```
//!
//! # Matching options
//!
//! Two compilation options are always on:
//!
//! - **Verbose mode** (`ignore_whitespace`): unescaped whitespace in the
//!   pattern is ignored and `#` starts a comment running to end of line.
//!   `'a b c'` matches `"abc"`; write `'a\ b'` to match a literal space.
//! - **Dot-matches-newline** (`dot_matches_new_line`): `.` matches any
//!   character including `\n`, so a single pattern can span lines.
//!
//! Case-insensitive matching is added iff the caller's flag is exactly `0`.
//! Any other value — including a NULL flag at the SQL layer, which compares
//! unequal to zero — selects case-sensitive matching.
//!
//! # Engine notes
//!
//! Matching is delegated to the [`regex`] crate. Semantics worth knowing:
//!
//! - No backreferences or lookaround. Such patterns fail to compile and the
//!   compile error propagates to the caller (fails the query).
//! - Case folding is Unicode *simple* folding: `ä` matches `Ä`, but `ß`
//!   does not match `SS`.
//! - Verbose mode ignores whitespace inside character classes as well, so
//!   `[a b]` is `[ab]`. Write `[a\ b]` or `\x20` for a literal space in a
//!   class.

use regex::{Regex, RegexBuilder};

/// Returns true if the case-sensitivity flag selects case-insensitive
/// matching.
///
/// The flag surface is three-valued: exactly `0` means insensitive, any
/// other value means sensitive. A NULL flag never reaches this function —
/// the FFI layer substitutes a non-zero value for it.
#[must_use]
#[inline]
pub const fn case_insensitive_requested(flag: i32) -> bool {
    flag == 0
}

/// Compiles `pattern` with the fixed option set: verbose mode and
/// dot-matches-newline always on, case-insensitivity per the flag.
///
/// # Errors
///
/// Returns the engine's [`regex::Error`] for malformed patterns, including
/// constructs the engine does not support (backreferences, lookaround).
pub fn compile_pattern(pattern: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .ignore_whitespace(true)
        .dot_matches_new_line(true)
        .case_insensitive(case_insensitive)
        .build()
}

/// The match predicate: `1` if `pattern` matches anywhere in `subject`,
/// `0` on no match or when either input is absent.
///
/// The NULL short-circuit happens before compilation, so an absent subject
/// paired with a malformed pattern still returns `Ok(0)`.
///
/// # Errors
///
/// Returns [`regex::Error`] when both inputs are present and the pattern
/// fails to compile.
pub fn regexp_like(
    subject: Option<&str>,
    pattern: Option<&str>,
    case_sensitive: i32,
) -> Result<i32, regex::Error> {
    let (subject, pattern) = match (subject, pattern) {
        (Some(s), Some(p)) => (s, p),
        _ => return Ok(0),
    };
    let regex = compile_pattern(pattern, case_insensitive_requested(case_sensitive))?;
    Ok(i32::from(regex.is_match(subject)))
}

/// Cache-aware variant of [`regexp_like`] for vectorized execution.
///
/// Behaves identically to [`regexp_like`]; the compiled pattern is fetched
/// through `cache` instead of being rebuilt per call.
///
/// # Errors
///
/// Returns [`regex::Error`] when both inputs are present and the pattern
/// fails to compile.
pub fn regexp_like_cached(
    cache: &mut PatternCache,
    subject: Option<&str>,
    pattern: Option<&str>,
    case_sensitive: i32,
) -> Result<i32, regex::Error> {
    let (subject, pattern) = match (subject, pattern) {
        (Some(s), Some(p)) => (s, p),
        _ => return Ok(0),
    };
    let regex = cache.get_or_compile(pattern, case_insensitive_requested(case_sensitive))?;
    Ok(i32::from(regex.is_match(subject)))
}

/// Most-recently-compiled pattern memo for vectorized execution.
///
/// `DuckDB` hands the scalar executor chunks of up to 2048 rows, and the
/// pattern argument is almost always a query literal — identical in every
/// row — so one compiled program can serve a whole chunk. A single slot is
/// enough: constant patterns compile once, alternating patterns recompile.
///
/// A cache is created per executor invocation and dropped with it, which
/// keeps the function stateless and reentrant across calls.
#[derive(Debug)]
pub struct PatternCache {
    entry: Option<CacheEntry>,
}

/// A compiled pattern keyed by its text and case mode.
#[derive(Debug)]
struct CacheEntry {
    pattern: String,
    case_insensitive: bool,
    regex: Regex,
}

impl PatternCache {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self { entry: None }
    }

    /// Returns the compiled regex for `(pattern, case_insensitive)`,
    /// compiling and storing it on a key miss.
    ///
    /// The case flag is part of the key: the same pattern text compiled
    /// sensitive and insensitive yields different programs.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] if compilation fails. A failed compilation
    /// leaves the previously cached entry in place.
    pub fn get_or_compile(
        &mut self,
        pattern: &str,
        case_insensitive: bool,
    ) -> Result<&Regex, regex::Error> {
        let hit = self
            .entry
            .as_ref()
            .is_some_and(|e| e.case_insensitive == case_insensitive && e.pattern == pattern);
        if !hit {
            let regex = compile_pattern(pattern, case_insensitive)?;
            self.entry = Some(CacheEntry {
                pattern: pattern.to_owned(),
                case_insensitive,
                regex,
            });
        }
        // SAFETY of unwrap: the entry is Some — it either matched the key
        // or was just stored above.
        Ok(&self.entry.as_ref().unwrap().regex)
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn null_subject_always_zero(
            pattern in ".{0,24}",
            flag in prop::num::i32::ANY,
        ) {
            // Holds for every pattern, including ones that do not compile.
            prop_assert_eq!(regexp_like(None, Some(&pattern), flag), Ok(0));
        }

        #[test]
        fn null_pattern_always_zero(
            subject in ".{0,24}",
            flag in prop::num::i32::ANY,
        ) {
            prop_assert_eq!(regexp_like(Some(&subject), None, flag), Ok(0));
        }

        #[test]
        fn ascii_uppercase_equivalence(
            subject in "[ -~]{0,32}",
            pattern in "[a-z]{1,8}",
        ) {
            // Case-insensitive matching is invariant under ASCII
            // upper-casing of both sides (literal patterns only: upper-casing
            // a metacharacter like \d would change its meaning).
            let upper_subject = subject.to_ascii_uppercase();
            let upper_pattern = pattern.to_ascii_uppercase();
            prop_assert_eq!(
                regexp_like(Some(&subject), Some(&pattern), 0),
                regexp_like(Some(&upper_subject), Some(&upper_pattern), 0)
            );
        }

        #[test]
        fn nonzero_flags_equivalent(
            subject in "[ -~]{0,32}",
            pattern in "[a-z]{1,8}",
            flag in prop::num::i32::ANY,
        ) {
            prop_assume!(flag != 0);
            prop_assert_eq!(
                regexp_like(Some(&subject), Some(&pattern), flag),
                regexp_like(Some(&subject), Some(&pattern), 1)
            );
        }

        #[test]
        fn sensitive_match_implies_insensitive_match(
            subject in "[ -~]{0,32}",
            pattern in "[a-z]{1,8}",
        ) {
            // Case-sensitive matches are a subset of case-insensitive ones.
            if regexp_like(Some(&subject), Some(&pattern), 1) == Ok(1) {
                prop_assert_eq!(regexp_like(Some(&subject), Some(&pattern), 0), Ok(1));
            }
        }

        #[test]
        fn cache_is_transparent(
            ops in prop::collection::vec(
                (
                    prop_oneof![
                        Just("abc"),
                        Just("a.c"),
                        Just("[ab]+c"),
                        Just("hello"),
                        Just(r"\d+"),
                    ],
                    prop_oneof![
                        Just("abc"), Just("ABC"), Just("axc"), Just("hello"),
                        Just("HELLO"), Just("123"), Just(""),
                    ],
                    prop::num::i32::ANY,
                ),
                1..16,
            ),
        ) {
            // A shared cache across an arbitrary op sequence must agree with
            // a fresh compilation for every op.
            let mut cache = PatternCache::new();
            for (pattern, subject, flag) in ops {
                prop_assert_eq!(
                    regexp_like_cached(&mut cache, Some(subject), Some(pattern), flag),
                    regexp_like(Some(subject), Some(pattern), flag)
                );
            }
        }
    }
}
