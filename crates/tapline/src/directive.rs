//! Directive parsing
//!
//! A TAP directive is the comment fragment after `#` on a test point or
//! plan line, e.g. `ok 3 - reticulate # SKIP no splines on this host`.
//! Two markers carry meaning: `skip` (the test was not run) and `todo`
//! (the test is expected to fail). Both are matched case-insensitively on
//! the first word of the fragment, prefix style, so `SKIPPED` and
//! `Todo:` count. Skip wins when a fragment could be read as either.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static SKIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^skip\S*\s*(?P<reason>.*)$").unwrap());

static TODO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^todo\S*\s*(?P<reason>.*)$").unwrap());

/// A parsed directive fragment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    /// Free text after the marker, or the whole trimmed fragment when no
    /// marker matched
    pub text: String,
    /// Fragment began with a `todo` marker
    pub todo: bool,
    /// Fragment began with a `skip` marker
    pub skipped: bool,
}

impl Directive {
    /// Parse a directive fragment (the text after `#`)
    ///
    /// The fragment is trimmed before matching. A bare marker with no
    /// reason still sets its flag. The two flags are mutually exclusive;
    /// `skip` is checked first.
    #[must_use]
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.trim();

        if let Some(caps) = SKIP_RE.captures(fragment) {
            return Self {
                text: caps["reason"].trim().to_string(),
                todo: false,
                skipped: true,
            };
        }

        if let Some(caps) = TODO_RE.captures(fragment) {
            return Self {
                text: caps["reason"].trim().to_string(),
                todo: true,
                skipped: false,
            };
        }

        Self {
            text: fragment.to_string(),
            todo: false,
            skipped: false,
        }
    }
}
