//! TAP line classification
//!
//! Every line of a TAP stream is classified by running an ordered list of
//! grammar rules; the first rule that matches decides the line's kind.
//! Outside a YAML block the order is:
//!
//! 1. YAML block start (`---`)
//! 2. Version (`TAP version 13`)
//! 3. Diagnostic (`# comment`)
//! 4. Plan (`1..4`, optional directive)
//! 5. Test point (`ok` / `not ok`, optional index, description, directive)
//! 6. Bail out (`Bail out!`, case-insensitive)
//!
//! Inside a YAML block the only distinction is terminator (`...`) versus
//! content; block state short-circuits every other rule. A line that
//! matches nothing is `Unknown`.
//!
//! All rules are anchored at the start of the line. Diagnostics sort
//! before plans and test points, so a commented-out `# ok 3` stays a
//! diagnostic.

use crate::directive::Directive;
use crate::result::{TestPlan, TestResult, TestStatus};
use regex::Regex;
use std::sync::LazyLock;

static YAML_START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*---").unwrap());

static YAML_END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\.\.\.").unwrap());

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^TAP\s+version\s+(?P<version>\d+)\s*$").unwrap());

static DIAGNOSTIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#(?P<message>.*)$").unwrap());

static PLAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<first>\d+)\.\.(?P<last>\d+)\s*(?:#\s*(?P<directive>.*))?$").unwrap()
});

static TEST_POINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<not>not )?ok\b\s*(?P<index>\d*)\s*(?:-\s*)?(?P<description>[^#]*)(?:#\s*(?P<directive>.*))?$",
    )
    .unwrap()
});

static BAIL_OUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Bail out!\s*(?P<message>.*)$").unwrap());

/// Classification rules in priority order. First match wins.
static RULES: &[(&LazyLock<Regex>, LineKind)] = &[
    (&YAML_START_RE, LineKind::YamlStart),
    (&VERSION_RE, LineKind::Version),
    (&DIAGNOSTIC_RE, LineKind::Diagnostic),
    (&PLAN_RE, LineKind::Plan),
    (&TEST_POINT_RE, LineKind::TestPoint),
    (&BAIL_OUT_RE, LineKind::BailOut),
];

/// Kind of a single TAP line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `TAP version N`
    Version,
    /// `1..N` plan, optionally with a directive
    Plan,
    /// `ok` / `not ok` test point
    TestPoint,
    /// `#`-prefixed diagnostic
    Diagnostic,
    /// `---` opening a YAML block
    YamlStart,
    /// `...` closing a YAML block
    YamlEnd,
    /// Any line inside an open YAML block
    YamlContent,
    /// `Bail out!` abort marker
    BailOut,
    /// Matched no grammar rule
    Unknown,
}

/// Classify one raw line
///
/// `in_yaml_block` is the state of the block machine before this line;
/// while a block is open every line is either its terminator or its
/// content, regardless of what else it might look like.
#[must_use]
pub fn classify(line: &str, in_yaml_block: bool) -> LineKind {
    if in_yaml_block {
        if YAML_END_RE.is_match(line) {
            return LineKind::YamlEnd;
        }
        return LineKind::YamlContent;
    }

    for (regex, kind) in RULES {
        if regex.is_match(line) {
            return *kind;
        }
    }

    LineKind::Unknown
}

/// Extract the declared version number from a version line
///
/// Digits that overflow `u64` saturate to `u64::MAX`, which the caller
/// rejects the same way as any version above the supported maximum.
pub(crate) fn parse_version(line: &str) -> Option<u64> {
    let caps = VERSION_RE.captures(line)?;
    Some(caps["version"].parse::<u64>().unwrap_or(u64::MAX))
}

/// Extract the plan range and directive from a plan line
///
/// Endpoints that overflow `u32` fall back to 0, turning a nonsense plan
/// into an empty range.
pub(crate) fn parse_plan(line: &str) -> Option<TestPlan> {
    let caps = PLAN_RE.captures(line)?;
    let directive = caps
        .name("directive")
        .map(|m| Directive::parse(m.as_str()))
        .unwrap_or_default();
    Some(TestPlan {
        first: caps["first"].parse().unwrap_or(0),
        last: caps["last"].parse().unwrap_or(0),
        directive: directive.text,
        todo: directive.todo,
        skipped: directive.skipped,
    })
}

/// Extract a test point from an `ok` / `not ok` line
///
/// `fallback_index` is assigned when the line carries no usable test
/// number.
pub(crate) fn parse_test_point(line: &str, fallback_index: u32) -> Option<TestResult> {
    let caps = TEST_POINT_RE.captures(line)?;
    let status = if caps.name("not").is_some() {
        TestStatus::NotOk
    } else {
        TestStatus::Ok
    };
    let index = caps
        .name("index")
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(fallback_index);
    let directive = caps
        .name("directive")
        .map(|m| Directive::parse(m.as_str()))
        .unwrap_or_default();
    Some(TestResult {
        status,
        index,
        description: caps["description"].trim().to_string(),
        directive: directive.text,
        todo: directive.todo,
        skipped: directive.skipped,
        yaml: None,
        yaml_error: None,
        diagnostics: Vec::new(),
    })
}

/// Extract the trimmed message from a diagnostic line
pub(crate) fn parse_diagnostic(line: &str) -> Option<&str> {
    DIAGNOSTIC_RE
        .captures(line)
        .and_then(|caps| caps.name("message"))
        .map(|m| m.as_str().trim())
}

/// Extract the trimmed message from a bail-out line
pub(crate) fn parse_bail_out(line: &str) -> Option<&str> {
    BAIL_OUT_RE
        .captures(line)
        .and_then(|caps| caps.name("message"))
        .map(|m| m.as_str().trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_classify_version_line() {
        assert_eq!(classify("TAP version 13", false), LineKind::Version);
    }

    #[test]
    fn test_classify_plan_line() {
        assert_eq!(classify("1..4", false), LineKind::Plan);
        assert_eq!(classify("1..0 # skip nothing to do", false), LineKind::Plan);
    }

    #[test]
    fn test_classify_test_points() {
        assert_eq!(classify("ok", false), LineKind::TestPoint);
        assert_eq!(classify("ok 1 - works", false), LineKind::TestPoint);
        assert_eq!(classify("not ok 2 - broken", false), LineKind::TestPoint);
        assert_eq!(classify("ok 3 # SKIP no dice", false), LineKind::TestPoint);
    }

    #[test]
    fn test_ok_requires_word_boundary() {
        assert_eq!(classify("okay then", false), LineKind::Unknown);
        assert_eq!(classify("ok1", false), LineKind::Unknown);
    }

    #[test]
    fn test_classify_diagnostic_before_test_point() {
        // a commented-out test point stays a diagnostic
        assert_eq!(classify("# ok 3 - not really", false), LineKind::Diagnostic);
        assert_eq!(classify("  # indented", false), LineKind::Diagnostic);
    }

    #[test]
    fn test_classify_yaml_delimiters() {
        assert_eq!(classify("---", false), LineKind::YamlStart);
        assert_eq!(classify("  ---", false), LineKind::YamlStart);
        assert_eq!(classify("...", false), LineKind::Unknown);
        assert_eq!(classify("...", true), LineKind::YamlEnd);
        assert_eq!(classify("  ...", true), LineKind::YamlEnd);
    }

    #[test]
    fn test_block_state_shadows_every_other_rule() {
        assert_eq!(classify("ok 1 - looks like a test", true), LineKind::YamlContent);
        assert_eq!(classify("1..4", true), LineKind::YamlContent);
        assert_eq!(classify("TAP version 13", true), LineKind::YamlContent);
        assert_eq!(classify("", true), LineKind::YamlContent);
    }

    #[test]
    fn test_classify_bail_out() {
        assert_eq!(classify("Bail out!", false), LineKind::BailOut);
        assert_eq!(classify("bail out! db is gone", false), LineKind::BailOut);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("", false), LineKind::Unknown);
        assert_eq!(classify("random noise", false), LineKind::Unknown);
        assert_eq!(classify("1..", false), LineKind::Unknown);
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("TAP version 13"), Some(13));
        assert_eq!(parse_version("TAP version 12"), Some(12));
        assert_eq!(parse_version("TAP version 99999999999999999999999"), Some(u64::MAX));
        assert_eq!(parse_version("TAP version"), None);
    }

    #[test]
    fn test_parse_plan_plain() {
        let plan = parse_plan("1..4").expect("Should parse");
        assert_eq!(plan.first, 1);
        assert_eq!(plan.last, 4);
        assert_eq!(plan.directive, "");
        assert!(!plan.skipped);
    }

    #[test]
    fn test_parse_plan_with_skip_directive() {
        let plan = parse_plan("1..0 # Skipped: WWW::Mechanize not installed").expect("Should parse");
        assert_eq!(plan.first, 1);
        assert_eq!(plan.last, 0);
        assert!(plan.skipped);
        assert_eq!(plan.directive, "WWW::Mechanize not installed");
    }

    #[test]
    fn test_parse_test_point_full() {
        let result = parse_test_point("not ok 2 - Summarized correctly # TODO Not written yet", 99)
            .expect("Should parse");
        assert_eq!(result.status, TestStatus::NotOk);
        assert_eq!(result.index, 2);
        assert_eq!(result.description, "Summarized correctly");
        assert!(result.todo);
        assert_eq!(result.directive, "Not written yet");
    }

    #[test]
    fn test_parse_test_point_bare_ok_uses_fallback_index() {
        let result = parse_test_point("ok", 5).expect("Should parse");
        assert_eq!(result.status, TestStatus::Ok);
        assert_eq!(result.index, 5);
        assert_eq!(result.description, "");
        assert_eq!(result.directive, "");
    }

    #[test]
    fn test_parse_test_point_without_dash() {
        let result = parse_test_point("ok 23 here we go", 1).expect("Should parse");
        assert_eq!(result.index, 23);
        assert_eq!(result.description, "here we go");
    }

    #[test]
    fn test_parse_test_point_skip_directive() {
        let result = parse_test_point("ok 4 # skip no /sys on this platform", 1).expect("Should parse");
        assert!(result.skipped);
        assert!(!result.todo);
        assert_eq!(result.directive, "no /sys on this platform");
        assert_eq!(result.description, "");
    }

    #[test]
    fn test_parse_test_point_huge_index_uses_fallback() {
        let result = parse_test_point("ok 99999999999 - big", 3).expect("Should parse");
        assert_eq!(result.index, 3);
    }

    #[test]
    fn test_parse_diagnostic_trims() {
        assert_eq!(parse_diagnostic("#   Create the file   "), Some("Create the file"));
        assert_eq!(parse_diagnostic("#"), Some(""));
        assert_eq!(parse_diagnostic("ok 1"), None);
    }

    #[test]
    fn test_parse_bail_out_message() {
        assert_eq!(
            parse_bail_out("Bail out! Couldn't connect to database."),
            Some("Couldn't connect to database.")
        );
        assert_eq!(parse_bail_out("BAIL OUT!"), Some(""));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: classification is total over arbitrary lines
        #[test]
        fn prop_classify_never_panics(line in "\\PC*", in_block: bool) {
            let _ = classify(&line, in_block);
        }

        /// Property: inside a block every line is terminator or content
        #[test]
        fn prop_block_lines_are_end_or_content(line in "\\PC*") {
            let kind = classify(&line, true);
            prop_assert!(kind == LineKind::YamlEnd || kind == LineKind::YamlContent);
        }

        /// Property: a well-formed plan line always classifies as a plan
        #[test]
        fn prop_plan_lines_classify_as_plan(first in 0u32..1000, last in 0u32..1000) {
            let line = format!("{first}..{last}");
            prop_assert_eq!(classify(&line, false), LineKind::Plan);
        }
    }
}
