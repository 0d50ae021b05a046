//! TAP data model types

use serde::{Deserialize, Serialize};

/// Outcome of a single test point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestStatus {
    /// The test point passed (`ok`)
    Ok,
    /// The test point failed (`not ok`)
    NotOk,
}

/// A single test point reported by the stream
///
/// One of these is produced per `ok` / `not ok` line, then enriched in
/// place while it remains the most recent point: a following YAML block
/// lands in `yaml` (or `yaml_error` when it does not decode), and
/// diagnostic lines land in `diagnostics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Pass/fail status
    pub status: TestStatus,
    /// 1-based test number, taken from the line when present and
    /// otherwise assigned from the running count
    pub index: u32,
    /// Description text, trimmed
    pub description: String,
    /// Directive reason text (empty when the line had no directive)
    pub directive: String,
    /// Test point carried a `todo` directive
    pub todo: bool,
    /// Test point carried a `skip` directive
    pub skipped: bool,
    /// Decoded YAML block attached to this test point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaml: Option<serde_yaml::Value>,
    /// Decoder error for a YAML block that failed to parse
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaml_error: Option<String>,
    /// Diagnostic lines that followed this test point
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl TestResult {
    /// Placeholder for a planned test that never reported
    pub(crate) fn missing(index: u32) -> Self {
        Self {
            status: TestStatus::NotOk,
            index,
            description: String::new(),
            directive: String::new(),
            todo: false,
            skipped: false,
            yaml: None,
            yaml_error: None,
            diagnostics: Vec::new(),
        }
    }

    /// Whether this test point passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == TestStatus::Ok
    }

    /// Whether this test point failed
    #[must_use]
    pub fn failed(&self) -> bool {
        self.status == TestStatus::NotOk
    }
}

/// The declared test plan (`1..N`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPlan {
    /// First planned test number
    pub first: u32,
    /// Last planned test number
    pub last: u32,
    /// Directive reason text (a skipped plan explains itself here)
    pub directive: String,
    /// Plan carried a `todo` directive
    pub todo: bool,
    /// Plan carried a `skip` directive (the whole session was skipped)
    pub skipped: bool,
}

impl TestPlan {
    /// Number of tests the plan declares
    ///
    /// A reversed range such as `5..1` declares zero tests.
    #[must_use]
    pub fn expected_count(&self) -> u64 {
        if self.last < self.first {
            0
        } else {
            u64::from(self.last) - u64::from(self.first) + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_status_serde_forms() {
        assert_eq!(
            serde_json::to_string(&TestStatus::Ok).expect("serialize"),
            "\"ok\""
        );
        assert_eq!(
            serde_json::to_string(&TestStatus::NotOk).expect("serialize"),
            "\"not-ok\""
        );
        let status: TestStatus = serde_json::from_str("\"not-ok\"").expect("deserialize");
        assert_eq!(status, TestStatus::NotOk);
    }

    #[test]
    fn test_missing_placeholder_shape() {
        let placeholder = TestResult::missing(7);
        assert_eq!(placeholder.index, 7);
        assert!(placeholder.failed());
        assert_eq!(placeholder.description, "");
        assert_eq!(placeholder.directive, "");
        assert!(!placeholder.todo);
        assert!(!placeholder.skipped);
        assert!(placeholder.yaml.is_none());
        assert!(placeholder.diagnostics.is_empty());
    }

    #[test]
    fn test_empty_optionals_are_omitted_from_json() {
        let json = serde_json::to_string(&TestResult::missing(1)).expect("serialize");
        assert!(!json.contains("yaml"));
        assert!(!json.contains("diagnostics"));
    }

    #[test]
    fn test_result_json_roundtrip() {
        let result = TestResult {
            status: TestStatus::Ok,
            index: 2,
            description: "connects to the broker".to_string(),
            directive: "flaky on ci".to_string(),
            todo: true,
            skipped: false,
            yaml: Some(serde_yaml::from_str("severity: low").expect("yaml")),
            yaml_error: None,
            diagnostics: vec!["retried once".to_string()],
        };
        let json = serde_json::to_string(&result).expect("serialize");
        let back: TestResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, result);
    }

    #[test]
    fn test_plan_expected_count() {
        let plan = TestPlan {
            first: 1,
            last: 5,
            directive: String::new(),
            todo: false,
            skipped: false,
        };
        assert_eq!(plan.expected_count(), 5);

        let single = TestPlan { first: 3, last: 3, ..plan.clone() };
        assert_eq!(single.expected_count(), 1);

        let reversed = TestPlan { first: 5, last: 1, ..plan };
        assert_eq!(reversed.expected_count(), 0);
    }
}
