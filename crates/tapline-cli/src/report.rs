//! Session reporting
//!
//! Wraps a parsed [`TestSession`] with derived counts and a timestamp,
//! ready for JSON output or plain-text rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tapline::TestSession;

/// Report over one parsed TAP session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// When the report was generated
    pub parsed_at: DateTime<Utc>,
    /// Declared TAP version (0 when the stream had none)
    pub version: u32,
    /// Total test points, reconciliation placeholders included
    pub total: usize,
    /// Passing test points
    pub passed: usize,
    /// Failing test points
    pub failed: usize,
    /// Test points carrying a skip directive
    pub skipped: usize,
    /// Test points carrying a todo directive
    pub todo: usize,
    /// Whether the stream bailed out
    pub bailed_out: bool,
    /// The full parsed session
    pub session: TestSession,
}

impl SessionReport {
    /// Build a report from a parsed session
    #[must_use]
    pub fn from_session(session: TestSession) -> Self {
        Self {
            parsed_at: Utc::now(),
            version: session.version,
            total: session.test_count(),
            passed: session.ok_count(),
            failed: session.not_ok_count(),
            skipped: session.skipped_count(),
            todo: session.todo_count(),
            bailed_out: session.bailed_out,
            session,
        }
    }

    /// Whether the run is clean: nothing failed and nothing bailed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed == 0 && !self.bailed_out
    }

    /// Render the human-readable summary
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "tests: {} passed: {} failed: {} skipped: {} todo: {}\n",
            self.total, self.passed, self.failed, self.skipped, self.todo
        ));
        for failure in self.session.failures() {
            if failure.description.is_empty() {
                out.push_str(&format!("  not ok {}\n", failure.index));
            } else {
                out.push_str(&format!(
                    "  not ok {} - {}\n",
                    failure.index, failure.description
                ));
            }
        }
        if self.bailed_out {
            out.push_str(&format!(
                "bailed out: {}\n",
                self.session.bail_out_message.as_deref().unwrap_or("")
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn report_for(input: &str) -> SessionReport {
        let session = tapline::parse_str(input).expect("Should parse");
        SessionReport::from_session(session)
    }

    #[test]
    fn test_counts_from_session() {
        let report = report_for(
            "1..4\nok 1 - A\nnot ok 2 - B\nok 3 - C # skip later\nok 4 - D # TODO someday\n",
        );
        assert_eq!(report.total, 4);
        assert_eq!(report.passed, 3);
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.todo, 1);
        assert!(!report.bailed_out);
        assert!(!report.is_success());
    }

    #[test]
    fn test_success_report() {
        let report = report_for("1..1\nok 1 - only\n");
        assert!(report.is_success());
        let text = report.render_text();
        assert!(text.starts_with("tests: 1 passed: 1 failed: 0"));
        assert!(!text.contains("not ok"));
        assert!(!text.contains("bailed out"));
    }

    #[test]
    fn test_failures_are_listed() {
        let report = report_for("1..2\nok 1 - fine\nnot ok 2 - exploded\n");
        let text = report.render_text();
        assert!(text.contains("  not ok 2 - exploded\n"));
    }

    #[test]
    fn test_synthesized_failures_render_without_description() {
        let report = report_for("1..2\nok 1\n");
        let text = report.render_text();
        assert!(text.contains("  not ok 2\n"));
    }

    #[test]
    fn test_bail_out_rendered() {
        let report = report_for("ok 1\nBail out! lost the database\n");
        assert!(report.bailed_out);
        assert!(!report.is_success());
        assert!(report.render_text().contains("bailed out: lost the database"));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = report_for("TAP version 13\n1..1\nok 1 - solo\n");
        let json = serde_json::to_string_pretty(&report).expect("serialize");
        assert!(json.contains("\"version\": 13"));
        assert!(json.contains("\"total\": 1"));
        assert!(json.contains("\"parsed_at\""));
        assert!(json.contains("\"description\": \"solo\""));
    }
}
