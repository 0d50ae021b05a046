//! Session accumulation and plan reconciliation

use crate::result::{TestPlan, TestResult};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::debug;

/// Everything one TAP stream reported, in stream order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestSession {
    /// Declared TAP version (0 when the stream had no version line)
    pub version: u32,
    /// Declared plan; `None` when the stream never declared one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<TestPlan>,
    /// Test points in stream order, including reconciliation placeholders
    pub results: Vec<TestResult>,
    /// Diagnostics seen before the first test point
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
    /// Stream contained a `Bail out!` line
    pub bailed_out: bool,
    /// Message from the bail-out line, when one occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bail_out_message: Option<String>,
}

impl TestSession {
    /// Whether every test point passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(TestResult::passed)
    }

    /// Test points that failed
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResult> {
        self.results.iter().filter(|r| r.failed()).collect()
    }

    /// Number of test points
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.results.len()
    }

    /// Whether the session reported no test points at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of passing test points
    #[must_use]
    pub fn ok_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    /// Number of failing test points
    #[must_use]
    pub fn not_ok_count(&self) -> usize {
        self.results.iter().filter(|r| r.failed()).count()
    }

    /// Number of test points carrying a `skip` directive
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.results.iter().filter(|r| r.skipped).count()
    }

    /// Number of test points carrying a `todo` directive
    #[must_use]
    pub fn todo_count(&self) -> usize {
        self.results.iter().filter(|r| r.todo).count()
    }
}

/// Mutable accumulator the parser drives while consuming a stream
///
/// Finalized exactly once via [`SessionBuilder::into_session`].
#[derive(Debug, Default)]
pub(crate) struct SessionBuilder {
    version: u32,
    plan: Option<TestPlan>,
    results: Vec<TestResult>,
    diagnostics: Vec<String>,
    bailed_out: bool,
    bail_out_message: Option<String>,
}

impl SessionBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    /// Record the plan. A later plan line replaces an earlier one.
    pub(crate) fn set_plan(&mut self, plan: TestPlan) {
        if self.plan.is_some() {
            debug!(
                first = plan.first,
                last = plan.last,
                "replacing previously declared plan"
            );
        }
        self.plan = Some(plan);
    }

    pub(crate) fn push_result(&mut self, result: TestResult) {
        self.results.push(result);
    }

    /// Index to assign to a test point that did not number itself
    pub(crate) fn next_index(&self) -> u32 {
        self.results.len() as u32 + 1
    }

    pub(crate) fn last_result_mut(&mut self) -> Option<&mut TestResult> {
        self.results.last_mut()
    }

    /// Attach a diagnostic to the most recent test point
    ///
    /// Returns the mutated point so the caller can notify observers, or
    /// `None` when no test point exists yet and the diagnostic belongs to
    /// the session instead.
    pub(crate) fn append_test_diagnostic(&mut self, message: &str) -> Option<&TestResult> {
        let result = self.results.last_mut()?;
        result.diagnostics.push(message.to_string());
        Some(&*result)
    }

    pub(crate) fn append_session_diagnostic(&mut self, message: &str) {
        self.diagnostics.push(message.to_string());
    }

    pub(crate) fn set_bail_out(&mut self, message: &str) {
        self.bailed_out = true;
        self.bail_out_message = Some(message.to_string());
    }

    pub(crate) fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Fill the gap between what the plan declared and what the stream
    /// reported
    ///
    /// Appends a failed placeholder for every planned test that never
    /// showed up, numbered contiguously after the observed points.
    /// Returns the range of appended entries so the caller can deliver
    /// them to observers like any other result. Streams without a plan
    /// (or with an empty or reversed range) are left untouched.
    pub(crate) fn reconcile(&mut self) -> Range<usize> {
        let observed = self.results.len();
        let Some(plan) = &self.plan else {
            return observed..observed;
        };

        let expected = plan.expected_count();
        if expected > observed as u64 {
            debug!(
                declared = expected,
                observed, "plan declared more tests than the stream reported"
            );
        }
        while (self.results.len() as u64) < expected {
            let index = self.next_index();
            self.results.push(TestResult::missing(index));
        }

        observed..self.results.len()
    }

    /// Finalize into the immutable session record
    pub(crate) fn into_session(self) -> TestSession {
        TestSession {
            version: self.version,
            plan: self.plan,
            results: self.results,
            diagnostics: self.diagnostics,
            bailed_out: self.bailed_out,
            bail_out_message: self.bail_out_message,
        }
    }
}
