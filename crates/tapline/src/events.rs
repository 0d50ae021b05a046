// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Event channels for streaming observation
//!
//! The parser exposes eight channels, one per interesting occurrence:
//! version, plan, test-result, test-diagnostic, session-diagnostic, yaml,
//! bail-out and error. Each channel holds any number of listeners which
//! are invoked synchronously, in registration order, as the stream is
//! consumed.
//!
//! Listeners are fallible but isolated: one listener returning an error
//! neither stops the parse nor silences the other listeners of its
//! channel. The failure is wrapped in [`ParseError::Listener`] and
//! delivered on the error channel after the channel's remaining
//! listeners have run. Failures from error listeners themselves are
//! dropped.

use crate::error::ParseError;
use crate::result::{TestPlan, TestResult};
use tracing::debug;

/// What a listener returns
///
/// `Err` is reported on the error channel without stopping the parse.
pub type ListenerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

type VersionListener = Box<dyn FnMut(u32) -> ListenerResult + Send>;
type PlanListener = Box<dyn FnMut(&TestPlan) -> ListenerResult + Send>;
type TestResultListener = Box<dyn FnMut(&TestResult) -> ListenerResult + Send>;
type TestDiagnosticListener = Box<dyn FnMut(&TestResult, &str) -> ListenerResult + Send>;
type SessionDiagnosticListener = Box<dyn FnMut(&str) -> ListenerResult + Send>;
type YamlListener = Box<dyn FnMut(&TestResult) -> ListenerResult + Send>;
type BailOutListener = Box<dyn FnMut(&str) -> ListenerResult + Send>;
type ErrorListener = Box<dyn FnMut(&ParseError) -> ListenerResult + Send>;

/// Listener registry, one `Vec` per channel
#[derive(Default)]
pub(crate) struct Listeners {
    pub(crate) version: Vec<VersionListener>,
    pub(crate) plan: Vec<PlanListener>,
    pub(crate) test_result: Vec<TestResultListener>,
    pub(crate) test_diagnostic: Vec<TestDiagnosticListener>,
    pub(crate) session_diagnostic: Vec<SessionDiagnosticListener>,
    pub(crate) yaml: Vec<YamlListener>,
    pub(crate) bail_out: Vec<BailOutListener>,
    pub(crate) error: Vec<ErrorListener>,
}

impl Listeners {
    pub(crate) fn emit_version(&mut self, version: u32) {
        let mut failures = Vec::new();
        for listener in &mut self.version {
            if let Err(source) = listener(version) {
                failures.push(source);
            }
        }
        self.report_failures("version", failures);
    }

    pub(crate) fn emit_plan(&mut self, plan: &TestPlan) {
        let mut failures = Vec::new();
        for listener in &mut self.plan {
            if let Err(source) = listener(plan) {
                failures.push(source);
            }
        }
        self.report_failures("plan", failures);
    }

    pub(crate) fn emit_test_result(&mut self, result: &TestResult) {
        let mut failures = Vec::new();
        for listener in &mut self.test_result {
            if let Err(source) = listener(result) {
                failures.push(source);
            }
        }
        self.report_failures("test-result", failures);
    }

    pub(crate) fn emit_test_diagnostic(&mut self, result: &TestResult, message: &str) {
        let mut failures = Vec::new();
        for listener in &mut self.test_diagnostic {
            if let Err(source) = listener(result, message) {
                failures.push(source);
            }
        }
        self.report_failures("test-diagnostic", failures);
    }

    pub(crate) fn emit_session_diagnostic(&mut self, message: &str) {
        let mut failures = Vec::new();
        for listener in &mut self.session_diagnostic {
            if let Err(source) = listener(message) {
                failures.push(source);
            }
        }
        self.report_failures("session-diagnostic", failures);
    }

    pub(crate) fn emit_yaml(&mut self, result: &TestResult) {
        let mut failures = Vec::new();
        for listener in &mut self.yaml {
            if let Err(source) = listener(result) {
                failures.push(source);
            }
        }
        self.report_failures("yaml", failures);
    }

    pub(crate) fn emit_bail_out(&mut self, message: &str) {
        let mut failures = Vec::new();
        for listener in &mut self.bail_out {
            if let Err(source) = listener(message) {
                failures.push(source);
            }
        }
        self.report_failures("bail-out", failures);
    }

    /// Deliver an error to the error channel
    ///
    /// A listener failing here has nowhere left to report to; it is
    /// logged and dropped.
    pub(crate) fn emit_error(&mut self, error: &ParseError) {
        for listener in &mut self.error {
            if let Err(source) = listener(error) {
                debug!(error = %source, "error listener failed; dropping its error");
            }
        }
    }

    fn report_failures(
        &mut self,
        channel: &'static str,
        failures: Vec<Box<dyn std::error::Error + Send + Sync>>,
    ) {
        for source in failures {
            self.emit_error(&ParseError::Listener { channel, source });
        }
    }
}
