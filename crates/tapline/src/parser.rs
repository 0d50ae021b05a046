// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! TAP stream parsing
//!
//! [`TapParser`] consumes a TAP stream from any [`Read`] source in a
//! single forward pass, producing a [`TestSession`] and, along the way,
//! notifications on every registered event channel. Registration uses a
//! consuming builder:
//!
//! ```
//! use tapline::TapParser;
//!
//! let input = "TAP version 13\n1..2\nok 1 - addition\nnot ok 2 - subtraction\n";
//! let session = TapParser::new()
//!     .on_test_result(|result| {
//!         println!("test {}: {}", result.index, result.description);
//!         Ok(())
//!     })
//!     .parse(input.as_bytes())?;
//!
//! assert_eq!(session.test_count(), 2);
//! assert!(!session.all_passed());
//! # Ok::<(), tapline::ParseError>(())
//! ```
//!
//! Parsing is strictly sequential; one line is fully handled, listeners
//! included, before the next is read. [`TapParser::parse_async`] runs the
//! same algorithm on a blocking worker thread.

use crate::error::ParseError;
use crate::events::{ListenerResult, Listeners};
use crate::line::{self, LineKind};
use crate::result::{TestPlan, TestResult};
use crate::session::{SessionBuilder, TestSession};
use crate::yaml::YamlBlock;
use std::io::{BufRead, BufReader, Read};
use tracing::{debug, trace, warn};

/// Highest TAP version this parser accepts
pub const MAX_TAP_VERSION: u32 = 13;

/// Streaming TAP parser with optional event listeners
///
/// A parser instance handles exactly one stream: both entry points take
/// `self` by value.
pub struct TapParser {
    events: Listeners,
}

impl TapParser {
    /// Create a parser with no listeners registered
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Listeners::default(),
        }
    }

    /// Register a listener for the version channel
    #[must_use]
    pub fn on_version(
        mut self,
        listener: impl FnMut(u32) -> ListenerResult + Send + 'static,
    ) -> Self {
        self.events.version.push(Box::new(listener));
        self
    }

    /// Register a listener for the plan channel
    #[must_use]
    pub fn on_plan(
        mut self,
        listener: impl FnMut(&TestPlan) -> ListenerResult + Send + 'static,
    ) -> Self {
        self.events.plan.push(Box::new(listener));
        self
    }

    /// Register a listener for the test-result channel
    ///
    /// Fires once per test point line and once per placeholder
    /// synthesized during plan reconciliation; observers cannot tell the
    /// two apart.
    #[must_use]
    pub fn on_test_result(
        mut self,
        listener: impl FnMut(&TestResult) -> ListenerResult + Send + 'static,
    ) -> Self {
        self.events.test_result.push(Box::new(listener));
        self
    }

    /// Register a listener for diagnostics attached to a test point
    ///
    /// The listener receives the owning test point (with the diagnostic
    /// already appended) and the diagnostic message.
    #[must_use]
    pub fn on_test_diagnostic(
        mut self,
        listener: impl FnMut(&TestResult, &str) -> ListenerResult + Send + 'static,
    ) -> Self {
        self.events.test_diagnostic.push(Box::new(listener));
        self
    }

    /// Register a listener for diagnostics seen before any test point
    #[must_use]
    pub fn on_session_diagnostic(
        mut self,
        listener: impl FnMut(&str) -> ListenerResult + Send + 'static,
    ) -> Self {
        self.events.session_diagnostic.push(Box::new(listener));
        self
    }

    /// Register a listener for YAML block attachment
    ///
    /// Fires when a block closes, with the owning test point carrying
    /// either the decoded value or the decoder's error message.
    #[must_use]
    pub fn on_yaml(
        mut self,
        listener: impl FnMut(&TestResult) -> ListenerResult + Send + 'static,
    ) -> Self {
        self.events.yaml.push(Box::new(listener));
        self
    }

    /// Register a listener for the bail-out channel
    #[must_use]
    pub fn on_bail_out(
        mut self,
        listener: impl FnMut(&str) -> ListenerResult + Send + 'static,
    ) -> Self {
        self.events.bail_out.push(Box::new(listener));
        self
    }

    /// Register a listener for non-fatal parse errors
    ///
    /// Receives unrecognized lines, dangling YAML terminators and
    /// failures from other listeners, live, as parsing passes them.
    #[must_use]
    pub fn on_error(
        mut self,
        listener: impl FnMut(&ParseError) -> ListenerResult + Send + 'static,
    ) -> Self {
        self.events.error.push(Box::new(listener));
        self
    }

    /// Consume the stream and produce the final session
    ///
    /// Lines are read until end of stream. Non-fatal conditions are
    /// reported on the error channel and skipped; after the last line the
    /// plan is reconciled against the observed results.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnsupportedVersion` for a version line above
    /// [`MAX_TAP_VERSION`], or `ParseError::Io` if reading from the
    /// stream fails (invalid UTF-8 included).
    pub fn parse<R: Read>(self, reader: R) -> Result<TestSession, ParseError> {
        let mut events = self.events;
        let mut builder = SessionBuilder::new();
        let mut block = YamlBlock::new();

        for line in BufReader::new(reader).lines() {
            let line = line?;
            let kind = line::classify(&line, block.is_active());
            trace!(kind = ?kind, line = %line, "classified line");

            match kind {
                LineKind::Version => {
                    let Some(version) = line::parse_version(&line) else {
                        report_unrecognized(&mut events, &line);
                        continue;
                    };
                    if version > u64::from(MAX_TAP_VERSION) {
                        return Err(ParseError::UnsupportedVersion { version });
                    }
                    debug!(version, "TAP version declared");
                    events.emit_version(version as u32);
                    builder.set_version(version as u32);
                }
                LineKind::Plan => {
                    let Some(plan) = line::parse_plan(&line) else {
                        report_unrecognized(&mut events, &line);
                        continue;
                    };
                    debug!(
                        first = plan.first,
                        last = plan.last,
                        skipped = plan.skipped,
                        "plan declared"
                    );
                    events.emit_plan(&plan);
                    builder.set_plan(plan);
                }
                LineKind::TestPoint => {
                    let Some(result) = line::parse_test_point(&line, builder.next_index())
                    else {
                        report_unrecognized(&mut events, &line);
                        continue;
                    };
                    builder.push_result(result);
                    if let Some(result) = builder.results().last() {
                        events.emit_test_result(result);
                    }
                }
                LineKind::Diagnostic => {
                    let Some(message) = line::parse_diagnostic(&line) else {
                        report_unrecognized(&mut events, &line);
                        continue;
                    };
                    match builder.append_test_diagnostic(message) {
                        Some(result) => events.emit_test_diagnostic(result, message),
                        None => {
                            builder.append_session_diagnostic(message);
                            events.emit_session_diagnostic(message);
                        }
                    }
                }
                LineKind::YamlStart => block.begin(),
                LineKind::YamlContent => block.push_line(&line),
                LineKind::YamlEnd => match builder.last_result_mut() {
                    Some(result) => {
                        match block.finish() {
                            Ok(value) => {
                                result.yaml = Some(value);
                                result.yaml_error = None;
                            }
                            Err(err) => {
                                warn!(error = %err, "YAML block failed to decode");
                                result.yaml = None;
                                result.yaml_error = Some(err.to_string());
                            }
                        }
                        events.emit_yaml(&*result);
                    }
                    None => {
                        warn!("YAML block closed with no test point to attach to");
                        block.discard();
                        events.emit_error(&ParseError::DanglingYamlBlock);
                    }
                },
                LineKind::BailOut => {
                    let Some(message) = line::parse_bail_out(&line) else {
                        report_unrecognized(&mut events, &line);
                        continue;
                    };
                    warn!(message = %message, "stream bailed out");
                    events.emit_bail_out(message);
                    builder.set_bail_out(message);
                }
                LineKind::Unknown => {
                    if !line.is_empty() {
                        report_unrecognized(&mut events, &line);
                    }
                }
            }
        }

        if block.is_active() {
            warn!("stream ended inside an unterminated YAML block");
            block.discard();
        }

        let appended = builder.reconcile();
        for result in &builder.results()[appended] {
            events.emit_test_result(result);
        }

        let session = builder.into_session();
        debug!(
            version = session.version,
            tests = session.test_count(),
            failed = session.not_ok_count(),
            bailed_out = session.bailed_out,
            "TAP stream consumed"
        );
        Ok(session)
    }

    /// Consume the stream on a blocking worker thread
    ///
    /// Identical semantics to [`TapParser::parse`]; listeners run on the
    /// worker thread in the same strict order.
    ///
    /// # Errors
    ///
    /// Everything [`TapParser::parse`] returns, plus `ParseError::Task`
    /// if the worker is cancelled or panics.
    pub async fn parse_async<R>(self, reader: R) -> Result<TestSession, ParseError>
    where
        R: Read + Send + 'static,
    {
        tokio::task::spawn_blocking(move || self.parse(reader)).await?
    }
}

impl Default for TapParser {
    fn default() -> Self {
        Self::new()
    }
}

fn report_unrecognized(events: &mut Listeners, line: &str) {
    warn!(line = %line, "line matched no TAP grammar");
    events.emit_error(&ParseError::UnrecognizedLine {
        line: line.to_string(),
    });
}

/// Parse a TAP stream without registering any listeners
///
/// # Errors
///
/// See [`TapParser::parse`].
pub fn parse<R: Read>(reader: R) -> Result<TestSession, ParseError> {
    TapParser::new().parse(reader)
}

/// Parse a TAP document held in memory
///
/// # Errors
///
/// See [`TapParser::parse`].
pub fn parse_str(input: &str) -> Result<TestSession, ParseError> {
    TapParser::new().parse(input.as_bytes())
}
