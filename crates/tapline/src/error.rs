// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for tapline

use thiserror::Error;

/// Errors that can occur while parsing a TAP stream
///
/// Only some of these abort a parse. `UnsupportedVersion`, `Io` and `Task`
/// are fatal and surface as the `Err` arm of [`crate::TapParser::parse`].
/// The rest are delivered to the error event channel while parsing
/// continues past the offending line.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Line matched none of the TAP line grammars
    #[error("unrecognized TAP line: {line:?}")]
    UnrecognizedLine {
        /// The offending line, verbatim
        line: String,
    },

    /// Version line declared a TAP version newer than this parser speaks
    #[error("unsupported TAP version {version} (maximum supported is 13)")]
    UnsupportedVersion {
        /// The declared version
        version: u64,
    },

    /// A YAML block terminator arrived before any test point existed
    #[error("YAML block closed with no test point to attach to")]
    DanglingYamlBlock,

    /// A registered event listener returned an error
    #[error("{channel} listener error: {source}")]
    Listener {
        /// Name of the event channel the listener was registered on
        channel: &'static str,
        /// Error returned by the listener
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error reading from the input stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Background parse task panicked or was cancelled
    #[error("parse task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ParseError {
    /// Whether this error aborts the parse rather than being reported
    /// through the error channel
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ParseError::UnsupportedVersion { .. } | ParseError::Io(_) | ParseError::Task(_)
        )
    }
}
