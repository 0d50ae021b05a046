//! tapline-cli library
//!
//! This module exports the CLI's configuration and reporting pieces for
//! use in integration tests and by the `tapline` binary.

pub mod config;
pub mod report;
