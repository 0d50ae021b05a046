// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for whole-stream TAP parsing
//!
//! This fuzzes `parse_str`, driving the classifier, directive parser,
//! YAML block machine and plan reconciliation in one pass.

#![no_main]

use libfuzzer_sys::fuzz_target;

use tapline::parse_str;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // parse_str should never panic on any input; fatal errors
        // (unsupported version) come back as Err
        let _ = parse_str(input);
    }
});
