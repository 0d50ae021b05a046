// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for line classification
//!
//! This fuzzes `classify` in both block states; classification must be
//! total and, inside a YAML block, must only ever report terminator or
//! content.

#![no_main]

use libfuzzer_sys::fuzz_target;

use tapline::{LineKind, classify};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        for line in input.lines() {
            let _ = classify(line, false);

            let kind = classify(line, true);
            assert!(
                kind == LineKind::YamlEnd || kind == LineKind::YamlContent,
                "in-block classification must be terminator or content"
            );
        }
    }
});
