// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for directive parsing
//!
//! This fuzzes `Directive::parse` on arbitrary comment fragments; the
//! skip and todo flags must stay mutually exclusive and the extracted
//! reason must come back trimmed.

#![no_main]

use libfuzzer_sys::fuzz_target;

use tapline::Directive;

fuzz_target!(|data: &[u8]| {
    if let Ok(fragment) = std::str::from_utf8(data) {
        let directive = Directive::parse(fragment);
        assert!(
            !(directive.todo && directive.skipped),
            "skip and todo are mutually exclusive"
        );
        assert_eq!(
            directive.text.trim(),
            directive.text,
            "directive text must be trimmed"
        );
    }
});
