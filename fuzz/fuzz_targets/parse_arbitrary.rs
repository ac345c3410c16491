// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for parser crash safety testing.
//!
//! Feeds arbitrary byte sequences through `tokenize` and `parse` and asserts
//! that neither panics. Every input must produce either a `Program` or a
//! single error.
//!
//! # Corpus Seeding
//!
//! Seed `fuzz/corpus/parse_arbitrary/` with the `.sos` files from
//! `crates/smallos-core/tests/cases/`.

#![no_main]

use libfuzzer_sys::fuzz_target;
use smallos_core::analyse::trim_unreachable;
use smallos_core::source_analysis::{parse, tokenize};

fuzz_target!(|data: &[u8]| {
    // The lexer works on `&str`; invalid UTF-8 never reaches it.
    if let Ok(source) = std::str::from_utf8(data) {
        let Ok(tokens) = tokenize(source) else {
            return;
        };
        let count = tokens.len();
        match parse(tokens) {
            Ok(program) => {
                let trimmed = trim_unreachable(program);
                assert!(trimmed.len() < count);
            }
            Err(error) => assert!(error.span.end() as usize <= source.len()),
        }
    }
});
