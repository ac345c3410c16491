// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Byte-offset locations in Smallos source text.
//!
//! Tokens and errors carry a `Span` so diagnostics can point at the exact
//! characters involved. The AST itself is location-free.

use std::ops::Range;

/// A half-open byte range `start..end` into a source string.
///
/// # Examples
///
/// ```
/// use smallos_core::source_analysis::Span;
///
/// let span = Span::new(4, 9);
/// assert_eq!(span.len(), 5);
/// assert_eq!(&"var counter."[span.as_range()], "count");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: u32,
    end: u32,
}

impl Span {
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// An empty span positioned at `offset`.
    #[must_use]
    pub const fn point(offset: u32) -> Self {
        Self::new(offset, offset)
    }

    #[must_use]
    pub const fn start(self) -> u32 {
        self.start
    }

    /// Exclusive end offset.
    #[must_use]
    pub const fn end(self) -> u32 {
        self.end
    }

    #[must_use]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Extends this span so that it also ends where `other` ends.
    #[must_use]
    pub const fn to(self, other: Self) -> Self {
        let end = if other.end > self.end {
            other.end
        } else {
            self.end
        };
        Self::new(self.start, end)
    }

    #[must_use]
    pub const fn as_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start as usize, span.len() as usize).into()
    }
}
