// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Smallos source code.
//!
//! The lexer is a single left-to-right scan. At each position the lexical
//! rules are tried in a fixed priority order and the first one that applies
//! wins:
//!
//! 1. line comment `// ...` (discarded)
//! 2. symbol `#name`
//! 3. assignment `:=`
//! 4. single-character punctuation
//! 5. string `"..."` with `""` as an embedded quote
//! 6. byte `xHH`
//! 7. number, optionally signed, optionally with a fraction
//! 8. identifier or reserved word
//! 9. binary operator cluster from `- + / * = < > !`
//! 10. newline (counted, no token)
//! 11. horizontal whitespace (skipped)
//!
//! Anything else is a [`LexError`]. Lexing is fail-fast: no partial token
//! stream is returned on error.
//!
//! # Example
//!
//! ```
//! use smallos_core::source_analysis::{TokenKind, tokenize};
//!
//! let tokens = tokenize("x := 1 + 2.").unwrap();
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind()).collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         TokenKind::Identifier,
//!         TokenKind::Assign,
//!         TokenKind::Number,
//!         TokenKind::BinaryOperator,
//!         TokenKind::Number,
//!         TokenKind::Period,
//!         TokenKind::Eof,
//!     ]
//! );
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use tracing::debug;

use super::{LexError, Span, Token, TokenKind};

/// A lexer over Smallos source text.
///
/// As an [`Iterator`] it yields every token except the final `EOF`, and stops
/// after the first error. Use [`tokenize`] to get the complete sequence.
pub struct Lexer<'src> {
    source: &'src str,
    chars: Peekable<CharIndices<'src>>,
    /// Current byte position in source.
    position: usize,
    /// 1-based line of the character at `position`.
    line: u32,
    finished: bool,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.position)
            .field("line", &self.line)
            .field("remaining", &self.source.get(self.position..).unwrap_or(""))
            .finish()
    }
}

impl<'src> Lexer<'src> {
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            position: 0,
            line: 1,
            finished: false,
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peeks `n` characters past the next one (`n == 0` is `peek_char`).
    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.chars.clone().nth(n).map(|(_, c)| c)
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        Some(c)
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn current_position(&self) -> u32 {
        self.position as u32
    }

    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.current_position())
    }

    fn text_for(&self, span: Span) -> &'src str {
        &self.source[span.as_range()]
    }

    /// Skips comments, newlines and horizontal whitespace.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some('/') if self.peek_char_n(1) == Some('/') => {
                    self.advance_while(|c| c != '\n');
                }
                Some('\n') => {
                    self.advance();
                    self.line += 1;
                }
                Some(' ' | '\t' | '\r') => {
                    self.advance_while(|c| matches!(c, ' ' | '\t' | '\r'));
                }
                _ => break,
            }
        }
    }

    /// Lexes the next token, returning an `EOF` token once input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] for a character no rule accepts or for a string
    /// that is never closed.
    pub fn lex_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia();

        let start = self.current_position();
        let line = self.line;

        let Some(c) = self.peek_char() else {
            return Ok(Token::eof(line, start));
        };

        let kind = self.lex_token_kind(c, start, line)?;
        let span = self.span_from(start);
        Ok(Token::new(kind, self.text_for(span), line, span))
    }

    /// Applies the lexical rules in priority order to the token starting at `c`.
    fn lex_token_kind(&mut self, c: char, start: u32, line: u32) -> Result<TokenKind, LexError> {
        if c == '#' && self.peek_char_n(1).is_some_and(is_symbol_start) {
            return Ok(self.lex_symbol());
        }

        if c == ':' && self.peek_char_n(1) == Some('=') {
            self.advance(); // :
            self.advance(); // =
            return Ok(TokenKind::Assign);
        }

        if let Some(kind) = TokenKind::punctuation(c) {
            self.advance();
            return Ok(kind);
        }

        if c == '"' {
            return self.lex_string(start, line);
        }

        if c == 'x'
            && self.peek_char_n(1).is_some_and(|c| c.is_ascii_hexdigit())
            && self.peek_char_n(2).is_some_and(|c| c.is_ascii_hexdigit())
        {
            self.advance(); // x
            self.advance();
            self.advance();
            return Ok(TokenKind::Byte);
        }

        if c.is_ascii_digit()
            || (matches!(c, '+' | '-') && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit()))
        {
            return Ok(self.lex_number());
        }

        if c.is_ascii_alphabetic() || c == '_' {
            return Ok(self.lex_identifier_or_reserved_word(start));
        }

        if is_operator_char(c) {
            self.advance_while(is_operator_char);
            return Ok(TokenKind::BinaryOperator);
        }

        self.advance();
        debug!(line, character = %c, "unexpected character");
        Err(LexError::unexpected_char(c, line, self.span_from(start)))
    }

    /// Lexes `#name`; the lexeme keeps the hash.
    fn lex_symbol(&mut self) -> TokenKind {
        self.advance(); // #
        self.advance_while(is_symbol_char);
        TokenKind::Symbol
    }

    /// Lexes a double-quoted string. Newlines inside the string are counted
    /// so that later tokens report the right line.
    fn lex_string(&mut self, start: u32, line: u32) -> Result<TokenKind, LexError> {
        self.advance(); // opening "
        loop {
            match self.peek_char() {
                None => {
                    debug!(line, "unterminated string literal");
                    return Err(LexError::unterminated_string(line, self.span_from(start)));
                }
                Some('"') if self.peek_char_n(1) == Some('"') => {
                    self.advance();
                    self.advance();
                }
                Some('"') => {
                    self.advance();
                    return Ok(TokenKind::String);
                }
                Some('\n') => {
                    self.advance();
                    self.line += 1;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Lexes `[-+]?digits(.digits)?`. A trailing `.` without digits is left
    /// for the next token so that `x := 1.` ends with a period.
    fn lex_number(&mut self) -> TokenKind {
        if matches!(self.peek_char(), Some('+' | '-')) {
            self.advance();
        }
        self.advance_while(|c| c.is_ascii_digit());

        if self.peek_char() == Some('.')
            && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.advance(); // .
            self.advance_while(|c| c.is_ascii_digit());
        }
        TokenKind::Number
    }

    fn lex_identifier_or_reserved_word(&mut self, start: u32) -> TokenKind {
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let text = self.text_for(self.span_from(start));
        TokenKind::reserved_word(text).unwrap_or(TokenKind::Identifier)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.lex_token() {
            Ok(token) if token.kind().is_eof() => {
                self.finished = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

fn is_symbol_start(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '_' | '$')
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$')
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '-' | '+' | '/' | '*' | '=' | '<' | '>' | '!')
}

/// Converts source text into a token sequence terminated by exactly one `EOF`.
///
/// # Errors
///
/// Returns the first [`LexError`] encountered; no partial sequence is
/// returned.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.lex_token()?;
        let is_eof = token.kind().is_eof();
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    debug!(
        source_len = source.len(),
        tokens = tokens.len(),
        "tokenized source"
    );
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::LexErrorKind;

    /// Helper to lex and extract just the token kinds (EOF included).
    fn lex_kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .iter()
            .map(Token::kind)
            .collect()
    }

    fn lex_lexemes(source: &str) -> Vec<String> {
        tokenize(source)
            .unwrap()
            .iter()
            .map(|t| t.lexeme().to_string())
            .collect()
    }

    #[test]
    fn lex_empty() {
        assert_eq!(lex_kinds(""), vec![TokenKind::Eof]);
        assert_eq!(lex_kinds("   \t "), vec![TokenKind::Eof]);
        assert_eq!(lex_kinds("// only a comment"), vec![TokenKind::Eof]);
    }

    #[test]
    fn eof_is_on_last_line() {
        let tokens = tokenize("a\nb\n\n").unwrap();
        let eof = tokens.last().unwrap();
        assert!(eof.kind().is_eof());
        assert_eq!(eof.line(), 4);
        assert_eq!(eof.lexeme().as_str(), "");
    }

    #[test]
    fn lex_hello_world() {
        let tokens = tokenize("Transcript show: \"Hello World!\".").unwrap();
        let dump: Vec<_> = tokens.iter().map(ToString::to_string).collect();
        assert_eq!(
            dump,
            vec![
                "(<ID> Transcript @ 1)",
                "(<ID> show @ 1)",
                "(<COLON> : @ 1)",
                "(<STRING> \"Hello World!\" @ 1)",
                "(<PERIOD> . @ 1)",
                "(<EOF>  @ 1)",
            ]
        );
    }

    #[test]
    fn lex_reserved_words() {
        let source = "class trait extending implementing is as static var def end require \
                      true false nil";
        assert_eq!(
            lex_kinds(source),
            vec![
                TokenKind::Class,
                TokenKind::Trait,
                TokenKind::Extending,
                TokenKind::Implementing,
                TokenKind::Is,
                TokenKind::As,
                TokenKind::Static,
                TokenKind::Var,
                TokenKind::Def,
                TokenKind::End,
                TokenKind::Require,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Nil,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn reserved_word_prefix_is_identifier() {
        assert_eq!(
            lex_kinds("classy End nil_value"),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_punctuation() {
        assert_eq!(
            lex_kinds(". : ; , # ( ) [ ] { } ^ | @ :="),
            vec![
                TokenKind::Period,
                TokenKind::Colon,
                TokenKind::Semicolon,
                TokenKind::Comma,
                TokenKind::Hash,
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Answer,
                TokenKind::Pipe,
                TokenKind::At,
                TokenKind::Assign,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_symbols() {
        assert_eq!(
            lex_lexemes("#foo #$bar #_x1"),
            vec!["#foo", "#$bar", "#_x1", ""]
        );
        assert_eq!(lex_kinds("#foo"), vec![TokenKind::Symbol, TokenKind::Eof]);
    }

    #[test]
    fn hash_before_non_name_is_punctuation() {
        assert_eq!(
            lex_kinds("#[ #( #1"),
            vec![
                TokenKind::Hash,
                TokenKind::LeftBracket,
                TokenKind::Hash,
                TokenKind::LeftParen,
                TokenKind::Hash,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_strings() {
        assert_eq!(
            lex_lexemes(r#""hi" "" "say ""yes""""#),
            vec![r#""hi""#, r#""""#, r#""say ""yes""""#, ""]
        );
    }

    #[test]
    fn multiline_string_advances_line() {
        let tokens = tokenize("\"one\ntwo\" x").unwrap();
        assert_eq!(tokens[0].kind(), TokenKind::String);
        assert_eq!(tokens[0].line(), 1);
        assert_eq!(tokens[1].kind(), TokenKind::Identifier);
        assert_eq!(tokens[1].line(), 2);
    }

    #[test]
    fn unterminated_string_is_error() {
        let err = tokenize("x := \"oops").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
        assert_eq!(err.line, 1);
        assert_eq!(err.span, Span::new(5, 10));
    }

    #[test]
    fn lex_bytes() {
        assert_eq!(
            lex_kinds("x00 xFf x1"),
            vec![
                TokenKind::Byte,
                TokenKind::Byte,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn byte_rule_wins_over_identifier() {
        assert_eq!(lex_lexemes("xff1"), vec!["xff", "1", ""]);
        assert_eq!(
            lex_kinds("xff1"),
            vec![TokenKind::Byte, TokenKind::Number, TokenKind::Eof]
        );
        assert_eq!(
            lex_kinds("xylophone"),
            vec![TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn lex_numbers() {
        assert_eq!(
            lex_lexemes("42 -7 +3 2.5 -0.25"),
            vec!["42", "-7", "+3", "2.5", "-0.25", ""]
        );
    }

    #[test]
    fn trailing_period_is_not_fraction() {
        assert_eq!(
            lex_kinds("1."),
            vec![TokenKind::Number, TokenKind::Period, TokenKind::Eof]
        );
    }

    #[test]
    fn signed_number_wins_over_operator() {
        assert_eq!(lex_lexemes("a -1"), vec!["a", "-1", ""]);
        assert_eq!(lex_lexemes("a - 1"), vec!["a", "-", "1", ""]);
    }

    #[test]
    fn operator_clusters_are_greedy() {
        assert_eq!(lex_lexemes("<= -> !== *"), vec!["<=", "->", "!==", "*", ""]);
        assert_eq!(lex_lexemes("+//x"), vec!["+//", "x", ""]);
    }

    #[test]
    fn comments_are_discarded() {
        assert_eq!(
            lex_kinds("a // comment ^ [ \"\nb"),
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn lines_are_tracked() {
        let tokens = tokenize("a\n\n  b // c\r\nd").unwrap();
        let lines: Vec<_> = tokens.iter().map(Token::line).collect();
        assert_eq!(lines, vec![1, 3, 4, 4]);
    }

    #[test]
    fn spans_cover_lexemes() {
        let source = "count := count + 1.";
        for token in tokenize(source).unwrap() {
            assert_eq!(&source[token.span().as_range()], token.lexeme().as_str());
        }
    }

    #[test]
    fn unexpected_character_is_error() {
        let err = tokenize("a\nb ~ c").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter('~'));
        assert_eq!(err.line, 2);
        assert_eq!(err.span, Span::new(4, 5));
    }

    #[test]
    fn non_ascii_character_is_error() {
        let err = tokenize("é").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter('é'));
        assert_eq!(err.span.len(), 2);
    }

    #[test]
    fn iterator_excludes_eof_and_stops_after_error() {
        let tokens: Vec<_> = Lexer::new("a b").collect();
        assert_eq!(tokens.len(), 2);

        let mut lexer = Lexer::new("a ? b");
        assert!(lexer.next().unwrap().is_ok());
        assert!(lexer.next().unwrap().is_err());
        assert!(lexer.next().is_none());
    }
}
