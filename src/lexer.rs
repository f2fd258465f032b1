//! Lexer for the MedScript shorthand.
//!
//! Converts source text into a stream of [`Token`]s, one call at a time.
//! The lexer is total: a character it cannot classify becomes a one-character
//! [`TokenKind::Unknown`] token instead of an error, and once the end of the
//! input is reached every further call returns the same [`TokenKind::Eof`]
//! token.
//!
//! Recognizers run in a fixed priority order at every position: section
//! keywords, the colon, the domain keyword classes, numbers, identifiers,
//! then the one-character fallback. Because the single-letter duration units
//! are tried before identifiers, a free-standing `d`, `w` or `m` always
//! lexes as a duration unit, never as an identifier.

use crate::token::{Token, TokenKind};

// Domain keyword alphabets, matched case-sensitively.
const FORMS: &[&str] = &["Tab", "Cap", "Syr", "Inj", "Oint", "Drops", "Cream", "Neb"];
const ROUTES: &[&str] = &["po", "iv", "im", "sc", "sl", "pr", "topical", "inhale"];
const FREQUENCIES: &[&str] = &["od", "bd", "tds", "qid", "hs", "stat", "prn", "sos"];
const FOOD_MODIFIERS: &[&str] = &["ac", "pc", "with_meals", "after_food", "before_food"];
const UNITS: &[&str] = &["mg", "g", "ml", "mcg", "IU", "drops"];
const DURATION_UNITS: &[&str] = &["d", "w", "m"];

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    finished: bool,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            finished: false,
        }
    }

    /// Produce the next token. Safe to call again after the terminal token:
    /// every call at end of input yields the same Eof token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        if self.is_at_end() {
            return Token::new(TokenKind::Eof, "<EOF>", self.line, self.col);
        }

        // Section keywords first. "rx:" and "notes:" carry their colon;
        // "patient" and "allergy" need a word boundary so that identifiers
        // like "patients" stay identifiers.
        if self.matches_literal("rx:") {
            return self.take(TokenKind::SectionRx, 3);
        }
        if self.matches_literal("notes:") {
            return self.take(TokenKind::SectionNotes, 6);
        }
        if self.matches_keyword("patient") {
            return self.take(TokenKind::SectionPatient, 7);
        }
        if self.matches_keyword("allergy") {
            return self.take(TokenKind::SectionAllergy, 7);
        }

        if self.peek() == Some(':') {
            return self.take(TokenKind::Colon, 1);
        }

        // Domain keyword classes, in priority order.
        if let Some(len) = self.match_class(FORMS) {
            return self.take(TokenKind::Form, len);
        }
        if let Some(len) = self.match_class(ROUTES) {
            return self.take(TokenKind::Route, len);
        }
        if let Some(len) = self.match_class(FREQUENCIES).or_else(|| self.match_every_hours()) {
            return self.take(TokenKind::Frequency, len);
        }
        if let Some(len) = self.match_class(FOOD_MODIFIERS) {
            return self.take(TokenKind::FoodModifier, len);
        }
        if let Some(len) = self.match_class(UNITS) {
            return self.take(TokenKind::Unit, len);
        }
        if let Some(len) = self.match_class(DURATION_UNITS) {
            return self.take(TokenKind::DurationUnit, len);
        }

        if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            return self.lex_number();
        }
        if self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            return self.lex_identifier();
        }

        self.take(TokenKind::Unknown, 1)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.pos];
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        ch
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\x0C' | '\r' | '\n') => {
                    self.advance();
                }
                // Comment runs through the end of the line, newline included.
                Some('#') => {
                    while !self.is_at_end() {
                        if self.advance() == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    /// Exact character match at the cursor, no boundary requirement.
    fn matches_literal(&self, literal: &str) -> bool {
        literal
            .chars()
            .enumerate()
            .all(|(i, ch)| self.peek_at(i) == Some(ch))
    }

    /// Exact character match at the cursor followed by a word boundary:
    /// end of input or a character outside `[A-Za-z0-9_]`.
    fn matches_keyword(&self, word: &str) -> bool {
        if !self.matches_literal(word) {
            return false;
        }
        !matches!(self.peek_at(word.len()), Some(c) if is_word_char(c))
    }

    /// Length of the first keyword in `words` matching at the cursor.
    fn match_class(&self, words: &[&str]) -> Option<usize> {
        words
            .iter()
            .find(|word| self.matches_keyword(word))
            .map(|word| word.len())
    }

    /// Length of a `q<digits>h` frequency code at the cursor, boundary
    /// included.
    fn match_every_hours(&self) -> Option<usize> {
        if self.peek_at(0) != Some('q') {
            return None;
        }
        let mut i = 1;
        while matches!(self.peek_at(i), Some(c) if c.is_ascii_digit()) {
            i += 1;
        }
        if i == 1 || self.peek_at(i) != Some('h') {
            return None;
        }
        match self.peek_at(i + 1) {
            Some(c) if is_word_char(c) => None,
            _ => Some(i + 1),
        }
    }

    /// Consume exactly `len` characters as one token of the given kind.
    fn take(&mut self, kind: TokenKind, len: usize) -> Token {
        let line = self.line;
        let col = self.col;
        let mut text = String::new();
        for _ in 0..len {
            text.push(self.advance());
        }
        Token::new(kind, text, line, col)
    }

    /// Digits with one optional fractional continuation: `.digits` for a
    /// decimal, or `/digits` for a fraction kept as a single token.
    fn lex_number(&mut self) -> Token {
        let line = self.line;
        let col = self.col;
        let mut text = String::new();
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            text.push(self.advance());
        }
        if matches!(self.peek(), Some('.' | '/'))
            && self.peek_at(1).is_some_and(|c| c.is_ascii_digit())
        {
            text.push(self.advance());
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                text.push(self.advance());
            }
        }
        Token::new(TokenKind::Number, text, line, col)
    }

    /// A letter followed by letters, digits, underscores or hyphens. A
    /// hyphen cannot end an identifier; trailing ones stay in the input.
    fn lex_identifier(&mut self) -> Token {
        let mut len = 1;
        while matches!(self.peek_at(len), Some(c) if is_word_char(c) || c == '-') {
            len += 1;
        }
        while len > 1 && self.peek_at(len - 1) == Some('-') {
            len -= 1;
        }
        self.take(TokenKind::Id, len)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Yields every token exactly once, the terminal Eof included, then `None`.
impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}
