//! Recursive-descent parser for the MedScript shorthand.
//!
//! One token of lookahead, no backtracking. Malformed input never aborts a
//! parse: [`Parser::expect`] records a diagnostic, skips a single token and
//! returns a synthesized empty token of the wanted kind, so every production
//! keeps its shape and the top-level loop always reaches end of input.

use crate::ast::{Document, Dose, Duration, Medication};
use crate::diagnostics::Diagnostic;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

pub struct Parser {
    lexer: Lexer,
    current: Token,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            diagnostics: Vec::new(),
        }
    }

    /// Parse the whole token stream into a document plus the syntax
    /// diagnostics collected along the way, in detection order.
    pub fn parse(mut self) -> (Document, Vec<Diagnostic>) {
        let mut doc = Document::new();

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::SectionPatient => self.parse_patient(&mut doc),
                TokenKind::SectionAllergy => self.parse_allergy(&mut doc),
                TokenKind::SectionRx => self.parse_rx(&mut doc),
                TokenKind::SectionNotes => self.parse_notes(&mut doc),
                _ => {
                    self.error_here(
                        "Unexpected token at top-level. Expected 'patient', 'allergy', 'rx:' or 'notes:'",
                    );
                    self.advance();
                }
            }
        }

        // Whole-document requirement, checked once after the main loop.
        if doc.medications.is_empty() {
            self.diagnostics.push(Diagnostic::error(
                1,
                1,
                "No medications found. Add an 'rx:' section with at least one medication.",
            ));
        }

        (doc, self.diagnostics)
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Consume the current token if it has the wanted kind.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume and return the current token when it matches. Otherwise
    /// record an error naming what was found instead, skip one token (never
    /// the Eof) and return a synthesized empty token of the wanted kind so
    /// the calling production can continue.
    fn expect(&mut self, kind: TokenKind, message: &str) -> Token {
        if self.current.kind == kind {
            let token = self.current.clone();
            self.advance();
            return token;
        }
        self.diagnostics.push(Diagnostic::error(
            self.current.line,
            self.current.column,
            format!(
                "{message} (found: {} '{}')",
                self.current.kind, self.current.text
            ),
        ));
        if self.current.kind != TokenKind::Eof {
            self.advance();
        }
        Token::new(kind, "", self.current.line, self.current.column)
    }

    fn error_here(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::error(
            self.current.line,
            self.current.column,
            message,
        ));
    }

    fn warn_here(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warning(
            self.current.line,
            self.current.column,
            message,
        ));
    }

    fn at_section_or_eof(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Eof
                | TokenKind::SectionPatient
                | TokenKind::SectionAllergy
                | TokenKind::SectionRx
                | TokenKind::SectionNotes
        )
    }

    fn parse_patient(&mut self, doc: &mut Document) {
        self.expect(TokenKind::SectionPatient, "Expected 'patient'");
        let name = self.expect(TokenKind::Id, "Expected patient name after 'patient'");
        if !name.text.is_empty() {
            doc.patient.name = Some(name.text);
        }

        while self.check(TokenKind::Id) {
            match self.current.text.to_lowercase().as_str() {
                "age" => {
                    self.advance();
                    let age = self.expect(TokenKind::Number, "Expected age number");
                    match numeric_value(&age.text) {
                        Some(value) => doc.patient.age = Some(value.round() as i64),
                        None => self.diagnostics.push(Diagnostic::error(
                            age.line,
                            age.column,
                            "Invalid age value",
                        )),
                    }
                }
                "weight" => {
                    self.advance();
                    let weight = self.expect(TokenKind::Number, "Expected weight number");
                    // A unit word like "kg" may follow; swallow it.
                    self.eat(TokenKind::Id);
                    match numeric_value(&weight.text) {
                        Some(value) => doc.patient.weight_kg = Some(value),
                        None => self.diagnostics.push(Diagnostic::error(
                            weight.line,
                            weight.column,
                            "Invalid weight value",
                        )),
                    }
                }
                _ => {
                    let message =
                        format!("Unknown patient attribute '{}' ignored", self.current.text);
                    self.warn_here(message);
                    self.advance();
                }
            }
        }
    }

    fn parse_allergy(&mut self, doc: &mut Document) {
        self.expect(TokenKind::SectionAllergy, "Expected 'allergy'");
        let mut count = 0;
        while self.check(TokenKind::Id) {
            doc.add_allergy(&self.current.text);
            count += 1;
            self.advance();
        }
        if count == 0 {
            self.error_here("Expected at least one allergy name after 'allergy'");
        }
    }

    fn parse_rx(&mut self, doc: &mut Document) {
        self.expect(TokenKind::SectionRx, "Expected 'rx:'");
        while !self.at_section_or_eof() {
            if self.check(TokenKind::Form) {
                let medication = self.parse_medication();
                doc.medications.push(medication);
            } else {
                self.error_here("Expected medication starting with a FORM (Tab/Cap/Syr/...)");
                self.advance();
            }
        }
    }

    fn parse_medication(&mut self) -> Medication {
        let form = self.expect(TokenKind::Form, "Expected FORM");
        let name = self.expect(TokenKind::Id, "Expected medicine name (e.g., PCM, Amox)");

        let dose = self.parse_dose();

        let mut route = None;
        if self.check(TokenKind::Route) {
            route = Some(self.current.text.to_lowercase());
            self.advance();
        }

        let frequency = self
            .expect(TokenKind::Frequency, "Expected frequency (od/bd/tds/qid/...)")
            .text
            .to_lowercase();

        let duration = self.parse_duration();

        let mut food_modifier = None;
        if self.check(TokenKind::FoodModifier) {
            food_modifier = Some(self.current.text.to_lowercase());
            self.advance();
        }

        // Remaining identifiers become boolean extra flags until the next
        // FORM or section.
        let mut extras: Vec<(String, String)> = Vec::new();
        while self.check(TokenKind::Id) {
            let flag = self.current.text.to_lowercase();
            if !extras.iter().any(|(existing, _)| *existing == flag) {
                extras.push((flag, "true".to_string()));
            }
            self.advance();
        }

        Medication {
            form: form.text,
            name: name.text,
            dose,
            route,
            frequency,
            duration,
            food_modifier,
            extras,
        }
    }

    /// Strength forms: NUMBER UNIT, NUMBER UNIT '/' NUMBER UNIT (ratio
    /// strengths like 5mg/5ml), or NUMBER '%'. An optional NUMBER UNIT pair
    /// after the strength is the amount.
    fn parse_dose(&mut self) -> Dose {
        let number = self.expect(
            TokenKind::Number,
            "Expected dose number (e.g., 500 or 0.5 or 1/2)",
        );
        let mut strength = number.text;

        if self.check(TokenKind::Unit) {
            strength.push_str(&self.current.text);
            self.advance();
            // The '/' of a ratio reaches us as an unclassified token.
            if self.check(TokenKind::Unknown) && self.current.text == "/" {
                strength.push('/');
                self.advance();
                let number = self.expect(
                    TokenKind::Number,
                    "Expected number after '/' in strength (e.g., 5 in 5mg/5ml)",
                );
                strength.push_str(&number.text);
                let unit = self.expect(
                    TokenKind::Unit,
                    "Expected unit after second number in strength (e.g., ml)",
                );
                strength.push_str(&unit.text);
            }
        } else if self.check(TokenKind::Unknown) && self.current.text == "%" {
            strength.push('%');
            self.advance();
        } else {
            self.error_here("Expected unit after dose number (mg/ml/g/...)");
        }

        let mut amount = None;
        if self.check(TokenKind::Number) {
            let number = self.current.clone();
            self.advance();
            if self.check(TokenKind::Unit) {
                amount = Some(format!("{}{}", number.text, self.current.text));
                self.advance();
            } else {
                // The number stays consumed; there is no backtracking.
                self.diagnostics.push(Diagnostic::warning(
                    number.line,
                    number.column,
                    "Possible amount provided but missing unit (e.g., '10ml')",
                ));
            }
        }

        Dose { strength, amount }
    }

    fn parse_duration(&mut self) -> Duration {
        let number = self.expect(TokenKind::Number, "Expected duration number (e.g., 5 in 5d)");
        let unit = self.expect(TokenKind::DurationUnit, "Expected duration unit (d/w/m)");

        let value = match numeric_value(&number.text) {
            Some(value) => value,
            None => {
                self.diagnostics.push(Diagnostic::error(
                    number.line,
                    number.column,
                    "Invalid duration value",
                ));
                0.0
            }
        };

        Duration {
            value,
            unit: unit.text,
        }
    }

    fn parse_notes(&mut self, doc: &mut Document) {
        self.expect(TokenKind::SectionNotes, "Expected 'notes:'");
        let mut words = Vec::new();
        while !self.at_section_or_eof() {
            words.push(self.current.text.clone());
            self.advance();
        }
        let note = words.join(" ").trim().to_string();
        if note.is_empty() {
            self.diagnostics
                .push(Diagnostic::warning(1, 1, "Empty notes section"));
        } else {
            doc.notes.push(note);
        }
    }
}

/// Numeric value of a NUMBER token's text. The fraction form folds `/` to
/// `.` before parsing, so "1/2" reads as 1.2.
fn numeric_value(text: &str) -> Option<f64> {
    text.replace('/', ".").parse().ok()
}
