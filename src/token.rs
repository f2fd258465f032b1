//! Token types for the MedScript lexer.

use std::fmt;

/// A token produced by the lexer.
///
/// `line` and `column` are 1-based and point at the first character of the
/// token. Tokens are plain data: the lexer mints them and every later stage
/// only reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' @ {}:{}", self.kind, self.text, self.line, self.column)
    }
}

/// The kind of token. A closed set: every front end dispatches on these tags
/// and never on token text, except where a production matches a specific
/// `Unknown` character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Section headers
    SectionPatient,
    SectionAllergy,
    SectionRx,
    SectionNotes,

    // Domain keyword classes
    Form,
    Route,
    Frequency,
    FoodModifier,
    Unit,
    DurationUnit,

    // Literals
    Number,
    Id,

    // Delimiters
    Colon,

    // Special
    Unknown,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::SectionPatient => "SECTION_PATIENT",
            TokenKind::SectionAllergy => "SECTION_ALLERGY",
            TokenKind::SectionRx => "SECTION_RX",
            TokenKind::SectionNotes => "SECTION_NOTES",
            TokenKind::Form => "FORM",
            TokenKind::Route => "ROUTE",
            TokenKind::Frequency => "FREQUENCY",
            TokenKind::FoodModifier => "FOOD_MOD",
            TokenKind::Unit => "UNIT",
            TokenKind::DurationUnit => "DURATION_UNIT",
            TokenKind::Number => "NUMBER",
            TokenKind::Id => "ID",
            TokenKind::Colon => "COLON",
            TokenKind::Unknown => "UNKNOWN",
            TokenKind::Eof => "EOF",
        };
        f.write_str(name)
    }
}
