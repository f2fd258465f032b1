//! MedScript, a compiler for clinical prescription shorthand.
//!
//! Translates terse ward-note prescriptions such as
//!
//! ```text
//! patient Nimal age 22 weight 58 kg
//! allergy penicillin
//! rx:
//!   Tab PCM 500mg po tds 5d after_food
//! notes: review in one week
//! ```
//!
//! into structured JSON. The pipeline is four sequential, in-memory stages:
//! lexer, recursive-descent parser (syntax diagnostics), semantic analyzer
//! (domain diagnostics), JSON emitter. Diagnostics are collected data, never
//! errors: translation always runs to completion and always yields JSON,
//! however broken the input.

pub mod analyzer;
pub mod ast;
pub mod diagnostics;
pub mod emitter;
pub mod lexer;
pub mod parser;
pub mod tables;
pub mod token;

pub use analyzer::analyze;
pub use ast::{Document, Dose, Duration, Medication, Patient};
pub use diagnostics::{Diagnostic, Severity};
pub use emitter::to_json;
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Token, TokenKind};

/// Everything one translation produces.
#[derive(Debug, Clone)]
pub struct Translation {
    pub document: Document,
    /// Syntax diagnostics first, then semantic, each group in detection
    /// order.
    pub diagnostics: Vec<Diagnostic>,
    pub json: String,
}

/// Run the full pipeline over one shorthand document.
pub fn translate(source: &str) -> Translation {
    let (document, mut diagnostics) = Parser::new(Lexer::new(source)).parse();
    diagnostics.extend(analyze(&document));
    let json = to_json(&document);
    Translation {
        document,
        diagnostics,
        json,
    }
}
