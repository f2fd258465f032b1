//! Property tests for the lexer and the end-to-end pipeline.
//!
//! The lexer promises to be total: any input, valid shorthand or not, yields
//! a finite token stream ending in a single EOF token. The pipeline makes the
//! same promise for JSON output. These tests hammer both promises with
//! generated input.

use proptest::prelude::*;

use medscript::{translate, Lexer, TokenKind};

/// Characters the shorthand actually uses, plus the ones most likely to
/// upset a scanner: comment markers, fraction slashes, decimal points,
/// percent signs and raw newlines.
fn shorthand_soup() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9:/.#%\\n\\t _-]{0,120}"
}

/// A two-line document (patient header plus one prescription) built only
/// from values that should translate without any diagnostics.
fn clean_document() -> impl Strategy<Value = String> {
    (
        prop_oneof!["Nimal", "Kasun", "Amaya"],
        prop_oneof!["PCM", "Amox", "Cetirizine", "Ibuprofen"],
        1u32..=1000,
        prop_oneof!["od", "bd", "tds", "qid", "hs", "prn"],
        1u32..=30,
    )
        .prop_map(|(patient, name, dose, freq, days)| {
            format!("patient {patient} age 30\nrx: Tab {name} {dose}mg po {freq} {days}d")
        })
}

proptest! {
    // Any input at all: the stream is finite and carries exactly one EOF,
    // in final position.
    #[test]
    fn token_stream_ends_with_a_single_eof(input in any::<String>()) {
        let tokens: Vec<_> = Lexer::new(&input).collect();
        prop_assert!(!tokens.is_empty());
        let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        prop_assert_eq!(eofs, 1);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    // EOF is sticky: asking again after the end returns the same token.
    #[test]
    fn eof_repeats_at_the_same_position(input in shorthand_soup()) {
        let mut lexer = Lexer::new(&input);
        let mut token = lexer.next_token();
        while token.kind != TokenKind::Eof {
            token = lexer.next_token();
        }
        for _ in 0..3 {
            let again = lexer.next_token();
            prop_assert_eq!(again.kind, TokenKind::Eof);
            prop_assert_eq!(again.line, token.line);
            prop_assert_eq!(again.column, token.column);
        }
    }

    // Positions are 1-based and never move backwards.
    #[test]
    fn token_positions_are_monotonic(input in shorthand_soup()) {
        let mut prev = (1usize, 1usize);
        for token in Lexer::new(&input) {
            prop_assert!(token.line >= 1);
            prop_assert!(token.column >= 1);
            let here = (token.line, token.column);
            prop_assert!(here >= prev, "token {} starts before {:?}", token, prev);
            prev = here;
        }
    }

    // Every real token's text is a verbatim slice of the input; only EOF
    // carries synthetic text.
    #[test]
    fn token_text_comes_from_the_input(input in any::<String>()) {
        for token in Lexer::new(&input) {
            if token.kind == TokenKind::Eof {
                prop_assert_eq!(token.text.as_str(), "<EOF>");
            } else {
                prop_assert!(!token.text.is_empty());
                prop_assert!(input.contains(&token.text));
            }
        }
    }

    // Keyword-classed tokens only ever carry their keyword spellings.
    #[test]
    fn keyword_tokens_carry_keyword_text(input in shorthand_soup()) {
        for token in Lexer::new(&input) {
            match token.kind {
                TokenKind::Form => prop_assert!(
                    ["Tab", "Cap", "Syr", "Inj", "Oint", "Drops", "Cream", "Neb"]
                        .contains(&token.text.as_str()),
                    "not a form keyword: {}",
                    token
                ),
                TokenKind::DurationUnit => {
                    prop_assert!(["d", "w", "m"].contains(&token.text.as_str()))
                }
                TokenKind::Colon => prop_assert_eq!(token.text.as_str(), ":"),
                TokenKind::Unknown => prop_assert_eq!(token.text.chars().count(), 1),
                _ => {}
            }
        }
    }

    // Lexing is deterministic.
    #[test]
    fn lexing_twice_gives_the_same_stream(input in shorthand_soup()) {
        let first: Vec<_> = Lexer::new(&input).collect();
        let second: Vec<_> = Lexer::new(&input).collect();
        prop_assert_eq!(first, second);
    }
}

proptest! {
    // Translation is total: no panic, and the output is always well-formed
    // JSON carrying the four document keys.
    #[test]
    fn translate_always_yields_wellformed_json(input in any::<String>()) {
        let result = translate(&input);
        let value: serde_json::Value = serde_json::from_str(&result.json).unwrap();
        let object = value.as_object().unwrap();
        prop_assert!(object.contains_key("patient"));
        prop_assert!(object.contains_key("allergies"));
        prop_assert!(object.contains_key("medications"));
        prop_assert!(object.contains_key("notes"));
    }

    // Diagnostics always carry 1-based positions.
    #[test]
    fn diagnostics_carry_valid_positions(input in shorthand_soup()) {
        for diagnostic in translate(&input).diagnostics {
            prop_assert!(diagnostic.line >= 1);
            prop_assert!(diagnostic.column >= 1);
        }
    }

    // A well-formed patient header plus prescription translates cleanly,
    // whatever the dose, frequency and duration.
    #[test]
    fn clean_prescriptions_have_no_diagnostics(source in clean_document()) {
        let result = translate(&source);
        prop_assert!(
            result.diagnostics.is_empty(),
            "unexpected diagnostics: {:?}",
            result.diagnostics
        );
        let value: serde_json::Value = serde_json::from_str(&result.json).unwrap();
        prop_assert_eq!(value["medications"].as_array().unwrap().len(), 1);
    }
}
