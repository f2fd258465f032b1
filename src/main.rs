//! medscript command-line front end.
//! Usage:
//!   medscript <file.med> [--tokens]

use std::fs;
use std::process;

use clap::{Arg, ArgAction, Command, ValueHint};

use medscript::{translate, Lexer};

fn main() {
    let matches = Command::new("medscript")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translate MedScript prescription shorthand into structured JSON")
        .arg(
            Arg::new("file")
                .help("Path to the shorthand document to translate")
                .required(true)
                .index(1)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("tokens")
                .long("tokens")
                .help("Dump the token stream before the diagnostics")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let path = matches.get_one::<String>("file").unwrap();
    let input = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("Error: cannot read {path}: {err}");
            process::exit(1);
        }
    };

    if matches.get_flag("tokens") {
        println!("=== TOKENS ===");
        for token in Lexer::new(&input) {
            println!("{token}");
        }
        println!();
    }

    let translation = translate(&input);

    println!("=== DIAGNOSTICS ===");
    if translation.diagnostics.is_empty() {
        println!("(none)");
    } else {
        for diagnostic in &translation.diagnostics {
            println!("{diagnostic}");
        }
    }

    println!();
    println!("=== JSON OUTPUT ===");
    println!("{}", translation.json);
}
