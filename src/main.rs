use regexgen::{Flags, Trie};
use std::io::BufRead;
use std::process::ExitCode;

/// Reads one string per line from stdin and prints a pattern matching exactly
/// those strings. The optional first argument holds flag letters (`imxu`).
fn main() -> ExitCode {
    env_logger::init();

    let flags = match std::env::args().nth(1).unwrap_or_default().parse::<Flags>() {
        Ok(flags) => flags,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut trie = Trie::new();
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        match line {
            Ok(line) => trie.add(&line),
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    match trie.to_pattern(&flags) {
        Ok(pattern) => {
            println!("{}", pattern);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
