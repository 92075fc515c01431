//! Generate a regular expression that matches exactly a finite set of strings.
//!
//! The strings are inserted into a [`Trie`], the trie is minimized into the
//! smallest equivalent [`Dfa`], and the automaton is turned back into an
//! expression tree ([`Regex`]) by state elimination, simplifying common
//! prefixes, suffixes, character classes and optional groups along the way.
//!
//! ```
//! assert_eq!(regexgen::generate(["foobar", "foozap"]).unwrap(), "foo(?:zap|bar)");
//! ```

use log::debug;

pub use ast::{Quantifier, Regex, Side};
pub use dfa::{Dfa, State, StateId};
pub use error::{Error, Result};
pub use flags::Flags;
pub use trie::Trie;
pub mod ast;
pub mod derive;
pub mod dfa;
pub mod error;
pub mod flags;
pub mod minimize;
pub mod partition;
pub mod trie;

/// Returns a pattern matching exactly `strings`, rendered with default flags.
pub fn generate<I, S>(strings: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    generate_with_flags(strings, "")
}

/// Like [`generate`], rendering for the given flag letters (`i`, `m`, `x`, `u`).
pub fn generate_with_flags<I, S>(strings: I, flags: &str) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let flags: Flags = flags.parse()?;
    let pattern = strings.into_iter().collect::<Trie>().to_pattern(&flags)?;
    debug!("Generated pattern {pattern:?} with flags {flags:?}");
    Ok(pattern)
}

/// Generates the pattern and compiles it with the flags applied.
pub fn compile<I, S>(strings: I, flags: &str) -> Result<regex::Regex>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let flags: Flags = flags.parse()?;
    strings.into_iter().collect::<Trie>().to_regex(&flags)
}
