use {
    crate::{
        ast::Regex,
        derive::derive,
        dfa::Dfa,
        error::{Error, Result},
        flags::Flags,
        minimize::minimize,
    },
    log::trace,
    std::collections::BTreeSet,
};

/// A prefix tree over the inserted strings, stored as a [`Dfa`] rooted at
/// state `0`.
#[derive(Debug, Clone, Default)]
pub struct Trie {
    dfa: Dfa,
    alphabet: BTreeSet<char>,
}

impl Trie {
    pub fn new() -> Trie {
        Trie::default()
    }

    /// Inserts `s`. The empty string makes the root accepting.
    pub fn add(&mut self, s: &str) {
        trace!("Adding {s:?}");
        let mut node = self.dfa.start();
        for c in s.chars() {
            self.alphabet.insert(c);
            node = self.dfa.get_or_insert_transition(node, c);
        }
        self.dfa.set_accepting(node, true);
    }

    pub fn add_all<I, S>(&mut self, strings: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for s in strings {
            self.add(s.as_ref());
        }
    }

    /// Every symbol seen so far.
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }

    pub fn minimize(&self) -> Result<Dfa> {
        minimize(&self.dfa)
    }

    /// The expression tree for the minimized automaton, or `None` if nothing
    /// was inserted.
    pub fn to_ast(&self) -> Result<Option<Regex>> {
        Ok(derive(&self.minimize()?))
    }

    /// Renders the pattern text.
    pub fn to_pattern(&self, flags: &Flags) -> Result<String> {
        let ast = self.to_ast()?.ok_or(Error::EmptyLanguage)?;
        Ok(ast.to_pattern(flags))
    }

    /// Renders the pattern and compiles it with the host engine.
    pub fn to_regex(&self, flags: &Flags) -> Result<regex::Regex> {
        flags.compile(&self.to_pattern(flags)?)
    }
}

impl<S: AsRef<str>> Extend<S> for Trie {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<S: AsRef<str>> FromIterator<S> for Trie {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Trie {
        let mut trie = Trie::new();
        trie.add_all(iter);
        trie
    }
}
