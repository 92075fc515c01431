use {
    self::Regex::*,
    crate::flags::Flags,
    std::{
        cmp::Reverse,
        fmt::{self, Display, Formatter},
    },
};

/// Highest code point that still counts as a single character when rendered
/// outside of Unicode mode.
const BMP_MAX: u32 = 0xFFFF;

/// A regular expression over `char`, as produced by state elimination.
///
/// Nodes are built bottom-up and never mutated; operations that strip text
/// return new nodes.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Regex {
    /// `a|b|...`, longest option first. Never directly contains another
    /// alternation.
    Alternation(Vec<Regex>),
    /// `[...]`, members in encounter order without duplicates.
    CharClass(Vec<char>),
    /// `ab`.
    Concatenation(Box<Regex>, Box<Regex>),
    /// Literal text. The empty literal matches exactly "".
    Literal(String),
    /// `a?` or `a*`.
    Repetition(Box<Regex>, Quantifier),
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Quantifier {
    Optional,
    Star,
}

impl Quantifier {
    fn symbol(self) -> char {
        match self {
            Quantifier::Optional => '?',
            Quantifier::Star => '*',
        }
    }
}

/// Which end of an expression a literal is taken from or removed at.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Side {
    Start,
    End,
}

impl Regex {
    pub fn literal<S: Into<String>>(s: S) -> Regex {
        Literal(s.into())
    }

    pub fn empty() -> Regex {
        Literal(String::new())
    }

    /// Builds an alternation of `a` and `b`, flattening nested alternations,
    /// dropping duplicates and ordering the options by descending length.
    /// Options of equal length keep their encounter order.
    pub fn alternation(a: Regex, b: Regex) -> Regex {
        let mut options: Vec<Regex> = Vec::new();
        for option in [a, b].into_iter().flat_map(|r| match r {
            Alternation(xs) => xs,
            x => vec![x],
        }) {
            if !options.contains(&option) {
                options.push(option);
            }
        }
        if options.len() == 1 {
            return options.pop().unwrap_or_else(Regex::empty);
        }
        options.sort_by_cached_key(|o| Reverse(o.length()));
        Alternation(options)
    }

    /// Builds a character class holding the members of both sets.
    pub fn char_class(a: Vec<char>, b: Vec<char>) -> Regex {
        let mut set = Vec::with_capacity(a.len() + b.len());
        for c in a.into_iter().chain(b) {
            if !set.contains(&c) {
                set.push(c);
            }
        }
        CharClass(set)
    }

    pub fn concatenation(a: Regex, b: Regex) -> Regex {
        Concatenation(Box::new(a), Box::new(b))
    }

    pub fn repetition(x: Regex, q: Quantifier) -> Regex {
        Repetition(Box::new(x), q)
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(&self) -> u8 {
        match *self {
            Alternation(_) | CharClass(_) => 1,
            Concatenation(..) | Literal(_) => 2,
            Repetition(..) => 3,
        }
    }

    /// An estimate of the matched length, used to order alternations.
    pub fn length(&self) -> usize {
        match *self {
            Alternation(ref xs) => xs.first().map_or(0, Regex::length),
            CharClass(_) => 1,
            Concatenation(ref a, ref b) => a.length() + b.length(),
            Literal(ref s) => s.chars().count(),
            Repetition(ref x, _) => x.length(),
        }
    }

    pub fn is_empty_literal(&self) -> bool {
        matches!(*self, Literal(ref s) if s.is_empty())
    }

    /// The literal text exposed at `side`: a literal's whole value, or the
    /// literal found by following the concatenation chain towards `side`.
    pub fn literal_at(&self, side: Side) -> Option<&str> {
        match (self, side) {
            (Literal(s), _) => Some(s),
            (Concatenation(a, _), Side::Start) => a.literal_at(side),
            (Concatenation(_, b), Side::End) => b.literal_at(side),
            _ => None,
        }
    }

    /// Removes `len` characters from the literal exposed at `side`. Returns
    /// `None` for nodes that do not expose a literal there.
    pub fn remove_substring(&self, side: Side, len: usize) -> Option<Regex> {
        match (self, side) {
            (Literal(s), Side::Start) => Some(Literal(s.chars().skip(len).collect())),
            (Literal(s), Side::End) => {
                let keep = s.chars().count().saturating_sub(len);
                Some(Literal(s.chars().take(keep).collect()))
            }
            (Concatenation(a, b), Side::Start) => {
                let a = a.remove_substring(side, len)?;
                Some(if a.is_empty_literal() { (**b).clone() } else { Regex::concatenation(a, (**b).clone()) })
            }
            (Concatenation(a, b), Side::End) => {
                let b = b.remove_substring(side, len)?;
                Some(if b.is_empty_literal() { (**a).clone() } else { Regex::concatenation((**a).clone(), b) })
            }
            _ => None,
        }
    }

    /// Whether every string this node matches is one character at or below
    /// U+FFFF.
    pub fn single_character(&self) -> bool {
        match *self {
            Literal(ref s) => {
                let mut chars = s.chars();
                matches!((chars.next(), chars.next()), (Some(c), None) if c as u32 <= BMP_MAX)
            }
            CharClass(ref set) => set.iter().all(|&c| c as u32 <= BMP_MAX),
            _ => false,
        }
    }

    /// Whether every string this node matches is exactly one code point.
    pub fn single_codepoint(&self) -> bool {
        match *self {
            Literal(ref s) => s.chars().count() == 1,
            CharClass(_) => true,
            _ => false,
        }
    }

    /// The members this node contributes when merged into a character class.
    pub fn class_members(&self) -> Option<Vec<char>> {
        match *self {
            Literal(_) if self.single_codepoint() => self.literal_at(Side::Start).map(|s| s.chars().collect()),
            CharClass(ref set) => Some(set.clone()),
            _ => None,
        }
    }

    /// Renders the pattern in the `regex` crate's syntax.
    pub fn to_pattern(&self, flags: &Flags) -> String {
        let mut out = String::new();
        self.write_pattern(&mut out, flags);
        out
    }

    fn write_pattern(&self, out: &mut String, flags: &Flags) {
        match *self {
            Alternation(ref xs) => {
                for (i, x) in xs.iter().enumerate() {
                    if i > 0 {
                        out.push('|');
                    }
                    self.write_child(x, out, flags);
                }
            }
            CharClass(ref set) => write_class(set, out, flags),
            Concatenation(ref a, ref b) => {
                self.write_child(a, out, flags);
                self.write_child(b, out, flags);
            }
            Literal(ref s) => {
                for c in s.chars() {
                    write_escaped(c, out, flags);
                }
            }
            Repetition(ref x, q) => {
                // Stacked quantifiers are either rejected or read as laziness.
                if let Repetition(..) = **x {
                    write_group(x, out, flags);
                } else {
                    self.write_child(x, out, flags);
                }
                out.push(q.symbol());
            }
        }
    }

    /// Writes `child`, grouping it if it binds looser than `self` and does
    /// not render as a single character.
    fn write_child(&self, child: &Regex, out: &mut String, flags: &Flags) {
        let bare = child.precedence() >= self.precedence()
            || child.single_character()
            || (flags.unicode && child.single_codepoint());
        if bare {
            child.write_pattern(out, flags);
        } else {
            write_group(child, out, flags);
        }
    }
}

impl Display for Regex {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.to_pattern(&Flags::default()))
    }
}

fn write_group(x: &Regex, out: &mut String, flags: &Flags) {
    out.push_str("(?:");
    x.write_pattern(out, flags);
    out.push(')');
}

fn write_escaped(c: char, out: &mut String, flags: &Flags) {
    if flags.extended && c.is_whitespace() {
        out.push_str(&format!("\\x{{{:X}}}", c as u32));
    } else {
        let mut buf = [0; 4];
        out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
    }
}

fn write_class(set: &[char], out: &mut String, flags: &Flags) {
    out.push('[');
    if flags.unicode && set.iter().any(|&c| c as u32 > BMP_MAX) {
        for &c in set {
            write_escaped(c, out, flags);
        }
    } else {
        let mut sorted = set.to_vec();
        sorted.sort_unstable();
        for (first, last) in ranges(&sorted) {
            write_escaped(first, out, flags);
            match last as u32 - first as u32 {
                0 => {}
                1 => write_escaped(last, out, flags),
                _ => {
                    out.push('-');
                    write_escaped(last, out, flags);
                }
            }
        }
    }
    out.push(']');
}

/// Groups sorted, distinct characters into runs of consecutive code points.
fn ranges(sorted: &[char]) -> Vec<(char, char)> {
    let mut ranges: Vec<(char, char)> = Vec::new();
    for &c in sorted {
        match ranges.last_mut() {
            Some((_, last)) if *last as u32 + 1 == c as u32 => *last = c,
            _ => ranges.push((c, c)),
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use {super::*, pretty_assertions::assert_eq, test_log::test};

    fn lit(s: &str) -> Regex {
        Regex::literal(s)
    }

    fn unicode() -> Flags {
        Flags { unicode: true, ..Flags::default() }
    }

    #[test]
    fn test_alternation_flattens_and_sorts() {
        let inner = Regex::alternation(lit("ab"), lit("c"));
        let alt = Regex::alternation(inner, lit("def"));
        assert_eq!(alt, Alternation(vec![lit("def"), lit("ab"), lit("c")]));
        assert_eq!(alt.length(), 3);
        assert_eq!(alt.to_string(), "def|ab|c");

        let tie = Regex::alternation(lit("zap"), lit("bar"));
        assert_eq!(tie.to_string(), "zap|bar");
        assert_eq!(Regex::alternation(tie.clone(), lit("bar")), tie);
    }

    #[test]
    fn test_char_class_ranges() {
        assert_eq!(Regex::char_class(vec!['c', 'a'], vec!['b']).to_string(), "[a-c]");
        assert_eq!(Regex::char_class(vec!['a', 'd'], vec!['c']).to_string(), "[acd]");
        assert_eq!(Regex::char_class(vec!['a', 'b'], vec!['x', 'a']).to_string(), "[abx]");
        assert_eq!(Regex::char_class(vec!['0', '1', '2', '3'], vec!['a', 'b', 'c']).to_string(), "[0-3a-c]");
        assert_eq!(Regex::char_class(vec!['-', ']'], vec!['^']).to_string(), r"[\-\]\^]");
    }

    #[test]
    fn test_char_class_outside_bmp() {
        let class = Regex::char_class(vec!['\u{1F313}', '\u{1F311}'], vec!['\u{1F312}']);
        assert_eq!(class.to_pattern(&Flags::default()), "[\u{1F311}-\u{1F313}]");
        assert_eq!(class.to_pattern(&unicode()), "[\u{1F313}\u{1F311}\u{1F312}]");
        assert!(!class.single_character());
        assert!(class.single_codepoint());
    }

    #[test]
    fn test_literal_escaping() {
        assert_eq!(lit("foo|bar[test]+").to_string(), r"foo\|bar\[test\]\+");
        assert_eq!(lit("a.b*c?").to_string(), r"a\.b\*c\?");
        let extended = Flags { extended: true, ..Flags::default() };
        assert_eq!(lit("a b#").to_pattern(&extended), r"a\x{20}b\#");
    }

    #[test]
    fn test_grouping_by_precedence() {
        let opt = |x| Regex::repetition(x, Quantifier::Optional);
        assert_eq!(opt(lit("x")).to_string(), "x?");
        assert_eq!(opt(lit("bar")).to_string(), "(?:bar)?");
        assert_eq!(opt(Regex::alternation(lit("bar"), lit("l"))).to_string(), "(?:bar|l)?");
        assert_eq!(opt(Regex::char_class(vec!['a'], vec!['b'])).to_string(), "[ab]?");

        let cat = Regex::concatenation(lit("foo"), Regex::alternation(lit("zap"), lit("bar")));
        assert_eq!(cat.to_string(), "foo(?:zap|bar)");
        let cat = Regex::concatenation(Regex::char_class(vec!['a'], vec!['b']), lit("c"));
        assert_eq!(cat.to_string(), "[ab]c");

        let star = Regex::repetition(opt(lit("a")), Quantifier::Star);
        assert_eq!(star.to_string(), "(?:a?)*");
    }

    #[test]
    fn test_single_codepoint_grouping_in_unicode_mode() {
        let moon = Regex::char_class(vec!['\u{1F311}'], vec!['\u{1F312}']);
        let cat = Regex::concatenation(moon, lit("x"));
        assert_eq!(cat.to_pattern(&Flags::default()), "(?:[\u{1F311}\u{1F312}])x");
        assert_eq!(cat.to_pattern(&unicode()), "[\u{1F311}\u{1F312}]x");

        let opt = Regex::repetition(lit("\u{1F389}"), Quantifier::Optional);
        assert_eq!(opt.to_pattern(&Flags::default()), "(?:\u{1F389})?");
        assert_eq!(opt.to_pattern(&unicode()), "\u{1F389}?");
    }

    #[test]
    fn test_literal_at_and_remove_substring() {
        let cat = Regex::concatenation(lit("foo"), Regex::concatenation(Regex::char_class(vec!['a'], vec!['b']), lit("bar")));
        assert_eq!(cat.literal_at(Side::Start), Some("foo"));
        assert_eq!(cat.literal_at(Side::End), Some("bar"));
        assert_eq!(
            cat.remove_substring(Side::End, 3),
            Some(Regex::concatenation(lit("foo"), Regex::char_class(vec!['a'], vec!['b'])))
        );
        assert_eq!(
            cat.remove_substring(Side::Start, 2),
            Some(Regex::concatenation(lit("o"), Regex::concatenation(Regex::char_class(vec!['a'], vec!['b']), lit("bar"))))
        );
        assert_eq!(Regex::char_class(vec!['a'], vec!['b']).literal_at(Side::Start), None);
        assert_eq!(Regex::char_class(vec!['a'], vec!['b']).remove_substring(Side::Start, 1), None);
        assert_eq!(lit("h\u{e9}llo").remove_substring(Side::End, 3), Some(lit("h\u{e9}")));
    }

    #[test]
    fn test_class_members() {
        assert_eq!(lit("a").class_members(), Some(vec!['a']));
        assert_eq!(lit("ab").class_members(), None);
        assert_eq!(lit("").class_members(), None);
        assert_eq!(Regex::char_class(vec!['a'], vec!['b']).class_members(), Some(vec!['a', 'b']));
    }
}
