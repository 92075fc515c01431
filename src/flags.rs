use {
    crate::error::{Error, Result},
    regex::RegexBuilder,
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// Pattern flags, parsed from letter codes such as `"iu"`.
///
/// | Letter | Field | Effect |
/// |---|---|---|
/// | `i` | `case_insensitive` | engine only |
/// | `m` | `multi_line` | engine only |
/// | `x` | `extended` | engine, and whitespace is written as `\x{..}` |
/// | `u` | `unicode` | engine, and character-class/grouping rendering |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub extended: bool,
    pub unicode: bool,
}

impl FromStr for Flags {
    type Err = Error;

    fn from_str(s: &str) -> Result<Flags> {
        let mut flags = Flags::default();
        for c in s.chars() {
            match c {
                'i' => flags.case_insensitive = true,
                'm' => flags.multi_line = true,
                'x' => flags.extended = true,
                'u' => flags.unicode = true,
                _ => return Err(Error::UnknownFlag(c)),
            }
        }
        Ok(flags)
    }
}

impl Display for Flags {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        for (set, letter) in [
            (self.case_insensitive, "i"),
            (self.multi_line, "m"),
            (self.extended, "x"),
            (self.unicode, "u"),
        ] {
            if set {
                f.write_str(letter)?;
            }
        }
        Ok(())
    }
}

impl Flags {
    /// A builder for `pattern` with these flags mapped onto the host engine.
    pub fn builder(&self, pattern: &str) -> RegexBuilder {
        let mut builder = RegexBuilder::new(pattern);
        builder
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .ignore_whitespace(self.extended);
        if self.unicode {
            builder.unicode(true);
        }
        builder
    }

    pub fn compile(&self, pattern: &str) -> Result<regex::Regex> {
        Ok(self.builder(pattern).build()?)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, pretty_assertions::assert_eq, test_log::test};

    #[test]
    fn test_parse_flags() {
        assert_eq!("".parse::<Flags>().unwrap(), Flags::default());
        let flags: Flags = "uiiu".parse().unwrap();
        assert!(flags.case_insensitive && flags.unicode);
        assert!(!flags.multi_line && !flags.extended);
        assert_eq!(flags.to_string(), "iu");
        assert_eq!("xmui".parse::<Flags>().unwrap().to_string(), "imxu");
    }

    #[test]
    fn test_unknown_flag() {
        match "ig".parse::<Flags>() {
            Err(Error::UnknownFlag('g')) => {}
            other => panic!("expected UnknownFlag('g'), got {other:?}"),
        }
    }

    #[test]
    fn test_compile_applies_flags() {
        let re = "i".parse::<Flags>().unwrap().compile("^foo$").unwrap();
        assert!(re.is_match("FoO"));
        let re = "m".parse::<Flags>().unwrap().compile("^foo$").unwrap();
        assert!(re.is_match("bar\nfoo\nbaz"));
        let re = "x".parse::<Flags>().unwrap().compile("^f o o$").unwrap();
        assert!(re.is_match("foo"));
        assert!(Flags::default().compile("(").is_err());
    }
}
