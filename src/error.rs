use {
    crate::partition::BlockId,
    std::{
        error,
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

/// Errors that can occur while generating a pattern.
#[derive(Debug)]
pub enum Error {
    /// Partition refinement tried to replace a block that is no longer in the partition.
    MissingBlock(BlockId),

    /// A flag letter outside `i`, `m`, `x`, `u` was given.
    UnknownFlag(char),

    /// The input set was empty, so there is no pattern to produce.
    EmptyLanguage,

    /// The host regex engine rejected the generated pattern.
    Compile(regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::MissingBlock(id) => write!(f, "Partition refinement lost track of block {id}"),
            Self::UnknownFlag(c) => write!(f, "Unknown flag: {c:?}"),
            Self::EmptyLanguage => write!(f, "Cannot generate a pattern for an empty set of strings"),
            Self::Compile(e) => write!(f, "Generated pattern failed to compile: {e}"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Compile(e) => Some(e),
            _ => None,
        }
    }
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Self {
        Self::Compile(e)
    }
}
