use std::{
    error::Error as StdError,
    fmt::{self, Display},
    num::ParseIntError,
    result,
};

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input does not have the shape of the link being parsed
    Malformed,
    /// A digit run matched but does not fit in a snowflake
    InvalidId(ParseIntError),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Malformed => f.write_str("malformed message link"),
            Error::InvalidId(inner) => write!(f, "invalid id in message link: {inner}"),
        }
    }
}

impl StdError for Error {}

impl From<ParseIntError> for Error {
    fn from(e: ParseIntError) -> Error {
        Error::InvalidId(e)
    }
}
