use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unexpected end of input")]
    EndOfInput,

    #[error("Malformed integer '{0}'")]
    MalformedInteger(String),

    #[error("Malformed string length '{0}'")]
    MalformedLength(String),

    #[error("Truncated string: expected {expected} bytes, found {found}")]
    TruncatedString { expected: usize, found: usize },

    #[error("Dictionary key must be a ByteString")]
    NonStringKey,

    #[error("Nesting deeper than {0} levels")]
    NestingTooDeep(usize),

    #[error("Trailing data after value ending at offset {0}")]
    TrailingData(u64),

    #[error("I/O error {0}")]
    Io(#[from] std::io::Error),
}
