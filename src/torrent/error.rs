use thiserror::Error;

/// Errors raised while projecting a decoded value into a [`MetadataRecord`].
///
/// Field-level variants carry the bencode key that failed.
///
/// [`MetadataRecord`]: super::MetadataRecord
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    #[error("Root of .torrent must be a dictionary, found {0}")]
    InvalidRoot(&'static str),

    #[error("Missing field '{0}'")]
    MissingField(&'static str),

    #[error("Field '{0}' is missing or has the wrong type")]
    FieldTypeMismatch(&'static str),

    #[error("Pieces length {len} is not a multiple of {width}")]
    PiecesLengthInvalid { len: usize, width: usize },

    #[error("Field '{0}' is not valid UTF-8")]
    InvalidUtf8(&'static str),
}
