use thiserror::Error;

use crate::bencode::DecodeError;
use crate::torrent::MetadataError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Bencode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
