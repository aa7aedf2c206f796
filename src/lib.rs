// lib.rs - Library interface for bencode decoding and .torrent metadata

pub mod bencode;
pub mod config;
pub mod error;
pub mod torrent;

// Re-export commonly used types
pub use bencode::{bvalue_to_json, decode, decode_bencode, BValue, ByteSource, DecodeError, Decoder, ReadSource, SliceSource};
pub use config::Config;
pub use error::Error;
pub use torrent::{extract, split_chunks, split_pieces, InfoRecord, MetadataError, MetadataRecord, PieceHash};
