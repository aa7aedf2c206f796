pub mod chunk;
pub mod error;
pub mod metadata;

pub use chunk::{split_chunks, split_pieces, PieceHash, PIECE_HASH_LEN};
pub use error::MetadataError;
pub use metadata::{extract, get_integer, get_string, lookup_bytestring, InfoRecord, MetadataRecord};
