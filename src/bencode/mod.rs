pub mod bvalue;
pub mod decode;
pub mod error;
pub mod json;
pub mod source;

pub use bvalue::BValue;   // re-export
pub use decode::{decode, decode_bencode, Decoder};   // re-export
pub use error::DecodeError;
pub use json::bvalue_to_json;
pub use source::{ByteSource, Lookahead, ReadSource, SliceSource};
