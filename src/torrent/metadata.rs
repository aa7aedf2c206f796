use std::collections::HashMap;
use std::io::BufRead;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::chunk::{split_pieces, PieceHash};
use super::error::MetadataError;
use crate::bencode::{BValue, ByteSource, DecodeError, Decoder, ReadSource, SliceSource};
use crate::config::Config;
use crate::Error;

/// Represents a .torrent file: the announce URL and the associated info.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    pub announce: String, // The tracker URL
    pub info: InfoRecord, // Torrent metadata
}

/// Describes the single file the torrent points at.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InfoRecord {
    pub piece_length: i64,      // Size of each piece
    pub length: i64,            // Total size of the file
    pub name: String,           // Name of the file
    pub pieces: Vec<PieceHash>, // SHA-1 hashes are 20 bytes each
}

impl MetadataRecord {
    /// Decodes a complete bencoded document and extracts its metadata.
    pub fn from_bytes(input: &[u8], config: &Config) -> Result<Self, Error> {
        let root = decode_document(Decoder::with_config(SliceSource::new(input), config), config)?;
        Ok(Self::from_bvalue(&root)?)
    }

    /// Same as [`MetadataRecord::from_bytes`], reading from a buffered reader.
    pub fn from_reader<R: BufRead>(reader: R, config: &Config) -> Result<Self, Error> {
        let root = decode_document(Decoder::with_config(ReadSource::new(reader), config), config)?;
        Ok(Self::from_bvalue(&root)?)
    }

    /// Creates a `MetadataRecord` from a `BValue` (the result of a bencode parse).
    ///
    /// Fails with an error naming the first field that is missing or has the
    /// wrong shape. Keys other than the ones read here are ignored.
    pub fn from_bvalue(value: &BValue) -> Result<Self, MetadataError> {
        let root_dict = match value {
            BValue::Dict(m) => m,
            other => return Err(MetadataError::InvalidRoot(other.kind())),
        };

        let announce = match root_dict.get(&b"announce"[..]) {
            Some(BValue::ByteString(bytes)) => to_text(bytes, "announce")?,
            _ => return Err(MetadataError::MissingField("announce")),
        };

        let info_dict = match root_dict.get(&b"info"[..]) {
            Some(BValue::Dict(m)) => m,
            _ => return Err(MetadataError::MissingField("info")),
        };

        let info = InfoRecord::from_bvalue(info_dict)?;
        debug!(
            "extracted metadata for '{}': {} bytes in {} pieces",
            info.name,
            info.length,
            info.pieces.len()
        );

        Ok(MetadataRecord { announce, info })
    }
}

impl InfoRecord {
    pub fn from_bvalue(info_dict: &HashMap<Vec<u8>, BValue>) -> Result<Self, MetadataError> {
        let piece_length = get_integer(info_dict, "piece length")?;
        let length = get_integer(info_dict, "length")?;
        let name = get_string(info_dict, "name")?;
        let pieces = split_pieces(lookup_bytestring(info_dict, "pieces")?)?;

        Ok(InfoRecord {
            piece_length,
            length,
            name,
            pieces,
        })
    }

    /// Number of pieces implied by `length` and `piece_length`.
    ///
    /// `None` when either value makes the division meaningless. Callers can
    /// compare this against `pieces.len()`; extraction doesn't.
    pub fn expected_piece_count(&self) -> Option<u64> {
        if self.piece_length <= 0 || self.length < 0 {
            return None;
        }
        Some((self.length as u64).div_ceil(self.piece_length as u64))
    }

    pub fn piece_hashes_hex(&self) -> impl Iterator<Item = String> + '_ {
        self.pieces.iter().map(hex::encode)
    }
}

/// Shorthand for [`MetadataRecord::from_bvalue`].
pub fn extract(root: &BValue) -> Result<MetadataRecord, MetadataError> {
    MetadataRecord::from_bvalue(root)
}

fn decode_document<S: ByteSource>(mut decoder: Decoder<S>, config: &Config) -> Result<BValue, DecodeError> {
    let value = decoder.decode()?;
    if !decoder.is_finished()? {
        if !config.allow_trailing_data {
            return Err(DecodeError::TrailingData(decoder.offset()));
        }
        warn!("ignoring trailing data after offset {}", decoder.offset());
    }
    Ok(value)
}

/// Looks up a key in the dictionary and returns a byte slice if the value is a ByteString.
pub fn lookup_bytestring<'a>(
    dict: &'a HashMap<Vec<u8>, BValue>,
    key: &'static str,
) -> Result<&'a [u8], MetadataError> {
    match dict.get(key.as_bytes()) {
        Some(BValue::ByteString(b)) => Ok(b),
        _ => Err(MetadataError::FieldTypeMismatch(key)),
    }
}

/// Gets a ByteString from the dictionary and converts it into a UTF-8 String.
pub fn get_string(dict: &HashMap<Vec<u8>, BValue>, key: &'static str) -> Result<String, MetadataError> {
    to_text(lookup_bytestring(dict, key)?, key)
}

/// Retrieves an integer value from the dictionary.
pub fn get_integer(dict: &HashMap<Vec<u8>, BValue>, key: &'static str) -> Result<i64, MetadataError> {
    match dict.get(key.as_bytes()) {
        Some(BValue::Integer(i)) => Ok(*i),
        _ => Err(MetadataError::FieldTypeMismatch(key)),
    }
}

fn to_text(bytes: &[u8], key: &'static str) -> Result<String, MetadataError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| MetadataError::InvalidUtf8(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> BValue {
        BValue::from(text)
    }

    fn info_dict(pieces: Vec<u8>) -> HashMap<Vec<u8>, BValue> {
        let mut info = HashMap::new();
        info.insert(b"piece length".to_vec(), BValue::Integer(16384));
        info.insert(b"length".to_vec(), BValue::Integer(40000));
        info.insert(b"name".to_vec(), s("ubuntu.iso"));
        info.insert(b"pieces".to_vec(), BValue::ByteString(pieces));
        info
    }

    fn root_with(info: HashMap<Vec<u8>, BValue>) -> BValue {
        let mut root = HashMap::new();
        root.insert(b"announce".to_vec(), s("http://tracker.example.com/announce"));
        root.insert(b"info".to_vec(), BValue::Dict(info));
        BValue::Dict(root)
    }

    fn sixty_bytes() -> Vec<u8> {
        (0..60).collect()
    }

    #[test]
    fn test_extract_well_formed() {
        let record = extract(&root_with(info_dict(sixty_bytes()))).unwrap();

        assert_eq!(record.announce, "http://tracker.example.com/announce");
        assert_eq!(record.info.piece_length, 16384);
        assert_eq!(record.info.length, 40000);
        assert_eq!(record.info.name, "ubuntu.iso");
        assert_eq!(record.info.pieces.len(), 3);
        assert_eq!(record.info.pieces[2][0], 40);
    }

    #[test]
    fn test_extract_ignores_extra_keys() {
        let mut info = info_dict(sixty_bytes());
        info.insert(b"private".to_vec(), BValue::Integer(1));
        assert!(extract(&root_with(info)).is_ok());
    }

    #[test]
    fn test_root_must_be_dict() {
        assert_eq!(
            extract(&BValue::List(vec![])),
            Err(MetadataError::InvalidRoot("list"))
        );
    }

    #[test]
    fn test_missing_info() {
        let mut root = HashMap::new();
        root.insert(b"announce".to_vec(), s("http://t/announce"));
        assert_eq!(
            extract(&BValue::Dict(root)),
            Err(MetadataError::MissingField("info"))
        );
    }

    #[test]
    fn test_info_not_a_dict() {
        let mut root = HashMap::new();
        root.insert(b"announce".to_vec(), s("http://t/announce"));
        root.insert(b"info".to_vec(), s("oops"));
        assert_eq!(
            extract(&BValue::Dict(root)),
            Err(MetadataError::MissingField("info"))
        );
    }

    #[test]
    fn test_announce_missing_or_mistyped() {
        let mut root = HashMap::new();
        root.insert(b"info".to_vec(), BValue::Dict(info_dict(sixty_bytes())));
        assert_eq!(
            extract(&BValue::Dict(root.clone())),
            Err(MetadataError::MissingField("announce"))
        );

        root.insert(b"announce".to_vec(), BValue::Integer(5));
        assert_eq!(
            extract(&BValue::Dict(root)),
            Err(MetadataError::MissingField("announce"))
        );
    }

    #[test]
    fn test_length_as_bytestring_is_type_mismatch() {
        let mut info = info_dict(sixty_bytes());
        info.insert(b"length".to_vec(), s("40000"));
        assert_eq!(
            extract(&root_with(info)),
            Err(MetadataError::FieldTypeMismatch("length"))
        );
    }

    #[test]
    fn test_each_info_field_is_attributed() {
        for field in ["piece length", "length", "name", "pieces"] {
            let mut info = info_dict(sixty_bytes());
            info.remove(field.as_bytes());
            assert_eq!(
                extract(&root_with(info)),
                Err(MetadataError::FieldTypeMismatch(field)),
                "removing '{}'",
                field
            );
        }

        let mut info = info_dict(sixty_bytes());
        info.insert(b"name".to_vec(), BValue::List(vec![]));
        assert_eq!(
            extract(&root_with(info)),
            Err(MetadataError::FieldTypeMismatch("name"))
        );
    }

    #[test]
    fn test_name_must_be_utf8() {
        let mut info = info_dict(sixty_bytes());
        info.insert(b"name".to_vec(), BValue::ByteString(vec![0xc3, 0x28]));
        assert_eq!(
            extract(&root_with(info)),
            Err(MetadataError::InvalidUtf8("name"))
        );
    }

    #[test]
    fn test_announce_must_be_utf8() {
        let mut root = HashMap::new();
        root.insert(b"announce".to_vec(), BValue::ByteString(vec![b'h', 0xff, b't']));
        root.insert(b"info".to_vec(), BValue::Dict(info_dict(sixty_bytes())));
        assert_eq!(
            extract(&BValue::Dict(root)),
            Err(MetadataError::InvalidUtf8("announce"))
        );
    }

    #[test]
    fn test_partial_piece_is_rejected() {
        let info = info_dict(vec![0u8; 45]);
        assert_eq!(
            extract(&root_with(info)),
            Err(MetadataError::PiecesLengthInvalid { len: 45, width: 20 })
        );
    }

    #[test]
    fn test_expected_piece_count() {
        let record = extract(&root_with(info_dict(sixty_bytes()))).unwrap();
        // 40000 / 16384 rounded up
        assert_eq!(record.info.expected_piece_count(), Some(3));

        let mut info = record.info.clone();
        info.piece_length = 0;
        assert_eq!(info.expected_piece_count(), None);
    }

    #[test]
    fn test_piece_hashes_hex() {
        let record = extract(&root_with(info_dict(vec![0xab; 20]))).unwrap();
        let hashes: Vec<String> = record.info.piece_hashes_hex().collect();
        assert_eq!(hashes, vec!["ab".repeat(20)]);
    }
}
