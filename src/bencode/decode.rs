use std::collections::HashMap;

use log::{debug, trace};

use super::error::DecodeError;
use super::source::{ByteSource, Lookahead, SliceSource};
use crate::bencode::bvalue::BValue;
use crate::config::{Config, DEFAULT_MAX_DEPTH};

// i64::MIN is 20 characters including the sign; usize::MAX is 20 digits.
// Redundant leading zeros are dropped before they count against these.
const MAX_INTEGER_LITERAL: usize = 20;
const MAX_LENGTH_PREFIX: usize = 20;

// Upper bound on the up-front allocation for a byte string, so a forged
// length prefix can't reserve memory the input never backs.
const MAX_PREALLOC: usize = 64 * 1024;

/// Recursive-descent bencode decoder over a byte source.
///
/// Each call to [`Decoder::decode`] consumes exactly one value. Nesting of
/// lists and dictionaries is bounded by `max_depth`.
pub struct Decoder<S> {
    input: Lookahead<S>,
    max_depth: usize,
}

impl<S: ByteSource> Decoder<S> {
    pub fn new(source: S) -> Self {
        Self {
            input: Lookahead::new(source),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_config(source: S, config: &Config) -> Self {
        Self {
            input: Lookahead::new(source),
            max_depth: config.max_depth,
        }
    }

    pub fn decode(&mut self) -> Result<BValue, DecodeError> {
        self.decode_value(0)
    }

    /// True when no bytes remain after the values decoded so far.
    pub fn is_finished(&mut self) -> Result<bool, DecodeError> {
        Ok(self.input.peek()?.is_none())
    }

    /// Number of bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.input.offset()
    }

    fn decode_value(&mut self, depth: usize) -> Result<BValue, DecodeError> {
        let tag = self.input.advance()?.ok_or(DecodeError::EndOfInput)?;

        match tag {
            b'i' => self.decode_integer(),
            b'l' => self.decode_list(depth + 1),
            b'd' => self.decode_dict(depth + 1),
            first => self.decode_string(first),
        }
    }

    fn decode_integer(&mut self) -> Result<BValue, DecodeError> {
        let mut literal = Vec::new();
        loop {
            match self.input.advance()?.ok_or(DecodeError::EndOfInput)? {
                b'e' => break,
                b => {
                    push_significant(&mut literal, b);
                    if literal.len() > MAX_INTEGER_LITERAL {
                        return Err(DecodeError::MalformedInteger(lossy(&literal)));
                    }
                }
            }
        }

        let value = parse_integer(&literal)?;
        trace!("decoded integer {}", value);
        Ok(BValue::Integer(value))
    }

    /// Decodes `<length>:<bytes>` where `first` is the already consumed
    /// first byte of the length prefix.
    fn decode_string(&mut self, first: u8) -> Result<BValue, DecodeError> {
        let mut prefix = vec![first];
        loop {
            match self.input.advance()? {
                Some(b':') => break,
                Some(b) => {
                    push_significant(&mut prefix, b);
                    if prefix.len() > MAX_LENGTH_PREFIX {
                        return Err(DecodeError::MalformedLength(lossy(&prefix)));
                    }
                }
                None => return Err(DecodeError::MalformedLength(lossy(&prefix))),
            }
        }

        let length = parse_length(&prefix)?;

        let mut data = Vec::with_capacity(length.min(MAX_PREALLOC));
        while data.len() < length {
            match self.input.advance()? {
                Some(b) => data.push(b),
                None => {
                    return Err(DecodeError::TruncatedString {
                        expected: length,
                        found: data.len(),
                    })
                }
            }
        }

        trace!("decoded byte string of {} bytes", length);
        Ok(BValue::ByteString(data))
    }

    fn decode_list(&mut self, depth: usize) -> Result<BValue, DecodeError> {
        self.check_depth(depth)?;

        let mut items = Vec::new();
        while !self.at_terminator()? {
            items.push(self.decode_value(depth)?);
        }

        trace!("decoded list of {} items at depth {}", items.len(), depth);
        Ok(BValue::List(items))
    }

    fn decode_dict(&mut self, depth: usize) -> Result<BValue, DecodeError> {
        self.check_depth(depth)?;

        let mut map = HashMap::new();
        while !self.at_terminator()? {
            let key = match self.decode_value(depth)? {
                BValue::ByteString(bytes) => bytes,
                other => {
                    debug!("rejecting {} used as dictionary key", other.kind());
                    return Err(DecodeError::NonStringKey);
                }
            };

            let value = self.decode_value(depth)?;

            if map.insert(key, value).is_some() {
                debug!("duplicate dictionary key at offset {}, keeping later value", self.input.offset());
            }
        }

        trace!("decoded dictionary of {} entries at depth {}", map.len(), depth);
        Ok(BValue::Dict(map))
    }

    /// Consumes the closing `e` of a list or dictionary if it is next.
    /// Any other byte is left in place for the nested value.
    fn at_terminator(&mut self) -> Result<bool, DecodeError> {
        match self.input.peek()? {
            Some(b'e') => {
                self.input.advance()?;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(DecodeError::EndOfInput),
        }
    }

    fn check_depth(&self, depth: usize) -> Result<(), DecodeError> {
        if depth > self.max_depth {
            debug!("nesting depth {} exceeds limit {}", depth, self.max_depth);
            return Err(DecodeError::NestingTooDeep(self.max_depth));
        }
        Ok(())
    }
}

/// Decodes a single value from `source` with the default limits.
pub fn decode<S: ByteSource>(source: S) -> Result<BValue, DecodeError> {
    Decoder::new(source).decode()
}

/// Decodes one value from the front of `input`, returning how many bytes it
/// took. Anything after that is left for the caller.
pub fn decode_bencode(input: &[u8]) -> Result<(usize, BValue), DecodeError> {
    let mut decoder = Decoder::new(SliceSource::new(input));
    let value = decoder.decode()?;
    Ok((decoder.offset() as usize, value))
}

/// Accepts `-?[0-9]+`, rejecting negative zero. Leading zeros are allowed.
fn parse_integer(literal: &[u8]) -> Result<i64, DecodeError> {
    let malformed = || DecodeError::MalformedInteger(lossy(literal));

    let digits = literal.strip_prefix(b"-").unwrap_or(literal);
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(malformed());
    }
    if digits.len() != literal.len() && digits.iter().all(|&b| b == b'0') {
        return Err(malformed());
    }

    // Only ASCII digits and '-' remain, so this is valid UTF-8.
    let text = std::str::from_utf8(literal).map_err(|_| malformed())?;
    text.parse::<i64>().map_err(|_| malformed())
}

fn parse_length(prefix: &[u8]) -> Result<usize, DecodeError> {
    let malformed = || DecodeError::MalformedLength(lossy(prefix));

    if !prefix.iter().all(u8::is_ascii_digit) {
        return Err(malformed());
    }
    let text = std::str::from_utf8(prefix).map_err(|_| malformed())?;
    text.parse::<usize>().map_err(|_| malformed())
}

/// Appends `b`, collapsing leading zeros so `-007` is kept as `-7` and
/// `000` as `0`. A lone `-0` survives and is rejected later.
fn push_significant(literal: &mut Vec<u8>, b: u8) {
    let sign = usize::from(literal.first() == Some(&b'-'));
    if b.is_ascii_digit() && literal.len() == sign + 1 && literal[sign] == b'0' {
        literal[sign] = b;
    } else {
        literal.push(b);
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
