use super::error::MetadataError;

/// Width of a SHA-1 piece hash.
pub const PIECE_HASH_LEN: usize = 20;

pub type PieceHash = [u8; PIECE_HASH_LEN];

/// Splits `data` into consecutive `N`-byte records, in input order.
///
/// A trailing partial record is an error rather than a short chunk.
pub fn split_chunks<const N: usize>(data: &[u8]) -> Result<Vec<[u8; N]>, MetadataError> {
    // checked_rem is None for N == 0
    if data.len().checked_rem(N) != Some(0) {
        return Err(MetadataError::PiecesLengthInvalid {
            len: data.len(),
            width: N,
        });
    }

    let chunks = data
        .chunks_exact(N)
        .map(|chunk| {
            let mut record = [0u8; N];
            record.copy_from_slice(chunk);
            record
        })
        .collect();
    Ok(chunks)
}

pub fn split_pieces(data: &[u8]) -> Result<Vec<PieceHash>, MetadataError> {
    split_chunks::<PIECE_HASH_LEN>(data)
}
