// frame.rs: zstd-mt container framing.
//
// Every compressed block is preceded by a 12-byte zstd skippable frame that
// records the size of the zstd frame that follows:
//
//   offset 0  u32 LE  SKIPPABLE_MAGIC (0x184D2A50)
//   offset 4  u32 LE  4   (length of the skippable payload)
//   offset 8  u32 LE  compressed size of the next zstd frame
//
// Plain zstd decoders skip the header, so the concatenated output is also a
// valid multi-frame zstd stream.

use super::error::{EngineError, EngineResult, ErrorCode};

pub const SKIPPABLE_MAGIC: u32 = 0x184D_2A50;
pub const HEADER_SIZE: usize = 12;
const SKIPPABLE_PAYLOAD: u32 = 4;

/// Writes the header for a frame of `compressed_size` bytes into `out[..12]`.
pub fn write_header(out: &mut [u8], compressed_size: u32) {
    out[0..4].copy_from_slice(&SKIPPABLE_MAGIC.to_le_bytes());
    out[4..8].copy_from_slice(&SKIPPABLE_PAYLOAD.to_le_bytes());
    out[8..12].copy_from_slice(&compressed_size.to_le_bytes());
}

/// Validates a header and returns the compressed size of the following frame.
pub fn read_header(hdr: &[u8; HEADER_SIZE]) -> EngineResult<usize> {
    let magic = u32::from_le_bytes([hdr[0], hdr[1], hdr[2], hdr[3]]);
    if magic != SKIPPABLE_MAGIC {
        return Err(EngineError::with_detail(
            ErrorCode::DataError,
            format!("bad frame magic 0x{magic:08X}"),
        ));
    }
    let payload = u32::from_le_bytes([hdr[4], hdr[5], hdr[6], hdr[7]]);
    if payload != SKIPPABLE_PAYLOAD {
        return Err(EngineError::with_detail(
            ErrorCode::DataError,
            format!("bad skippable frame length {payload}"),
        ));
    }
    Ok(u32::from_le_bytes([hdr[8], hdr[9], hdr[10], hdr[11]]) as usize)
}
