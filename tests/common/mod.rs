// Shared helpers for the integration tests.

#![allow(dead_code)]

use zstdmt::{BufferList, Params};

/// Repeating pattern: compressible but not all-zeros.
pub fn pattern_data(len: usize) -> Vec<u8> {
    (0u8..=127).cycle().take(len).collect()
}

/// Low-compressibility bytes from a xorshift generator.
pub fn noise_data(len: usize, seed: u64) -> Vec<u8> {
    let mut x = seed | 1;
    (0..len)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x as u8
        })
        .collect()
}

/// Splits `data` into segments of the given widths, cycling through them.
pub fn segmented(data: &[u8], widths: &[usize]) -> BufferList {
    let mut bl = BufferList::new();
    let mut pos = 0;
    let mut i = 0;
    while pos < data.len() {
        let w = widths[i % widths.len()].max(1);
        let end = (pos + w).min(data.len());
        bl.append_slice(&data[pos..end]);
        pos = end;
        i += 1;
    }
    bl
}

/// Small blocks and a couple of workers, so modest inputs span many frames.
pub fn small_block_params() -> Params {
    Params::default()
        .with_threads(3)
        .with_block_size(zstdmt::config::BLOCK_SIZE_MIN)
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
