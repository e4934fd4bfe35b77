// config.rs: Compile-time configuration constants.
//
// Ranges accepted by the zstd-mt engine and the defaults the driver falls back
// to when a caller leaves a parameter unset. Runtime overrides live in
// `params.rs` (`Params::from_env`).

pub const KB: usize = 1 << 10;
pub const MB: usize = 1 << 20;

// Default compression level.
// Can be overridden by the ZSTDMT_LEVEL environment variable.
pub const LEVEL_DEF: i32 = 3;

// Compression level range accepted by the engine (zstd's own 1..=22).
pub const LEVEL_MIN: i32 = 1;
pub const LEVEL_MAX: i32 = 22;

// Maximum number of worker threads per context.
// Can be overridden (downwards) by the ZSTDMT_THREADS environment variable.
pub const THREAD_MAX: usize = 128;

// Input block size used when the caller passes 0.
pub const BLOCK_SIZE_DEFAULT: usize = 4 * MB;

// Smallest explicit block size accepted. Anything smaller makes the 12-byte
// frame header a meaningful fraction of the output.
pub const BLOCK_SIZE_MIN: usize = KB;

// Largest block size accepted; keeps the compressed size of one block well
// inside the u32 length field of the frame header.
pub const BLOCK_SIZE_MAX: usize = 256 * MB;

// Number of blocks each worker may have in flight before the reader stalls.
pub const IN_FLIGHT_PER_THREAD: usize = 2;
