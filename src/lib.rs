// zstdmt: segmented-buffer adapter for the zstd-mt block compression engine

pub mod config;
pub mod error;
pub mod params;
pub mod bufferlist;
pub mod rdwr;
pub mod threadpool;
pub mod engine;
pub mod driver;
pub mod compressor;

// ── Version constants ─────────────────────────────────────────────────────────
/// Crate version, reported when an engine context is created.
pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use bufferlist::{BufferList, Cursor};
pub use compressor::{Compressor, ZstdMtCompressor};
pub use driver::{Driver, Statistics};
pub use engine::{Engine, ZstdMt};
pub use error::{Error, Result};
pub use params::Params;
