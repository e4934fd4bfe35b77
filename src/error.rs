//! Error taxonomy surfaced by the compression driver.
//!
//! Every failure is reported once, at the point it is detected, and carries
//! the engine's own diagnostic text when one exists. Nothing here is retried.

use thiserror::Error;

/// Failure of a single `compress` / `decompress` call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Thread count, level or block size out of range. Raised before any
    /// engine resource is allocated.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The engine context (worker pool included) could not be allocated.
    #[error("allocating compression context failed")]
    ResourceExhausted,

    /// The engine ran and reported a failure.
    #[error("{0}")]
    Engine(String),

    /// The declared compressed length exceeds the bytes available, or the
    /// engine ran out of input before the stream was complete. Carries the
    /// engine's diagnostic text.
    #[error("compressed stream is incomplete: {0}")]
    IncompleteStream(String),

    /// The engine rejected the compressed framing.
    #[error("compressed stream is corrupt: {0}")]
    CorruptStream(String),
}

pub type Result<T> = std::result::Result<T, Error>;
