//! Engine result codes.
//!
//! The code set and message table follow zstd-mt's `ZSTDMT_error_*` enum, with
//! one addition (`DataTruncated`) so that running out of input mid-frame can be
//! told apart from a malformed frame.

use core::fmt;

/// Reason an engine run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    MemoryAllocation,
    ReadFail,
    WriteFail,
    /// Malformed framing (bad magic, bad header length, oversized frame).
    DataError,
    /// Input ended before a frame header or payload was complete.
    DataTruncated,
    FrameCompress,
    FrameDecompress,
    ParameterUnsupported,
    CompressionLibrary,
}

impl ErrorCode {
    /// The engine's fixed diagnostic for this code.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::MemoryAllocation => "Allocation error : not enough memory",
            ErrorCode::ReadFail => "Read failure",
            ErrorCode::WriteFail => "Write failure",
            ErrorCode::DataError => "Data error",
            ErrorCode::DataTruncated => "Data truncated",
            ErrorCode::FrameCompress => "Frame compression error",
            ErrorCode::FrameDecompress => "Frame decompression error",
            ErrorCode::ParameterUnsupported => "Compression parameter is unsupported",
            ErrorCode::CompressionLibrary => "Compression library reports failure",
        }
    }
}

/// Failure reported by [`Context::run`](super::Context::run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    code: ErrorCode,
    detail: Option<String>,
}

impl EngineError {
    pub fn new(code: ErrorCode) -> Self {
        EngineError { code, detail: None }
    }

    pub fn with_detail(code: ErrorCode, detail: impl Into<String>) -> Self {
        EngineError {
            code,
            detail: Some(detail.into()),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.code.message(), detail),
            None => f.write_str(self.code.message()),
        }
    }
}

impl std::error::Error for EngineError {}

pub type EngineResult<T> = Result<T, EngineError>;
