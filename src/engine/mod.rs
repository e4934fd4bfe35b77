//! Multithreaded block compression engine.
//!
//! The engine is driven entirely through two callbacks bundled in [`RdWr`]:
//! it pulls input with `fn_read` until that returns 0 and pushes every
//! produced block through `fn_write`. Both callbacks are only ever invoked
//! from the thread that called [`Context::run`], one at a time.
//!
//! [`ZstdMt`] is the production engine. The [`Engine`] / [`Context`] traits
//! exist so the driver can be exercised against other engines.

pub mod compress;
pub mod decompress;
pub mod error;
pub mod frame;

use std::io;

pub use compress::CCtx;
pub use decompress::DCtx;
pub use error::{EngineError, EngineResult, ErrorCode};

/// Read and write hooks handed to [`Context::run`].
pub struct RdWr<'a> {
    /// Fills the buffer as far as possible; returns bytes written, 0 at end.
    pub fn_read: &'a mut dyn FnMut(&mut [u8]) -> io::Result<usize>,
    /// Consumes one finished output block.
    pub fn_write: &'a mut dyn FnMut(&[u8]) -> io::Result<()>,
}

impl<'a> RdWr<'a> {
    /// Splits the hooks so the read and write sides can be borrowed
    /// independently.
    pub(crate) fn split(&mut self) -> (Reader<'_, 'a>, Writer<'_, 'a>) {
        (
            Reader { f: &mut *self.fn_read },
            Writer { f: &mut *self.fn_write },
        )
    }
}

pub(crate) struct Reader<'r, 'a> {
    f: &'r mut (dyn FnMut(&mut [u8]) -> io::Result<usize> + 'a),
}

impl Reader<'_, '_> {
    pub(crate) fn read(&mut self, buf: &mut [u8]) -> EngineResult<usize> {
        (self.f)(buf).map_err(|e| EngineError::with_detail(ErrorCode::ReadFail, e.to_string()))
    }

    /// Reads until `buf` is full or input ends; returns bytes read.
    pub(crate) fn read_full(&mut self, buf: &mut [u8]) -> EngineResult<usize> {
        let mut total = 0;
        while total < buf.len() {
            let n = self.read(&mut buf[total..])?;
            if n == 0 {
                break;
            }
            total += n;
        }
        Ok(total)
    }
}

pub(crate) struct Writer<'w, 'a> {
    f: &'w mut (dyn FnMut(&[u8]) -> io::Result<()> + 'a),
}

impl Writer<'_, '_> {
    pub(crate) fn write(&mut self, block: &[u8]) -> EngineResult<()> {
        (self.f)(block).map_err(|e| EngineError::with_detail(ErrorCode::WriteFail, e.to_string()))
    }
}

/// One compression or decompression pass with its statistics.
///
/// A context is single-use per call; dropping it releases its workers.
pub trait Context {
    /// Drives the engine until input is exhausted or an error occurs.
    fn run(&mut self, rdwr: &mut RdWr<'_>) -> EngineResult<()>;
    /// Frames processed by the last run.
    fn frames(&self) -> u64;
    /// Bytes consumed through `fn_read`.
    fn insize(&self) -> u64;
    /// Bytes produced through `fn_write`.
    fn outsize(&self) -> u64;
}

/// Factory for compression and decompression contexts.
pub trait Engine {
    type CCtx: Context;
    type DCtx: Context;

    /// Returns `None` when the context cannot be allocated.
    fn create_cctx(
        &self,
        threads: usize,
        level: i32,
        block_size: usize,
        checksum: bool,
    ) -> Option<Self::CCtx>;

    /// Returns `None` when the context cannot be allocated.
    fn create_dctx(&self, threads: usize, block_size: usize) -> Option<Self::DCtx>;
}

/// zstd-mt: independent zstd frames per block, compressed in parallel.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZstdMt;

impl Engine for ZstdMt {
    type CCtx = CCtx;
    type DCtx = DCtx;

    fn create_cctx(
        &self,
        threads: usize,
        level: i32,
        block_size: usize,
        checksum: bool,
    ) -> Option<CCtx> {
        CCtx::new(threads, level, block_size, checksum)
    }

    fn create_dctx(&self, threads: usize, block_size: usize) -> Option<DCtx> {
        DCtx::new(threads, block_size)
    }
}
