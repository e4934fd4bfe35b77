//! Compression driver.
//!
//! One call runs through `Created → Configured → Running → Completed | Failed`:
//! parameters are validated, an engine context is allocated, the cursor and
//! destination are wired to the engine as [`StagingReader`] and
//! [`OutputAppender`], the engine runs to completion, and the context is
//! dropped before the call returns on every path.
//!
//! The `*_into` variants append to a caller-owned destination and leave
//! whatever was already appended in place when they fail; that content is
//! not a valid stream and must be discarded. The owning variants return a
//! fresh buffer only on success.

use std::io;

use log::{debug, warn};

use crate::bufferlist::{BufferList, Cursor};
use crate::engine::{Context, Engine, EngineError, EngineResult, ErrorCode, RdWr, ZstdMt};
use crate::error::{Error, Result};
use crate::params::Params;
use crate::rdwr::{OutputAppender, StagingReader};

/// Byte and frame counts of one successful call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub frames: u64,
}

impl Statistics {
    fn of<C: Context>(ctx: &C) -> Self {
        Statistics {
            input_bytes: ctx.insize(),
            output_bytes: ctx.outsize(),
            frames: ctx.frames(),
        }
    }
}

/// Runs compress / decompress passes of an [`Engine`] over segmented buffers.
#[derive(Clone, Debug)]
pub struct Driver<E = ZstdMt> {
    engine: E,
    params: Params,
}

impl Driver<ZstdMt> {
    pub fn new(params: Params) -> Self {
        Driver {
            engine: ZstdMt,
            params,
        }
    }
}

impl Default for Driver<ZstdMt> {
    fn default() -> Self {
        Driver::new(Params::default())
    }
}

/// Wires `src` and `dst` to the engine callbacks and runs one pass.
fn run_pass<C: Context>(
    ctx: &mut C,
    src: &mut Cursor<'_>,
    dst: &mut BufferList,
) -> EngineResult<()> {
    let mut reader = StagingReader::new(src);
    let mut appender = OutputAppender::new(dst);
    let mut fn_read = |buf: &mut [u8]| -> io::Result<usize> { Ok(reader.pull(buf)) };
    let mut fn_write = |block: &[u8]| -> io::Result<()> {
        appender.push(block);
        Ok(())
    };
    ctx.run(&mut RdWr {
        fn_read: &mut fn_read,
        fn_write: &mut fn_write,
    })
}

fn decompress_error(e: EngineError) -> Error {
    match e.code() {
        ErrorCode::DataTruncated => Error::IncompleteStream(e.to_string()),
        ErrorCode::DataError | ErrorCode::FrameDecompress => Error::CorruptStream(e.to_string()),
        _ => Error::Engine(e.to_string()),
    }
}

impl<E: Engine> Driver<E> {
    /// Uses `engine` instead of the default zstd-mt engine.
    pub fn with_engine(engine: E, params: Params) -> Self {
        Driver { engine, params }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Compresses everything left in `src` into a new buffer.
    pub fn compress(&self, src: &mut Cursor<'_>) -> Result<(BufferList, Statistics)> {
        let mut dst = BufferList::new();
        let stats = self.compress_into(src, &mut dst)?;
        Ok((dst, stats))
    }

    /// Compresses everything left in `src`, appending the result to `dst`.
    pub fn compress_into(&self, src: &mut Cursor<'_>, dst: &mut BufferList) -> Result<Statistics> {
        let p = &self.params;
        p.validate()?;
        let mut cctx = self
            .engine
            .create_cctx(p.threads, p.level, p.block_size, p.checksum)
            .ok_or(Error::ResourceExhausted)?;

        run_pass(&mut cctx, src, dst).map_err(|e| {
            warn!("compression failed: {e}");
            Error::Engine(e.to_string())
        })?;

        let stats = Statistics::of(&cctx);
        debug!(
            "compressed {} -> {} bytes in {} frames",
            stats.input_bytes, stats.output_bytes, stats.frames
        );
        Ok(stats)
    }

    /// Decompresses exactly `compressed_len` bytes from `src` into a new buffer.
    pub fn decompress(
        &self,
        src: &mut Cursor<'_>,
        compressed_len: usize,
    ) -> Result<(BufferList, Statistics)> {
        let mut dst = BufferList::new();
        let stats = self.decompress_into(src, compressed_len, &mut dst)?;
        Ok((dst, stats))
    }

    /// Decompresses exactly `compressed_len` bytes from `src`, appending the
    /// result to `dst`.
    ///
    /// The engine never sees a byte past `compressed_len`, whatever follows
    /// in the buffer. On return `src` has moved past the bytes the engine
    /// consumed and any cap it carried is reduced by the same amount.
    pub fn decompress_into(
        &self,
        src: &mut Cursor<'_>,
        compressed_len: usize,
        dst: &mut BufferList,
    ) -> Result<Statistics> {
        let p = &self.params;
        p.validate()?;
        if compressed_len > src.remaining() {
            let msg = format!(
                "declared compressed length {compressed_len} exceeds the {} bytes available",
                src.remaining()
            );
            warn!("{msg}");
            return Err(Error::IncompleteStream(msg));
        }
        let mut dctx = self
            .engine
            .create_dctx(p.threads, p.block_size)
            .ok_or(Error::ResourceExhausted)?;

        let outer_cap = src.cap();
        let start = src.position();
        src.set_cap(compressed_len);
        let result = run_pass(&mut dctx, src, dst);
        let consumed = src.position() - start;
        match outer_cap {
            Some(cap) => src.set_cap(cap.saturating_sub(consumed)),
            None => src.clear_cap(),
        }

        result.map_err(|e| {
            warn!("decompression failed after {consumed} bytes: {e}");
            decompress_error(e)
        })?;

        let stats = Statistics::of(&dctx);
        debug!(
            "decompressed {} -> {} bytes in {} frames",
            stats.input_bytes, stats.output_bytes, stats.frames
        );
        Ok(stats)
    }
}
