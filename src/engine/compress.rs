//! Compression context.
//!
//! Input is read in `block_size` chunks; each chunk becomes one independent
//! zstd frame behind a 12-byte skippable header (see [`frame`](super::frame)).
//! Frames are emitted one `fn_write` call each, in input order.

use std::cell::RefCell;

use log::{debug, trace};

use crate::config::{
    BLOCK_SIZE_DEFAULT, BLOCK_SIZE_MAX, IN_FLIGHT_PER_THREAD, LEVEL_MAX, LEVEL_MIN, THREAD_MAX,
};
use crate::threadpool::WorkerPool;
use crate::VERSION_STRING;

use super::error::{EngineError, EngineResult, ErrorCode};
use super::frame::{write_header, HEADER_SIZE};
use super::{Context, RdWr};

/// zstd-mt compression context.
pub struct CCtx {
    pool: WorkerPool,
    level: i32,
    block_size: usize,
    checksum: bool,
    frames: u64,
    insize: u64,
    outsize: u64,
}

impl CCtx {
    /// Allocates a context; `None` if a parameter is outside the engine's
    /// range or the worker pool cannot be built. A `block_size` of 0 selects
    /// [`BLOCK_SIZE_DEFAULT`].
    pub fn new(threads: usize, level: i32, block_size: usize, checksum: bool) -> Option<Self> {
        if threads > THREAD_MAX || !(LEVEL_MIN..=LEVEL_MAX).contains(&level) {
            return None;
        }
        let block_size = if block_size == 0 { BLOCK_SIZE_DEFAULT } else { block_size };
        if block_size > BLOCK_SIZE_MAX {
            return None;
        }
        let pool = WorkerPool::new(threads)?;
        debug!("zstdmt {VERSION_STRING} cctx: threads={threads} level={level} block_size={block_size} checksum={checksum}");
        Some(CCtx {
            pool,
            level,
            block_size,
            checksum,
            frames: 0,
            insize: 0,
            outsize: 0,
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

/// zstd context cached by a worker thread, with the settings it was built for.
struct CachedCompressor {
    level: i32,
    checksum: bool,
    zc: zstd::bulk::Compressor<'static>,
}

thread_local! {
    // One per worker; rebuilt only when a call asks for other settings.
    static COMPRESSOR: RefCell<Option<CachedCompressor>> = const { RefCell::new(None) };
}

fn library_error(e: std::io::Error) -> EngineError {
    EngineError::with_detail(ErrorCode::CompressionLibrary, e.to_string())
}

/// Compresses `src` into a complete container frame (header included).
fn compress_block(src: &[u8], level: i32, checksum: bool) -> EngineResult<Vec<u8>> {
    COMPRESSOR.with(|slot| -> EngineResult<Vec<u8>> {
        let mut slot = slot.borrow_mut();
        let stale = !matches!(&*slot, Some(c) if c.level == level && c.checksum == checksum);
        if stale {
            *slot = None;
            let mut zc = zstd::bulk::Compressor::new(level).map_err(library_error)?;
            zc.include_checksum(checksum).map_err(library_error)?;
            *slot = Some(CachedCompressor { level, checksum, zc });
        }
        let cached = slot
            .as_mut()
            .ok_or_else(|| EngineError::new(ErrorCode::CompressionLibrary))?;

        let bound = zstd::zstd_safe::compress_bound(src.len());
        let mut out = vec![0u8; HEADER_SIZE + bound];
        let n = match cached.zc.compress_to_buffer(src, &mut out[HEADER_SIZE..]) {
            Ok(n) => n,
            Err(e) => {
                // A failed context is not reused.
                *slot = None;
                return Err(EngineError::with_detail(ErrorCode::FrameCompress, e.to_string()));
            }
        };
        let size = u32::try_from(n).map_err(|_| {
            EngineError::with_detail(ErrorCode::FrameCompress, format!("frame of {n} bytes"))
        })?;
        write_header(&mut out, size);
        out.truncate(HEADER_SIZE + n);
        Ok(out)
    })
}

impl Context for CCtx {
    fn run(&mut self, rdwr: &mut RdWr<'_>) -> EngineResult<()> {
        let CCtx {
            pool,
            level,
            block_size,
            checksum,
            frames,
            insize,
            outsize,
        } = self;
        let (level, block_size, checksum) = (*level, *block_size, *checksum);
        *frames = 0;
        *insize = 0;
        *outsize = 0;

        let (mut reader, mut writer) = rdwr.split();
        pool.pipeline(
            pool.nb_threads() * IN_FLIGHT_PER_THREAD,
            |block: &mut Vec<u8>| {
                block.resize(block_size, 0);
                let n = reader.read(block)?;
                block.truncate(n);
                *insize += n as u64;
                Ok(n > 0)
            },
            |src: &[u8]| compress_block(src, level, checksum),
            |frame: &[u8]| {
                writer.write(frame)?;
                *frames += 1;
                *outsize += frame.len() as u64;
                trace!("frame {} written ({} bytes)", *frames, frame.len());
                Ok(())
            },
        )
    }

    fn frames(&self) -> u64 {
        self.frames
    }

    fn insize(&self) -> u64 {
        self.insize
    }

    fn outsize(&self) -> u64 {
        self.outsize
    }
}
