//! Decompression context.
//!
//! Reads `header | zstd frame` pairs until input ends, decodes frames on the
//! worker pool and writes each decoded block in stream order. Input that ends
//! between frames is a clean end of stream; input that ends inside a header
//! or a frame is reported as [`ErrorCode::DataTruncated`]. A frame that
//! decodes to more than [`BLOCK_SIZE_MAX`] bytes is a [`ErrorCode::DataError`].

use std::io::Read;

use log::{debug, trace};

use crate::config::{BLOCK_SIZE_DEFAULT, BLOCK_SIZE_MAX, IN_FLIGHT_PER_THREAD, THREAD_MAX};
use crate::threadpool::WorkerPool;
use crate::VERSION_STRING;

use super::error::{EngineError, EngineResult, ErrorCode};
use super::frame::{read_header, HEADER_SIZE};
use super::{Context, RdWr};

/// zstd-mt decompression context.
pub struct DCtx {
    pool: WorkerPool,
    /// Largest single read issued while fetching a frame payload.
    read_step: usize,
    /// Largest frame accepted from a header.
    max_frame: usize,
    /// Largest decoded size accepted for one frame.
    max_block: usize,
    frames: u64,
    insize: u64,
    outsize: u64,
}

impl DCtx {
    /// Allocates a context; `None` if a parameter is outside the engine's
    /// range or the worker pool cannot be built.
    pub fn new(threads: usize, block_size: usize) -> Option<Self> {
        if threads > THREAD_MAX {
            return None;
        }
        let read_step = if block_size == 0 { BLOCK_SIZE_DEFAULT } else { block_size };
        if read_step > BLOCK_SIZE_MAX {
            return None;
        }
        let pool = WorkerPool::new(threads)?;
        debug!("zstdmt {VERSION_STRING} dctx: threads={threads} read_step={read_step}");
        Some(DCtx {
            pool,
            read_step,
            max_frame: zstd::zstd_safe::compress_bound(BLOCK_SIZE_MAX),
            max_block: BLOCK_SIZE_MAX,
            frames: 0,
            insize: 0,
            outsize: 0,
        })
    }
}

fn truncated(what: String) -> EngineError {
    EngineError::with_detail(ErrorCode::DataTruncated, what)
}

/// Decodes one frame, refusing to produce more than `max_block` bytes.
fn decompress_block(src: &[u8], max_block: usize) -> EngineResult<Vec<u8>> {
    let failed = |e: std::io::Error| {
        EngineError::with_detail(ErrorCode::FrameDecompress, e.to_string())
    };
    let decoder = zstd::stream::read::Decoder::with_buffer(src).map_err(failed)?;
    let mut out = Vec::new();
    decoder
        .take(max_block as u64 + 1)
        .read_to_end(&mut out)
        .map_err(failed)?;
    if out.len() > max_block {
        return Err(EngineError::with_detail(
            ErrorCode::DataError,
            format!("frame expands past {max_block} bytes"),
        ));
    }
    Ok(out)
}

impl Context for DCtx {
    fn run(&mut self, rdwr: &mut RdWr<'_>) -> EngineResult<()> {
        let DCtx {
            pool,
            read_step,
            max_frame,
            max_block,
            frames,
            insize,
            outsize,
        } = self;
        let (read_step, max_frame, max_block) = (*read_step, *max_frame, *max_block);
        *frames = 0;
        *insize = 0;
        *outsize = 0;

        let (mut reader, mut writer) = rdwr.split();
        pool.pipeline(
            pool.nb_threads() * IN_FLIGHT_PER_THREAD,
            |block: &mut Vec<u8>| {
                let mut hdr = [0u8; HEADER_SIZE];
                let n = reader.read_full(&mut hdr)?;
                *insize += n as u64;
                if n == 0 {
                    return Ok(false);
                }
                if n < HEADER_SIZE {
                    return Err(truncated(format!("frame header: {n} of {HEADER_SIZE} bytes")));
                }
                let size = read_header(&hdr)?;
                if size == 0 || size > max_frame {
                    return Err(EngineError::with_detail(
                        ErrorCode::DataError,
                        format!("frame size {size} out of range"),
                    ));
                }

                // Grow the payload step by step so a damaged size field cannot
                // force one huge allocation.
                block.clear();
                while block.len() < size {
                    let start = block.len();
                    let want = (size - start).min(read_step);
                    block.resize(start + want, 0);
                    let got = reader.read_full(&mut block[start..])?;
                    block.truncate(start + got);
                    *insize += got as u64;
                    if got < want {
                        return Err(truncated(format!(
                            "frame payload: {} of {size} bytes",
                            block.len()
                        )));
                    }
                }
                Ok(true)
            },
            |src: &[u8]| decompress_block(src, max_block),
            |data: &[u8]| {
                writer.write(data)?;
                *frames += 1;
                *outsize += data.len() as u64;
                trace!("frame {} decoded ({} bytes)", *frames, data.len());
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
