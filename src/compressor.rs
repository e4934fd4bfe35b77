//! Buffer-to-buffer codec interface.
//!
//! [`Compressor`] is the surface a codec registry sees: whole segmented
//! buffers in, whole segmented buffers out. Recording the compressed length
//! (for example in a length prefix) is the caller's business; `decompress_at`
//! takes it already decoded.

use crate::bufferlist::{BufferList, Cursor};
use crate::driver::Driver;
use crate::engine::ZstdMt;
use crate::error::Result;
use crate::params::Params;

pub trait Compressor {
    /// Registry name of the algorithm.
    fn name(&self) -> &str;

    /// Compresses all of `src`, appending the stream to `dst`.
    fn compress(&self, src: &BufferList, dst: &mut BufferList) -> Result<()>;

    /// Decompresses `compressed_len` bytes read from `src`, appending the
    /// plain bytes to `dst`. `src` ends up just past the consumed bytes.
    fn decompress_at(
        &self,
        src: &mut Cursor<'_>,
        compressed_len: usize,
        dst: &mut BufferList,
    ) -> Result<()>;

    /// Decompresses the whole of `src`.
    fn decompress(&self, src: &BufferList, dst: &mut BufferList) -> Result<()> {
        let mut cursor = src.cursor();
        self.decompress_at(&mut cursor, src.len(), dst)
    }
}

/// zstd-mt codec. Holds only parameters; every call builds its own context.
#[derive(Clone, Debug, Default)]
pub struct ZstdMtCompressor {
    driver: Driver<ZstdMt>,
}

impl ZstdMtCompressor {
    pub const NAME: &'static str = "zstdmt";

    pub fn new(params: Params) -> Self {
        ZstdMtCompressor {
            driver: Driver::new(params),
        }
    }

    pub fn params(&self) -> &Params {
        self.driver.params()
    }
}

impl Compressor for ZstdMtCompressor {
    fn name(&self) -> &str {
        Self::NAME
    }

    // Both directions stage output in a private buffer so `dst` only ever
    // receives a complete result.
    fn compress(&self, src: &BufferList, dst: &mut BufferList) -> Result<()> {
        let (mut out, _) = self.driver.compress(&mut src.cursor())?;
        dst.claim_append(&mut out);
        Ok(())
    }

    fn decompress_at(
        &self,
        src: &mut Cursor<'_>,
        compressed_len: usize,
        dst: &mut BufferList,
    ) -> Result<()> {
        let (mut out, _) = self.driver.decompress(src, compressed_len)?;
        dst.claim_append(&mut out);
        Ok(())
    }
}
