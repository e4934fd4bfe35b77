//! Engine-facing read and write sides of the adapter.
//!
//! [`StagingReader`] feeds the engine's read callback from a [`Cursor`],
//! coalescing as many segments as it takes to fill the engine's scratch
//! block. [`OutputAppender`] turns every block the engine emits into a new
//! trailing segment of the destination [`BufferList`].

use crate::bufferlist::{BufferList, Cursor};

/// Pulls bytes from a cursor into engine-supplied scratch blocks.
pub struct StagingReader<'c, 'a> {
    cursor: &'c mut Cursor<'a>,
    /// Set once a pull returned 0; every later pull returns 0 as well.
    eof: bool,
    pulled: u64,
}

impl<'c, 'a> StagingReader<'c, 'a> {
    pub fn new(cursor: &'c mut Cursor<'a>) -> Self {
        StagingReader {
            cursor,
            eof: false,
            pulled: 0,
        }
    }

    /// Copies up to `scratch.len()` bytes into `scratch`, crossing segment
    /// boundaries as needed. Returns the number of bytes written; 0 means
    /// end of input.
    pub fn pull(&mut self, scratch: &mut [u8]) -> usize {
        if self.eof {
            return 0;
        }
        let mut filled = 0;
        while filled < scratch.len() {
            let run = self.cursor.advance(scratch.len() - filled);
            if run.is_empty() {
                break;
            }
            scratch[filled..filled + run.len()].copy_from_slice(run);
            filled += run.len();
        }
        if filled == 0 && !scratch.is_empty() {
            self.eof = true;
        }
        self.pulled += filled as u64;
        filled
    }

    /// Total bytes handed to the engine so far.
    pub fn pulled(&self) -> u64 {
        self.pulled
    }

    pub fn is_eof(&self) -> bool {
        self.eof
    }
}

/// Appends engine output blocks to a destination buffer in call order.
pub struct OutputAppender<'d> {
    dst: &'d mut BufferList,
    pushed: u64,
    blocks: u64,
}

impl<'d> OutputAppender<'d> {
    pub fn new(dst: &'d mut BufferList) -> Self {
        OutputAppender {
            dst,
            pushed: 0,
            blocks: 0,
        }
    }

    /// Copies `block` as a new segment after every previously pushed block.
    /// Empty blocks are ignored.
    pub fn push(&mut self, block: &[u8]) {
        if block.is_empty() {
            return;
        }
        self.dst.append_slice(block);
        self.pushed += block.len() as u64;
        self.blocks += 1;
    }

    pub fn pushed(&self) -> u64 {
        self.pushed
    }

    /// Number of non-empty blocks appended.
    pub fn blocks(&self) -> u64 {
        self.blocks
    }
}
