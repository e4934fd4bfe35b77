//! Monotonic read position over a [`BufferList`].

use super::BufferList;

/// Read position over a [`BufferList`], optionally capped to a logical length.
///
/// The cursor only ever hands out borrowed views into the buffer's segments;
/// copying is left to the caller. With a cap set it never yields a byte past
/// the cap, even when the buffer physically holds more data.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    list: &'a BufferList,
    /// Index of the current segment.
    seg: usize,
    /// Offset inside the current segment; may equal its length.
    off: usize,
    /// Logical bytes consumed since the start of the buffer.
    pos: usize,
    /// Bytes still allowed to be yielded, when capped.
    cap: Option<usize>,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(list: &'a BufferList) -> Self {
        Cursor {
            list,
            seg: 0,
            off: 0,
            pos: 0,
            cap: None,
        }
    }

    /// Returns the next contiguous run of at most `max_bytes` and moves past it.
    ///
    /// The run never crosses a segment boundary and never exceeds the cap.
    /// An empty slice means the cursor is exhausted (or `max_bytes` was 0).
    pub fn advance(&mut self, max_bytes: usize) -> &'a [u8] {
        let limit = match self.cap {
            Some(cap) => max_bytes.min(cap),
            None => max_bytes,
        };
        if limit == 0 {
            return &[];
        }

        // Step over finished and empty segments.
        while let Some(seg) = self.list.segment(self.seg) {
            if self.off < seg.len() {
                break;
            }
            self.seg += 1;
            self.off = 0;
        }
        let list: &'a BufferList = self.list;
        let Some(seg) = list.segment(self.seg) else {
            return &[];
        };

        let n = limit.min(seg.len() - self.off);
        let run = &seg[self.off..self.off + n];
        self.off += n;
        self.pos += n;
        if let Some(cap) = self.cap.as_mut() {
            *cap -= n;
        }
        run
    }

    /// Skips up to `n` bytes; returns how many were actually skipped.
    pub fn skip(&mut self, n: usize) -> usize {
        let mut skipped = 0;
        while skipped < n {
            let run = self.advance(n - skipped);
            if run.is_empty() {
                break;
            }
            skipped += run.len();
        }
        skipped
    }

    /// Bytes still yieldable: the physical remainder, bounded by the cap.
    pub fn remaining(&self) -> usize {
        let physical = self.physical_remaining();
        match self.cap {
            Some(cap) => physical.min(cap),
            None => physical,
        }
    }

    /// Bytes left in the buffer regardless of any cap.
    #[inline]
    pub fn physical_remaining(&self) -> usize {
        self.list.len() - self.pos
    }

    /// Logical offset of the cursor from the start of the buffer.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn cap(&self) -> Option<usize> {
        self.cap
    }

    /// Limits the cursor to at most `len` more bytes from its current position.
    pub fn set_cap(&mut self, len: usize) {
        self.cap = Some(len);
    }

    pub fn clear_cap(&mut self) {
        self.cap = None;
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}
