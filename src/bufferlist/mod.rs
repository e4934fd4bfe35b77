//! Segmented byte buffer.
//!
//! A [`BufferList`] is an ordered list of immutable segments whose
//! concatenation is one logical byte stream. Segments are never merged or
//! split once appended; readers walk them with a [`Cursor`].

mod cursor;

pub use cursor::Cursor;

use std::fmt;

/// Ordered sequence of owned byte segments.
///
/// `PartialEq` compares segmentation as well as content; use
/// [`BufferList::to_vec`] to compare logical bytes only.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BufferList {
    segments: Vec<Box<[u8]>>,
    len: usize,
}

impl BufferList {
    pub fn new() -> Self {
        BufferList::default()
    }

    /// Adopts `bytes` as a new trailing segment. Empty input is ignored.
    pub fn append(&mut self, bytes: Vec<u8>) {
        if bytes.is_empty() {
            return;
        }
        self.len += bytes.len();
        self.segments.push(bytes.into_boxed_slice());
    }

    /// Copies `bytes` into a new trailing segment. Empty input is ignored.
    pub fn append_slice(&mut self, bytes: &[u8]) {
        self.append(bytes.to_vec());
    }

    /// Moves every segment of `other` to the end of `self`.
    pub fn claim_append(&mut self, other: &mut BufferList) {
        self.len += other.len;
        self.segments.append(&mut other.segments);
        other.len = 0;
    }

    /// Total logical length in bytes (sum of segment lengths).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Iterates segments in append order.
    pub fn segments(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.segments.iter().map(|s| &s[..])
    }

    /// Returns a cursor positioned at the first byte, with no cap.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(self)
    }

    /// Concatenates all segments into one contiguous vector.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len);
        for seg in &self.segments {
            out.extend_from_slice(seg);
        }
        out
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.len = 0;
    }

    #[inline]
    pub(crate) fn segment(&self, index: usize) -> Option<&[u8]> {
        self.segments.get(index).map(|s| &s[..])
    }
}

impl From<Vec<u8>> for BufferList {
    fn from(bytes: Vec<u8>) -> Self {
        let mut bl = BufferList::new();
        bl.append(bytes);
        bl
    }
}

impl From<&[u8]> for BufferList {
    fn from(bytes: &[u8]) -> Self {
        BufferList::from(bytes.to_vec())
    }
}

impl FromIterator<Vec<u8>> for BufferList {
    fn from_iter<I: IntoIterator<Item = Vec<u8>>>(iter: I) -> Self {
        let mut bl = BufferList::new();
        for seg in iter {
            bl.append(seg);
        }
        bl
    }
}

impl fmt::Debug for BufferList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferList")
            .field("len", &self.len)
            .field("segments", &self.segments.len())
            .finish()
    }
}
