//! Bounded worker pool driving the engine's block pipeline.
//!
//! One context owns one [`WorkerPool`]. Blocks are read on the calling thread,
//! transformed (compressed or decompressed) on the pool's rayon workers, and
//! written back on the calling thread in their original order, enforced by
//! [`WriteRegister`]. The read and write sides are therefore never entered
//! concurrently and need no locking of their own.
//!
//! Finished blocks travel back to the caller over a `crossbeam_channel`, and
//! their input buffers are recycled as staging blocks for later reads.

use std::collections::BTreeMap;

use crossbeam_channel::unbounded;
use log::trace;
use rayon::ThreadPool as RayonPool;

use crate::engine::error::{EngineError, EngineResult, ErrorCode};

// ---------------------------------------------------------------------------
// WriteRegister: ordered release of out-of-order results
// ---------------------------------------------------------------------------

/// Holds finished blocks until every block before them has been written.
struct WriteRegister {
    /// Next block ID expected to be written.
    expected: u64,
    /// Finished blocks indexed by their block ID.
    pending: BTreeMap<u64, Vec<u8>>,
}

impl WriteRegister {
    fn new() -> Self {
        WriteRegister {
            expected: 0,
            pending: BTreeMap::new(),
        }
    }

    fn insert(&mut self, id: u64, data: Vec<u8>) {
        self.pending.insert(id, data);
    }

    /// Writes every pending block that continues the sequence starting at
    /// `expected`; stops at the first gap.
    fn drain_in_order<W>(&mut self, write_fn: &mut W) -> EngineResult<()>
    where
        W: FnMut(&[u8]) -> EngineResult<()>,
    {
        while let Some(entry) = self.pending.first_entry() {
            if *entry.key() != self.expected {
                break;
            }
            let data = entry.remove();
            write_fn(&data)?;
            self.expected += 1;
        }
        Ok(())
    }
}

/// A block returned from a worker, with the buffer it was read into.
struct Finished {
    id: u64,
    result: EngineResult<Vec<u8>>,
    block: Vec<u8>,
}

// ---------------------------------------------------------------------------
// WorkerPool
// ---------------------------------------------------------------------------

/// Fixed-size rayon pool owned by a single engine context.
pub struct WorkerPool {
    pool: RayonPool,
    nb_threads: usize,
}

impl WorkerPool {
    /// Builds a pool of `nb_threads` workers; `None` if `nb_threads` is 0 or
    /// the threads cannot be spawned.
    pub fn new(nb_threads: usize) -> Option<Self> {
        if nb_threads < 1 {
            return None;
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(nb_threads)
            .thread_name(|i| format!("zstdmt-worker-{i}"))
            .build()
            .ok()?;
        Some(WorkerPool { pool, nb_threads })
    }

    pub fn nb_threads(&self) -> usize {
        self.nb_threads
    }

    /// Runs `source → transform → sink` until `source` reports end of input.
    ///
    /// `source` fills the recycled buffer it is given and returns `false`
    /// once there is nothing left. At most `max_in_flight` blocks are held
    /// by workers at any time. `sink` sees results in source order. The first
    /// error from any stage ends the run; blocks already handed to workers
    /// are waited for but their results are dropped.
    pub fn pipeline<S, T, W>(
        &self,
        max_in_flight: usize,
        mut source: S,
        transform: T,
        mut sink: W,
    ) -> EngineResult<()>
    where
        S: FnMut(&mut Vec<u8>) -> EngineResult<bool>,
        T: Fn(&[u8]) -> EngineResult<Vec<u8>> + Sync,
        W: FnMut(&[u8]) -> EngineResult<()>,
    {
        let max_in_flight = max_in_flight.max(1);
        let (done_tx, done_rx) = unbounded::<Finished>();
        let transform = &transform;

        // in_place_scope keeps this closure on the calling thread, so the
        // source and sink never leave it.
        self.pool.in_place_scope(|scope| -> EngineResult<()> {
            let mut register = WriteRegister::new();
            let mut spare: Vec<Vec<u8>> = Vec::with_capacity(max_in_flight);
            let mut next_id: u64 = 0;
            let mut in_flight = 0usize;
            let mut eof = false;

            loop {
                while !eof && in_flight < max_in_flight {
                    let mut block = spare.pop().unwrap_or_default();
                    if !source(&mut block)? {
                        eof = true;
                        break;
                    }
                    let id = next_id;
                    let tx = done_tx.clone();
                    scope.spawn(move |_| {
                        let result = transform(&block);
                        // The receiver outlives the scope; a send cannot fail.
                        let _ = tx.send(Finished { id, result, block });
                    });
                    trace!("block {id} dispatched");
                    next_id += 1;
                    in_flight += 1;
                }
                if in_flight == 0 {
                    break;
                }

                let done = done_rx.recv().map_err(|_| {
                    EngineError::with_detail(ErrorCode::CompressionLibrary, "worker vanished")
                })?;
                in_flight -= 1;
                spare.push(done.block);
                register.insert(done.id, done.result?);
                register.drain_in_order(&mut sink)?;
            }
            Ok(())
        })
    }
}
