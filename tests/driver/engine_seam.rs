// Driver behaviour against stand-in engines.
//
// Coverage:
//   - context allocation failure → ResourceExhausted, callbacks never invoked
//   - compression-side engine failure → Engine(message), message verbatim
//   - decompression-side codes map to IncompleteStream / CorruptStream / Engine
//   - contexts are dropped on success and on failure
//   - a pass-through engine sees exactly the capped bytes, in order, with
//     reads coalesced across segments

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use zstdmt::engine::{Context, Engine, EngineError, EngineResult, ErrorCode, RdWr};
use zstdmt::{BufferList, Driver, Error, Params};

use crate::common::{pattern_data, segmented};

// ── Stand-in engine ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct Probe {
    created: Arc<AtomicUsize>,
    dropped: Arc<AtomicUsize>,
    reads: Arc<AtomicUsize>,
}

/// Copies input to output in `chunk`-sized reads, then optionally fails.
struct FakeCtx {
    probe: Probe,
    chunk: usize,
    fail_with: Option<ErrorCode>,
    /// Sizes of every non-empty read, for inspection.
    seen: Rc<RefCell<Vec<usize>>>,
    insize: u64,
    outsize: u64,
    frames: u64,
}

impl Drop for FakeCtx {
    fn drop(&mut self) {
        self.probe.dropped.fetch_add(1, Ordering::SeqCst);
    }
}

impl Context for FakeCtx {
    fn run(&mut self, rdwr: &mut RdWr<'_>) -> EngineResult<()> {
        let mut buf = vec![0u8; self.chunk];
        loop {
            self.probe.reads.fetch_add(1, Ordering::SeqCst);
            let n = (rdwr.fn_read)(&mut buf[..])
                .map_err(|e| EngineError::with_detail(ErrorCode::ReadFail, e.to_string()))?;
            if n == 0 {
                break;
            }
            self.seen.borrow_mut().push(n);
            self.insize += n as u64;
            (rdwr.fn_write)(&buf[..n])
                .map_err(|e| EngineError::with_detail(ErrorCode::WriteFail, e.to_string()))?;
            self.outsize += n as u64;
            self.frames += 1;
            if let Some(code) = self.fail_with {
                return Err(EngineError::with_detail(code, "injected"));
            }
        }
        Ok(())
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

struct FakeEngine {
    probe: Probe,
    allocate: bool,
    chunk: usize,
    fail_with: Option<ErrorCode>,
    seen: Rc<RefCell<Vec<usize>>>,
}

impl FakeEngine {
    fn new(chunk: usize) -> Self {
        FakeEngine {
            probe: Probe::default(),
            allocate: true,
            chunk,
            fail_with: None,
            seen: Rc::default(),
        }
    }

    fn ctx(&self) -> Option<FakeCtx> {
        if !self.allocate {
            return None;
        }
        self.probe.created.fetch_add(1, Ordering::SeqCst);
        Some(FakeCtx {
            probe: self.probe.clone(),
            chunk: self.chunk,
            fail_with: self.fail_with,
            seen: Rc::clone(&self.seen),
            insize: 0,
            outsize: 0,
            frames: 0,
        })
    }
}

impl Engine for FakeEngine {
    type CCtx = FakeCtx;
    type DCtx = FakeCtx;

    fn create_cctx(&self, _: usize, _: i32, _: usize, _: bool) -> Option<FakeCtx> {
        self.ctx()
    }

    fn create_dctx(&self, _: usize, _: usize) -> Option<FakeCtx> {
        self.ctx()
    }
}

fn params() -> Params {
    Params::default().with_threads(1)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn allocation_failure_is_resource_exhausted() {
    let mut engine = FakeEngine::new(64);
    engine.allocate = false;
    let probe = engine.probe.clone();
    let driver = Driver::with_engine(engine, params());
    let src = BufferList::from(pattern_data(100));

    let mut dst = BufferList::new();
    let err = driver.compress_into(&mut src.cursor(), &mut dst).unwrap_err();
    assert_eq!(err, Error::ResourceExhausted);
    let err = driver.decompress_into(&mut src.cursor(), 100, &mut dst).unwrap_err();
    assert_eq!(err, Error::ResourceExhausted);

    assert!(dst.is_empty());
    assert_eq!(probe.reads.load(Ordering::SeqCst), 0);
}

#[test]
fn compress_failure_carries_engine_message() {
    let mut engine = FakeEngine::new(16);
    engine.fail_with = Some(ErrorCode::FrameCompress);
    let probe = engine.probe.clone();
    let driver = Driver::with_engine(engine, params());
    let src = BufferList::from(pattern_data(100));
    let err = driver.compress(&mut src.cursor()).unwrap_err();
    assert_eq!(err, Error::Engine("Frame compression error: injected".into()));
    assert_eq!(probe.created.load(Ordering::SeqCst), 1);
    assert_eq!(probe.dropped.load(Ordering::SeqCst), 1);
}

#[test]
fn compress_maps_every_code_to_engine_error() {
    for code in [ErrorCode::DataTruncated, ErrorCode::DataError, ErrorCode::MemoryAllocation] {
        let mut engine = FakeEngine::new(16);
        engine.fail_with = Some(code);
        let driver = Driver::with_engine(engine, params());
        let src = BufferList::from(pattern_data(50));
        let err = driver.compress(&mut src.cursor()).unwrap_err();
        assert!(matches!(err, Error::Engine(_)), "{code:?}: {err:?}");
    }
}

#[test]
fn decompress_failure_classification() {
    let cases = [
        (
            ErrorCode::DataTruncated,
            Error::IncompleteStream("Data truncated: injected".into()),
        ),
        (ErrorCode::DataError, Error::CorruptStream("Data error: injected".into())),
        (
            ErrorCode::FrameDecompress,
            Error::CorruptStream("Frame decompression error: injected".into()),
        ),
        (ErrorCode::WriteFail, Error::Engine("Write failure: injected".into())),
    ];
    for (code, expected) in cases {
        let mut engine = FakeEngine::new(16);
        engine.fail_with = Some(code);
        let driver = Driver::with_engine(engine, params());
        let src = BufferList::from(pattern_data(50));
        let err = driver.decompress(&mut src.cursor(), 50).unwrap_err();
        assert_eq!(err, expected);
    }
}

#[test]
fn partial_output_stays_in_caller_buffer_on_failure() {
    let mut engine = FakeEngine::new(10);
    engine.fail_with = Some(ErrorCode::FrameCompress);
    let driver = Driver::with_engine(engine, params());
    let src = BufferList::from(pattern_data(100));
    let mut dst = BufferList::new();
    assert!(driver.compress_into(&mut src.cursor(), &mut dst).is_err());
    // Whatever was pushed before the failure is left for the caller to drop.
    assert_eq!(dst.len(), 10);
}

#[test]
fn context_dropped_after_success() {
    let engine = FakeEngine::new(32);
    let probe = engine.probe.clone();
    let driver = Driver::with_engine(engine, params());
    let src = BufferList::from(pattern_data(100));
    driver.compress(&mut src.cursor()).unwrap();
    driver.decompress(&mut src.cursor(), 100).unwrap();
    assert_eq!(probe.created.load(Ordering::SeqCst), 2);
    assert_eq!(probe.dropped.load(Ordering::SeqCst), 2);
}

#[test]
fn pass_through_sees_capped_coalesced_input() {
    let engine = FakeEngine::new(100);
    let seen = Rc::clone(&engine.seen);
    let driver = Driver::with_engine(engine, params());
    let data = pattern_data(1000);
    let host = segmented(&data, &[7, 3, 41]);

    let mut c = host.cursor();
    let (out, stats) = driver.decompress(&mut c, 950).unwrap();
    assert_eq!(out.to_vec(), &data[..950]);
    assert_eq!(stats.input_bytes, 950);
    assert_eq!(stats.frames, 10);
    // Every read is full-size except the last, despite tiny segments.
    assert_eq!(*seen.borrow(), [vec![100usize; 9], vec![50]].concat());
    assert_eq!(c.remaining(), 50);
}

#[test]
fn pass_through_compress_reads_until_exhausted() {
    let engine = FakeEngine::new(64);
    let probe = engine.probe.clone();
    let driver = Driver::with_engine(engine, params());
    let data = pattern_data(640);
    let src = segmented(&data, &[5]);
    let mut c = src.cursor();
    let (out, stats) = driver.compress(&mut c).unwrap();
    assert_eq!(out.to_vec(), data);
    assert_eq!(stats.frames, 10);
    assert!(c.is_exhausted());
    // Ten full reads plus the one that signals end of input.
    assert_eq!(probe.reads.load(Ordering::SeqCst), 11);
}
