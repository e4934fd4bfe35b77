#![no_main]
use libfuzzer_sys::fuzz_target;
use zstdmt::{BufferList, Driver, Params};

fuzz_target!(|input: (u8, Vec<u8>)| {
    let (width, data) = input;
    // Split the input into segments of a fuzzer-chosen width.
    let width = usize::from(width).max(1);
    let src: BufferList = data.chunks(width).map(|c| c.to_vec()).collect();

    let driver = Driver::new(Params::default().with_threads(2).with_block_size(1024));
    let (packed, _) = driver
        .compress(&mut src.cursor())
        .expect("compressing in-memory data must not fail");
    let (plain, _) = driver
        .decompress(&mut packed.cursor(), packed.len())
        .expect("self-compressed stream must decompress");

    assert_eq!(plain.to_vec(), data, "segmented round-trip mismatch");
});
