#![no_main]
use libfuzzer_sys::fuzz_target;
use zstdmt::{BufferList, Driver, Error, Params};

fuzz_target!(|data: &[u8]| {
    // Arbitrary input may be rejected, but only as a bad or short stream and
    // never by panicking.
    let src = BufferList::from(data);
    let driver = Driver::new(Params::default().with_threads(1));
    match driver.decompress(&mut src.cursor(), src.len()) {
        Ok(_) | Err(Error::CorruptStream(_)) | Err(Error::IncompleteStream(_)) => {}
        Err(other) => panic!("unexpected error class: {other:?}"),
    }
});
