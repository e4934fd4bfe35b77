// params.rs: per-call engine parameters.
//
// Everything the engine needs for one call lives in a plain `Params` value
// owned by the caller, so independent calls never share mutable state.
// `from_env` applies the ZSTDMT_* environment overrides on top of the
// defaults; `validate` is run by the driver before any allocation.

use std::env;
use std::str::FromStr;

use crate::config::{
    BLOCK_SIZE_MAX, BLOCK_SIZE_MIN, LEVEL_DEF, LEVEL_MAX, LEVEL_MIN, THREAD_MAX,
};
use crate::error::{Error, Result};

pub const ENV_THREADS: &str = "ZSTDMT_THREADS";
pub const ENV_LEVEL: &str = "ZSTDMT_LEVEL";
pub const ENV_BLOCKSIZE: &str = "ZSTDMT_BLOCKSIZE";
pub const ENV_NOCRC: &str = "ZSTDMT_NOCRC";

/// Tunables for one compress / decompress call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Params {
    /// Worker threads, 1..=THREAD_MAX. Default: number of logical CPUs.
    pub threads: usize,
    /// zstd compression level, LEVEL_MIN..=LEVEL_MAX. Default: 3.
    pub level: i32,
    /// Input block size in bytes; 0 lets the engine choose. Default: 0.
    pub block_size: usize,
    /// Embed a content checksum in every frame. Default: true.
    pub checksum: bool,
}

/// Returns the default worker count: the logical CPU count, clamped to the
/// engine's range.
pub fn default_threads() -> usize {
    num_cpus::get().clamp(1, THREAD_MAX)
}

impl Default for Params {
    fn default() -> Self {
        Params {
            threads: default_threads(),
            level: LEVEL_DEF,
            block_size: 0,
            checksum: true,
        }
    }
}

fn parse_env<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Configuration(format!("{name}: cannot parse {raw:?}"))),
        Err(_) => Ok(None),
    }
}

impl Params {
    /// Defaults overlaid with `ZSTDMT_THREADS`, `ZSTDMT_LEVEL`,
    /// `ZSTDMT_BLOCKSIZE` and `ZSTDMT_NOCRC` when set. The result is validated.
    pub fn from_env() -> Result<Self> {
        let mut p = Params::default();
        if let Some(threads) = parse_env(ENV_THREADS)? {
            p.threads = threads;
        }
        if let Some(level) = parse_env(ENV_LEVEL)? {
            p.level = level;
        }
        if let Some(block_size) = parse_env(ENV_BLOCKSIZE)? {
            p.block_size = block_size;
        }
        if let Some(nocrc) = parse_env::<u8>(ENV_NOCRC)? {
            p.checksum = nocrc == 0;
        }
        p.validate()?;
        Ok(p)
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_checksum(mut self, checksum: bool) -> Self {
        self.checksum = checksum;
        self
    }

    /// Checks every field against the engine's accepted range.
    pub fn validate(&self) -> Result<()> {
        if !(1..=THREAD_MAX).contains(&self.threads) {
            return Err(Error::Configuration(format!(
                "thread count {} not in 1..={THREAD_MAX}",
                self.threads
            )));
        }
        if !(LEVEL_MIN..=LEVEL_MAX).contains(&self.level) {
            return Err(Error::Configuration(format!(
                "compression level {} not in {LEVEL_MIN}..={LEVEL_MAX}",
                self.level
            )));
        }
        if self.block_size != 0 && !(BLOCK_SIZE_MIN..=BLOCK_SIZE_MAX).contains(&self.block_size) {
            return Err(Error::Configuration(format!(
                "block size {} not in {BLOCK_SIZE_MIN}..={BLOCK_SIZE_MAX}",
                self.block_size
            )));
        }
        Ok(())
    }
}
