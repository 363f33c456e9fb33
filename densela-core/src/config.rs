//! Runtime configuration for kernels that may split work across threads.
//!
//! Resolved once per process from the environment:
//!
//! - `DENSELA_NUM_THREADS`: worker count (default: available parallelism)
//! - `DENSELA_PARALLEL_THRESHOLD`: minimum output elements before a kernel
//!   spawns workers (default: 256 * 256)

use std::sync::OnceLock;

/// Thread-splitting policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelConfig {
    /// Upper bound on worker threads per call.
    pub num_threads: usize,
    /// Output size (elements) below which a call stays single-threaded.
    pub parallel_threshold: usize,
}

static GLOBAL: OnceLock<KernelConfig> = OnceLock::new();

impl KernelConfig {
    /// Crossover where thread spawn overhead pays off.
    pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256 * 256;

    pub const NUM_THREADS_VAR: &'static str = "DENSELA_NUM_THREADS";
    pub const THRESHOLD_VAR: &'static str = "DENSELA_PARALLEL_THRESHOLD";

    pub fn new(num_threads: usize, parallel_threshold: usize) -> Self {
        Self {
            num_threads: num_threads.max(1),
            parallel_threshold,
        }
    }

    /// Never spawn workers.
    pub fn single_threaded() -> Self {
        Self::new(1, usize::MAX)
    }

    /// Read the environment, ignoring unparsable or zero values.
    pub fn from_env() -> Self {
        let num_threads = env_usize(Self::NUM_THREADS_VAR)
            .filter(|&n| n > 0)
            .unwrap_or_else(available_threads);
        let parallel_threshold =
            env_usize(Self::THRESHOLD_VAR).unwrap_or(Self::DEFAULT_PARALLEL_THRESHOLD);
        Self::new(num_threads, parallel_threshold)
    }

    /// Process-wide configuration, read from the environment on first use.
    pub fn global() -> &'static KernelConfig {
        GLOBAL.get_or_init(|| {
            let config = Self::from_env();
            tracing::debug!(
                num_threads = config.num_threads,
                parallel_threshold = config.parallel_threshold,
                "kernel configuration resolved"
            );
            config
        })
    }

    /// Workers to use for an output of `work` elements split along `rows`.
    pub fn threads_for(&self, work: usize, rows: usize) -> usize {
        if work <= self.parallel_threshold {
            1
        } else {
            self.num_threads.min(rows).max(1)
        }
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::new(available_threads(), Self::DEFAULT_PARALLEL_THRESHOLD)
    }
}

fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn env_usize(var: &str) -> Option<usize> {
    std::env::var(var).ok()?.trim().parse().ok()
}
