// Async runtime module
// Multi-threaded Tokio runtime owned by the decoder. Rendering is CPU-bound, so
// frame work goes to the blocking pool while the worker threads only schedule.

use tokio::runtime::{Builder, Runtime as TokioRuntime};

/// Builder for a [`Runtime`].
#[derive(Debug, Default)]
pub struct RuntimeBuilder {
    // None or 0: one worker per core
    worker_threads: Option<usize>,
    max_blocking_threads: Option<usize>,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 0 keeps Tokio's default of one worker per core.
    pub fn worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = (threads > 0).then_some(threads);
        self
    }

    /// Upper bound on the blocking pool that runs frame renders.
    pub fn max_blocking_threads(mut self, threads: usize) -> Self {
        self.max_blocking_threads = (threads > 0).then_some(threads);
        self
    }

    pub fn build(self) -> Result<Runtime, std::io::Error> {
        let mut builder = Builder::new_multi_thread();
        if let Some(threads) = self.worker_threads {
            builder.worker_threads(threads);
        }
        if let Some(threads) = self.max_blocking_threads {
            builder.max_blocking_threads(threads);
        }
        builder.thread_name("alphamask-worker").enable_all();
        let runtime = builder.build()?;
        Ok(Runtime { runtime })
    }
}

pub struct Runtime {
    runtime: TokioRuntime,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime").finish_non_exhaustive()
    }
}

impl Runtime {
    /// Run a future to completion, blocking the current thread.
    pub fn block_on<F, T>(&self, future: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        self.runtime.block_on(future)
    }
}
