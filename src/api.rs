//! API facade module
//!
//! [`MaskDecoder`] ties the pieces together: storage, container codec, record
//! splitting and rasterization, plus a bounded parallel pipeline that renders
//! many frames on the Tokio blocking pool.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::stream::{FuturesUnordered, Stream, StreamExt};

use crate::config::{DecodeMode, IoPolicy, KdfParams, Passphrase, RenderOptions};
use crate::container::{Container, ContainerKind, FramePayload};
use crate::convert::{write_plain, ConversionSummary};
use crate::crypto::{derive_key_with, DerivedKey, SceneMetadata};
use crate::error::{AsvrError, Result};
use crate::rasterizer::{render_frame, Mask};
use crate::records::{split_records, FrameRecords};
use crate::runtime::{Runtime, RuntimeBuilder};
use crate::scheduler::Scheduler;
use crate::transport::{FileStorage, MmapStorage, Storage};

/// Storage shared between the decoder and its worker tasks
pub type SharedStorage = Arc<dyn Storage>;

/// Cooperative cancellation for [`MaskDecoder::render_frames`].
///
/// Clones share one flag. Once set, no further frames are started and the
/// batch returns [`AsvrError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of rendering one frame of a batch.
#[derive(Debug)]
pub struct FrameOutcome {
    pub index: u32,
    pub result: Result<Mask>,
}

/// Sizes and layout of an opened container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerInfo {
    pub kind: ContainerKind,
    pub frame_count: u32,
    pub compressed_data_size: u64,
    pub total_body_size: u64,
    /// `16 + compressed_data_size + total_body_size`
    pub expected_file_size: u64,
    pub actual_file_size: u64,
}

impl ContainerInfo {
    /// True when the file is exactly as long as its tables say.
    pub fn is_exact(&self) -> bool {
        self.expected_file_size == self.actual_file_size
    }
}

/// Builder configuration for [`MaskDecoder`]
#[derive(Debug, Clone)]
pub struct MaskDecoderBuilder {
    runtime_threads: usize, // Default: 0 (one per core), Range: 0-64
    max_in_flight: usize,   // Default: 16, Range: 1-256
    mode: DecodeMode,
    render: RenderOptions,
    passphrase: Passphrase,
    kdf: KdfParams,
    io: IoPolicy,
    use_mmap: bool,
    key: Option<DerivedKey>,
}

impl Default for MaskDecoderBuilder {
    fn default() -> Self {
        Self {
            runtime_threads: 0,
            max_in_flight: 16,
            mode: DecodeMode::Strict,
            render: RenderOptions::default(),
            passphrase: Passphrase::default(),
            kdf: KdfParams::default(),
            io: IoPolicy::default(),
            use_mmap: false,
            key: None,
        }
    }
}

impl MaskDecoderBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn runtime_threads(mut self, threads: usize) -> Self {
        self.runtime_threads = threads.clamp(0, 64);
        self
    }
    pub fn max_in_flight(mut self, tasks: usize) -> Self {
        self.max_in_flight = tasks.clamp(1, 256);
        self
    }
    pub fn mode(mut self, mode: DecodeMode) -> Self {
        self.mode = mode;
        self
    }
    pub fn render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }
    pub fn passphrase(mut self, passphrase: Passphrase) -> Self {
        self.passphrase = passphrase;
        self
    }
    pub fn kdf_params(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }
    pub fn io_policy(mut self, io: IoPolicy) -> Self {
        self.io = io;
        self
    }
    /// Map the file instead of reading it through a locked handle.
    pub fn use_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }
    /// Use an already derived key and skip scrypt.
    pub fn derived_key(mut self, key: DerivedKey) -> Self {
        self.key = Some(key);
        self
    }

    fn build_runtime(&self) -> Result<Runtime> {
        Ok(RuntimeBuilder::new()
            .worker_threads(self.runtime_threads)
            .max_blocking_threads(self.max_in_flight)
            .build()?)
    }

    /// Open a container file. `scene` is only needed when the file is encrypted
    /// and no key was supplied.
    pub fn build_from_path(self, path: impl AsRef<Path>, scene: Option<&SceneMetadata>) -> Result<MaskDecoder> {
        let runtime = self.build_runtime()?;
        let path = path.as_ref();
        let storage: SharedStorage = if self.use_mmap {
            Arc::new(MmapStorage::open(path)?)
        } else {
            Arc::new(runtime.block_on(FileStorage::open_with_timeout(path, self.io))?)
        };
        tracing::debug!(path = %path.display(), mmap = self.use_mmap, "storage opened");
        self.finish(storage, scene, runtime)
    }

    pub fn build_from_storage(self, storage: SharedStorage, scene: Option<&SceneMetadata>) -> Result<MaskDecoder> {
        let runtime = self.build_runtime()?;
        self.finish(storage, scene, runtime)
    }

    fn finish(self, storage: SharedStorage, scene: Option<&SceneMetadata>, runtime: Runtime) -> Result<MaskDecoder> {
        let key = self.key;
        let (passphrase, kdf) = (self.passphrase, self.kdf);
        let container = Container::open_auto(storage, || match (key, scene) {
            (Some(key), _) => Ok(key),
            (None, Some(meta)) => derive_key_with(&passphrase, &kdf, meta),
            (None, None) => Err(AsvrError::MissingKeyMaterial(
                "encrypted container needs scene id, version and base url".into(),
            )),
        })?;
        Ok(MaskDecoder {
            container: Arc::new(container),
            mode: self.mode,
            render: self.render,
            max_in_flight: self.max_in_flight,
            runtime,
        })
    }
}

/// Decoder for one opened container.
///
/// Owns a Tokio runtime; drop it outside of any async context.
pub struct MaskDecoder {
    container: Arc<Container<SharedStorage>>,
    mode: DecodeMode,
    render: RenderOptions,
    max_in_flight: usize,
    runtime: Runtime,
}

impl std::fmt::Debug for MaskDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaskDecoder")
            .field("container", &self.container)
            .field("mode", &self.mode)
            .field("render", &self.render)
            .field("max_in_flight", &self.max_in_flight)
            .finish()
    }
}

fn records_from(container: &Container<SharedStorage>, index: u32, mode: DecodeMode) -> Result<FrameRecords> {
    match container.get_frame(index, mode)? {
        FramePayload::Decoded(payload) => split_records(&payload, mode),
        // lenient: there is nothing to split, the frame is reported as failed
        FramePayload::Raw { fault, .. } => Err(AsvrError::format(format!("Frame {index}: {fault}"))),
    }
}

fn render_from(
    container: &Container<SharedStorage>,
    index: u32,
    mode: DecodeMode,
    options: &RenderOptions,
) -> Result<Mask> {
    let records = records_from(container, index, mode)?;
    let mask = render_frame(records.iter(), options.width, options.height, options.fill);
    tracing::debug!(frame = index, records = records.len(), set = mask.count_set(), "frame rendered");
    Ok(mask)
}

impl MaskDecoder {
    pub fn builder() -> MaskDecoderBuilder {
        MaskDecoderBuilder::new()
    }

    pub fn container(&self) -> &Container<SharedStorage> {
        &self.container
    }

    pub fn frame_count(&self) -> u32 {
        self.container.frame_count()
    }

    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    pub fn render_options(&self) -> RenderOptions {
        self.render
    }

    pub fn info(&self) -> ContainerInfo {
        ContainerInfo {
            kind: self.container.kind(),
            frame_count: self.container.frame_count(),
            compressed_data_size: self.container.compressed_data_size(),
            total_body_size: self.container.total_body_size(),
            expected_file_size: self.container.total_file_size(),
            actual_file_size: self.container.storage().len(),
        }
    }

    /// Decrypted, inflated frame payload under the decoder's mode.
    pub fn frame_payload(&self, index: u32) -> Result<FramePayload> {
        self.container.get_frame(index, self.mode)
    }

    pub fn frame_records(&self, index: u32) -> Result<FrameRecords> {
        records_from(&self.container, index, self.mode)
    }

    /// Render one frame with the configured options.
    pub fn render(&self, index: u32) -> Result<Mask> {
        self.render_with(index, &self.render)
    }

    pub fn render_with(&self, index: u32, options: &RenderOptions) -> Result<Mask> {
        render_from(&self.container, index, self.mode, options)
    }

    /// Render a batch of frames in parallel, blocking until it finishes.
    ///
    /// Must not be called from inside an async context; use
    /// [`render_frames_async`](Self::render_frames_async) there.
    pub fn render_frames(&self, indices: &[u32], cancel: &CancelFlag) -> Result<Vec<FrameOutcome>> {
        self.runtime.block_on(self.render_frames_async(indices, cancel))
    }

    /// Render a batch on the current runtime's blocking pool.
    ///
    /// At most `max_in_flight` frames run at once. Outcomes come back sorted by
    /// frame index. In strict mode the first failure ends the batch and is
    /// returned; in lenient mode every frame reports its own result. Renders
    /// already running when the batch stops are awaited before returning.
    #[tracing::instrument(level = "debug", skip_all, fields(frames = indices.len()))]
    pub async fn render_frames_async(&self, indices: &[u32], cancel: &CancelFlag) -> Result<Vec<FrameOutcome>> {
        let mut scheduler = Scheduler::from_indices(indices.iter().copied(), self.max_in_flight);
        let mut in_flight = FuturesUnordered::new();
        let mut outcomes = Vec::with_capacity(indices.len());
        // set when the batch ends early; queued blocking tasks then skip their render
        let stop = CancelFlag::new();

        loop {
            if cancel.is_cancelled() {
                let dropped = scheduler.clear_pending();
                stop.cancel();
                let abandoned = drain_in_flight(&mut in_flight, &mut scheduler).await;
                tracing::warn!(dropped, abandoned, "render batch cancelled");
                return Err(AsvrError::Cancelled);
            }
            while let Some(task) = scheduler.next_task() {
                let index = task.frame_index;
                let container = Arc::clone(&self.container);
                let (mode, options) = (self.mode, self.render);
                let (cancel, stop) = (cancel.clone(), stop.clone());
                in_flight.push(async move {
                    let joined = tokio::task::spawn_blocking(move || {
                        if cancel.is_cancelled() || stop.is_cancelled() {
                            return Err(AsvrError::Cancelled);
                        }
                        render_from(&container, index, mode, &options)
                    })
                    .await;
                    (index, joined)
                });
            }

            let Some((index, joined)) = in_flight.next().await else {
                break;
            };
            scheduler.complete_task();
            let result = joined.map_err(|e| AsvrError::Worker(e.to_string())).and_then(|r| r);
            match result {
                // the flag is checked again at the top of the loop
                Err(AsvrError::Cancelled) => continue,
                Err(err) if self.mode.is_strict() => {
                    let dropped = scheduler.clear_pending();
                    stop.cancel();
                    let abandoned = drain_in_flight(&mut in_flight, &mut scheduler).await;
                    tracing::error!(frame = index, error = %err, dropped, abandoned, "frame failed, stopping batch");
                    return Err(err);
                }
                result => {
                    if let Err(err) = &result {
                        tracing::warn!(frame = index, error = %err, "frame failed");
                    }
                    outcomes.push(FrameOutcome { index, result });
                }
            }
        }

        outcomes.sort_by_key(|o| o.index);
        Ok(outcomes)
    }

    /// Write the plaintext-equivalent container to `out`.
    pub fn convert_to_plain<W: std::io::Write>(&self, out: W) -> Result<ConversionSummary> {
        write_plain(&self.container, out, self.mode)
    }
}

/// Await every render still in flight, releasing its scheduler slot.
/// Returns how many results were discarded.
async fn drain_in_flight<S>(in_flight: &mut S, scheduler: &mut Scheduler) -> usize
where
    S: Stream + Unpin,
{
    let mut abandoned = 0;
    while in_flight.next().await.is_some() {
        scheduler.complete_task();
        abandoned += 1;
    }
    abandoned
}
