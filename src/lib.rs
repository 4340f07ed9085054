//! alphamask-rs: decoder and rasterizer for ASVR vector alpha-mask containers.
//!
//! An ASVR file holds one alpha mask per video frame, each stored as a set of
//! polylines. Decoding one frame goes
//!
//! ```text
//! scrypt key -> ChaCha20 block decrypt -> zlib inflate -> record split -> rasterize
//! ```
//!
//! and produces a 1-bit packed [`Mask`]. The plaintext ASVP layout produced by
//! [`convert::write_plain`] is read by the same codec without a key.
//!
//! The container has no integrity protection. A wrong key or damaged bytes only
//! show up as decompression or layout errors, if at all.
//!
//! ```no_run
//! use libalphamask::{MaskDecoder, RenderOptions, SceneMetadata};
//!
//! let scene = SceneMetadata::new(85342, "1.5.0", "pov_mask.asvr");
//! let decoder = MaskDecoder::builder()
//!     .render_options(RenderOptions::new(1920, 1080))
//!     .build_from_path("pov_mask.asvr", Some(&scene))?;
//! let mask = decoder.render(0)?;
//! libalphamask::sink::save_png(&mask, "frame_000000.png")?;
//! # Ok::<(), libalphamask::AsvrError>(())
//! ```

pub mod api;
pub mod config;
pub mod container;
pub mod convert;
pub mod crypto;
pub mod error;
pub mod rasterizer;
pub mod records;
pub mod runtime;
pub mod scheduler;
pub mod sink;
pub mod transport;

#[doc(hidden)]
pub mod testlib;

#[cfg(test)]
mod test_vectors;

pub use api::{CancelFlag, ContainerInfo, FrameOutcome, MaskDecoder, MaskDecoderBuilder, SharedStorage};
pub use config::{DecodeMode, IoPolicy, KdfParams, Passphrase, RenderOptions};
pub use container::{Container, ContainerKind, FrameFault, FramePayload};
pub use convert::ConversionSummary;
pub use crypto::{base_url_from_uri, derive_key, BlockCipher, DerivedKey, SceneMetadata};
pub use error::{AsvrError, Result};
pub use rasterizer::Mask;
pub use records::{decode_polyline, split_records, FrameRecords, Point};
pub use transport::{FileStorage, MemoryStorage, MmapStorage, Storage, TransportError};
