//! Conversion to the plaintext-equivalent container.
//!
//! The output keeps everything that is compressed in the source: the sizes
//! table bytes are copied verbatim and every frame block is written decrypted
//! but still zlib-compressed. Only the header changes, to
//! `"ASVPPLN1" | u32 LE frame_count | u32 LE compressed_data_size`.

use std::io::Write;

use crate::config::DecodeMode;
use crate::container::{inflate_frame_block, Container, FrameFault, Header};
use crate::error::{AsvrError, Result};
use crate::transport::Storage;

/// What [`write_plain`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub frames: u32,
    pub bytes_written: u64,
    /// Frames written verbatim despite a fault (lenient mode only).
    pub faults: Vec<(u32, FrameFault)>,
}

impl ConversionSummary {
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Write the plaintext layout of `container` to `out`.
///
/// Each block is test-inflated before it is written. In strict mode the first
/// faulty frame aborts with a format error; in lenient mode the block is
/// written anyway and listed in the summary.
pub fn write_plain<S, W>(container: &Container<S>, mut out: W, mode: DecodeMode) -> Result<ConversionSummary>
where
    S: Storage,
    W: Write,
{
    let frames = container.frame_count();
    let sizes = container.compressed_sizes_table();
    let csize = u32::try_from(sizes.len())
        .map_err(|_| AsvrError::format("Compressed sizes table exceeds u32"))?;

    let mut summary = ConversionSummary { frames, ..Default::default() };
    out.write_all(Header::plain(frames, csize).as_bytes())?;
    out.write_all(sizes)?;
    summary.bytes_written = 16 + sizes.len() as u64;

    for index in 0..frames {
        let block = container.frame_block(index)?;
        if let Err(fault) = inflate_frame_block(&block) {
            if mode.is_strict() {
                return Err(AsvrError::format(format!("Frame {index}: {fault}")));
            }
            tracing::warn!(frame = index, %fault, "writing faulty frame block verbatim");
            summary.faults.push((index, fault));
        }
        out.write_all(&block)?;
        summary.bytes_written += block.len() as u64;
        tracing::debug!(frame = index, len = block.len(), "frame converted");
    }
    out.flush()?;
    tracing::info!(frames, bytes = summary.bytes_written, faults = summary.faults.len(), "conversion finished");
    Ok(summary)
}
