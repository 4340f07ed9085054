//! Container codec for ASVR (encrypted) and ASVP (plaintext) mask containers.
//!
//! Both layouts share one shape:
//!
//! ```text
//! [0:16)               header, bytes 12..16 = compressed_data_size (u32 LE)
//! [16:16+csize)        zlib(sizes table: u64 LE per frame)
//! [16+csize:EOF)       frame blocks, back to back, in frame order
//! ```
//!
//! In ASVR the header and sizes table form one keystream run under block id
//! `0xFFFFFFFF`, and frame `i` is keyed with block id `i`. A frame block is
//! `u32 LE expected_len || zlib(payload)` once decrypted.

use std::io::Read;

use bytes::Bytes;
use flate2::read::ZlibDecoder;

use crate::config::DecodeMode;
use crate::crypto::{BlockCipher, DerivedKey, HEADER_BLOCK_ID};
use crate::error::{AsvrError, Result};
use crate::transport::Storage;

/// Size of the fixed header in bytes
pub const HEADER_SIZE: u64 = 16;

/// First 8 bytes of a plaintext container: magic "ASVP" + version tag "PLN1"
pub const PLAIN_MAGIC: &[u8; 8] = b"ASVPPLN1";

/// Format tag found in the first word of official 1.5.0 ASVR headers
pub const ASVR_FORMAT_TAG: u32 = 4;

/// Upper bound on the buffer reserved up front from a frame's length prefix
const MAX_INFLATE_RESERVE: u64 = 1 << 20;

/// Decompress zlib data
pub(crate) fn decompress_zlib(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;
    Ok(decompressed)
}

/// Compress data using zlib
pub(crate) fn compress_zlib(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::{write::ZlibEncoder, Compression};
    use std::io::Write;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

fn read_u32_le(bytes: &[u8], at: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[at..at + 4]);
    u32::from_le_bytes(word)
}

/// Which of the two layouts a container uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Encrypted,
    Plain,
}

impl ContainerKind {
    /// Plaintext containers start with [`PLAIN_MAGIC`]; anything else is treated as encrypted.
    pub fn detect<S: Storage + ?Sized>(storage: &S) -> Result<Self> {
        if storage.len() < PLAIN_MAGIC.len() as u64 {
            return Err(AsvrError::format("Container shorter than its header"));
        }
        let head = storage.read_range(0, PLAIN_MAGIC.len() as u64)?;
        Ok(if &head[..] == PLAIN_MAGIC { ContainerKind::Plain } else { ContainerKind::Encrypted })
    }
}

/// The 16-byte header, already decrypted for ASVR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    raw: [u8; 16],
}

impl Header {
    pub fn from_bytes(raw: [u8; 16]) -> Self {
        Self { raw }
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.raw
    }

    /// First word; 4 in ASVR 1.5.0 files. Not validated.
    pub fn format_tag(&self) -> u32 {
        read_u32_le(&self.raw, 0)
    }

    /// Bytes 8..12: sizes table entry count (plaintext layout only).
    pub fn entry_count(&self) -> u32 {
        read_u32_le(&self.raw, 8)
    }

    pub fn compressed_data_size(&self) -> u32 {
        read_u32_le(&self.raw, 12)
    }

    pub fn has_plain_magic(&self) -> bool {
        &self.raw[0..8] == PLAIN_MAGIC
    }

    /// Header of the plaintext-equivalent container.
    pub fn plain(entry_count: u32, compressed_data_size: u32) -> Self {
        let mut raw = [0u8; 16];
        raw[0..8].copy_from_slice(PLAIN_MAGIC);
        raw[8..12].copy_from_slice(&entry_count.to_le_bytes());
        raw[12..16].copy_from_slice(&compressed_data_size.to_le_bytes());
        Self { raw }
    }
}

/// Per-frame block sizes and their prefix sums (offsets relative to the body).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SizesTable {
    sizes: Vec<u64>,
    offsets: Vec<u64>,
    total: u64,
}

impl SizesTable {
    /// Parse the decompressed table: one u64 LE per frame.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        if raw.len() % 8 != 0 {
            return Err(AsvrError::format(format!(
                "Sizes table length {} not multiple of 8",
                raw.len()
            )));
        }
        let mut sizes = Vec::with_capacity(raw.len() / 8);
        let mut offsets = Vec::with_capacity(raw.len() / 8);
        let mut offset = 0u64;
        for chunk in raw.chunks_exact(8) {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            let size = u64::from_le_bytes(word);
            sizes.push(size);
            offsets.push(offset);
            offset = offset
                .checked_add(size)
                .ok_or_else(|| AsvrError::format("Sizes table total overflows u64"))?;
        }
        Ok(Self { sizes, offsets, total: offset })
    }

    pub fn from_sizes(sizes: &[u64]) -> Result<Self> {
        let raw: Vec<u8> = sizes.iter().flat_map(|s| s.to_le_bytes()).collect();
        Self::parse(&raw)
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn sizes(&self) -> &[u64] {
        &self.sizes
    }

    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// Σ frame_size
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.sizes.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}

/// Why a frame block could not be turned into a record payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameFault {
    /// Block shorter than its 4-byte length prefix.
    TooShort { len: usize },
    /// The zlib stream after the prefix is invalid.
    Inflate(String),
    /// Inflated length disagrees with the prefix.
    LengthMismatch { expected: u64, actual: u64 },
}

impl std::fmt::Display for FrameFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameFault::TooShort { len } => write!(f, "block of {len} bytes is shorter than its length prefix"),
            FrameFault::Inflate(msg) => write!(f, "zlib decompression failed: {msg}"),
            FrameFault::LengthMismatch { expected, actual } => {
                write!(f, "decompressed length {actual} != expected {expected}")
            }
        }
    }
}

/// Result of decoding one frame block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramePayload {
    /// Inflated record payload, ready for [`crate::records::split_records`].
    Decoded(Vec<u8>),
    /// Lenient fallback: the decrypted block before decompression.
    Raw { plaintext: Vec<u8>, fault: FrameFault },
}

impl FramePayload {
    pub fn is_decoded(&self) -> bool {
        matches!(self, FramePayload::Decoded(_))
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            FramePayload::Decoded(bytes) => bytes,
            FramePayload::Raw { plaintext, .. } => plaintext,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            FramePayload::Decoded(bytes) => bytes,
            FramePayload::Raw { plaintext, .. } => plaintext,
        }
    }

    pub fn fault(&self) -> Option<&FrameFault> {
        match self {
            FramePayload::Decoded(_) => None,
            FramePayload::Raw { fault, .. } => Some(fault),
        }
    }
}

/// Inflate a plaintext frame block (`u32 LE expected_len || zlib`).
///
/// At most `expected_len + 1` bytes are buffered; a longer stream is only counted.
pub fn inflate_frame_block(block: &[u8]) -> std::result::Result<Vec<u8>, FrameFault> {
    if block.len() < 4 {
        return Err(FrameFault::TooShort { len: block.len() });
    }
    let expected = read_u32_le(block, 0) as u64;
    let mut decoder = ZlibDecoder::new(&block[4..]);
    // the prefix is untrusted until the stream agrees with it
    let reserve = expected.min(block.len() as u64 * 8).min(MAX_INFLATE_RESERVE);
    let mut decompressed = Vec::with_capacity(reserve as usize);
    (&mut decoder)
        .take(expected + 1)
        .read_to_end(&mut decompressed)
        .map_err(|e| FrameFault::Inflate(e.to_string()))?;
    if decompressed.len() as u64 != expected {
        let mut actual = decompressed.len() as u64;
        if actual > expected {
            actual += std::io::copy(&mut decoder, &mut std::io::sink())
                .map_err(|e| FrameFault::Inflate(e.to_string()))?;
        }
        return Err(FrameFault::LengthMismatch { expected, actual });
    }
    Ok(decompressed)
}

/// Random access to the frames of one container.
///
/// Frame blocks are read from storage on demand; nothing beyond the header and
/// the sizes table is kept resident.
pub struct Container<S: Storage> {
    storage: S,
    kind: ContainerKind,
    key: Option<DerivedKey>,
    header: Header,
    compressed_sizes: Vec<u8>,
    table: SizesTable,
}

impl<S: Storage> std::fmt::Debug for Container<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("kind", &self.kind)
            .field("frame_count", &self.table.len())
            .field("compressed_data_size", &self.compressed_sizes.len())
            .field("storage_len", &self.storage.len())
            .finish()
    }
}

impl<S: Storage> Container<S> {
    /// Open an encrypted ASVR container.
    #[tracing::instrument(level = "debug", skip_all, fields(len = storage.len()))]
    pub fn open(storage: S, key: &DerivedKey) -> Result<Self> {
        if storage.len() < HEADER_SIZE {
            return Err(AsvrError::format("Container shorter than its header"));
        }
        let mut header_bytes = [0u8; 16];
        header_bytes.copy_from_slice(&storage.read_range(0, HEADER_SIZE)?);
        BlockCipher::apply_in_place(&mut header_bytes, key, HEADER_BLOCK_ID);
        let header = Header::from_bytes(header_bytes);
        if header.format_tag() != ASVR_FORMAT_TAG {
            tracing::warn!(tag = header.format_tag(), "unexpected ASVR format tag");
        }

        // The keystream runs on from the header into the sizes table, so both are decrypted together.
        let csize = header.compressed_data_size() as u64;
        let region_len = Self::sizes_region_end(&storage, csize)?;
        let mut region = storage.read_range(0, region_len)?.to_vec();
        BlockCipher::apply_in_place(&mut region, key, HEADER_BLOCK_ID);
        let compressed_sizes = region.split_off(HEADER_SIZE as usize);

        Self::finish_open(storage, ContainerKind::Encrypted, Some(*key), header, compressed_sizes)
    }

    /// Open a plaintext ASVP container.
    #[tracing::instrument(level = "debug", skip_all, fields(len = storage.len()))]
    pub fn open_plain(storage: S) -> Result<Self> {
        if storage.len() < HEADER_SIZE {
            return Err(AsvrError::format("Container shorter than its header"));
        }
        let mut header_bytes = [0u8; 16];
        header_bytes.copy_from_slice(&storage.read_range(0, HEADER_SIZE)?);
        let header = Header::from_bytes(header_bytes);
        if !header.has_plain_magic() {
            tracing::warn!(magic = ?&header_bytes[0..8], "ASVP header magic is not 'ASVPPLN1'");
        }
        let csize = header.compressed_data_size() as u64;
        let region_end = Self::sizes_region_end(&storage, csize)?;
        let compressed_sizes = storage.read_range(HEADER_SIZE, region_end - HEADER_SIZE)?.to_vec();

        let container = Self::finish_open(storage, ContainerKind::Plain, None, header, compressed_sizes)?;
        if header.entry_count() as usize != container.frame_count() as usize {
            return Err(AsvrError::format(format!(
                "Header announces {} frames but sizes table holds {}",
                header.entry_count(),
                container.frame_count()
            )));
        }
        Ok(container)
    }

    /// Detect the layout and open accordingly. `key` is only invoked for encrypted containers.
    pub fn open_auto<F>(storage: S, key: F) -> Result<Self>
    where
        F: FnOnce() -> Result<DerivedKey>,
    {
        match ContainerKind::detect(&storage)? {
            ContainerKind::Plain => Self::open_plain(storage),
            ContainerKind::Encrypted => {
                let key = key()?;
                Self::open(storage, &key)
            }
        }
    }

    fn sizes_region_end(storage: &S, csize: u64) -> Result<u64> {
        let end = HEADER_SIZE + csize;
        if end > storage.len() {
            return Err(AsvrError::format(format!(
                "Truncated container: sizes table needs {} bytes, container has {}",
                end,
                storage.len()
            )));
        }
        Ok(end)
    }

    fn finish_open(
        storage: S,
        kind: ContainerKind,
        key: Option<DerivedKey>,
        header: Header,
        compressed_sizes: Vec<u8>,
    ) -> Result<Self> {
        let sizes_raw = decompress_zlib(&compressed_sizes)
            .map_err(|e| AsvrError::format(format!("Sizes table is not a valid zlib stream: {e}")))?;
        let table = SizesTable::parse(&sizes_raw)?;
        if table.len() as u64 >= HEADER_BLOCK_ID as u64 {
            return Err(AsvrError::format("Frame count collides with the header block id"));
        }

        let container = Self { storage, kind, key, header, compressed_sizes, table };
        let expected = container.total_file_size();
        let actual = container.storage.len();
        if actual < expected {
            return Err(AsvrError::format(format!(
                "Truncated container: expected {expected} bytes, found {actual}"
            )));
        }
        if actual > expected {
            tracing::warn!(expected, actual, "container has trailing bytes after the last frame");
        }
        tracing::info!(
            kind = ?container.kind,
            frames = container.frame_count(),
            compressed_data_size = container.compressed_sizes.len(),
            "opened container"
        );
        Ok(container)
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn frame_count(&self) -> u32 {
        self.table.len() as u32
    }

    pub fn sizes(&self) -> &SizesTable {
        &self.table
    }

    pub fn frame_sizes(&self) -> &[u64] {
        self.table.sizes()
    }

    /// Offsets relative to the start of the body.
    pub fn frame_offsets(&self) -> &[u64] {
        self.table.offsets()
    }

    pub fn compressed_data_size(&self) -> u64 {
        self.compressed_sizes.len() as u64
    }

    /// The zlib sizes table exactly as stored (decrypted for ASVR).
    pub fn compressed_sizes_table(&self) -> &[u8] {
        &self.compressed_sizes
    }

    /// Absolute file offset of frame 0.
    pub fn body_base(&self) -> u64 {
        HEADER_SIZE + self.compressed_data_size()
    }

    pub fn total_body_size(&self) -> u64 {
        self.table.total()
    }

    /// `16 + compressed_data_size + Σ frame_size`
    pub fn total_file_size(&self) -> u64 {
        self.body_base() + self.total_body_size()
    }

    fn check_index(&self, index: u32) -> Result<usize> {
        if index >= self.frame_count() {
            return Err(AsvrError::FrameOutOfRange { index: index as u64, count: self.frame_count() });
        }
        Ok(index as usize)
    }

    /// Frame block exactly as stored (ciphertext for ASVR).
    pub fn frame_ciphertext(&self, index: u32) -> Result<Bytes> {
        let i = self.check_index(index)?;
        let offset = self.body_base() + self.table.offsets()[i];
        let len = self.table.sizes()[i];
        if offset.saturating_add(len) > self.storage.len() {
            return Err(AsvrError::ByteRange { offset, len, available: self.storage.len() });
        }
        Ok(self.storage.read_range(offset, len)?)
    }

    /// Frame block after decryption: length prefix + zlib stream.
    pub fn frame_block(&self, index: u32) -> Result<Vec<u8>> {
        let stored = self.frame_ciphertext(index)?;
        let mut block = stored.to_vec();
        if let Some(key) = &self.key {
            BlockCipher::apply_in_place(&mut block, key, index);
        }
        Ok(block)
    }

    /// Decrypt and inflate one frame.
    ///
    /// Strict mode turns a [`FrameFault`] into a format error; lenient mode
    /// returns the decrypted block as [`FramePayload::Raw`].
    pub fn get_frame(&self, index: u32, mode: DecodeMode) -> Result<FramePayload> {
        let block = self.frame_block(index)?;
        match inflate_frame_block(&block) {
            Ok(payload) => {
                tracing::debug!(frame = index, len = payload.len(), "frame decoded");
                Ok(FramePayload::Decoded(payload))
            }
            Err(fault) if mode.is_strict() => Err(AsvrError::format(format!("Frame {index}: {fault}"))),
            Err(fault) => {
                tracing::warn!(frame = index, %fault, "frame decompression failed, returning plaintext block");
                Ok(FramePayload::Raw { plaintext: block, fault })
            }
        }
    }
}
