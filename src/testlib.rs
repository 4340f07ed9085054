//! Test utilities for alphamask-rs
// Builders for synthetic ASVR/ASVP containers and their payloads. Shared by the
// unit tests, the integration tests and the benchmark.

use std::io::Write;

use tempfile::NamedTempFile;

use crate::container::{compress_zlib, Header, ASVR_FORMAT_TAG};
use crate::crypto::{BlockCipher, DerivedKey, HEADER_BLOCK_ID};
use crate::records::Point;

/// Encode points as one record: absolute u16 start, then i8 deltas.
///
/// Panics if the start does not fit u16 or a step does not fit i8.
pub fn encode_polyline(points: &[Point]) -> Vec<u8> {
    let Some(&(x0, y0)) = points.first() else {
        return vec![];
    };
    let mut record = Vec::with_capacity(4 + 2 * points.len());
    record.extend_from_slice(&u16::try_from(x0).expect("x0 fits u16").to_le_bytes());
    record.extend_from_slice(&u16::try_from(y0).expect("y0 fits u16").to_le_bytes());
    for pair in points.windows(2) {
        let dx = i8::try_from(pair[1].0 - pair[0].0).expect("dx fits i8");
        let dy = i8::try_from(pair[1].1 - pair[0].1).expect("dy fits i8");
        record.push(dx as u8);
        record.push(dy as u8);
    }
    record
}

/// `u32 n | n x u32 size | records`
pub fn encode_frame_payload(records: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&(records.len() as u32).to_le_bytes());
    for record in records {
        payload.extend_from_slice(&(record.len() as u32).to_le_bytes());
    }
    for record in records {
        payload.extend_from_slice(record);
    }
    payload
}

/// Plaintext frame block: `u32 LE len(payload) || zlib(payload)`.
pub fn frame_block(payload: &[u8]) -> Vec<u8> {
    let mut block = (payload.len() as u32).to_le_bytes().to_vec();
    block.extend_from_slice(&compress_zlib(payload).expect("in-memory zlib"));
    block
}

fn compressed_sizes(blocks: &[Vec<u8>]) -> Vec<u8> {
    let raw: Vec<u8> = blocks.iter().flat_map(|b| (b.len() as u64).to_le_bytes()).collect();
    compress_zlib(&raw).expect("in-memory zlib")
}

/// Encrypted container around already-built plaintext frame blocks.
pub fn build_encrypted_container_from_blocks(key: &DerivedKey, blocks: &[Vec<u8>]) -> Vec<u8> {
    let sizes = compressed_sizes(blocks);
    let mut head = Vec::with_capacity(16 + sizes.len());
    head.extend_from_slice(&ASVR_FORMAT_TAG.to_le_bytes());
    head.extend_from_slice(&[0u8; 8]);
    head.extend_from_slice(&(sizes.len() as u32).to_le_bytes());
    head.extend_from_slice(&sizes);

    let mut out = BlockCipher::encrypt(&head, key, HEADER_BLOCK_ID);
    for (i, block) in blocks.iter().enumerate() {
        out.extend_from_slice(&BlockCipher::encrypt(block, key, i as u32));
    }
    out
}

/// Encrypted ASVR container holding the given record payloads.
pub fn build_encrypted_container(key: &DerivedKey, payloads: &[Vec<u8>]) -> Vec<u8> {
    let blocks: Vec<Vec<u8>> = payloads.iter().map(|p| frame_block(p)).collect();
    build_encrypted_container_from_blocks(key, &blocks)
}

/// Plaintext ASVP container holding the given record payloads.
pub fn build_plain_container(payloads: &[Vec<u8>]) -> Vec<u8> {
    let blocks: Vec<Vec<u8>> = payloads.iter().map(|p| frame_block(p)).collect();
    let sizes = compressed_sizes(&blocks);
    let mut out = Header::plain(blocks.len() as u32, sizes.len() as u32).as_bytes().to_vec();
    out.extend_from_slice(&sizes);
    for block in &blocks {
        out.extend_from_slice(block);
    }
    out
}

/// Frame payloads of closed squares, one square per frame shifted by its index.
pub fn square_payloads(frames: usize, side: i32) -> Vec<Vec<u8>> {
    (0..frames)
        .map(|i| {
            let o = (i % 64) as i32;
            let square = encode_polyline(&[(o, o), (o + side, o), (o + side, o + side), (o, o + side), (o, o)]);
            encode_frame_payload(&[square])
        })
        .collect()
}

/// Write container bytes to a temp file.
pub fn write_temp_container(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(bytes).expect("write temp container");
    file.flush().expect("flush temp container");
    file
}
