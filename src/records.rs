//! Frame record decoding.
//!
//! An inflated frame payload is
//!
//! ```text
//! u32 LE n | n x u32 LE record_size | record[0] | record[1] | ...
//! ```
//!
//! and each record is one polyline: `u16 LE x0, u16 LE y0` followed by
//! `(i8 dx, i8 dy)` steps.

use crate::config::DecodeMode;
use crate::error::{AsvrError, Result};

/// Absolute pixel coordinate
pub type Point = (i32, i32);

/// A frame payload split into its polyline records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameRecords {
    pub record_sizes: Vec<u32>,
    pub records: Vec<Vec<u8>>,
}

impl FrameRecords {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.records.iter().map(Vec::as_slice)
    }

    /// Decode every record into its point sequence.
    pub fn polylines(&self) -> Vec<Vec<Point>> {
        self.iter().map(decode_polyline).collect()
    }
}

/// Split an inflated payload into records.
///
/// A header that runs past the payload is always an error. When the sizes do
/// not add up to the remaining bytes, strict mode fails; lenient mode logs the
/// mismatch and slices what is there, truncating the record that crosses the
/// end and leaving later ones empty.
pub fn split_records(payload: &[u8], mode: DecodeMode) -> Result<FrameRecords> {
    if payload.len() < 4 {
        return Err(AsvrError::format(format!("Record payload of {} bytes has no header", payload.len())));
    }
    let num_words = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]) as u64;
    let header_end = 4 + num_words * 4;
    if header_end > payload.len() as u64 {
        return Err(AsvrError::format(format!(
            "Record header of {num_words} words exceeds payload of {} bytes",
            payload.len()
        )));
    }
    let header_end = header_end as usize;
    let record_sizes: Vec<u32> = payload[4..header_end]
        .chunks_exact(4)
        .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .collect();

    let body = &payload[header_end..];
    let declared: u64 = record_sizes.iter().map(|&s| s as u64).sum();
    if declared != body.len() as u64 {
        if mode.is_strict() {
            return Err(AsvrError::format(format!(
                "Record sizes sum to {declared} but {} bytes follow the header",
                body.len()
            )));
        }
        tracing::warn!(declared, actual = body.len(), "record sizes do not match payload length");
    }

    let mut records = Vec::with_capacity(record_sizes.len());
    let mut offset = 0usize;
    for &size in &record_sizes {
        let start = offset.min(body.len());
        let end = offset.saturating_add(size as usize).min(body.len());
        records.push(body[start..end].to_vec());
        offset = offset.saturating_add(size as usize);
    }
    Ok(FrameRecords { record_sizes, records })
}

/// Decode one record into absolute points.
///
/// Records shorter than 4 bytes yield no points; a trailing unpaired byte is ignored.
pub fn decode_polyline(record: &[u8]) -> Vec<Point> {
    if record.len() < 4 {
        return vec![];
    }
    let mut x = u16::from_le_bytes([record[0], record[1]]) as i32;
    let mut y = u16::from_le_bytes([record[2], record[3]]) as i32;
    let mut points = Vec::with_capacity(1 + (record.len() - 4) / 2);
    points.push((x, y));
    for step in record[4..].chunks_exact(2) {
        x = x.saturating_add(step[0] as i8 as i32);
        y = y.saturating_add(step[1] as i8 as i32);
        points.push((x, y));
    }
    points
}
