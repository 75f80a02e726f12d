//! Binary envelope for batches of injector records.
//!
//! All values are little-endian. An envelope is a `u32` record count
//! followed by `count` records of [`RECORD_BYTES`] each:
//!
//! ```text
//! [count u32]
//! [offset f32×3] [cell i32] [momentum f32×3] [weight f32] [disp f32×3]   × count
//! ```
//!
//! The count alone (the first [`COUNT_BYTES`]) is what travels in the
//! count phase of the exchange; the full envelope travels in the payload
//! phase from the same send buffer.

use crate::error::TransportError;
use rankhop_core::InjectorRecord;

/// Size of the record-count header.
pub const COUNT_BYTES: usize = 4;

/// Size of one encoded [`InjectorRecord`].
pub const RECORD_BYTES: usize = 44;

/// Bytes needed for an envelope of `count` records.
pub fn envelope_len(count: usize) -> usize {
    COUNT_BYTES + count * RECORD_BYTES
}

// ── Primitive helpers ───────────────────────────────────────────

fn put_f32(out: &mut [u8], at: usize, v: f32) {
    out[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

fn put_i32(out: &mut [u8], at: usize, v: i32) {
    out[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

fn get_f32(bytes: &[u8], at: usize) -> f32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&bytes[at..at + 4]);
    f32::from_le_bytes(b)
}

fn get_i32(bytes: &[u8], at: usize) -> i32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&bytes[at..at + 4]);
    i32::from_le_bytes(b)
}

// ── Records ─────────────────────────────────────────────────────

/// Encode `rec` into the first [`RECORD_BYTES`] of `out`.
///
/// # Panics
///
/// Panics if `out` is shorter than [`RECORD_BYTES`].
pub fn encode_record(rec: &InjectorRecord, out: &mut [u8]) {
    for (k, v) in rec.offset.iter().enumerate() {
        put_f32(out, 4 * k, *v);
    }
    put_i32(out, 12, rec.cell);
    for (k, v) in rec.momentum.iter().enumerate() {
        put_f32(out, 16 + 4 * k, *v);
    }
    put_f32(out, 28, rec.weight);
    for (k, v) in rec.disp.iter().enumerate() {
        put_f32(out, 32 + 4 * k, *v);
    }
}

/// Decode a record from the first [`RECORD_BYTES`] of `bytes`.
///
/// # Panics
///
/// Panics if `bytes` is shorter than [`RECORD_BYTES`].
pub fn decode_record(bytes: &[u8]) -> InjectorRecord {
    InjectorRecord {
        offset: [get_f32(bytes, 0), get_f32(bytes, 4), get_f32(bytes, 8)],
        cell: get_i32(bytes, 12),
        momentum: [get_f32(bytes, 16), get_f32(bytes, 20), get_f32(bytes, 24)],
        weight: get_f32(bytes, 28),
        disp: [get_f32(bytes, 32), get_f32(bytes, 36), get_f32(bytes, 40)],
    }
}

// ── Count header ────────────────────────────────────────────────

/// Read the record count from an envelope header.
pub fn read_count(bytes: &[u8]) -> Result<u32, TransportError> {
    if bytes.len() < COUNT_BYTES {
        return Err(TransportError::MalformedEnvelope {
            detail: format!("header needs {COUNT_BYTES} bytes, got {}", bytes.len()),
        });
    }
    let mut b = [0u8; 4];
    b.copy_from_slice(&bytes[..COUNT_BYTES]);
    Ok(u32::from_le_bytes(b))
}

// ── Envelope writer ─────────────────────────────────────────────

/// Appends records to an envelope in a caller-provided buffer.
///
/// The header is written by [`finish`](Self::finish).
pub struct EnvelopeWriter<'a> {
    buf: &'a mut [u8],
    count: u32,
}

impl<'a> EnvelopeWriter<'a> {
    /// Start an envelope in `buf`.
    pub fn new(buf: &'a mut [u8]) -> Result<Self, TransportError> {
        if buf.len() < COUNT_BYTES {
            return Err(TransportError::MalformedEnvelope {
                detail: format!("buffer of {} bytes cannot hold a header", buf.len()),
            });
        }
        Ok(Self { buf, count: 0 })
    }

    /// Append one record.
    pub fn push(&mut self, rec: &InjectorRecord) -> Result<(), TransportError> {
        let at = envelope_len(self.count as usize);
        if at + RECORD_BYTES > self.buf.len() {
            return Err(TransportError::MalformedEnvelope {
                detail: format!(
                    "record {} does not fit in {} bytes",
                    self.count,
                    self.buf.len()
                ),
            });
        }
        encode_record(rec, &mut self.buf[at..at + RECORD_BYTES]);
        self.count += 1;
        Ok(())
    }

    /// Records appended so far.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Write the header and return the envelope length in bytes.
    pub fn finish(self) -> usize {
        self.buf[..COUNT_BYTES].copy_from_slice(&self.count.to_le_bytes());
        envelope_len(self.count as usize)
    }
}

// ── Envelope reader ─────────────────────────────────────────────

/// Iterates over the records of a received envelope.
#[derive(Clone, Debug)]
pub struct EnvelopeReader<'a> {
    body: &'a [u8],
    remaining: usize,
}

impl<'a> EnvelopeReader<'a> {
    /// Validate the header of `bytes` against its length.
    pub fn new(bytes: &'a [u8]) -> Result<Self, TransportError> {
        let count = read_count(bytes)? as usize;
        let needed = envelope_len(count);
        if bytes.len() < needed {
            return Err(TransportError::MalformedEnvelope {
                detail: format!(
                    "header announces {count} records ({needed} bytes), got {} bytes",
                    bytes.len()
                ),
            });
        }
        Ok(Self {
            body: &bytes[COUNT_BYTES..needed],
            remaining: count,
        })
    }

    /// Records not yet yielded.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Iterator for EnvelopeReader<'_> {
    type Item = InjectorRecord;

    fn next(&mut self) -> Option<InjectorRecord> {
        if self.remaining == 0 {
            return None;
        }
        let (head, tail) = self.body.split_at(RECORD_BYTES);
        self.body = tail;
        self.remaining -= 1;
        Some(decode_record(head))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for EnvelopeReader<'_> {}
