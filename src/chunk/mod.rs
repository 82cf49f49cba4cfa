//! Chunks: the unit of BMT hashing.
//!
//! A [`Chunk`] pairs an 8-byte little-endian span with a payload of at most
//! 4096 bytes, kept zero-padded at its full width. The same representation
//! serves both flavors of chunk:
//!
//! - **leaf chunk** — payload is a slice of the original input,
//! - **intermediate chunk** — payload is the concatenation of 2–128 child
//!   chunk addresses.
//!
//! The distinction lives in how the payload was populated, not in the type.
//! A chunk's address is `keccak256(span ‖ bmt_root(padded payload))` and is
//! computed at most once; the cache travels with clones, so the carrier
//! chunk of a file tree can appear on several levels without re-hashing.

pub mod bmt;

use core::fmt;

use once_cell::sync::OnceCell;

use crate::error::{BmtError, Result};
use crate::hash::keccak256_many;
use crate::span::make_span;
use crate::{Address, Segment, CHUNK_BMT_LEVELS, CHUNK_PAYLOAD_SIZE, SEGMENT_SIZE, SPAN_SIZE};

use bmt::ChunkBmt;

/// An immutable span + payload record with a lazily derived address.
#[derive(Clone)]
pub struct Chunk {
    /// Payload at its padded width; bytes past `len` are zero.
    data: Box<[u8; CHUNK_PAYLOAD_SIZE]>,
    /// True (unpadded) payload length.
    len: usize,
    /// Original-payload bytes subsumed by this chunk.
    span: u64,
    address: OnceCell<Address>,
}

impl Chunk {
    /// Build a chunk over `payload`, with `span = payload.len()`.
    ///
    /// Fails with [`BmtError::PayloadTooLargeForChunk`] past 4096 bytes.
    pub fn new(payload: &[u8]) -> Result<Self> {
        Self::with_span(payload, payload.len() as u64)
    }

    /// Build a chunk over `payload` with an explicit span.
    ///
    /// Intermediate chunks use this: their payload is a run of child
    /// addresses while their span is the sum of the children's spans.
    pub fn with_span(payload: &[u8], span: u64) -> Result<Self> {
        if payload.len() > CHUNK_PAYLOAD_SIZE {
            return Err(BmtError::PayloadTooLargeForChunk {
                got: payload.len(),
                max: CHUNK_PAYLOAD_SIZE,
            });
        }
        Ok(Self::from_parts(payload, span))
    }

    /// Infallible constructor for payloads already known to fit.
    pub(crate) fn from_parts(payload: &[u8], span: u64) -> Self {
        debug_assert!(payload.len() <= CHUNK_PAYLOAD_SIZE);
        let mut data = Box::new([0u8; CHUNK_PAYLOAD_SIZE]);
        data[..payload.len()].copy_from_slice(payload);
        Self { data, len: payload.len(), span, address: OnceCell::new() }
    }

    /// The payload at its padded 4096-byte width.
    #[inline]
    pub fn data(&self) -> &[u8; CHUNK_PAYLOAD_SIZE] {
        &self.data
    }

    /// The unpadded payload.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Span as a byte count.
    #[inline]
    pub fn span(&self) -> u64 {
        self.span
    }

    /// Span in its 8-byte little-endian wire form.
    #[inline]
    pub fn span_bytes(&self) -> [u8; SPAN_SIZE] {
        make_span(self.span)
    }

    /// The chunk address: `keccak256(span ‖ bmt_root(payload))`.
    ///
    /// Hashed on first call, then served from the cache.
    pub fn address(&self) -> Address {
        *self.address.get_or_init(|| {
            let root = bmt::bmt_root(&self.data);
            keccak256_many([&self.span_bytes()[..], &root[..]])
        })
    }

    /// Materialize the full 8-level intra-chunk BMT.
    pub fn bmt(&self) -> ChunkBmt {
        ChunkBmt::build(&self.data)
    }

    /// Intra-chunk inclusion proof: the 7 sister segments for the segment
    /// at `pos`.
    ///
    /// Positions past the unpadded payload are rejected with
    /// [`BmtError::SegmentIndexOutOfRange`].
    pub fn inclusion_proof(&self, pos: usize) -> Result<[Segment; CHUNK_BMT_LEVELS]> {
        let max = self.len.saturating_sub(1) / SEGMENT_SIZE;
        if pos > max {
            return Err(BmtError::SegmentIndexOutOfRange { index: pos, max });
        }
        Ok(self.bmt().sister_segments(pos))
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("span", &self.span)
            .field("payload_len", &self.len)
            .finish_non_exhaustive()
    }
}

// Equality is over content only; whether an address has been cached yet is
// not observable.
impl PartialEq for Chunk {
    fn eq(&self, other: &Self) -> bool {
        self.span == other.span && self.len == other.len && self.data == other.data
    }
}

impl Eq for Chunk {}

/* ---------------------------------- Tests ----------------------------------- */
