//! swarm-bmt — Swarm binary Merkle tree (BMT) content addressing.
//!
//! Given an arbitrary byte payload, this crate derives the 32-byte Swarm
//! content address of the whole payload and produces compact inclusion
//! proofs for any 32-byte segment of it, verifiable without the tree.
//!
//! ### Model
//! * **Chunk**: an 8-byte little-endian *span* plus a 4096-byte payload
//!   (zero-padded). Its address is `keccak256(span ‖ bmt_root(payload))`,
//!   where `bmt_root` is the root of a fixed-shape 7-level binary Merkle
//!   tree over the payload's 128 segments of 32 bytes.
//! * **File tree**: leaf chunks are grouped 128 per intermediate chunk,
//!   level by level, until a single root chunk remains. A lone right-edge
//!   chunk (`n mod 128 == 1`, `n > 1`) is *carried* up unchanged instead of
//!   being wrapped alone — see [`file`].
//! * **Inclusion proof**: per tree level, the span of the containing chunk
//!   plus the 7 sister segments along its intra-chunk BMT. A verifier folds
//!   these back to the file address from a single segment and its index.
//!
//! ### API surface
//! - [`Chunk`] / [`ChunkBmt`] — chunk-level hashing and intra-chunk proofs
//! - [`ChunkedFile`] / [`FileTree`] — chunking and the multi-level file BMT
//! - [`file_inclusion_proof_bottom_up`] / [`file_address_from_inclusion_proof`]
//!   — file-level proof collection and tree-blind verification
//! - [`make_span`] / [`span_value`] — span wire encoding
//!
//! The construction is pure and deterministic; with the `rayon` feature the
//! tree build parallelizes internally with bitwise-identical output.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms, unused_must_use)]

pub mod chunk;
pub mod error;
pub mod file;
pub mod hash;
pub mod span;

pub use chunk::bmt::{root_hash_from_inclusion_proof, ChunkBmt};
pub use chunk::Chunk;
pub use error::{BmtError, Result};
pub use file::proof::{
    bmt_index_of_segment, file_address_from_inclusion_proof, file_inclusion_proof_bottom_up,
    ChunkInclusionProof,
};
pub use file::{ChunkedFile, FileTree};
pub use span::{make_span, span_value};

/// Width of a payload segment and of every hash output, in bytes.
pub const SEGMENT_SIZE: usize = 32;

/// Number of segments in a full chunk payload.
pub const SEGMENTS_PER_CHUNK: usize = 128;

/// Maximum chunk payload width: `SEGMENT_SIZE * SEGMENTS_PER_CHUNK`.
pub const CHUNK_PAYLOAD_SIZE: usize = SEGMENT_SIZE * SEGMENTS_PER_CHUNK;

/// Width of the span field: a little-endian unsigned 64-bit byte count.
pub const SPAN_SIZE: usize = 8;

/// Internal levels of the intra-chunk BMT: `log2(SEGMENTS_PER_CHUNK)`.
pub const CHUNK_BMT_LEVELS: usize = 7;

/// A 32-byte unit of payload (also the width of every digest).
pub type Segment = [u8; SEGMENT_SIZE];

/// A 32-byte chunk or file address.
pub type Address = [u8; SEGMENT_SIZE];
