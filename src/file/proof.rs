//! File-level inclusion proofs.
//!
//! A proof is an ordered list of [`ChunkInclusionProof`] steps, one per
//! tree level the traced chunk actually occupies between the leaf and the
//! root. Each step carries the span of the containing chunk plus the 7
//! sister segments along that chunk's intra-chunk BMT. A chunk that was
//! carried past a level contributes no step for it, so the proof can be
//! shorter than the tree is tall.
//!
//! The verifier never sees the tree. It folds the sister segments by the
//! parity of a running index, hashes in the span to obtain each chunk
//! address, and recovers the carrier shortcut from nothing but the file
//! size (taken from the final step's span) via [`bmt_index_of_segment`].

use crate::chunk::bmt::root_hash_from_inclusion_proof;
use crate::error::{BmtError, Result};
use crate::file::ChunkedFile;
use crate::hash::keccak256_many;
use crate::span::span_value;
use crate::{Address, Segment, CHUNK_PAYLOAD_SIZE, SEGMENTS_PER_CHUNK, SEGMENT_SIZE, SPAN_SIZE};

/// One level of rising: the span of the containing chunk and the sister
/// segments needed to rebuild its BMT root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkInclusionProof {
    /// Span of the chunk this step rises through, in wire form.
    pub span: [u8; SPAN_SIZE],
    /// The 7 sister segments, ordered from the segment level upward.
    pub sister_segments: Vec<Segment>,
}

/// Collect the inclusion proof for payload segment `segment_index`,
/// walking the file BMT from the leaf level toward the root.
///
/// Rejects indices past `(payload_len - 1) / 32` with
/// [`BmtError::SegmentIndexOutOfRange`].
pub fn file_inclusion_proof_bottom_up(
    file: &ChunkedFile,
    segment_index: usize,
) -> Result<Vec<ChunkInclusionProof>> {
    let max = (file.payload().len() - 1) / SEGMENT_SIZE;
    if segment_index > max {
        return Err(BmtError::SegmentIndexOutOfRange { index: segment_index, max });
    }

    let tree = file.bmt();
    let mut level = 0;
    let mut idx = segment_index / SEGMENTS_PER_CHUNK;
    let mut pos = segment_index % SEGMENTS_PER_CHUNK;
    let mut steps = Vec::with_capacity(tree.depth());

    loop {
        let chunks = tree.level(level);
        let chunk = &chunks[idx];
        steps.push(ChunkInclusionProof {
            span: chunk.span_bytes(),
            sister_segments: chunk.bmt().sister_segments(pos).to_vec(),
        });
        if chunks.len() == 1 {
            break;
        }

        // Climb to the chunk whose payload holds this chunk's address. A
        // carrier rises unchanged past levels where it has no siblings;
        // those levels get no proof step.
        loop {
            let width = tree.level(level).len();
            if width % SEGMENTS_PER_CHUNK == 1 && width > 1 && idx == width - 1 {
                idx = (width - 1) / SEGMENTS_PER_CHUNK;
                level += 1;
            } else {
                pos = idx % SEGMENTS_PER_CHUNK;
                idx /= SEGMENTS_PER_CHUNK;
                level += 1;
                break;
            }
        }
    }

    Ok(steps)
}

/// Recompute the file address from a proof, the proved segment (padded to
/// 32 bytes), and its index — without access to the tree.
pub fn file_address_from_inclusion_proof(
    proof: &[ChunkInclusionProof],
    prove_segment: &[u8],
    segment_index: usize,
) -> Result<Address> {
    let last = proof.last().ok_or(BmtError::InvalidProofLength)?;
    if prove_segment.len() != SEGMENT_SIZE {
        return Err(BmtError::InvalidSegmentSize {
            got: prove_segment.len(),
            expected: SEGMENT_SIZE,
        });
    }

    // The final step rises through the root chunk, whose span is the file
    // size; spans are at least 1, so a zero here marks a malformed proof.
    let file_size = span_value(&last.span);
    let max = match file_size.checked_sub(1) {
        Some(n) => (n / SEGMENT_SIZE as u64) as usize,
        None => return Err(BmtError::SegmentIndexOutOfRange { index: segment_index, max: 0 }),
    };
    if segment_index > max {
        return Err(BmtError::SegmentIndexOutOfRange { index: segment_index, max });
    }

    let mut last_chunk_index = ((file_size - 1) / CHUNK_PAYLOAD_SIZE as u64) as usize;
    let mut hash: Segment = [0u8; SEGMENT_SIZE];
    hash.copy_from_slice(prove_segment);
    let mut idx = segment_index;

    for step in proof {
        // Where does the chunk this step rebuilds sit as a child? For a
        // carried chunk this jumps the skipped levels in one go.
        let (parent_idx, _levels_skipped) = bmt_index_of_segment(idx, last_chunk_index);

        hash = root_hash_from_inclusion_proof(&step.sister_segments, &hash, idx)?;
        hash = keccak256_many([&step.span[..], &hash[..]]);

        idx = parent_idx;
        last_chunk_index /= SEGMENTS_PER_CHUNK;
    }

    Ok(hash)
}

/// Resolve where the chunk containing `segment_index` comes to rest in the
/// file BMT, given the index of the rightmost chunk on the same level.
///
/// Returns `(chunk_index, levels_skipped)`. For an ordinary chunk this is
/// `(segment_index / 128, 0)`: the chunk becomes a child one level up. A
/// lone right-edge chunk (`last_chunk_index % 128 == 0`, and not the only
/// chunk) is carried; its resting index is divided out once per skipped
/// level until it no longer lands on a group boundary.
pub fn bmt_index_of_segment(
    segment_index: usize,
    last_chunk_index: usize,
) -> (usize, usize) {
    let mut idx = segment_index / SEGMENTS_PER_CHUNK;
    let mut levels_skipped = 0;

    if idx == last_chunk_index && last_chunk_index % SEGMENTS_PER_CHUNK == 0 && last_chunk_index != 0
    {
        while idx % SEGMENTS_PER_CHUNK == 0 && idx != 0 {
            levels_skipped += 1;
            idx /= SEGMENTS_PER_CHUNK;
        }
    }

    (idx, levels_skipped)
}

/* ---------------------------------- Tests ----------------------------------- */
