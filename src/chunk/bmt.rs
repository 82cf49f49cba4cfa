//! Intra-chunk binary Merkle tree.
//!
//! A chunk payload is always hashed at its padded width: 128 segments of 32
//! bytes, combined pairwise with Keccak-256 for exactly 7 levels. The full
//! tree has 255 nodes and is kept as one flat array so that sibling lookup
//! for proofs is pure index arithmetic: the sister of position `p` on level
//! `k` sits at `p ^ 1` on the same level.
//!
//! Layout of [`ChunkBmt::nodes`], bottom-up:
//!
//! ```text
//! level 0: nodes[0..128]    raw payload segments
//! level 1: nodes[128..192]  keccak256(s[2j] ‖ s[2j+1])
//! ...
//! level 7: nodes[254]       BMT root
//! ```
//!
//! The BMT root is *not* a chunk address yet; the address additionally
//! commits to the span (see [`crate::chunk::Chunk::address`]).

use crate::error::{BmtError, Result};
use crate::hash::{keccak256, keccak256_pair};
use crate::{Segment, CHUNK_BMT_LEVELS, CHUNK_PAYLOAD_SIZE, SEGMENTS_PER_CHUNK, SEGMENT_SIZE};

/// Total node count of the 8-level tree: `128 + 64 + … + 1`.
const NODE_COUNT: usize = 2 * SEGMENTS_PER_CHUNK - 1;

/// Start offset of each level inside the flat node array.
const LEVEL_OFFSETS: [usize; CHUNK_BMT_LEVELS + 1] = [0, 128, 192, 224, 240, 248, 252, 254];

/// Width (in nodes) of a level.
#[inline]
const fn level_width(level: usize) -> usize {
    SEGMENTS_PER_CHUNK >> level
}

/// The fully materialized intra-chunk BMT of one padded chunk payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkBmt {
    nodes: Box<[Segment; NODE_COUNT]>,
}

impl ChunkBmt {
    /// Build the full tree over a padded 4096-byte payload.
    pub(crate) fn build(data: &[u8; CHUNK_PAYLOAD_SIZE]) -> Self {
        let mut nodes = Box::new([[0u8; SEGMENT_SIZE]; NODE_COUNT]);

        for (node, seg) in nodes.iter_mut().zip(data.chunks_exact(SEGMENT_SIZE)) {
            node.copy_from_slice(seg);
        }

        for level in 0..CHUNK_BMT_LEVELS {
            let src = LEVEL_OFFSETS[level];
            let dst = LEVEL_OFFSETS[level + 1];
            for j in 0..level_width(level + 1) {
                let left = nodes[src + 2 * j];
                let right = nodes[src + 2 * j + 1];
                nodes[dst + j] = keccak256_pair(&left, &right);
            }
        }

        Self { nodes }
    }

    /// Number of levels, including the segment level and the root.
    #[inline]
    pub const fn levels(&self) -> usize {
        CHUNK_BMT_LEVELS + 1
    }

    /// Nodes of one level, bottom-up (`level 0` = the 128 raw segments).
    #[inline]
    pub fn level(&self, level: usize) -> &[Segment] {
        let off = LEVEL_OFFSETS[level];
        &self.nodes[off..off + level_width(level)]
    }

    /// The BMT root (top node).
    #[inline]
    pub fn root(&self) -> Segment {
        self.nodes[NODE_COUNT - 1]
    }

    /// The 7 sister segments along the path of segment position `pos`.
    ///
    /// Ordered bottom-up: entry 0 is the sibling of the segment itself,
    /// entry 6 the sibling of its half-tree.
    pub fn sister_segments(&self, pos: usize) -> [Segment; CHUNK_BMT_LEVELS] {
        debug_assert!(pos < SEGMENTS_PER_CHUNK);
        let mut out = [[0u8; SEGMENT_SIZE]; CHUNK_BMT_LEVELS];
        let mut idx = pos;
        for (level, sister) in out.iter_mut().enumerate() {
            *sister = self.nodes[LEVEL_OFFSETS[level] + (idx ^ 1)];
            idx >>= 1;
        }
        out
    }
}

/// Compute only the BMT root of a padded payload, without retaining nodes.
///
/// One `Segment` buffer per level pair is avoided by folding in place; this
/// is the hot path behind every chunk address.
pub(crate) fn bmt_root(data: &[u8; CHUNK_PAYLOAD_SIZE]) -> Segment {
    // First fold hashes 64-byte segment pairs straight out of the payload.
    let mut nodes: Vec<Segment> = data
        .chunks_exact(2 * SEGMENT_SIZE)
        .map(keccak256)
        .collect();

    while nodes.len() > 1 {
        for j in 0..nodes.len() / 2 {
            let (left, right) = (nodes[2 * j], nodes[2 * j + 1]);
            nodes[j] = keccak256_pair(&left, &right);
        }
        nodes.truncate(nodes.len() / 2);
    }

    nodes[0]
}

/// Recompute a chunk's BMT root from one segment, its position, and the 7
/// sister segments of an intra-chunk inclusion proof.
///
/// At each level the running hash joins its sister on the side given by the
/// corresponding bit of `pos`: an even position is a left child. The result
/// equals [`ChunkBmt::root`] of the chunk the proof was taken from; hashing
/// it with the chunk's span yields the chunk address.
pub fn root_hash_from_inclusion_proof(
    sister_segments: &[Segment],
    segment: &[u8],
    pos: usize,
) -> Result<Segment> {
    if sister_segments.len() != CHUNK_BMT_LEVELS {
        return Err(BmtError::InvalidProofLength);
    }
    if segment.len() != SEGMENT_SIZE {
        return Err(BmtError::InvalidSegmentSize { got: segment.len(), expected: SEGMENT_SIZE });
    }

    let mut hash = [0u8; SEGMENT_SIZE];
    hash.copy_from_slice(segment);

    let mut idx = pos;
    for sister in sister_segments {
        hash = if idx % 2 == 0 {
            keccak256_pair(&hash, sister)
        } else {
            keccak256_pair(sister, &hash)
        };
        idx /= 2;
    }

    Ok(hash)
}

/* ---------------------------------- Tests ----------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> [u8; CHUNK_PAYLOAD_SIZE] {
        let mut data = [0u8; CHUNK_PAYLOAD_SIZE];
        for (i, b) in data.iter_mut().enumerate() {
            *b = (i % 251) as u8;
        }
        data
    }

    #[test]
    fn level_shapes() {
        let tree = ChunkBmt::build(&sample_data());
        assert_eq!(tree.levels(), 8);
        let widths: Vec<usize> = (0..8).map(|k| tree.level(k).len()).collect();
        assert_eq!(widths, [128, 64, 32, 16, 8, 4, 2, 1]);
    }

    #[test]
    fn segment_level_is_raw_payload() {
        let data = sample_data();
        let tree = ChunkBmt::build(&data);
        assert_eq!(&tree.level(0)[3][..], &data[3 * 32..4 * 32]);
    }

    #[test]
    fn fast_root_matches_full_tree() {
        let data = sample_data();
        assert_eq!(bmt_root(&data), ChunkBmt::build(&data).root());
    }

    #[test]
    fn sister_proof_recomputes_root_at_every_position() {
        let data = sample_data();
        let tree = ChunkBmt::build(&data);
        for pos in [0usize, 1, 2, 63, 64, 126, 127] {
            let sisters = tree.sister_segments(pos);
            let segment = &data[pos * SEGMENT_SIZE..(pos + 1) * SEGMENT_SIZE];
            let root = root_hash_from_inclusion_proof(&sisters, segment, pos).unwrap();
            assert_eq!(root, tree.root(), "position {pos}");
        }
    }

    #[test]
    fn tampered_sister_changes_root() {
        let data = sample_data();
        let tree = ChunkBmt::build(&data);
        let mut sisters = tree.sister_segments(5);
        sisters[2][0] ^= 0x01;
        let segment = &data[5 * 32..6 * 32];
        let root = root_hash_from_inclusion_proof(&sisters, segment, 5).unwrap();
        assert_ne!(root, tree.root());
    }

    #[test]
    fn proof_input_validation() {
        let tree = ChunkBmt::build(&sample_data());
        let sisters = tree.sister_segments(0);

        assert_eq!(
            root_hash_from_inclusion_proof(&sisters[..6], &[0u8; 32], 0).unwrap_err(),
            BmtError::InvalidProofLength,
        );
        assert_eq!(
            root_hash_from_inclusion_proof(&sisters, &[0u8; 31], 0).unwrap_err(),
            BmtError::InvalidSegmentSize { got: 31, expected: 32 },
        );
    }
}
