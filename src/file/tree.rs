//! Iterative, bottom-up construction of the multi-level file BMT.
//!
//! Levels are built from the leaf chunks upward. Each level groups runs of
//! up to 128 chunks into an intermediate chunk whose payload is the run's
//! concatenated addresses and whose span is the sum of the run's spans.
//!
//! **Carrier rule.** When a level holds `n` chunks with `n mod 128 == 1`
//! and `n > 1`, the lone right-edge chunk is not wrapped into a parent of
//! its own — that parent's payload would be one address plus 4064 zero
//! bytes, an indirection that combines nothing. Instead the chunk is
//! carried to the next level unchanged, re-appearing there as the rightmost
//! entry, until it lands beside genuine siblings (or becomes a child of the
//! root). The carried appearances are value-equal clones that share the
//! chunk's address cache, so promotion never re-hashes.
//!
//! Building stops when a level holds a single chunk: the root.

use crate::chunk::Chunk;
use crate::{SEGMENTS_PER_CHUNK, SEGMENT_SIZE};

/// The file BMT: an ordered sequence of levels, bottom-up.
///
/// `level(0)` is the leaf chunks; the last level holds exactly one chunk,
/// the root. A carrier chunk appears on every level it passes through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileTree {
    levels: Vec<Vec<Chunk>>,
}

impl FileTree {
    /// Build all levels over a non-empty leaf sequence.
    pub(crate) fn build(leaves: Vec<Chunk>) -> Self {
        debug_assert!(!leaves.is_empty());
        let mut levels = vec![leaves];
        while levels[levels.len() - 1].len() > 1 {
            let next = next_level(&levels[levels.len() - 1]);
            levels.push(next);
        }
        Self { levels }
    }

    /// Number of levels, leaves included.
    #[inline]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// All levels, bottom-up.
    #[inline]
    pub fn levels(&self) -> &[Vec<Chunk>] {
        &self.levels
    }

    /// The chunks of one level.
    #[inline]
    pub fn level(&self, level: usize) -> &[Chunk] {
        &self.levels[level]
    }

    /// The root chunk (sole occupant of the top level).
    #[inline]
    pub fn root(&self) -> &Chunk {
        &self.levels[self.levels.len() - 1][0]
    }
}

/// Build the next level up from `chunks` (`chunks.len() > 1`).
fn next_level(chunks: &[Chunk]) -> Vec<Chunk> {
    let n = chunks.len();
    debug_assert!(n > 1);

    // Lone right-edge chunk rides along instead of being grouped.
    let (grouped, carried) = if n % SEGMENTS_PER_CHUNK == 1 {
        chunks.split_at(n - 1)
    } else {
        (chunks, &chunks[..0])
    };

    let mut next = parents_of(grouped);
    next.extend(carried.iter().cloned());
    next
}

/// Wrap each run of up to 128 chunks into its intermediate parent.
fn parents_of(grouped: &[Chunk]) -> Vec<Chunk> {
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        grouped.par_chunks(SEGMENTS_PER_CHUNK).map(parent_chunk).collect()
    }
    #[cfg(not(feature = "rayon"))]
    {
        grouped.chunks(SEGMENTS_PER_CHUNK).map(parent_chunk).collect()
    }
}

/// One intermediate chunk: concatenated child addresses, summed spans.
fn parent_chunk(children: &[Chunk]) -> Chunk {
    let mut payload = Vec::with_capacity(children.len() * SEGMENT_SIZE);
    let mut span = 0u64;
    for child in children {
        payload.extend_from_slice(&child.address());
        span += child.span();
    }
    Chunk::from_parts(&payload, span)
}

/* ---------------------------------- Tests ----------------------------------- */
