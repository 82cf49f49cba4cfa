//! Chunked files: whole-payload content addressing.
//!
//! [`ChunkedFile`] cuts a payload into 4096-byte leaf chunks (the last one
//! short and zero-padded, its span the true byte count), builds the
//! multi-level file BMT over them, and exposes the root chunk whose address
//! is the content identifier of the whole input. Construction is eager: the
//! tree is needed anyway to serve inclusion proofs, and everything is
//! immutable afterwards.

pub mod proof;
mod tree;

pub use tree::FileTree;

use crate::chunk::Chunk;
use crate::error::{BmtError, Result};
use crate::span::make_span;
use crate::{Address, CHUNK_PAYLOAD_SIZE, SPAN_SIZE};

/// A payload together with its leaf chunks and file BMT.
#[derive(Clone, Debug)]
pub struct ChunkedFile {
    payload: Vec<u8>,
    tree: FileTree,
}

impl ChunkedFile {
    /// Chunk `payload` and build its file BMT.
    ///
    /// Fails with [`BmtError::EmptyPayload`] on zero-length input; there is
    /// no content address of nothing.
    pub fn new(payload: impl Into<Vec<u8>>) -> Result<Self> {
        let payload = payload.into();
        if payload.is_empty() {
            return Err(BmtError::EmptyPayload);
        }

        let leaves: Vec<Chunk> = payload
            .chunks(CHUNK_PAYLOAD_SIZE)
            .map(|slice| Chunk::from_parts(slice, slice.len() as u64))
            .collect();

        let tree = FileTree::build(leaves);
        Ok(Self { payload, tree })
    }

    /// The original input bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The leaf chunks, in input order.
    #[inline]
    pub fn leaf_chunks(&self) -> &[Chunk] {
        self.tree.level(0)
    }

    /// The root chunk of the file BMT.
    #[inline]
    pub fn root_chunk(&self) -> &Chunk {
        self.tree.root()
    }

    /// The file address: the root chunk's address.
    #[inline]
    pub fn address(&self) -> Address {
        self.root_chunk().address()
    }

    /// Total payload byte count (the root chunk's span).
    #[inline]
    pub fn span(&self) -> u64 {
        self.root_chunk().span()
    }

    /// The file span in its 8-byte little-endian wire form.
    #[inline]
    pub fn span_bytes(&self) -> [u8; SPAN_SIZE] {
        make_span(self.span())
    }

    /// The full file BMT, levels bottom-up.
    #[inline]
    pub fn bmt(&self) -> &FileTree {
        &self.tree
    }
}

/* ---------------------------------- Tests ----------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_is_rejected() {
        assert_eq!(ChunkedFile::new(Vec::new()).unwrap_err(), BmtError::EmptyPayload);
    }

    #[test]
    fn single_chunk_file_is_its_own_leaf() {
        let file = ChunkedFile::new(&b"hello bmt"[..]).unwrap();
        assert_eq!(file.leaf_chunks().len(), 1);
        assert_eq!(file.bmt().depth(), 1);

        let leaf = &file.leaf_chunks()[0];
        assert_eq!(file.address(), leaf.address());
        assert_eq!(file.span_bytes(), leaf.span_bytes());
        assert_eq!(file.span(), 9);
    }

    #[test]
    fn last_leaf_keeps_its_true_span() {
        let payload = vec![0x5Au8; CHUNK_PAYLOAD_SIZE + 100];
        let file = ChunkedFile::new(payload).unwrap();
        assert_eq!(file.leaf_chunks().len(), 2);
        assert_eq!(file.leaf_chunks()[0].span(), 4096);
        assert_eq!(file.leaf_chunks()[1].span(), 100);
        assert_eq!(file.span(), 4196);
        assert_eq!(file.bmt().depth(), 2);
    }

    #[test]
    fn exactly_full_chunk_stays_single() {
        let file = ChunkedFile::new(vec![1u8; CHUNK_PAYLOAD_SIZE]).unwrap();
        assert_eq!(file.leaf_chunks().len(), 1);
        assert_eq!(file.bmt().depth(), 1);
    }

    #[test]
    fn one_extra_byte_grows_the_tree() {
        let file = ChunkedFile::new(vec![1u8; CHUNK_PAYLOAD_SIZE + 1]).unwrap();
        assert_eq!(file.leaf_chunks().len(), 2);
        assert_eq!(file.bmt().depth(), 2);
        assert_eq!(file.leaf_chunks()[1].span(), 1);
    }

    #[test]
    fn trailing_zeros_still_change_the_address() {
        // The padded payload bytes are identical; only the span differs.
        let short = ChunkedFile::new(&b"abc"[..]).unwrap();
        let mut padded = b"abc".to_vec();
        padded.extend_from_slice(&[0u8; 29]);
        let long = ChunkedFile::new(padded).unwrap();
        assert_ne!(short.address(), long.address());
    }

    #[test]
    fn intermediate_payload_prefix_rule() {
        let payload = vec![3u8; 5 * CHUNK_PAYLOAD_SIZE + 7];
        let file = ChunkedFile::new(payload).unwrap();
        let tree = file.bmt();
        for level in 1..tree.depth() {
            let first = &tree.level(level)[0];
            for (child_idx, window) in first.payload().chunks(32).enumerate() {
                assert_eq!(window, &tree.level(level - 1)[child_idx].address()[..]);
            }
        }
    }
}
