//! Keccak-256 helpers.
//!
//! Swarm addressing uses **Keccak-256** (Ethereum's `keccak256`), which
//! differs from NIST SHA3-256 in padding. Both helpers wrap
//! [`tiny_keccak`]'s one-shot sponge; [`keccak256_many`] absorbs multiple
//! parts as if they were concatenated, which keeps the chunk-address hot
//! path (`span ‖ bmt_root`, `left ‖ right`) free of intermediate buffers.

use tiny_keccak::{Hasher, Keccak};

use crate::Segment;

/// One-shot Keccak-256 of a single buffer.
#[inline]
pub fn keccak256(data: &[u8]) -> Segment {
    let mut k = Keccak::v256();
    k.update(data);
    let mut out = [0u8; 32];
    k.finalize(&mut out);
    out
}

/// Keccak-256 over multiple parts, treated as if concatenated.
pub fn keccak256_many<'a, I>(parts: I) -> Segment
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut k = Keccak::v256();
    for p in parts {
        k.update(p);
    }
    let mut out = [0u8; 32];
    k.finalize(&mut out);
    out
}

/// Keccak-256 of two 32-byte nodes, `left ‖ right`.
#[inline]
pub fn keccak256_pair(left: &Segment, right: &Segment) -> Segment {
    keccak256_many([&left[..], &right[..]])
}

/* ---------------------------------- Tests ----------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_empty_matches_vector() {
        // Known Keccak-256("") from Ethereum tooling.
        let got = keccak256(&[]);
        let expect =
            hex::decode("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
                .unwrap();
        assert_eq!(&got[..], &expect[..]);
    }

    #[test]
    fn many_equals_concat() {
        let a = keccak256_many([b"ab".as_ref(), b"c"]);
        let b = keccak256(b"abc");
        assert_eq!(a, b);
    }

    #[test]
    fn pair_equals_concat() {
        let l = keccak256(b"left");
        let r = keccak256(b"right");
        let mut cat = [0u8; 64];
        cat[..32].copy_from_slice(&l);
        cat[32..].copy_from_slice(&r);
        assert_eq!(keccak256_pair(&l, &r), keccak256(&cat));
    }
}
