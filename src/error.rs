//! Error types for BMT construction and proof handling.
//!
//! Every failure is synchronous and total: the offending operation aborts
//! with a typed error and recovery is the caller's responsibility. Nothing
//! is retried internally, and the hash primitive is treated as infallible.
//!
//! The variants derive `PartialEq`/`Eq` so tests (and callers dispatching on
//! failure kind) can match on exact values.

/// Canonical error for the crate.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BmtError {
    /// A chunked file cannot be built over zero bytes.
    #[error("payload must be at least one byte long")]
    EmptyPayload,

    /// A single chunk cannot hold more than [`CHUNK_PAYLOAD_SIZE`] bytes.
    ///
    /// [`CHUNK_PAYLOAD_SIZE`]: crate::CHUNK_PAYLOAD_SIZE
    #[error("chunk payload of {got} bytes exceeds the maximum of {max}")]
    PayloadTooLargeForChunk { got: usize, max: usize },

    /// The requested segment index points past the end of the payload.
    #[error("The given segment index {index} is greater than {max}")]
    SegmentIndexOutOfRange { index: usize, max: usize },

    /// A proof had zero steps, or a step did not carry exactly 7 sister
    /// segments.
    #[error("inclusion proof must have at least one step of exactly 7 sister segments")]
    InvalidProofLength,

    /// The segment under proof was not exactly 32 bytes wide.
    #[error("proved segment must be exactly {expected} bytes, got {got}")]
    InvalidSegmentSize { got: usize, expected: usize },
}

/// Convenience alias for results that use [`BmtError`].
pub type Result<T> = std::result::Result<T, BmtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_index_message_prefix_is_stable() {
        // Callers dispatch on this prefix; keep it byte-identical.
        let err = BmtError::SegmentIndexOutOfRange { index: 9, max: 3 };
        assert!(err.to_string().starts_with("The given segment index"));
    }

    #[test]
    fn errors_compare_by_value() {
        assert_eq!(
            BmtError::InvalidSegmentSize { got: 31, expected: 32 },
            BmtError::InvalidSegmentSize { got: 31, expected: 32 },
        );
        assert_ne!(BmtError::EmptyPayload, BmtError::InvalidProofLength);
    }
}
