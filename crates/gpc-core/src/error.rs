//! # Error Types — Shared Base Errors
//!
//! Base error types used across the POD GPC stack. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//! The proof layer defines its own richer taxonomy on top of these.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error in cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key generation or parsing failed.
    #[error("key error: {0}")]
    KeyError(String),

    /// Digest or hash computation failed.
    #[error("digest error: {0}")]
    DigestError(String),

    /// A Merkle proof did not check out against its root.
    #[error("merkle proof error: {0}")]
    MerkleError(String),
}
