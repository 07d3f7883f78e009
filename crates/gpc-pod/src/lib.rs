//! # gpc-pod — Provable Object Data
//!
//! The POD object model consumed by the GPC proof layer: an ordered map
//! of named, tagged values, committed to by a Merkle root (the content
//! ID) and signed by its issuer. PODs are immutable once signed; the
//! proof layer only reads entries, extracts inclusion proofs, and checks
//! signatures.

pub mod pod;
pub mod value;

pub use pod::{signing_payload, Pod, PodError};
pub use value::{PodValue, PodValueError, POD_INT_MAX, POD_INT_MIN};
