//! # Artifact Paths — Per-Circuit Prover Material
//!
//! Each circuit needs three artifacts: a wasm witness generator, a
//! proving key, and a verification key. How those files are stored,
//! downloaded, or packaged is a collaborator's concern; this layer only
//! derives the conventional file names for a circuit identifier under a
//! caller-supplied base directory.

use std::path::{Path, PathBuf};

/// The three artifact paths for one circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpcArtifactPaths {
    /// Witness generator.
    pub wasm: PathBuf,
    /// Proving key.
    pub proving_key: PathBuf,
    /// Verification key.
    pub verification_key: PathBuf,
}

/// Derive artifact paths for a circuit identifier under a base directory.
///
/// Naming convention: `{identifier}.wasm`, `{identifier}-pkey.zkey`,
/// `{identifier}-vkey.json`.
pub fn artifact_paths(base: &Path, circuit_identifier: &str) -> GpcArtifactPaths {
    GpcArtifactPaths {
        wasm: base.join(format!("{circuit_identifier}.wasm")),
        proving_key: base.join(format!("{circuit_identifier}-pkey.zkey")),
        verification_key: base.join(format!("{circuit_identifier}-vkey.json")),
    }
}
