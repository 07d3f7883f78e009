//! # Ed25519 Signing and Verification
//!
//! POD signing keys and signatures, plus the limb encoding that carries
//! them into circuit signals.
//!
//! ## Security Invariant
//!
//! - Signing input MUST be `&CanonicalBytes`. You cannot sign raw bytes,
//!   so every signature in the system covers canonically serialized data.
//! - Private keys are never serialized or logged. `SigningKeypair` does
//!   not implement `Serialize`, and its `Debug` output is redacted.
//!
//! ## Serde
//!
//! Public keys and signatures serialize as lowercase hex strings, the
//! representation revealed claims carry.
//!
//! ## Limb Encoding
//!
//! The circuit's object module consumes keys and signatures as field
//! elements: the public key as two 16-byte big-endian halves (`ax`, `ay`),
//! the signature's R component likewise (`r8x`, `r8y`), and the scalar S
//! as its little-endian integer (always below the field modulus). The
//! encoding is lossless; [`SignerPublicKey::from_limbs`] and
//! [`PodSignature::from_limbs`] invert it.

use ed25519_dalek::{Signer, Verifier};
use gpc_core::error::CryptoError;
use gpc_core::CanonicalBytes;
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An Ed25519 public key (32 bytes) identifying a POD signer.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SignerPublicKey(pub [u8; 32]);

/// An Ed25519 signature (64 bytes) over a POD's content ID.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PodSignature(pub [u8; 64]);

/// An Ed25519 key pair for POD signing.
///
/// Does not implement `Serialize`; private keys must not leak into logs,
/// claims, or artifacts.
pub struct SigningKeypair {
    signing_key: ed25519_dalek::SigningKey,
}

// ---------------------------------------------------------------------------
// SignerPublicKey impls
// ---------------------------------------------------------------------------

impl SignerPublicKey {
    /// Create a public key from raw 32 bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Return the raw 32-byte public key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the public key as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.0)
    }

    /// Parse a public key from a 64-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let bytes = hex_to_bytes(hex, 32).map_err(CryptoError::KeyError)?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Split the key into the two field-element limbs the object module
    /// consumes: big-endian halves of the 32 key bytes.
    pub fn to_limbs(&self) -> (BigUint, BigUint) {
        (
            BigUint::from_bytes_be(&self.0[..16]),
            BigUint::from_bytes_be(&self.0[16..]),
        )
    }

    /// Reassemble a key from its limb encoding.
    pub fn from_limbs(ax: &BigUint, ay: &BigUint) -> Result<Self, CryptoError> {
        let mut bytes = [0u8; 32];
        write_half(&mut bytes[..16], ax)
            .and_then(|()| write_half(&mut bytes[16..], ay))
            .map_err(CryptoError::KeyError)?;
        Ok(Self(bytes))
    }

    fn to_verifying_key(&self) -> Result<ed25519_dalek::VerifyingKey, CryptoError> {
        ed25519_dalek::VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CryptoError::KeyError(format!("invalid public key: {e}")))
    }
}

impl Serialize for SignerPublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SignerPublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for SignerPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SignerPublicKey({}...)", hex_prefix(&self.0))
    }
}

impl std::fmt::Display for SignerPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// PodSignature impls
// ---------------------------------------------------------------------------

impl PodSignature {
    /// Create a signature from raw 64 bytes.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Return the raw 64-byte signature.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Render the signature as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.0)
    }

    /// Parse a signature from a 128-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let bytes = hex_to_bytes(hex, 64).map_err(CryptoError::VerificationFailed)?;
        let mut arr = [0u8; 64];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Split the signature into the three field-element limbs the object
    /// module consumes: big-endian halves of R and the little-endian
    /// scalar S (which is below the field modulus by construction).
    pub fn to_limbs(&self) -> (BigUint, BigUint, BigUint) {
        (
            BigUint::from_bytes_be(&self.0[..16]),
            BigUint::from_bytes_be(&self.0[16..32]),
            BigUint::from_bytes_le(&self.0[32..]),
        )
    }

    /// Reassemble a signature from its limb encoding.
    pub fn from_limbs(r8x: &BigUint, r8y: &BigUint, s: &BigUint) -> Result<Self, CryptoError> {
        let mut bytes = [0u8; 64];
        write_half(&mut bytes[..16], r8x)
            .and_then(|()| write_half(&mut bytes[16..32], r8y))
            .map_err(CryptoError::VerificationFailed)?;
        let s_bytes = s.to_bytes_le();
        if s_bytes.len() > 32 {
            return Err(CryptoError::VerificationFailed(
                "signature scalar exceeds 32 bytes".to_string(),
            ));
        }
        bytes[32..32 + s_bytes.len()].copy_from_slice(&s_bytes);
        Ok(Self(bytes))
    }
}

impl Serialize for PodSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PodSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for PodSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PodSignature({}...)", hex_prefix(&self.0))
    }
}

// ---------------------------------------------------------------------------
// SigningKeypair impls
// ---------------------------------------------------------------------------

impl SigningKeypair {
    /// Generate a new random key pair.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        let signing_key = ed25519_dalek::SigningKey::generate(&mut csprng);
        Self { signing_key }
    }

    /// Create a key pair from a raw 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// The public key of this pair.
    pub fn public_key(&self) -> SignerPublicKey {
        SignerPublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign canonical bytes.
    ///
    /// The signing input MUST be `&CanonicalBytes` so that every POD
    /// signature covers the canonical content-ID encoding.
    pub fn sign(&self, data: &CanonicalBytes) -> PodSignature {
        let sig = self.signing_key.sign(data.as_bytes());
        PodSignature(sig.to_bytes())
    }
}

impl std::fmt::Debug for SigningKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningKeypair(<private>)")
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify a signature over canonical bytes.
///
/// Returns `Ok(())` if valid, `Err(CryptoError::VerificationFailed)`
/// otherwise.
pub fn verify(
    data: &CanonicalBytes,
    signature: &PodSignature,
    public_key: &SignerPublicKey,
) -> Result<(), CryptoError> {
    let vk = public_key.to_verifying_key()?;
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    vk.verify(data.as_bytes(), &sig)
        .map_err(|e| CryptoError::VerificationFailed(format!("Ed25519 verification failed: {e}")))
}

// ---------------------------------------------------------------------------
// Hex utilities (no external hex crate dependency)
// ---------------------------------------------------------------------------

fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_prefix(bytes: &[u8]) -> String {
    bytes.iter().take(4).map(|b| format!("{b:02x}")).collect()
}

fn hex_to_bytes(hex: &str, expected_len: usize) -> Result<Vec<u8>, String> {
    let hex = hex.trim().to_lowercase();
    if hex.len() != expected_len * 2 {
        return Err(format!(
            "expected {} hex chars, got {}",
            expected_len * 2,
            hex.len()
        ));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| format!("invalid hex at position {i}: {e}"))
        })
        .collect()
}

fn write_half(out: &mut [u8], limb: &BigUint) -> Result<(), String> {
    let bytes = limb.to_bytes_be();
    if bytes.len() > out.len() {
        return Err(format!(
            "limb exceeds {} bytes: got {}",
            out.len(),
            bytes.len()
        ));
    }
    let offset = out.len() - bytes.len();
    out[..offset].fill(0);
    out[offset..].copy_from_slice(&bytes);
    Ok(())
}
