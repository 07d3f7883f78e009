//! # Canonicalization — One Form Per Meaning
//!
//! Equivalent configurations must produce identical bound configs and
//! identical circuit selections, so configs are normalized into a
//! canonical form: explicitly spelled defaults are stripped, and a
//! wholly-default virtual entry config is dropped altogether. Pod,
//! entry, and tuple ordering is already canonical by construction (the
//! maps are ordered), as is field order within serialized objects.
//!
//! Canonicalization is idempotent, which is how a verifier detects a
//! non-canonical bound config: one that differs from its own canonical
//! form was not produced by this library and fails verification.

use std::collections::BTreeMap;

use gpc_circuits::family::CircuitDesc;
use gpc_pod::PodValue;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::types::{
    GpcBoundConfig, GpcIdentifier, GpcProofConfig, GpcProofEntryConfig, GpcProofObjectConfig,
    GpcVirtualEntryConfig, IntRange,
};

/// Canonicalize one entry's constraints: drop boolean fields spelled at
/// their default (`isRevealed: false`, `isOwnerID: false`).
pub fn canonicalize_entry_config(config: &GpcProofEntryConfig) -> GpcProofEntryConfig {
    GpcProofEntryConfig {
        is_revealed: config.is_revealed.filter(|v| *v),
        is_owner_id: config.is_owner_id.filter(|v| *v),
        equals_entry: config.equals_entry.clone(),
        is_member_of: config.is_member_of.clone(),
        is_not_member_of: config.is_not_member_of.clone(),
        in_range: config.in_range,
    }
}

/// Canonicalize a virtual entry's constraints.
///
/// The reveal default differs per virtual entry kind, so it is an
/// explicit parameter. Returns `None` when the config is entirely
/// default for its kind; otherwise the reveal flag is kept explicit
/// (both values are meaningful once any other field is set).
pub fn canonicalize_virtual_entry_config(
    config: &GpcVirtualEntryConfig,
    default_is_revealed: bool,
) -> Option<GpcVirtualEntryConfig> {
    let is_revealed = config.is_revealed.unwrap_or(default_is_revealed);
    let trivial = config.equals_entry.is_none()
        && config.is_member_of.is_none()
        && config.is_not_member_of.is_none();
    if trivial && is_revealed == default_is_revealed {
        return None;
    }
    Some(GpcVirtualEntryConfig {
        is_revealed: Some(is_revealed),
        equals_entry: config.equals_entry.clone(),
        is_member_of: config.is_member_of.clone(),
        is_not_member_of: config.is_not_member_of.clone(),
    })
}

fn canonicalize_object_config(config: &GpcProofObjectConfig) -> GpcProofObjectConfig {
    GpcProofObjectConfig {
        entries: config
            .entries
            .iter()
            .map(|(name, entry)| (name.clone(), canonicalize_entry_config(entry)))
            .collect(),
        signer_public_key: config
            .signer_public_key
            .as_ref()
            .and_then(|virtual_config| canonicalize_virtual_entry_config(virtual_config, true)),
    }
}

/// Canonicalize a whole proof configuration. Pure; idempotent.
pub fn canonicalize_proof_config(config: &GpcProofConfig) -> GpcProofConfig {
    GpcProofConfig {
        pods: config
            .pods
            .iter()
            .map(|(name, pod)| (name.clone(), canonicalize_object_config(pod)))
            .collect(),
        tuples: config.tuples.clone(),
        circuit_identifier: config.circuit_identifier.clone(),
    }
}

/// Canonicalize a bound configuration.
pub fn canonicalize_bound_config(config: &GpcBoundConfig) -> GpcBoundConfig {
    GpcBoundConfig {
        circuit_identifier: config.circuit_identifier.clone(),
        pods: canonicalize_proof_config(&config.to_proof_config()).pods,
        tuples: config.tuples.clone(),
    }
}

/// Bind a canonical configuration to the circuit that proves it.
pub fn bind_config(config: &GpcProofConfig, circuit_identifier: GpcIdentifier) -> GpcBoundConfig {
    let canonical = canonicalize_proof_config(config);
    GpcBoundConfig {
        circuit_identifier,
        pods: canonical.pods,
        tuples: canonical.tuples,
    }
}

/// The identifier naming a circuit across the library's public surface:
/// `family_circuitName`.
pub fn make_circuit_identifier(desc: &CircuitDesc) -> GpcIdentifier {
    GpcIdentifier::from_parts(&desc.family, &desc.name)
}

/// The single public signal a watermark (or external nullifier)
/// contributes: the value's content hash, or zero when absent.
pub fn make_watermark_signal(value: Option<&PodValue>) -> BigUint {
    value.map(PodValue::content_hash).unwrap_or_else(BigUint::zero)
}

/// Derive the bounds-check mapping from a proof configuration:
/// `"alias.entry"` to its configured range, one entry per `inRange`
/// constraint. Used to size the numeric-value module and by validation
/// UIs downstream.
pub fn bounds_check_config_from_proof_config(
    config: &GpcProofConfig,
) -> BTreeMap<String, IntRange> {
    let mut bounds = BTreeMap::new();
    for (pod_name, pod_config) in &config.pods {
        for (entry_name, entry_config) in &pod_config.entries {
            if let Some(range) = entry_config.in_range {
                bounds.insert(format!("{pod_name}.{entry_name}"), range);
            }
        }
    }
    bounds
}
