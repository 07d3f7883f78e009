//! # Claims Extraction — What a Verifier Can Trust
//!
//! Assembles [`GpcRevealedClaims`] from proof inputs and circuit
//! outputs. The claims mirror, byte for byte, what the verify path can
//! recompute from bound config + claims alone: revealed entry values,
//! signer public keys (whenever their virtual entry is revealed, the
//! default), owner data when a nullifier hash was revealed, membership
//! lists verbatim, and the watermark verbatim.

use std::collections::BTreeMap;

use gpc_circuits::signals::CircuitOutputs;

use crate::error::{GpcError, GpcResolutionError};
use crate::types::{
    GpcProofConfig, GpcProofInputs, GpcRevealedClaims, GpcRevealedObjectClaims,
    GpcRevealedOwnerClaims,
};

/// Build the revealed claims for a proof.
///
/// `config` is the canonical configuration the proof was compiled from;
/// `outputs` are the circuit outputs of the proof run (the nullifier
/// hash is taken from there rather than recomputed).
pub(crate) fn extract_revealed_claims(
    config: &GpcProofConfig,
    inputs: &GpcProofInputs,
    outputs: &CircuitOutputs,
) -> Result<GpcRevealedClaims, GpcError> {
    let mut pods = BTreeMap::new();
    for (pod_name, pod_config) in &config.pods {
        let pod = inputs
            .pods
            .get(pod_name)
            .ok_or_else(|| GpcResolutionError::MissingPod(pod_name.to_string()))?;

        let mut entries = BTreeMap::new();
        for (entry_name, entry_config) in &pod_config.entries {
            if entry_config.reveals() {
                let value = pod.get(entry_name).ok_or_else(|| {
                    GpcResolutionError::MissingEntry {
                        pod: pod_name.to_string(),
                        entry: entry_name.to_string(),
                    }
                })?;
                entries.insert(entry_name.clone(), value.clone());
            }
        }
        let signer_revealed = pod_config
            .signer_public_key
            .as_ref()
            .map(|v| v.reveals())
            .unwrap_or(true);

        if entries.is_empty() && !signer_revealed {
            continue;
        }
        pods.insert(
            pod_name.clone(),
            GpcRevealedObjectClaims {
                entries: (!entries.is_empty()).then_some(entries),
                signer_public_key: signer_revealed
                    .then(|| pod.signer_public_key().clone()),
            },
        );
    }

    let owner = inputs.owner.as_ref().and_then(|owner| {
        owner
            .external_nullifier
            .as_ref()
            .map(|external_nullifier| GpcRevealedOwnerClaims {
                external_nullifier: external_nullifier.clone(),
                nullifier_hash: outputs.owner_revealed_nullifier_hash.clone(),
            })
    });

    Ok(GpcRevealedClaims {
        pods,
        owner,
        membership_lists: inputs.membership_lists.clone(),
        watermark: inputs.watermark.clone(),
    })
}
