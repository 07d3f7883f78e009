//! Shared fixtures for the proof-layer integration tests: deterministic
//! signing keys, a sample owner identity, and two sample PODs shaped
//! like real ticketing data.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;

use gpc::{GpcProofConfig, GpcProofInputs, GpcProofOwnerInputs, MembershipList};
use gpc_core::PodName;
use gpc_crypto::{OwnerIdentity, SigningKeypair};
use gpc_pod::{Pod, PodValue};
use num_bigint::BigUint;

pub fn artifacts_path() -> &'static Path {
    Path::new("test-artifacts")
}

pub fn name(s: &str) -> PodName {
    PodName::new(s).unwrap()
}

pub fn private_key() -> SigningKeypair {
    SigningKeypair::from_seed(&[42u8; 32])
}

pub fn owner_identity() -> OwnerIdentity {
    OwnerIdentity::from_secrets(BigUint::from(12345u32), BigUint::from(67890u32))
}

pub fn crypt(v: u64) -> PodValue {
    PodValue::cryptographic(BigUint::from(v)).unwrap()
}

/// Entries for the primary sample POD ("pod1"): a mix of ints, strings,
/// a cryptographic value, and the owner's identity commitment.
pub fn sample_entries() -> BTreeMap<PodName, PodValue> {
    let mut entries = BTreeMap::new();
    entries.insert(name("A"), PodValue::Int(123));
    entries.insert(name("B"), PodValue::Int(321));
    entries.insert(name("C"), PodValue::String("hello".to_string()));
    entries.insert(name("E"), PodValue::Int(123));
    entries.insert(name("F"), crypt(4294967295));
    entries.insert(name("G"), PodValue::Int(7));
    entries.insert(name("otherTicketID"), PodValue::Int(7777));
    entries.insert(
        name("owner"),
        PodValue::Cryptographic(owner_identity().commitment()),
    );
    entries
}

/// Entries for the secondary sample POD ("pod2"), a small ticket.
pub fn sample_entries2() -> BTreeMap<PodName, PodValue> {
    let mut entries = BTreeMap::new();
    entries.insert(name("ticketID"), crypt(999));
    entries.insert(
        name("attendee"),
        PodValue::Cryptographic(owner_identity().commitment()),
    );
    entries.insert(name("eventID"), PodValue::Int(456));
    entries.insert(name("venue"), PodValue::String("main hall".to_string()));
    entries.insert(name("supply"), PodValue::Int(100));
    entries
}

pub fn sample_pod() -> Pod {
    Pod::sign(sample_entries(), &private_key()).unwrap()
}

pub fn sample_pod2() -> Pod {
    Pod::sign(sample_entries2(), &private_key()).unwrap()
}

/// Parse a proof config from inline JSON, which doubles as a wire-format
/// exercise.
pub fn config_from_json(json: serde_json::Value) -> GpcProofConfig {
    serde_json::from_value(json).unwrap()
}

/// The minimal scenario: one POD, one revealed entry, no other modules.
pub fn minimal_config() -> GpcProofConfig {
    config_from_json(serde_json::json!({
        "pods": {
            "somePodName": {
                "entries": {
                    "ticketID": { "isRevealed": true }
                }
            }
        }
    }))
}

pub fn minimal_inputs(watermark: Option<PodValue>) -> GpcProofInputs {
    let mut pods = BTreeMap::new();
    pods.insert(name("somePodName"), sample_pod2());
    GpcProofInputs {
        pods,
        owner: None,
        membership_lists: BTreeMap::new(),
        watermark,
    }
}

pub fn owner_inputs(external_nullifier: Option<PodValue>) -> GpcProofOwnerInputs {
    GpcProofOwnerInputs {
        identity: owner_identity(),
        external_nullifier,
    }
}

pub fn values_list(values: Vec<PodValue>) -> MembershipList {
    MembershipList::Values(values)
}

pub fn tuples_list(tuples: Vec<Vec<PodValue>>) -> MembershipList {
    MembershipList::Tuples(tuples)
}
