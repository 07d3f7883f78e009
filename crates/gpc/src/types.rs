//! # Proof Data Model — Configs, Inputs, and Claims
//!
//! The declarative data model callers use to describe a proof and read
//! its result:
//!
//! - [`GpcProofConfig`]: which entries of which PODs are constrained, and
//!   how.
//! - [`GpcBoundConfig`]: a config bound to the circuit that proved it.
//! - [`GpcProofInputs`]: the concrete PODs, owner identity, membership
//!   lists, and watermark.
//! - [`GpcRevealedClaims`]: what a verifier can trust after verification.
//!
//! Wire format uses camelCase field names with defaults omitted, so a
//! serialized canonical config is also canonical JSON.

use std::collections::BTreeMap;
use std::str::FromStr;

use gpc_core::PodName;
use gpc_crypto::{OwnerIdentity, SignerPublicKey};
use gpc_pod::{Pod, PodValue};
use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// The name of the virtual entry carrying a POD's signer public key,
/// usable in `equalsEntry` references as `alias.$signerPublicKey`.
pub const SIGNER_PUBLIC_KEY_ENTRY: &str = "$signerPublicKey";

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Error parsing a `pod.entry` or circuit identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid identifier {0:?}: {1}")]
pub struct IdentifierError(pub String, pub &'static str);

/// What an entry reference points at: a real named entry, or the virtual
/// signer-public-key entry of an object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntryRef {
    /// A named entry.
    Entry(PodName),
    /// The object's signer public key.
    SignerPublicKey,
}

/// A reference to an entry of a configured POD, written `alias.entry`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PodEntryIdentifier {
    /// The POD alias.
    pub pod: PodName,
    /// The referenced entry.
    pub entry: EntryRef,
}

impl PodEntryIdentifier {
    /// Reference a named entry of a POD.
    pub fn entry(pod: PodName, entry: PodName) -> Self {
        Self {
            pod,
            entry: EntryRef::Entry(entry),
        }
    }

    /// Reference the signer public key of a POD.
    pub fn signer_public_key(pod: PodName) -> Self {
        Self {
            pod,
            entry: EntryRef::SignerPublicKey,
        }
    }
}

impl std::fmt::Display for PodEntryIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.entry {
            EntryRef::Entry(name) => write!(f, "{}.{}", self.pod, name),
            EntryRef::SignerPublicKey => write!(f, "{}.{}", self.pod, SIGNER_PUBLIC_KEY_ENTRY),
        }
    }
}

impl FromStr for PodEntryIdentifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (pod, entry) = s
            .split_once('.')
            .ok_or(IdentifierError(s.to_string(), "expected alias.entry"))?;
        let pod = PodName::new(pod)
            .map_err(|_| IdentifierError(s.to_string(), "invalid POD alias"))?;
        let entry = if entry == SIGNER_PUBLIC_KEY_ENTRY {
            EntryRef::SignerPublicKey
        } else {
            EntryRef::Entry(
                PodName::new(entry)
                    .map_err(|_| IdentifierError(s.to_string(), "invalid entry name"))?,
            )
        };
        Ok(Self { pod, entry })
    }
}

impl Serialize for PodEntryIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PodEntryIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A circuit identifier, `family_circuitName`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GpcIdentifier(String);

impl GpcIdentifier {
    /// Wrap a `family_circuitName` identifier.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    /// Build an identifier from its parts.
    pub fn from_parts(family: &str, circuit: &str) -> Self {
        Self(format!("{family}_{circuit}"))
    }

    /// The identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into `(family, circuitName)`. `None` when no separator is
    /// present, or a side is empty.
    pub fn split(&self) -> Option<(&str, &str)> {
        let (family, circuit) = self.0.split_once('_')?;
        if family.is_empty() || circuit.is_empty() {
            return None;
        }
        Some((family, circuit))
    }
}

impl std::fmt::Display for GpcIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for GpcIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for GpcIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self(String::deserialize(deserializer)?))
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// A signed integer range for bounds checks, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    /// Inclusive lower bound.
    pub min: i64,
    /// Inclusive upper bound.
    pub max: i64,
}

/// Constraints on one named entry.
///
/// Boolean fields are tri-state (`None` = default) so an explicitly
/// spelled default survives deserialization and canonicalization can
/// strip it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GpcProofEntryConfig {
    /// Reveal this entry's value in the claims. Default false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_revealed: Option<bool>,

    /// Bind this entry to the owner's identity commitment. Default false.
    #[serde(rename = "isOwnerID", skip_serializing_if = "Option::is_none")]
    pub is_owner_id: Option<bool>,

    /// Constrain this entry equal to another configured entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equals_entry: Option<PodEntryIdentifier>,

    /// Constrain this entry's value to lie in a named list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_member_of: Option<PodName>,

    /// Constrain this entry's value to lie outside a named list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_not_member_of: Option<PodName>,

    /// Constrain this entry's int value to a signed range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_range: Option<IntRange>,
}

impl GpcProofEntryConfig {
    /// Effective reveal flag.
    pub fn reveals(&self) -> bool {
        self.is_revealed.unwrap_or(false)
    }

    /// Effective owner-ID flag.
    pub fn is_owner(&self) -> bool {
        self.is_owner_id.unwrap_or(false)
    }
}

/// Constraints on a virtual entry (the signer public key). The reveal
/// default for this virtual kind is *true*: signer identity is part of
/// what a verifier checks unless deliberately hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GpcVirtualEntryConfig {
    /// Reveal the signer public key in the claims. Default true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_revealed: Option<bool>,

    /// Constrain the signer key equal to another configured entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equals_entry: Option<PodEntryIdentifier>,

    /// Constrain the signer key to lie in a named list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_member_of: Option<PodName>,

    /// Constrain the signer key to lie outside a named list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_not_member_of: Option<PodName>,
}

impl GpcVirtualEntryConfig {
    /// Effective reveal flag for this virtual kind.
    pub fn reveals(&self) -> bool {
        self.is_revealed.unwrap_or(true)
    }
}

/// Constraints on one POD object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GpcProofObjectConfig {
    /// Per-entry constraints. Every named entry is proven present.
    pub entries: BTreeMap<PodName, GpcProofEntryConfig>,

    /// Constraints on the virtual signer-public-key entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_public_key: Option<GpcVirtualEntryConfig>,
}

/// A named tuple of entry references with its own membership constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GpcProofTupleConfig {
    /// Ordered entry references; arity is at least 2.
    pub entries: Vec<PodEntryIdentifier>,

    /// Constrain the tuple to lie in a named list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_member_of: Option<PodName>,

    /// Constrain the tuple to lie outside a named list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_not_member_of: Option<PodName>,
}

/// A declarative proof configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GpcProofConfig {
    /// Constraints per POD alias.
    pub pods: BTreeMap<PodName, GpcProofObjectConfig>,

    /// Named tuples over configured entries.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tuples: BTreeMap<PodName, GpcProofTupleConfig>,

    /// Optionally pin the circuit to prove with instead of letting the
    /// library pick the cheapest fit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circuit_identifier: Option<GpcIdentifier>,
}

/// A proof configuration bound to the circuit that proved it. Produced
/// once at proving time and treated as immutable evidence thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GpcBoundConfig {
    /// The circuit this configuration was proved against.
    pub circuit_identifier: GpcIdentifier,

    /// Constraints per POD alias.
    pub pods: BTreeMap<PodName, GpcProofObjectConfig>,

    /// Named tuples over configured entries.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tuples: BTreeMap<PodName, GpcProofTupleConfig>,
}

impl GpcBoundConfig {
    /// View this bound config as a plain proof config (with the circuit
    /// pinned), for code paths shared with proving.
    pub fn to_proof_config(&self) -> GpcProofConfig {
        GpcProofConfig {
            pods: self.pods.clone(),
            tuples: self.tuples.clone(),
            circuit_identifier: Some(self.circuit_identifier.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The owner's identity and proof context.
#[derive(Debug, Clone)]
pub struct GpcProofOwnerInputs {
    /// The owner's secret identity.
    pub identity: OwnerIdentity,

    /// Context value for nullifier computation. When present, the
    /// nullifier hash is revealed in the claims.
    pub external_nullifier: Option<PodValue>,
}

/// A membership list: a uniform sequence of single values or of
/// fixed-arity tuples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MembershipList {
    /// Single values, compared against one entry.
    Values(Vec<PodValue>),
    /// Tuples of values, compared against a configured tuple.
    Tuples(Vec<Vec<PodValue>>),
}

/// The shape of a membership list's elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListShape {
    /// Single values.
    Values,
    /// Tuples of the given arity.
    Tuples(usize),
}

impl std::fmt::Display for ListShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Values => f.write_str("values"),
            Self::Tuples(arity) => write!(f, "{arity}-tuples"),
        }
    }
}

impl MembershipList {
    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            Self::Values(v) => v.len(),
            Self::Tuples(t) => t.len(),
        }
    }

    /// True when the list has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The uniform element shape, or `None` when elements disagree (or
    /// the list is empty).
    pub fn shape(&self) -> Option<ListShape> {
        match self {
            Self::Values(v) if !v.is_empty() => Some(ListShape::Values),
            Self::Tuples(t) => {
                let arity = t.first()?.len();
                if arity >= 2 && t.iter().all(|tuple| tuple.len() == arity) {
                    Some(ListShape::Tuples(arity))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Iterate all contained values, for validation.
    pub fn values(&self) -> Box<dyn Iterator<Item = &PodValue> + '_> {
        match self {
            Self::Values(v) => Box::new(v.iter()),
            Self::Tuples(t) => Box::new(t.iter().flatten()),
        }
    }
}

/// Concrete inputs to a proof.
#[derive(Debug, Clone)]
pub struct GpcProofInputs {
    /// PODs keyed by the same aliases as the configuration.
    pub pods: BTreeMap<PodName, Pod>,

    /// The owner's identity, required when any entry sets `isOwnerID`.
    pub owner: Option<GpcProofOwnerInputs>,

    /// Named membership lists referenced by the configuration.
    pub membership_lists: BTreeMap<PodName, MembershipList>,

    /// Arbitrary public value bound into the proof.
    pub watermark: Option<PodValue>,
}

// ---------------------------------------------------------------------------
// Claims
// ---------------------------------------------------------------------------

/// What one POD reveals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GpcRevealedObjectClaims {
    /// Revealed entries and their values. Absent when nothing is
    /// revealed beyond the signer key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<BTreeMap<PodName, PodValue>>,

    /// The POD's signer public key; present unless deliberately hidden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_public_key: Option<SignerPublicKey>,
}

/// What the owner module reveals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GpcRevealedOwnerClaims {
    /// The context value the nullifier hash was computed against.
    pub external_nullifier: PodValue,

    /// The revealed nullifier hash.
    #[serde(with = "gpc_core::field::dec_string")]
    pub nullifier_hash: BigUint,
}

/// Everything a verifier can trust after a successful verification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GpcRevealedClaims {
    /// Revealed data per POD. Only PODs revealing something appear.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pods: BTreeMap<PodName, GpcRevealedObjectClaims>,

    /// Owner claims, present when a nullifier hash was revealed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<GpcRevealedOwnerClaims>,

    /// Membership lists, copied verbatim: the circuit proves membership
    /// but the list contents are public.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub membership_lists: BTreeMap<PodName, MembershipList>,

    /// The watermark, verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark: Option<PodValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> PodName {
        PodName::new(s).unwrap()
    }

    #[test]
    fn test_entry_identifier_parse_display() {
        let id: PodEntryIdentifier = "pod1.ticketID".parse().unwrap();
        assert_eq!(id, PodEntryIdentifier::entry(name("pod1"), name("ticketID")));
        assert_eq!(id.to_string(), "pod1.ticketID");
    }

    #[test]
    fn test_entry_identifier_signer_public_key() {
        let id: PodEntryIdentifier = "pod1.$signerPublicKey".parse().unwrap();
        assert_eq!(id.entry, EntryRef::SignerPublicKey);
        assert_eq!(id.to_string(), "pod1.$signerPublicKey");
    }

    #[test]
    fn test_entry_identifier_rejects_garbage() {
        assert!("nodot".parse::<PodEntryIdentifier>().is_err());
        assert!("bad name.entry".parse::<PodEntryIdentifier>().is_err());
        assert!("pod.bad entry".parse::<PodEntryIdentifier>().is_err());
    }

    #[test]
    fn test_circuit_identifier_split() {
        let id = GpcIdentifier::from_parts("proto-pod-gpc", "1o-1e-5md-0nv-0x0l-0x2t");
        assert_eq!(
            id.split(),
            Some(("proto-pod-gpc", "1o-1e-5md-0nv-0x0l-0x2t"))
        );
        assert!(GpcIdentifier::new("no-separator").split().is_none());
        assert!(GpcIdentifier::new("_leading").split().is_none());
    }

    #[test]
    fn test_entry_config_defaults_skip_serialization() {
        let config = GpcProofEntryConfig::default();
        assert_eq!(serde_json::to_string(&config).unwrap(), "{}");
        assert!(!config.reveals());
        assert!(!config.is_owner());
    }

    #[test]
    fn test_entry_config_explicit_false_survives_deserialization() {
        let config: GpcProofEntryConfig =
            serde_json::from_str(r#"{"isRevealed":false}"#).unwrap();
        assert_eq!(config.is_revealed, Some(false));
        assert!(!config.reveals());
    }

    #[test]
    fn test_entry_config_unknown_field_rejected() {
        let result: Result<GpcProofEntryConfig, _> =
            serde_json::from_str(r#"{"isHidden":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_virtual_entry_reveal_defaults_true() {
        assert!(GpcVirtualEntryConfig::default().reveals());
        let hidden: GpcVirtualEntryConfig =
            serde_json::from_str(r#"{"isRevealed":false}"#).unwrap();
        assert!(!hidden.reveals());
    }

    #[test]
    fn test_config_wire_format() {
        let mut entries = BTreeMap::new();
        entries.insert(
            name("ticketID"),
            GpcProofEntryConfig {
                is_revealed: Some(true),
                ..Default::default()
            },
        );
        let mut pods = BTreeMap::new();
        pods.insert(name("somePodName"), GpcProofObjectConfig {
            entries,
            signer_public_key: None,
        });
        let config = GpcProofConfig {
            pods,
            tuples: BTreeMap::new(),
            circuit_identifier: None,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"pods":{"somePodName":{"entries":{"ticketID":{"isRevealed":true}}}}}"#
        );
        let back: GpcProofConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_bound_config_requires_identifier() {
        let result: Result<GpcBoundConfig, _> = serde_json::from_str(r#"{"pods":{}}"#);
        assert!(result.is_err(), "bound config must include circuit identifier");
    }

    #[test]
    fn test_membership_list_shapes() {
        let values = MembershipList::Values(vec![PodValue::Int(1), PodValue::Int(2)]);
        assert_eq!(values.shape(), Some(ListShape::Values));
        assert_eq!(values.len(), 2);

        let tuples = MembershipList::Tuples(vec![
            vec![PodValue::Int(1), PodValue::Int(2)],
            vec![PodValue::Int(3), PodValue::Int(4)],
        ]);
        assert_eq!(tuples.shape(), Some(ListShape::Tuples(2)));

        let ragged = MembershipList::Tuples(vec![
            vec![PodValue::Int(1), PodValue::Int(2)],
            vec![PodValue::Int(3)],
        ]);
        assert_eq!(ragged.shape(), None);

        let empty = MembershipList::Values(vec![]);
        assert_eq!(empty.shape(), None);
    }

    #[test]
    fn test_membership_list_untagged_serde() {
        let values = MembershipList::Values(vec![PodValue::Int(7)]);
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[{"type":"int","value":7}]"#);
        let back: MembershipList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);

        let tuples = MembershipList::Tuples(vec![vec![PodValue::Int(1), PodValue::Int(2)]]);
        let json = serde_json::to_string(&tuples).unwrap();
        let back: MembershipList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tuples);
    }

    #[test]
    fn test_claims_wire_format_skips_empty_sections() {
        let claims = GpcRevealedClaims::default();
        assert_eq!(serde_json::to_string(&claims).unwrap(), "{}");
    }
}
