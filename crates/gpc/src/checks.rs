//! # Pre-Flight Checks — Typed Validation Before Circuit Work
//!
//! Explicit validation functions invoked at the start of `prove` and
//! `verify`. Structural problems (malformed configs, dangling
//! references, ill-typed values) surface here as typed errors before any
//! circuit work begins; nothing in this module judges proof validity.

use std::collections::BTreeMap;

use gpc_core::PodName;
use gpc_pod::PodValue;

use crate::error::{GpcConfigError, GpcError, GpcResolutionError, GpcValueError};
use crate::types::{
    EntryRef, GpcBoundConfig, GpcProofConfig, GpcProofInputs, GpcRevealedClaims, ListShape,
    MembershipList, PodEntryIdentifier,
};

/// Validate a proof configuration on its own: structure, flags, and
/// internal references.
pub fn check_proof_config(config: &GpcProofConfig) -> Result<(), GpcError> {
    if config.pods.is_empty() {
        return Err(GpcConfigError::NoObjects.into());
    }
    for (pod_name, pod_config) in &config.pods {
        if pod_config.entries.is_empty() {
            return Err(GpcConfigError::NoEntries(pod_name.to_string()).into());
        }
        let owner_count = pod_config
            .entries
            .values()
            .filter(|entry| entry.is_owner())
            .count();
        if owner_count > 1 {
            return Err(GpcConfigError::MultipleOwnerEntries(pod_name.to_string()).into());
        }
        for entry_config in pod_config.entries.values() {
            if let Some(reference) = &entry_config.equals_entry {
                check_entry_ref(config, reference)?;
            }
        }
        if let Some(virtual_config) = &pod_config.signer_public_key {
            if let Some(reference) = &virtual_config.equals_entry {
                check_entry_ref(config, reference)?;
            }
        }
    }
    for (pod_name, pod_config) in &config.pods {
        for (entry_name, entry_config) in &pod_config.entries {
            if let Some(range) = entry_config.in_range {
                if range.min > range.max {
                    return Err(GpcConfigError::InvalidRange {
                        entry: format!("{pod_name}.{entry_name}"),
                        min: range.min,
                        max: range.max,
                    }
                    .into());
                }
            }
        }
    }
    for (tuple_name, tuple_config) in &config.tuples {
        if tuple_config.entries.len() < 2 {
            return Err(GpcConfigError::TupleTooNarrow(tuple_name.to_string()).into());
        }
        for reference in &tuple_config.entries {
            check_entry_ref(config, reference)?;
        }
    }
    // Secondary owner entries are wired equal to the first owner entry;
    // an explicit equality constraint would contend for the same slot.
    let owners = owner_entries(config);
    for (pod_name, entry_name) in owners.iter().skip(1) {
        let entry_config = &config.pods[pod_name].entries[entry_name];
        if entry_config.equals_entry.is_some() {
            return Err(GpcConfigError::OwnerEqualityConflict(format!(
                "{pod_name}.{entry_name}"
            ))
            .into());
        }
    }
    Ok(())
}

/// Validate concrete inputs against a (checked) configuration.
pub fn check_proof_inputs(
    config: &GpcProofConfig,
    inputs: &GpcProofInputs,
) -> Result<(), GpcError> {
    for pod_name in config.pods.keys() {
        if !inputs.pods.contains_key(pod_name) {
            return Err(GpcResolutionError::MissingPod(pod_name.to_string()).into());
        }
    }
    for pod_name in inputs.pods.keys() {
        if !config.pods.contains_key(pod_name) {
            return Err(GpcResolutionError::UnconfiguredPod(pod_name.to_string()).into());
        }
    }
    for (pod_name, pod_config) in &config.pods {
        let pod = &inputs.pods[pod_name];
        pod.verify()?;
        for (entry_name, entry_config) in &pod_config.entries {
            let value = pod.get(entry_name).ok_or_else(|| {
                GpcResolutionError::MissingEntry {
                    pod: pod_name.to_string(),
                    entry: entry_name.to_string(),
                }
            })?;
            if entry_config.in_range.is_some() && value.as_int().is_none() {
                return Err(GpcValueError::RangeOnNonInt(format!(
                    "{pod_name}.{entry_name}"
                ))
                .into());
            }
        }
    }

    let has_owner_entry = !owner_entries(config).is_empty();
    match (&inputs.owner, has_owner_entry) {
        (None, true) => return Err(GpcResolutionError::MissingOwner.into()),
        (Some(_), false) => return Err(GpcResolutionError::UnusedOwner.into()),
        _ => {}
    }
    if let Some(owner) = &inputs.owner {
        if let Some(external_nullifier) = &owner.external_nullifier {
            check_value("externalNullifier", external_nullifier)?;
        }
    }
    if let Some(watermark) = &inputs.watermark {
        check_value("watermark", watermark)?;
    }

    check_membership_lists(config, &inputs.membership_lists)?;
    Ok(())
}

/// Validate a bound configuration's structure.
pub fn check_bound_config(bound: &GpcBoundConfig) -> Result<(), GpcError> {
    check_proof_config(&bound.to_proof_config())
}

/// Validate revealed claims against a (checked) bound configuration.
///
/// This enforces structural agreement only: every configured reveal has
/// a claimed counterpart and vice versa, and all claimed values are
/// well-formed. Whether the claimed values are *true* is the proof's
/// business.
pub fn check_revealed_claims(
    bound: &GpcBoundConfig,
    claims: &GpcRevealedClaims,
) -> Result<(), GpcError> {
    for (pod_name, pod_config) in &bound.pods {
        let revealed_entries: Vec<&PodName> = pod_config
            .entries
            .iter()
            .filter(|(_, entry)| entry.reveals())
            .map(|(name, _)| name)
            .collect();
        let signer_revealed = pod_config
            .signer_public_key
            .as_ref()
            .map(|v| v.reveals())
            .unwrap_or(true);
        let expected_in_claims = !revealed_entries.is_empty() || signer_revealed;

        let Some(pod_claims) = claims.pods.get(pod_name) else {
            if let Some(entry_name) = revealed_entries.first() {
                return Err(GpcResolutionError::MissingRevealedEntry(format!(
                    "{pod_name}.{entry_name}"
                ))
                .into());
            }
            if signer_revealed {
                return Err(
                    GpcResolutionError::MissingSignerKey(pod_name.to_string()).into()
                );
            }
            continue;
        };
        if !expected_in_claims {
            return Err(GpcResolutionError::UnexpectedPodClaims(pod_name.to_string()).into());
        }

        let claimed_entries = pod_claims.entries.as_ref();
        for entry_name in &revealed_entries {
            let value = claimed_entries.and_then(|entries| entries.get(*entry_name));
            match value {
                None => {
                    return Err(GpcResolutionError::MissingRevealedEntry(format!(
                        "{pod_name}.{entry_name}"
                    ))
                    .into())
                }
                Some(value) => check_value(&format!("{pod_name}.{entry_name}"), value)?,
            }
        }
        if let Some(entries) = claimed_entries {
            for entry_name in entries.keys() {
                let configured_reveal = pod_config
                    .entries
                    .get(entry_name)
                    .map(|entry| entry.reveals())
                    .unwrap_or(false);
                if !configured_reveal {
                    return Err(GpcResolutionError::UnexpectedRevealedEntry(format!(
                        "{pod_name}.{entry_name}"
                    ))
                    .into());
                }
            }
        }

        match (signer_revealed, pod_claims.signer_public_key.is_some()) {
            (true, false) => {
                return Err(
                    GpcResolutionError::MissingSignerKey(pod_name.to_string()).into()
                )
            }
            (false, true) => {
                return Err(
                    GpcResolutionError::UnexpectedSignerKey(pod_name.to_string()).into()
                )
            }
            _ => {}
        }
    }
    for pod_name in claims.pods.keys() {
        if !bound.pods.contains_key(pod_name) {
            return Err(GpcResolutionError::UnconfiguredPod(pod_name.to_string()).into());
        }
    }

    if let Some(owner) = &claims.owner {
        check_value("externalNullifier", &owner.external_nullifier)?;
    }
    if let Some(watermark) = &claims.watermark {
        check_value("watermark", watermark)?;
    }

    check_membership_lists(&bound.to_proof_config(), &claims.membership_lists)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// All `(pod, entry)` pairs flagged as owner ID, in canonical slot order.
pub(crate) fn owner_entries(config: &GpcProofConfig) -> Vec<(PodName, PodName)> {
    let mut owners = Vec::new();
    for (pod_name, pod_config) in &config.pods {
        for (entry_name, entry_config) in &pod_config.entries {
            if entry_config.is_owner() {
                owners.push((pod_name.clone(), entry_name.clone()));
            }
        }
    }
    owners
}

/// The element shape each referenced membership list must have, in the
/// order constraints reference them.
pub(crate) fn list_shape_requirements(
    config: &GpcProofConfig,
) -> Result<BTreeMap<PodName, ListShape>, GpcError> {
    let mut shapes: BTreeMap<PodName, ListShape> = BTreeMap::new();
    let mut require = |list: &PodName, shape: ListShape| -> Result<(), GpcError> {
        let existing = shapes.get(list).copied();
        match existing {
            Some(existing) if existing != shape => Err(GpcValueError::ListShapeMismatch {
                list: list.to_string(),
                expected: existing.to_string(),
            }
            .into()),
            _ => {
                shapes.insert(list.clone(), shape);
                Ok(())
            }
        }
    };
    for pod_config in config.pods.values() {
        for entry_config in pod_config.entries.values() {
            for list in [&entry_config.is_member_of, &entry_config.is_not_member_of]
                .into_iter()
                .flatten()
            {
                require(list, ListShape::Values)?;
            }
        }
        if let Some(virtual_config) = &pod_config.signer_public_key {
            for list in [&virtual_config.is_member_of, &virtual_config.is_not_member_of]
                .into_iter()
                .flatten()
            {
                require(list, ListShape::Values)?;
            }
        }
    }
    for tuple_config in config.tuples.values() {
        let arity = tuple_config.entries.len();
        for list in [&tuple_config.is_member_of, &tuple_config.is_not_member_of]
            .into_iter()
            .flatten()
        {
            require(list, ListShape::Tuples(arity))?;
        }
    }
    Ok(shapes)
}

fn check_membership_lists(
    config: &GpcProofConfig,
    lists: &BTreeMap<PodName, MembershipList>,
) -> Result<(), GpcError> {
    let required = list_shape_requirements(config)?;
    for (list_name, expected_shape) in &required {
        let list = lists
            .get(list_name)
            .ok_or_else(|| GpcResolutionError::MissingList(list_name.to_string()))?;
        if list.is_empty() {
            return Err(GpcValueError::EmptyList(list_name.to_string()).into());
        }
        let shape = list
            .shape()
            .ok_or_else(|| GpcValueError::MixedList(list_name.to_string()))?;
        if shape != *expected_shape {
            return Err(GpcValueError::ListShapeMismatch {
                list: list_name.to_string(),
                expected: expected_shape.to_string(),
            }
            .into());
        }
        for value in list.values() {
            check_value(&format!("list {list_name}"), value)?;
        }
    }
    for list_name in lists.keys() {
        if !required.contains_key(list_name) {
            return Err(GpcResolutionError::UnreferencedList(list_name.to_string()).into());
        }
    }
    Ok(())
}

fn check_entry_ref(
    config: &GpcProofConfig,
    reference: &PodEntryIdentifier,
) -> Result<(), GpcError> {
    let resolves = match config.pods.get(&reference.pod) {
        None => false,
        Some(pod_config) => match &reference.entry {
            EntryRef::SignerPublicKey => true,
            EntryRef::Entry(entry_name) => pod_config.entries.contains_key(entry_name),
        },
    };
    if resolves {
        Ok(())
    } else {
        Err(GpcResolutionError::DanglingEntryRef(reference.to_string()).into())
    }
}

fn check_value(name: &str, value: &PodValue) -> Result<(), GpcError> {
    value.validate().map_err(|e| {
        GpcError::Value(GpcValueError::InvalidValue {
            name: name.to_string(),
            reason: e.to_string(),
        })
    })
}
