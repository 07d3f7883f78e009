//! # Requirement Derivation — Minimum Circuit Parameters
//!
//! Computes the lower bound on circuit size parameters a configuration
//! and its inputs need. This is a pure function of config shape (plus
//! the concrete POD sizes and list lengths); it never depends on which
//! circuit is eventually chosen, which is what keeps circuit selection a
//! separate, later step.

use gpc_circuits::params::GpcCircuitParams;

use crate::checks::list_shape_requirements;
use crate::error::{GpcError, GpcResolutionError};
use crate::types::{GpcProofConfig, GpcProofInputs};

/// The minimum arity the registry can represent. A tuple-free config
/// still derives this value so every family member (all of which carry
/// `tuple_arity >= 2`) can satisfy it.
const MIN_TUPLE_ARITY: usize = 2;

/// Derive the minimum circuit parameters for a configuration and its
/// inputs.
pub fn derive_requirements(
    config: &GpcProofConfig,
    inputs: &GpcProofInputs,
) -> Result<GpcCircuitParams, GpcError> {
    let max_objects = config.pods.len();
    let max_entries = config
        .pods
        .values()
        .map(|pod| pod.entries.len())
        .sum::<usize>();

    // Each object's proof depth is computed independently and maximized.
    let mut merkle_max_depth = 0;
    for pod_name in config.pods.keys() {
        let pod = inputs
            .pods
            .get(pod_name)
            .ok_or_else(|| GpcResolutionError::MissingPod(pod_name.to_string()))?;
        merkle_max_depth = merkle_max_depth.max(pod.merkle_depth());
    }

    let max_numeric_values = config
        .pods
        .values()
        .flat_map(|pod| pod.entries.values())
        .filter(|entry| entry.in_range.is_some())
        .count();

    let mut max_lists = 0;
    for pod in config.pods.values() {
        for entry in pod.entries.values() {
            max_lists += usize::from(entry.is_member_of.is_some());
            max_lists += usize::from(entry.is_not_member_of.is_some());
        }
        if let Some(virtual_config) = &pod.signer_public_key {
            max_lists += usize::from(virtual_config.is_member_of.is_some());
            max_lists += usize::from(virtual_config.is_not_member_of.is_some());
        }
    }
    for tuple in config.tuples.values() {
        max_lists += usize::from(tuple.is_member_of.is_some());
        max_lists += usize::from(tuple.is_not_member_of.is_some());
    }

    let mut max_list_elements = 0;
    for list_name in list_shape_requirements(config)?.keys() {
        let list = inputs
            .membership_lists
            .get(list_name)
            .ok_or_else(|| GpcResolutionError::MissingList(list_name.to_string()))?;
        max_list_elements = max_list_elements.max(list.len());
    }

    let max_tuples = config.tuples.len();
    let tuple_arity = config
        .tuples
        .values()
        .map(|tuple| tuple.entries.len())
        .max()
        .unwrap_or(MIN_TUPLE_ARITY)
        .max(MIN_TUPLE_ARITY);

    Ok(GpcCircuitParams {
        max_objects,
        max_entries,
        merkle_max_depth,
        max_numeric_values,
        max_lists,
        max_list_elements,
        max_tuples,
        tuple_arity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        GpcProofEntryConfig, GpcProofObjectConfig, GpcProofTupleConfig, IntRange,
        MembershipList, PodEntryIdentifier,
    };
    use gpc_core::PodName;
    use gpc_crypto::SigningKeypair;
    use gpc_pod::{Pod, PodValue};
    use std::collections::BTreeMap;

    fn name(s: &str) -> PodName {
        PodName::new(s).unwrap()
    }

    fn base_case(entry_count: usize) -> (GpcProofConfig, GpcProofInputs) {
        let keypair = SigningKeypair::from_seed(&[5u8; 32]);
        let mut entries = BTreeMap::new();
        let mut entry_configs = BTreeMap::new();
        for i in 0..entry_count {
            let entry_name = name(&format!("entry{i}"));
            entries.insert(entry_name.clone(), PodValue::Int(i as i64));
            entry_configs.insert(entry_name, GpcProofEntryConfig::default());
        }
        let mut pods_config = BTreeMap::new();
        pods_config.insert(name("pod1"), GpcProofObjectConfig {
            entries: entry_configs,
            signer_public_key: None,
        });
        let mut pods = BTreeMap::new();
        pods.insert(name("pod1"), Pod::sign(entries, &keypair).unwrap());
        (
            GpcProofConfig {
                pods: pods_config,
                ..Default::default()
            },
            GpcProofInputs {
                pods,
                owner: None,
                membership_lists: BTreeMap::new(),
                watermark: None,
            },
        )
    }

    #[test]
    fn test_minimal_requirements() {
        let (config, inputs) = base_case(1);
        let required = derive_requirements(&config, &inputs).unwrap();
        assert_eq!(required.max_objects, 1);
        assert_eq!(required.max_entries, 1);
        // 1 entry -> 2 leaves -> depth 1.
        assert_eq!(required.merkle_max_depth, 1);
        assert_eq!(required.max_numeric_values, 0);
        assert_eq!(required.max_lists, 0);
        assert_eq!(required.max_list_elements, 0);
        assert_eq!(required.max_tuples, 0);
        assert_eq!(required.tuple_arity, 2);
    }

    #[test]
    fn test_merkle_depth_tracks_largest_pod() {
        let (config, inputs) = base_case(5);
        let required = derive_requirements(&config, &inputs).unwrap();
        // 5 entries -> 10 leaves -> padded to 16 -> depth 4.
        assert_eq!(required.merkle_max_depth, 4);
    }

    #[test]
    fn test_numeric_and_list_counts() {
        let (mut config, mut inputs) = base_case(3);
        let pod = config.pods.get_mut(&name("pod1")).unwrap();
        pod.entries.get_mut(&name("entry0")).unwrap().in_range =
            Some(IntRange { min: 0, max: 100 });
        pod.entries.get_mut(&name("entry1")).unwrap().is_member_of = Some(name("allow"));
        pod.entries.get_mut(&name("entry1")).unwrap().is_not_member_of =
            Some(name("deny"));
        inputs.membership_lists.insert(
            name("allow"),
            MembershipList::Values(vec![PodValue::Int(1), PodValue::Int(2), PodValue::Int(3)]),
        );
        inputs.membership_lists.insert(
            name("deny"),
            MembershipList::Values(vec![PodValue::Int(9)]),
        );

        let required = derive_requirements(&config, &inputs).unwrap();
        assert_eq!(required.max_numeric_values, 1);
        assert_eq!(required.max_lists, 2);
        assert_eq!(required.max_list_elements, 3);
    }

    #[test]
    fn test_tuple_requirements() {
        let (mut config, inputs) = base_case(3);
        config.tuples.insert(
            name("tuple1"),
            GpcProofTupleConfig {
                entries: vec![
                    PodEntryIdentifier::entry(name("pod1"), name("entry0")),
                    PodEntryIdentifier::entry(name("pod1"), name("entry1")),
                    PodEntryIdentifier::entry(name("pod1"), name("entry2")),
                ],
                is_member_of: None,
                is_not_member_of: None,
            },
        );
        let required = derive_requirements(&config, &inputs).unwrap();
        assert_eq!(required.max_tuples, 1);
        assert_eq!(required.tuple_arity, 3);
    }

    #[test]
    fn test_requirement_monotonicity_under_added_constraints() {
        let (config, inputs) = base_case(2);
        let base = derive_requirements(&config, &inputs).unwrap();

        // Adding a list constraint never decreases any parameter.
        let mut with_list = config.clone();
        let mut with_list_inputs = inputs.clone();
        with_list
            .pods
            .get_mut(&name("pod1"))
            .unwrap()
            .entries
            .get_mut(&name("entry0"))
            .unwrap()
            .is_member_of = Some(name("allow"));
        with_list_inputs.membership_lists.insert(
            name("allow"),
            MembershipList::Values(vec![PodValue::Int(0)]),
        );
        let grown = derive_requirements(&with_list, &with_list_inputs).unwrap();
        assert!(grown.meets_requirements(base));

        // Adding an entry likewise.
        let (bigger_config, bigger_inputs) = base_case(3);
        let grown = derive_requirements(&bigger_config, &bigger_inputs).unwrap();
        assert!(grown.meets_requirements(base));
    }
}
