//! # Circuit Family — Descriptor Registry
//!
//! The set of pre-compiled circuits available to carry proofs. The family
//! is an explicitly constructed, immutable table: callers build it once
//! (usually via [`CircuitFamily::proto_pod_gpc`], which reads the
//! generated metadata embedded in this crate) and share a reference with
//! the proof driver. Tests construct synthetic families the same way.
//!
//! Descriptors are held in ascending cost order, so the first member that
//! meets a requirement set is also the cheapest.

use serde::{Deserialize, Serialize};

use crate::params::{GpcCircuitParams, PROTO_POD_GPC_FAMILY_NAME};

/// Generated metadata: ordered `[circuit params, constraint cost]` pairs.
/// This file's schema is the only persisted layout this layer owns.
const CIRCUIT_PARAMETERS_JSON: &str = include_str!("../data/circuit_parameters.json");

/// Description of one pre-compiled circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitDesc {
    /// The family this circuit belongs to.
    pub family: String,
    /// The circuit's name within the family, derived from its parameters.
    pub name: String,
    /// Proving cost, in constraints.
    pub cost: u64,
    /// The circuit's size parameters.
    #[serde(flatten)]
    pub params: GpcCircuitParams,
}

/// An immutable, cost-ordered table of circuit descriptors.
#[derive(Debug, Clone)]
pub struct CircuitFamily {
    family_name: String,
    circuits: Vec<CircuitDesc>,
}

impl CircuitFamily {
    /// Build a family from `(params, cost)` pairs. Descriptors are sorted
    /// by ascending cost; names are derived from the parameters.
    pub fn from_parameters(
        family_name: impl Into<String>,
        parameters: impl IntoIterator<Item = (GpcCircuitParams, u64)>,
    ) -> Self {
        let family_name = family_name.into();
        let mut circuits: Vec<CircuitDesc> = parameters
            .into_iter()
            .map(|(params, cost)| CircuitDesc {
                family: family_name.clone(),
                name: params.circuit_name(),
                cost,
                params,
            })
            .collect();
        circuits.sort_by_key(|c| c.cost);
        Self {
            family_name,
            circuits,
        }
    }

    /// The family shipped with this crate, loaded from the generated
    /// metadata file. Constructed fresh on each call; hold it in one place
    /// and share a reference.
    pub fn proto_pod_gpc() -> Self {
        let pairs: Vec<(GpcCircuitParams, u64)> = serde_json::from_str(CIRCUIT_PARAMETERS_JSON)
            .expect("embedded circuit metadata parses");
        Self::from_parameters(PROTO_POD_GPC_FAMILY_NAME, pairs)
    }

    /// The family's name.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// All descriptors, cheapest first.
    pub fn circuits(&self) -> &[CircuitDesc] {
        &self.circuits
    }

    /// The smallest circuit able to handle the required parameters, or
    /// `None` if no family member is large enough.
    pub fn pick_circuit(&self, required: &GpcCircuitParams) -> Option<&CircuitDesc> {
        self.circuits
            .iter()
            .find(|desc| desc.params.meets_requirements(*required))
    }

    /// Exact-name lookup scoped to a family. A mismatched family name is
    /// immediately a miss.
    pub fn find_circuit(&self, family_name: &str, circuit_name: &str) -> Option<&CircuitDesc> {
        if family_name != self.family_name {
            return None;
        }
        self.circuits.iter().find(|desc| desc.name == circuit_name)
    }
}

/// The component-wise maximum of two requirement sets: the merged
/// parameters meet both inputs.
pub fn merge_required_params(a: &GpcCircuitParams, b: &GpcCircuitParams) -> GpcCircuitParams {
    let a = a.to_array();
    let b = b.to_array();
    let mut merged = [0usize; 8];
    for (i, slot) in merged.iter_mut().enumerate() {
        *slot = a[i].max(b[i]);
    }
    GpcCircuitParams::from_array(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(max_entries: usize) -> GpcCircuitParams {
        GpcCircuitParams {
            max_objects: 1,
            max_entries,
            merkle_max_depth: 5,
            max_numeric_values: 0,
            max_lists: 0,
            max_list_elements: 0,
            max_tuples: 0,
            tuple_arity: 2,
        }
    }

    #[test]
    fn test_shipped_family_loads_sorted() {
        let family = CircuitFamily::proto_pod_gpc();
        assert!(!family.circuits().is_empty());
        let costs: Vec<u64> = family.circuits().iter().map(|c| c.cost).collect();
        let mut sorted = costs.clone();
        sorted.sort_unstable();
        assert_eq!(costs, sorted);
        for desc in family.circuits() {
            assert_eq!(desc.family, PROTO_POD_GPC_FAMILY_NAME);
            assert_eq!(desc.name, desc.params.circuit_name());
            assert!(desc.params.tuple_arity >= 2);
        }
    }

    #[test]
    fn test_pick_returns_cheapest_qualifying() {
        let family = CircuitFamily::proto_pod_gpc();
        let picked = family.pick_circuit(&small(1)).expect("a circuit fits");
        assert_eq!(picked.name, family.circuits()[0].name);
    }

    #[test]
    fn test_pick_skips_too_small_members() {
        let family = CircuitFamily::proto_pod_gpc();
        let picked = family.pick_circuit(&small(6)).expect("a circuit fits");
        assert!(picked.params.max_entries >= 6);
        // Every cheaper member must genuinely fail the requirement.
        for desc in family.circuits() {
            if desc.cost < picked.cost {
                assert!(!desc.params.meets_requirements(small(6)));
            }
        }
    }

    #[test]
    fn test_pick_none_when_nothing_fits() {
        let family = CircuitFamily::proto_pod_gpc();
        let mut required = small(1);
        required.max_objects = 1000;
        assert!(family.pick_circuit(&required).is_none());
    }

    #[test]
    fn test_find_circuit_by_name() {
        let family = CircuitFamily::proto_pod_gpc();
        let first = &family.circuits()[0];
        let found = family
            .find_circuit(PROTO_POD_GPC_FAMILY_NAME, &first.name)
            .expect("lookup by exact name");
        assert_eq!(found, first);
    }

    #[test]
    fn test_find_circuit_wrong_family_misses() {
        let family = CircuitFamily::proto_pod_gpc();
        let first = &family.circuits()[0];
        assert!(family.find_circuit("other-family", &first.name).is_none());
    }

    #[test]
    fn test_find_circuit_unknown_name_misses() {
        let family = CircuitFamily::proto_pod_gpc();
        assert!(family
            .find_circuit(PROTO_POD_GPC_FAMILY_NAME, "99o-99e-99md")
            .is_none());
    }

    #[test]
    fn test_merge_is_componentwise_max() {
        let mut a = small(3);
        a.max_lists = 2;
        let mut b = small(1);
        b.merkle_max_depth = 9;
        let merged = merge_required_params(&a, &b);
        assert_eq!(merged.max_entries, 3);
        assert_eq!(merged.max_lists, 2);
        assert_eq!(merged.merkle_max_depth, 9);
        assert!(merged.meets_requirements(a));
        assert!(merged.meets_requirements(b));
    }

    #[test]
    fn test_synthetic_family_sorts_by_cost() {
        let family = CircuitFamily::from_parameters(
            "test-family",
            vec![(small(8), 500), (small(1), 100), (small(4), 300)],
        );
        let costs: Vec<u64> = family.circuits().iter().map(|c| c.cost).collect();
        assert_eq!(costs, vec![100, 300, 500]);
        assert_eq!(family.family_name(), "test-family");
    }
}
