//! # Circuit Parameters — The Eight Size Knobs
//!
//! A family member is fully described by eight size parameters. Their
//! order is fixed: the array form below is what the generated metadata
//! file stores and what parameter merging operates on, and the derived
//! circuit name encodes them in the same order.

use serde::{Deserialize, Serialize};

/// Name identifier for the proto-pod-gpc family of circuits.
pub const PROTO_POD_GPC_FAMILY_NAME: &str = "proto-pod-gpc";

/// Configurable size parameters for a family member.
///
/// Also used to express the minimum requirements a configuration derives:
/// a circuit can carry a proof when each of its parameters is greater than
/// or equal to the corresponding required value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpcCircuitParams {
    /// Number of POD objects which can be included in a proof.
    pub max_objects: usize,

    /// Number of POD entries which can be included in a proof.
    pub max_entries: usize,

    /// Max depth of a POD merkle proof. Max entries in any object is
    /// 2^(depth-1).
    pub merkle_max_depth: usize,

    /// Number of numeric (bounds-checked) values.
    pub max_numeric_values: usize,

    /// Number of membership lists.
    pub max_lists: usize,

    /// Number of elements in each membership list included in a proof.
    pub max_list_elements: usize,

    /// Number of tuple slots which can be included in a proof.
    pub max_tuples: usize,

    /// Arity (i.e. width) of each tuple slot, e.g. 2 for pairs or 3 for
    /// triples. Never below 2, even for members with no tuple slots.
    pub tuple_arity: usize,
}

impl GpcCircuitParams {
    /// Fixed-order array representation, the inverse of [`Self::from_array`].
    /// This is the layout the generated metadata and parameter merging use.
    pub fn to_array(self) -> [usize; 8] {
        [
            self.max_objects,
            self.max_entries,
            self.merkle_max_depth,
            self.max_numeric_values,
            self.max_lists,
            self.max_list_elements,
            self.max_tuples,
            self.tuple_arity,
        ]
    }

    /// Build parameters from the fixed-order array representation.
    pub fn from_array(values: [usize; 8]) -> Self {
        Self {
            max_objects: values[0],
            max_entries: values[1],
            merkle_max_depth: values[2],
            max_numeric_values: values[3],
            max_lists: values[4],
            max_list_elements: values[5],
            max_tuples: values[6],
            tuple_arity: values[7],
        }
    }

    /// Maximum number of virtual entries (one signer slot per object).
    pub fn max_virtual_entries(self) -> usize {
        self.max_objects
    }

    /// The circuit name these parameters derive, e.g.
    /// `1o-5e-8md-2nv-2x32l-1x2t`.
    pub fn circuit_name(self) -> String {
        format!(
            "{}o-{}e-{}md-{}nv-{}x{}l-{}x{}t",
            self.max_objects,
            self.max_entries,
            self.merkle_max_depth,
            self.max_numeric_values,
            self.max_lists,
            self.max_list_elements,
            self.max_tuples,
            self.tuple_arity
        )
    }

    /// Whether a circuit with these parameters can carry a proof needing
    /// `required`: every parameter must be component-wise at least the
    /// required value.
    pub fn meets_requirements(self, required: Self) -> bool {
        self.to_array()
            .iter()
            .zip(required.to_array().iter())
            .all(|(have, need)| have >= need)
    }
}
