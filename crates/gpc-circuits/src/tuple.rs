//! # Tuple Hashing — Fixed-Arity Chains
//!
//! A circuit hashes tuples with a fixed-arity hash. Tuples narrower than
//! the native arity pad by repeating their first member; tuples wider
//! than the native arity chain across several tuple slots. The chaining
//! order is pinned here as a left fold:
//!
//! - link 0 hashes the first `arity` member hashes;
//! - link `j > 0` hashes `[link j-1, next arity-1 member hashes]`;
//! - any short chunk pads by repeating the whole tuple's first member
//!   hash.
//!
//! The same chunking drives both literal tuple values (membership-list
//! elements) and entry-reference tuples compiled into index slots, so the
//! two always agree on the final hash.

use num_bigint::BigUint;

use gpc_crypto::field_hash::tuple_hash;

/// Number of circuit tuple slots a tuple of `member_count` entries
/// occupies at the given native arity.
pub fn tuple_slot_count(tuple_arity: usize, member_count: usize) -> usize {
    debug_assert!(tuple_arity >= 2, "tuple arity is at least 2");
    if member_count <= tuple_arity {
        1
    } else {
        1 + (member_count - tuple_arity).div_ceil(tuple_arity - 1)
    }
}

/// Hash a tuple of member hashes at the given native arity, chaining when
/// the tuple is wider than one slot.
pub fn hash_tuple(tuple_arity: usize, member_hashes: &[BigUint]) -> BigUint {
    debug_assert!(tuple_arity >= 2, "tuple arity is at least 2");
    debug_assert!(!member_hashes.is_empty(), "tuples have members");
    let pad = &member_hashes[0];

    let first_len = member_hashes.len().min(tuple_arity);
    let mut link = tuple_hash(&padded(&member_hashes[..first_len], tuple_arity, pad));

    let mut rest = &member_hashes[first_len..];
    while !rest.is_empty() {
        let take = rest.len().min(tuple_arity - 1);
        let mut operands = Vec::with_capacity(tuple_arity);
        operands.push(link);
        operands.extend_from_slice(&rest[..take]);
        link = tuple_hash(&padded(&operands, tuple_arity, pad));
        rest = &rest[take..];
    }
    link
}

/// Compute the index rows for a tuple of entry references.
///
/// `member_indices` are combined-space indices of the tuple's members;
/// `first_slot_index` is the combined-space index of the first tuple slot
/// this tuple occupies. Chained rows lead with the previous slot's index.
/// Rows pad by repeating the first member's index, mirroring
/// [`hash_tuple`]'s padding.
pub fn compute_tuple_indices(
    tuple_arity: usize,
    first_slot_index: usize,
    member_indices: &[usize],
) -> Vec<Vec<usize>> {
    debug_assert!(tuple_arity >= 2, "tuple arity is at least 2");
    debug_assert!(!member_indices.is_empty(), "tuples have members");
    let pad = member_indices[0];

    let first_len = member_indices.len().min(tuple_arity);
    let mut rows = vec![padded_idx(&member_indices[..first_len], tuple_arity, pad)];

    let mut rest = &member_indices[first_len..];
    let mut slot = first_slot_index;
    while !rest.is_empty() {
        let take = rest.len().min(tuple_arity - 1);
        let mut row = Vec::with_capacity(tuple_arity);
        row.push(slot);
        row.extend_from_slice(&rest[..take]);
        rows.push(padded_idx(&row, tuple_arity, pad));
        rest = &rest[take..];
        slot += 1;
    }
    rows
}

fn padded(values: &[BigUint], width: usize, pad: &BigUint) -> Vec<BigUint> {
    let mut out = values.to_vec();
    out.resize(width, pad.clone());
    out
}

fn padded_idx(values: &[usize], width: usize, pad: usize) -> Vec<usize> {
    let mut out = values.to_vec();
    out.resize(width, pad);
    out
}
