//! Deterministic state root computation.
//!
//! The root digests a committed version's full write set. Cross-node
//! agreement requires that the same set of namespaced writes always yields
//! the same root, so the write set is fed to the hasher in sorted order
//! with every component length-prefixed (no concatenation ambiguity).

use axle_types::Hash;
use sha3::{Digest, Keccak256};
use std::collections::BTreeMap;

/// A committed write set: (namespace bytes, key) → value, sorted.
pub type WriteSet = BTreeMap<(Vec<u8>, Vec<u8>), Vec<u8>>;

/// Keccak-256 over the sorted, length-prefixed write set.
///
/// The empty write set hashes to the digest of the empty stream; an empty
/// block commits to that root rather than erroring.
pub fn state_root(writes: &WriteSet) -> Hash {
    let mut hasher = Keccak256::new();
    for ((ns, key), value) in writes {
        hasher.update((ns.len() as u32).to_le_bytes());
        hasher.update(ns);
        hasher.update((key.len() as u32).to_le_bytes());
        hasher.update(key);
        hasher.update((value.len() as u32).to_le_bytes());
        hasher.update(value);
    }
    hasher.finalize().into()
}
