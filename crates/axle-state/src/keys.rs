//! Physical key encoding for the base and index backends.
//!
//! All payload rows are length-prefixed so namespaces and keys can never
//! bleed into each other: a scan for (`ns`, `key`) cannot match rows of a
//! key that merely shares a byte prefix. History rows end in a big-endian
//! version so a prefix scan yields versions in ascending order.

use axle_types::Hash;

/// Tag for latest-committed-value rows (base store).
const TAG_CURRENT: u8 = b'c';
/// Tag for per-version history rows (base store).
const TAG_HISTORY: u8 = b'h';
/// Tag for block snapshot rows (index store).
const TAG_SNAPSHOT: u8 = b's';

/// Latest committed version marker (index store).
pub(crate) const LATEST_KEY: &[u8] = b"m:latest";
/// Last finalized version marker (index store).
pub(crate) const FINALIZED_KEY: &[u8] = b"m:finalized";
/// Scan prefix covering every history row in the base store.
pub(crate) const ALL_HISTORY_PREFIX: &[u8] = &[TAG_HISTORY];

fn push_scoped(out: &mut Vec<u8>, ns_bytes: &[u8], key: &[u8]) {
    out.extend_from_slice(&(ns_bytes.len() as u16).to_be_bytes());
    out.extend_from_slice(ns_bytes);
    out.extend_from_slice(&(key.len() as u32).to_be_bytes());
    out.extend_from_slice(key);
}

/// Row holding the latest committed value of a namespaced key.
pub(crate) fn current_key(ns: &[u8], key: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + 6 + ns.len() + key.len());
    out.push(TAG_CURRENT);
    push_scoped(&mut out, ns, key);
    out
}

/// Row holding the value of a namespaced key as of one version.
pub(crate) fn history_key(ns: &[u8], key: &[u8], version: u64) -> Vec<u8> {
    let mut out = history_prefix(ns, key);
    out.extend_from_slice(&version.to_be_bytes());
    out
}

/// Scan prefix covering every history row of a namespaced key.
pub(crate) fn history_prefix(ns: &[u8], key: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + 6 + ns.len() + key.len() + 8);
    out.push(TAG_HISTORY);
    push_scoped(&mut out, ns, key);
    out
}

/// The version suffix of a history row key.
pub(crate) fn history_version(full_key: &[u8]) -> Option<u64> {
    let suffix = full_key.get(full_key.len().checked_sub(8)?..)?;
    Some(u64::from_be_bytes(suffix.try_into().ok()?))
}

/// The length-prefixed (namespace, key) portion of a history row key,
/// with the leading tag and trailing version stripped.
pub(crate) fn history_scoped(full_key: &[u8]) -> Option<&[u8]> {
    full_key.get(1..full_key.len().checked_sub(8)?)
}

/// Rebuild the current-value row key from a scoped (namespace, key) slice.
pub(crate) fn current_key_from_scoped(scoped: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + scoped.len());
    out.push(TAG_CURRENT);
    out.extend_from_slice(scoped);
    out
}

/// Rebuild the history scan prefix from a scoped (namespace, key) slice.
pub(crate) fn history_prefix_from_scoped(scoped: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + scoped.len() + 8);
    out.push(TAG_HISTORY);
    out.extend_from_slice(scoped);
    out
}

/// Index row binding a block hash to its snapshot.
pub(crate) fn snapshot_key(block_hash: &Hash) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + 32);
    out.push(TAG_SNAPSHOT);
    out.extend_from_slice(block_hash);
    out
}
