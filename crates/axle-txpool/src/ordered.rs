//! The ordered transaction sequence and its hash index.
//!
//! Both structures mutate together; [`crate::pool::TxPool`] keeps them
//! behind one lock so a partially applied update is never observable.

use axle_types::{Hash, SignedTxn};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Ordering key for the fee-descending index.
///
/// `Ord` puts higher fee prices first; ties fall back to the admission
/// sequence number, so equal-priced transactions keep arrival order. The
/// sequence number is unique, which makes the key total without consulting
/// the hash.
#[derive(Clone, Debug, Eq, PartialEq)]
struct PricedEntry {
    fee_price: u64,
    seq: u64,
    hash: Hash,
}

impl Ord for PricedEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher fee price = higher priority (so reverse comparison)
        other
            .fee_price
            .cmp(&self.fee_price)
            // Earlier admission = higher priority for equal prices
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for PricedEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Stored transaction plus its position key in the ordered index.
struct Entry {
    txn: SignedTxn,
    seq: u64,
}

/// Fee-ordered transaction sequence with O(1) hash membership.
#[derive(Default)]
pub(crate) struct OrderedTxns {
    /// Monotone admission counter; ties in fee price resolve by this.
    next_seq: u64,
    /// Fee-descending index.
    by_price: BTreeSet<PricedEntry>,
    /// Hash → transaction and its index key.
    by_hash: HashMap<Hash, Entry>,
}

impl OrderedTxns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.by_hash.contains_key(hash)
    }

    pub fn get(&self, hash: &Hash) -> Option<&SignedTxn> {
        self.by_hash.get(hash).map(|e| &e.txn)
    }

    /// Insert at the ordered position. Caller has already rejected
    /// duplicates; an empty pool is the plain terminal case of the same
    /// path.
    pub fn insert(&mut self, txn: SignedTxn) {
        let seq = self.next_seq;
        self.next_seq += 1;

        self.by_price.insert(PricedEntry {
            fee_price: txn.fee_price(),
            seq,
            hash: txn.hash,
        });
        self.by_hash.insert(txn.hash, Entry { txn, seq });
    }

    /// Remove one hash. Absent hashes are a no-op.
    pub fn remove(&mut self, hash: &Hash) -> Option<SignedTxn> {
        let entry = self.by_hash.remove(hash)?;
        self.by_price.remove(&PricedEntry {
            fee_price: entry.txn.fee_price(),
            seq: entry.seq,
            hash: *hash,
        });
        tracing::debug!(txn = %entry.txn.short_hash(), "removed txn from pool");
        Some(entry.txn)
    }

    pub fn clear(&mut self) {
        self.by_price.clear();
        self.by_hash.clear();
    }

    /// The first `limit` transactions in fee-descending order.
    pub fn front(&self, limit: usize) -> Vec<SignedTxn> {
        self.iter().take(limit).cloned().collect()
    }

    /// Examine the first `limit` transactions in fee-descending order and
    /// keep those passing `filter`.
    ///
    /// The scan budget is spent on entries *examined*, not matched: the
    /// caller gets a predictable worst-case cost bounded by `limit`, at the
    /// price of possibly fewer matches than exist deeper in the ordering.
    pub fn front_filtered(
        &self,
        limit: usize,
        filter: impl Fn(&SignedTxn) -> bool,
    ) -> Vec<SignedTxn> {
        self.iter()
            .take(limit)
            .filter(|txn| filter(txn))
            .cloned()
            .collect()
    }

    /// Fee-descending iteration over the stored transactions.
    pub fn iter(&self) -> impl Iterator<Item = &SignedTxn> {
        self.by_price
            .iter()
            .filter_map(|p| self.by_hash.get(&p.hash).map(|e| &e.txn))
    }
}
