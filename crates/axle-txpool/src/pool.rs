//! The admission pool: check pipeline in front, fee-ordered storage behind.

use crate::checks::{run_checks, txn_size_check, TxnCheck};
use crate::error::PoolError;
use crate::ordered::OrderedTxns;
use axle_types::{Hash, SignedTxn};
use parking_lot::RwLock;

/// Pool configuration.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Maximum number of held transactions.
    pub capacity: usize,
    /// Maximum bincode-encoded transaction size in bytes.
    pub max_txn_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 8192,
            max_txn_size: 1024 * 1024,
        }
    }
}

/// Fee-ordered transaction admission pool.
///
/// Multiple producers (local submission, peer sync) insert concurrently
/// while one block producer packs; the ordered sequence and hash index live
/// behind a single `RwLock` so every structural mutation is serialized.
/// Check lists are configured through the consuming builder before the pool
/// is shared, which makes concurrent reconfiguration unrepresentable.
pub struct TxPool {
    config: PoolConfig,
    /// Structural checks derived from config. Run on every admission path.
    structural_checks: Vec<TxnCheck>,
    /// Operator-supplied base checks (signature/nonce level).
    base_checks: Vec<TxnCheck>,
    /// Business-rule checks supplied by state-consuming modules.
    module_checks: Vec<TxnCheck>,
    inner: RwLock<OrderedTxns>,
}

impl TxPool {
    pub fn new(config: PoolConfig) -> Self {
        let structural_checks = vec![txn_size_check(config.max_txn_size)];
        Self {
            config,
            structural_checks,
            base_checks: Vec::new(),
            module_checks: Vec::new(),
            inner: RwLock::new(OrderedTxns::new()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(PoolConfig::default())
    }

    /// Replace the base check list. Builder style; call before sharing the
    /// pool.
    pub fn with_base_checks(mut self, checks: Vec<TxnCheck>) -> Self {
        self.base_checks = checks;
        self
    }

    /// Replace the module check list. Builder style; call before sharing
    /// the pool.
    pub fn with_module_checks(mut self, checks: Vec<TxnCheck>) -> Self {
        self.module_checks = checks;
        self
    }

    /// Count of currently held transactions.
    pub fn pool_size(&self) -> usize {
        self.inner.read().len()
    }

    /// Run the structural and operator-supplied base checks.
    pub fn base_check(&self, txn: &SignedTxn) -> Result<(), PoolError> {
        run_checks(&self.structural_checks, txn)?;
        run_checks(&self.base_checks, txn)
    }

    /// Run the module-supplied business-rule checks.
    pub fn module_check(&self, txn: &SignedTxn) -> Result<(), PoolError> {
        run_checks(&self.module_checks, txn)
    }

    /// Reduced fast-path check for transactions arriving in a peer's sync
    /// response: structural checks only. The peer already ran the full
    /// pipeline; re-running signature and module checks locally would be
    /// duplicate work.
    pub fn necessary_check(&self, txn: &SignedTxn) -> Result<(), PoolError> {
        run_checks(&self.structural_checks, txn)
    }

    /// Validate and insert one transaction at its fee-ordered position.
    ///
    /// Duplicate hashes are rejected before any check runs; the membership
    /// test repeats under the write lock so check-then-insert is atomic
    /// against concurrent inserts of the same hash.
    pub fn insert(&self, txn: SignedTxn) -> Result<(), PoolError> {
        if self.inner.read().contains(&txn.hash) {
            return Err(PoolError::Duplicate(txn.hash));
        }

        self.base_check(&txn)?;
        self.module_check(&txn)?;

        self.ordered_insert(txn)
    }

    /// Apply [`TxPool::insert`] to each transaction independently.
    ///
    /// One result per input, positionally aligned; a failure never blocks
    /// or rolls back its neighbors.
    pub fn batch_insert(&self, txns: Vec<SignedTxn>) -> Vec<Result<(), PoolError>> {
        txns.into_iter().map(|txn| self.insert(txn)).collect()
    }

    /// Admission path for peer-sync batches: fee-ordered placement with the
    /// reduced [`TxPool::necessary_check`] instead of the full pipeline.
    pub fn sync_insert(&self, txns: Vec<SignedTxn>) -> Vec<Result<(), PoolError>> {
        txns.into_iter()
            .map(|txn| {
                if self.inner.read().contains(&txn.hash) {
                    return Err(PoolError::Duplicate(txn.hash));
                }
                self.necessary_check(&txn)?;
                self.ordered_insert(txn)
            })
            .collect()
    }

    fn ordered_insert(&self, txn: SignedTxn) -> Result<(), PoolError> {
        let mut inner = self.inner.write();
        if inner.contains(&txn.hash) {
            return Err(PoolError::Duplicate(txn.hash));
        }
        if inner.len() >= self.config.capacity {
            return Err(PoolError::PoolFull {
                capacity: self.config.capacity,
            });
        }
        tracing::debug!(txn = %txn.short_hash(), fee = txn.fee_price(), "insert txn into pool");
        inner.insert(txn);
        Ok(())
    }

    /// Up to `num_limit` transactions from the front (highest fee) of the
    /// ordering, unfiltered.
    pub fn pack(&self, block_hash: Hash, num_limit: usize) -> Result<Vec<SignedTxn>, PoolError> {
        let packed = self.inner.read().front(num_limit);
        tracing::debug!(
            block = %hex::encode(&block_hash[..4]),
            count = packed.len(),
            "pack txns from pool"
        );
        Ok(packed)
    }

    /// Like [`TxPool::pack`], but only transactions passing `filter` are
    /// returned.
    ///
    /// The scan examines at most `num_limit` entries in fee-descending
    /// order. The bound is on entries examined, not on matches, so the
    /// worst-case cost stays proportional to the requested limit even when
    /// that returns fewer matches than exist further down the ordering.
    pub fn pack_for(
        &self,
        block_hash: Hash,
        num_limit: usize,
        filter: impl Fn(&SignedTxn) -> bool,
    ) -> Result<Vec<SignedTxn>, PoolError> {
        let packed = self.inner.read().front_filtered(num_limit, filter);
        tracing::debug!(
            block = %hex::encode(&block_hash[..4]),
            count = packed.len(),
            "pack filtered txns from pool"
        );
        Ok(packed)
    }

    /// Look up an unpacked transaction without removing it.
    pub fn get_txn(&self, hash: &Hash) -> Result<SignedTxn, PoolError> {
        self.inner
            .read()
            .get(hash)
            .cloned()
            .ok_or(PoolError::NotFound(*hash))
    }

    /// Remove the listed hashes: they are now owned by the produced block.
    ///
    /// Idempotent: an absent hash is a no-op, not an error.
    pub fn packed(&self, block_hash: Hash, hashes: &[Hash]) -> Result<(), PoolError> {
        let mut inner = self.inner.write();
        let mut removed = 0usize;
        for hash in hashes {
            if inner.remove(hash).is_some() {
                removed += 1;
            }
        }
        tracing::debug!(
            block = %hex::encode(&block_hash[..4]),
            removed,
            "marked txns as packed"
        );
        Ok(())
    }

    /// Atomically clear the pool (reorganization or full flush).
    pub fn reset(&self) -> Result<(), PoolError> {
        self.inner.write().clear();
        Ok(())
    }
}
