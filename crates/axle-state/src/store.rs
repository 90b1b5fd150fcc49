//! The versioned state store and its per-module handle.

use crate::error::StateError;
use crate::keys;
use crate::root::{state_root, WriteSet};
use axle_kv::{open_kv, BatchOp, KvConfig, KvStore};
use axle_types::{Hash, Namespace};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Monotone counter of committed block write sets. Version 0 is the empty
/// pre-genesis state.
pub type StateVersion = u64;

/// Opaque id for one sealed transaction boundary within a block.
///
/// Comparable, so callers can order execution effects; resets to the first
/// ordinal after every commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TxnStep(u64);

impl TxnStep {
    /// Position of this transaction within its block, starting at 0.
    pub fn ordinal(&self) -> u64 {
        self.0
    }
}

/// Immutable binding of a block hash to the version and root it produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub version: StateVersion,
    pub root: Hash,
}

/// Backend selection for the two stores the state layer runs on.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateKvConfig {
    /// Snapshot and version-marker rows.
    pub index: KvConfig,
    /// Payload rows (current values and per-version history).
    pub base: KvConfig,
}

/// Writes buffered for one in-progress transaction or block.
type PendingWrites = HashMap<(Namespace, Vec<u8>), Vec<u8>>;

struct Inner {
    index: Box<dyn KvStore>,
    base: Box<dyn KvStore>,
    /// Transaction buffers sealed by `next_txn`, in seal order.
    sealed: Vec<PendingWrites>,
    /// Writes of the transaction currently executing.
    open: PendingWrites,
    next_step: u64,
    latest: StateVersion,
    /// Committed but not yet bound to a block hash.
    pending_finalize: Option<BlockSnapshot>,
}

/// Per-module, block-versioned key-value state.
///
/// All mutation is memory-buffered until [`commit`](Self::commit) flushes
/// the block's merged write set through one atomic batch; the index store's
/// latest-version marker is advanced only after the payload batch lands, so
/// a crash between the two leaves orphan history rows that the constructor
/// sweeps away on the next open.
pub struct StateKv {
    inner: RwLock<Inner>,
}

impl StateKv {
    /// Open (or create) the two backends named by `cfg`.
    pub fn new(cfg: &StateKvConfig) -> Result<Self, StateError> {
        Self::with_stores(open_kv(&cfg.index)?, open_kv(&cfg.base)?)
    }

    /// Build on already-opened backends. Runs the torn-commit sweep before
    /// serving any read.
    pub fn with_stores(
        index: Box<dyn KvStore>,
        mut base: Box<dyn KvStore>,
    ) -> Result<Self, StateError> {
        let latest = match index.get(keys::LATEST_KEY)? {
            Some(raw) => decode_version(&raw)?,
            None => 0,
        };
        recover_orphan_history(&mut base, latest)?;
        Ok(Self {
            inner: RwLock::new(Inner {
                index,
                base,
                sealed: Vec::new(),
                open: PendingWrites::new(),
                next_step: 0,
                latest,
                pending_finalize: None,
            }),
        })
    }

    /// Buffer a write for the in-progress transaction. Visible to `get`
    /// immediately, durable only after `commit`.
    pub fn set(&self, ns: &Namespace, key: &[u8], value: &[u8]) {
        let mut inner = self.inner.write();
        inner
            .open
            .insert((ns.clone(), key.to_vec()), value.to_vec());
    }

    /// Read through the block in progress: open buffer, then sealed
    /// buffers newest-first, then the latest committed value.
    pub fn get(&self, ns: &Namespace, key: &[u8]) -> Result<Vec<u8>, StateError> {
        let inner = self.inner.read();
        let scoped = (ns.clone(), key.to_vec());
        if let Some(value) = inner.open.get(&scoped) {
            return Ok(value.clone());
        }
        for buffer in inner.sealed.iter().rev() {
            if let Some(value) = buffer.get(&scoped) {
                return Ok(value.clone());
            }
        }
        inner
            .base
            .get(&keys::current_key(ns.as_bytes(), key))?
            .ok_or(StateError::NotFound)
    }

    /// Seal the open transaction's writes into the block and return its
    /// step id.
    pub fn next_txn(&self) -> TxnStep {
        let mut inner = self.inner.write();
        let buffer = std::mem::take(&mut inner.open);
        inner.sealed.push(buffer);
        let step = TxnStep(inner.next_step);
        inner.next_step += 1;
        step
    }

    /// Drop the open (unsealed) transaction buffer. Sealed writes are
    /// untouched; this is how a failing transaction's effects vanish.
    pub fn discard_txn(&self) {
        self.inner.write().open.clear();
    }

    /// Abandon the whole in-progress block: drop every sealed buffer and
    /// the open one, and reset the step counter. Committed versions are
    /// untouched.
    pub fn discard_block(&self) {
        let mut inner = self.inner.write();
        let dropped = inner.sealed.len() + usize::from(!inner.open.is_empty());
        inner.sealed.clear();
        inner.open.clear();
        inner.next_step = 0;
        tracing::debug!(buffers = dropped, "discarded in-progress block");
    }

    /// Drop a committed version that will never be bound to a block hash,
    /// unblocking the next `commit`. Returns the abandoned snapshot, or
    /// `None` when nothing was pending.
    ///
    /// The version's rows stay durable; they are simply unreachable by
    /// block hash and get superseded by later commits.
    pub fn abandon_pending(&self) -> Option<BlockSnapshot> {
        let abandoned = self.inner.write().pending_finalize.take();
        if let Some(snapshot) = &abandoned {
            tracing::debug!(version = snapshot.version, "abandoned unfinalized version");
        }
        abandoned
    }

    /// Merge sealed and open buffers in write order, persist them as the
    /// next version, and return the deterministic state root.
    ///
    /// An empty block still allocates a version; its root is the digest of
    /// the empty write set. Fails if the previous commit has not been
    /// bound to a block hash yet.
    pub fn commit(&self) -> Result<Hash, StateError> {
        let mut inner = self.inner.write();
        if inner.pending_finalize.is_some() {
            return Err(StateError::StateMachineViolation(
                "previous committed version is not finalized",
            ));
        }

        let mut writes = WriteSet::new();
        let sealed = std::mem::take(&mut inner.sealed);
        let open = std::mem::take(&mut inner.open);
        for buffer in sealed.into_iter().chain(std::iter::once(open)) {
            for ((ns, key), value) in buffer {
                writes.insert((ns.as_bytes().to_vec(), key), value);
            }
        }

        let version = inner.latest + 1;
        let root = state_root(&writes);

        let mut batch = Vec::with_capacity(writes.len() * 2);
        for ((ns, key), value) in &writes {
            batch.push(BatchOp::put(keys::history_key(ns, key, version), value.clone()));
            batch.push(BatchOp::put(keys::current_key(ns, key), value.clone()));
        }
        inner.base.atomic_batch_write(batch)?;
        // Only advanced after the payload batch: a crash in between leaves
        // orphan rows above the marker, which the constructor sweeps.
        inner.index.put(keys::LATEST_KEY, &version.to_be_bytes())?;

        inner.latest = version;
        inner.next_step = 0;
        inner.pending_finalize = Some(BlockSnapshot { version, root });
        tracing::info!(
            version,
            root = %hex::encode(root),
            writes = writes.len(),
            "committed state version"
        );
        Ok(root)
    }

    /// Bind the pending committed version to `block_hash`.
    ///
    /// Re-finalizing a hash already bound to the same version is a no-op;
    /// binding it to a different version is rejected.
    pub fn finalize_block(&self, block_hash: &Hash) -> Result<(), StateError> {
        let mut inner = self.inner.write();
        let existing = read_snapshot(inner.index.as_ref(), block_hash)?;
        match (existing, inner.pending_finalize) {
            (Some(bound), Some(pending)) if bound == pending => {
                inner.pending_finalize = None;
                Ok(())
            }
            (Some(bound), Some(pending)) => Err(StateError::SnapshotConflict {
                existing: bound.version,
                attempted: pending.version,
            }),
            (Some(_), None) => Ok(()),
            (None, Some(pending)) => {
                let encoded = bincode::serialize(&pending)
                    .map_err(|e| StateError::Codec(e.to_string()))?;
                inner.index.atomic_batch_write(vec![
                    BatchOp::put(keys::snapshot_key(block_hash), encoded),
                    BatchOp::put(keys::FINALIZED_KEY, pending.version.to_be_bytes()),
                ])?;
                inner.pending_finalize = None;
                tracing::info!(
                    version = pending.version,
                    block = %hex::encode(&block_hash[..4]),
                    "finalized block state"
                );
                Ok(())
            }
            (None, None) => Err(StateError::StateMachineViolation(
                "no committed version pending finalization",
            )),
        }
    }

    /// Read a key's value as of the version bound to `block_hash`.
    pub fn get_by_block_hash(
        &self,
        ns: &Namespace,
        key: &[u8],
        block_hash: &Hash,
    ) -> Result<Vec<u8>, StateError> {
        let inner = self.inner.read();
        let snapshot =
            read_snapshot(inner.index.as_ref(), block_hash)?.ok_or(StateError::NotFound)?;
        let rows = inner
            .base
            .prefix_scan(&keys::history_prefix(ns.as_bytes(), key))?;
        // Ascending version order within the prefix; the last row that is
        // not newer than the snapshot wins.
        rows.into_iter()
            .filter(|(row_key, _)| {
                keys::history_version(row_key).is_some_and(|v| v <= snapshot.version)
            })
            .last()
            .map(|(_, value)| value)
            .ok_or(StateError::NotFound)
    }

    /// Root of the version bound to `block_hash`.
    pub fn state_root_of(&self, block_hash: &Hash) -> Result<Hash, StateError> {
        let inner = self.inner.read();
        read_snapshot(inner.index.as_ref(), block_hash)?
            .map(|snapshot| snapshot.root)
            .ok_or(StateError::NotFound)
    }

    /// Latest committed version.
    pub fn current_version(&self) -> StateVersion {
        self.inner.read().latest
    }

    /// Version of the last block-bound commit, or `None` before the first
    /// finalize. Survives reopens: read from the index store's marker row.
    pub fn finalized_version(&self) -> Result<Option<StateVersion>, StateError> {
        match self.inner.read().index.get(keys::FINALIZED_KEY)? {
            Some(raw) => Ok(Some(decode_version(&raw)?)),
            None => Ok(None),
        }
    }

    /// A handle scoped to one module's namespace.
    pub fn module(self: &Arc<Self>, ns: Namespace) -> ModuleState {
        ModuleState {
            kv: Arc::clone(self),
            ns,
        }
    }
}

/// Handle a module uses to touch only its own namespace.
#[derive(Clone)]
pub struct ModuleState {
    kv: Arc<StateKv>,
    ns: Namespace,
}

impl ModuleState {
    pub fn namespace(&self) -> &Namespace {
        &self.ns
    }

    pub fn set(&self, key: &[u8], value: &[u8]) {
        self.kv.set(&self.ns, key, value);
    }

    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>, StateError> {
        self.kv.get(&self.ns, key)
    }

    pub fn get_by_block_hash(&self, key: &[u8], block_hash: &Hash) -> Result<Vec<u8>, StateError> {
        self.kv.get_by_block_hash(&self.ns, key, block_hash)
    }
}

fn decode_version(raw: &[u8]) -> Result<StateVersion, StateError> {
    let bytes: [u8; 8] = raw
        .try_into()
        .map_err(|_| StateError::Codec("version marker is not 8 bytes".into()))?;
    Ok(u64::from_be_bytes(bytes))
}

fn read_snapshot(
    index: &dyn KvStore,
    block_hash: &Hash,
) -> Result<Option<BlockSnapshot>, StateError> {
    match index.get(&keys::snapshot_key(block_hash))? {
        Some(raw) => {
            let snapshot =
                bincode::deserialize(&raw).map_err(|e| StateError::Codec(e.to_string()))?;
            Ok(Some(snapshot))
        }
        None => Ok(None),
    }
}

/// Delete history rows newer than the latest-version marker and repair the
/// current-value rows they clobbered. Runs once, at open.
fn recover_orphan_history(
    base: &mut Box<dyn KvStore>,
    latest: StateVersion,
) -> Result<(), StateError> {
    let rows = base.prefix_scan(keys::ALL_HISTORY_PREFIX)?;
    let mut batch = Vec::new();
    let mut touched: BTreeSet<Vec<u8>> = BTreeSet::new();
    for (row_key, _) in &rows {
        if keys::history_version(row_key).is_some_and(|v| v > latest) {
            batch.push(BatchOp::delete(row_key.clone()));
            if let Some(scoped) = keys::history_scoped(row_key) {
                touched.insert(scoped.to_vec());
            }
        }
    }
    if batch.is_empty() {
        return Ok(());
    }
    for scoped in &touched {
        let prefix = keys::history_prefix_from_scoped(scoped);
        let survivor = rows
            .iter()
            .filter(|(row_key, _)| {
                row_key.starts_with(&prefix)
                    && keys::history_version(row_key).is_some_and(|v| v <= latest)
            })
            .last();
        let current = keys::current_key_from_scoped(scoped);
        match survivor {
            Some((_, value)) => batch.push(BatchOp::put(current, value.clone())),
            None => batch.push(BatchOp::delete(current)),
        }
    }
    tracing::warn!(
        orphans = touched.len(),
        latest,
        "swept torn commit out of the base store"
    );
    base.atomic_batch_write(batch)?;
    Ok(())
}
