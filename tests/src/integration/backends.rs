//! # Disk Backend Integration
//!
//! The state flows from [`pipeline`](crate::integration::pipeline) again,
//! this time over the persistent engines: values written through one
//! handle must survive a close-and-reopen, and the root computed for the
//! same block must not depend on which engine stored it.

#[cfg(test)]
mod tests {
    use crate::init_tracing;

    use axle_kv::{KvConfig, KvKind};
    use axle_state::{StateKv, StateKvConfig};
    use axle_types::Namespace;
    use std::path::Path;

    fn disk_config(kind: KvKind, dir: &Path) -> StateKvConfig {
        StateKvConfig {
            index: KvConfig::new(kind, dir.join("index")),
            base: KvConfig::new(kind, dir.join("base")),
        }
    }

    /// One block of writes through a fresh handle; returns the root.
    fn commit_first_block(state: &StateKv) -> axle_types::Hash {
        let asset = Namespace::new("asset");
        state.set(&asset, b"alice", b"100");
        state.set(&asset, b"bob", b"50");
        state.next_txn();
        let root = state.commit().expect("commit");
        state.finalize_block(&[1u8; 32]).expect("finalize");
        root
    }

    fn survives_reopen(kind: KvKind) {
        init_tracing();
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = disk_config(kind, dir.path());

        let root = {
            let state = StateKv::new(&cfg).expect("open state");
            commit_first_block(&state)
        };

        // Same directories, new handle.
        let state = StateKv::new(&cfg).expect("reopen state");
        let asset = Namespace::new("asset");
        assert_eq!(state.current_version(), 1);
        assert_eq!(state.get(&asset, b"alice").unwrap(), b"100");
        assert_eq!(state.state_root_of(&[1u8; 32]).unwrap(), root);
        assert_eq!(
            state
                .get_by_block_hash(&asset, b"bob", &[1u8; 32])
                .unwrap(),
            b"50"
        );
    }

    #[test]
    fn rocksdb_state_survives_reopen() {
        survives_reopen(KvKind::RocksDb);
    }

    #[test]
    fn redb_state_survives_reopen() {
        survives_reopen(KvKind::Redb);
    }

    #[test]
    fn engines_agree_on_the_state_root() {
        init_tracing();
        let rocks_dir = tempfile::tempdir().expect("tempdir");
        let redb_dir = tempfile::tempdir().expect("tempdir");

        let rocks = StateKv::new(&disk_config(KvKind::RocksDb, rocks_dir.path())).unwrap();
        let redb = StateKv::new(&disk_config(KvKind::Redb, redb_dir.path())).unwrap();
        let memory = StateKv::new(&StateKvConfig {
            index: KvConfig::new(KvKind::Memory, ""),
            base: KvConfig::new(KvKind::Memory, ""),
        })
        .unwrap();

        let roots = [
            commit_first_block(&rocks),
            commit_first_block(&redb),
            commit_first_block(&memory),
        ];
        assert_eq!(roots[0], roots[1]);
        assert_eq!(roots[1], roots[2]);
    }

    #[test]
    fn historical_reads_span_reopens() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = disk_config(KvKind::RocksDb, dir.path());
        let asset = Namespace::new("asset");

        {
            let state = StateKv::new(&cfg).unwrap();
            commit_first_block(&state);
            state.set(&asset, b"alice", b"25");
            state.next_txn();
            state.commit().unwrap();
            state.finalize_block(&[2u8; 32]).unwrap();
        }

        let state = StateKv::new(&cfg).unwrap();
        assert_eq!(state.current_version(), 2);
        assert_eq!(
            state
                .get_by_block_hash(&asset, b"alice", &[1u8; 32])
                .unwrap(),
            b"100"
        );
        assert_eq!(
            state
                .get_by_block_hash(&asset, b"alice", &[2u8; 32])
                .unwrap(),
            b"25"
        );
    }
}
