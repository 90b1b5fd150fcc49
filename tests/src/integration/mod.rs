//! Cross-crate integration scenarios.

pub mod backends;
pub mod pipeline;

use axle_types::{Call, SignedTxn, UnsignedTxn};
use rand::RngCore;

/// A signed transfer transaction with the given fee bid.
///
/// Signature bytes are random: the pool admits transactions verified
/// upstream, so tests only need structurally distinct ones.
pub fn transfer_txn(caller_tag: u8, fee_price: u64, nonce: u64) -> SignedTxn {
    let raw = UnsignedTxn {
        caller: [caller_tag; 20],
        call: Call {
            module: "asset".into(),
            method: "transfer".into(),
            params: nonce.to_le_bytes().to_vec(),
            fee_price,
        },
        timestamp: 1_700_000_000_000 + nonce,
        nonce,
    };
    let mut signature = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut signature);
    SignedTxn::new(raw, [caller_tag; 32], signature)
}

/// Like [`transfer_txn`], but targeting another module.
pub fn staking_txn(caller_tag: u8, fee_price: u64, nonce: u64) -> SignedTxn {
    let mut txn = transfer_txn(caller_tag, fee_price, nonce);
    txn.raw.call.module = "staking".into();
    let raw = txn.raw.clone();
    SignedTxn::new(raw, txn.pubkey, txn.signature)
}
