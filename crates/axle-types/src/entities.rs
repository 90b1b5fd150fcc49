//! # Core Domain Entities
//!
//! The transaction data model shared across the node.
//!
//! ## Clusters
//!
//! - **Identity**: `Hash`, `Address`, `PublicKey`, `Signature`
//! - **Transactions**: `Call`, `UnsignedTxn`, `SignedTxn`

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use sha2::{Digest, Sha256};

/// A 32-byte hash (SHA-256).
pub type Hash = [u8; 32];

/// A 64-byte Ed25519 signature.
pub type Signature = [u8; 64];

/// A 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// A 20-byte account address derived from a public key.
pub type Address = [u8; 20];

/// The all-zero hash, used for genesis and sentinel block identities.
pub const NULL_HASH: Hash = [0u8; 32];

/// A call descriptor: which module entry point a transaction invokes,
/// with what payload, and at what fee price.
///
/// `fee_price` is the priority value the admission pool orders by; higher
/// values are preferred for block inclusion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// Name of the target module.
    pub module: String,
    /// Entry point within the module.
    pub method: String,
    /// Opaque call payload, decoded by the module itself.
    pub params: Vec<u8>,
    /// Fee offered per unit of work. Pool ordering key.
    pub fee_price: u64,
}

/// The signable transaction body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTxn {
    /// Sender address.
    pub caller: Address,
    /// The invoked call.
    pub call: Call,
    /// Client-side creation timestamp (ms since UNIX epoch).
    pub timestamp: u64,
    /// Sender's nonce to prevent replay.
    pub nonce: u64,
}

impl UnsignedTxn {
    /// Compute the content-derived transaction hash.
    ///
    /// Covers every signable field; two transactions with identical content
    /// hash identically, so hash uniqueness doubles as content uniqueness.
    /// Variable-length fields are length-prefixed so field boundaries
    /// cannot shift between distinct transactions whose concatenated bytes
    /// coincide.
    pub fn compute_hash(&self) -> Hash {
        fn update_prefixed(hasher: &mut Sha256, bytes: &[u8]) {
            hasher.update((bytes.len() as u32).to_le_bytes());
            hasher.update(bytes);
        }

        let mut hasher = Sha256::new();
        hasher.update(self.caller);
        update_prefixed(&mut hasher, self.call.module.as_bytes());
        update_prefixed(&mut hasher, self.call.method.as_bytes());
        update_prefixed(&mut hasher, &self.call.params);
        hasher.update(self.call.fee_price.to_le_bytes());
        hasher.update(self.timestamp.to_le_bytes());
        hasher.update(self.nonce.to_le_bytes());
        hasher.finalize().into()
    }
}

/// A signed transaction as admitted to the pool and executed against state.
///
/// Immutable once constructed. Equality and pool identity are keyed by
/// `hash`; the hash is computed from the transaction content at
/// construction and never recomputed afterwards.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignedTxn {
    /// The signed body.
    pub raw: UnsignedTxn,
    /// Content-derived hash over `raw`.
    pub hash: Hash,
    /// Signer's public key.
    pub pubkey: PublicKey,
    /// Ed25519 signature over `raw`. Verified upstream of the pool.
    #[serde_as(as = "Bytes")]
    pub signature: Signature,
}

impl SignedTxn {
    /// Build a signed transaction, deriving its hash from the body.
    pub fn new(raw: UnsignedTxn, pubkey: PublicKey, signature: Signature) -> Self {
        let hash = raw.compute_hash();
        Self {
            raw,
            hash,
            pubkey,
            signature,
        }
    }

    /// The fee price this transaction bids for inclusion.
    pub fn fee_price(&self) -> u64 {
        self.raw.call.fee_price
    }

    /// The sender address.
    pub fn caller(&self) -> Address {
        self.raw.caller
    }

    /// Short hex form of the hash for log lines.
    pub fn short_hash(&self) -> String {
        hex::encode(&self.hash[..4])
    }
}

impl PartialEq for SignedTxn {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for SignedTxn {}
