//! The check pipeline: ordered lists of admission predicates.
//!
//! Base checks cover structural concerns (size, fee floor); module checks
//! are business rules supplied by state-consuming modules at wiring time.
//! Within a list, the first failing check aborts the remaining ones.

use crate::error::PoolError;
use axle_types::SignedTxn;
use std::sync::Arc;

/// A pure admission predicate over a signed transaction.
pub type TxnCheck = Arc<dyn Fn(&SignedTxn) -> Result<(), PoolError> + Send + Sync>;

/// Run an ordered check list, short-circuiting on the first failure.
pub fn run_checks(checks: &[TxnCheck], txn: &SignedTxn) -> Result<(), PoolError> {
    for check in checks {
        check(txn)?;
    }
    Ok(())
}

/// Structural check: the bincode-encoded transaction must fit under `max`
/// bytes.
pub fn txn_size_check(max: usize) -> TxnCheck {
    Arc::new(move |txn| {
        let size = bincode::serialized_size(txn)
            .map_err(|e| PoolError::check_failed(format!("unencodable transaction: {e}")))?
            as usize;
        if size > max {
            return Err(PoolError::TxnTooLarge { size, max });
        }
        Ok(())
    })
}

/// Structural check: the offered fee price must be at least `min`.
pub fn min_fee_check(min: u64) -> TxnCheck {
    Arc::new(move |txn| {
        if txn.fee_price() < min {
            return Err(PoolError::check_failed(format!(
                "fee price {} below minimum {min}",
                txn.fee_price()
            )));
        }
        Ok(())
    })
}
