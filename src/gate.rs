//! Trade gate
//!
//! Enforces at most one open position or working order per account per
//! symbol. The gate is consulted freshly for each account immediately
//! before placement; one account's state never blocks another's entry.

use anyhow::Result;
use tracing::{debug, warn};

/// Snapshot of an account's exposure on the target symbol
#[derive(Debug, Clone, Default)]
pub struct AccountActivity {
    pub open_orders: usize,
    pub position_size: f64,
}

impl AccountActivity {
    /// No working orders and a flat position
    pub fn is_clear(&self) -> bool {
        self.open_orders == 0 && self.position_size.abs() == 0.0
    }
}

/// Decide whether a new bracket order may be placed for this account
///
/// Fail-closed: a failed activity lookup is treated as an occupied account
/// rather than propagated, so a flaky query can never cause a duplicate
/// entry.
pub fn can_open_new_trade(lookup: Result<AccountActivity>) -> bool {
    match lookup {
        Ok(activity) => {
            if activity.open_orders > 0 {
                debug!(
                    "found {} open order(s), skipping new order",
                    activity.open_orders
                );
                false
            } else if activity.position_size.abs() > 0.0 {
                debug!(
                    "found open position of size {}, skipping new order",
                    activity.position_size
                );
                false
            } else {
                true
            }
        }
        Err(e) => {
            warn!("account activity check failed, treating as occupied: {e:#}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_clear_account_may_trade() {
        let activity = AccountActivity {
            open_orders: 0,
            position_size: 0.0,
        };
        assert!(activity.is_clear());
        assert!(can_open_new_trade(Ok(activity)));
    }

    #[test]
    fn test_open_order_blocks() {
        let activity = AccountActivity {
            open_orders: 1,
            position_size: 0.0,
        };
        assert!(!can_open_new_trade(Ok(activity)));
    }

    #[test]
    fn test_nonzero_position_blocks_either_direction() {
        assert!(!can_open_new_trade(Ok(AccountActivity {
            open_orders: 0,
            position_size: 2.0,
        })));
        assert!(!can_open_new_trade(Ok(AccountActivity {
            open_orders: 0,
            position_size: -3.0,
        })));
    }

    #[test]
    fn test_query_failure_fails_closed() {
        assert!(!can_open_new_trade(Err(anyhow!("connection reset"))));
    }
}
