//! Pool configuration

use forge_primitives::U256;
use std::time::Duration;

/// Pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of transactions held globally; reaching it triggers
    /// eviction
    pub max_transactions: usize,
    /// Maximum transactions per sender account
    pub max_transactions_per_account: usize,
    /// Admission floor on fee priority
    pub min_entrance_fee_priority: U256,
    /// Minimum fee increase over the incumbent for a same-nonce replacement
    pub min_replacement_fee_difference: U256,
    /// Maximum age of a transaction before the expirer removes it
    pub transaction_expiry_time: Duration,
    /// Period between reorganization runs
    pub transaction_reorganization_interval: Duration,
    /// Period between expiration sweeps
    pub transaction_expire_interval: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_transactions: 4096,
            max_transactions_per_account: 64,
            min_entrance_fee_priority: U256::zero(),
            min_replacement_fee_difference: U256::from(10u64),
            transaction_expiry_time: Duration::from_secs(3 * 3600),
            transaction_reorganization_interval: Duration::from_millis(500),
            transaction_expire_interval: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = PoolConfig::default();
        assert_eq!(config.max_transactions, 4096);
        assert_eq!(config.max_transactions_per_account, 64);
        assert_eq!(config.min_entrance_fee_priority, U256::zero());
        assert_eq!(config.min_replacement_fee_difference, U256::from(10u64));
        assert_eq!(config.transaction_expiry_time, Duration::from_secs(10_800));
    }

    #[test]
    fn test_config_custom() {
        let config = PoolConfig {
            max_transactions: 10,
            max_transactions_per_account: 2,
            ..Default::default()
        };
        assert_eq!(config.max_transactions, 10);
        assert_eq!(config.max_transactions_per_account, 2);
    }
}
