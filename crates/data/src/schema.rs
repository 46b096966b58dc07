pub use hackjack_core::{BalanceConfig, ConfigError, RarityWeights, RunConfig, RunMode};

/// File name of the balance table inside an assets directory.
pub const BALANCE_FILE: &str = "balance.json";
