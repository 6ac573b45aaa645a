pub mod allocation;
pub mod amount;
pub mod config;
pub mod report;
pub mod state;

pub use allocation::{AllocationEntry, EligibilityRecord, ProxyConflict, ProxyDelegation, Role};
pub use amount::{parse_asset_amount, AmountError};
pub use config::{AirdropConfig, ConfigError};
pub use report::{AllocationReport, ProxyChainRecord, RawSnapshot};
pub use state::{Account, GlobalStakeParameters};

/// Account handles are plain on-chain names (`"alice"`, `"steemit"`).
pub type AccountId = String;
