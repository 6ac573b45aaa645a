use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("months must be at least 1")]
    ZeroMonths,
    #[error("total airdrop must be positive")]
    EmptyAirdrop,
    #[error("{0} must be at least 1")]
    ZeroLimit(&'static str),
}

/// Run parameters for one proposal snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AirdropConfig {
    pub proposal_id: u64,
    pub total_airdrop: u64,
    /// The total airdrop is paid out in equal monthly tranches.
    pub months: u32,
    pub node_url: String,
    pub proxy_chain_url: String,
    pub votes_page_size: u32,
    pub account_batch_size: usize,
    pub throttle_ms: u64,
    pub max_in_flight: usize,
    pub output_dir: PathBuf,
}

impl Default for AirdropConfig {
    fn default() -> Self {
        Self {
            proposal_id: 90,
            total_airdrop: 160_000_000,
            months: 8,
            node_url: "https://api.steemit.com".to_string(),
            proxy_chain_url: "https://sds.steemworld.org".to_string(),
            votes_page_size: 1000,
            account_batch_size: 500,
            throttle_ms: 500,
            max_in_flight: 4,
            output_dir: PathBuf::from("."),
        }
    }
}

impl AirdropConfig {
    pub fn airdrop_per_month(&self) -> f64 {
        self.total_airdrop as f64 / self.months as f64
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.months == 0 {
            return Err(ConfigError::ZeroMonths);
        }
        if self.total_airdrop == 0 {
            return Err(ConfigError::EmptyAirdrop);
        }
        if self.votes_page_size == 0 {
            return Err(ConfigError::ZeroLimit("votes_page_size"));
        }
        if self.account_batch_size == 0 {
            return Err(ConfigError::ZeroLimit("account_batch_size"));
        }
        if self.max_in_flight == 0 {
            return Err(ConfigError::ZeroLimit("max_in_flight"));
        }
        Ok(())
    }
}
