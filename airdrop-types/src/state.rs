use serde::{Deserialize, Serialize};

use crate::AccountId;

/// Network-wide exchange parameters between vesting shares and the liquid token.
/// Fetched once per run; every conversion in that run uses the same snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GlobalStakeParameters {
    pub total_vesting_fund_liquid: f64,
    pub total_vesting_shares: f64,
}

impl GlobalStakeParameters {
    pub fn new(total_vesting_fund_liquid: f64, total_vesting_shares: f64) -> Self {
        Self {
            total_vesting_fund_liquid,
            total_vesting_shares,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Account {
    pub id: AccountId,
    pub vesting_shares: f64,
    /// The single account this one hands its voting weight to, if any.
    pub proxy_target: Option<AccountId>,
}

impl Account {
    pub fn new(id: impl Into<AccountId>, vesting_shares: f64) -> Self {
        Self {
            id: id.into(),
            vesting_shares,
            proxy_target: None,
        }
    }

    pub fn with_proxy(mut self, target: impl Into<AccountId>) -> Self {
        self.proxy_target = Some(target.into());
        self
    }

    pub fn has_stake(&self) -> bool {
        self.vesting_shares > 0.0
    }
}
