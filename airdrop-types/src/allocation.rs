use serde::{Deserialize, Serialize};

use crate::AccountId;

/// One account handing its full stake to a direct voter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProxyDelegation {
    pub delegator: AccountId,
    pub direct_target: AccountId,
    pub liquid_stake: f64,
}

/// Raised when source data presents the same account twice with different
/// proxy data. The last observation wins; the replaced one is kept here for audit.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProxyConflict {
    pub account: AccountId,
    pub replaced_target: Option<AccountId>,
    pub kept_target: Option<AccountId>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    DirectVoter,
    Delegator,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EligibilityRecord {
    pub account: AccountId,
    pub role: Role,
    /// Liquid stake the account holds itself (zero for delegators).
    pub own_stake: f64,
    /// Liquid stake reaching the proposal through a proxy (zero for voters).
    pub delegated_stake: f64,
    pub counted_stake: f64,
    pub is_eligible: bool,
    pub resolved_proxy_target: Option<AccountId>,
}

/// Final per-account row of an allocation run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AllocationEntry {
    pub account: AccountId,
    pub stake_held: f64,
    pub stake_delegated_from: f64,
    pub total_counted_stake: f64,
    pub share_percent: f64,
    pub token_allocation: u64,
    pub is_eligible: bool,
    pub proxy_target: Option<AccountId>,
}
