use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::allocation::{AllocationEntry, ProxyConflict};
use crate::state::{Account, GlobalStakeParameters};
use crate::AccountId;

/// One account found in a direct voter's backwards proxy chain.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProxyChainRecord {
    pub voter: AccountId,
    pub account: AccountId,
    pub delegated_vests: f64,
}

/// Everything the engine needs for one run, already fetched and validated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RawSnapshot {
    pub proposal_id: u64,
    pub taken_at: DateTime<Utc>,
    pub params: GlobalStakeParameters,
    /// Direct voter ids in the order the votes query returned them.
    pub voters: Vec<AccountId>,
    pub voter_accounts: Vec<Account>,
    pub proxy_chains: Vec<ProxyChainRecord>,
    /// Account records of the non-voters named in `proxy_chains`; their own
    /// `proxy_target` decides who they delegate to.
    #[serde(default)]
    pub proxied_accounts: Vec<Account>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AllocationReport {
    pub snapshot_timestamp: DateTime<Utc>,
    pub proposal_id: u64,
    pub total_voters: usize,
    pub total_proxied_accounts: usize,
    pub total_airdrop: u64,
    pub months: u32,
    pub airdrop_per_month: f64,
    pub proposal_total_stake: f64,
    pub airdrop_total_token_count: u64,
    #[serde(default)]
    pub conflicts: Vec<ProxyConflict>,
    pub entries: Vec<AllocationEntry>,
}

impl AllocationReport {
    pub fn eligible_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_eligible).count()
    }

    pub fn average_stake_per_account(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.proposal_total_stake / self.entries.len() as f64
    }

    pub fn airdrop_per_stake_unit(&self) -> f64 {
        if self.proposal_total_stake <= 0.0 {
            return 0.0;
        }
        self.airdrop_per_month / self.proposal_total_stake
    }

    pub fn top(&self, n: usize) -> &[AllocationEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Calendar month (1-12) of the snapshot, used in report file names.
    pub fn snapshot_month(&self) -> u32 {
        self.snapshot_timestamp.month()
    }

    /// Blake3 digest of the ranked entries. Identical inputs give identical digests.
    pub fn entries_digest(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        for entry in &self.entries {
            hasher.update(entry.account.as_bytes());
            hasher.update(&[0]);
            hasher.update(&entry.stake_held.to_le_bytes());
            hasher.update(&entry.stake_delegated_from.to_le_bytes());
            hasher.update(&entry.total_counted_stake.to_le_bytes());
            hasher.update(&entry.share_percent.to_le_bytes());
            hasher.update(&entry.token_allocation.to_le_bytes());
            hasher.update(&[entry.is_eligible as u8]);
            if let Some(target) = &entry.proxy_target {
                hasher.update(target.as_bytes());
            }
            hasher.update(&[0xff]);
        }
        *hasher.finalize().as_bytes()
    }
}
