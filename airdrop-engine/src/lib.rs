use std::collections::BTreeSet;

use airdrop_types::{
    Account, AccountId, AirdropConfig, AllocationReport, EligibilityRecord, RawSnapshot,
};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod allocate;
pub mod classify;
pub mod convert;
pub mod proxy;

pub use allocate::{allocate, total_counted_stake};
pub use classify::classify;
pub use convert::{check_params, to_liquid_stake};
pub use proxy::{resolve_proxies, ProxyResolution};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error(
        "invalid global state: fund {total_vesting_fund_liquid} over {total_vesting_shares} shares"
    )]
    InvalidGlobalState {
        total_vesting_fund_liquid: f64,
        total_vesting_shares: f64,
    },

    /// Carries the classified records so callers can still inspect them.
    #[error("no eligible stake among {} classified accounts", .records.len())]
    NoEligibleStake { records: Vec<EligibilityRecord> },

    #[error("monthly budget must be finite and non-negative, got {0}")]
    InvalidBudget(f64),

    #[error("direct voter {0} has no account record")]
    MissingVoterRecord(AccountId),

    #[error("proxied account {0} has no account record")]
    MissingProxiedRecord(AccountId),
}

pub type Result<T> = std::result::Result<T, AllocationError>;

/// Runs the whole pipeline over one fetched snapshot:
/// proxy-chain records → delegations → eligibility → allocation → report.
pub fn run_allocation(snapshot: &RawSnapshot, config: &AirdropConfig) -> Result<AllocationReport> {
    if snapshot.proposal_id != config.proposal_id {
        warn!(
            "Snapshot is for proposal {}, config names {}; using the snapshot",
            snapshot.proposal_id, config.proposal_id
        );
    }

    check_params(&snapshot.params)?;

    let voter_set: BTreeSet<AccountId> = snapshot.voters.iter().cloned().collect();

    let (latest_voters, mut conflicts) = proxy::latest_observations(
        snapshot
            .voter_accounts
            .iter()
            .filter(|account| voter_set.contains(&account.id)),
    );
    if let Some(missing) = voter_set
        .iter()
        .find(|id| !latest_voters.contains_key(id.as_str()))
    {
        return Err(AllocationError::MissingVoterRecord(missing.clone()));
    }
    let voters: Vec<Account> = latest_voters.into_values().cloned().collect();

    // A chain record only says who the service listed the account under; the
    // account's own proxy decides where its weight goes.
    let (latest_proxied, proxied_conflicts) = proxy::latest_observations(
        snapshot
            .proxied_accounts
            .iter()
            .filter(|account| !voter_set.contains(&account.id)),
    );
    conflicts.extend(proxied_conflicts);

    let mut candidates = Vec::new();
    for record in &snapshot.proxy_chains {
        if voter_set.contains(&record.account) {
            continue;
        }
        match latest_proxied.get(record.account.as_str()) {
            Some(account) => {
                if account.proxy_target.as_deref() != Some(record.voter.as_str()) {
                    debug!(
                        "{} listed under {} but proxies to {:?}",
                        record.account, record.voter, account.proxy_target
                    );
                }
                candidates.push(Account {
                    id: record.account.clone(),
                    vesting_shares: record.delegated_vests,
                    proxy_target: account.proxy_target.clone(),
                });
            }
            None if record.delegated_vests > 0.0 => {
                return Err(AllocationError::MissingProxiedRecord(record.account.clone()));
            }
            None => {}
        }
    }

    let resolution = resolve_proxies(&voter_set, &candidates, &snapshot.params)?;
    conflicts.extend(resolution.conflicts);

    let records = classify(&voters, &resolution.delegations, &snapshot.params)?;
    let entries = allocate(&records, config.airdrop_per_month())?;

    let proposal_total_stake = total_counted_stake(&records);
    let airdrop_total_token_count = entries
        .iter()
        .filter(|e| e.is_eligible)
        .map(|e| e.token_allocation)
        .sum();

    let total_proxied_accounts = snapshot
        .proxy_chains
        .iter()
        .filter(|record| record.delegated_vests > 0.0)
        .map(|record| record.account.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    info!(
        "Proposal {}: {} voters, {} proxied accounts ({} counted as delegators), total stake {:.0}, {} tokens allocated",
        snapshot.proposal_id,
        voter_set.len(),
        total_proxied_accounts,
        resolution.delegations.len(),
        proposal_total_stake,
        airdrop_total_token_count
    );

    Ok(AllocationReport {
        snapshot_timestamp: snapshot.taken_at,
        proposal_id: snapshot.proposal_id,
        total_voters: voter_set.len(),
        total_proxied_accounts,
        total_airdrop: config.total_airdrop,
        months: config.months,
        airdrop_per_month: config.airdrop_per_month(),
        proposal_total_stake,
        airdrop_total_token_count,
        conflicts,
        entries,
    })
}

#[cfg(test)]
mod proptests;
