//! Single-hop proxy resolution.
//!
//! An account counts as a delegator only when its own proxy points straight at
//! a direct voter. If X proxies to Y and Y proxies to voter Z, X is dropped:
//! chains are never followed past the first hop.

use std::collections::{BTreeMap, BTreeSet};

use airdrop_types::{Account, AccountId, GlobalStakeParameters, ProxyConflict, ProxyDelegation};
use tracing::{debug, warn};

use crate::convert::to_liquid_stake;
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProxyResolution {
    pub delegations: BTreeMap<AccountId, ProxyDelegation>,
    pub conflicts: Vec<ProxyConflict>,
}

/// Keeps the last observation of every account id, in input order.
/// Each replaced observation that differs from its successor is returned as a conflict.
pub fn latest_observations<'a, I>(accounts: I) -> (BTreeMap<&'a str, &'a Account>, Vec<ProxyConflict>)
where
    I: IntoIterator<Item = &'a Account>,
{
    let mut latest: BTreeMap<&str, &Account> = BTreeMap::new();
    let mut conflicts = Vec::new();

    for account in accounts {
        if let Some(previous) = latest.insert(account.id.as_str(), account) {
            if previous != account {
                warn!(
                    "Conflicting proxy data for {}: {:?} replaced by {:?}",
                    account.id, previous.proxy_target, account.proxy_target
                );
                conflicts.push(ProxyConflict {
                    account: account.id.clone(),
                    replaced_target: previous.proxy_target.clone(),
                    kept_target: account.proxy_target.clone(),
                });
            }
        }
    }

    (latest, conflicts)
}

pub fn resolve_proxies(
    direct_voters: &BTreeSet<AccountId>,
    candidates: &[Account],
    params: &GlobalStakeParameters,
) -> Result<ProxyResolution> {
    // Voters are governed by their own vote, never by a delegation.
    let (latest, conflicts) =
        latest_observations(candidates.iter().filter(|c| !direct_voters.contains(&c.id)));

    let mut delegations = BTreeMap::new();
    for (id, account) in latest {
        let Some(target) = account.proxy_target.as_ref() else {
            continue;
        };
        if !direct_voters.contains(target) {
            debug!("Dropping {} -> {}: target is not a direct voter", id, target);
            continue;
        }
        if !account.has_stake() {
            continue;
        }

        let liquid_stake = to_liquid_stake(account.vesting_shares, params)?;
        delegations.insert(
            id.to_string(),
            ProxyDelegation {
                delegator: id.to_string(),
                direct_target: target.clone(),
                liquid_stake,
            },
        );
    }

    Ok(ProxyResolution {
        delegations,
        conflicts,
    })
}
