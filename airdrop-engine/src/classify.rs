use std::collections::{BTreeMap, BTreeSet};

use airdrop_types::{Account, AccountId, EligibilityRecord, GlobalStakeParameters, ProxyDelegation, Role};
use tracing::debug;

use crate::convert::to_liquid_stake;
use crate::Result;

/// Decides whose stake counts toward the proposal total.
///
/// * A direct voter without a proxy counts its own stake.
/// * A direct voter with a proxy counts its own stake only if the proxy also
///   voted. Otherwise the proxy assignment wins and the voter counts nothing.
/// * A resolved delegator counts its delegated stake.
///
/// Only accounts that are voters or delegation keys produce records. A voter id
/// listed twice keeps its last record. Output is ordered by account id.
pub fn classify(
    direct_voters: &[Account],
    delegations: &BTreeMap<AccountId, ProxyDelegation>,
    params: &GlobalStakeParameters,
) -> Result<Vec<EligibilityRecord>> {
    let voters: BTreeMap<&str, &Account> = direct_voters
        .iter()
        .map(|voter| (voter.id.as_str(), voter))
        .collect();
    let voter_ids: BTreeSet<&str> = voters.keys().copied().collect();

    let mut records = BTreeMap::new();

    for (id, voter) in &voters {
        let own_stake = to_liquid_stake(voter.vesting_shares, params)?;
        let is_eligible = match &voter.proxy_target {
            None => true,
            Some(target) => voter_ids.contains(target.as_str()),
        };
        if !is_eligible {
            debug!("{} voted but proxies to non-voter {:?}", id, voter.proxy_target);
        }

        records.insert(
            *id,
            EligibilityRecord {
                account: id.to_string(),
                role: Role::DirectVoter,
                own_stake,
                delegated_stake: 0.0,
                counted_stake: if is_eligible { own_stake } else { 0.0 },
                is_eligible,
                resolved_proxy_target: voter.proxy_target.clone(),
            },
        );
    }

    for (id, delegation) in delegations {
        if voter_ids.contains(id.as_str()) {
            continue;
        }
        let is_eligible = voter_ids.contains(delegation.direct_target.as_str());

        records.insert(
            id.as_str(),
            EligibilityRecord {
                account: id.clone(),
                role: Role::Delegator,
                own_stake: 0.0,
                delegated_stake: delegation.liquid_stake,
                counted_stake: if is_eligible { delegation.liquid_stake } else { 0.0 },
                is_eligible,
                resolved_proxy_target: Some(delegation.direct_target.clone()),
            },
        );
    }

    Ok(records.into_values().collect())
}
