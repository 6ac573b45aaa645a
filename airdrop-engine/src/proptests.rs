//! Property tests for conversion and allocation:
//! - conversion is strictly increasing in the vesting amount
//! - rounded allocations stay within half a token per account of the budget
//! - eligible shares sum to 100%
//! - identical inputs give identical ranked output

use super::*;
use airdrop_types::GlobalStakeParameters;
use proptest::prelude::*;

fn voter_id(i: usize) -> String {
    format!("voter{:02}", i)
}

/// Builds voters (some proxying to another voter or to an outsider) and
/// delegators pointing at voters, outsiders, or other delegators.
fn build_inputs(
    voters: &[(u32, u8)],
    delegators: &[(u32, u8)],
) -> (Vec<Account>, Vec<Account>, BTreeSet<AccountId>) {
    let n = voters.len();
    let voter_accounts: Vec<Account> = voters
        .iter()
        .enumerate()
        .map(|(i, (stake, proxy))| {
            let account = Account::new(voter_id(i), *stake as f64);
            match proxy % 4 {
                0 => account.with_proxy(voter_id(*proxy as usize % n)),
                1 => account.with_proxy("outsider"),
                _ => account,
            }
        })
        .collect();

    let candidates: Vec<Account> = delegators
        .iter()
        .enumerate()
        .map(|(i, (stake, target))| {
            let account = Account::new(format!("delegator{:02}", i), *stake as f64);
            match target % 5 {
                0 => account.with_proxy("outsider"),
                1 => account.with_proxy(format!("delegator{:02}", *target as usize % delegators.len())),
                _ => account.with_proxy(voter_id(*target as usize % n)),
            }
        })
        .collect();

    let set = voter_accounts.iter().map(|v| v.id.clone()).collect();
    (voter_accounts, candidates, set)
}

fn params_strategy() -> impl Strategy<Value = GlobalStakeParameters> {
    (1u32..1_000_000_000, 1u64..1_000_000_000_000)
        .prop_map(|(fund, shares)| GlobalStakeParameters::new(fund as f64, shares as f64))
}

proptest! {
    #[test]
    fn prop_conversion_strictly_increasing(
        params in params_strategy(),
        amount in 0u32..(u32::MAX / 2),
        delta in 1u32..1000,
    ) {
        let low = to_liquid_stake(amount as f64, &params).unwrap();
        let high = to_liquid_stake(amount as f64 + delta as f64, &params).unwrap();
        prop_assert!(high > low);
    }

    #[test]
    fn prop_allocation_conserves_budget_within_rounding(
        params in params_strategy(),
        voters in prop::collection::vec((1u32..10_000_000, any::<u8>()), 1..20),
        delegators in prop::collection::vec((0u32..10_000_000, any::<u8>()), 0..30),
        budget in 1u32..u32::MAX,
    ) {
        let (voter_accounts, candidates, set) = build_inputs(&voters, &delegators);
        let resolution = resolve_proxies(&set, &candidates, &params).unwrap();
        let records = classify(&voter_accounts, &resolution.delegations, &params).unwrap();

        match allocate(&records, budget as f64) {
            Ok(entries) => {
                let eligible: Vec<_> = entries.iter().filter(|e| e.is_eligible).collect();
                let allocated: u64 = eligible.iter().map(|e| e.token_allocation).sum();
                let drift = (allocated as f64 - budget as f64).abs();
                prop_assert!(drift <= 0.5 * eligible.len() as f64 + 1e-6);

                let shares: f64 = eligible.iter().map(|e| e.share_percent).sum();
                prop_assert!((shares - 100.0).abs() <= 100.0 * 1e-6);

                prop_assert!(entries.iter().filter(|e| !e.is_eligible).all(|e| e.token_allocation == 0));
            }
            Err(AllocationError::NoEligibleStake { .. }) => {
                prop_assert!(records.iter().all(|r| !r.is_eligible));
            }
            Err(e) => prop_assert!(false, "unexpected error {:?}", e),
        }
    }

    #[test]
    fn prop_second_hop_never_counted(
        voters in prop::collection::vec((1u32..10_000_000, any::<u8>()), 1..10),
        delegators in prop::collection::vec((1u32..10_000_000, any::<u8>()), 1..20),
    ) {
        let params = GlobalStakeParameters::new(1.0, 1.0);
        let (voter_accounts, candidates, set) = build_inputs(&voters, &delegators);
        let resolution = resolve_proxies(&set, &candidates, &params).unwrap();
        let records = classify(&voter_accounts, &resolution.delegations, &params).unwrap();

        for record in records.iter().filter(|r| r.role == airdrop_types::Role::Delegator) {
            let target = record.resolved_proxy_target.as_ref().unwrap();
            prop_assert!(set.contains(target));
        }
    }

    #[test]
    fn prop_allocation_is_deterministic(
        params in params_strategy(),
        voters in prop::collection::vec((1u32..10_000_000, any::<u8>()), 1..20),
        delegators in prop::collection::vec((0u32..10_000_000, any::<u8>()), 0..30),
    ) {
        let (voter_accounts, candidates, set) = build_inputs(&voters, &delegators);
        let run = || -> Result<Vec<airdrop_types::AllocationEntry>> {
            let resolution = resolve_proxies(&set, &candidates, &params)?;
            let records = classify(&voter_accounts, &resolution.delegations, &params)?;
            allocate(&records, 20_000_000.0)
        };
        prop_assert_eq!(run(), run());
    }
}
