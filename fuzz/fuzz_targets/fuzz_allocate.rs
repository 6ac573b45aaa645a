#![no_main]

use std::collections::BTreeSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use airdrop_engine::{allocate, classify, resolve_proxies, AllocationError};
use airdrop_types::{Account, GlobalStakeParameters};

#[derive(Arbitrary, Debug)]
struct AllocateInput {
    fund: u32,
    shares: u32,
    budget: u32,
    voters: Vec<(u8, u32, Option<u8>)>,
    delegators: Vec<(u8, u32, u8)>,
}

fn name(prefix: &str, id: u8) -> String {
    format!("{}{}", prefix, id % 32)
}

fuzz_target!(|data: AllocateInput| {
    let params = GlobalStakeParameters::new(data.fund as f64, data.shares as f64);

    let voters: Vec<Account> = data
        .voters
        .iter()
        .map(|(id, stake, proxy)| {
            let account = Account::new(name("v", *id), *stake as f64);
            match proxy {
                Some(p) => account.with_proxy(name("v", *p)),
                None => account,
            }
        })
        .collect();
    let voter_set: BTreeSet<String> = voters.iter().map(|v| v.id.clone()).collect();

    let candidates: Vec<Account> = data
        .delegators
        .iter()
        .map(|(id, stake, target)| Account::new(name("d", *id), *stake as f64).with_proxy(name("v", *target)))
        .collect();

    let Ok(resolution) = resolve_proxies(&voter_set, &candidates, &params) else {
        assert_eq!(data.shares, 0);
        return;
    };
    let Ok(records) = classify(&voters, &resolution.delegations, &params) else {
        return;
    };

    match allocate(&records, data.budget as f64) {
        Ok(entries) => {
            assert_eq!(entries.len(), records.len());
            let eligible = entries.iter().filter(|e| e.is_eligible).count() as f64;
            let total: u64 = entries.iter().map(|e| e.token_allocation).sum();
            assert!((total as f64 - data.budget as f64).abs() <= 0.5 * eligible + 1e-6);
        }
        Err(AllocationError::NoEligibleStake { .. }) => {}
        Err(e) => panic!("unexpected error: {}", e),
    }
});
