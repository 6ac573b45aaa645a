use airdrop_types::{AllocationEntry, EligibilityRecord};

use crate::{AllocationError, Result};

/// Sum of counted stake over eligible records.
pub fn total_counted_stake(records: &[EligibilityRecord]) -> f64 {
    records
        .iter()
        .filter(|r| r.is_eligible)
        .map(|r| r.counted_stake)
        .sum()
}

/// Splits `monthly_budget` across eligible records in proportion to counted stake.
///
/// Every allocation is rounded to a whole token on its own; there is no
/// remainder pass, so the total may drift from the budget by at most half a
/// token per eligible account. Ineligible records are kept with zero share.
/// Output is ranked by counted stake, then account id.
pub fn allocate(records: &[EligibilityRecord], monthly_budget: f64) -> Result<Vec<AllocationEntry>> {
    if !monthly_budget.is_finite() || monthly_budget < 0.0 {
        return Err(AllocationError::InvalidBudget(monthly_budget));
    }

    let total = total_counted_stake(records);
    // Also rejects NaN.
    if !(total > 0.0) {
        return Err(AllocationError::NoEligibleStake {
            records: records.to_vec(),
        });
    }

    let mut entries: Vec<AllocationEntry> = records
        .iter()
        .map(|record| {
            let (share_percent, token_allocation) = if record.is_eligible {
                let fraction = record.counted_stake / total;
                (fraction * 100.0, (fraction * monthly_budget).round() as u64)
            } else {
                (0.0, 0)
            };

            AllocationEntry {
                account: record.account.clone(),
                stake_held: record.own_stake,
                stake_delegated_from: record.delegated_stake,
                total_counted_stake: record.counted_stake,
                share_percent,
                token_allocation,
                is_eligible: record.is_eligible,
                proxy_target: record.resolved_proxy_target.clone(),
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.total_counted_stake
            .total_cmp(&a.total_counted_stake)
            .then_with(|| a.account.cmp(&b.account))
    });

    Ok(entries)
}
