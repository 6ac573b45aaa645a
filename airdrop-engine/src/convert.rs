use airdrop_types::GlobalStakeParameters;

use crate::{AllocationError, Result};

/// Rejects parameters no conversion can be trusted with: a share pool that is
/// not positive, or a fund that is negative or not finite.
pub fn check_params(params: &GlobalStakeParameters) -> Result<()> {
    let shares = params.total_vesting_shares;
    let fund = params.total_vesting_fund_liquid;
    // Comparisons are false for NaN.
    if !(shares > 0.0 && shares.is_finite() && fund >= 0.0 && fund.is_finite()) {
        return Err(AllocationError::InvalidGlobalState {
            total_vesting_fund_liquid: fund,
            total_vesting_shares: shares,
        });
    }
    Ok(())
}

/// Converts vesting shares to their liquid-token equivalent at the snapshot's
/// exchange rate: `fund * vesting / shares`.
pub fn to_liquid_stake(vesting_amount: f64, params: &GlobalStakeParameters) -> Result<f64> {
    check_params(params)?;
    Ok((params.total_vesting_fund_liquid * vesting_amount) / params.total_vesting_shares)
}
