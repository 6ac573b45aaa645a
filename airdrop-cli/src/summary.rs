use airdrop_types::AllocationReport;
use std::fmt::{self, Write};

/// Console summary: totals, rates, conflicts and the top `top` accounts.
pub fn render(report: &AllocationReport, top: usize) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "\nProposal {} snapshot at {}", report.proposal_id, report.snapshot_timestamp)?;
    writeln!(out, "Direct voters: {}", report.total_voters)?;
    writeln!(out, "Proxied accounts: {}", report.total_proxied_accounts)?;
    writeln!(out, "Total SP among eligible accounts: {:.0}", report.proposal_total_stake)?;
    writeln!(out, "Average SP per account: {:.0}", report.average_stake_per_account())?;
    writeln!(out, "Total airdrop per month: {:.0}", report.airdrop_per_month)?;
    writeln!(out, "Airdrop per SP: {:.6}", report.airdrop_per_stake_unit())?;
    writeln!(out, "Total token count: {}", report.airdrop_total_token_count)?;
    writeln!(out, "Entries digest: {}", hex::encode(report.entries_digest()))?;

    if !report.conflicts.is_empty() {
        writeln!(out, "\nConflicting proxy assignments (last observation kept):")?;
        for c in &report.conflicts {
            writeln!(
                out,
                "  {}: {} -> {}",
                c.account,
                c.replaced_target.as_deref().unwrap_or("-"),
                c.kept_target.as_deref().unwrap_or("-")
            )?;
        }
    }

    writeln!(out, "\nTop {} Accounts by SP:", top)?;
    for (i, entry) in report.top(top).iter().enumerate() {
        writeln!(
            out,
            "{}. {}: {:.0} SP ({:.2}%) - {} tokens",
            i + 1,
            entry.account,
            entry.total_counted_stake,
            entry.share_percent,
            entry.token_allocation
        )?;
    }

    Ok(out)
}
