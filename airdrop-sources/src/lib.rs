//! Data-source side of a snapshot: global stake parameters, the proposal's
//! direct voters, their account records and the accounts proxying to them.
//!
//! Everything here is I/O. The engine only ever sees the [`RawSnapshot`]
//! produced by [`fetch_snapshot`].

use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use airdrop_types::{Account, AccountId, AirdropConfig, GlobalStakeParameters, ProxyChainRecord, RawSnapshot};
use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;
use tracing::{debug, info};

pub mod condenser;
pub mod error;
pub mod proxy_chain;
pub mod raw;
pub mod throttle;

pub use error::{Result, SourceError};
use raw::RawProposalVote;
use throttle::{retry_with_backoff, RateLimiter};

#[async_trait]
pub trait StakeSource: Send + Sync {
    async fn global_params(&self) -> Result<GlobalStakeParameters>;

    async fn proposal_votes_page(
        &self,
        proposal_id: u64,
        start_voter: &str,
        limit: u32,
    ) -> Result<Vec<RawProposalVote>>;

    async fn accounts(&self, names: &[AccountId]) -> Result<Vec<Account>>;

    async fn proxied_by(&self, voter: &str) -> Result<Vec<ProxyChainRecord>>;
}

/// The production source: condenser RPC node plus the proxy-chain web service.
pub struct HttpSource {
    condenser: condenser::CondenserClient,
    proxy_chain: proxy_chain::ProxyChainClient,
}

impl HttpSource {
    pub fn new(config: &AirdropConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("airdrop-snapshot/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            condenser: condenser::CondenserClient::new(client.clone(), &config.node_url),
            proxy_chain: proxy_chain::ProxyChainClient::new(client, &config.proxy_chain_url),
        })
    }
}

#[async_trait]
impl StakeSource for HttpSource {
    async fn global_params(&self) -> Result<GlobalStakeParameters> {
        self.condenser.global_params().await
    }

    async fn proposal_votes_page(
        &self,
        proposal_id: u64,
        start_voter: &str,
        limit: u32,
    ) -> Result<Vec<RawProposalVote>> {
        self.condenser.proposal_votes_page(proposal_id, start_voter, limit).await
    }

    async fn accounts(&self, names: &[AccountId]) -> Result<Vec<Account>> {
        self.condenser.accounts(names).await
    }

    async fn proxied_by(&self, voter: &str) -> Result<Vec<ProxyChainRecord>> {
        self.proxy_chain.proxied_by(voter).await
    }
}

/// Pages through the proposal's votes. Duplicate voters are dropped, first-seen order kept.
///
/// The votes query is inclusive of its start voter, so a continuation page asks
/// for one extra entry and skips the repeated one.
pub async fn fetch_voters<S: StakeSource + ?Sized>(
    source: &S,
    proposal_id: u64,
    page_size: u32,
    limiter: &RateLimiter,
    backoff: Duration,
) -> Result<Vec<AccountId>> {
    let mut voters = Vec::new();
    let mut seen = HashSet::new();
    let mut start = String::new();

    loop {
        let resuming = !start.is_empty();
        let limit = if resuming { page_size.saturating_add(1) } else { page_size };

        limiter.acquire().await;
        let mut page = retry_with_backoff("list_proposal_votes", backoff, || {
            source.proposal_votes_page(proposal_id, &start, limit)
        })
        .await?;

        if resuming
            && page
                .first()
                .is_some_and(|vote| vote.proposal.id == proposal_id && vote.voter == start)
        {
            page.remove(0);
        }

        let full_page = page.len() >= page_size as usize;
        let mut left_proposal = false;
        let mut last_voter = None;
        for vote in page {
            if vote.proposal.id != proposal_id {
                left_proposal = true;
                break;
            }
            if seen.insert(vote.voter.clone()) {
                voters.push(vote.voter.clone());
            }
            last_voter = Some(vote.voter);
        }

        match last_voter {
            Some(last) if full_page && !left_proposal && last != start => start = last,
            _ => break,
        }
    }

    info!("Found {} direct voters for proposal {}", voters.len(), proposal_id);
    Ok(voters)
}

/// Looks accounts up in batches of `batch_size`, in input order.
pub async fn fetch_accounts<S: StakeSource + ?Sized>(
    source: &S,
    ids: &[AccountId],
    batch_size: usize,
    limiter: &RateLimiter,
    backoff: Duration,
) -> Result<Vec<Account>> {
    let mut accounts = Vec::with_capacity(ids.len());
    for (i, batch) in ids.chunks(batch_size).enumerate() {
        debug!("Fetching account batch {} ({} accounts)", i + 1, batch.len());
        limiter.acquire().await;
        let found = retry_with_backoff("get_accounts", backoff, || source.accounts(batch)).await?;
        accounts.extend(found);
    }
    Ok(accounts)
}

/// Looks up who proxies to each voter, at most `max_in_flight` requests at a time.
/// Results keep voter order, so a later voter's record for the same account
/// is also the later observation.
pub async fn fetch_proxy_chains<S: StakeSource + ?Sized>(
    source: &S,
    voters: &[AccountId],
    max_in_flight: usize,
    limiter: &RateLimiter,
    backoff: Duration,
) -> Result<Vec<ProxyChainRecord>> {
    let chains: Vec<Vec<ProxyChainRecord>> = stream::iter(voters)
        .map(|voter| async move {
            limiter.acquire().await;
            let records =
                retry_with_backoff("proxy chain lookup", backoff, || source.proxied_by(voter)).await?;
            debug!("Found {} direct proxies to {}", records.len(), voter);
            Ok::<_, SourceError>(records)
        })
        .buffered(max_in_flight.max(1))
        .try_collect()
        .await?;

    let records: Vec<ProxyChainRecord> = chains.into_iter().flatten().collect();
    info!(
        "Found {} proxy records ({} with non-zero vests) for {} voters",
        records.len(),
        records.iter().filter(|r| r.delegated_vests > 0.0).count(),
        voters.len()
    );
    Ok(records)
}

/// Fetches everything one allocation run needs.
pub async fn fetch_snapshot<S: StakeSource + ?Sized>(
    source: &S,
    config: &AirdropConfig,
) -> Result<RawSnapshot> {
    let taken_at = Utc::now();
    let throttle = Duration::from_millis(config.throttle_ms);
    let limiter = RateLimiter::new(throttle);
    let backoff = throttle.max(Duration::from_millis(100));

    info!("Fetching voters and stake for proposal {}", config.proposal_id);

    limiter.acquire().await;
    let params = retry_with_backoff("get_dynamic_global_properties", backoff, || {
        source.global_params()
    })
    .await?;

    let voters = fetch_voters(
        source,
        config.proposal_id,
        config.votes_page_size,
        &limiter,
        backoff,
    )
    .await?;

    let voter_accounts =
        fetch_accounts(source, &voters, config.account_batch_size, &limiter, backoff).await?;
    let found: BTreeSet<&str> = voter_accounts.iter().map(|a| a.id.as_str()).collect();
    if let Some(missing) = voters.iter().find(|v| !found.contains(v.as_str())) {
        return Err(SourceError::MissingAccount(missing.clone()));
    }
    info!(
        "{} direct voters set a proxy themselves",
        voter_accounts.iter().filter(|a| a.proxy_target.is_some()).count()
    );

    let proxy_chains =
        fetch_proxy_chains(source, &voters, config.max_in_flight, &limiter, backoff).await?;

    // The chain listing names who an account was found under, not its own proxy.
    let voter_set: BTreeSet<&str> = voters.iter().map(String::as_str).collect();
    let mut listed = BTreeSet::new();
    let proxied_ids: Vec<AccountId> = proxy_chains
        .iter()
        .filter(|r| r.delegated_vests > 0.0 && !voter_set.contains(r.account.as_str()))
        .filter(|r| listed.insert(r.account.as_str()))
        .map(|r| r.account.clone())
        .collect();
    let proxied_accounts =
        fetch_accounts(source, &proxied_ids, config.account_batch_size, &limiter, backoff).await?;
    let found: BTreeSet<&str> = proxied_accounts.iter().map(|a| a.id.as_str()).collect();
    if let Some(missing) = proxied_ids.iter().find(|id| !found.contains(id.as_str())) {
        return Err(SourceError::MissingAccount(missing.clone()));
    }
    info!("Fetched {} proxied account records", proxied_accounts.len());

    Ok(RawSnapshot {
        proposal_id: config.proposal_id,
        taken_at,
        params,
        voters,
        voter_accounts,
        proxy_chains,
        proxied_accounts,
    })
}
