//! Wire shapes returned by the condenser API and the proxy-chain service,
//! and their validation into the engine's data model.

use airdrop_types::amount::{check_amount, STEEM, VESTS};
use airdrop_types::{parse_asset_amount, Account, GlobalStakeParameters, ProxyChainRecord};
use serde::{Deserialize, Deserializer};

use crate::error::{Result, SourceError};

#[derive(Deserialize, Debug, Clone)]
pub struct RawDynamicGlobalProperties {
    pub total_vesting_fund_steem: String,
    pub total_vesting_shares: String,
}

impl RawDynamicGlobalProperties {
    pub fn into_params(self) -> Result<GlobalStakeParameters> {
        let fund = parse_asset_amount(&self.total_vesting_fund_steem, STEEM).map_err(|source| {
            SourceError::Amount {
                account: "global properties".to_string(),
                field: "total_vesting_fund_steem",
                source,
            }
        })?;
        let shares = parse_asset_amount(&self.total_vesting_shares, VESTS).map_err(|source| {
            SourceError::Amount {
                account: "global properties".to_string(),
                field: "total_vesting_shares",
                source,
            }
        })?;
        Ok(GlobalStakeParameters::new(fund, shares))
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawProposalRef {
    pub id: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawProposalVote {
    pub voter: String,
    pub proposal: RawProposalRef,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawAccount {
    pub name: String,
    pub vesting_shares: String,
    #[serde(default)]
    pub proxy: String,
}

impl RawAccount {
    pub fn into_account(self) -> Result<Account> {
        let vesting_shares =
            parse_asset_amount(&self.vesting_shares, VESTS).map_err(|source| SourceError::Amount {
                account: self.name.clone(),
                field: "vesting_shares",
                source,
            })?;
        // The chain reports "no proxy" as an empty string.
        let proxy_target = (!self.proxy.is_empty()).then_some(self.proxy);
        Ok(Account {
            id: self.name,
            vesting_shares,
            proxy_target,
        })
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawProxiedBy {
    pub account: String,
    #[serde(deserialize_with = "number_or_string")]
    pub vests: f64,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawProxyChainResult {
    #[serde(default)]
    pub proxied_by: Vec<RawProxiedBy>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawProxyChainResponse {
    pub code: i64,
    #[serde(default)]
    pub result: Option<RawProxyChainResult>,
}

impl RawProxyChainResponse {
    pub fn into_records(self, voter: &str) -> Result<Vec<ProxyChainRecord>> {
        if self.code != 0 {
            return Err(SourceError::ProxyChain {
                voter: voter.to_string(),
                code: self.code,
            });
        }

        self.result
            .unwrap_or_default()
            .proxied_by
            .into_iter()
            .map(|item| {
                let delegated_vests = check_amount(item.vests).map_err(|source| SourceError::Amount {
                    account: item.account.clone(),
                    field: "vests",
                    source,
                })?;
                Ok(ProxyChainRecord {
                    voter: voter.to_string(),
                    account: item.account,
                    delegated_vests,
                })
            })
            .collect()
    }
}

fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => {
            let number = s.split_whitespace().next().unwrap_or_default();
            number.parse().map_err(serde::de::Error::custom)
        }
    }
}
