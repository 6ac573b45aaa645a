//! JSON-RPC client for the chain's condenser API.

use airdrop_types::{Account, AccountId, GlobalStakeParameters};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Result, SourceError};
use crate::raw::{RawAccount, RawDynamicGlobalProperties, RawProposalVote};

pub struct CondenserClient {
    client: Client,
    url: String,
}

impl CondenserClient {
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.trim_end_matches('/').to_string(),
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let method = format!("condenser_api.{}", method);
        debug!("RPC {} {}", method, params);

        let body = json!({
            "jsonrpc": "2.0",
            "method": &method,
            "params": params,
            "id": 1,
        });
        let resp: Value = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = resp.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(SourceError::Rpc { method, message });
        }

        let result = resp.get("result").cloned().unwrap_or(Value::Null);
        serde_json::from_value(result).map_err(|source| SourceError::Decode {
            context: method,
            source,
        })
    }

    pub async fn global_params(&self) -> Result<GlobalStakeParameters> {
        let raw: RawDynamicGlobalProperties = self.call("get_dynamic_global_properties", json!([])).await?;
        raw.into_params()
    }

    /// One page of votes ordered by (proposal, voter), starting at `start_voter` inclusive.
    pub async fn proposal_votes_page(
        &self,
        proposal_id: u64,
        start_voter: &str,
        limit: u32,
    ) -> Result<Vec<RawProposalVote>> {
        self.call(
            "list_proposal_votes",
            json!([[proposal_id, start_voter], limit, "by_proposal_voter", "ascending", "all"]),
        )
        .await
    }

    pub async fn accounts(&self, names: &[AccountId]) -> Result<Vec<Account>> {
        let raw: Vec<Option<RawAccount>> = self.call("get_accounts", json!([names])).await?;
        raw.into_iter()
            .flatten()
            .map(RawAccount::into_account)
            .collect()
    }
}
