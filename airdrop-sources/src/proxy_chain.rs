use airdrop_types::ProxyChainRecord;
use reqwest::Client;

use crate::error::{Result, SourceError};
use crate::raw::RawProxyChainResponse;

/// Client for the third-party service listing who proxies to a given account.
pub struct ProxyChainClient {
    client: Client,
    base_url: String,
}

impl ProxyChainClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn proxied_by(&self, voter: &str) -> Result<Vec<ProxyChainRecord>> {
        let url = format!(
            "{}/witnesses_api/getWitnessProxyChainBackwards/{}",
            self.base_url, voter
        );
        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let raw: RawProxyChainResponse =
            serde_json::from_slice(&body).map_err(|source| SourceError::Decode {
                context: url,
                source,
            })?;
        raw.into_records(voter)
    }
}
