use airdrop_types::AmountError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC {method} returned an error: {message}")]
    Rpc { method: String, message: String },

    #[error("unexpected response from {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("proxy chain lookup for {voter} failed with code {code}")]
    ProxyChain { voter: String, code: i64 },

    #[error("bad {field} for {account}: {source}")]
    Amount {
        account: String,
        field: &'static str,
        #[source]
        source: AmountError,
    },

    #[error("account {0} has no account record")]
    MissingAccount(String),
}

impl SourceError {
    /// Transport failures are worth another attempt; data errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::Http(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error() || s.as_u16() == 429)
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
