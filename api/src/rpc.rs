//! The ledger's JSON-RPC interface, reduced to the calls the portal makes.

use std::cell::Cell;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use serde_json::Value;

use crate::commitment::Commitment;
use crate::pubkey::Hash;
use crate::pubkey::Pubkey;
use crate::pubkey::Signature;
use crate::transaction::Transaction;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rpc error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        logs: Vec<String>,
    },

    #[error("unexpected rpc response: {0}")]
    Decode(String),
}

impl RpcError {
    /// Whether the error message or the program logs mention `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        match self {
            Self::Rpc { message, logs, .. } => {
                message.to_lowercase().contains(&needle)
                    || logs.iter().any(|l| l.to_lowercase().contains(&needle))
            }
            Self::Transport(msg) | Self::Decode(msg) => msg.to_lowercase().contains(&needle),
        }
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Where a submitted transaction has got to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureStatus {
    /// `None` until the cluster reports a level.
    pub confirmation: Option<Commitment>,
    /// The transaction error, if it executed and failed.
    pub err: Option<String>,
}

/// The ledger calls the reader and writer depend on.
#[async_trait(?Send)]
pub trait LedgerRpc {
    fn endpoint(&self) -> &str;

    /// Raw account data, or `None` when the account does not exist.
    async fn account_data(
        &self,
        address: &Pubkey,
        commitment: Commitment,
    ) -> Result<Option<Vec<u8>>, RpcError>;

    async fn latest_blockhash(&self, commitment: Commitment) -> Result<Hash, RpcError>;

    /// Submits a signed transaction after a preflight simulation at `commitment`.
    async fn send_transaction(
        &self,
        transaction: &Transaction,
        commitment: Commitment,
    ) -> Result<Signature, RpcError>;

    async fn signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>, RpcError>;
}

/// JSON-RPC 2.0 over HTTP POST.
pub struct HttpRpc {
    url: String,
    client: reqwest::Client,
    next_id: Cell<u64>,
}

#[derive(Deserialize)]
struct Response<T> {
    result: Option<T>,
    error: Option<ErrorObject>,
}

#[derive(Deserialize)]
struct ErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<ErrorData>,
}

#[derive(Deserialize)]
struct ErrorData {
    #[serde(default)]
    logs: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Deserialize)]
struct AccountValue {
    /// `[payload, encoding]`
    data: (String, String),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockhashValue {
    blockhash: Hash,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusValue {
    #[serde(default)]
    err: Option<Value>,
    #[serde(default)]
    confirmation_status: Option<Commitment>,
}

impl HttpRpc {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            next_id: Cell::new(1),
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        dioxus_logger::tracing::debug!("rpc {} -> {}", method, self.url);

        let response: Response<T> = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match response {
            Response {
                error: Some(error), ..
            } => Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
                logs: error.data.and_then(|d| d.logs).unwrap_or_default(),
            }),
            Response {
                result: Some(result),
                ..
            } => Ok(result),
            _ => Err(RpcError::Decode(format!("{method}: response has no result"))),
        }
    }
}

#[async_trait(?Send)]
impl LedgerRpc for HttpRpc {
    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn account_data(
        &self,
        address: &Pubkey,
        commitment: Commitment,
    ) -> Result<Option<Vec<u8>>, RpcError> {
        let params = json!([
            address.to_string(),
            { "encoding": "base64", "commitment": commitment },
        ]);
        let response: WithContext<Option<AccountValue>> =
            self.call("getAccountInfo", params).await?;

        let Some(account) = response.value else {
            return Ok(None);
        };
        let (payload, encoding) = account.data;
        if encoding != "base64" {
            return Err(RpcError::Decode(format!("unexpected encoding `{encoding}`")));
        }
        BASE64
            .decode(payload)
            .map(Some)
            .map_err(|e| RpcError::Decode(e.to_string()))
    }

    async fn latest_blockhash(&self, commitment: Commitment) -> Result<Hash, RpcError> {
        let params = json!([{ "commitment": commitment }]);
        let response: WithContext<BlockhashValue> = self.call("getLatestBlockhash", params).await?;
        Ok(response.value.blockhash)
    }

    async fn send_transaction(
        &self,
        transaction: &Transaction,
        commitment: Commitment,
    ) -> Result<Signature, RpcError> {
        let params = json!([
            BASE64.encode(transaction.serialize()),
            {
                "encoding": "base64",
                "skipPreflight": false,
                "preflightCommitment": commitment,
            },
        ]);
        self.call("sendTransaction", params).await
    }

    async fn signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>, RpcError> {
        let params = json!([[signature.to_string()], { "searchTransactionHistory": false }]);
        let response: WithContext<Vec<Option<StatusValue>>> =
            self.call("getSignatureStatuses", params).await?;

        Ok(response.value.into_iter().next().flatten().map(|status| SignatureStatus {
            confirmation: status.confirmation_status,
            err: status.err.filter(|e| !e.is_null()).map(|e| e.to_string()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mentions_searches_message_and_logs() {
        let err = RpcError::Rpc {
            code: -32002,
            message: "Transaction simulation failed".to_string(),
            logs: vec!["Allocate: account Address { .. } already in use".to_string()],
        };
        assert!(err.mentions("Already in use"));
        assert!(err.mentions("simulation failed"));
        assert!(!err.mentions("AccountNotInitialized"));
    }

    #[test]
    fn parses_error_response_with_logs() {
        let body = r#"{
            "jsonrpc": "2.0",
            "id": 1,
            "error": {
                "code": -32002,
                "message": "Transaction simulation failed: Error processing Instruction 0: custom program error: 0xbc4",
                "data": { "err": { "InstructionError": [0, { "Custom": 3012 }] }, "logs": ["Program log: AccountNotInitialized"] }
            }
        }"#;
        let response: Response<Signature> = serde_json::from_str(body).unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, -32002);
        assert_eq!(error.data.unwrap().logs.unwrap().len(), 1);
    }

    #[test]
    fn parses_missing_account() {
        let body = r#"{ "jsonrpc": "2.0", "id": 1, "result": { "context": { "slot": 5 }, "value": null } }"#;
        let response: Response<WithContext<Option<AccountValue>>> =
            serde_json::from_str(body).unwrap();
        assert!(response.result.unwrap().value.is_none());
    }

    #[test]
    fn parses_signature_status() {
        let body = r#"{ "jsonrpc": "2.0", "id": 3, "result": { "context": { "slot": 9 },
            "value": [ { "slot": 9, "confirmations": 0, "err": null, "confirmationStatus": "confirmed" } ] } }"#;
        let response: Response<WithContext<Vec<Option<StatusValue>>>> =
            serde_json::from_str(body).unwrap();
        let status = response.result.unwrap().value.remove(0).unwrap();
        assert_eq!(status.confirmation_status, Some(Commitment::Confirmed));
        assert!(status.err.is_none());
    }
}
