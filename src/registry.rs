//! Safe Transaction Service client and wire types
//!
//! The service reports numbers either as JSON numbers or as decimal strings
//! depending on the field and the deployment, and serves lists either bare
//! or wrapped in a paginated `{ "next": ..., "results": [...] }` page. Both
//! shapes are accepted everywhere.

use alloy::primitives::{Address, Bytes, U256};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::chain::ChainConfig;
use crate::error::{Error, Result};
use crate::types::{Confirmation, Operation, PendingTransaction, RawTransaction, SignatureType};

/// Upper bound on followed `next` links for one fetch
const MAX_PAGES: usize = 50;

/// A number encoded as a JSON number or a decimal string
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ServiceNumber {
    Number(u64),
    Text(String),
}

impl ServiceNumber {
    fn to_u256(&self, field: &'static str) -> Result<U256> {
        match self {
            ServiceNumber::Number(n) => Ok(U256::from(*n)),
            ServiceNumber::Text(s) => s.trim().parse::<U256>().map_err(|e| Error::InvalidField {
                field,
                reason: format!("{s:?}: {e}"),
            }),
        }
    }
}

fn optional_u256(value: &Option<ServiceNumber>, field: &'static str) -> Result<U256> {
    value.as_ref().map_or(Ok(U256::ZERO), |n| n.to_u256(field))
}

/// One confirmation as the service reports it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfirmation {
    pub owner: Address,
    #[serde(default)]
    pub signature: Option<Bytes>,
    #[serde(default)]
    pub signature_type: Option<String>,
}

impl From<ServiceConfirmation> for Confirmation {
    fn from(c: ServiceConfirmation) -> Self {
        let signature = c.signature.unwrap_or_default();
        match c.signature_type.as_deref().and_then(SignatureType::from_service_tag) {
            Some(scheme) => Confirmation::new(c.owner, signature, scheme),
            None => Confirmation::untagged(c.owner, signature),
        }
    }
}

/// One multisig transaction as the service reports it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTransaction {
    pub safe: Address,
    pub to: Address,
    pub value: ServiceNumber,
    #[serde(default)]
    pub data: Option<Bytes>,
    pub operation: u8,
    #[serde(default)]
    pub safe_tx_gas: Option<ServiceNumber>,
    #[serde(default)]
    pub base_gas: Option<ServiceNumber>,
    #[serde(default)]
    pub gas_price: Option<ServiceNumber>,
    #[serde(default)]
    pub gas_token: Option<Address>,
    #[serde(default)]
    pub refund_receiver: Option<Address>,
    pub nonce: ServiceNumber,
    pub submission_date: String,
    #[serde(default)]
    pub is_executed: bool,
    #[serde(default)]
    pub confirmations: Vec<ServiceConfirmation>,
}

impl ServiceTransaction {
    /// Converts the wire record into the engine's model
    pub fn into_pending(self, chain_id: u64) -> Result<PendingTransaction> {
        let operation = Operation::try_from(self.operation).map_err(|reason| Error::InvalidField {
            field: "operation",
            reason,
        })?;

        let submission_time = DateTime::parse_from_rfc3339(&self.submission_date)
            .map_err(|e| Error::InvalidField {
                field: "submissionDate",
                reason: format!("{:?}: {e}", self.submission_date),
            })?
            .with_timezone(&Utc);

        let transaction = RawTransaction {
            safe_address: self.safe,
            to: self.to,
            value: self.value.to_u256("value")?,
            data: self.data.unwrap_or_default(),
            operation,
            safe_tx_gas: optional_u256(&self.safe_tx_gas, "safeTxGas")?,
            base_gas: optional_u256(&self.base_gas, "baseGas")?,
            gas_price: optional_u256(&self.gas_price, "gasPrice")?,
            gas_token: self.gas_token.unwrap_or(Address::ZERO),
            refund_receiver: self.refund_receiver.unwrap_or(Address::ZERO),
            nonce: self.nonce.to_u256("nonce")?,
            submission_time,
            chain_id,
            contract_version: None,
            is_executed: self.is_executed,
        };

        let confirmations = self.confirmations.into_iter().map(Confirmation::from).collect();

        Ok(PendingTransaction::new(transaction, confirmations))
    }
}

/// One page of a paginated listing
///
/// Records stay undecoded so one unreadable record cannot spoil the page.
#[derive(Debug, Clone, Deserialize)]
pub struct ServicePage {
    #[serde(default)]
    pub next: Option<String>,
    pub results: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ServiceDocument {
    List(Vec<serde_json::Value>),
    Page(ServicePage),
}

/// Decodes each record on its own, skipping the ones that cannot be read
fn decode_records(records: Vec<serde_json::Value>, chain_id: u64) -> Vec<PendingTransaction> {
    records
        .into_iter()
        .filter_map(|value| {
            let nonce = value.get("nonce").cloned();
            let decoded = serde_json::from_value::<ServiceTransaction>(value)
                .map_err(|e| Error::Registry(format!("invalid record: {e}")))
                .and_then(|record| record.into_pending(chain_id));

            match decoded {
                Ok(pending) => Some(pending),
                Err(err) => {
                    warn!(?nonce, %err, "skipping unreadable service record");
                    None
                }
            }
        })
        .collect()
}

/// Decodes a saved service response for offline evaluation
///
/// Accepts a bare array of transactions or a single paginated page; `next`
/// links are not followed. Records that cannot be decoded are skipped, so
/// only an unreadable document as a whole is an error.
pub fn parse_pending(json: &str, chain_id: u64) -> Result<Vec<PendingTransaction>> {
    let document: ServiceDocument =
        serde_json::from_str(json).map_err(|e| Error::Registry(format!("invalid document: {e}")))?;

    let records = match document {
        ServiceDocument::List(records) => records,
        ServiceDocument::Page(page) => page.results,
    };

    Ok(decode_records(records, chain_id))
}

/// Client for a Safe Transaction Service deployment
#[derive(Debug, Clone)]
pub struct TransactionServiceClient {
    http: reqwest::Client,
    config: ChainConfig,
}

impl TransactionServiceClient {
    pub fn new(config: ChainConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Uses a preconfigured HTTP client, e.g. one with timeouts set
    pub fn with_client(http: reqwest::Client, config: ChainConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// URL of the first page of a Safe's queue from `from_nonce` onwards
    ///
    /// Executed transactions are not filtered out, so a transaction executed
    /// after the context snapshot was taken is still reported as executed.
    pub fn queue_url(&self, safe: Address, from_nonce: U256) -> Result<Url> {
        let base = self.config.transaction_service_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/v1/safes/{safe}/multisig-transactions/"))
            .map_err(|e| Error::Registry(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("nonce__gte", &from_nonce.to_string())
            .append_pair("ordering", "nonce")
            .append_pair("trusted", "true");

        Ok(url)
    }

    /// Fetches every queued transaction of `safe` with nonce `>= from_nonce`
    ///
    /// Unreadable records are logged and skipped; the rest of the queue is kept.
    #[instrument(skip(self), fields(chain_id = self.config.chain_id))]
    pub async fn pending(&self, safe: Address, from_nonce: U256) -> Result<Vec<PendingTransaction>> {
        let mut next = Some(self.queue_url(safe, from_nonce)?);
        let mut pending = Vec::new();
        let mut pages = 0;

        while let Some(url) = next.take() {
            if pages == MAX_PAGES {
                warn!(pages, "stopping pagination, queue truncated");
                break;
            }
            pages += 1;

            let response = self.http.get(url).send().await?;
            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                return Err(Error::Registry(format!("{status}: {text}")));
            }

            let page: ServicePage = response.json().await?;
            debug!(page = pages, records = page.results.len(), "fetched queue page");

            pending.extend(decode_records(page.results, self.config.chain_id));

            next = page
                .next
                .map(|link| Url::parse(&link).map_err(|e| Error::Registry(format!("bad next link: {e}"))))
                .transpose()?;
        }

        Ok(pending)
    }
}
