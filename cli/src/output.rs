use alloy::primitives::{Address, Bytes, B256, U256};
use safe_queue::{ExecutionPayload, QueueView, SafeContext};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeInfoOutput {
    pub address: Address,
    pub chain_id: u64,
    pub version: String,
    pub nonce: U256,
    pub threshold: u64,
    pub owners: Vec<Address>,
}

impl From<&SafeContext> for SafeInfoOutput {
    fn from(ctx: &SafeContext) -> Self {
        Self {
            address: ctx.address(),
            chain_id: ctx.chain_id(),
            version: ctx.contract_version().to_string(),
            nonce: ctx.current_nonce(),
            threshold: ctx.threshold(),
            owners: ctx.owners().to_vec(),
        }
    }
}

impl SafeInfoOutput {
    pub fn print(&self, json: bool) {
        if json {
            println!("{}", serde_json::to_string_pretty(self).unwrap());
        } else {
            println!("Safe: {}", self.address);
            println!("Chain ID: {}", self.chain_id);
            println!("Version: {}", self.version);
            println!("Nonce: {}", self.nonce);
            println!("Threshold: {} of {}", self.threshold, self.owners.len());
            println!("Owners:");
            for (i, owner) in self.owners.iter().enumerate() {
                println!("  {}: {}", i + 1, owner);
            }
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueOutput {
    pub queue: QueueView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payloads: Option<Vec<PayloadOutput>>,
}

impl QueueOutput {
    pub fn print(&self, json: bool) {
        if json {
            println!("{}", serde_json::to_string_pretty(self).unwrap());
            return;
        }

        let queue = &self.queue;
        println!("Safe: {}", queue.safe);
        match queue.current_nonce {
            Some(nonce) => println!("Current Nonce: {}", nonce),
            None => println!("Current Nonce: unavailable (states are unknown)"),
        }

        if queue.groups.is_empty() {
            println!("Queue is empty");
        }

        for group in &queue.groups {
            let marker = if group.contested { " (conflicting)" } else { "" };
            println!();
            println!("Nonce {}{}:", group.nonce, marker);
            for tx in &group.transactions {
                println!("  {} [{}]", tx.id, tx.state);
                println!("     To: {}", tx.to);
                if !tx.value.is_zero() {
                    println!("     Value: {} wei", tx.value);
                }
                println!("     Operation: {}", tx.operation);
                println!("     Submitted: {}", tx.submission_time.to_rfc3339());
                println!("     Confirmations: {}", tx.confirmations_summary());
                for signer in &tx.signers {
                    println!("       - {}", signer);
                }
                if let Some(error) = &tx.hashing_error {
                    println!("     Cannot hash: {}", error);
                }
            }
        }

        if let Some(payloads) = &self.payloads {
            println!();
            println!("Executable ({}):", payloads.len());
            for payload in payloads {
                println!("  Nonce {} -> {}", payload.payload.nonce, payload.payload.safe);
                println!("     Calldata: {}", payload.calldata);
            }
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadOutput {
    #[serde(flatten)]
    pub payload: ExecutionPayload,
    pub calldata: Bytes,
}

impl From<ExecutionPayload> for PayloadOutput {
    fn from(payload: ExecutionPayload) -> Self {
        let calldata = payload.calldata();
        Self { payload, calldata }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HashOutput {
    pub version: String,
    pub chain_id: u64,
    pub domain_separator: B256,
    pub safe_tx_hash: B256,
    pub transaction_hash: B256,
}

impl HashOutput {
    pub fn print(&self, json: bool) {
        if json {
            println!("{}", serde_json::to_string_pretty(self).unwrap());
        } else {
            println!("Version: {}", self.version);
            println!("Chain ID: {}", self.chain_id);
            println!("Domain Separator: {}", self.domain_separator);
            println!("SafeTx Hash: {}", self.safe_tx_hash);
            println!("Transaction Hash: {}", self.transaction_hash);
        }
    }
}
