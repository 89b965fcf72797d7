use color_eyre::eyre::{Result, WrapErr};
use safe_queue::encoding::{
    compute_domain_separator, compute_safe_tx_hash, compute_transaction_hash, ContractVersion,
};
use safe_queue::RawTransaction;

use crate::cli::HashArgs;
use crate::output::HashOutput;

pub fn run(args: HashArgs, json: bool) -> Result<()> {
    let contents = std::fs::read_to_string(&args.file)
        .wrap_err_with(|| format!("reading {}", args.file.display()))?;
    let mut tx: RawTransaction = serde_json::from_str(&contents).wrap_err("decoding transaction")?;

    if let Some(chain_id) = args.chain_id {
        tx.chain_id = chain_id;
    }

    let version = ContractVersion::parse(&args.contract_version)?;
    let layout = version.layout();

    let domain_separator = compute_domain_separator(layout.domain, tx.chain_id, tx.safe_address);
    let safe_tx_hash = compute_safe_tx_hash(&tx, layout.safe_tx);

    HashOutput {
        version: version.to_string(),
        chain_id: tx.chain_id,
        domain_separator,
        safe_tx_hash,
        transaction_hash: compute_transaction_hash(domain_separator, safe_tx_hash),
    }
    .print(json);

    Ok(())
}
