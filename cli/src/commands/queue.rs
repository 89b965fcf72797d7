use alloy::network::AnyNetwork;
use alloy::primitives::{Address, U256};
use alloy::providers::ProviderBuilder;
use color_eyre::eyre::{bail, Result, WrapErr};
use safe_queue::{evaluate_queue, parse_pending, ChainConfig, SafeContext, SafeReader, TransactionServiceClient};
use tracing::warn;

use crate::cli::QueueArgs;
use crate::output::{PayloadOutput, QueueOutput};

pub async fn run(args: QueueArgs, json: bool) -> Result<()> {
    let safe_address: Address = args.safe.parse()?;

    let (chain_id, context) = match &args.rpc_url {
        Some(rpc_url) => {
            let provider = ProviderBuilder::new()
                .network::<AnyNetwork>()
                .connect_http(rpc_url.parse()?);
            let reader = SafeReader::connect(provider, safe_address).await?;

            if let Some(expected) = args.chain_id {
                if expected != reader.chain_id() {
                    bail!("RPC endpoint serves chain {}, not {}", reader.chain_id(), expected);
                }
            }

            // A failed read still lets the queue be listed, with unknown states
            let context = match reader.context().await {
                Ok(context) => Some(context),
                Err(err) => {
                    warn!(%err, "evaluating without a Safe context");
                    None
                }
            };
            (reader.chain_id(), context)
        }
        None => match args.chain_id {
            Some(chain_id) => (chain_id, None),
            None => bail!("either --rpc-url or --chain-id is required"),
        },
    };

    let pending = match &args.from_file {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("reading {}", path.display()))?;
            parse_pending(&contents, chain_id)?
        }
        None => {
            let config = match &args.service_url {
                Some(url) => ChainConfig::with_service_url(chain_id, url.parse()?),
                None => ChainConfig::new(chain_id)?,
            };
            let from_nonce = fetch_start(context.as_ref(), args.from_nonce);
            TransactionServiceClient::new(config)
                .pending(safe_address, from_nonce)
                .await?
        }
    };

    let queue = evaluate_queue(safe_address, context.as_ref(), pending);

    let payloads = args
        .payloads
        .then(|| queue.payloads().into_iter().map(PayloadOutput::from).collect());

    QueueOutput {
        queue: queue.view(),
        payloads,
    }
    .print(json);

    Ok(())
}

/// First nonce to request from the service
///
/// An explicit `--from-nonce` wins, then the on-chain nonce. Without either
/// the whole history is requested, which is logged since it can be slow.
fn fetch_start(context: Option<&SafeContext>, from_nonce: Option<u64>) -> U256 {
    match (from_nonce, context) {
        (Some(nonce), _) => U256::from(nonce),
        (None, Some(context)) => context.current_nonce(),
        (None, None) => {
            warn!("no Safe context and no --from-nonce, fetching the full transaction history");
            U256::ZERO
        }
    }
}
