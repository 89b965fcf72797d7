use alloy::network::AnyNetwork;
use alloy::primitives::Address;
use alloy::providers::ProviderBuilder;
use color_eyre::eyre::Result;
use safe_queue::SafeReader;

use crate::cli::InfoArgs;
use crate::output::SafeInfoOutput;

pub async fn run(args: InfoArgs, json: bool) -> Result<()> {
    let provider = ProviderBuilder::new()
        .network::<AnyNetwork>()
        .connect_http(args.rpc_url.parse()?);

    let safe_address: Address = args.safe.parse()?;

    let reader = SafeReader::connect(provider, safe_address).await?;
    let context = reader.context().await?;

    SafeInfoOutput::from(&context).print(json);

    Ok(())
}
