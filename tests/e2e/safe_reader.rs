//! Reading Safe context over RPC

use alloy::network::AnyNetwork;
use alloy::primitives::address;
use alloy::providers::ProviderBuilder;
use safe_queue::{Error, SafeReader};

use crate::skip_if_no_rpc;

/// An address without Safe code yields no context rather than a guess
#[tokio::test(flavor = "multi_thread")]
async fn test_non_safe_address_has_no_context() {
    skip_if_no_rpc!();

    let rpc_url = std::env::var("ETH_RPC_URL").unwrap();
    let provider = ProviderBuilder::new()
        .network::<AnyNetwork>()
        .connect_http(rpc_url.parse().unwrap());

    let not_a_safe = address!("0x000000000000000000000000000000000000dEaD");
    let reader = SafeReader::connect(provider, not_a_safe)
        .await
        .expect("chain id");

    let err = reader.context().await.unwrap_err();
    assert!(matches!(err, Error::ContextUnavailable { safe, .. } if safe == not_a_safe));
}
