//! Gateway initialization tests.

use ecostellar_gateway::{
	models::{GatewayConfig, GetHealthResponse, SecretString},
	services::{
		blockchain::BlockChainError,
		gateway::{ContractGateway, ErrorKind},
	},
};

use crate::integration::mocks::*;

fn health() -> Result<GetHealthResponse, BlockChainError> {
	Ok(GetHealthResponse {
		status: "healthy".to_string(),
		latest_ledger: Some(1000),
	})
}

#[tokio::test]
async fn test_initialize_probes_once() {
	let mut rpc = MockSorobanRpcClient::new();
	rpc.expect_get_health().times(1).returning(health);

	let gateway = ContractGateway::new(live_config(), rpc);
	assert!(!gateway.config_summary().initialized);

	let report = gateway.initialize().await.unwrap();
	assert!(!report.mock);
	assert_eq!(report.network, "testnet");
	assert_eq!(report.admin_public_key, Some(operator_public_key()));

	gateway.initialize().await.unwrap();
	gateway.clone().initialize().await.unwrap();

	let summary = gateway.config_summary();
	assert!(summary.initialized);
	assert_eq!(summary.admin_public_key, Some(operator_public_key()));
}

#[tokio::test]
async fn test_concurrent_initialize_shares_one_probe() {
	let mut rpc = MockSorobanRpcClient::new();
	rpc.expect_get_health().times(1).returning(health);

	let gateway = ContractGateway::new(live_config(), rpc);
	let clone = gateway.clone();
	let (a, b, c, d) = tokio::join!(
		gateway.initialize(),
		gateway.initialize(),
		clone.initialize(),
		gateway.initialize(),
	);

	for report in [a, b, c, d] {
		assert_eq!(report.unwrap().admin_public_key, Some(operator_public_key()));
	}
}

#[tokio::test]
async fn test_unreachable_node_does_not_block_initialize() {
	let mut rpc = MockSorobanRpcClient::new();
	rpc.expect_get_health()
		.times(1)
		.returning(|| Err(BlockChainError::connection_error("connection refused", None, None)));

	let gateway = ContractGateway::new(live_config(), rpc);
	let report = gateway.initialize().await.unwrap();

	assert!(!report.mock);
	assert!(gateway.config_summary().initialized);
}

#[tokio::test]
async fn test_operation_initializes_lazily() {
	let mut rpc = MockSorobanRpcClient::healthy(10);
	rpc.expect_simulate_transaction()
		.returning(|_| Ok(simulation(i128_val(0))));

	let gateway = ContractGateway::new(live_config(), rpc);
	gateway.get_fungible_balance(&player()).await.unwrap();

	assert!(gateway.config_summary().initialized);
}

#[tokio::test]
async fn test_invalid_secret_fails_every_live_operation() {
	let mut rpc = MockSorobanRpcClient::new();
	rpc.expect_get_health().never();
	rpc.expect_get_account_sequence().never();

	let config = GatewayConfig {
		admin_secret: Some(SecretString::from("SBADSEED")),
		..live_config()
	};
	let gateway = ContractGateway::new(config, rpc);
	assert!(!gateway.is_mock_mode());

	let err = gateway.initialize().await.unwrap_err();
	assert_eq!(err.kind, ErrorKind::InitFailed);

	let err = gateway.mint_fungible(&player(), 5).await.unwrap_err();
	assert_eq!(err.kind, ErrorKind::InvokeFailed);
	assert_eq!(err.context.metadata_value("cause"), Some("INIT_FAILED"));

	let err = gateway.get_fungible_balance(&player()).await.unwrap_err();
	assert_eq!(err.kind, ErrorKind::CallFailed);

	let err = gateway.get_transaction_status(SUBMITTED_HASH).await.unwrap_err();
	assert_eq!(err.kind, ErrorKind::TxFetchFailed);
	assert!(!gateway.config_summary().initialized);
}
