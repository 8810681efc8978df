//! Mock mode tests. The RPC mock has no expectations, so any network call panics.

use rust_decimal::Decimal;

use ecostellar_gateway::{
	bootstrap::create_gateway,
	models::{ContractIds, GatewayConfig, ScArg, SecretString, TreeMetadata},
	services::gateway::{ContractGateway, MOCK_BALANCE},
};

use crate::integration::mocks::*;

fn mock_gateway() -> ContractGateway<MockSorobanRpcClient> {
	ContractGateway::new(GatewayConfig::default(), MockSorobanRpcClient::new())
}

#[tokio::test]
async fn test_initialize_reports_mock_mode() {
	let gateway = mock_gateway();
	assert!(gateway.is_mock_mode());

	let report = gateway.initialize().await.unwrap();
	assert!(report.mock);
	assert_eq!(report.admin_public_key, None);
	assert!(gateway.config_summary().initialized);
	assert!(gateway.health_state().mock_mode);
}

#[tokio::test]
async fn test_record_session_rewards_score_tenth() {
	let gateway = mock_gateway();
	let record = gateway.record_session(&player(), 750, None).await.unwrap();

	assert!(record.mock);
	assert_eq!(record.tokens_earned, Decimal::from(75));
	assert!(record.tx_hash.starts_with("mock_game_"));
	assert!(record.session_id.unwrap().starts_with("mock_sess_"));
	assert_eq!(
		record.explorer_link,
		format!("https://stellar.expert/explorer/testnet/tx/{}", record.tx_hash)
	);
}

#[tokio::test]
async fn test_every_operation_answers_offline() {
	let gateway = mock_gateway();

	let minted = gateway.mint_fungible(&player(), 25).await.unwrap();
	assert_eq!(minted.tokens_minted, 25);
	assert!(minted.tx_hash.starts_with("mock_mint_"));

	let balance = gateway.get_fungible_balance(&player()).await.unwrap();
	assert_eq!(balance.balance, Decimal::from(MOCK_BALANCE));

	let mint = gateway
		.mint_tree_certificate(&player(), &TreeMetadata::default())
		.await
		.unwrap();
	assert!(mint.token_id.unwrap() < 1_000_000);
	assert!(mint.tx_hash.starts_with("mock_tree_"));

	let list = gateway.list_certificates(&player()).await.unwrap();
	assert_eq!(list.count, 0);
	assert!(list.nfts.is_empty());

	let status = gateway.get_transaction_status("mock_mint_1").await.unwrap();
	assert_eq!(status.status, "SUCCESS");
	assert!(status.mock);

	let query = gateway.query(&contract(1), "balance", vec![]).await.unwrap();
	assert!(query.mock);
	assert_eq!(query.result, None);

	let outcome = gateway
		.invoke(&contract(1), "burn", vec![ScArg::U32(1)])
		.await
		.unwrap();
	assert!(outcome.mock);
	assert!(outcome.hash.starts_with("mock_burn_"));
}

#[tokio::test]
async fn test_one_missing_contract_selects_mock_mode() {
	let config = GatewayConfig {
		admin_secret: Some(SecretString::new(operator_secret())),
		contracts: ContractIds {
			eco_token: Some(contract(1)),
			game_rewards: Some(contract(2)),
			tree_nft: None,
		},
		..GatewayConfig::default()
	};
	let gateway = ContractGateway::new(config, MockSorobanRpcClient::new());

	assert!(gateway.is_mock_mode());
	assert!(gateway.mint_fungible(&player(), 1).await.unwrap().mock);
}

#[tokio::test]
async fn test_http_gateway_without_credentials_is_mock() {
	let gateway = create_gateway(GatewayConfig::default()).unwrap();
	assert!(gateway.is_mock_mode());

	let report = gateway.initialize().await.unwrap();
	assert!(report.mock);
	assert_eq!(
		gateway.get_fungible_balance(&player()).await.unwrap().balance,
		Decimal::from(MOCK_BALANCE)
	);
}
