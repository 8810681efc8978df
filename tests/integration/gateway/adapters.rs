//! Contract adapter tests: argument encoding and result decoding against a mocked RPC.

use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;
use stellar_xdr::curr::{ScString, ScVal};
use tracing_test::traced_test;

use ecostellar_gateway::{
	models::{SendTransactionStatus, TreeMetadata, TOKEN_SCALE},
	services::gateway::{ContractGateway, ErrorKind, DEFAULT_GAME_TYPE},
};

use crate::integration::mocks::*;

fn string_val(value: &str) -> ScVal {
	ScVal::String(ScString(value.try_into().unwrap()))
}

/// RPC that confirms every submission on the first poll with `value` as return value
fn confirming(value: ScVal) -> MockSorobanRpcClient {
	let mut rpc = MockSorobanRpcClient::healthy(10);
	rpc.expect_send_transaction()
		.times(1)
		.returning(|_| Ok(sent(SendTransactionStatus::Pending)));
	rpc.expect_get_transaction()
		.times(1)
		.returning(move |_| Ok(tx_success(value.clone())));
	rpc
}

#[tokio::test]
async fn test_mint_fungible_scales_amount() {
	let mut rpc = confirming(ScVal::Void);
	rpc.expect_simulate_transaction()
		.withf(|envelope| {
			let (method, args) = invoked_call(envelope);
			method == "mint" && args.len() == 2 && args[1] == i128_val(10 * TOKEN_SCALE)
		})
		.times(1)
		.returning(|_| Ok(simulation(ScVal::Void)));

	let gateway = ContractGateway::new(live_config(), rpc);
	let minted = gateway.mint_fungible(&player(), 10).await.unwrap();

	assert_eq!(minted.tokens_minted, 10);
	assert_eq!(minted.tx_hash, SUBMITTED_HASH);
	assert_eq!(
		minted.explorer_link,
		format!("https://stellar.expert/explorer/testnet/tx/{}", SUBMITTED_HASH)
	);
	assert_eq!(minted.ledger, Some(1002));
	assert!(!minted.mock);
}

#[tokio::test]
async fn test_balance_converts_fixed_point() {
	let mut rpc = MockSorobanRpcClient::healthy(10);
	rpc.expect_simulate_transaction()
		.withf(|envelope| invoked_call(envelope).0 == "balance")
		.returning(|_| Ok(simulation(i128_val(12_500_000))));
	rpc.expect_send_transaction().never();

	let gateway = ContractGateway::new(live_config(), rpc);
	let balance = gateway.get_fungible_balance(&player()).await.unwrap();

	assert_eq!(balance.balance, Decimal::from_str("1.25").unwrap());
	assert_eq!(balance.balance_raw.as_deref(), Some("12500000"));
	assert!(!balance.mock);
}

#[tokio::test]
async fn test_non_integer_balance_is_balance_failed() {
	let mut rpc = MockSorobanRpcClient::healthy(10);
	rpc.expect_simulate_transaction()
		.returning(|_| Ok(simulation(string_val("lots"))));

	let gateway = ContractGateway::new(live_config(), rpc);
	let err = gateway.get_fungible_balance(&player()).await.unwrap_err();

	assert_eq!(err.kind, ErrorKind::BalanceFailed);
	assert_eq!(err.detail, Some(json!("lots")));
}

#[tokio::test]
async fn test_record_session_decodes_contract_reward() {
	let session = sc_struct(vec![
		("session_id", ScVal::U64(12)),
		("tokens_earned", i128_val(75 * TOKEN_SCALE)),
	]);
	let mut rpc = confirming(session.clone());
	rpc.expect_simulate_transaction()
		.withf(|envelope| {
			let (method, args) = invoked_call(envelope);
			method == "record_game_session"
				&& args.len() == 3
				&& args[1] == ScVal::U32(750)
				&& args[2] == string_val(DEFAULT_GAME_TYPE)
		})
		.times(1)
		.returning(move |_| Ok(simulation(session.clone())));

	let gateway = ContractGateway::new(live_config(), rpc);
	let record = gateway.record_session(&player(), 750, None).await.unwrap();

	assert_eq!(record.tokens_earned, Decimal::from(75));
	assert_eq!(record.session_id.as_deref(), Some("12"));
	assert_eq!(record.tx_hash, SUBMITTED_HASH);
}

#[tokio::test]
#[traced_test]
async fn test_record_session_falls_back_to_score_tenth() {
	let mut rpc = MockSorobanRpcClient::healthy(10);
	rpc.expect_simulate_transaction()
		.withf(|envelope| invoked_call(envelope).1[2] == string_val("tree_planter"))
		.returning(|_| Ok(simulation(ScVal::Void)));
	rpc.expect_send_transaction()
		.returning(|_| Ok(sent(SendTransactionStatus::Pending)));
	rpc.expect_get_transaction()
		.returning(|_| Ok(tx_status("SUCCESS")));

	let gateway = ContractGateway::new(live_config(), rpc);
	let record = gateway
		.record_session(&player(), 750, Some("tree_planter"))
		.await
		.unwrap();

	assert_eq!(record.tokens_earned, Decimal::from(75));
	assert_eq!(record.session_id, None);
	assert!(logs_contain("session reward unreadable"));
}

#[tokio::test]
async fn test_mint_tree_certificate_with_default_metadata() {
	let before = chrono::Utc::now().timestamp() as u64;
	let mut rpc = confirming(ScVal::U64(42));
	rpc.expect_simulate_transaction()
		.withf(move |envelope| {
			let (method, args) = invoked_call(envelope);
			let plant_date = match args.get(5) {
				Some(ScVal::U64(date)) => *date,
				_ => return false,
			};
			method == "mint"
				&& args.len() == 8
				&& matches!(args[0], ScVal::Address(_))
				&& args[1] == string_val("Unknown")
				&& args[2] == string_val("Unknown")
				&& args[3] == ScVal::I32(0)
				&& args[4] == ScVal::I32(0)
				&& plant_date >= before
				&& args[6] == ScVal::U64(500)
				&& args[7] == string_val("EcoStellar")
		})
		.times(1)
		.returning(|_| Ok(simulation(ScVal::U64(42))));

	let gateway = ContractGateway::new(live_config(), rpc);
	let mint = gateway
		.mint_tree_certificate(&player(), &TreeMetadata::default())
		.await
		.unwrap();

	assert_eq!(mint.token_id, Some(42));
	assert_eq!(mint.tx_hash, SUBMITTED_HASH);
	assert!(!mint.mock);
}

#[tokio::test]
async fn test_mint_tree_certificate_with_given_metadata() {
	let metadata = TreeMetadata {
		species: Some("Quercus robur".to_string()),
		location: Some("Lisbon".to_string()),
		latitude: Some(38_722_252),
		longitude: Some(-9_139_337),
		plant_date: Some(1_700_000_000),
		carbon_offset: Some(1_200),
		partner_org: Some("One Tree Planted".to_string()),
	};
	let mut rpc = confirming(ScVal::U64(7));
	rpc.expect_simulate_transaction()
		.withf(|envelope| {
			let (_, args) = invoked_call(envelope);
			args[1..]
				== [
					string_val("Quercus robur"),
					string_val("Lisbon"),
					ScVal::I32(38_722_252),
					ScVal::I32(-9_139_337),
					ScVal::U64(1_700_000_000),
					ScVal::U64(1_200),
					string_val("One Tree Planted"),
				]
		})
		.times(1)
		.returning(|_| Ok(simulation(ScVal::U64(7))));

	let gateway = ContractGateway::new(live_config(), rpc);
	let mint = gateway.mint_tree_certificate(&player(), &metadata).await.unwrap();
	assert_eq!(mint.token_id, Some(7));
}

#[tokio::test]
#[traced_test]
async fn test_list_certificates_skips_unreadable_tokens() {
	let mut rpc = MockSorobanRpcClient::healthy(10);
	rpc.expect_simulate_transaction().returning(|envelope| {
		let (method, args) = invoked_call(envelope);
		match (method.as_str(), args.first()) {
			("get_player_trees", _) => Ok(simulation(sc_vec(vec![ScVal::U64(1), ScVal::U64(2)]))),
			("get_tree_data", Some(ScVal::U64(1))) => Ok(simulation(sc_struct(vec![
				("carbon_offset", ScVal::U64(500)),
				("species", string_val("Oak")),
			]))),
			_ => Ok(simulation_error("HostError: Error(Contract, #404)")),
		}
	});
	rpc.expect_send_transaction().never();

	let gateway = ContractGateway::new(live_config(), rpc);
	let list = gateway.list_certificates(&player()).await.unwrap();

	assert!(list.enumerated);
	assert_eq!(list.count, 3);
	assert_eq!(list.nfts.len(), 1);
	assert_eq!(list.nfts[0].token_id, 1);
	assert_eq!(list.nfts[0].metadata["species"], "Oak");
	assert!(logs_contain("skipping certificate with unreadable data"));
}

#[tokio::test]
#[traced_test]
async fn test_list_certificates_falls_back_to_balance_of() {
	let mut rpc = MockSorobanRpcClient::healthy(10);
	rpc.expect_simulate_transaction().returning(|envelope| {
		match invoked_call(envelope).0.as_str() {
			"balance_of" => Ok(simulation(ScVal::U32(3))),
			_ => Ok(simulation_error("HostError: Error(WasmVm, MissingValue)")),
		}
	});

	let gateway = ContractGateway::new(live_config(), rpc);
	let list = gateway.list_certificates(&player()).await.unwrap();

	assert!(!list.enumerated);
	assert_eq!(list.count, 3);
	assert!(list.nfts.is_empty());
	assert!(logs_contain("falling back to balance_of"));
}

#[tokio::test]
async fn test_non_integer_balance_of_is_nft_fetch_failed() {
	let mut rpc = MockSorobanRpcClient::healthy(10);
	rpc.expect_simulate_transaction().returning(|envelope| {
		match invoked_call(envelope).0.as_str() {
			"balance_of" => Ok(simulation(string_val("garbage"))),
			_ => Ok(simulation_error("HostError: Error(WasmVm, MissingValue)")),
		}
	});
	rpc.expect_send_transaction().never();

	let gateway = ContractGateway::new(live_config(), rpc);
	let err = gateway.list_certificates(&player()).await.unwrap_err();

	assert_eq!(err.kind, ErrorKind::NftFetchFailed);
	assert_eq!(err.detail, Some(json!("garbage")));
}

#[tokio::test]
async fn test_transaction_status_reports_node_response() {
	let mut rpc = MockSorobanRpcClient::healthy(10);
	rpc.expect_get_transaction()
		.withf(|hash| hash == SUBMITTED_HASH)
		.times(1)
		.returning(|_| Ok(tx_success(ScVal::Void)));

	let gateway = ContractGateway::new(live_config(), rpc);
	let report = gateway.get_transaction_status(SUBMITTED_HASH).await.unwrap();

	assert_eq!(report.status, "SUCCESS");
	assert_eq!(report.ledger, Some(1002));
	assert_eq!(report.created_at, Some(json!("1700000000")));
	assert!(report.details.is_some());
	assert!(!report.mock);
}

#[tokio::test]
async fn test_lifecycle_errors_pass_through_adapters() {
	let mut rpc = MockSorobanRpcClient::healthy(10);
	rpc.expect_simulate_transaction()
		.returning(|_| Ok(simulation_error("HostError: Error(Contract, #1)")));

	let gateway = ContractGateway::new(live_config(), rpc);

	let err = gateway.mint_fungible(&player(), 1).await.unwrap_err();
	assert_eq!(err.kind, ErrorKind::SimulationFailed);

	let err = gateway
		.mint_tree_certificate(&player(), &TreeMetadata::default())
		.await
		.unwrap_err();
	assert_eq!(err.kind, ErrorKind::SimulationFailed);
}
