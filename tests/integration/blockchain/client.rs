//! Soroban RPC client tests against a local mock server.

use mockito::{Matcher, Server};
use serde_json::json;
use stellar_xdr::curr::{
	AccountEntry, AccountEntryExt, AccountId, LedgerEntryData, Limits, PublicKey, SequenceNumber,
	String32, StringM, Thresholds, Uint256, VecM, WriteXdr,
};

use ecostellar_gateway::{
	models::SendTransactionStatus,
	services::blockchain::{BlockChainError, SorobanRpc, StellarClient},
};

use crate::integration::mocks::*;

fn rpc_result(result: serde_json::Value) -> String {
	json!({ "jsonrpc": "2.0", "id": 1, "result": result }).to_string()
}

fn account_entry_xdr(sequence: i64) -> String {
	LedgerEntryData::Account(AccountEntry {
		account_id: AccountId(PublicKey::PublicKeyTypeEd25519(Uint256([6u8; 32]))),
		balance: 10_000_000_000,
		seq_num: SequenceNumber(sequence),
		num_sub_entries: 0,
		inflation_dest: None,
		flags: 0,
		home_domain: String32(StringM::default()),
		thresholds: Thresholds([1, 0, 0, 0]),
		signers: VecM::default(),
		ext: AccountEntryExt::V0,
	})
	.to_xdr_base64(Limits::none())
	.unwrap()
}

#[tokio::test]
async fn test_get_health() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({
			"jsonrpc": "2.0",
			"method": "getHealth"
		})))
		.with_status(200)
		.with_body(rpc_result(json!({
			"status": "healthy",
			"latestLedger": 51583,
			"oldestLedger": 34304,
			"ledgerRetentionWindow": 17280
		})))
		.create_async()
		.await;

	let client = StellarClient::new(&server.url(), vec![]).unwrap();
	let health = client.get_health().await.unwrap();

	assert_eq!(health.status, "healthy");
	assert_eq!(health.latest_ledger, Some(51583));
	mock.assert();
}

#[tokio::test]
async fn test_get_network() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({ "method": "getNetwork" })))
		.with_status(200)
		.with_body(rpc_result(json!({
			"friendbotUrl": "https://friendbot.stellar.org/",
			"passphrase": "Test SDF Network ; September 2015",
			"protocolVersion": 23
		})))
		.create_async()
		.await;

	let client = StellarClient::new(&server.url(), vec![]).unwrap();
	let network = client.get_network().await.unwrap();

	assert_eq!(network.passphrase, "Test SDF Network ; September 2015");
	assert_eq!(network.protocol_version, Some(23));
	mock.assert();
}

#[tokio::test]
async fn test_account_sequence_from_ledger_entry() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({ "method": "getLedgerEntries" })))
		.with_status(200)
		.with_body(rpc_result(json!({
			"entries": [{
				"key": "AAAAAAAAAAA=",
				"xdr": account_entry_xdr(4_294_967_301),
				"lastModifiedLedgerSeq": 51000
			}],
			"latestLedger": 51583
		})))
		.create_async()
		.await;

	let client = StellarClient::new(&server.url(), vec![]).unwrap();
	let sequence = client.get_account_sequence(&player()).await.unwrap();

	assert_eq!(sequence, 4_294_967_301);
	mock.assert();
}

#[tokio::test]
async fn test_missing_account_is_request_error() {
	let mut server = Server::new_async().await;
	server
		.mock("POST", "/")
		.with_status(200)
		.with_body(rpc_result(json!({ "entries": [], "latestLedger": 51583 })))
		.create_async()
		.await;

	let client = StellarClient::new(&server.url(), vec![]).unwrap();
	let err = client.get_account_sequence(&player()).await.unwrap_err();

	assert!(matches!(err, BlockChainError::RequestError(_)));
	assert!(err.to_string().contains("Account not found"));
}

#[tokio::test]
async fn test_rpc_error_member_is_request_error() {
	let mut server = Server::new_async().await;
	server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({
			"method": "simulateTransaction",
			"params": { "transaction": "AAAA" }
		})))
		.with_status(200)
		.with_body(
			json!({
				"jsonrpc": "2.0",
				"id": 1,
				"error": { "code": -32602, "message": "invalid parameters" }
			})
			.to_string(),
		)
		.create_async()
		.await;

	let client = StellarClient::new(&server.url(), vec![]).unwrap();
	let err = client.simulate_transaction("AAAA").await.unwrap_err();

	assert!(matches!(err, BlockChainError::RequestError(_)));
	assert!(err.to_string().contains("RPC error -32602: invalid parameters"));
	assert_eq!(err.context().metadata_value("method"), Some("simulateTransaction"));
}

#[tokio::test]
async fn test_send_transaction_status() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({
			"method": "sendTransaction",
			"params": { "transaction": "AAAB" }
		})))
		.with_status(200)
		.with_body(rpc_result(json!({
			"status": "PENDING",
			"hash": SUBMITTED_HASH,
			"latestLedger": 51583,
			"latestLedgerCloseTime": "1700000000"
		})))
		.create_async()
		.await;

	let client = StellarClient::new(&server.url(), vec![]).unwrap();
	let response = client.send_transaction("AAAB").await.unwrap();

	assert_eq!(response.status, SendTransactionStatus::Pending);
	assert_eq!(response.hash, SUBMITTED_HASH);
	mock.assert();
}

#[tokio::test]
async fn test_get_transaction_not_found() {
	let mut server = Server::new_async().await;
	server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({
			"method": "getTransaction",
			"params": { "hash": SUBMITTED_HASH }
		})))
		.with_status(200)
		.with_body(rpc_result(json!({
			"status": "NOT_FOUND",
			"latestLedger": 51583,
			"oldestLedger": 34304
		})))
		.create_async()
		.await;

	let client = StellarClient::new(&server.url(), vec![]).unwrap();
	let response = client.get_transaction(SUBMITTED_HASH).await.unwrap();

	assert_eq!(response.status, "NOT_FOUND");
	assert!(response.status().is_pending());
}

#[tokio::test]
async fn test_http_error_without_fallback_is_request_error() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.with_status(503)
		.with_body("unavailable")
		.expect(1)
		.create_async()
		.await;

	let client = StellarClient::new(&server.url(), vec![]).unwrap();
	let err = client.get_health().await.unwrap_err();

	assert!(matches!(err, BlockChainError::RequestError(_)));
	assert!(err.to_string().contains("503"));
	mock.assert();
}
