//! Canned responses for mock mode.
//!
//! A gateway without an operator credential or a complete set of contract ids answers every
//! operation from here. Nothing in this module performs I/O.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
	BalanceResult, CertificateList, CertificateMint, FinalStatus, GatewayConfig, MintResult,
	QueryResult, SessionRecord, TransactionOutcome, TransactionStatusReport,
};

/// Balance reported for every address in mock mode
pub const MOCK_BALANCE: u32 = 1250;

/// Upper bound (exclusive) of mock certificate token ids
pub const MOCK_TOKEN_ID_LIMIT: u64 = 1_000_000;

/// Builds a `mock_{tag}_{unix millis}` hash
pub fn mock_hash(tag: &str) -> String {
	format!("mock_{}_{}", tag, Utc::now().timestamp_millis())
}

/// Reward granted for a score when the contract does not report one
pub fn fallback_reward(score: u32) -> u32 {
	score / 10
}

pub fn query() -> QueryResult {
	QueryResult {
		result: None,
		return_value: None,
		mock: true,
	}
}

pub fn invoke(method: &str) -> TransactionOutcome {
	TransactionOutcome {
		hash: mock_hash(method),
		status: FinalStatus::Success,
		ledger: None,
		method: method.to_string(),
		result: None,
		return_value: None,
		mock: true,
	}
}

pub fn mint(config: &GatewayConfig, amount: u64) -> MintResult {
	let tx_hash = mock_hash("mint");
	MintResult {
		explorer_link: config.explorer_link(&tx_hash),
		tx_hash,
		tokens_minted: amount,
		ledger: None,
		mock: true,
	}
}

pub fn balance() -> BalanceResult {
	BalanceResult {
		balance: Decimal::from(MOCK_BALANCE),
		balance_raw: None,
		mock: true,
	}
}

pub fn session(config: &GatewayConfig, score: u32) -> SessionRecord {
	let tx_hash = mock_hash("game");
	SessionRecord {
		explorer_link: config.explorer_link(&tx_hash),
		tx_hash,
		tokens_earned: Decimal::from(fallback_reward(score)),
		session_id: Some(mock_hash("sess")),
		ledger: None,
		mock: true,
	}
}

pub fn certificate(config: &GatewayConfig) -> CertificateMint {
	let tx_hash = mock_hash("tree");
	let token_id = (Uuid::new_v4().as_u128() % MOCK_TOKEN_ID_LIMIT as u128) as u64;
	CertificateMint {
		token_id: Some(token_id),
		explorer_link: config.explorer_link(&tx_hash),
		tx_hash,
		ledger: None,
		mock: true,
	}
}

pub fn certificates() -> CertificateList {
	CertificateList {
		count: 0,
		nfts: Vec::new(),
		enumerated: true,
		mock: true,
	}
}

pub fn transaction_status(hash: &str) -> TransactionStatusReport {
	TransactionStatusReport {
		hash: hash.to_string(),
		status: "SUCCESS".to_string(),
		ledger: None,
		created_at: None,
		details: None,
		mock: true,
	}
}
