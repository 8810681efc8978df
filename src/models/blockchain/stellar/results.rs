//! Result types returned by the contract gateway.
//!
//! All types serialize to camelCase JSON so route handlers can return them directly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stellar_xdr::curr::ScVal;

use crate::models::{
	blockchain::stellar::{args::ScArg, rpc::GetTransactionResponse},
	config::ContractIds,
};

/// Decimal places of the EcoToken fixed-point representation
pub const TOKEN_DECIMALS: u32 = 7;

/// Multiplier between whole tokens and fixed-point units
pub const TOKEN_SCALE: i128 = 10_000_000;

/// Converts a fixed-point token amount into a decimal.
///
/// Returns `None` when the amount does not fit a 96-bit decimal mantissa.
pub fn fixed_point_to_decimal(raw: i128) -> Option<Decimal> {
	Decimal::try_from_i128_with_scale(raw, TOKEN_DECIMALS).ok()
}

/// Final status of a state-changing invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinalStatus {
	Success,
	Failed,
	Timeout,
}

/// Outcome of a completed invocation lifecycle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutcome {
	pub hash: String,
	pub status: FinalStatus,
	pub ledger: Option<u32>,
	pub method: String,
	/// Return value rendered as JSON
	pub result: Option<Value>,
	/// Raw return value for typed decoding
	#[serde(skip)]
	pub return_value: Option<ScVal>,
	pub mock: bool,
}

/// Result of a read-only query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
	pub result: Option<Value>,
	#[serde(skip)]
	pub return_value: Option<ScVal>,
	pub mock: bool,
}

/// Result of gateway initialization
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitReport {
	pub mock: bool,
	pub network: String,
	pub admin_public_key: Option<String>,
	pub contracts: ContractIds,
}

/// Result of minting fungible tokens
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintResult {
	pub tx_hash: String,
	pub tokens_minted: u64,
	pub ledger: Option<u32>,
	pub explorer_link: String,
	pub mock: bool,
}

/// Fungible token balance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResult {
	pub balance: Decimal,
	/// Fixed-point balance as a decimal string, absent in mock mode
	pub balance_raw: Option<String>,
	pub mock: bool,
}

/// Result of recording a game session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
	pub tx_hash: String,
	pub tokens_earned: Decimal,
	pub session_id: Option<String>,
	pub ledger: Option<u32>,
	pub explorer_link: String,
	pub mock: bool,
}

/// Caller-supplied tree metadata. Missing fields take defaults when minting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeMetadata {
	pub species: Option<String>,
	pub location: Option<String>,
	/// Latitude in micro-degrees
	pub latitude: Option<i32>,
	/// Longitude in micro-degrees
	pub longitude: Option<i32>,
	/// Unix seconds
	pub plant_date: Option<u64>,
	/// Estimated CO2 offset in kilograms
	pub carbon_offset: Option<u64>,
	pub partner_org: Option<String>,
}

/// Tree metadata with every default applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTreeMetadata {
	pub species: String,
	pub location: String,
	pub latitude: i32,
	pub longitude: i32,
	pub plant_date: u64,
	pub carbon_offset: u64,
	pub partner_org: String,
}

impl TreeMetadata {
	pub const DEFAULT_SPECIES: &'static str = "Unknown";
	pub const DEFAULT_LOCATION: &'static str = "Unknown";
	pub const DEFAULT_CARBON_OFFSET: u64 = 500;
	pub const DEFAULT_PARTNER_ORG: &'static str = "EcoStellar";

	/// Applies defaults; `now` is the plant date used when none is given
	pub fn resolve(&self, now: u64) -> ResolvedTreeMetadata {
		let text = |value: &Option<String>, default: &str| {
			value
				.as_deref()
				.map(str::trim)
				.filter(|v| !v.is_empty())
				.unwrap_or(default)
				.to_string()
		};

		ResolvedTreeMetadata {
			species: text(&self.species, Self::DEFAULT_SPECIES),
			location: text(&self.location, Self::DEFAULT_LOCATION),
			latitude: self.latitude.unwrap_or(0),
			longitude: self.longitude.unwrap_or(0),
			plant_date: self.plant_date.unwrap_or(now),
			carbon_offset: self.carbon_offset.unwrap_or(Self::DEFAULT_CARBON_OFFSET),
			partner_org: text(&self.partner_org, Self::DEFAULT_PARTNER_ORG),
		}
	}
}

impl ResolvedTreeMetadata {
	/// Contract arguments following the owner address:
	/// `(species, location, latitude: i32, longitude: i32, plant_date: u64,
	/// carbon_offset: u64, partner_org)`
	pub fn to_args(&self) -> Vec<ScArg> {
		vec![
			ScArg::string(self.species.clone()),
			ScArg::string(self.location.clone()),
			ScArg::I32(self.latitude),
			ScArg::I32(self.longitude),
			ScArg::U64(self.plant_date),
			ScArg::U64(self.carbon_offset),
			ScArg::string(self.partner_org.clone()),
		]
	}
}

/// Result of minting a tree certificate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateMint {
	pub token_id: Option<u64>,
	pub tx_hash: String,
	pub ledger: Option<u32>,
	pub explorer_link: String,
	pub mock: bool,
}

/// A single owned certificate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
	pub token_id: u64,
	pub metadata: Value,
}

/// Certificates owned by an address
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateList {
	pub count: u64,
	pub nfts: Vec<Certificate>,
	/// False when the list came from the balance-only fallback
	pub enumerated: bool,
	pub mock: bool,
}

/// Status of a previously submitted transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStatusReport {
	pub hash: String,
	pub status: String,
	pub ledger: Option<u32>,
	pub created_at: Option<Value>,
	pub details: Option<GetTransactionResponse>,
	pub mock: bool,
}

/// Non-secret view of the gateway configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
	pub network: String,
	pub rpc_url: String,
	pub mock_mode: bool,
	pub initialized: bool,
	pub contracts: ContractIds,
	pub admin_public_key: Option<String>,
}
