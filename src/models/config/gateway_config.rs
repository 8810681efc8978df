//! Gateway configuration loading and validation.
//!
//! Configuration is read once at startup from environment variables (optionally seeded from a
//! `.env` file) and is immutable for the lifetime of the process. Lookups go through a
//! closure so tests can supply a plain map instead of mutating the process environment.

use serde::Serialize;
use std::{collections::HashMap, fmt, time::Duration};
use url::Url;

use crate::models::{config::error::ConfigError, security::SecretString};

/// Default Soroban RPC endpoint
pub const DEFAULT_RPC_URL: &str = "https://soroban-testnet.stellar.org";
/// Default block explorer base URL
pub const DEFAULT_EXPLORER_BASE: &str = "https://stellar.expert/explorer";
/// Default transaction validity window in seconds
pub const DEFAULT_TX_TIMEOUT_SECS: u64 = 30;
/// Default number of transaction status polls
pub const DEFAULT_MAX_POLL_RETRIES: u32 = 30;
/// Default delay before each status poll in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
/// Default inclusion fee in stroops
pub const DEFAULT_BASE_FEE: u32 = 100;

const MAINNET_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";
const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Environment keys read by [`GatewayConfig::from_lookup`]
pub mod keys {
	pub const NETWORK: &str = "STELLAR_NETWORK";
	pub const RPC_URL: &str = "STELLAR_RPC_URL";
	pub const RPC_FALLBACK_URLS: &str = "STELLAR_RPC_FALLBACK_URLS";
	pub const ADMIN_SECRET_KEY: &str = "ADMIN_SECRET_KEY";
	pub const ECO_TOKEN_CONTRACT_ID: &str = "ECO_TOKEN_CONTRACT_ID";
	pub const GAME_REWARDS_CONTRACT_ID: &str = "GAME_REWARDS_CONTRACT_ID";
	pub const TREE_NFT_CONTRACT_ID: &str = "TREE_NFT_CONTRACT_ID";
	pub const EXPLORER_BASE: &str = "STELLAR_EXPLORER_BASE";
	pub const TX_TIMEOUT: &str = "TX_TIMEOUT";
	pub const TX_MAX_RETRIES: &str = "TX_MAX_RETRIES";
	pub const TX_POLL_INTERVAL_MS: &str = "TX_POLL_INTERVAL_MS";
	pub const TX_BASE_FEE: &str = "TX_BASE_FEE";
}

/// The Stellar network the gateway talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StellarNetwork {
	#[default]
	Testnet,
	Mainnet,
}

impl StellarNetwork {
	/// Parses the `STELLAR_NETWORK` value. Absent or empty selects testnet.
	pub fn parse(value: Option<&str>) -> Result<Self, ConfigError> {
		let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
			return Ok(Self::Testnet);
		};

		match raw.to_ascii_lowercase().as_str() {
			"test" | "testnet" => Ok(Self::Testnet),
			"main" | "mainnet" | "public" => Ok(Self::Mainnet),
			_ => Err(ConfigError::validation_error(
				format!("Unknown Stellar network '{}'", raw),
				None,
				Some(key_metadata(keys::NETWORK)),
			)),
		}
	}

	/// Network passphrase used to derive the signing network id
	pub fn passphrase(&self) -> &'static str {
		match self {
			Self::Testnet => TESTNET_PASSPHRASE,
			Self::Mainnet => MAINNET_PASSPHRASE,
		}
	}

	/// Path segment used by the block explorer
	pub fn explorer_segment(&self) -> &'static str {
		match self {
			Self::Testnet => "testnet",
			Self::Mainnet => "public",
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Testnet => "testnet",
			Self::Mainnet => "mainnet",
		}
	}
}

impl fmt::Display for StellarNetwork {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Contract ids of the three EcoStellar contracts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractIds {
	pub eco_token: Option<String>,
	pub game_rewards: Option<String>,
	pub tree_nft: Option<String>,
}

impl ContractIds {
	/// True when all three contracts are configured
	pub fn is_complete(&self) -> bool {
		self.eco_token.is_some() && self.game_rewards.is_some() && self.tree_nft.is_some()
	}
}

/// Immutable gateway configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
	pub network: StellarNetwork,
	pub rpc_url: String,
	pub fallback_rpc_urls: Vec<String>,
	pub admin_secret: Option<SecretString>,
	pub contracts: ContractIds,
	pub explorer_base: String,
	pub tx_timeout_secs: u64,
	pub max_poll_retries: u32,
	pub poll_interval: Duration,
	pub base_fee: u32,
}

impl Default for GatewayConfig {
	fn default() -> Self {
		Self {
			network: StellarNetwork::Testnet,
			rpc_url: DEFAULT_RPC_URL.to_string(),
			fallback_rpc_urls: Vec::new(),
			admin_secret: None,
			contracts: ContractIds::default(),
			explorer_base: DEFAULT_EXPLORER_BASE.to_string(),
			tx_timeout_secs: DEFAULT_TX_TIMEOUT_SECS,
			max_poll_retries: DEFAULT_MAX_POLL_RETRIES,
			poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
			base_fee: DEFAULT_BASE_FEE,
		}
	}
}

impl GatewayConfig {
	/// Loads the configuration from the process environment
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Loads the configuration from a map of key/value pairs
	pub fn from_map(values: &HashMap<String, String>) -> Result<Self, ConfigError> {
		Self::from_lookup(|key| values.get(key).cloned())
	}

	/// Loads the configuration through an arbitrary lookup function.
	///
	/// # Arguments
	///
	/// * `lookup` - Returns the raw value for a configuration key, if set
	///
	/// # Returns
	///
	/// * `Result<Self, ConfigError>` - The validated configuration, or an error for malformed
	///   numbers, URLs or network names. Missing credentials are not an error: they select
	///   mock mode.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |key: &str| -> Option<String> {
			lookup(key)
				.map(|v| v.trim().to_string())
				.filter(|v| !v.is_empty())
		};

		let network = StellarNetwork::parse(get(keys::NETWORK).as_deref())?;

		let rpc_url = match get(keys::RPC_URL) {
			Some(url) => validate_url(keys::RPC_URL, &url)?,
			None => DEFAULT_RPC_URL.to_string(),
		};

		let fallback_rpc_urls = match get(keys::RPC_FALLBACK_URLS) {
			Some(list) => list
				.split(',')
				.map(str::trim)
				.filter(|u| !u.is_empty())
				.map(|u| validate_url(keys::RPC_FALLBACK_URLS, u))
				.collect::<Result<Vec<_>, _>>()?,
			None => Vec::new(),
		};

		let explorer_base = match get(keys::EXPLORER_BASE) {
			Some(url) => validate_url(keys::EXPLORER_BASE, &url)?,
			None => DEFAULT_EXPLORER_BASE.to_string(),
		};

		Ok(Self {
			network,
			rpc_url,
			fallback_rpc_urls,
			admin_secret: get(keys::ADMIN_SECRET_KEY).map(SecretString::new),
			contracts: ContractIds {
				eco_token: get(keys::ECO_TOKEN_CONTRACT_ID),
				game_rewards: get(keys::GAME_REWARDS_CONTRACT_ID),
				tree_nft: get(keys::TREE_NFT_CONTRACT_ID),
			},
			explorer_base,
			tx_timeout_secs: parse_positive(keys::TX_TIMEOUT, get(keys::TX_TIMEOUT), DEFAULT_TX_TIMEOUT_SECS)?,
			max_poll_retries: parse_positive(
				keys::TX_MAX_RETRIES,
				get(keys::TX_MAX_RETRIES),
				DEFAULT_MAX_POLL_RETRIES,
			)?,
			poll_interval: Duration::from_millis(parse_positive(
				keys::TX_POLL_INTERVAL_MS,
				get(keys::TX_POLL_INTERVAL_MS),
				DEFAULT_POLL_INTERVAL_MS,
			)?),
			base_fee: parse_positive(keys::TX_BASE_FEE, get(keys::TX_BASE_FEE), DEFAULT_BASE_FEE)?,
		})
	}

	/// True when the operator credential or any contract id is missing.
	///
	/// A mock-mode gateway never attempts a live call.
	pub fn is_mock(&self) -> bool {
		self.admin_secret.is_none() || !self.contracts.is_complete()
	}

	/// Builds the block-explorer link for a transaction hash.
	///
	/// The hash is inserted unmodified.
	pub fn explorer_link(&self, tx_hash: &str) -> String {
		format!(
			"{}/{}/tx/{}",
			self.explorer_base.trim_end_matches('/'),
			self.network.explorer_segment(),
			tx_hash
		)
	}
}

fn key_metadata(key: &str) -> HashMap<String, String> {
	HashMap::from([("key".to_string(), key.to_string())])
}

fn validate_url(key: &str, value: &str) -> Result<String, ConfigError> {
	let url = Url::parse(value).map_err(|e| {
		ConfigError::parse_error(
			format!("{} is not a valid URL: {}", key, value),
			Some(Box::new(e)),
			Some(key_metadata(key)),
		)
	})?;

	match url.scheme() {
		"http" | "https" => Ok(value.to_string()),
		scheme => Err(ConfigError::validation_error(
			format!("{} must use http or https, got '{}'", key, scheme),
			None,
			Some(key_metadata(key)),
		)),
	}
}

fn parse_positive<T>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
	T: std::str::FromStr + PartialEq + Default,
	T::Err: std::error::Error + Send + Sync + 'static,
{
	let Some(raw) = value else {
		return Ok(default);
	};

	let parsed = raw.parse::<T>().map_err(|e| {
		ConfigError::parse_error(
			format!("{} must be a positive integer, got '{}'", key, raw),
			Some(Box::new(e)),
			Some(key_metadata(key)),
		)
	})?;

	if parsed == T::default() {
		return Err(ConfigError::validation_error(
			format!("{} must be greater than zero", key),
			None,
			Some(key_metadata(key)),
		));
	}

	Ok(parsed)
}
