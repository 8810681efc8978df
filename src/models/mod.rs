//! Domain models and data structures for the contract gateway.
//!
//! This module contains all the core data structures used throughout the application:
//!
//! - `blockchain`: Stellar argument, RPC and result models
//! - `config`: Gateway configuration loading and validation
//! - `security`: Secret handling for the operator credential

mod blockchain;
mod config;
mod security;

pub use blockchain::stellar::{
	decode_sc_val, encode_args, fixed_point_to_decimal, format_sc_address, is_valid_address,
	parse_contract_id, parse_sc_address, return_value_from_meta, sc_map_get, sc_val_items,
	sc_val_to_i128, sc_val_to_json, sc_val_to_string, sc_val_to_u64, BalanceResult,
	Certificate, CertificateList, CertificateMint, ConfigSummary, FinalStatus,
	GetHealthResponse, GetLedgerEntriesResponse, GetNetworkResponse, GetTransactionResponse,
	InitReport, LedgerEntryResult, MintResult, QueryResult, ResolvedTreeMetadata, ScArg,
	SendTransactionResponse, SendTransactionStatus, SessionRecord, SimulateHostFunctionResult,
	SimulateTransactionResponse, StellarValueError, TransactionOutcome, TransactionStatus,
	TransactionStatusReport, TreeMetadata, TOKEN_DECIMALS, TOKEN_SCALE,
};

pub use config::{
	keys as config_keys, ConfigError, ContractIds, GatewayConfig, StellarNetwork,
	DEFAULT_BASE_FEE, DEFAULT_EXPLORER_BASE, DEFAULT_MAX_POLL_RETRIES, DEFAULT_POLL_INTERVAL_MS,
	DEFAULT_RPC_URL, DEFAULT_TX_TIMEOUT_SECS,
};

pub use security::SecretString;
