//! Stellar and Soroban data models.
//!
//! - `address`: strkey validation and conversion to XDR addresses
//! - `args`: typed contract-call arguments
//! - `rpc`: Soroban JSON-RPC response models
//! - `value`: decoding of contract return values
//! - `results`: result types returned by the gateway

mod address;
mod args;
mod error;
mod results;
mod rpc;
mod value;

pub use address::{format_sc_address, is_valid_address, parse_contract_id, parse_sc_address};
pub use args::{encode_args, ScArg};
pub use error::StellarValueError;
pub use results::{
	fixed_point_to_decimal, BalanceResult, Certificate, CertificateList, CertificateMint,
	ConfigSummary, FinalStatus, InitReport, MintResult, QueryResult, ResolvedTreeMetadata,
	SessionRecord, TransactionOutcome, TransactionStatusReport, TreeMetadata, TOKEN_DECIMALS,
	TOKEN_SCALE,
};
pub use rpc::{
	GetHealthResponse, GetLedgerEntriesResponse, GetNetworkResponse, GetTransactionResponse,
	LedgerEntryResult, SendTransactionResponse, SendTransactionStatus, SimulateHostFunctionResult,
	SimulateTransactionResponse, TransactionStatus,
};
pub use value::{
	decode_sc_val, return_value_from_meta, sc_map_get,
	sc_val_items, sc_val_to_i128, sc_val_to_json, sc_val_to_string, sc_val_to_u64,
};
