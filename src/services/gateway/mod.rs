//! Contract gateway for the EcoStellar contracts.
//!
//! - `service`: [`ContractGateway`] and its per-contract adapters
//! - `lifecycle`: transaction building, assembling, signing and status polling
//! - `signer`: the operator key
//! - `mock`: canned responses used when contracts are not configured
//! - `error`: [`GatewayError`] and its [`ErrorKind`] codes

mod error;
mod lifecycle;
mod mock;
mod service;
mod signer;

pub use error::{ErrorKind, GatewayError};
pub use lifecycle::{
	assemble, build_transaction, envelope_xdr, sign_envelope, transaction_hash, InvocationRequest,
	InvocationStage,
};
pub use mock::{fallback_reward, MOCK_BALANCE};
pub use service::{ContractGateway, StellarGateway, DEFAULT_GAME_TYPE};
pub use signer::{network_id, OperatorSigner};
