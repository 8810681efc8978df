//! Stellar address parsing and validation.
//!
//! Addresses use the strkey encoding: a version byte, a 32 byte payload and a CRC16
//! checksum, base32 encoded. Account addresses start with `G`, contract addresses with `C`.

use stellar_strkey::{ed25519::PublicKey as StrkeyPublicKey, Contract};
use stellar_xdr::curr::{AccountId, ContractId, Hash, PublicKey, ScAddress, Uint256};

use crate::models::blockchain::stellar::error::StellarValueError;

/// Checks if a string is a valid Stellar account or contract address.
///
/// # Arguments
/// * `address` - The string to check
///
/// # Returns
/// `true` if the string is a valid Stellar address, `false` otherwise
pub fn is_valid_address(address: &str) -> bool {
	StrkeyPublicKey::from_string(address).is_ok() || Contract::from_string(address).is_ok()
}

/// Parses a Stellar address into its XDR representation
pub fn parse_sc_address(address: &str) -> Result<ScAddress, StellarValueError> {
	if let Ok(key) = StrkeyPublicKey::from_string(address) {
		return Ok(ScAddress::Account(AccountId(
			PublicKey::PublicKeyTypeEd25519(Uint256(key.0)),
		)));
	}

	if let Ok(contract) = Contract::from_string(address) {
		return Ok(ScAddress::Contract(ContractId(Hash(contract.0))));
	}

	Err(StellarValueError::invalid_address(address))
}

/// Parses a contract address (`C…`) into its raw 32 byte id
pub fn parse_contract_id(address: &str) -> Result<[u8; 32], StellarValueError> {
	Contract::from_string(address)
		.map(|contract| contract.0)
		.map_err(|_| StellarValueError::invalid_address(address))
}

/// Renders an XDR address back into strkey form.
///
/// Address kinds other than accounts and contracts render as `None`.
pub fn format_sc_address(address: &ScAddress) -> Option<String> {
	match address {
		ScAddress::Account(AccountId(PublicKey::PublicKeyTypeEd25519(key))) => {
			Some(StrkeyPublicKey(key.0).to_string())
		}
		ScAddress::Contract(ContractId(hash)) => Some(Contract(hash.0).to_string()),
		_ => None,
	}
}
