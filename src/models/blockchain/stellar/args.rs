//! Typed contract-call arguments.
//!
//! [`ScArg`] is the closed set of scalar argument types the gateway passes to EcoStellar
//! contracts. Every variant maps to exactly one on-chain `ScVal` type.

use serde::{Deserialize, Serialize};
use stellar_xdr::curr::{Int128Parts, ScString, ScVal};

use crate::models::blockchain::stellar::{address::parse_sc_address, error::StellarValueError};

/// A single typed contract argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ScArg {
	/// Account (`G…`) or contract (`C…`) address
	Address(String),
	I32(i32),
	U32(u32),
	I64(i64),
	U64(u64),
	I128(i128),
	String(String),
}

impl ScArg {
	pub fn address(value: impl Into<String>) -> Self {
		Self::Address(value.into())
	}

	pub fn string(value: impl Into<String>) -> Self {
		Self::String(value.into())
	}

	/// Encodes the argument as an `ScVal`.
	///
	/// # Errors
	/// Fails when an address does not parse or a string exceeds the XDR length limit.
	pub fn to_sc_val(&self) -> Result<ScVal, StellarValueError> {
		match self {
			Self::Address(address) => Ok(ScVal::Address(parse_sc_address(address)?)),
			Self::I32(n) => Ok(ScVal::I32(*n)),
			Self::U32(n) => Ok(ScVal::U32(*n)),
			Self::I64(n) => Ok(ScVal::I64(*n)),
			Self::U64(n) => Ok(ScVal::U64(*n)),
			Self::I128(n) => Ok(ScVal::I128(Int128Parts {
				hi: (*n >> 64) as i64,
				lo: *n as u64,
			})),
			Self::String(s) => {
				let value = s.clone().try_into().map_err(|e| {
					StellarValueError::xdr_error(
						format!("String argument of {} bytes is too long", s.len()),
						Some(Box::new(e)),
					)
				})?;
				Ok(ScVal::String(ScString(value)))
			}
		}
	}
}

/// Encodes an ordered argument list
pub fn encode_args(args: &[ScArg]) -> Result<Vec<ScVal>, StellarValueError> {
	args.iter().map(ScArg::to_sc_val).collect()
}
