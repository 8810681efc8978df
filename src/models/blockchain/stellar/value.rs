//! Decoding of contract return values.
//!
//! This module converts `ScVal` return values into JSON for callers and provides typed
//! accessors for the handful of shapes the gateway adapters read (integers, strings,
//! vectors and symbol-keyed maps).

use serde_json::{json, Value};
use stellar_xdr::curr::{
	Int128Parts, Limits, ReadXdr, ScMap, ScMapEntry, ScVal, ScVec, TransactionMeta,
	UInt128Parts,
};

use crate::models::blockchain::stellar::{address::format_sc_address, error::StellarValueError};

/// Combines the parts of an Int128 into a single value
pub fn combine_i128(n: &Int128Parts) -> i128 {
	((n.hi as i128) << 64) | (n.lo as i128)
}

/// Combines the parts of a UInt128 into a single value
pub fn combine_u128(n: &UInt128Parts) -> u128 {
	((n.hi as u128) << 64) | (n.lo as u128)
}

/// Processes a Stellar Contract Value (ScVal) into a JSON representation.
///
/// 128-bit integers are rendered as decimal strings so no precision is lost in JSON.
///
/// # Arguments
/// * `val` - The ScVal to process
///
/// # Returns
/// A JSON Value representing the processed ScVal
pub fn sc_val_to_json(val: &ScVal) -> Value {
	match val {
		ScVal::Bool(b) => json!(b),
		ScVal::Void => Value::Null,
		ScVal::U32(n) => json!(n),
		ScVal::I32(n) => json!(n),
		ScVal::U64(n) => json!(n),
		ScVal::I64(n) => json!(n),
		ScVal::Timepoint(t) => json!(t.0),
		ScVal::Duration(d) => json!(d.0),
		ScVal::U128(n) => json!(combine_u128(n).to_string()),
		ScVal::I128(n) => json!(combine_i128(n).to_string()),
		ScVal::Bytes(b) => json!(hex::encode(b)),
		ScVal::String(s) => json!(s.to_string()),
		ScVal::Symbol(s) => json!(s.to_string()),
		ScVal::Vec(Some(vec)) => sc_vec_to_json(vec),
		ScVal::Vec(None) => json!([]),
		ScVal::Map(Some(map)) => sc_map_to_json(map),
		ScVal::Map(None) => json!({}),
		ScVal::Address(addr) => match format_sc_address(addr) {
			Some(address) => json!(address),
			None => json!("unsupported_address"),
		},
		_ => json!("unsupported_type"),
	}
}

fn sc_vec_to_json(vec: &ScVec) -> Value {
	Value::Array(vec.0.iter().map(sc_val_to_json).collect())
}

fn sc_map_to_json(map: &ScMap) -> Value {
	let entries: serde_json::Map<String, Value> = map
		.0
		.iter()
		.map(|ScMapEntry { key, val }| {
			let key = match sc_val_to_json(key) {
				Value::String(s) => s,
				other => other.to_string(),
			};
			(key, sc_val_to_json(val))
		})
		.collect();
	Value::Object(entries)
}

/// Reads any integer `ScVal` as an `i128`.
///
/// Returns `None` for non-integer values and for `u128` values above `i128::MAX`.
pub fn sc_val_to_i128(val: &ScVal) -> Option<i128> {
	match val {
		ScVal::I128(n) => Some(combine_i128(n)),
		ScVal::U128(n) => i128::try_from(combine_u128(n)).ok(),
		ScVal::I64(n) => Some(*n as i128),
		ScVal::U64(n) => Some(*n as i128),
		ScVal::I32(n) => Some(*n as i128),
		ScVal::U32(n) => Some(*n as i128),
		_ => None,
	}
}

/// Reads a non-negative integer `ScVal` as a `u64`
pub fn sc_val_to_u64(val: &ScVal) -> Option<u64> {
	sc_val_to_i128(val).and_then(|n| u64::try_from(n).ok())
}

/// Reads a string or symbol `ScVal`
pub fn sc_val_to_string(val: &ScVal) -> Option<String> {
	match val {
		ScVal::String(s) => Some(s.to_string()),
		ScVal::Symbol(s) => Some(s.to_string()),
		_ => None,
	}
}

/// Returns the items of a vector `ScVal`
pub fn sc_val_items(val: &ScVal) -> Option<&[ScVal]> {
	match val {
		ScVal::Vec(Some(vec)) => Some(&vec.0),
		ScVal::Vec(None) => Some(&[]),
		_ => None,
	}
}

/// Looks up a field of a contract struct.
///
/// Soroban encodes `#[contracttype]` structs as maps keyed by symbol.
pub fn sc_map_get<'a>(val: &'a ScVal, field: &str) -> Option<&'a ScVal> {
	let ScVal::Map(Some(map)) = val else {
		return None;
	};

	map.0
		.iter()
		.find(|entry| sc_val_to_string(&entry.key).as_deref() == Some(field))
		.map(|entry| &entry.val)
}

/// Decodes a base64 XDR `ScVal`
pub fn decode_sc_val(xdr: &str) -> Result<ScVal, StellarValueError> {
	ScVal::from_xdr_base64(xdr, Limits::none()).map_err(|e| {
		StellarValueError::xdr_error("Failed to decode ScVal XDR", Some(Box::new(e)))
	})
}

/// Extracts the contract return value from a base64 `TransactionMeta`.
///
/// Returns `Ok(None)` when the meta carries no Soroban section.
pub fn return_value_from_meta(meta_xdr: &str) -> Result<Option<ScVal>, StellarValueError> {
	let meta = TransactionMeta::from_xdr_base64(meta_xdr, Limits::none()).map_err(|e| {
		StellarValueError::xdr_error("Failed to decode transaction meta XDR", Some(Box::new(e)))
	})?;

	Ok(match meta {
		TransactionMeta::V3(m) => m.soroban_meta.map(|s| s.return_value),
		TransactionMeta::V4(m) => m.soroban_meta.and_then(|s| s.return_value),
		_ => None,
	})
}
