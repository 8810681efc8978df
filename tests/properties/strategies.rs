use ecostellar_gateway::models::config_keys as keys;
use proptest::prelude::*;
use stellar_strkey::{ed25519::PublicKey, Contract};

const STRKEY_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

pub fn account_address_strategy() -> impl Strategy<Value = String> {
	any::<[u8; 32]>().prop_map(|bytes| PublicKey(bytes).to_string())
}

pub fn contract_address_strategy() -> impl Strategy<Value = String> {
	any::<[u8; 32]>().prop_map(|bytes| Contract(bytes).to_string())
}

pub fn address_strategy() -> impl Strategy<Value = String> {
	prop_oneof![account_address_strategy(), contract_address_strategy()]
}

/// A valid address with exactly one character replaced by a different strkey character
pub fn corrupted_address_strategy() -> impl Strategy<Value = String> {
	(address_strategy(), 0usize..56, 1usize..STRKEY_ALPHABET.len()).prop_map(
		|(address, position, shift)| {
			let mut bytes = address.into_bytes();
			let current = STRKEY_ALPHABET
				.iter()
				.position(|c| *c == bytes[position])
				.unwrap_or(0);
			bytes[position] = STRKEY_ALPHABET[(current + shift) % STRKEY_ALPHABET.len()];
			String::from_utf8(bytes).unwrap()
		},
	)
}

pub fn tx_hash_strategy() -> impl Strategy<Value = String> {
	"[0-9a-f]{64}".prop_map(|s| s.to_string())
}

/// Which of the four live-mode credentials are present
pub fn credential_keys_strategy() -> impl Strategy<Value = Vec<&'static str>> {
	proptest::sample::subsequence(
		vec![
			keys::ADMIN_SECRET_KEY,
			keys::ECO_TOKEN_CONTRACT_ID,
			keys::GAME_REWARDS_CONTRACT_ID,
			keys::TREE_NFT_CONTRACT_ID,
		],
		0..=4,
	)
}
