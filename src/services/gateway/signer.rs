//! Operator key handling.
//!
//! The gateway signs every state-changing transaction with one operator key loaded from
//! configuration. This is a demo-grade trust model: the operator pays all fees and is the
//! only authorizer the contracts see, so anyone holding the key can mint rewards.

use ed25519_dalek::{Signer, SigningKey};
use sha2::{Digest, Sha256};
use std::fmt;
use stellar_strkey::ed25519::{PrivateKey, PublicKey as StrkeyPublicKey};
use stellar_xdr::curr::{DecoratedSignature, Signature, SignatureHint};
use zeroize::Zeroize;

use crate::{
	models::SecretString,
	services::{blockchain::BlockChainError, gateway::error::GatewayError},
};

/// Ed25519 key of the operator account
#[derive(Clone)]
pub struct OperatorSigner {
	signing_key: SigningKey,
	public_key: String,
}

impl OperatorSigner {
	/// Parses an `S…` secret seed.
	///
	/// # Errors
	/// Returns `INIT_FAILED` when the seed is not a valid strkey secret.
	pub fn from_secret(secret: &SecretString) -> Result<Self, GatewayError> {
		let mut seed = PrivateKey::from_string(secret.as_str().trim())
			.map_err(|e| {
				GatewayError::init_failed("Invalid operator secret key", Some(Box::new(e)))
			})?
			.0;
		let signing_key = SigningKey::from_bytes(&seed);
		seed.zeroize();

		let public_key =
			StrkeyPublicKey(signing_key.verifying_key().to_bytes()).to_string();

		Ok(Self {
			signing_key,
			public_key,
		})
	}

	/// The operator account address (`G…`)
	pub fn public_key(&self) -> &str {
		&self.public_key
	}

	/// Raw ed25519 public key bytes
	pub fn public_key_bytes(&self) -> [u8; 32] {
		self.signing_key.verifying_key().to_bytes()
	}

	/// Signs a 32-byte transaction hash and wraps the signature for an envelope.
	///
	/// The hint is the last four bytes of the public key.
	pub fn sign_hash(&self, hash: &[u8; 32]) -> Result<DecoratedSignature, BlockChainError> {
		let signature = self.signing_key.sign(hash).to_bytes();
		let public_key = self.public_key_bytes();

		let mut hint = [0u8; 4];
		hint.copy_from_slice(&public_key[28..32]);

		let signature = signature.to_vec().try_into().map_err(|e| {
			BlockChainError::transaction_error("Invalid signature length", Some(Box::new(e)), None)
		})?;

		Ok(DecoratedSignature {
			hint: SignatureHint(hint),
			signature: Signature(signature),
		})
	}
}

impl fmt::Debug for OperatorSigner {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("OperatorSigner")
			.field("public_key", &self.public_key)
			.finish_non_exhaustive()
	}
}

/// Network id: sha256 of the network passphrase
pub fn network_id(passphrase: &str) -> [u8; 32] {
	Sha256::digest(passphrase.as_bytes()).into()
}
