//! Contract invocation lifecycle.
//!
//! A state-changing call moves through
//! `BUILDING → SIMULATING → ASSEMBLING → SIGNING → SUBMITTING → POLLING` and ends as
//! `SUCCESS`, `FAILED` or `TIMEOUT`. A read-only query stops after simulation.
//!
//! The transaction helpers in this module are pure and never touch the network; only
//! [`Invocation`] talks to the RPC node.

use serde_json::json;
use sha2::{Digest, Sha256};
use std::{collections::HashMap, fmt};
use stellar_xdr::curr::{
	ContractId, DecoratedSignature, Hash, HostFunction, InvokeContractArgs, InvokeHostFunctionOp,
	Limits, Memo, MuxedAccount, Operation, OperationBody, Preconditions, ReadXdr, ScAddress,
	ScSymbol, ScVal, SequenceNumber, SorobanAuthorizationEntry, SorobanTransactionData,
	TimeBounds, TimePoint, Transaction, TransactionEnvelope, TransactionExt,
	TransactionV1Envelope, Uint256, VecM, WriteXdr,
};
use tracing::{debug, info, warn};

use crate::{
	models::{
		decode_sc_val, encode_args, parse_contract_id, return_value_from_meta, sc_val_to_json,
		FinalStatus, GatewayConfig, ScArg, SendTransactionStatus, SimulateTransactionResponse,
		TransactionOutcome, TransactionStatus,
	},
	services::{
		blockchain::{BlockChainError, SorobanRpc},
		gateway::{
			error::{ErrorKind, GatewayError},
			signer::{network_id, OperatorSigner},
		},
	},
	utils::metrics::record_transaction_poll,
};

/// Envelope type tag of a transaction signature payload
const ENVELOPE_TYPE_TX: u32 = 2;

/// Stage of the invocation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationStage {
	Building,
	Simulating,
	Assembling,
	Signing,
	Submitting,
	Polling,
}

impl InvocationStage {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Building => "BUILDING",
			Self::Simulating => "SIMULATING",
			Self::Assembling => "ASSEMBLING",
			Self::Signing => "SIGNING",
			Self::Submitting => "SUBMITTING",
			Self::Polling => "POLLING",
		}
	}
}

impl fmt::Display for InvocationStage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A single contract call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
	/// Contract address (`C…`)
	pub contract_id: String,
	pub method: String,
	pub args: Vec<ScArg>,
}

impl InvocationRequest {
	pub fn new(contract_id: impl Into<String>, method: impl Into<String>, args: Vec<ScArg>) -> Self {
		Self {
			contract_id: contract_id.into(),
			method: method.into(),
			args,
		}
	}
}

/// Builds an unsigned transaction holding one `InvokeHostFunction` operation.
///
/// # Arguments
/// * `source` - Operator public key bytes
/// * `sequence` - Current account sequence; the transaction uses `sequence + 1`
/// * `base_fee` - Inclusion fee in stroops
/// * `max_time` - Upper time bound in unix seconds
/// * `request` - Contract, method and arguments
pub fn build_transaction(
	source: [u8; 32],
	sequence: i64,
	base_fee: u32,
	max_time: u64,
	request: &InvocationRequest,
) -> Result<Transaction, BlockChainError> {
	let metadata = || {
		HashMap::from([
			("contract".to_string(), request.contract_id.clone()),
			("method".to_string(), request.method.clone()),
		])
	};

	let contract_id = parse_contract_id(&request.contract_id).map_err(|e| {
		BlockChainError::transaction_error("Invalid contract id", Some(Box::new(e)), Some(metadata()))
	})?;

	let function_name = ScSymbol(request.method.clone().try_into().map_err(|e| {
		BlockChainError::transaction_error(
			"Method name is not a valid symbol",
			Some(Box::new(e)),
			Some(metadata()),
		)
	})?);

	let args: VecM<ScVal> = encode_args(&request.args)
		.map_err(|e| {
			BlockChainError::transaction_error("Invalid argument", Some(Box::new(e)), Some(metadata()))
		})?
		.try_into()
		.map_err(|e| {
			BlockChainError::transaction_error("Too many arguments", Some(Box::new(e)), Some(metadata()))
		})?;

	let operation = Operation {
		source_account: None,
		body: OperationBody::InvokeHostFunction(InvokeHostFunctionOp {
			host_function: HostFunction::InvokeContract(InvokeContractArgs {
				contract_address: ScAddress::Contract(ContractId(Hash(contract_id))),
				function_name,
				args,
			}),
			auth: VecM::default(),
		}),
	};

	let operations: VecM<Operation, 100> = vec![operation].try_into().map_err(|e| {
		BlockChainError::transaction_error("Failed to create operations", Some(Box::new(e)), None)
	})?;

	Ok(Transaction {
		source_account: MuxedAccount::Ed25519(Uint256(source)),
		fee: base_fee,
		seq_num: SequenceNumber(sequence + 1),
		cond: Preconditions::Time(TimeBounds {
			min_time: TimePoint(0),
			max_time: TimePoint(max_time),
		}),
		memo: Memo::None,
		operations,
		ext: TransactionExt::V0,
	})
}

/// Applies simulation output to a transaction.
///
/// Sets the Soroban resource data, raises the fee by `minResourceFee` and attaches the
/// simulated authorization entries to operations that carry none.
pub fn assemble(
	mut tx: Transaction,
	simulation: &SimulateTransactionResponse,
) -> Result<Transaction, BlockChainError> {
	let transaction_data = simulation.transaction_data.as_deref().ok_or_else(|| {
		BlockChainError::transaction_error("Simulation returned no transaction data", None, None)
	})?;
	let soroban_data = SorobanTransactionData::from_xdr_base64(transaction_data, Limits::none())
		.map_err(|e| {
			BlockChainError::transaction_error(
				"Failed to decode transaction data",
				Some(Box::new(e)),
				None,
			)
		})?;

	let resource_fee = match simulation.min_resource_fee.as_deref() {
		Some(fee) => fee.parse::<u32>().map_err(|e| {
			BlockChainError::transaction_error(
				format!("Invalid minResourceFee '{}'", fee),
				Some(Box::new(e)),
				None,
			)
		})?,
		None => 0,
	};
	tx.fee = tx.fee.checked_add(resource_fee).ok_or_else(|| {
		BlockChainError::transaction_error("Transaction fee overflows u32", None, None)
	})?;
	tx.ext = TransactionExt::V1(soroban_data);

	let auth = simulation
		.first_result()
		.map(|result| result.auth.as_slice())
		.unwrap_or_default()
		.iter()
		.map(|entry| SorobanAuthorizationEntry::from_xdr_base64(entry, Limits::none()))
		.collect::<Result<Vec<_>, _>>()
		.map_err(|e| {
			BlockChainError::transaction_error(
				"Failed to decode authorization entry",
				Some(Box::new(e)),
				None,
			)
		})?;

	if !auth.is_empty() {
		let mut operations = tx.operations.to_vec();
		for operation in operations.iter_mut() {
			if let OperationBody::InvokeHostFunction(invoke) = &mut operation.body {
				if invoke.auth.is_empty() {
					invoke.auth = auth.clone().try_into().map_err(|e| {
						BlockChainError::transaction_error(
							"Too many authorization entries",
							Some(Box::new(e)),
							None,
						)
					})?;
				}
			}
		}
		tx.operations = operations.try_into().map_err(|e| {
			BlockChainError::transaction_error("Failed to rebuild operations", Some(Box::new(e)), None)
		})?;
	}

	Ok(tx)
}

/// Hash of the transaction signature payload for a network
pub fn transaction_hash(tx: &Transaction, passphrase: &str) -> Result<[u8; 32], BlockChainError> {
	let tx_xdr = tx.to_xdr(Limits::none()).map_err(|e| {
		BlockChainError::transaction_error("Failed to encode transaction", Some(Box::new(e)), None)
	})?;

	let mut hasher = Sha256::new();
	hasher.update(network_id(passphrase));
	hasher.update(ENVELOPE_TYPE_TX.to_be_bytes());
	hasher.update(&tx_xdr);
	Ok(hasher.finalize().into())
}

/// Wraps a transaction in a v1 envelope and encodes it as base64 XDR
pub fn envelope_xdr(
	tx: Transaction,
	signatures: Vec<DecoratedSignature>,
) -> Result<String, BlockChainError> {
	let signatures: VecM<DecoratedSignature, 20> = signatures.try_into().map_err(|e| {
		BlockChainError::transaction_error("Too many signatures", Some(Box::new(e)), None)
	})?;

	TransactionEnvelope::Tx(TransactionV1Envelope { tx, signatures })
		.to_xdr_base64(Limits::none())
		.map_err(|e| {
			BlockChainError::transaction_error("Failed to encode envelope", Some(Box::new(e)), None)
		})
}

/// Signs a transaction and returns the envelope together with the hex transaction hash
pub fn sign_envelope(
	tx: Transaction,
	signer: &OperatorSigner,
	passphrase: &str,
) -> Result<(String, String), BlockChainError> {
	let hash = transaction_hash(&tx, passphrase)?;
	let signature = signer.sign_hash(&hash)?;
	Ok((envelope_xdr(tx, vec![signature])?, hex::encode(hash)))
}

/// Runs queries and invocations for one operator against one RPC node
pub struct Invocation<'a, R: SorobanRpc + ?Sized> {
	pub rpc: &'a R,
	pub config: &'a GatewayConfig,
	pub signer: &'a OperatorSigner,
}

impl<R: SorobanRpc + ?Sized> Invocation<'_, R> {
	fn failure(
		kind: ErrorKind,
		stage: InvocationStage,
		request: &InvocationRequest,
		error: BlockChainError,
	) -> GatewayError {
		GatewayError::new(
			kind,
			format!("{} failed during {}", request.method, stage),
			Some(Box::new(error)),
			Some(HashMap::from([
				("stage".to_string(), stage.to_string()),
				("method".to_string(), request.method.clone()),
			])),
		)
	}

	/// BUILDING and SIMULATING.
	///
	/// Transport and build failures are reported with `failure_kind`; a rejected simulation
	/// is always `SIMULATION_FAILED`.
	async fn simulate(
		&self,
		request: &InvocationRequest,
		failure_kind: ErrorKind,
	) -> Result<(Transaction, SimulateTransactionResponse), GatewayError> {
		let stage = InvocationStage::Building;
		debug!(method = %request.method, contract = %request.contract_id, stage = %stage, "building transaction");

		let sequence = self
			.rpc
			.get_account_sequence(self.signer.public_key())
			.await
			.map_err(|e| Self::failure(failure_kind, stage, request, e))?;

		let max_time = chrono::Utc::now().timestamp().max(0) as u64 + self.config.tx_timeout_secs;
		let tx = build_transaction(
			self.signer.public_key_bytes(),
			sequence,
			self.config.base_fee,
			max_time,
			request,
		)
		.map_err(|e| Self::failure(failure_kind, stage, request, e))?;

		let stage = InvocationStage::Simulating;
		debug!(method = %request.method, stage = %stage, "simulating transaction");
		let unsigned = envelope_xdr(tx.clone(), Vec::new())
			.map_err(|e| Self::failure(failure_kind, stage, request, e))?;
		let simulation = self
			.rpc
			.simulate_transaction(&unsigned)
			.await
			.map_err(|e| Self::failure(failure_kind, stage, request, e))?;

		if let Some(error) = &simulation.error {
			warn!(method = %request.method, error = %error, "simulation rejected call");
			return Err(GatewayError::simulation_failed(format!(
				"Simulation of {} failed",
				request.method
			))
			.with_metadata("method", request.method.clone())
			.with_detail(json!(error)));
		}
		if simulation.first_result().is_none() {
			return Err(GatewayError::simulation_failed(format!(
				"Simulation of {} returned no result",
				request.method
			))
			.with_metadata("method", request.method.clone()));
		}
		if simulation.restore_preamble.is_some() {
			warn!(method = %request.method, "simulation reports archived ledger entries");
		}

		Ok((tx, simulation))
	}

	/// Simulates a read-only call and returns its decoded return value
	pub async fn query(&self, request: &InvocationRequest) -> Result<Option<ScVal>, GatewayError> {
		let (_, simulation) = self.simulate(request, ErrorKind::CallFailed).await?;

		match simulation.first_result() {
			Some(result) => decode_sc_val(&result.xdr).map(Some).map_err(|e| {
				GatewayError::call_failed(
					format!("Failed to decode return value of {}", request.method),
					Some(Box::new(e)),
				)
			}),
			None => Ok(None),
		}
	}

	/// Runs the full lifecycle of a state-changing call
	pub async fn invoke(&self, request: &InvocationRequest) -> Result<TransactionOutcome, GatewayError> {
		let kind = ErrorKind::InvokeFailed;
		let (tx, simulation) = self.simulate(request, kind).await?;

		let stage = InvocationStage::Assembling;
		let tx = assemble(tx, &simulation).map_err(|e| Self::failure(kind, stage, request, e))?;
		debug!(method = %request.method, stage = %stage, fee = tx.fee, "assembled transaction");

		let stage = InvocationStage::Signing;
		let (envelope, local_hash) = sign_envelope(tx, self.signer, self.config.network.passphrase())
			.map_err(|e| Self::failure(kind, stage, request, e))?;

		let stage = InvocationStage::Submitting;
		let sent = self
			.rpc
			.send_transaction(&envelope)
			.await
			.map_err(|e| Self::failure(kind, stage, request, e))?;

		let hash = if sent.hash.is_empty() { local_hash } else { sent.hash.clone() };
		match sent.status {
			SendTransactionStatus::Error => {
				warn!(method = %request.method, hash = %hash, "transaction rejected on submission");
				return Err(GatewayError::tx_failed(format!(
					"Transaction for {} was rejected",
					request.method
				))
				.with_metadata("hash", hash.clone())
				.with_detail(json!({
					"hash": hash,
					"errorResultXdr": sent.error_result_xdr,
				})));
			}
			SendTransactionStatus::TryAgainLater => {
				return Err(GatewayError::invoke_failed(
					format!("RPC node asked to retry {} later", request.method),
					None,
				)
				.with_metadata("hash", hash.clone())
				.with_detail(json!({ "hash": hash, "status": "TRY_AGAIN_LATER" })));
			}
			SendTransactionStatus::Pending | SendTransactionStatus::Duplicate => {
				info!(method = %request.method, hash = %hash, status = ?sent.status, "transaction submitted");
			}
		}

		self.poll(request, hash).await
	}

	/// POLLING: waits `poll_interval` before each of at most `max_poll_retries` lookups
	async fn poll(
		&self,
		request: &InvocationRequest,
		hash: String,
	) -> Result<TransactionOutcome, GatewayError> {
		let stage = InvocationStage::Polling;

		for attempt in 1..=self.config.max_poll_retries {
			tokio::time::sleep(self.config.poll_interval).await;

			let response = self.rpc.get_transaction(&hash).await.map_err(|e| {
				Self::failure(ErrorKind::InvokeFailed, stage, request, e)
					.with_metadata("hash", hash.clone())
					.with_detail(json!(hash))
			})?;
			record_transaction_poll(&response.status);

			match response.status() {
				TransactionStatus::Success => {
					let return_value = match response.result_meta_xdr.as_deref() {
						Some(meta) => return_value_from_meta(meta).unwrap_or_else(|e| {
							warn!(hash = %hash, error = %e, "could not decode return value");
							None
						}),
						None => None,
					};
					info!(method = %request.method, hash = %hash, ledger = ?response.ledger, "transaction confirmed");

					return Ok(TransactionOutcome {
						hash,
						status: FinalStatus::Success,
						ledger: response.ledger,
						method: request.method.clone(),
						result: return_value.as_ref().map(sc_val_to_json),
						return_value,
						mock: false,
					});
				}
				status if status.is_pending() => {
					debug!(hash = %hash, attempt, "transaction not yet final");
				}
				_ => {
					warn!(method = %request.method, hash = %hash, status = %response.status, "transaction failed");
					return Err(GatewayError::tx_failed(format!(
						"Transaction for {} finished with status {}",
						request.method, response.status
					))
					.with_metadata("hash", hash.clone())
					.with_detail(serde_json::to_value(&response).unwrap_or_else(|_| json!(hash))));
				}
			}
		}

		warn!(method = %request.method, hash = %hash, "transaction not confirmed in time");
		Err(GatewayError::timeout(format!(
			"Transaction for {} not confirmed after {} attempts",
			request.method, self.config.max_poll_retries
		))
		.with_metadata("hash", hash.clone())
		.with_detail(json!(hash)))
	}
}
