//! Contract gateway service.
//!
//! [`ContractGateway`] is the single entry point route handlers use to talk to the EcoStellar
//! contracts. It chooses mock or live mode once, from configuration completeness, and then
//! exposes generic `query`/`invoke` operations plus one adapter per contract method.

use rust_decimal::Decimal;
use serde_json::Value;
use std::{
	collections::HashMap,
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc,
	},
};
use stellar_xdr::curr::ScVal;
use tokio::sync::OnceCell;
use tracing::{info, instrument, warn};

use crate::{
	models::{
		fixed_point_to_decimal, is_valid_address, sc_map_get, sc_val_items, sc_val_to_i128,
		sc_val_to_json, sc_val_to_string, sc_val_to_u64, BalanceResult, Certificate,
		CertificateList, CertificateMint, ConfigSummary, GatewayConfig, InitReport, MintResult,
		QueryResult, ScArg, SessionRecord, TransactionOutcome, TransactionStatusReport,
		TreeMetadata, TOKEN_SCALE,
	},
	services::{
		blockchain::{SorobanRpc, SorobanTransportClient, StellarClient},
		gateway::{
			error::{ErrorKind, GatewayError},
			lifecycle::{Invocation, InvocationRequest},
			mock,
			signer::OperatorSigner,
		},
	},
	utils::metrics::{record_contract_call, server::HealthState, set_mock_mode},
};

/// Game type recorded when the caller does not name one
pub const DEFAULT_GAME_TYPE: &str = "carbon_dash";

/// Gateway backed by the HTTP Soroban RPC client
pub type StellarGateway = ContractGateway<StellarClient<SorobanTransportClient>>;

/// State created by the first successful live initialization
struct LiveContext {
	signer: OperatorSigner,
}

/// Contract invocation gateway.
///
/// Cloning is cheap; clones share configuration, RPC client and initialization state.
pub struct ContractGateway<R: SorobanRpc> {
	config: Arc<GatewayConfig>,
	rpc: Arc<R>,
	mock: bool,
	live: Arc<OnceCell<LiveContext>>,
	initialized: Arc<AtomicBool>,
}

impl<R: SorobanRpc> Clone for ContractGateway<R> {
	fn clone(&self) -> Self {
		Self {
			config: Arc::clone(&self.config),
			rpc: Arc::clone(&self.rpc),
			mock: self.mock,
			live: Arc::clone(&self.live),
			initialized: Arc::clone(&self.initialized),
		}
	}
}

/// Records the outcome of an operation and passes the result through
fn observe<T>(operation: &str, result: Result<T, GatewayError>) -> Result<T, GatewayError> {
	match &result {
		Ok(_) => record_contract_call(operation, "ok"),
		Err(e) => record_contract_call(operation, e.kind.as_str()),
	}
	result
}

fn invalid_address(kind: ErrorKind, field: &str, address: &str) -> GatewayError {
	GatewayError::new(
		kind,
		format!("Invalid Stellar address for {}", field),
		None,
		Some(HashMap::from([(field.to_string(), address.to_string())])),
	)
}

fn require_address(kind: ErrorKind, field: &str, address: &str) -> Result<(), GatewayError> {
	if is_valid_address(address) {
		Ok(())
	} else {
		Err(invalid_address(kind, field, address))
	}
}

impl<R: SorobanRpc> ContractGateway<R> {
	/// Creates a gateway.
	///
	/// Mock mode is selected here when the operator credential or any contract id is
	/// missing, and never changes afterwards.
	pub fn new(config: GatewayConfig, rpc: R) -> Self {
		let mock = config.is_mock();
		Self {
			config: Arc::new(config),
			rpc: Arc::new(rpc),
			mock,
			live: Arc::new(OnceCell::new()),
			initialized: Arc::new(AtomicBool::new(false)),
		}
	}

	pub fn config(&self) -> &GatewayConfig {
		&self.config
	}

	/// The RPC client shared by all clones
	pub fn rpc(&self) -> &R {
		&self.rpc
	}

	/// True when every operation is answered without contacting the network
	pub fn is_mock_mode(&self) -> bool {
		self.mock
	}

	/// Validates an account (`G…`) or contract (`C…`) address
	pub fn is_valid_address(&self, address: &str) -> bool {
		is_valid_address(address)
	}

	/// Block explorer link for a transaction hash
	pub fn explorer_link(&self, tx_hash: &str) -> String {
		self.config.explorer_link(tx_hash)
	}

	/// Network and mode as reported by the health endpoint
	pub fn health_state(&self) -> HealthState {
		HealthState {
			network: self.config.network.as_str().to_string(),
			mock_mode: self.mock,
		}
	}

	/// Non-secret view of the configuration
	pub fn config_summary(&self) -> ConfigSummary {
		ConfigSummary {
			network: self.config.network.as_str().to_string(),
			rpc_url: self.config.rpc_url.clone(),
			mock_mode: self.mock,
			initialized: self.initialized.load(Ordering::SeqCst),
			contracts: self.config.contracts.clone(),
			admin_public_key: self.admin_public_key(),
		}
	}

	fn admin_public_key(&self) -> Option<String> {
		self.live
			.get()
			.map(|live| live.signer.public_key().to_string())
	}

	/// Prepares the gateway for use.
	///
	/// Idempotent: live setup (credential parsing and the `getHealth` probe) runs once and
	/// concurrent callers wait for the same result. A failed probe is logged, not fatal.
	pub async fn initialize(&self) -> Result<InitReport, GatewayError> {
		set_mock_mode(self.mock);

		if self.mock {
			if !self.initialized.swap(true, Ordering::SeqCst) {
				warn!("contract configuration incomplete, gateway running in mock mode");
			}
			return Ok(self.init_report());
		}

		observe("initialize", self.live_context().await.map(|_| ()))?;
		Ok(self.init_report())
	}

	fn init_report(&self) -> InitReport {
		InitReport {
			mock: self.mock,
			network: self.config.network.as_str().to_string(),
			admin_public_key: self.admin_public_key(),
			contracts: self.config.contracts.clone(),
		}
	}

	async fn live_context(&self) -> Result<&LiveContext, GatewayError> {
		self.live
			.get_or_try_init(|| async {
				let secret = self.config.admin_secret.as_ref().ok_or_else(|| {
					GatewayError::init_failed("Operator secret key is not configured", None)
				})?;
				let signer = OperatorSigner::from_secret(secret)?;

				match self.rpc.get_health().await {
					Ok(health) => info!(
						network = %self.config.network,
						rpc_url = %self.config.rpc_url,
						status = %health.status,
						operator = %signer.public_key(),
						"gateway connected"
					),
					Err(e) => warn!(
						rpc_url = %self.config.rpc_url,
						error = %e,
						"RPC health probe failed, continuing"
					),
				}

				self.initialized.store(true, Ordering::SeqCst);
				Ok(LiveContext { signer })
			})
			.await
	}

	async fn invocation(&self, kind: ErrorKind) -> Result<Invocation<'_, R>, GatewayError> {
		let live = self.live_context().await.map_err(|e| e.or_kind(kind))?;
		Ok(Invocation {
			rpc: self.rpc.as_ref(),
			config: &self.config,
			signer: &live.signer,
		})
	}

	async fn query_live(&self, request: &InvocationRequest) -> Result<Option<ScVal>, GatewayError> {
		self.invocation(ErrorKind::CallFailed)
			.await?
			.query(request)
			.await
	}

	async fn invoke_live(
		&self,
		request: &InvocationRequest,
	) -> Result<TransactionOutcome, GatewayError> {
		self.invocation(ErrorKind::InvokeFailed)
			.await?
			.invoke(request)
			.await
	}

	fn contract_id<'a>(
		&self,
		id: &'a Option<String>,
		kind: ErrorKind,
		name: &str,
	) -> Result<&'a str, GatewayError> {
		id.as_deref().ok_or_else(|| {
			GatewayError::new(kind, format!("{} contract is not configured", name), None, None)
		})
	}

	/// Read-only contract call.
	///
	/// # Arguments
	/// * `contract_id` - Contract address (`C…`)
	/// * `method` - Contract function name
	/// * `args` - Ordered call arguments
	///
	/// # Returns
	/// * `Result<QueryResult, GatewayError>` - Simulated return value, or
	///   `SIMULATION_FAILED` / `CALL_FAILED`
	#[instrument(skip(self, args))]
	pub async fn query(
		&self,
		contract_id: &str,
		method: &str,
		args: Vec<ScArg>,
	) -> Result<QueryResult, GatewayError> {
		if self.mock {
			return Ok(mock::query());
		}

		let request = InvocationRequest::new(contract_id, method, args);
		let return_value = observe("query", self.query_live(&request).await)?;
		Ok(QueryResult {
			result: return_value.as_ref().map(sc_val_to_json),
			return_value,
			mock: false,
		})
	}

	/// State-changing contract call through the full transaction lifecycle.
	///
	/// # Returns
	/// * `Result<TransactionOutcome, GatewayError>` - Confirmed outcome, or one of
	///   `SIMULATION_FAILED`, `TX_FAILED`, `TIMEOUT`, `INVOKE_FAILED`
	#[instrument(skip(self, args))]
	pub async fn invoke(
		&self,
		contract_id: &str,
		method: &str,
		args: Vec<ScArg>,
	) -> Result<TransactionOutcome, GatewayError> {
		if self.mock {
			return Ok(mock::invoke(method));
		}

		let request = InvocationRequest::new(contract_id, method, args);
		observe("invoke", self.invoke_live(&request).await)
	}

	/// Mints whole EcoTokens to a player.
	///
	/// The amount is scaled to the token's seven-decimal fixed-point representation.
	#[instrument(skip(self))]
	pub async fn mint_fungible(&self, player: &str, amount: u64) -> Result<MintResult, GatewayError> {
		if self.mock {
			return Ok(mock::mint(&self.config, amount));
		}
		observe("mint_fungible", self.mint_fungible_live(player, amount).await)
	}

	async fn mint_fungible_live(&self, player: &str, amount: u64) -> Result<MintResult, GatewayError> {
		let kind = ErrorKind::MintFailed;
		require_address(kind, "player", player)?;
		let contract = self.contract_id(&self.config.contracts.eco_token, kind, "EcoToken")?;

		let request = InvocationRequest::new(
			contract,
			"mint",
			vec![ScArg::address(player), ScArg::I128(amount as i128 * TOKEN_SCALE)],
		);
		let outcome = self.invoke_live(&request).await.map_err(|e| e.or_kind(kind))?;

		Ok(MintResult {
			explorer_link: self.explorer_link(&outcome.hash),
			tx_hash: outcome.hash,
			tokens_minted: amount,
			ledger: outcome.ledger,
			mock: false,
		})
	}

	/// EcoToken balance of an address
	#[instrument(skip(self))]
	pub async fn get_fungible_balance(&self, address: &str) -> Result<BalanceResult, GatewayError> {
		if self.mock {
			return Ok(mock::balance());
		}
		observe("get_fungible_balance", self.get_fungible_balance_live(address).await)
	}

	async fn get_fungible_balance_live(&self, address: &str) -> Result<BalanceResult, GatewayError> {
		let kind = ErrorKind::BalanceFailed;
		require_address(kind, "address", address)?;
		let contract = self.contract_id(&self.config.contracts.eco_token, kind, "EcoToken")?;

		let request = InvocationRequest::new(contract, "balance", vec![ScArg::address(address)]);
		let value = self.query_live(&request).await.map_err(|e| e.or_kind(kind))?;

		let raw = value.as_ref().and_then(sc_val_to_i128).ok_or_else(|| {
			GatewayError::new(kind, "Balance is not an integer", None, None)
				.with_detail(value.as_ref().map(sc_val_to_json).unwrap_or(Value::Null))
		})?;
		let balance = fixed_point_to_decimal(raw).ok_or_else(|| {
			GatewayError::new(kind, "Balance is out of range", None, None).with_detail(raw.to_string())
		})?;

		Ok(BalanceResult {
			balance,
			balance_raw: Some(raw.to_string()),
			mock: false,
		})
	}

	/// Records a finished game session and returns the reward it earned.
	///
	/// When the contract's return value cannot be read, the reward falls back to
	/// `score / 10` whole tokens.
	#[instrument(skip(self))]
	pub async fn record_session(
		&self,
		player: &str,
		score: u32,
		game_type: Option<&str>,
	) -> Result<SessionRecord, GatewayError> {
		if self.mock {
			return Ok(mock::session(&self.config, score));
		}
		observe(
			"record_session",
			self.record_session_live(player, score, game_type).await,
		)
	}

	async fn record_session_live(
		&self,
		player: &str,
		score: u32,
		game_type: Option<&str>,
	) -> Result<SessionRecord, GatewayError> {
		let kind = ErrorKind::GameRecordFailed;
		require_address(kind, "player", player)?;
		let contract = self.contract_id(&self.config.contracts.game_rewards, kind, "GameRewards")?;
		let game_type = game_type
			.map(str::trim)
			.filter(|g| !g.is_empty())
			.unwrap_or(DEFAULT_GAME_TYPE);

		let request = InvocationRequest::new(
			contract,
			"record_game_session",
			vec![
				ScArg::address(player),
				ScArg::U32(score),
				ScArg::string(game_type),
			],
		);
		let outcome = self.invoke_live(&request).await.map_err(|e| e.or_kind(kind))?;

		let session = outcome.return_value.as_ref();
		let tokens_earned = session
			.and_then(|s| sc_map_get(s, "tokens_earned"))
			.and_then(sc_val_to_i128)
			.and_then(fixed_point_to_decimal)
			.unwrap_or_else(|| {
				warn!(hash = %outcome.hash, "session reward unreadable, using score / 10");
				Decimal::from(mock::fallback_reward(score))
			});
		let session_id = session
			.and_then(|s| sc_map_get(s, "session_id"))
			.and_then(|id| {
				sc_val_to_u64(id)
					.map(|n| n.to_string())
					.or_else(|| sc_val_to_string(id))
			});

		Ok(SessionRecord {
			explorer_link: self.explorer_link(&outcome.hash),
			tx_hash: outcome.hash,
			tokens_earned,
			session_id,
			ledger: outcome.ledger,
			mock: false,
		})
	}

	/// Mints a tree certificate NFT; missing metadata fields take their defaults
	#[instrument(skip(self, metadata))]
	pub async fn mint_tree_certificate(
		&self,
		player: &str,
		metadata: &TreeMetadata,
	) -> Result<CertificateMint, GatewayError> {
		if self.mock {
			return Ok(mock::certificate(&self.config));
		}
		observe(
			"mint_tree_certificate",
			self.mint_tree_certificate_live(player, metadata).await,
		)
	}

	async fn mint_tree_certificate_live(
		&self,
		player: &str,
		metadata: &TreeMetadata,
	) -> Result<CertificateMint, GatewayError> {
		let kind = ErrorKind::NftMintFailed;
		require_address(kind, "player", player)?;
		let contract = self.contract_id(&self.config.contracts.tree_nft, kind, "TreeNFT")?;

		let now = chrono::Utc::now().timestamp().max(0) as u64;
		let mut args = vec![ScArg::address(player)];
		args.extend(metadata.resolve(now).to_args());

		let request = InvocationRequest::new(contract, "mint", args);
		let outcome = self.invoke_live(&request).await.map_err(|e| e.or_kind(kind))?;

		Ok(CertificateMint {
			token_id: outcome.return_value.as_ref().and_then(sc_val_to_u64),
			explorer_link: self.explorer_link(&outcome.hash),
			tx_hash: outcome.hash,
			ledger: outcome.ledger,
			mock: false,
		})
	}

	/// Lists the tree certificates owned by an address.
	///
	/// Uses `get_player_trees` and `get_tree_data` when the contract supports enumeration.
	/// Otherwise only the `balance_of` count is reported and the list is empty.
	#[instrument(skip(self))]
	pub async fn list_certificates(&self, owner: &str) -> Result<CertificateList, GatewayError> {
		if self.mock {
			return Ok(mock::certificates());
		}
		observe("list_certificates", self.list_certificates_live(owner).await)
	}

	async fn list_certificates_live(&self, owner: &str) -> Result<CertificateList, GatewayError> {
		let kind = ErrorKind::NftFetchFailed;
		require_address(kind, "owner", owner)?;
		let contract = self.contract_id(&self.config.contracts.tree_nft, kind, "TreeNFT")?;

		match self.enumerate_certificates(contract, owner).await {
			Ok((owned, nfts)) => Ok(CertificateList {
				count: owned,
				nfts,
				enumerated: true,
				mock: false,
			}),
			Err(e) => {
				warn!(owner = %owner, error = %e, "get_player_trees unavailable, falling back to balance_of");
				let request =
					InvocationRequest::new(contract, "balance_of", vec![ScArg::address(owner)]);
				let value = self.query_live(&request).await.map_err(|e| e.or_kind(kind))?;
				let count = value.as_ref().and_then(sc_val_to_u64).ok_or_else(|| {
					GatewayError::new(kind, "balance_of did not return a count", None, None)
						.with_detail(value.as_ref().map(sc_val_to_json).unwrap_or(Value::Null))
				})?;

				Ok(CertificateList {
					count,
					nfts: Vec::new(),
					enumerated: false,
					mock: false,
				})
			}
		}
	}

	/// Returns the number of owned tokens and the certificates whose data could be read
	async fn enumerate_certificates(
		&self,
		contract: &str,
		owner: &str,
	) -> Result<(u64, Vec<Certificate>), GatewayError> {
		let request =
			InvocationRequest::new(contract, "get_player_trees", vec![ScArg::address(owner)]);
		let value = self.query_live(&request).await?;

		let token_ids = value
			.as_ref()
			.and_then(sc_val_items)
			.map(|items| items.iter().filter_map(sc_val_to_u64).collect::<Vec<_>>())
			.ok_or_else(|| {
				GatewayError::new(
					ErrorKind::NftFetchFailed,
					"get_player_trees did not return a list",
					None,
					None,
				)
			})?;

		let owned = token_ids.len() as u64;
		let mut nfts = Vec::with_capacity(token_ids.len());
		for token_id in token_ids {
			let request =
				InvocationRequest::new(contract, "get_tree_data", vec![ScArg::U64(token_id)]);
			match self.query_live(&request).await {
				Ok(data) => nfts.push(Certificate {
					token_id,
					metadata: data.as_ref().map(sc_val_to_json).unwrap_or(Value::Null),
				}),
				Err(e) => warn!(token_id, error = %e, "skipping certificate with unreadable data"),
			}
		}

		Ok((owned, nfts))
	}

	/// Current status of a submitted transaction
	#[instrument(skip(self))]
	pub async fn get_transaction_status(
		&self,
		hash: &str,
	) -> Result<TransactionStatusReport, GatewayError> {
		if self.mock {
			return Ok(mock::transaction_status(hash));
		}
		observe(
			"get_transaction_status",
			self.get_transaction_status_live(hash).await,
		)
	}

	async fn get_transaction_status_live(
		&self,
		hash: &str,
	) -> Result<TransactionStatusReport, GatewayError> {
		let kind = ErrorKind::TxFetchFailed;
		self.live_context().await.map_err(|e| e.or_kind(kind))?;

		let response = self.rpc.get_transaction(hash).await.map_err(|e| {
			GatewayError::new(
				kind,
				"Failed to fetch transaction",
				Some(Box::new(e)),
				Some(HashMap::from([("hash".to_string(), hash.to_string())])),
			)
		})?;

		Ok(TransactionStatusReport {
			hash: hash.to_string(),
			status: response.status.clone(),
			ledger: response.ledger,
			created_at: response.created_at.clone(),
			details: Some(response),
			mock: false,
		})
	}
}
