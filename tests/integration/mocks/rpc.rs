use async_trait::async_trait;
use mockall::mock;

use ecostellar_gateway::{
	models::{
		GetHealthResponse, GetNetworkResponse, GetTransactionResponse, SendTransactionResponse,
		SimulateTransactionResponse,
	},
	services::blockchain::{BlockChainError, SorobanRpc},
};

mock! {
	pub SorobanRpcClient {}

	#[async_trait]
	impl SorobanRpc for SorobanRpcClient {
		async fn get_health(&self) -> Result<GetHealthResponse, BlockChainError>;
		async fn get_network(&self) -> Result<GetNetworkResponse, BlockChainError>;
		async fn get_account_sequence(&self, account_id: &str) -> Result<i64, BlockChainError>;
		async fn simulate_transaction(
			&self,
			envelope_xdr: &str,
		) -> Result<SimulateTransactionResponse, BlockChainError>;
		async fn send_transaction(
			&self,
			envelope_xdr: &str,
		) -> Result<SendTransactionResponse, BlockChainError>;
		async fn get_transaction(&self, hash: &str) -> Result<GetTransactionResponse, BlockChainError>;
	}
}

impl MockSorobanRpcClient {
	/// Healthy node with an operator account at `sequence`
	pub fn healthy(sequence: i64) -> Self {
		let mut rpc = Self::new();
		rpc.expect_get_health().returning(|| {
			Ok(GetHealthResponse {
				status: "healthy".to_string(),
				latest_ledger: Some(1000),
			})
		});
		rpc.expect_get_account_sequence()
			.returning(move |_| Ok(sequence));
		rpc
	}
}
