//! Integration tests for the EcoStellar contract gateway.
//!
//! Covers the invocation lifecycle against a mocked Soroban RPC, the contract adapters,
//! mock mode and the HTTP RPC client against a local mock server.

mod integration {
	mod mocks;
	mod blockchain {
		mod client;
	}
	mod gateway {
		mod adapters;
		mod initialize;
		mod lifecycle;
		mod mock_mode;
	}
}
