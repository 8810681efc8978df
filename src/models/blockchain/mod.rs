//! Blockchain-specific model implementations.
//!
//! The gateway only talks to Stellar/Soroban; the models live under `stellar`.

pub mod stellar;
