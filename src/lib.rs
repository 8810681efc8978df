//! EcoStellar contract gateway.
//!
//! This library provides the blockchain core of the EcoStellar backend: a gateway that
//! invokes the EcoToken, GameRewards and TreeNFT Soroban contracts through the
//! simulate → assemble → sign → submit → poll transaction lifecycle, and falls back to
//! deterministic mock responses when the contracts are not configured.
//!
//! # Architecture
//!
//! The library is organized into several key modules:
//!
//! * `bootstrap` - Construction of the gateway from configuration
//! * `models` - Configuration, contract arguments, RPC models and result types
//! * `services` - RPC client, transport and the contract gateway
//! * `utils` - Error context, logging and metrics

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
