//! Infrastructure layer
//!
//! Configuration loading and the concrete adapters for the external
//! collaborators: JSON-RPC chain reads, the 0x price API and the exchange
//! handoff link.

pub mod config;
pub mod ethereum;
pub mod handoff;
pub mod zeroex;

pub use config::SwapConfig;
pub use ethereum::RpcChainReader;
pub use handoff::handoff_url;
pub use zeroex::ZeroExQuoteSource;
