//! Collaborator contracts
//!
//! The swap core never talks to a wallet, node or exchange directly. These
//! traits describe what it consumes; `infrastructure` and the embedding
//! front end provide the implementations.

pub mod wallet_repository;
pub mod allowance_repository;
pub mod quote_repository;
pub mod transaction_repository;

// Re-export repositories
pub use wallet_repository::*;
pub use allowance_repository::*;
pub use quote_repository::*;
pub use transaction_repository::*;
