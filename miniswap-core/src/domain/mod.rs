//! Domain layer - entities and collaborator contracts
//!
//! This module contains the domain model of the swap flow and the traits
//! through which the core talks to the wallet, the chain and the exchange.

pub mod entities;
pub mod repositories;

// Re-export domain components
pub use entities::*;
pub use repositories::*;
