//! Domain entities and value objects
//!
//! This module contains the core domain entities and value objects
//! that represent the business concepts in the swap flow.

pub mod token;
pub mod chain;
pub mod swap;

// Re-export entities
pub use token::*;
pub use chain::*;
pub use swap::*;
