//! Shared building blocks
//!
//! Chain primitives, the built-in chain tables and action labels, the error
//! type and decimal amount conversion.

pub mod constants;
pub mod error;
pub mod types;
pub mod utils;

pub use constants::*;
pub use error::*;
pub use types::*;
pub use utils::*;
