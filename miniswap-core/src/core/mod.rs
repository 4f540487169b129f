//! Core swap functionality
//!
//! Registry lookups, the debounced quote engine, allowance tracking, the
//! action state machine and the session that ties them together.

pub mod registry;
pub mod quote;
pub mod allowance;
pub mod orchestrator;
pub mod session;

pub use registry::{ChainEntry, TokenRegistry};
pub use quote::{QuoteEngine, QuoteState};
pub use allowance::{AllowanceStatus, AllowanceTracker};
pub use orchestrator::{evaluate, ActionState, OrchestrationState, OrchestratorInputs, PrimaryAction};
pub use session::SwapSession;
