//! VPN session module
//!
//! Wraps every external-tool invocation behind a typed operation with a
//! consistent timeout and error-classification policy.

pub mod controller;
pub mod parser;
pub mod probe;
pub mod runner;
pub mod state;

// Public re-exports
pub use controller::{SessionController, Tuning};
pub use probe::{HttpProbe, ReachabilityProbe};
pub use runner::{CommandOutput, CommandRunner, RunnerError, SystemRunner};
pub use state::ConnectionState;
