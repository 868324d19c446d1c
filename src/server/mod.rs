//! Server module
//!
//! Relay application, restart lifecycle, routing, state and signal handling.

pub mod app;
pub mod restart;
pub mod routes;
pub mod signal;
pub mod state;

pub use app::App;
pub use restart::{RestartConfig, RestartError, RestartState, RestartableServer};
pub use signal::{shutdown_signal, RestartTrigger, SignalReason, SignalTrigger};
pub use state::AppState;
