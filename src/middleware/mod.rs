//! Middleware module
//!
//! Contains HTTP middleware shared by both routers.

pub mod logging;

pub use logging::{log_request, TraceId, REQUEST_ID_HEADER, TRACE_ID_HEADER};
