//! Greeting endpoint served by the restart server

/// Fixed body of `GET /`
pub const GREETING: &str = "Hello, World!\n";

/// GET /
pub async fn hello() -> &'static str {
    GREETING
}
