/// Body returned by the root health check.
pub const GREETING: &str = "Hello, parking control!";

pub async fn health_handler() -> &'static str {
    GREETING
}
