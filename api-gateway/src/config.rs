//! Application configuration

use std::env;

/// Application configuration
pub struct AppConfig {
    /// API port
    pub port: u16,
    /// Instrument served by this process
    pub market: String,
}

impl AppConfig {
    /// Create a new configuration from environment variables
    pub fn new() -> Self {
        Self {
            port: env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            market: env::var("MARKET").unwrap_or_else(|_| "BTC/USD".to_string()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}
