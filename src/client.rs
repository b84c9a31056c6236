use std::sync::OnceLock;

use crate::config::Config;

pub fn get_http_client() -> &'static reqwest::Client {
    static INSTANCE: OnceLock<reqwest::Client> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let timeout = Config::get().http_timeout();
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            })
    })
}
