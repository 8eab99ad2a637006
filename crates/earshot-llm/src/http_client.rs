use std::{sync::OnceLock, time::Duration};

use reqwest::{
    Client,
    header::{CONNECTION, HeaderMap, HeaderValue},
};

/// Shared HTTP client so every inference call reuses pooled connections
///
/// Generation can run for minutes, so no overall timeout is set; the
/// request deadline bounds each call.
pub fn http_client() -> Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();

    CLIENT
        .get_or_init(|| {
            let mut headers = HeaderMap::new();
            headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

            Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .pool_idle_timeout(Some(Duration::from_secs(90)))
                .tcp_keepalive(Some(Duration::from_secs(60)))
                .default_headers(headers)
                .build()
                .expect("Failed to build default HTTP client")
        })
        .clone()
}
