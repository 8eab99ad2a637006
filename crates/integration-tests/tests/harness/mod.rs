//! Shared fixtures for the integration tests
//!
//! Each test binary compiles this module separately and uses a different
//! subset of it.
#![allow(dead_code)]

pub mod config;
pub mod mock_ollama;
pub mod mock_whisper;
pub mod server;

use std::time::Duration;

/// Poll `condition` until it holds, panicking after five seconds
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);

    while !condition() {
        assert!(tokio::time::Instant::now() < deadline, "condition not reached in time");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Multipart form carrying `bytes` as the `file` field
pub fn audio_form(filename: &str, bytes: &[u8]) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(bytes.to_vec())
        .file_name(filename.to_owned())
        .mime_str("audio/wav")
        .expect("valid mime type");

    reqwest::multipart::Form::new().part("file", part)
}

/// A loopback address with nothing listening on it
pub async fn closed_address() -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    listener.local_addr().expect("local addr")
}
