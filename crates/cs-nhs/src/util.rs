use std::time::Duration;

/// The service-search pages are slow to render server-side.
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

pub fn default_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .gzip(true)
        .brotli(true)
        .timeout(HTTP_TIMEOUT)
        .build()
        .expect("Invalid default HTTP client config")
}
