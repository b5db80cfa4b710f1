use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    /// Dashboard page location: a file path or an `http(s)://` URL.
    pub source: String,
    /// Where rendered chart descriptions are written.
    pub out_path: String,
    pub refresh_secs: u64,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            source: std::env::var("DASH_SOURCE").unwrap_or_else(|_| "http://localhost:9876/".to_string()),
            out_path: std::env::var("DASH_OUT").unwrap_or_else(|_| "out/dashboard.json".to_string()),
            refresh_secs: std::env::var("DASH_REFRESH_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(60),
            http_timeout_secs: std::env::var("DASH_HTTP_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(10),
        }
    }

    pub fn refresh_delay(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
