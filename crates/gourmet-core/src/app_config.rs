use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub access_log_enabled: bool,
    pub hotpepper_api_key: Option<String>,
    pub hotpepper_base_url: String,
    pub hotpepper_timeout_ms: u64,
    pub hotpepper_max_retries: u32,
    pub hotpepper_retry_delay_ms: u64,
    pub hotpepper_user_agent: String,
    pub area_fetch_concurrency: usize,
    /// Browser map key; handed to the front end untouched.
    pub google_maps_api_key: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("access_log_enabled", &self.access_log_enabled)
            .field(
                "hotpepper_api_key",
                &self.hotpepper_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("hotpepper_base_url", &self.hotpepper_base_url)
            .field("hotpepper_timeout_ms", &self.hotpepper_timeout_ms)
            .field("hotpepper_max_retries", &self.hotpepper_max_retries)
            .field("hotpepper_retry_delay_ms", &self.hotpepper_retry_delay_ms)
            .field("hotpepper_user_agent", &self.hotpepper_user_agent)
            .field("area_fetch_concurrency", &self.area_fetch_concurrency)
            .field(
                "google_maps_api_key",
                &self.google_maps_api_key.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
