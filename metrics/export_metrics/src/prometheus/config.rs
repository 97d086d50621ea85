/// Default base URL of the Prometheus server started by the Styx docker compose setup.
pub const DEFAULT_PROMETHEUS_URL: &str = "http://localhost:9090";

/// Connection settings for the Prometheus HTTP API.
#[derive(Debug, Clone)]
pub struct PrometheusConfig {
    pub base_url: String,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PROMETHEUS_URL.to_string(),
        }
    }
}

impl PrometheusConfig {
    /// Builds a [`PrometheusConfig`] with the specified base URL.
    pub fn base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// URL of the range query endpoint.
    pub fn query_range_url(&self) -> String {
        format!(
            "{base}/api/v1/query_range",
            base = self.base_url.trim_end_matches('/')
        )
    }
}
