mod config;

use log::debug;

pub use self::config::{PrometheusConfig, DEFAULT_PROMETHEUS_URL};

/// Time window and resolution of a range query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryWindow {
    /// Unix timestamp in seconds
    pub start: f64,
    /// Unix timestamp in seconds
    pub end: f64,
    /// Sampling step as a Prometheus duration, e.g. `5s`
    pub step: String,
}

/// Something that can answer Prometheus range queries.
pub trait RangeQuery {
    /// Run `query` over `window` and return the response document as received.
    fn query_range(
        &self,
        query: &str,
        window: &QueryWindow,
    ) -> Result<serde_json::Value, PrometheusError>;
}

impl<Q> RangeQuery for &Q
where
    Q: RangeQuery + ?Sized,
{
    fn query_range(
        &self,
        query: &str,
        window: &QueryWindow,
    ) -> Result<serde_json::Value, PrometheusError> {
        (**self).query_range(query, window)
    }
}

/// A blocking client for the Prometheus HTTP API.
pub struct PrometheusClient {
    config: PrometheusConfig,
    agent: ureq::Agent,
}

impl PrometheusClient {
    /// Creates a new [`PrometheusClient`].
    ///
    /// No request timeout is set. Non-2xx responses are returned to the caller rather than turned
    /// into transport errors so that the response body can be reported.
    pub fn new(config: PrometheusConfig) -> Self {
        let agent = ureq::config::Config::builder()
            .http_status_as_error(false)
            .build()
            .new_agent();

        Self { config, agent }
    }
}

impl RangeQuery for PrometheusClient {
    fn query_range(
        &self,
        query: &str,
        window: &QueryWindow,
    ) -> Result<serde_json::Value, PrometheusError> {
        let url = self.config.query_range_url();
        debug!(
            "GET {url} query={query} start={start} end={end} step={step}",
            start = window.start,
            end = window.end,
            step = window.step
        );

        let mut response = self
            .agent
            .get(&url)
            .query("query", query)
            .query("start", window.start.to_string())
            .query("end", window.end.to_string())
            .query("step", &window.step)
            .call()?;

        let status = response.status();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_string()?;
        debug!("Prometheus responded with {status}, {} bytes", body.len());

        if !status.is_success() {
            return Err(PrometheusError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PrometheusError {
    #[error("Request to Prometheus failed: {0}")]
    Http(#[from] ureq::Error),
    #[error("Prometheus responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Prometheus response is not valid JSON: {0}")]
    Body(#[from] serde_json::Error),
}
