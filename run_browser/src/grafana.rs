use chrono::NaiveDateTime;
use styx_run_model::{naive_local_to_epoch_ms, LocalTimeError};

/// Default Grafana base URL of the Styx docker compose setup
pub const DEFAULT_GRAFANA_URL: &str = "http://localhost:3001";
/// UID of the Styx system overview dashboard
pub const DEFAULT_DASHBOARD_UID: &str = "beckc0nxpeupsf";
/// Slug of the Styx system overview dashboard
pub const DEFAULT_DASHBOARD_SLUG: &str = "styx-system-overview";

/// Identifies the Grafana dashboard that runs are opened in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrafanaConfig {
    pub base_url: String,
    pub dashboard_uid: String,
    pub dashboard_slug: String,
}

impl Default for GrafanaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GRAFANA_URL.to_string(),
            dashboard_uid: DEFAULT_DASHBOARD_UID.to_string(),
            dashboard_slug: DEFAULT_DASHBOARD_SLUG.to_string(),
        }
    }
}

impl GrafanaConfig {
    /// Builds a [`GrafanaConfig`] with the specified base URL.
    pub fn base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Builds a [`GrafanaConfig`] with the specified dashboard UID.
    pub fn dashboard_uid(mut self, uid: String) -> Self {
        self.dashboard_uid = uid;
        self
    }

    /// Builds a [`GrafanaConfig`] with the specified dashboard slug.
    pub fn dashboard_slug(mut self, slug: String) -> Self {
        self.dashboard_slug = slug;
        self
    }
}

/// Build a link to the configured dashboard showing the window `[start, end]`.
///
/// Both bounds are naive local times and are converted to epoch milliseconds in the local
/// timezone, which is how Grafana interprets times typed into its time picker.
pub fn build_grafana_url(
    config: &GrafanaConfig,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<String, LocalTimeError> {
    let from_ms = naive_local_to_epoch_ms(start)?;
    let to_ms = naive_local_to_epoch_ms(end)?;

    Ok(format!(
        "{base}/d/{uid}/{slug}?from={from_ms}&to={to_ms}",
        base = config.base_url.trim_end_matches('/'),
        uid = config.dashboard_uid,
        slug = config.dashboard_slug,
    ))
}

#[cfg(test)]
mod tests {
    use chrono::{Local, NaiveDate, TimeZone};

    use super::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn local_ms(h: u32, m: u32) -> i64 {
        Local
            .with_ymd_and_hms(2024, 1, 1, h, m, 0)
            .single()
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn url_uses_local_epoch_millis() {
        let url = build_grafana_url(&GrafanaConfig::default(), at(10, 0), at(10, 5)).unwrap();

        assert_eq!(
            format!(
                "http://localhost:3001/d/beckc0nxpeupsf/styx-system-overview?from={}&to={}",
                local_ms(10, 0),
                local_ms(10, 5)
            ),
            url
        );
    }

    #[test]
    fn url_is_deterministic() {
        let config = GrafanaConfig::default();
        assert_eq!(
            build_grafana_url(&config, at(10, 0), at(10, 5)).unwrap(),
            build_grafana_url(&config, at(10, 0), at(10, 5)).unwrap()
        );
    }

    #[test]
    fn url_uses_configured_dashboard() {
        let config = GrafanaConfig::default()
            .base_url("https://grafana.example.com/".to_string())
            .dashboard_uid("abc123".to_string())
            .dashboard_slug("latency".to_string());

        let url = build_grafana_url(&config, at(10, 0), at(10, 5)).unwrap();
        assert!(
            url.starts_with("https://grafana.example.com/d/abc123/latency?from="),
            "{url}"
        );
    }
}
