//! Browse saved Styx benchmark runs and open their time window in Grafana.
//!
//! Runs are the subdirectories of a results directory that contain a `metadata.json`, as written
//! by `styx_export_metrics`.

mod display;
mod grafana;
mod input;
mod launch;
mod logging;
mod scan;
mod session;

pub use display::{format_run_line, run_details, Style};
pub use grafana::{
    build_grafana_url, GrafanaConfig, DEFAULT_DASHBOARD_SLUG, DEFAULT_DASHBOARD_UID,
    DEFAULT_GRAFANA_URL,
};
pub use input::{InputSource, ScriptedInput, StdinInput};
pub use launch::{BrowserLauncher, LaunchError, NoBrowser, SystemBrowser};
pub use logging::{init_logging, log_env, DEFAULT_LOG_FILTER};
pub use scan::{find_runs_by_keyword, load_run, matches_keywords, RunEntry};
pub use session::{parse_selection, BrowseError, BrowserConfig, Outcome, RunBrowser, Selection};
