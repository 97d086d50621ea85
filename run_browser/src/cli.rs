use std::path::PathBuf;

use clap::Parser;
use styx_run_browser::{DEFAULT_DASHBOARD_SLUG, DEFAULT_DASHBOARD_UID, DEFAULT_GRAFANA_URL};

#[derive(Parser)]
#[command(about, long_about = None)]
pub struct CliArgs {
    /// Keywords to filter runs by directory name (e.g. 'ycsb', 'dhr'), or by number of partitions
    /// used (e.g. '4partitions'). A run must match all keywords.
    #[arg(required = true, value_name = "KEYWORD")]
    pub keywords: Vec<String>,

    /// Directory containing one subdirectory per run.
    #[arg(long, env = "STYX_RESULTS_DIR", default_value = "results")]
    pub results_dir: PathBuf,

    /// URL of the Grafana instance.
    #[arg(long, env = "GRAFANA_URL", default_value = DEFAULT_GRAFANA_URL)]
    pub grafana_url: String,

    /// UID of the dashboard to open.
    #[arg(long, default_value = DEFAULT_DASHBOARD_UID)]
    pub dashboard_uid: String,

    /// URL slug of the dashboard to open.
    #[arg(long, default_value = DEFAULT_DASHBOARD_SLUG)]
    pub dashboard_slug: String,

    /// Only print the Grafana URL, do not start a browser.
    #[arg(long, default_value = "false")]
    pub print_only: bool,
}
