use std::path::PathBuf;

use clap::Parser;
use styx_export_metrics::prometheus::DEFAULT_PROMETHEUS_URL;

#[derive(Parser)]
#[command(about, long_about = None)]
pub struct CliArgs {
    /// Name of the benchmark workload, e.g. `ycsb`.
    #[arg(long)]
    pub workload: String,

    /// Start of the run window as a Unix timestamp in seconds.
    #[arg(long)]
    pub start: f64,

    /// End of the run window as a Unix timestamp in seconds.
    #[arg(long)]
    pub end: f64,

    /// Sampling step of the range queries, as a Prometheus duration.
    #[arg(long, default_value = "5s")]
    pub step: String,

    /// Directory the run directory is created in.
    #[arg(long, default_value = "results")]
    pub out: PathBuf,

    /// URL of the Prometheus instance.
    #[arg(long, env = "PROMETHEUS_URL", default_value = DEFAULT_PROMETHEUS_URL)]
    pub prometheus_url: String,

    /// Number of partitions the run used.
    #[arg(long)]
    pub partitions: u64,

    /// Target input throughput of the run.
    #[arg(long)]
    pub messages_per_second: u64,

    /// Number of keys in the key space.
    #[arg(long)]
    pub keys: Option<u64>,

    /// Configured run duration in seconds.
    #[arg(long)]
    pub duration: Option<f64>,

    /// Seconds between throughput increases, if the run used a throughput ramp.
    #[arg(long)]
    pub increase_interval: Option<u64>,

    /// Messages per second added at each throughput increase.
    #[arg(long)]
    pub increase_amount: Option<u64>,

    /// Zipfian key skew.
    #[arg(long)]
    pub zipf_const: Option<f64>,

    /// Number of transactions per epoch.
    #[arg(long)]
    pub epoch_size: Option<u64>,

    /// Only write `metadata.json`, do not query Prometheus.
    #[arg(long, default_value = "false")]
    pub skip_metrics: bool,
}
