use std::fmt;

/// Name of a metric exported for every run.
///
/// The name is also the file stem the metric is written to, e.g. `latency.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricName {
    Latency,
    Memory,
    Throughput,
    LatencyBreakdown,
    TransactionLatency,
    SnapshottingTime,
    Backpressure,
    QueueBacklog,
}

impl MetricName {
    /// All metrics, in export order.
    pub const ALL: [MetricName; 8] = [
        MetricName::Latency,
        MetricName::Memory,
        MetricName::Throughput,
        MetricName::LatencyBreakdown,
        MetricName::TransactionLatency,
        MetricName::SnapshottingTime,
        MetricName::Backpressure,
        MetricName::QueueBacklog,
    ];

    /// The PromQL range query for this metric.
    ///
    /// `step` is the sampling step of the export, used as the `rate` window for throughput.
    pub fn query(&self, step: &str) -> String {
        match self {
            // Historically named latency, this is worker CPU usage
            MetricName::Latency => "avg by(instance) (worker_cpu_usage_percent)".to_string(),
            MetricName::Memory => {
                "avg by(instance) (worker_memory_usage_mb) * 1000000".to_string()
            }
            MetricName::Throughput => format!("sum(rate(worker_epoch_throughput_tps[{step}]))"),
            MetricName::LatencyBreakdown => "avg(latency_breakdown) by (component)".to_string(),
            MetricName::TransactionLatency => "avg(worker_epoch_latency_ms)".to_string(),
            MetricName::SnapshottingTime => "avg(worker_total_snapshotting_time_ms)".to_string(),
            MetricName::Backpressure => "sum(worker_backpressure)".to_string(),
            MetricName::QueueBacklog => "sum(queue_backlog)".to_string(),
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricName::Latency => write!(f, "latency"),
            MetricName::Memory => write!(f, "memory"),
            MetricName::Throughput => write!(f, "throughput"),
            MetricName::LatencyBreakdown => write!(f, "latency_breakdown"),
            MetricName::TransactionLatency => write!(f, "transaction_latency"),
            MetricName::SnapshottingTime => write!(f, "snapshotting_time"),
            MetricName::Backpressure => write!(f, "backpressure"),
            MetricName::QueueBacklog => write!(f, "queue_backlog"),
        }
    }
}

/// A named PromQL query to export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricQuery {
    pub name: String,
    pub query: String,
}

/// The set of queries exported for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricCatalog {
    queries: Vec<MetricQuery>,
}

impl MetricCatalog {
    /// The standard Styx catalog, one query per [`MetricName`].
    pub fn styx(step: &str) -> Self {
        Self {
            queries: MetricName::ALL
                .iter()
                .map(|name| MetricQuery {
                    name: name.to_string(),
                    query: name.query(step),
                })
                .collect(),
        }
    }

    /// A catalog with custom queries.
    pub fn from_queries(queries: Vec<MetricQuery>) -> Self {
        Self { queries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricQuery> {
        self.queries.iter()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}
