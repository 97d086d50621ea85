use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use log::{debug, info};

use crate::metrics::MetricCatalog;
use crate::prometheus::{PrometheusError, QueryWindow, RangeQuery};

/// What to export and where to put it.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub workload: String,
    pub window: QueryWindow,
    /// Directory the run directory is created in
    pub out_path: PathBuf,
    pub n_partitions: u64,
    pub messages_per_second: u64,
    /// Local time of the export, used to name the run directory
    pub exported_at: NaiveDateTime,
}

impl ExportRequest {
    pub fn new(
        workload: impl Into<String>,
        window: QueryWindow,
        out_path: impl Into<PathBuf>,
        n_partitions: u64,
        messages_per_second: u64,
    ) -> Self {
        Self {
            workload: workload.into(),
            window,
            out_path: out_path.into(),
            n_partitions,
            messages_per_second,
            exported_at: Local::now().naive_local(),
        }
    }

    /// Override the export time.
    pub fn exported_at(mut self, exported_at: NaiveDateTime) -> Self {
        self.exported_at = exported_at;
        self
    }

    /// Name of the run directory, e.g. `ycsb_5000tps_4partitions_1205_1430`.
    pub fn run_dir_name(&self) -> String {
        format!(
            "{workload}_{tps}tps_{partitions}partitions_{timestamp}",
            workload = self.workload,
            tps = self.messages_per_second,
            partitions = self.n_partitions,
            timestamp = self.exported_at.format("%m%d_%H%M"),
        )
    }

    /// Full path of the run directory.
    pub fn run_dir(&self) -> PathBuf {
        self.out_path.join(self.run_dir_name())
    }
}

/// Runs every query of a [`MetricCatalog`] and stores the results as JSON files.
pub struct MetricsExporter<Q> {
    client: Q,
    catalog: MetricCatalog,
}

impl<Q> MetricsExporter<Q>
where
    Q: RangeQuery,
{
    pub fn new(client: Q, catalog: MetricCatalog) -> Self {
        Self { client, catalog }
    }

    /// Export all metrics for the request into its run directory.
    ///
    /// The first failing query aborts the export. Returns the run directory.
    pub fn export_all(&self, request: &ExportRequest) -> Result<PathBuf, ExportError> {
        let run_dir = request.run_dir();
        std::fs::create_dir_all(&run_dir)?;

        info!("Exporting metrics to {}", run_dir.display());
        for metric in self.catalog.iter() {
            debug!("Querying metric '{}': {}", metric.name, metric.query);
            let data = self
                .client
                .query_range(&metric.query, &request.window)
                .map_err(|source| ExportError::Query {
                    metric: metric.name.clone(),
                    source,
                })?;

            let path = run_dir.join(format!("{}.json", metric.name));
            write_json(&path, &data)?;
            debug!("Wrote {}", path.display());
        }
        info!(
            "Exported {} metrics for workload '{}'",
            self.catalog.len(),
            request.workload
        );

        Ok(run_dir)
    }
}

/// Export the standard Styx metric catalog, see [`MetricCatalog::styx`].
pub fn export_all_metrics<Q>(client: Q, request: &ExportRequest) -> Result<PathBuf, ExportError>
where
    Q: RangeQuery,
{
    MetricsExporter::new(client, MetricCatalog::styx(&request.window.step)).export_all(request)
}

fn write_json(path: &Path, data: &serde_json::Value) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.flush()?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to export metric '{metric}': {source}")]
    Query {
        metric: String,
        #[source]
        source: PrometheusError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serde JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::metrics::MetricQuery;

    /// Answers every query with a small matrix result, failing on a chosen query.
    #[derive(Default)]
    struct FakePrometheus {
        fail_on: Option<String>,
        seen: RefCell<Vec<String>>,
    }

    impl RangeQuery for FakePrometheus {
        fn query_range(
            &self,
            query: &str,
            window: &QueryWindow,
        ) -> Result<serde_json::Value, PrometheusError> {
            self.seen.borrow_mut().push(query.to_string());
            if self.fail_on.as_deref() == Some(query) {
                return Err(PrometheusError::Status {
                    status: 400,
                    body: "bad_data".to_string(),
                });
            }
            Ok(json!({
                "status": "success",
                "data": {
                    "resultType": "matrix",
                    "result": [{"metric": {}, "values": [[window.start, "1"], [window.end, "2"]]}]
                }
            }))
        }
    }

    fn request(out_path: &Path) -> ExportRequest {
        ExportRequest::new(
            "ycsb",
            QueryWindow {
                start: 1_704_103_200.0,
                end: 1_704_103_500.0,
                step: "5s".to_string(),
            },
            out_path,
            4,
            5000,
        )
        .exported_at(
            NaiveDate::from_ymd_opt(2024, 12, 5)
                .unwrap()
                .and_hms_opt(14, 30, 59)
                .unwrap(),
        )
    }

    #[test]
    fn test_run_dir_name() {
        let request = request(Path::new("results"));
        assert_eq!("ycsb_5000tps_4partitions_1205_1430", request.run_dir_name());
        assert_eq!(
            PathBuf::from("results/ycsb_5000tps_4partitions_1205_1430"),
            request.run_dir()
        );
    }

    #[test]
    fn test_writes_one_file_per_metric() {
        let tempdir = tempfile::tempdir().expect("failed to create temp dir");
        let fake = FakePrometheus::default();

        let run_dir = export_all_metrics(&fake, &request(tempdir.path())).expect("export failed");

        let mut files = std::fs::read_dir(&run_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect::<Vec<_>>();
        files.sort();
        assert_eq!(
            vec![
                "backpressure.json",
                "latency.json",
                "latency_breakdown.json",
                "memory.json",
                "queue_backlog.json",
                "snapshotting_time.json",
                "throughput.json",
                "transaction_latency.json",
            ],
            files
        );

        let throughput: serde_json::Value = serde_json::from_reader(
            File::open(run_dir.join("throughput.json")).expect("missing throughput.json"),
        )
        .expect("throughput.json is not JSON");
        assert_eq!(json!("success"), throughput["status"]);
        assert_eq!(json!(1_704_103_500.0), throughput["data"]["result"][0]["values"][1][0]);

        assert!(fake
            .seen
            .borrow()
            .contains(&"sum(rate(worker_epoch_throughput_tps[5s]))".to_string()));
    }

    #[test]
    fn test_first_failure_stops_the_export() {
        let tempdir = tempfile::tempdir().expect("failed to create temp dir");
        let catalog = MetricCatalog::from_queries(vec![
            MetricQuery {
                name: "first".to_string(),
                query: "up".to_string(),
            },
            MetricQuery {
                name: "broken".to_string(),
                query: "sum(".to_string(),
            },
            MetricQuery {
                name: "never".to_string(),
                query: "count(up)".to_string(),
            },
        ]);
        let fake = FakePrometheus {
            fail_on: Some("sum(".to_string()),
            ..Default::default()
        };

        let request = request(tempdir.path());
        let err = MetricsExporter::new(&fake, catalog)
            .export_all(&request)
            .unwrap_err();

        match err {
            ExportError::Query { metric, source } => {
                assert_eq!("broken", metric);
                assert!(matches!(source, PrometheusError::Status { status: 400, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(vec!["up", "sum("], *fake.seen.borrow());
        assert!(request.run_dir().join("first.json").is_file());
        assert!(!request.run_dir().join("never.json").exists());
    }
}
