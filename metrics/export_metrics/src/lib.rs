//! Export Prometheus metrics and run metadata after a Styx benchmark run.
//!
//! Each run gets its own directory holding `metadata.json` and one `<metric>.json` file per
//! entry of the [`MetricCatalog`], each containing the raw Prometheus range query response.

mod export;
mod metadata;
mod metrics;
pub mod prometheus;

pub use export::{export_all_metrics, ExportError, ExportRequest, MetricsExporter};
pub use metadata::{save_metadata, SaveMetadataError, SaveMetadataParams};
pub use metrics::{MetricCatalog, MetricName, MetricQuery};
