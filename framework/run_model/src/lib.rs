use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

mod lenient;
mod local_time;

pub use local_time::{
    format_iso, naive_local_to_epoch_ms, parse_iso, unix_to_local_naive, LocalTimeError,
};

/// Name of the metadata file stored in every run directory
pub const METADATA_FILE_NAME: &str = "metadata.json";

/// Metadata describing a single benchmark run
///
/// Stored as `metadata.json` inside the run's output directory. Written once by the exporter and
/// read-only afterwards. Only `start` and `end` must be valid when reading, the run parameters are
/// left unset when they cannot be read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunMetadata {
    /// The name of the benchmark workload, e.g. `ycsb`
    #[serde(default, deserialize_with = "lenient::text")]
    pub workload: String,
    /// Target input throughput
    #[serde(default, deserialize_with = "lenient::count")]
    pub messages_per_second: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub n_partitions: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub n_keys: Option<u64>,
    /// Start of the run window
    ///
    /// A naive local time, no timezone is recorded.
    #[serde(with = "local_time::iso_naive")]
    pub start: NaiveDateTime,
    /// End of the run window, a naive local time
    #[serde(with = "local_time::iso_naive")]
    pub end: NaiveDateTime,
    /// Configured run duration in seconds
    #[serde(
        rename = "duration (s)",
        default,
        deserialize_with = "lenient::float"
    )]
    pub duration_s: Option<f64>,
    /// Zipfian key skew
    #[serde(default, deserialize_with = "lenient::float")]
    pub zipf_const: Option<f64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub epoch_size: Option<u64>,
    /// Seconds between throughput increases
    ///
    /// Only present if the run used a throughput ramp.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::count"
    )]
    pub increase_interval: Option<u64>,
    /// Messages per second added at each throughput increase
    ///
    /// Only present if the run used a throughput ramp.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::count"
    )]
    pub increase_amount: Option<u64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::count"
    )]
    pub n_threads: Option<u32>,
    /// Any keys not listed above, kept verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RunMetadata {
    /// Create run metadata with only the required fields set
    pub fn new(workload: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            workload: workload.into(),
            messages_per_second: None,
            n_partitions: None,
            n_keys: None,
            start,
            end,
            duration_s: None,
            zipf_const: None,
            epoch_size: None,
            increase_interval: None,
            increase_amount: None,
            n_threads: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn messages_per_second(mut self, messages_per_second: Option<u64>) -> Self {
        self.messages_per_second = messages_per_second;
        self
    }

    pub fn n_partitions(mut self, n_partitions: Option<u64>) -> Self {
        self.n_partitions = n_partitions;
        self
    }

    pub fn n_keys(mut self, n_keys: Option<u64>) -> Self {
        self.n_keys = n_keys;
        self
    }

    pub fn duration_s(mut self, duration_s: Option<f64>) -> Self {
        self.duration_s = duration_s;
        self
    }

    pub fn zipf_const(mut self, zipf_const: Option<f64>) -> Self {
        self.zipf_const = zipf_const;
        self
    }

    pub fn epoch_size(mut self, epoch_size: Option<u64>) -> Self {
        self.epoch_size = epoch_size;
        self
    }

    /// Record a throughput ramp. Either part may be left unset.
    pub fn ramp(mut self, increase_interval: Option<u64>, increase_amount: Option<u64>) -> Self {
        self.increase_interval = increase_interval;
        self.increase_amount = increase_amount;
        self
    }

    pub fn n_threads(mut self, n_threads: Option<u32>) -> Self {
        self.n_threads = n_threads;
        self
    }
}

/// Errors reading or writing `metadata.json`
#[derive(Debug, thiserror::Error)]
pub enum RunMetadataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serde JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialize run metadata as indented JSON to a writer
pub fn store_run_metadata<W: Write>(
    metadata: &RunMetadata,
    writer: &mut W,
) -> Result<(), RunMetadataError> {
    serde_json::to_writer_pretty(&mut *writer, metadata)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Load run metadata from a reader
pub fn load_run_metadata<R: Read>(reader: R) -> Result<RunMetadata, RunMetadataError> {
    let reader = std::io::BufReader::new(reader);
    let metadata: RunMetadata = serde_json::from_reader(reader)?;
    Ok(metadata)
}

/// Write `metadata.json` into `run_dir`, creating the directory if needed
pub fn write_run_metadata(
    run_dir: &Path,
    metadata: &RunMetadata,
) -> Result<(), RunMetadataError> {
    std::fs::create_dir_all(run_dir)?;
    let mut file = std::fs::File::create(run_dir.join(METADATA_FILE_NAME))?;
    store_run_metadata(metadata, &mut file)?;
    Ok(())
}

/// Read `metadata.json` from `run_dir`
pub fn read_run_metadata(run_dir: &Path) -> Result<RunMetadata, RunMetadataError> {
    let file = std::fs::File::open(run_dir.join(METADATA_FILE_NAME))?;
    load_run_metadata(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn window() -> (NaiveDateTime, NaiveDateTime) {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (
            day.and_hms_opt(10, 0, 0).unwrap(),
            day.and_hms_opt(10, 5, 0).unwrap(),
        )
    }

    #[test]
    fn serializes_window_as_naive_iso() {
        let (start, end) = window();
        let metadata = RunMetadata::new("ycsb", start, end)
            .messages_per_second(Some(5000))
            .n_partitions(Some(4))
            .n_threads(Some(1));

        let mut out = Vec::new();
        store_run_metadata(&metadata, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let position = |key: &str| text.find(&format!("\"{key}\"")).unwrap();
        assert!(position("workload") < position("start"));
        assert!(position("start") < position("duration (s)"));
        assert!(position("epoch_size") < position("n_threads"));

        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json!("2024-01-01T10:00:00"), value["start"]);
        assert_eq!(json!("2024-01-01T10:05:00"), value["end"]);
        assert_eq!(json!(null), value["zipf_const"]);
        assert_eq!(json!(1), value["n_threads"]);
    }

    #[test]
    fn ramp_keys_are_omitted_when_unset() {
        let (start, end) = window();
        let value = serde_json::to_value(RunMetadata::new("ycsb", start, end)).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("increase_interval"));
        assert!(!object.contains_key("increase_amount"));

        let value =
            serde_json::to_value(RunMetadata::new("ycsb", start, end).ramp(Some(10), None))
                .unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(Some(&json!(10)), object.get("increase_interval"));
        assert!(!object.contains_key("increase_amount"));
    }

    #[test]
    fn unknown_keys_are_preserved() {
        let metadata: RunMetadata = serde_json::from_value(json!({
            "workload": "dhr",
            "start": "2024-01-01T10:00:00",
            "end": "2024-01-01T10:05:00",
            "warmup_seconds": 30,
            "notes": {"cluster": "local"}
        }))
        .unwrap();

        assert_eq!(2, metadata.extra.len());
        assert_eq!(Some(&json!(30)), metadata.extra.get("warmup_seconds"));

        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json!({"cluster": "local"}), value["notes"]);
    }

    #[test]
    fn missing_optional_fields_are_none() {
        let metadata: RunMetadata = serde_json::from_value(json!({
            "start": "2024-01-01T10:00:00",
            "end": "2024-01-01T10:05:00",
            "n_partitions": null
        }))
        .unwrap();

        let (start, end) = window();
        assert_eq!(RunMetadata::new("", start, end), metadata);
    }

    #[test]
    fn odd_run_parameters_do_not_reject_the_file() {
        let metadata: RunMetadata = serde_json::from_value(json!({
            "workload": "ycsb",
            "messages_per_second": 5000.0,
            "n_partitions": "4",
            "n_keys": -1,
            "start": "2024-01-01T10:00:00",
            "end": "2024-01-01T10:05:00",
            "duration (s)": "300",
            "zipf_const": "skewed",
            "epoch_size": "100",
            "n_threads": 1.5
        }))
        .unwrap();

        assert_eq!(Some(5000), metadata.messages_per_second);
        assert_eq!(Some(4), metadata.n_partitions);
        assert_eq!(None, metadata.n_keys);
        assert_eq!(Some(300.0), metadata.duration_s);
        assert_eq!(None, metadata.zipf_const);
        assert_eq!(Some(100), metadata.epoch_size);
        assert_eq!(None, metadata.n_threads);
        assert!(metadata.extra.is_empty());
    }

    #[test]
    fn missing_or_invalid_window_is_an_error() {
        assert!(serde_json::from_value::<RunMetadata>(json!({
            "workload": "ycsb",
            "start": "2024-01-01T10:00:00"
        }))
        .is_err());

        assert!(serde_json::from_value::<RunMetadata>(json!({
            "workload": "ycsb",
            "start": "not a time",
            "end": "2024-01-01T10:05:00"
        }))
        .is_err());
    }

    #[test]
    fn write_then_read_from_directory() {
        let tempdir = tempfile::tempdir().expect("failed to create temp dir");
        let run_dir = tempdir.path().join("nested").join("run");

        let (start, end) = window();
        let metadata = RunMetadata::new("ycsb", start, end)
            .zipf_const(Some(0.99))
            .epoch_size(Some(100))
            .ramp(Some(10), Some(500));

        write_run_metadata(&run_dir, &metadata).expect("failed to write metadata");
        assert!(run_dir.join(METADATA_FILE_NAME).is_file());

        let loaded = read_run_metadata(&run_dir).expect("failed to read metadata");
        assert_eq!(metadata, loaded);
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let tempdir = tempfile::tempdir().expect("failed to create temp dir");
        assert!(matches!(
            read_run_metadata(tempdir.path()),
            Err(RunMetadataError::Io(_))
        ));
    }
}
