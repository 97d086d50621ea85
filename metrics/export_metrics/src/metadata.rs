use std::path::Path;

use log::info;
use styx_run_model::{
    unix_to_local_naive, write_run_metadata, LocalTimeError, RunMetadata, RunMetadataError,
};

/// Description of a finished benchmark run, as known to the benchmark driver.
#[derive(Debug, Clone, Default)]
pub struct SaveMetadataParams {
    pub workload: String,
    /// Unix timestamp in seconds
    pub start: f64,
    /// Unix timestamp in seconds
    pub end: f64,
    pub n_partitions: Option<u64>,
    pub messages_per_second: Option<u64>,
    pub n_keys: Option<u64>,
    /// Configured duration in seconds
    pub seconds: Option<f64>,
    /// Throughput ramp interval in seconds
    pub interval_seconds: Option<u64>,
    /// Throughput ramp increment in messages per second
    pub delta_tps: Option<u64>,
    pub zipf_const: Option<f64>,
    pub epoch_size: Option<u64>,
}

impl SaveMetadataParams {
    /// Build the [`RunMetadata`] stored for these parameters.
    ///
    /// The window is converted to local time. The driver is single threaded, so `n_threads` is
    /// always 1.
    pub fn to_run_metadata(&self) -> Result<RunMetadata, SaveMetadataError> {
        let start = unix_to_local_naive(self.start)?;
        let end = unix_to_local_naive(self.end)?;

        Ok(RunMetadata::new(self.workload.clone(), start, end)
            .messages_per_second(self.messages_per_second)
            .n_partitions(self.n_partitions)
            .n_keys(self.n_keys)
            .duration_s(self.seconds)
            .zipf_const(self.zipf_const)
            .epoch_size(self.epoch_size)
            .ramp(self.interval_seconds, self.delta_tps)
            .n_threads(Some(1)))
    }
}

/// Write `metadata.json` for a run into `out_path`, creating the directory if needed.
pub fn save_metadata(
    params: &SaveMetadataParams,
    out_path: &Path,
) -> Result<RunMetadata, SaveMetadataError> {
    let metadata = params.to_run_metadata()?;
    write_run_metadata(out_path, &metadata)?;
    info!("Saved run metadata to {}", out_path.display());

    Ok(metadata)
}

#[derive(Debug, thiserror::Error)]
pub enum SaveMetadataError {
    #[error("Invalid run window: {0}")]
    Time(#[from] LocalTimeError),
    #[error("Failed to write run metadata: {0}")]
    Write(#[from] RunMetadataError),
}
