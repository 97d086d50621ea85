#[macro_use]
extern crate log;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser as _;
use styx_export_metrics::prometheus::{PrometheusClient, PrometheusConfig, QueryWindow};
use styx_export_metrics::{export_all_metrics, save_metadata, ExportRequest, SaveMetadataParams};

mod cli;

const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit code for any failure, matching the run browser
const EXIT_FAILURE: u8 = 2;

fn main() -> ExitCode {
    env_logger::init();

    let args = cli::CliArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:?}");
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(args: cli::CliArgs) -> anyhow::Result<()> {
    info!("{CRATE_NAME} {CRATE_VERSION}");
    if args.start >= args.end {
        anyhow::bail!(
            "Run window is empty: start {} is not before end {}",
            args.start,
            args.end
        );
    }

    let request = ExportRequest::new(
        args.workload.clone(),
        QueryWindow {
            start: args.start,
            end: args.end,
            step: args.step.clone(),
        },
        args.out.clone(),
        args.partitions,
        args.messages_per_second,
    );
    let run_dir = request.run_dir();

    if args.skip_metrics {
        info!("Skipping metrics export");
    } else {
        info!("Using Prometheus at {}", args.prometheus_url);
        let client =
            PrometheusClient::new(PrometheusConfig::default().base_url(args.prometheus_url));
        export_all_metrics(&client, &request).context("Metrics export failed")?;
    }

    let params = SaveMetadataParams {
        workload: args.workload,
        start: args.start,
        end: args.end,
        n_partitions: Some(args.partitions),
        messages_per_second: Some(args.messages_per_second),
        n_keys: args.keys,
        seconds: args.duration,
        interval_seconds: args.increase_interval,
        delta_tps: args.increase_amount,
        zipf_const: args.zipf_const,
        epoch_size: args.epoch_size,
    };
    save_metadata(&params, &run_dir)
        .with_context(|| format!("Failed to save metadata to {}", run_dir.display()))?;

    println!("{}", run_dir.display());
    info!("Export completed successfully");

    Ok(())
}
