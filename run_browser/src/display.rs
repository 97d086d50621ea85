use itertools::Itertools;

use crate::scan::RunEntry;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const YELLOW: &str = "\x1b[33m";

/// Terminal styling of run listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// ANSI colours and bold text
    Ansi,
    Plain,
}

impl Style {
    fn paint(self, code: &'static str) -> &'static str {
        match self {
            Style::Ansi => code,
            Style::Plain => "",
        }
    }
}

/// Summarise the parameters of a run, e.g. `workload=ycsb, tps=5000, partitions=4`.
///
/// Parameters that were not recorded are left out, as is a zero Zipf constant.
pub fn run_details(run: &RunEntry) -> String {
    let meta = &run.metadata;
    let mut details = Vec::new();

    if !meta.workload.is_empty() {
        details.push(format!("workload={}", meta.workload));
    }
    if let Some(tps) = meta.messages_per_second {
        details.push(format!("tps={tps}"));
    }
    if let Some(partitions) = meta.n_partitions {
        details.push(format!("partitions={partitions}"));
    }
    if let Some(duration) = meta.duration_s {
        details.push(format!("duration={duration:.0}s"));
    }
    if let Some(threads) = meta.n_threads {
        details.push(format!("threads={threads}"));
    }
    if let Some(interval) = meta.increase_interval {
        details.push(format!("increase_interval={interval}s"));
    }
    if let Some(amount) = meta.increase_amount {
        details.push(format!("increase_amount={amount}"));
    }
    if let Some(zipf) = meta.zipf_const.filter(|zipf| *zipf != 0.0) {
        // Debug keeps the fraction of whole numbers, e.g. `1.0`
        details.push(format!("zipf={zipf:?}"));
    }
    if let Some(epoch_size) = meta.epoch_size {
        details.push(format!("epoch_size={epoch_size}"));
    }

    details.into_iter().join(", ")
}

/// Format one line of the run listing.
///
/// `idx` is the 1-based number the user types to select the run.
pub fn format_run_line(idx: usize, run: &RunEntry, style: Style) -> String {
    let reset = style.paint(RESET);
    format!(
        "{yellow}[{idx:>2}]{reset} {bold}{name}{reset}  ({details})  {start} → {end}{reset}",
        yellow = style.paint(YELLOW),
        bold = style.paint(BOLD),
        name = run.dir_name,
        details = run_details(run),
        start = run.metadata.start.format("%Y-%m-%d %H:%M:%S"),
        end = run.metadata.end.format("%H:%M:%S"),
    )
}
