use std::io::IsTerminal as _;
use std::process::ExitCode;

use clap::Parser as _;
use log::{debug, error};
use styx_run_browser::{
    init_logging, BrowserConfig, BrowserLauncher, GrafanaConfig, NoBrowser, Outcome, RunBrowser,
    StdinInput, Style, SystemBrowser,
};

mod cli;

/// Exit code when no run matched the keywords
const EXIT_NO_MATCHES: u8 = 1;
/// Exit code for IO and other failures
const EXIT_FAILURE: u8 = 2;

fn main() -> ExitCode {
    init_logging();

    let args = cli::CliArgs::parse();
    debug!("Looking for runs in {}", args.results_dir.display());

    let style = if std::io::stdout().is_terminal() {
        Style::Ansi
    } else {
        Style::Plain
    };
    let config = BrowserConfig {
        results_dir: args.results_dir,
        grafana: GrafanaConfig::default()
            .base_url(args.grafana_url)
            .dashboard_uid(args.dashboard_uid)
            .dashboard_slug(args.dashboard_slug),
        style,
    };

    let launcher: Box<dyn BrowserLauncher> = if args.print_only {
        Box::new(NoBrowser)
    } else {
        Box::new(SystemBrowser)
    };

    let mut browser = RunBrowser::new(config, StdinInput, launcher, std::io::stdout());
    match browser.run(args.keywords.as_slice()) {
        Ok(Outcome::Quit) => ExitCode::SUCCESS,
        Ok(Outcome::NoMatches) => ExitCode::from(EXIT_NO_MATCHES),
        Err(e) => {
            error!("{e:?}");
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
