use std::io::Write;
use std::path::PathBuf;

use log::{info, warn};

use crate::display::{format_run_line, Style};
use crate::grafana::{build_grafana_url, GrafanaConfig};
use crate::input::InputSource;
use crate::launch::BrowserLauncher;
use crate::scan::{find_runs_by_keyword, RunEntry};

const SELECT_PROMPT: &str = "\nSelect run number to open in Grafana (or 'q' to quit): ";
const QUIT_WORDS: [&str; 3] = ["q", "quit", "exit"];

/// Settings of a browsing session
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Directory holding one subdirectory per run
    pub results_dir: PathBuf,
    pub grafana: GrafanaConfig,
    pub style: Style,
}

/// What the user typed at the selection prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Quit,
    /// 0-based index into the listed runs
    Run(usize),
    /// Not a usable answer, with the message to show before asking again
    Invalid(String),
}

/// Interpret a line typed at the selection prompt, given `n_runs` listed runs.
pub fn parse_selection(line: &str, n_runs: usize) -> Selection {
    let choice = line.trim();
    if QUIT_WORDS.contains(&choice.to_lowercase().as_str()) {
        return Selection::Quit;
    }

    if choice.is_empty() || !choice.chars().all(|c| c.is_ascii_digit()) {
        return Selection::Invalid("Please enter a valid number or 'q'.".to_string());
    }

    match choice.parse::<usize>() {
        Ok(idx) if (1..=n_runs).contains(&idx) => Selection::Run(idx - 1),
        _ => Selection::Invalid(format!("Please enter a number between 1 and {n_runs}.")),
    }
}

/// How a browsing session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The user asked to quit
    Quit,
    /// No runs matched the keywords
    NoMatches,
}

/// An interactive session: list matching runs, let the user pick one, open it in Grafana, repeat.
pub struct RunBrowser<I, L, W> {
    config: BrowserConfig,
    input: I,
    launcher: L,
    out: W,
}

impl<I, L, W> RunBrowser<I, L, W>
where
    I: InputSource,
    L: BrowserLauncher,
    W: Write,
{
    pub fn new(config: BrowserConfig, input: I, launcher: L, out: W) -> Self {
        Self {
            config,
            input,
            launcher,
            out,
        }
    }

    /// Run the session until the user quits or no runs match.
    ///
    /// The results directory is scanned again before every prompt so runs exported meanwhile show
    /// up. A run whose window cannot be turned into a link, or a browser that fails to start, is
    /// reported and the session continues.
    pub fn run<S>(&mut self, keywords: &[S]) -> Result<Outcome, BrowseError>
    where
        S: AsRef<str>,
    {
        loop {
            let runs = find_runs_by_keyword(&self.config.results_dir, keywords);
            if runs.is_empty() {
                writeln!(self.out, "No matching runs found.")?;
                return Ok(Outcome::NoMatches);
            }

            self.list_runs(&runs)?;
            let Some(selected) = self.select_run(&runs)? else {
                return Ok(Outcome::Quit);
            };

            let url = match build_grafana_url(
                &self.config.grafana,
                selected.metadata.start,
                selected.metadata.end,
            ) {
                Ok(url) => url,
                Err(e) => {
                    warn!("Cannot build Grafana link for {}: {e}", selected.dir_name);
                    writeln!(self.out, "Cannot open {} in Grafana: {e}", selected.dir_name)?;
                    continue;
                }
            };
            writeln!(self.out, "\nOpening Grafana URL:\n  {url}\n")?;
            info!("Opening run {} in Grafana", selected.dir_name);
            if let Err(e) = self.launcher.open(&url) {
                warn!("Could not open browser: {e}");
            }
        }
    }

    fn list_runs(&mut self, runs: &[RunEntry]) -> Result<(), BrowseError> {
        writeln!(self.out, "Matching runs:")?;
        for (i, run) in runs.iter().enumerate() {
            writeln!(
                self.out,
                "  {}",
                format_run_line(i + 1, run, self.config.style)
            )?;
        }
        Ok(())
    }

    /// Prompt until the user picks a listed run or quits.
    fn select_run<'a>(
        &mut self,
        runs: &'a [RunEntry],
    ) -> Result<Option<&'a RunEntry>, BrowseError> {
        loop {
            self.out.flush()?;
            let Some(line) = self.input.read_line(SELECT_PROMPT)? else {
                return Ok(None);
            };

            match parse_selection(&line, runs.len()) {
                Selection::Quit => return Ok(None),
                Selection::Run(idx) => return Ok(Some(&runs[idx])),
                Selection::Invalid(message) => writeln!(self.out, "{message}")?,
            }
        }
    }

    /// Consume the session, returning its output
    pub fn into_output(self) -> W {
        self.out
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BrowseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_words_are_case_insensitive() {
        for line in ["q", "Q", " quit ", "EXIT\n"] {
            assert_eq!(Selection::Quit, parse_selection(line, 3), "{line:?}");
        }
    }

    #[test]
    fn numbers_are_one_based() {
        assert_eq!(Selection::Run(0), parse_selection("1\n", 3));
        assert_eq!(Selection::Run(2), parse_selection(" 3 ", 3));
    }

    #[test]
    fn non_numbers_are_invalid() {
        for line in ["abc", "", "-1", "1.5", "2a"] {
            assert_eq!(
                Selection::Invalid("Please enter a valid number or 'q'.".to_string()),
                parse_selection(line, 3),
                "{line:?}"
            );
        }
    }

    #[test]
    fn out_of_range_numbers_are_invalid() {
        for line in ["0", "4", "99", "99999999999999999999999"] {
            assert_eq!(
                Selection::Invalid("Please enter a number between 1 and 3.".to_string()),
                parse_selection(line, 3),
                "{line:?}"
            );
        }
    }
}
