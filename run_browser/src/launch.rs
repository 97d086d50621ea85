use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use log::debug;

/// Opens URLs for the user.
pub trait BrowserLauncher {
    fn open(&mut self, url: &str) -> Result<(), LaunchError>;
}

/// Opens URLs with the desktop's default browser.
///
/// A command in the `BROWSER` environment variable takes precedence over the platform opener.
/// The browser is started in the background and not waited for.
#[derive(Debug, Default)]
pub struct SystemBrowser;

impl SystemBrowser {
    fn command(url: &str) -> Result<(PathBuf, Vec<OsString>), LaunchError> {
        if let Some(browser) = std::env::var_os("BROWSER").filter(|b| !b.is_empty()) {
            let program = which::which(&browser).map_err(|source| LaunchError::NotFound {
                program: browser.to_string_lossy().to_string(),
                source,
            })?;
            return Ok((program, vec![url.into()]));
        }

        let (program, mut args): (&str, Vec<OsString>) = if cfg!(target_os = "macos") {
            ("open", vec![])
        } else if cfg!(target_os = "windows") {
            ("cmd", vec!["/C".into(), "start".into(), "".into()])
        } else {
            ("xdg-open", vec![])
        };
        args.push(url.into());

        let program = which::which(program).map_err(|source| LaunchError::NotFound {
            program: program.to_string(),
            source,
        })?;
        Ok((program, args))
    }
}

impl BrowserLauncher for SystemBrowser {
    fn open(&mut self, url: &str) -> Result<(), LaunchError> {
        let (program, args) = Self::command(url)?;

        let child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(LaunchError::Spawn)?;
        debug!(
            "Started {} with PID: {pid}",
            program.display(),
            pid = child.id()
        );

        Ok(())
    }
}

/// Does not open anything, the URL is only printed.
#[derive(Debug, Default)]
pub struct NoBrowser;

impl BrowserLauncher for NoBrowser {
    fn open(&mut self, url: &str) -> Result<(), LaunchError> {
        debug!("Not opening {url}");
        Ok(())
    }
}

impl<T> BrowserLauncher for &mut T
where
    T: BrowserLauncher + ?Sized,
{
    fn open(&mut self, url: &str) -> Result<(), LaunchError> {
        (**self).open(url)
    }
}

impl<T> BrowserLauncher for Box<T>
where
    T: BrowserLauncher + ?Sized,
{
    fn open(&mut self, url: &str) -> Result<(), LaunchError> {
        (**self).open(url)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("Could not find browser command '{program}': {source}")]
    NotFound {
        program: String,
        #[source]
        source: which::Error,
    },
    #[error("Failed to start browser: {0}")]
    Spawn(#[source] std::io::Error),
}
