//! Readiness gate
//!
//! Blocks until the server answers HTTP on its local URL, the flat timeout
//! elapses, or the child process dies. Fixed sub-second interval, no backoff.

use std::time::{Duration, Instant};

use crate::server::ServerProcess;
use crate::{Error, Result};

/// How long to wait for the server before giving up
pub const STARTUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Delay between probe attempts
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Polls a local URL until the server behind it accepts requests
pub struct ReadinessGate {
    url: String,
    timeout: Duration,
    interval: Duration,
}

impl ReadinessGate {
    /// Gate with the default timeout and interval
    pub fn for_url(url: impl Into<String>) -> Self {
        Self::new(url, STARTUP_TIMEOUT, POLL_INTERVAL)
    }

    pub fn new(url: impl Into<String>, timeout: Duration, interval: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
            interval,
        }
    }

    /// Block until the URL answers successfully.
    ///
    /// Returns `StartupTimeout` if the deadline passes, or `ServerExited` if
    /// the child dies first — a dead child can never become ready, so the
    /// remaining timeout is not burned waiting for it.
    pub fn wait(&self, server: &mut ServerProcess) -> Result<()> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()?;

        let start = Instant::now();
        loop {
            if let Some(status) = server.try_status()? {
                return Err(Error::ServerExited(status.to_string()));
            }

            match client.get(&self.url).send() {
                Ok(response) if response.status().is_success() => {
                    tracing::info!(
                        "Server ready at {} after {:?}",
                        self.url,
                        start.elapsed()
                    );
                    return Ok(());
                }
                Ok(response) => {
                    tracing::debug!(
                        "Server answered {} while starting up",
                        response.status()
                    );
                }
                Err(e) if e.is_connect() || e.is_timeout() => {
                    // Not accepting connections yet.
                }
                Err(e) => return Err(Error::Http(e)),
            }

            if start.elapsed() >= self.timeout {
                return Err(Error::StartupTimeout(self.timeout));
            }
            std::thread::sleep(self.interval);
        }
    }
}
