//! Streamlit server process management
//!
//! Spawns and owns the `streamlit run` subprocess. The handle is a scoped
//! resource: dropping it kills and reaps the child, so the server never
//! outlives the invocation that started it.

use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};

use crate::{Error, Result};

/// Environment variable overriding streamlit executable discovery
pub const BIN_ENV: &str = "STREAMLIT_DESKTOP_BIN";

/// Owns the streamlit server subprocess
pub struct ServerProcess {
    child: Child,
}

impl ServerProcess {
    /// Spawn `streamlit run <script>` with the given options.
    ///
    /// The server's output is suppressed; its only observable surface is the
    /// HTTP endpoint it binds.
    pub fn launch(script: &Path, options: &[(String, String)]) -> Result<Self> {
        let streamlit = find_streamlit_binary()?;

        tracing::info!("Spawning streamlit server from: {:?}", streamlit);

        let mut command = Command::new(&streamlit);
        command.arg("run").arg(script);
        for (key, value) in options {
            command.arg(format!("--{}={}", key, value));
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        Self::spawn(command)
    }

    pub(crate) fn spawn(mut command: Command) -> Result<Self> {
        let child = command.spawn().map_err(Error::Spawn)?;
        tracing::debug!("Server process started (pid {})", child.id());
        Ok(Self { child })
    }

    /// OS process id of the child
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Exit status if the child has terminated, `None` while it is running
    pub fn try_status(&mut self) -> Result<Option<ExitStatus>> {
        self.child.try_wait().map_err(Error::Io)
    }

    /// Check if the process is still running
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Terminate the child and reap it. Safe to call more than once.
    ///
    /// On Unix the child first gets SIGTERM and a short grace period to
    /// release its socket, then SIGKILL.
    pub fn terminate(&mut self) {
        match self.child.try_wait() {
            Ok(Some(status)) => {
                tracing::debug!("Server process already exited: {}", status);
                return;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to poll server process: {}", e),
        }

        #[cfg(unix)]
        {
            // SAFETY: sending SIGTERM to a known child process pid.
            unsafe {
                libc::kill(self.child.id() as libc::pid_t, libc::SIGTERM);
            }
            for _ in 0..20 {
                match self.child.try_wait() {
                    Ok(Some(status)) => {
                        tracing::info!("Server process exited gracefully: {}", status);
                        return;
                    }
                    Ok(None) => std::thread::sleep(std::time::Duration::from_millis(100)),
                    Err(_) => break,
                }
            }
            tracing::warn!("Server process did not exit gracefully, killing");
        }

        if let Err(e) = self.child.kill() {
            tracing::warn!("Failed to kill server process: {}", e);
        }
        match self.child.wait() {
            Ok(status) => tracing::info!("Server process terminated: {}", status),
            Err(e) => tracing::warn!("Failed to reap server process: {}", e),
        }
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// Find the streamlit executable in PATH or common install locations
pub fn find_streamlit_binary() -> Result<PathBuf> {
    if let Ok(bin) = std::env::var(BIN_ENV) {
        if !bin.trim().is_empty() {
            let path = PathBuf::from(bin);
            if path.exists() {
                return Ok(path);
            }
            tracing::warn!(
                "{} points to a nonexistent path: {}",
                BIN_ENV,
                path.display()
            );
            return Err(Error::StreamlitNotFound);
        }
    }

    if let Ok(path) = which::which("streamlit") {
        return Ok(path);
    }

    // pip installs console scripts outside PATH in some environments
    let home = dirs::home_dir().ok_or(Error::StreamlitNotFound)?;
    let common_paths = [
        home.join(".local/bin/streamlit"),
        PathBuf::from("/usr/local/bin/streamlit"),
        PathBuf::from("/opt/homebrew/bin/streamlit"),
    ];

    for path in &common_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    Err(Error::StreamlitNotFound)
}

// Serializes tests that rewrite BIN_ENV, across test modules.
#[cfg(test)]
pub(crate) static BIN_ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Discover a free localhost port by binding an ephemeral socket and
/// releasing it
pub fn find_free_port() -> Result<u16> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).map_err(Error::PortDiscovery)?;
    let port = listener
        .local_addr()
        .map_err(Error::PortDiscovery)?
        .port();
    Ok(port)
}
