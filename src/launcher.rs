//! Launch orchestration
//!
//! The linear startup sequence: validate the script, spawn the server, wait
//! for readiness, show the window, terminate the server. The window is never
//! shown before the readiness gate passes, and the server process is
//! terminated on every exit path because the handle kills its child on drop.

use std::time::Duration;

use crate::config::{self, LaunchConfig};
use crate::readiness::{self, ReadinessGate};
use crate::server::{self, ServerProcess};
use crate::window::{WindowConfig, WindowHost};
use crate::Result;

/// Run the full launch-gate-display-cleanup sequence with the default
/// webview host. Returns when the window is closed.
#[cfg(feature = "webview")]
pub fn start_desktop_app(config: &LaunchConfig) -> Result<()> {
    run_with_host(config, &mut crate::window::WebviewHost)
}

/// Launch sequence against an arbitrary window host
pub fn run_with_host(config: &LaunchConfig, host: &mut dyn WindowHost) -> Result<()> {
    launch_sequence(
        config,
        host,
        readiness::STARTUP_TIMEOUT,
        readiness::POLL_INTERVAL,
    )
}

fn launch_sequence(
    config: &LaunchConfig,
    host: &mut dyn WindowHost,
    timeout: Duration,
    interval: Duration,
) -> Result<()> {
    // Fails before any process is spawned.
    let script = config::validate_script(&config.script)?;

    let port = match config.port {
        Some(port) => port,
        None => server::find_free_port()?,
    };
    let url = format!("http://localhost:{}", port);
    let options = config.server_options(port);

    tracing::info!("Launching {} at {}", script.display(), url);
    let mut server = ServerProcess::launch(&script, &options)?;

    // On failure the handle's drop terminates the child and no window opens.
    ReadinessGate::new(&url, timeout, interval).wait(&mut server)?;

    let window = WindowConfig {
        title: config.title.clone(),
        width: config.width,
        height: config.height,
    };
    let shown = host.show(&url, &window);

    server.terminate();
    shown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{BIN_ENV, BIN_ENV_LOCK};
    use crate::Error;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// Window host that records invocations instead of opening anything
    #[derive(Default)]
    struct RecordingHost {
        shown: Vec<(String, WindowConfig)>,
    }

    impl WindowHost for RecordingHost {
        fn show(&mut self, url: &str, window: &WindowConfig) -> Result<()> {
            self.shown.push((url.to_string(), window.clone()));
            Ok(())
        }
    }

    /// Write an executable stand-in for the streamlit binary.
    ///
    /// Returns a closed `TempPath`: spawning a script that still has an open
    /// write handle fails with ETXTBSY on Linux.
    #[cfg(unix)]
    fn fake_streamlit(body: &str) -> tempfile::TempPath {
        use std::os::unix::fs::PermissionsExt;

        let mut file = tempfile::Builder::new()
            .prefix("fake-streamlit-")
            .tempfile()
            .unwrap();
        writeln!(file, "#!/bin/sh\n{}", body).unwrap();
        let mut perms = file.as_file().metadata().unwrap().permissions();
        perms.set_mode(0o755);
        file.as_file().set_permissions(perms).unwrap();
        file.into_temp_path()
    }

    fn python_script() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".py").tempfile().unwrap();
        writeln!(file, "import streamlit as st").unwrap();
        file
    }

    #[test]
    fn test_nonexistent_script_fails_before_spawn() {
        let config = LaunchConfig::new("/nonexistent/app.py");
        let mut host = RecordingHost::default();

        let result = run_with_host(&config, &mut host);
        assert!(matches!(result, Err(Error::InvalidScript(_))));
        assert!(host.shown.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_window_opens_at_server_url_after_ready() {
        let _env = BIN_ENV_LOCK.lock().unwrap();
        let script = python_script();
        let bin = fake_streamlit("exec sleep 30");
        std::env::set_var(BIN_ENV, &*bin);

        // Stand in for the server the fake binary never starts.
        let listener = TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let port = listener.local_addr().unwrap().port();
        std::thread::spawn(move || {
            for stream in listener.incoming().take(8) {
                let Ok(mut stream) = stream else { break };
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok",
                );
            }
        });

        let config = LaunchConfig::new(script.path())
            .title("Test App")
            .size(800, 600)
            .port(port);
        let mut host = RecordingHost::default();

        run_with_host(&config, &mut host).unwrap();

        assert_eq!(host.shown.len(), 1);
        let (url, window) = &host.shown[0];
        assert_eq!(url, &format!("http://localhost:{}", port));
        assert_eq!(window.title, "Test App");
        assert_eq!(window.width, 800);
        assert_eq!(window.height, 600);
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_terminates_server_and_opens_no_window() {
        let _env = BIN_ENV_LOCK.lock().unwrap();
        let script = python_script();

        // The fake server records its pid, then idles without ever listening.
        let pid_dir = tempfile::tempdir().unwrap();
        let pid_path = pid_dir.path().join("server.pid");
        let bin = fake_streamlit(&format!(
            "echo $$ > {}\nexec sleep 30",
            pid_path.display()
        ));
        std::env::set_var(BIN_ENV, &*bin);

        let config = LaunchConfig::new(script.path());
        let mut host = RecordingHost::default();

        let result = launch_sequence(
            &config,
            &mut host,
            Duration::from_millis(300),
            Duration::from_millis(50),
        );
        assert!(matches!(result, Err(Error::StartupTimeout(_))));
        assert!(host.shown.is_empty());

        // The handle was dropped on the error path, so the child must be gone.
        let pid: i32 = std::fs::read_to_string(&pid_path)
            .unwrap()
            .trim()
            .parse()
            .unwrap();
        let alive = std::process::Command::new("sh")
            .arg("-c")
            .arg(format!("kill -0 {}", pid))
            .status()
            .unwrap()
            .success();
        assert!(!alive);
    }

    #[cfg(unix)]
    #[test]
    fn test_server_that_dies_on_startup_opens_no_window() {
        let _env = BIN_ENV_LOCK.lock().unwrap();
        let script = python_script();
        let bin = fake_streamlit("exit 1");
        std::env::set_var(BIN_ENV, &*bin);

        let config = LaunchConfig::new(script.path());
        let mut host = RecordingHost::default();

        let result = run_with_host(&config, &mut host);
        assert!(matches!(result, Err(Error::ServerExited(_))));
        assert!(host.shown.is_empty());
    }
}
