//! Launch configuration
//!
//! Immutable per-invocation description of what to launch and how the window
//! should look. Options are kept in the order they were supplied so the server
//! sees them the way the caller wrote them.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

pub const DEFAULT_TITLE: &str = "Streamlit Desktop App";
pub const DEFAULT_WIDTH: u32 = 1024;
pub const DEFAULT_HEIGHT: u32 = 768;

/// Option keys the launcher manages itself. User-supplied values for these
/// are dropped with a warning.
pub const RESERVED_OPTIONS: [&str; 4] = [
    "server.address",
    "server.port",
    "server.headless",
    "global.developmentMode",
];

/// Configuration for one desktop launch
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Path to the Streamlit script to run
    pub script: PathBuf,

    /// Window title
    pub title: String,

    /// Window width in logical pixels
    pub width: u32,

    /// Window height in logical pixels
    pub height: u32,

    /// Fixed server port; a free port is discovered when unset
    pub port: Option<u16>,

    /// Extra Streamlit options, passed through as `--key=value`
    pub options: Vec<(String, String)>,
}

impl LaunchConfig {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            title: DEFAULT_TITLE.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            port: None,
            options: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((key.into(), value.into()));
        self
    }

    /// Final option list handed to the server process: managed defaults first,
    /// then user options with reserved keys dropped.
    pub fn server_options(&self, port: u16) -> Vec<(String, String)> {
        let mut merged = vec![
            ("server.address".to_string(), "localhost".to_string()),
            ("server.port".to_string(), port.to_string()),
            ("server.headless".to_string(), "true".to_string()),
            ("global.developmentMode".to_string(), "false".to_string()),
        ];

        for (key, value) in &self.options {
            if RESERVED_OPTIONS.contains(&key.as_str()) {
                tracing::warn!(
                    "Option '{}' is managed by the application and will be ignored",
                    key
                );
                continue;
            }
            merged.push((key.clone(), value.clone()));
        }

        merged
    }
}

/// Validate and canonicalize the script path.
///
/// Fails fast (before any process is spawned) if the path does not point to an
/// existing `.py` file.
pub fn validate_script(script: &Path) -> Result<PathBuf> {
    let canonical = script
        .canonicalize()
        .map_err(|_| Error::InvalidScript(format!("no such file: {}", script.display())))?;

    if !canonical.is_file() {
        return Err(Error::InvalidScript(format!(
            "not a file: {}",
            script.display()
        )));
    }

    let is_python = canonical
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("py"))
        .unwrap_or(false);
    if !is_python {
        return Err(Error::InvalidScript(format!(
            "not a Python script: {}",
            script.display()
        )));
    }

    Ok(canonical)
}
