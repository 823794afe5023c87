//! Error types for streamlit-desktop

use std::time::Duration;

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid script path: {0}")]
    InvalidScript(String),

    #[error("Streamlit executable not found. Install it with `pip install streamlit` or set STREAMLIT_DESKTOP_BIN.")]
    StreamlitNotFound,

    #[error("Failed to spawn streamlit server: {0}")]
    Spawn(std::io::Error),

    #[error("Streamlit server exited during startup: {0}")]
    ServerExited(String),

    #[error("Streamlit server did not become ready within {0:?}")]
    StartupTimeout(Duration),

    #[error("Failed to find a free port: {0}")]
    PortDiscovery(std::io::Error),

    #[error("Network error while polling server: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Window error: {0}")]
    Window(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;
