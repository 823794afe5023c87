//! streamlit-desktop — run Streamlit apps as native desktop applications
//!
//! Starts a Streamlit script's web server as a background process, waits for
//! it to accept connections, then opens an embedded-browser window at the
//! server's local URL. When the window closes the server is terminated.
//!
//! # Example
//!
#![cfg_attr(feature = "webview", doc = "```no_run")]
#![cfg_attr(not(feature = "webview"), doc = "```ignore")]
//! use streamlit_desktop::{start_desktop_app, LaunchConfig};
//!
//! let config = LaunchConfig::new("your_app.py")
//!     .title("My Desktop App")
//!     .size(1200, 800)
//!     .option("theme.primaryColor", "#F63366");
//! start_desktop_app(&config).unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod launcher;
pub mod readiness;
pub mod server;
pub mod window;

mod error;

pub use config::LaunchConfig;
pub use error::{Error, Result};
#[cfg(feature = "webview")]
pub use launcher::start_desktop_app;
pub use launcher::run_with_host;
