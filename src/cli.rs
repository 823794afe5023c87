//! Command-line interface
//!
//! Running the binary with no arguments launches the bundled demo script;
//! `run <script>` launches an arbitrary Streamlit script.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{self, LaunchConfig};
use crate::Result;

/// Demo application embedded in the binary
const DEMO_SCRIPT: &str = include_str!("../demos/example.py");

#[derive(Debug, Parser)]
#[command(
    name = "streamlit-desktop",
    version,
    about = "Run Streamlit apps as native desktop applications"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch a Streamlit script in a desktop window
    Run {
        /// Path to the Streamlit script
        script: PathBuf,

        /// Window title
        #[arg(long, default_value = config::DEFAULT_TITLE)]
        title: String,

        /// Window width in pixels
        #[arg(long, default_value_t = config::DEFAULT_WIDTH)]
        width: u32,

        /// Window height in pixels
        #[arg(long, default_value_t = config::DEFAULT_HEIGHT)]
        height: u32,

        /// Fixed server port (a free port is picked by default)
        #[arg(long)]
        port: Option<u16>,

        /// Extra Streamlit option, repeatable: -O theme.base=dark
        #[arg(
            short = 'O',
            long = "option",
            value_name = "KEY=VALUE",
            value_parser = parse_option
        )]
        options: Vec<(String, String)>,
    },
}

/// Parse a `KEY=VALUE` pass-through option
fn parse_option(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

/// Execute the parsed command line
#[cfg(feature = "webview")]
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Command::Run {
            script,
            title,
            width,
            height,
            port,
            options,
        }) => {
            let mut config = LaunchConfig::new(script).title(title).size(width, height);
            if let Some(port) = port {
                config = config.port(port);
            }
            for (key, value) in options {
                config = config.option(key, value);
            }
            crate::launcher::start_desktop_app(&config)
        }
        None => run_demo(),
    }
}

/// Launch the embedded demo script with default window settings
#[cfg(feature = "webview")]
fn run_demo() -> Result<()> {
    // Materialize the embedded script; the temp file lives until the window
    // closes.
    let mut file = tempfile::Builder::new()
        .prefix("streamlit-desktop-demo-")
        .suffix(".py")
        .tempfile()?;
    file.write_all(DEMO_SCRIPT.as_bytes())?;
    file.flush()?;

    let config = LaunchConfig::new(file.path());
    crate::launcher::start_desktop_app(&config)
}
