//! Window host boundary
//!
//! The orchestration hands the host a single URL plus window attributes and
//! gets exactly one thing back: the call returns when the window is closed.
//! The default host embeds a wry webview in a tao window; the trait keeps the
//! launch sequence testable without a display server.

use crate::Result;

/// Native window attributes
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

/// Renders a URL in a native window
pub trait WindowHost {
    /// Display `url` and block until the window is closed.
    fn show(&mut self, url: &str, window: &WindowConfig) -> Result<()>;
}

#[cfg(feature = "webview")]
pub use self::webview::WebviewHost;

#[cfg(feature = "webview")]
mod webview {
    use tao::dpi::LogicalSize;
    use tao::event::{Event, WindowEvent};
    use tao::event_loop::{ControlFlow, EventLoop};
    use tao::platform::run_return::EventLoopExtRunReturn;
    use tao::window::WindowBuilder;
    use wry::WebViewBuilder;

    use super::{WindowConfig, WindowHost};
    use crate::{Error, Result};

    /// Embedded-browser window backed by wry + tao
    pub struct WebviewHost;

    impl WindowHost for WebviewHost {
        fn show(&mut self, url: &str, window: &WindowConfig) -> Result<()> {
            tracing::info!("Opening window \"{}\" at {}", window.title, url);

            // Must run on the main thread on every platform tao supports.
            let mut event_loop = EventLoop::new();
            let native = WindowBuilder::new()
                .with_title(&window.title)
                .with_inner_size(LogicalSize::new(
                    f64::from(window.width),
                    f64::from(window.height),
                ))
                .build(&event_loop)
                .map_err(|e| Error::Window(e.to_string()))?;

            let builder = WebViewBuilder::new().with_url(url);

            #[cfg(any(
                target_os = "windows",
                target_os = "macos",
                target_os = "ios",
                target_os = "android"
            ))]
            let _webview = builder
                .build(&native)
                .map_err(|e| Error::Window(e.to_string()))?;

            #[cfg(not(any(
                target_os = "windows",
                target_os = "macos",
                target_os = "ios",
                target_os = "android"
            )))]
            let _webview = {
                use tao::platform::unix::WindowExtUnix;
                use wry::WebViewBuilderExtUnix;

                let vbox = native
                    .default_vbox()
                    .ok_or_else(|| Error::Window("window has no gtk container".to_string()))?;
                builder
                    .build_gtk(vbox)
                    .map_err(|e| Error::Window(e.to_string()))?
            };

            // run_return instead of run so the caller regains control and can
            // tear down the server process after the window closes.
            event_loop.run_return(|event, _, control_flow| {
                *control_flow = ControlFlow::Wait;
                if let Event::WindowEvent {
                    event: WindowEvent::CloseRequested,
                    ..
                } = event
                {
                    tracing::debug!("Window close requested");
                    *control_flow = ControlFlow::Exit;
                }
            });

            Ok(())
        }
    }
}
