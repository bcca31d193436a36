//! Chromium control over CDP.
//!
//! [`BrowserConfig`] is always available so the CLI can build one from a
//! [`HarnessConfig`]. The [`ChromiumDriver`] itself needs the `browser`
//! feature and uses chromiumoxide.

use crate::config::{HarnessConfig, ViewportSpec};
use std::path::PathBuf;

/// Script installed before any document: wipes durable storage on the first
/// document of the run only, so the reload checks still see persisted data.
pub const CLEAR_STORAGE_ONCE: &str = "(() => { \
    try { \
        if (!sessionStorage.getItem('__listprobe_cleared')) { \
            localStorage.clear(); \
            sessionStorage.setItem('__listprobe_cleared', '1'); \
        } \
    } catch (e) {} \
})();";

/// Browser launch configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Initial viewport
    pub viewport: ViewportSpec,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<PathBuf>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: ViewportSpec::desktop(),
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the initial viewport
    #[must_use]
    pub fn with_viewport(mut self, viewport: ViewportSpec) -> Self {
        self.viewport = viewport;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

impl From<&HarnessConfig> for BrowserConfig {
    fn from(config: &HarnessConfig) -> Self {
        Self {
            headless: config.headless,
            viewport: config.viewport.clone(),
            chromium_path: config.chromium_path.clone(),
            sandbox: config.sandbox,
        }
    }
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
#[allow(clippy::significant_drop_tightening, clippy::missing_errors_doc)]
mod cdp {
    use super::{BrowserConfig, CLEAR_STORAGE_ONCE};
    use crate::config::ViewportSpec;
    use crate::driver::PageDriver;
    use crate::error::{DriverError, DriverResult};
    use crate::locator::Locator;
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
    use chromiumoxide::cdp::browser_protocol::page::{
        AddScriptToEvaluateOnNewDocumentParams, CaptureScreenshotFormat,
    };
    use chromiumoxide::element::Element;
    use chromiumoxide::page::{Page as CdpPage, ScreenshotParams};
    use futures::StreamExt;
    use serde_json::Value;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::sync::Mutex;

    /// [`PageDriver`] over one Chromium tab
    #[derive(Debug)]
    pub struct ChromiumDriver {
        browser: Arc<Mutex<CdpBrowser>>,
        page: Arc<Mutex<CdpPage>>,
        handle: tokio::task::JoinHandle<()>,
        url: String,
        closed: bool,
        // Removed when the driver is dropped
        _profile: TempDir,
    }

    impl ChromiumDriver {
        /// Launch Chromium with a throwaway profile and open one blank tab
        pub async fn launch(config: &BrowserConfig) -> DriverResult<Self> {
            let profile = tempfile::Builder::new()
                .prefix("listprobe-profile-")
                .tempdir()?;
            let mut builder = CdpConfig::builder()
                .user_data_dir(profile.path())
                .window_size(config.viewport.width, config.viewport.height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|message| DriverError::BrowserLaunch { message })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| DriverError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            // Spawn handler task
            let handle = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| DriverError::BrowserLaunch {
                    message: e.to_string(),
                })?;
            page.execute(AddScriptToEvaluateOnNewDocumentParams::new(CLEAR_STORAGE_ONCE))
                .await
                .map_err(|e| DriverError::BrowserLaunch {
                    message: e.to_string(),
                })?;
            tracing::info!(
                headless = config.headless,
                profile = %profile.path().display(),
                "chromium launched"
            );

            let mut driver = Self {
                browser: Arc::new(Mutex::new(browser)),
                page: Arc::new(Mutex::new(page)),
                handle,
                url: String::from("about:blank"),
                closed: false,
                _profile: profile,
            };
            driver.set_viewport(&config.viewport).await?;
            Ok(driver)
        }

        async fn element(&self, locator: &Locator) -> DriverResult<Element> {
            let page = self.page.lock().await;
            let mut elements = page
                .find_elements(locator.selector())
                .await
                .map_err(|_| DriverError::not_found(locator.selector(), locator.index()))?;
            if locator.index() < elements.len() {
                Ok(elements.swap_remove(locator.index()))
            } else {
                Err(DriverError::not_found(locator.selector(), locator.index()))
            }
        }
    }

    #[async_trait]
    impl PageDriver for ChromiumDriver {
        async fn goto(&mut self, url: &str) -> DriverResult<()> {
            tracing::debug!(url, "goto");
            let page = self.page.lock().await;
            page.goto(url)
                .await
                .map_err(|e| DriverError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            drop(page);
            self.url = url.to_string();
            Ok(())
        }

        async fn reload(&mut self) -> DriverResult<()> {
            tracing::debug!(url = %self.url, "reload");
            let page = self.page.lock().await;
            page.reload().await.map_err(|e| DriverError::Navigation {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
            Ok(())
        }

        async fn click(&mut self, locator: &Locator) -> DriverResult<()> {
            tracing::debug!(%locator, "click");
            let element = self.element(locator).await?;
            element.click().await.map_err(DriverError::input)?;
            Ok(())
        }

        async fn press(&mut self, selector: &str, key: &str) -> DriverResult<()> {
            tracing::debug!(selector, key, "press");
            let element = self.element(&Locator::first(selector)).await?;
            element.focus().await.map_err(DriverError::input)?;
            element.press_key(key).await.map_err(DriverError::input)?;
            Ok(())
        }

        async fn hover(&mut self, locator: &Locator) -> DriverResult<()> {
            tracing::debug!(%locator, "hover");
            let element = self.element(locator).await?;
            element.hover().await.map_err(DriverError::input)?;
            Ok(())
        }

        async fn evaluate(&self, script: &str) -> DriverResult<Value> {
            // Wrapped so undefined and null results still come back as JSON text
            let wrapped = format!("JSON.stringify({{ value: ({script}) }})");
            let page = self.page.lock().await;
            let result = page
                .evaluate(wrapped)
                .await
                .map_err(DriverError::evaluation)?;
            let text: String = result.into_value()?;
            let mut envelope: Value = serde_json::from_str(&text)?;
            Ok(envelope
                .get_mut("value")
                .map(Value::take)
                .unwrap_or(Value::Null))
        }

        async fn set_viewport(&mut self, viewport: &ViewportSpec) -> DriverResult<()> {
            tracing::debug!(%viewport, "set viewport");
            let params = SetDeviceMetricsOverrideParams::builder()
                .width(i64::from(viewport.width))
                .height(i64::from(viewport.height))
                .device_scale_factor(1.0)
                .mobile(false)
                .build()
                .map_err(|message| DriverError::Viewport { message })?;
            let page = self.page.lock().await;
            page.execute(params)
                .await
                .map_err(|e| DriverError::Viewport {
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn screenshot(&self, path: &Path) -> DriverResult<()> {
            let params = ScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .full_page(true)
                .build();
            let page = self.page.lock().await;
            let png = page
                .screenshot(params)
                .await
                .map_err(DriverError::screenshot)?;
            drop(page);
            tokio::fs::write(path, png).await?;
            tracing::debug!(path = %path.display(), "screenshot");
            Ok(())
        }

        async fn close(&mut self) -> DriverResult<()> {
            if self.closed {
                return Ok(());
            }
            self.closed = true;
            let mut browser = self.browser.lock().await;
            let closed = browser.close().await.map_err(|e| DriverError::Close {
                message: e.to_string(),
            });
            if let Err(err) = browser.wait().await {
                tracing::debug!(error = %err, "chromium process already reaped");
            }
            self.handle.abort();
            closed.map(|_| ())
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::ChromiumDriver;
