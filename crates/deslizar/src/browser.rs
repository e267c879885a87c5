//! Browser control via the Chrome DevTools Protocol.
//!
//! Compiled with the `browser` feature, this module provides a real
//! [`crate::session::SliderSession`] backed by chromiumoxide. The core never
//! requires it: unit tests run against [`crate::session::MockSession`].

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
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

#[cfg(feature = "browser")]
mod cdp {
    use super::BrowserConfig;
    use crate::geometry::TrackGeometry;
    use crate::result::{DeslizarError, DeslizarResult};
    use crate::session::{PointerPhase, SliderHandle, SliderSession};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::input::{
        DispatchMouseEventParams, DispatchMouseEventType, MouseButton,
    };
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use serde::Deserialize;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    /// Browser instance with a live CDP connection
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
        inner: Arc<Mutex<CdpBrowser>>,
        #[allow(dead_code)]
        handle: tokio::task::JoinHandle<()>,
    }

    impl Browser {
        /// Launch a new browser instance.
        ///
        /// # Errors
        ///
        /// Returns [`DeslizarError::BrowserLaunch`] if chromium cannot be
        /// started.
        pub async fn launch(config: BrowserConfig) -> DeslizarResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder.build().map_err(|e| DeslizarError::BrowserLaunch {
                message: e.to_string(),
            })?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
                DeslizarError::BrowserLaunch {
                    message: e.to_string(),
                }
            })?;

            // Drain CDP events until the connection drops
            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            Ok(Self {
                config,
                inner: Arc::new(Mutex::new(browser)),
                handle,
            })
        }

        /// Create a new page
        ///
        /// # Errors
        ///
        /// Returns [`DeslizarError::Page`] if the page cannot be created
        pub async fn new_page(&self) -> DeslizarResult<Page> {
            let browser = self.inner.lock().await;
            let cdp_page =
                browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| DeslizarError::Page {
                        message: e.to_string(),
                    })?;

            Ok(Page {
                url: String::from("about:blank"),
                inner: Arc::new(Mutex::new(cdp_page)),
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser
        pub async fn close(self) -> DeslizarResult<()> {
            let mut browser = self.inner.lock().await;
            browser
                .close()
                .await
                .map_err(|e| DeslizarError::BrowserLaunch {
                    message: e.to_string(),
                })?;
            Ok(())
        }
    }

    /// A browser page holding one slider-drive session
    #[derive(Debug)]
    pub struct Page {
        url: String,
        inner: Arc<Mutex<CdpPage>>,
    }

    /// getBoundingClientRect payload
    #[derive(Debug, Deserialize)]
    struct RectDto {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    }

    impl Page {
        /// Navigate to a URL and wait for the load to settle.
        ///
        /// # Errors
        ///
        /// Returns [`DeslizarError::Navigation`] if navigation fails
        pub async fn goto(&mut self, url: &str) -> DeslizarResult<()> {
            let page = self.inner.lock().await;
            page.goto(url)
                .await
                .map_err(|e| DeslizarError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            page.wait_for_navigation()
                .await
                .map_err(|e| DeslizarError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            drop(page);
            self.url = url.to_string();
            Ok(())
        }

        /// Look up a slider control by CSS selector.
        ///
        /// # Errors
        ///
        /// Returns [`DeslizarError::SliderNotFound`] if no element matches
        pub async fn slider(&self, selector: &str) -> DeslizarResult<SliderHandle> {
            let sel = serde_json::to_string(selector)?;
            let exists: bool = self
                .eval(&format!("document.querySelector({sel}) !== null"))
                .await?;
            if exists {
                Ok(SliderHandle::new(selector))
            } else {
                Err(DeslizarError::SliderNotFound {
                    selector: selector.to_string(),
                })
            }
        }

        /// Get current URL
        #[must_use]
        pub fn current_url(&self) -> &str {
            &self.url
        }

        async fn eval<T: serde::de::DeserializeOwned>(&self, expr: &str) -> DeslizarResult<T> {
            let page = self.inner.lock().await;
            let result = page.evaluate(expr).await.map_err(|e| DeslizarError::Page {
                message: e.to_string(),
            })?;
            result.into_value().map_err(|e| DeslizarError::Page {
                message: e.to_string(),
            })
        }
    }

    #[async_trait]
    impl SliderSession for Page {
        async fn bounding_box(
            &self,
            handle: &SliderHandle,
        ) -> DeslizarResult<Option<TrackGeometry>> {
            let sel = serde_json::to_string(&handle.selector)?;
            let rect: Option<RectDto> = self
                .eval(&format!(
                    "(() => {{ \
                        const el = document.querySelector({sel}); \
                        if (!el) return null; \
                        const r = el.getBoundingClientRect(); \
                        return {{ x: r.x, y: r.y, width: r.width, height: r.height }}; \
                    }})()"
                ))
                .await?;
            Ok(rect.map(|r| TrackGeometry::new(r.x, r.y, r.width, r.height)))
        }

        async fn read_attribute(
            &self,
            handle: &SliderHandle,
            name: &str,
        ) -> DeslizarResult<Option<String>> {
            let sel = serde_json::to_string(&handle.selector)?;
            let attr = serde_json::to_string(name)?;
            // The live value of a range input is a property, not an
            // attribute; everything else comes from getAttribute.
            self.eval(&format!(
                "(() => {{ \
                    const el = document.querySelector({sel}); \
                    if (!el) return null; \
                    if ({attr} === 'value') return String(el.value); \
                    const v = el.getAttribute({attr}); \
                    return v === null ? null : String(v); \
                }})()"
            ))
            .await
            .map_err(|e| DeslizarError::AttributeUnreadable {
                name: name.to_string(),
                message: e.to_string(),
            })
        }

        async fn dispatch_pointer(
            &self,
            phase: PointerPhase,
            x: f64,
            y: f64,
        ) -> DeslizarResult<()> {
            let kind = match phase {
                PointerPhase::Down => DispatchMouseEventType::MousePressed,
                PointerPhase::Move => DispatchMouseEventType::MouseMoved,
                PointerPhase::Up => DispatchMouseEventType::MouseReleased,
            };
            let mut builder = DispatchMouseEventParams::builder()
                .r#type(kind)
                .x(x)
                .y(y)
                .button(MouseButton::Left);
            // Moves must carry the pressed-buttons mask or the widget will
            // not treat them as part of a drag.
            builder = match phase {
                PointerPhase::Move => builder.buttons(1),
                PointerPhase::Down | PointerPhase::Up => builder.click_count(1),
            };
            let params = builder.build().map_err(|e| DeslizarError::Input {
                message: e.to_string(),
            })?;

            let page = self.inner.lock().await;
            page.execute(params)
                .await
                .map_err(|e| DeslizarError::Input {
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn sleep(&self, duration: Duration) {
            tokio::time::sleep(duration).await;
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::{Browser, Page};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert!(config.sandbox);
        assert_eq!(config.viewport_width, 1280);
    }

    #[test]
    fn test_config_builder() {
        let config = BrowserConfig::default()
            .with_viewport(800, 600)
            .with_headless(false)
            .with_chromium_path("/usr/bin/chromium")
            .with_no_sandbox();
        assert_eq!(config.viewport_width, 800);
        assert_eq!(config.viewport_height, 600);
        assert!(!config.headless);
        assert!(!config.sandbox);
        assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
    }
}
