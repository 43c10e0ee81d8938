//! Ownership of one automated browser instance per flow.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::protocol::cdp::Network;
use headless_chrome::{Browser, LaunchOptions, Tab};

use super::bridge::Bridge;
use super::FlowError;
use crate::jar::Cookie;

/// Launch parameters for one automated browser instance.
#[derive(Clone, Debug)]
pub struct BrowserConfig {
    /// Chrome/Chromium binary; autodetected when `None`.
    pub chrome_path: Option<PathBuf>,
    /// Upper bound for every wait on page or element state.
    pub wait_timeout: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            wait_timeout: Duration::from_secs(30),
        }
    }
}

/// Owns exactly one browser instance for the duration of a flow.
///
/// Instances are never shared across flows and never reused. Dropping the
/// session kills the underlying browser process, so teardown happens on every
/// exit path, early errors included.
pub struct BrowserSession {
    // Kept alive for the lifetime of the session; its Drop terminates the
    // browser process.
    _browser: Browser,
    tab: Arc<Tab>,
    bridge: Bridge,
}

impl BrowserSession {
    /// Launch a headless, sandboxless, certificate-error-tolerant browser and
    /// open its working tab.
    pub async fn launch(bridge: &Bridge, config: &BrowserConfig) -> Result<Self, FlowError> {
        let cfg = config.clone();
        let handle = bridge.clone();
        bridge
            .run(move || {
                let options = LaunchOptions::default_builder()
                    .headless(true)
                    .sandbox(false)
                    .ignore_certificate_errors(true)
                    .path(cfg.chrome_path.clone())
                    .args(vec![
                        OsStr::new("--disable-dev-shm-usage"),
                        OsStr::new("--log-level=3"),
                    ])
                    .build()
                    .map_err(|err| FlowError::Automation(err.to_string()))?;

                let browser =
                    Browser::new(options).map_err(|err| FlowError::Automation(format!("{err:#}")))?;
                let tab = browser.new_tab().map_err(FlowError::from_driver)?;
                tab.set_default_timeout(cfg.wait_timeout);

                Ok(Self {
                    _browser: browser,
                    tab,
                    bridge: handle,
                })
            })
            .await
    }

    /// Navigate and block until the document finishes loading.
    pub async fn goto(&self, url: &str) -> Result<(), FlowError> {
        let tab = self.tab.clone();
        let url = url.to_string();
        self.bridge
            .run(move || {
                tab.navigate_to(&url).map_err(FlowError::from_driver)?;
                tab.wait_until_navigated().map_err(FlowError::from_driver)?;
                Ok(())
            })
            .await
    }

    /// Wait for the field at `selector` to appear, clear it, and type `text`.
    /// With `submit`, finish with an Enter keystroke and wait out the
    /// resulting navigation.
    pub async fn fill(
        &self,
        selector: &'static str,
        text: String,
        submit: bool,
    ) -> Result<(), FlowError> {
        let tab = self.tab.clone();
        self.bridge
            .run(move || {
                let element = tab
                    .wait_for_element(selector)
                    .map_err(FlowError::from_driver)?;
                element.click().map_err(FlowError::from_driver)?;
                element
                    .call_js_fn("function() { this.value = ''; }", vec![], false)
                    .map_err(FlowError::from_driver)?;
                element.type_into(&text).map_err(FlowError::from_driver)?;
                if submit {
                    tab.press_key("Enter").map_err(FlowError::from_driver)?;
                    tab.wait_until_navigated().map_err(FlowError::from_driver)?;
                }
                Ok(())
            })
            .await
    }

    /// Read every cookie the browser currently holds.
    pub async fn cookies(&self) -> Result<Vec<Cookie>, FlowError> {
        let tab = self.tab.clone();
        self.bridge
            .run(move || {
                let cookies = tab.get_cookies().map_err(FlowError::from_driver)?;
                Ok(cookies.into_iter().map(stored_cookie).collect())
            })
            .await
    }

    /// Inject one stored cookie. Failures are the caller's to log and skip.
    pub async fn add_cookie(&self, cookie: Cookie) -> Result<(), FlowError> {
        let tab = self.tab.clone();
        self.bridge
            .run(move || {
                tab.set_cookies(vec![cookie_param(&cookie)])
                    .map_err(FlowError::from_driver)
            })
            .await
    }

    /// Reload the current page so injected cookies take effect.
    pub async fn refresh(&self) -> Result<(), FlowError> {
        let tab = self.tab.clone();
        self.bridge
            .run(move || {
                tab.reload(false, None).map_err(FlowError::from_driver)?;
                tab.wait_until_navigated().map_err(FlowError::from_driver)?;
                Ok(())
            })
            .await
    }

    /// The browser's own user-agent string, for HTTP calls that must look
    /// like they come from the same client.
    pub async fn user_agent(&self) -> Result<String, FlowError> {
        let tab = self.tab.clone();
        self.bridge
            .run(move || {
                let result = tab
                    .evaluate("navigator.userAgent", false)
                    .map_err(FlowError::from_driver)?;
                result
                    .value
                    .and_then(|value| value.as_str().map(ToString::to_string))
                    .ok_or(FlowError::NotFound("user agent"))
            })
            .await
    }

    /// Wait for the node at `xpath` and click it.
    pub async fn click_xpath(&self, xpath: &'static str) -> Result<(), FlowError> {
        let tab = self.tab.clone();
        self.bridge
            .run(move || {
                let element = tab.wait_for_xpath(xpath).map_err(FlowError::from_driver)?;
                element.click().map_err(FlowError::from_driver)?;
                Ok(())
            })
            .await
    }
}

fn stored_cookie(cookie: Network::Cookie) -> Cookie {
    Cookie {
        name: cookie.name,
        value: cookie.value,
        domain: cookie.domain,
        path: cookie.path,
        expiry: coerce_expiry(cookie.expires),
        secure: cookie.secure,
        http_only: cookie.http_only,
    }
}

// The protocol reports session cookies with a negative expiry.
fn coerce_expiry(expires: f64) -> Option<i64> {
    (expires > 0.0).then_some(expires as i64)
}

fn cookie_param(cookie: &Cookie) -> Network::CookieParam {
    Network::CookieParam {
        name: cookie.name.clone(),
        value: cookie.value.clone(),
        url: None,
        domain: (!cookie.domain.is_empty()).then(|| cookie.domain.clone()),
        path: Some(cookie.path.clone()),
        secure: Some(cookie.secure),
        http_only: Some(cookie.http_only),
        same_site: None,
        // The protocol wants a float; stored entries carry integer seconds.
        expires: cookie.expiry.map(|seconds| seconds as f64),
        priority: None,
        same_party: None,
        source_scheme: None,
        source_port: None,
        partition_key: None,
    }
}
