//! Browser-driven authentication against the ESIA identity provider.
//!
//! Two flows, each owning a dedicated browser instance for its whole run:
//!
//! - the **credential login flow** fills the provider's login form and
//!   persists the captured cookies into the jar, and
//! - the **verification flow** replays those cookies into a fresh browser,
//!   redeems the out-of-band SMS code, and extracts the `sessionid` cookie.
//!
//! Driver calls are blocking; everything goes through the [`bridge::Bridge`]
//! so the async scheduler is never stalled by the browser.

pub mod bridge;
pub mod browser;
mod login;
mod provider;
mod verify;

pub use provider::ProviderConfig;

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

use crate::jar::CookieJar;
use crate::session::SessionArtifact;
use bridge::Bridge;
use browser::BrowserConfig;

/// Name of the cookie that becomes the session artifact.
pub const SESSION_COOKIE_NAME: &str = "sessionid";

/// Failures inside a login or verification flow.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A bounded wait on browser state was not satisfied in time.
    #[error("timed out waiting on the browser")]
    Timeout,
    /// The browser process failed: crashed, unreachable, misconfigured.
    #[error("browser automation failed: {0}")]
    Automation(String),
    /// An outbound HTTP call to the provider failed.
    #[error("provider request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// An expected cookie or element was absent after otherwise-successful steps.
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl FlowError {
    /// Mid-flow faults end a flow with a negative result instead of
    /// propagating. Timeouts, automation failures and missing page state all
    /// qualify; only transport failures escape to the caller.
    pub(crate) fn is_flow_fault(&self) -> bool {
        matches!(self, Self::Timeout | Self::Automation(_) | Self::NotFound(_))
    }

    /// Classify a raw driver error. The driver reports unmet waits with a
    /// dedicated timeout type; everything else is an automation fault.
    pub(crate) fn from_driver(err: anyhow::Error) -> Self {
        if err.downcast_ref::<headless_chrome::util::Timeout>().is_some() {
            Self::Timeout
        } else {
            Self::Automation(format!("{err:#}"))
        }
    }
}

/// The two-step authentication surface the HTTP handlers call into.
#[async_trait]
pub trait AuthFlow: Send + Sync {
    /// Drive the credential form. `Ok(false)` covers both rejected
    /// credentials and a provider too slow to answer; the two are not
    /// distinguishable from the outside.
    async fn login(&self, login: &str, password: SecretString) -> Result<bool, FlowError>;

    /// Replay the jar entry stored for `login` and redeem the out-of-band
    /// code. `Ok(None)` when there is nothing to replay, the code is
    /// rejected, or the session cookie never appears.
    async fn sms_login(
        &self,
        login: &str,
        sms_code: &str,
    ) -> Result<Option<SessionArtifact>, FlowError>;
}

/// Production flows driving a headless Chrome through the bridge.
pub struct EsiaFlows {
    bridge: Bridge,
    browser: BrowserConfig,
    provider: ProviderConfig,
    jar: CookieJar,
}

impl EsiaFlows {
    #[must_use]
    pub fn new(
        bridge: Bridge,
        browser: BrowserConfig,
        provider: ProviderConfig,
        jar: CookieJar,
    ) -> Self {
        Self {
            bridge,
            browser,
            provider,
            jar,
        }
    }
}

#[async_trait]
impl AuthFlow for EsiaFlows {
    async fn login(&self, login: &str, password: SecretString) -> Result<bool, FlowError> {
        login::run(self, login, password).await
    }

    async fn sms_login(
        &self,
        login: &str,
        sms_code: &str,
    ) -> Result<Option<SessionArtifact>, FlowError> {
        verify::run(self, login, sms_code).await
    }
}
