//! Verification flow: replay stored cookies, redeem the SMS code, extract
//! the session cookie from the protected personal area.

use std::collections::HashMap;
use tracing::{error, warn};

use super::browser::BrowserSession;
use super::provider::ProviderClient;
use super::{EsiaFlows, FlowError, SESSION_COOKIE_NAME};
use crate::session::SessionArtifact;

const PERSONAL_AREA_LINK: &str = "/html/body/section/section[1]/div/section[2]/div/a";

pub(super) async fn run(
    flows: &EsiaFlows,
    login: &str,
    sms_code: &str,
) -> Result<Option<SessionArtifact>, FlowError> {
    let stored = flows.jar.load(login).await;
    if stored.is_empty() {
        warn!("No cookie jar entry for {login}; nothing to replay");
        return Ok(None);
    }

    // Independent of the browser the credential flow used.
    let session = BrowserSession::launch(&flows.bridge, &flows.browser).await?;

    match drive(flows, &session, stored, sms_code).await {
        Ok(artifact) => Ok(artifact),
        Err(err) if err.is_flow_fault() => {
            error!("SMS login failed: {err}");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

async fn drive(
    flows: &EsiaFlows,
    session: &BrowserSession,
    stored: Vec<crate::jar::Cookie>,
    sms_code: &str,
) -> Result<Option<SessionArtifact>, FlowError> {
    session.goto(&flows.provider.landing_url).await?;

    for cookie in stored {
        let name = cookie.name.clone();
        if let Err(err) = session.add_cookie(cookie).await {
            warn!("Failed to add cookie {name}: {err}");
        }
    }
    session.refresh().await?;

    let cookie_map: HashMap<String, String> = session
        .cookies()
        .await?
        .into_iter()
        .map(|cookie| (cookie.name, cookie.value))
        .collect();
    let user_agent = session.user_agent().await?;

    let provider = ProviderClient::new(&flows.provider, &user_agent, &cookie_map)?;
    provider.verify_otp(sms_code).await?;
    provider.skip_secondary_check().await?;

    session.goto(&flows.provider.personal_area_url).await?;
    session.click_xpath(PERSONAL_AREA_LINK).await?;

    let artifact = session
        .cookies()
        .await?
        .into_iter()
        .find(|cookie| cookie.name == SESSION_COOKIE_NAME)
        .map(|cookie| SessionArtifact::new(cookie.name, cookie.value));

    if artifact.is_none() {
        warn!("Session cookie not found");
    }
    Ok(artifact)
}
