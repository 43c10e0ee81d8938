//! Credential login flow: drive the provider's login form, capture cookies.

use secrecy::{ExposeSecret, SecretString};
use tracing::{error, info, warn};

use super::browser::BrowserSession;
use super::{EsiaFlows, FlowError};

const LOGIN_INPUT: &str = "#login";
const PASSWORD_INPUT: &str = "#password";

pub(super) async fn run(
    flows: &EsiaFlows,
    login: &str,
    password: SecretString,
) -> Result<bool, FlowError> {
    // One browser per invocation; dropped on every exit path below.
    let session = BrowserSession::launch(&flows.bridge, &flows.browser).await?;

    match drive(flows, &session, login, &password).await {
        Ok(()) => {
            info!("Login successful");
            Ok(true)
        }
        Err(err) if err.is_flow_fault() => {
            error!("Login failed: {err}");
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

async fn drive(
    flows: &EsiaFlows,
    session: &BrowserSession,
    login: &str,
    password: &SecretString,
) -> Result<(), FlowError> {
    session.goto(&flows.provider.auth_url).await?;

    session.fill(LOGIN_INPUT, login.to_string(), false).await?;
    session
        .fill(PASSWORD_INPUT, password.expose_secret().to_string(), true)
        .await?;

    let cookies = session.cookies().await?;
    if !flows.jar.save(&cookies, login).await {
        warn!("Captured cookies could not be persisted for {login}");
    }
    Ok(())
}
