use crate::{
    api,
    auth::{bridge::Bridge, browser::BrowserConfig, EsiaFlows, ProviderConfig},
    cli::actions::Action,
    dnevnik::DnevnikClient,
    jar::{retention::RetentionTimer, CookieJar},
    session::{privileges::Privileges, MemorySessionStore},
};
use anyhow::Result;
use std::{sync::Arc, time::Duration};

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    let Action::Server {
        port,
        cookie_dir,
        cookie_retention,
        browser_timeout,
        browser_workers,
        chrome_path,
        diary_url,
        esia_url,
        admins,
    } = action;

    let retention = RetentionTimer::new();
    let jar = CookieJar::new(
        cookie_dir,
        Duration::from_secs(cookie_retention),
        retention.clone(),
    );

    let browser = BrowserConfig {
        chrome_path,
        wait_timeout: Duration::from_secs(browser_timeout),
    };
    let provider = ProviderConfig::from_bases(&diary_url, &esia_url);
    let flows = EsiaFlows::new(Bridge::new(browser_workers), browser, provider, jar);

    let state = Arc::new(api::AppState {
        flows: Arc::new(flows),
        sessions: Arc::new(MemorySessionStore::default()),
        privileges: Privileges::with_admins(admins),
        dnevnik: DnevnikClient::new(&diary_url, Duration::from_secs(browser_timeout))?,
    });

    api::new(port, state, retention).await
}
