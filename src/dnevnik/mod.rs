//! Data-fetch client for the diary portal.
//!
//! Every call presents the caller's session artifact as a cookie. Expired or
//! rejected sessions surface as upstream non-success statuses, which map to
//! "no data" rather than errors; the callers answer `404` for those.

use chrono::Local;
use reqwest::header::COOKIE;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, warn};

use crate::session::SessionArtifact;

#[derive(Clone, Debug)]
pub struct DnevnikClient {
    base: String,
    client: reqwest::Client,
}

impl DnevnikClient {
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .user_agent(crate::APP_USER_AGENT)
                .timeout(timeout)
                .build()?,
        })
    }

    pub async fn person_data(&self, session: &SessionArtifact) -> Option<Value> {
        self.get("api/ProfileService/GetPersonData", session, &[])
            .await
    }

    pub async fn summary_marks(&self, session: &SessionArtifact) -> Option<Value> {
        self.get(
            "api/MarkService/GetSummaryMarks",
            session,
            &[("date", today())],
        )
        .await
    }

    pub async fn diary(&self, session: &SessionArtifact) -> Option<Value> {
        let url = format!("{}/api/ScheduleService/GetDiary", self.base);
        let form = [
            ("date", today()),
            ("is_diary", "false".to_string()),
        ];
        let response = self
            .client
            .post(url)
            .header(COOKIE, cookie_pair(session))
            .form(&form)
            .send()
            .await;
        read_json(response, "GetDiary").await
    }

    pub async fn week_schedule(&self, session: &SessionArtifact) -> Option<Value> {
        self.get(
            "api/ScheduleService/GetWeekSchedule",
            session,
            &[("date", today())],
        )
        .await
    }

    pub async fn school_info(&self, session: &SessionArtifact) -> Option<Value> {
        self.get("api/SchoolService/getSchoolInfo", session, &[])
            .await
    }

    pub async fn homework_from_range(&self, session: &SessionArtifact) -> Option<Value> {
        self.get("api/HomeworkService/GetHomeworkFromRange", session, &[])
            .await
    }

    pub async fn missed_lessons(&self, session: &SessionArtifact) -> Option<Value> {
        self.get("api/ScheduleService/GetMissedLessons", session, &[])
            .await
    }

    async fn get(
        &self,
        path: &str,
        session: &SessionArtifact,
        query: &[(&str, String)],
    ) -> Option<Value> {
        let url = format!("{}/{path}", self.base);
        let response = self
            .client
            .get(url)
            .header(COOKIE, cookie_pair(session))
            .query(query)
            .send()
            .await;
        read_json(response, path).await
    }
}

async fn read_json(
    response: Result<reqwest::Response, reqwest::Error>,
    what: &str,
) -> Option<Value> {
    let response = match response {
        Ok(response) => response,
        Err(err) => {
            error!("Diary request {what} failed: {err}");
            return None;
        }
    };
    let response = match response.error_for_status() {
        Ok(response) => response,
        Err(err) => {
            warn!("Diary request {what} rejected: {err}");
            return None;
        }
    };
    match response.json().await {
        Ok(value) => Some(value),
        Err(err) => {
            error!("Diary response {what} is not JSON: {err}");
            None
        }
    }
}

fn cookie_pair(session: &SessionArtifact) -> String {
    format!("{}={}", session.name, session.value)
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
