use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{header, Client, StatusCode};

use super::types::{ScheduleInfo, StatusResponse, StoreError};
use crate::config::Config;

/// Shared timeout for every store request. A timed-out call surfaces as
/// `StoreError::Timeout` and leaves whatever state the caller holds
/// untouched.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct StoreClient {
    client: Client,
    base_url: String,
    schedule_id: String,
    user_id: String,
    owner_auth: Option<String>,
}

impl StoreClient {
    pub fn new(config: &Config) -> Result<Self, StoreError> {
        if config.schedule_id.trim().is_empty() || config.user_id.trim().is_empty() {
            return Err(StoreError::MissingIdentifier);
        }

        // Owner capability travels as a Basic credential on blackout writes.
        let owner_auth = config.owner_key.as_ref().map(|key| {
            let credential = format!("{}:{}", config.schedule_id.trim(), key);
            format!("Basic {}", STANDARD.encode(credential))
        });

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            schedule_id: config.schedule_id.trim().to_string(),
            user_id: config.user_id.trim().to_string(),
            owner_auth,
        })
    }

    fn schedule_url(&self, tail: &str) -> String {
        format!(
            "{}/s/{}/{}",
            self.base_url,
            urlencoding::encode(&self.schedule_id),
            tail
        )
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, StoreError> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post<T: serde::de::DeserializeOwned, B: serde::Serialize>(
        &self,
        url: &str,
        body: &B,
        as_owner: bool,
    ) -> Result<T, StoreError> {
        let mut request = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .json(body);
        if as_owner {
            if let Some(auth) = &self.owner_auth {
                request = request.header(header::AUTHORIZATION, auth);
            }
        }
        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::UnknownSchedule);
        }
        if status == StatusCode::FORBIDDEN {
            return Err(StoreError::NameRequired);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected(format!("{} - {}", status, body)));
        }
        response
            .json::<T>()
            .await
            .map_err(|err| StoreError::Malformed(err.to_string()))
    }

    /// Fetch the acting participant's saved slot keys.
    pub async fn fetch_selections(&self) -> Result<Vec<String>, StoreError> {
        let url = format!(
            "{}?user={}",
            self.schedule_url("selections"),
            urlencoding::encode(&self.user_id)
        );
        self.get(&url).await
    }

    /// Persist the participant's selections. A 403 means the store wants a
    /// display name first.
    pub async fn save_selections(&self, keys: &[String]) -> Result<(), StoreError> {
        let url = format!(
            "{}?user={}",
            self.schedule_url("selections"),
            urlencoding::encode(&self.user_id)
        );
        let response: StatusResponse = self.post(&url, &keys, false).await?;
        Self::expect_ok(response)
    }

    pub async fn fetch_info(&self) -> Result<ScheduleInfo, StoreError> {
        self.get(&self.schedule_url("info")).await
    }

    pub async fn fetch_blackouts(&self) -> Result<Vec<String>, StoreError> {
        self.get(&self.schedule_url("blackouts")).await
    }

    /// Persist the owner's blackout set. Requires the owner credential; a
    /// 403 here means the credential was refused, not a missing name.
    pub async fn save_blackouts(&self, keys: &[String]) -> Result<(), StoreError> {
        let url = self.schedule_url("blackouts");
        match self.post::<StatusResponse, _>(&url, &keys, true).await {
            Ok(response) => Self::expect_ok(response),
            Err(StoreError::NameRequired) => {
                Err(StoreError::Rejected("owner credential refused".to_string()))
            }
            Err(err) => Err(err),
        }
    }

    /// Persist the acting participant's display name, the precondition for
    /// participant saves.
    pub async fn set_name(&self, name: &str) -> Result<(), StoreError> {
        let url = format!("{}/set_name", self.base_url);
        let body = serde_json::json!({ "name": name, "user": self.user_id });
        let response: StatusResponse = self.post(&url, &body, false).await?;
        Self::expect_ok(response)
    }

    /// The store answers writes with `{"status": "ok"}`; anything else is a
    /// rejection worth surfacing.
    fn expect_ok(response: StatusResponse) -> Result<(), StoreError> {
        if response.status == "ok" {
            Ok(())
        } else {
            Err(StoreError::Rejected(response.status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            server_url: "https://sched.example.com".to_string(),
            schedule_id: "dzEP5I".to_string(),
            user_id: "mara".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_requires_schedule_and_user() {
        let mut missing_schedule = config();
        missing_schedule.schedule_id.clear();
        assert!(matches!(
            StoreClient::new(&missing_schedule),
            Err(StoreError::MissingIdentifier)
        ));

        let mut missing_user = config();
        missing_user.user_id = "   ".to_string();
        assert!(matches!(
            StoreClient::new(&missing_user),
            Err(StoreError::MissingIdentifier)
        ));
    }

    #[test]
    fn test_schedule_url_encodes_the_id() {
        let mut config = config();
        config.schedule_id = "league night".to_string();
        let client = StoreClient::new(&config).unwrap();
        assert_eq!(
            client.schedule_url("info"),
            "https://sched.example.com/s/league%20night/info"
        );
    }

    #[test]
    fn test_owner_auth_only_with_owner_key() {
        let client = StoreClient::new(&config()).unwrap();
        assert!(client.owner_auth.is_none());

        let mut owned = config();
        owned.owner_key = Some("cQhVUE".to_string());
        let client = StoreClient::new(&owned).unwrap();
        let auth = client.owner_auth.unwrap();
        assert!(auth.starts_with("Basic "));
    }
}
