use std::future::Future;

use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::domain::SubscriberEmail;

/// What the external datastore did with an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    Conflict,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("the subscriber store answered with an unexpected status: {0}")]
    UnexpectedStatus(StatusCode),
    #[error("failed to reach the subscriber store")]
    Transport(#[from] reqwest::Error),
}

/// Somewhere new subscribers can be registered.
///
/// Creation, uniqueness and persistence are owned by the implementation;
/// callers only see whether the row was created or already existed.
pub trait SubscriberStore {
    fn insert(
        &self,
        email: &SubscriberEmail,
    ) -> impl Future<Output = Result<InsertOutcome, StoreError>>;
}

/// Inserts subscribers through a PostgREST-style `/rest/v1/subscribers` endpoint.
pub struct RestSubscriberStore {
    http_client: Client,
    base_url: String,
    api_key: SecretString,
}

#[derive(Debug, Serialize)]
pub struct InsertSubscriberRequest<'a> {
    email: &'a str,
}

impl RestSubscriberStore {
    pub fn new(
        base_url: String,
        api_key: SecretString,
        timeout: Option<std::time::Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url,
            api_key,
            http_client: builder.build()?,
        })
    }
}

impl SubscriberStore for RestSubscriberStore {
    #[tracing::instrument(name = "Inserting subscriber into the datastore", skip(self, email))]
    async fn insert(&self, email: &SubscriberEmail) -> Result<InsertOutcome, StoreError> {
        let url = format!("{}/rest/v1/subscribers", self.base_url.trim_end_matches('/'));
        let request = InsertSubscriberRequest {
            email: email.as_ref(),
        };
        let response = self
            .http_client
            .post(url)
            .header("apikey", self.api_key.expose_secret())
            .bearer_auth(self.api_key.expose_secret())
            // ask for the inserted row back
            .header("Prefer", "return=representation")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read the datastore response body");
                String::new()
            }
        };
        tracing::info!(%status, response_body = %body, "Datastore responded");

        match status {
            StatusCode::CREATED => Ok(InsertOutcome::Created),
            StatusCode::CONFLICT => Ok(InsertOutcome::Conflict),
            other => Err(StoreError::UnexpectedStatus(other)),
        }
    }
}
