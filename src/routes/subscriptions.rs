use actix_web::{
    HttpResponse, ResponseError,
    error::JsonPayloadError,
    http::{StatusCode, header::ContentType},
    web,
};
use serde_json::json;

use crate::{
    domain::{EmailValidationError, NewSubscriber, SubscriberEmail},
    routes::error_chain_fmt,
    subscriber_store::{InsertOutcome, StoreError, SubscriberStore},
};

#[derive(Debug, serde::Deserialize)]
pub struct SubscribeBody {
    // a missing field behaves like an empty address and fails validation
    #[serde(default)]
    pub email: String,
}

impl TryFrom<SubscribeBody> for NewSubscriber {
    type Error = EmailValidationError;
    fn try_from(value: SubscribeBody) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(value.email)?;
        Ok(NewSubscriber { email })
    }
}

#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(body, store),
    fields(subscriber_email = %body.email)
)]
pub async fn subscribe<S: SubscriberStore + 'static>(
    body: web::Json<SubscribeBody>,
    store: web::Data<S>,
) -> Result<HttpResponse, SubscribeError> {
    let new_subscriber: NewSubscriber = body.into_inner().try_into()?;
    tracing::info!(normalized_email = %new_subscriber.email, "Email passed validation");

    match store.insert(&new_subscriber.email).await? {
        InsertOutcome::Created => Ok(HttpResponse::Created().json(json!({
            "message": "Email added successfully!"
        }))),
        InsertOutcome::Conflict => Err(SubscribeError::AlreadySubscribed),
    }
}

#[tracing::instrument(name = "Removing a subscriber")]
pub async fn unsubscribe() -> Result<HttpResponse, SubscribeError> {
    Err(SubscribeError::NotImplemented)
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("The request body is not valid JSON.")]
    InvalidJson(#[source] JsonPayloadError),
    #[error(transparent)]
    Validation(#[from] EmailValidationError),
    #[error("The email is already subscribed.")]
    AlreadySubscribed,
    #[error("Failed to register the subscriber.")]
    Upstream(#[from] StoreError),
    #[error("Removing subscribers is not implemented.")]
    NotImplemented,
}

impl SubscribeError {
    /// The plain-text body sent back to the client.
    fn client_message(&self) -> &'static str {
        match self {
            SubscribeError::InvalidJson(_) => "Invalid JSON.",
            SubscribeError::Validation(_) => "Server error.",
            SubscribeError::AlreadySubscribed => "Email already subscribed.",
            SubscribeError::Upstream(StoreError::UnexpectedStatus(_)) => "Failed to add email.",
            SubscribeError::Upstream(StoreError::Transport(_)) => "Server error.",
            SubscribeError::NotImplemented => "Not implemented yet",
        }
    }
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            // TODO: answer 400 here once the 500 for invalid addresses is confirmed unintended
            SubscribeError::Validation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SubscribeError::AlreadySubscribed => StatusCode::CONFLICT,
            SubscribeError::Upstream(_) | SubscribeError::NotImplemented => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            SubscribeError::AlreadySubscribed => HttpResponse::build(self.status_code())
                .json(json!({ "error": self.client_message() })),
            _ => HttpResponse::build(self.status_code())
                .content_type(ContentType::plaintext())
                .body(self.client_message()),
        }
    }
}
