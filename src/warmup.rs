use reqwest::{Client, StatusCode};

/// Issues a single GET against `url` and reports the status it answered with.
///
/// Any status counts as a successful ping; only transport failures are errors.
#[tracing::instrument(name = "Pinging the backend", skip(client))]
pub async fn ping(client: &Client, url: &str) -> Result<StatusCode, reqwest::Error> {
    let response = client.get(url).send().await?;
    Ok(response.status())
}
