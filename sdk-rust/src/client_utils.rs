use crate::LanguageModelError;
use reqwest::{header::HeaderMap, Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Create a JSON request, parse the response.
/// Throws error on non OK status code.
pub async fn send_json<T: Serialize, R: DeserializeOwned>(
    client: &Client,
    url: &str,
    data: &T,
    headers: HeaderMap,
) -> Result<R, LanguageModelError> {
    let response = client.post(url).headers(headers).json(data).send().await?;
    parse_json(response).await
}

/// Issue a GET request, parse the response.
/// Throws error on non OK status code.
pub async fn get_json<R: DeserializeOwned>(
    client: &Client,
    url: &str,
    headers: HeaderMap,
) -> Result<R, LanguageModelError> {
    let response = client.get(url).headers(headers).send().await?;
    parse_json(response).await
}

async fn parse_json<R: DeserializeOwned>(response: Response) -> Result<R, LanguageModelError> {
    let status = response.status();
    if status.is_success() {
        Ok(response.json::<R>().await?)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(LanguageModelError::StatusCode(
            status,
            extract_error_message(&body),
        ))
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pull `error.message` out of an `OpenAI`-style error body. Bodies in any
/// other shape are passed through as-is.
pub(crate) fn extract_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ => body.trim().to_string(),
    }
}
