//! HTTP handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use readable_core::{ExtractionResult, ReadableError, fetch_url};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    pub url: Option<String>,
}

/// Article of a fetched page together with the page it was taken from
#[derive(Debug, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub title: String,
    pub article_content: String,
    pub html_content: String,
}

/// Body of `POST /read`
///
/// `html` wins over `url` when both are given; `url` then only serves as the
/// base for link resolution. With `is_blog` false the whole page body is
/// returned instead of the article.
#[derive(Debug, Deserialize)]
pub struct ReadRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default = "default_is_blog")]
    pub is_blog: bool,
    #[serde(default)]
    pub include_html: bool,
}

fn default_is_blog() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadResponse {
    pub title: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

pub async fn healthcheck() -> Json<&'static str> {
    Json("OK")
}

/// `GET /convert?url=`
pub async fn convert(
    State(state): State<Arc<AppState>>, Query(query): Query<ConvertQuery>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let url = query
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing `url` query parameter".to_string()))?;

    let limit = state.request_timeout;
    with_timeout(limit, async move {
        let html = fetch_url(&url, &state.fetch).await?;
        let result = extract(&state, html.clone(), Some(url), true).await?;

        Ok(ConvertResponse { title: result.title, article_content: result.content, html_content: html })
    })
    .await
    .map(Json)
}

/// `POST /read`
pub async fn read(
    State(state): State<Arc<AppState>>, payload: Result<Json<ReadRequest>, JsonRejection>,
) -> Result<Json<ReadResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    if request.html.is_none() && request.url.is_none() {
        return Err(ApiError::BadRequest("either `url` or `html` is required".to_string()));
    }

    let limit = state.request_timeout;
    with_timeout(limit, async move {
        let html = match request.html {
            Some(html) => html,
            None => {
                let url = request.url.as_deref().unwrap_or_default();
                fetch_url(url, &state.fetch).await?
            }
        };

        let result = extract(&state, html, request.url, request.is_blog).await?;
        tracing::info!(title = %result.title, words = result.word_count, is_blog = request.is_blog, "read");

        Ok(ReadResponse {
            html: request.include_html.then_some(result.content),
            title: result.title,
            text: result.text_content,
        })
    })
    .await
    .map(Json)
}

/// Runs extraction off the async workers
async fn extract(
    state: &AppState, html: String, source_url: Option<String>, is_blog: bool,
) -> Result<ExtractionResult, ApiError> {
    let reader = state.reader.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        if is_blog {
            reader.extract_from_html(&html, source_url.as_deref())
        } else {
            reader.extract_page(&html, source_url.as_deref())
        }
    })
    .await
    .map_err(|e| ApiError::Internal(format!("extraction task failed: {}", e)))?;

    Ok(outcome?)
}

async fn with_timeout<T>(
    limit: Duration, work: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    match tokio::time::timeout(limit, work).await {
        Ok(outcome) => outcome,
        Err(_) => Err(ReadableError::Timeout { timeout: limit.as_secs() }.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_with_timeout_elapses() {
        let outcome: Result<(), ApiError> = with_timeout(Duration::from_millis(10), std::future::pending()).await;

        let err = outcome.unwrap_err();
        assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let outcome = with_timeout(Duration::from_secs(1), async { Ok::<_, ApiError>(7) }).await;
        assert_eq!(outcome.unwrap(), 7);
    }

    #[test]
    fn test_read_request_defaults() {
        let request: ReadRequest = serde_json::from_str(r#"{"html": "<p>x</p>"}"#).unwrap();

        assert!(request.is_blog);
        assert!(!request.include_html);
        assert!(request.url.is_none());
    }
}
