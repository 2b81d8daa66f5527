//! HTTP client for the backend collaborators.
//!
//! All endpoints speak JSON over POST. The client never interprets replies
//! beyond the payload shapes in [`models`]; recovery policy (placeholders,
//! defaults, retries) belongs to the callers.

pub mod models;

use std::fmt;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::core::profile::UserProfile;
use models::{
    AnswerFetchResponse, ProfileFetchResponse, QueryRequest, QueryResponse, SaveAnswerRequest,
    StatusResponse, UserIdRequest,
};

/// Failure talking to a backend endpoint.
#[derive(Debug)]
pub enum ApiError {
    /// Transport-level failure: connection refused, timeout, TLS, or an
    /// unreadable response body.
    Transport(reqwest::Error),
    /// The endpoint answered with a non-success HTTP status.
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(source) => write!(f, "request failed: {source}"),
            ApiError::Status { endpoint, status } => {
                write!(f, "{endpoint} answered with status {status}")
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(source) => Some(source),
            ApiError::Status { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(source: reqwest::Error) -> Self {
        ApiError::Transport(source)
    }
}

/// Thin wrapper over [`reqwest::Client`] with the backend base URL applied.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn post_json<B, R>(&self, path: &'static str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.http.post(self.endpoint(path)).json(body).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                endpoint: path,
                status: response.status(),
            });
        }
        Ok(response.json::<R>().await?)
    }

    /// One round-trip to the language-model backend. A success payload with
    /// no `response` field yields the fixed placeholder text instead.
    pub async fn query(
        &self,
        user_id: &str,
        session_id: i64,
        query: &str,
    ) -> Result<String, ApiError> {
        let payload: QueryResponse = self
            .post_json(
                "query-llm",
                &QueryRequest {
                    user_id,
                    session_id,
                    query,
                },
            )
            .await?;
        Ok(payload.into_text())
    }

    /// The stored profile record, if the account has one. A missing record is
    /// not an error: the profile screen falls back to defaults.
    pub async fn fetch_profile(&self, user_id: &str) -> Result<Option<String>, ApiError> {
        let response = self
            .http
            .post(self.endpoint("api/fetch_user_data"))
            .json(&UserIdRequest { user_id })
            .send()
            .await?;
        if !response.status().is_success() {
            debug!("profile fetch answered {}", response.status());
            return Ok(None);
        }
        let payload = response.json::<ProfileFetchResponse>().await?;
        if !payload.is_success() {
            return Ok(None);
        }
        Ok(payload.data.filter(|data| !data.is_empty()))
    }

    /// Previously saved questionnaire answers, in index order. Empty when the
    /// account has never submitted any.
    pub async fn fetch_answers(&self, user_id: &str) -> Result<Vec<String>, ApiError> {
        let response = self
            .http
            .post(self.endpoint("api/fetch_user_answer"))
            .json(&UserIdRequest { user_id })
            .send()
            .await?;
        if !response.status().is_success() {
            debug!("answer fetch answered {}", response.status());
            return Ok(Vec::new());
        }
        let payload = response.json::<AnswerFetchResponse>().await?;
        if !payload.is_success() {
            return Ok(Vec::new());
        }
        Ok(payload.data.into_iter().map(|c| c.info_chunk).collect())
    }

    /// Persist the full profile record. The caller commits its draft only
    /// after this returns Ok.
    pub async fn save_profile(&self, profile: &UserProfile) -> Result<(), ApiError> {
        let _: StatusResponse = self.post_json("api/save_user", profile).await?;
        Ok(())
    }

    /// Persist one questionnaire answer by slot index.
    pub async fn save_answer(
        &self,
        user_id: &str,
        question_index: usize,
        answer: &str,
    ) -> Result<(), ApiError> {
        let _: StatusResponse = self
            .post_json(
                "api/save_answer",
                &SaveAnswerRequest {
                    user_id,
                    question_index,
                    answer,
                },
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_without_double_slashes() {
        let client = ApiClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(
            client.endpoint("/api/save_user"),
            "http://localhost:5000/api/save_user"
        );
        assert_eq!(
            client.endpoint("query-llm"),
            "http://localhost:5000/query-llm"
        );
    }
}
