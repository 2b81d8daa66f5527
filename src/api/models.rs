use serde::{Deserialize, Serialize};

use crate::core::constants::NO_RESPONSE_PLACEHOLDER;

/// Body for the query endpoint; one request per submitted chat message.
#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub user_id: &'a str,
    pub session_id: i64,
    pub query: &'a str,
}

/// The backend's answer to a query. `response` is nominally always present;
/// payloads without it fall back to a placeholder at the client layer.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub response: Option<String>,
}

impl QueryResponse {
    /// Reply text with the missing-field fallback applied.
    pub fn into_text(self) -> String {
        self.response
            .unwrap_or_else(|| NO_RESPONSE_PLACEHOLDER.to_string())
    }
}

/// Body shared by the fetch endpoints, which key everything on the user.
#[derive(Debug, Serialize)]
pub struct UserIdRequest<'a> {
    pub user_id: &'a str,
}

/// Profile fetch result. `data` is a single comma-space-delimited record,
/// absent when the account has never saved one.
#[derive(Debug, Deserialize)]
pub struct ProfileFetchResponse {
    pub status: String,
    #[serde(default)]
    pub data: Option<String>,
}

impl ProfileFetchResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Answer fetch result: previously saved questionnaire answers in index
/// order.
#[derive(Debug, Deserialize)]
pub struct AnswerFetchResponse {
    pub status: String,
    #[serde(default)]
    pub data: Vec<AnswerChunk>,
}

impl AnswerFetchResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Deserialize)]
pub struct AnswerChunk {
    pub info_chunk: String,
}

/// Body for one questionnaire answer save; the fan-out issues one of these
/// per slot.
#[derive(Debug, Serialize)]
pub struct SaveAnswerRequest<'a> {
    pub user_id: &'a str,
    pub question_index: usize,
    pub answer: &'a str,
}

/// Minimal acknowledgment shared by the save and auth endpoints.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_responses_tolerate_a_missing_field() {
        let payload: QueryResponse = serde_json::from_str("{}").unwrap();
        assert!(payload.response.is_none());
        assert_eq!(payload.into_text(), "No response received.");

        let payload: QueryResponse = serde_json::from_str(r#"{"response": "hi"}"#).unwrap();
        assert_eq!(payload.into_text(), "hi");
    }

    #[test]
    fn query_requests_use_wire_field_names() {
        let body = QueryRequest {
            user_id: "u-7",
            session_id: 17908,
            query: "hello",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["user_id"], "u-7");
        assert_eq!(json["session_id"], 17908);
        assert_eq!(json["query"], "hello");
    }

    #[test]
    fn profile_fetches_parse_with_and_without_data() {
        let payload: ProfileFetchResponse =
            serde_json::from_str(r#"{"status": "success", "data": "Ada, ada@example.com"}"#)
                .unwrap();
        assert!(payload.is_success());
        assert_eq!(payload.data.as_deref(), Some("Ada, ada@example.com"));

        let payload: ProfileFetchResponse =
            serde_json::from_str(r#"{"status": "error", "message": "no record"}"#).unwrap();
        assert!(!payload.is_success());
        assert!(payload.data.is_none());
    }

    #[test]
    fn answer_fetches_parse_chunk_lists() {
        let payload: AnswerFetchResponse = serde_json::from_str(
            r#"{"status": "success", "data": [{"info_chunk": "a"}, {"info_chunk": "b"}]}"#,
        )
        .unwrap();
        let answers: Vec<_> = payload.data.into_iter().map(|c| c.info_chunk).collect();
        assert_eq!(answers, vec!["a", "b"]);
    }

    #[test]
    fn answer_saves_carry_their_slot_index() {
        let body = SaveAnswerRequest {
            user_id: "u-7",
            question_index: 14,
            answer: "ship it",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["question_index"], 14);
        assert_eq!(json["answer"], "ship it");
    }
}
