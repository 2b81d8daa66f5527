//! Per-login context shared by the chat and profile screens.
//!
//! This is the seam between the pure state machines in [`crate::core`] and
//! the HTTP client in [`crate::api`]: it owns the recovery policy for each
//! collaborator (in-band placeholders on the query path, defaults on the
//! fetch path, surfaced failures on the save path).

use futures_util::future::join_all;
use tracing::warn;

use crate::api::{ApiClient, ApiError};
use crate::auth::AuthSession;
use crate::core::constants::{DEFAULT_SESSION_ID, QUERY_ERROR_PLACEHOLDER};
use crate::core::conversation::PendingQuery;
use crate::core::profile::{ProfileEditor, UserProfile};
use crate::core::questionnaire::{Questionnaire, ANSWER_COUNT};

#[derive(Clone)]
pub struct SessionContext {
    pub api: ApiClient,
    pub user_id: String,
    pub email: String,
    pub session_id: i64,
}

impl SessionContext {
    pub fn new(api: ApiClient, auth: &AuthSession) -> Self {
        Self {
            api,
            user_id: auth.user_id.clone(),
            email: auth.email.clone(),
            session_id: DEFAULT_SESSION_ID,
        }
    }

    /// Run one query round-trip. Failures come back as the in-band error
    /// placeholder, so the transcript always receives an assistant turn.
    pub async fn send_query(&self, pending: &PendingQuery) -> String {
        match self
            .api
            .query(&self.user_id, self.session_id, pending.text())
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                warn!("query failed: {err}");
                QUERY_ERROR_PLACEHOLDER.to_string()
            }
        }
    }

    /// Build the profile screen state from whatever the backend has stored.
    /// Fetch failures and missing records both fall back to blank defaults.
    pub async fn load_profile(&self) -> (ProfileEditor, Questionnaire) {
        let profile = match self.api.fetch_profile(&self.user_id).await {
            Ok(Some(record)) => UserProfile::from_record(&self.user_id, &self.email, &record),
            Ok(None) => UserProfile::empty(&self.user_id, &self.email),
            Err(err) => {
                warn!("profile fetch failed: {err}");
                UserProfile::empty(&self.user_id, &self.email)
            }
        };

        let mut questionnaire = Questionnaire::new();
        match self.api.fetch_answers(&self.user_id).await {
            Ok(saved) if !saved.is_empty() => questionnaire.load_saved(saved),
            Ok(_) => {}
            Err(err) => warn!("answer fetch failed: {err}"),
        }

        (ProfileEditor::new(profile), questionnaire)
    }

    /// Persist the draft profile. The caller commits its editor only after
    /// this returns Ok; on Err the edit session stays open with the draft
    /// intact so nothing has to be re-entered.
    pub async fn save_profile(&self, draft: &UserProfile) -> Result<(), ApiError> {
        self.api.save_profile(draft).await
    }

    /// Fan out one save per answer slot, concurrently. Every index is
    /// attempted regardless of the others; the report names the slots whose
    /// save did not go through.
    pub async fn submit_all_answers(&self, questionnaire: &Questionnaire) -> SubmitReport {
        let saves: Vec<_> = questionnaire
            .answers()
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, answer)| {
                let api = self.api.clone();
                let user_id = self.user_id.clone();
                async move { (index, api.save_answer(&user_id, index, &answer).await) }
            })
            .collect();

        let mut failed = Vec::new();
        for (index, outcome) in join_all(saves).await {
            if let Err(err) = outcome {
                warn!("answer {index} save failed: {err}");
                failed.push(index);
            }
        }
        SubmitReport { failed }
    }
}

/// Outcome of a questionnaire submission. All slots were attempted; `failed`
/// lists the indices whose save failed, in order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SubmitReport {
    pub failed: Vec<usize>,
}

impl SubmitReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// One-line summary for the status area.
    pub fn status_line(&self) -> String {
        if self.failed.is_empty() {
            "Thanks for answering the questions!".to_string()
        } else {
            format!(
                "{} of {ANSWER_COUNT} answers failed to save; submit again to retry.",
                self.failed.len()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_reports_thank_the_user() {
        let report = SubmitReport::default();
        assert!(report.is_complete());
        assert_eq!(report.status_line(), "Thanks for answering the questions!");
    }

    #[test]
    fn partial_reports_count_the_failures() {
        let report = SubmitReport {
            failed: vec![3, 7, 11],
        };
        assert!(!report.is_complete());
        assert_eq!(
            report.status_line(),
            "3 of 15 answers failed to save; submit again to retry."
        );
    }
}
