//! Sign-in/sign-up against the account service and session persistence.
//!
//! The account service hands out an opaque session token; everything after
//! login only needs the `user_id` it vouches for. Sessions are kept in the
//! OS keyring so restarting the client does not require another sign-in.

use std::fmt;

use keyring::Entry;
use serde::{Deserialize, Serialize};
use tracing::debug;

const KEYRING_SERVICE: &str = "causerie";
const KEYRING_ACCOUNT: &str = "session";

/// Authenticated identity for the rest of the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user_id: String,
    pub email: String,
    pub token: String,
}

#[derive(Debug)]
pub enum AuthError {
    /// Email or password was blank; rejected before any network call.
    MissingCredentials,
    /// The account service refused the request.
    Rejected { message: String },
    /// Transport-level failure reaching the account service.
    Transport(reqwest::Error),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingCredentials => {
                write!(f, "Please enter both an email address and a password")
            }
            AuthError::Rejected { message } => write!(f, "{message}"),
            AuthError::Transport(source) => write!(f, "could not reach the server: {source}"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Transport(source) => Some(source),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(source: reqwest::Error) -> Self {
        AuthError::Transport(source)
    }
}

#[derive(Serialize)]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    token: Option<String>,
}

pub struct AuthManager {
    http: reqwest::Client,
    base_url: String,
    use_keyring: bool,
}

impl AuthManager {
    pub fn new(base_url: &str) -> Self {
        Self::new_with_keyring(base_url, true)
    }

    /// Construct an AuthManager, optionally disabling keyring access (useful
    /// for tests).
    pub fn new_with_keyring(base_url: &str, use_keyring: bool) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            use_keyring,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Exchange credentials for a session. Blank credentials are rejected
    /// locally without a network call.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        validate_credentials(email, password)?;
        let response = self
            .http
            .post(self.endpoint("api/login"))
            .json(&CredentialsRequest { email, password })
            .send()
            .await?;
        let http_status = response.status();
        let payload: AuthResponse = response.json().await?;
        if !http_status.is_success() || payload.status != "success" {
            return Err(AuthError::Rejected {
                message: payload
                    .message
                    .unwrap_or_else(|| "Sign-in failed".to_string()),
            });
        }
        debug!("signed in as {:?}", payload.user_id);
        Ok(AuthSession {
            user_id: payload.user_id.unwrap_or_default(),
            email: payload.email.unwrap_or_else(|| email.to_string()),
            token: payload.token.unwrap_or_default(),
        })
    }

    /// Create the account, then sign in with the same credentials.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        validate_credentials(email, password)?;
        let response = self
            .http
            .post(self.endpoint("api/signup"))
            .json(&CredentialsRequest { email, password })
            .send()
            .await?;
        let http_status = response.status();
        let payload: AuthResponse = response.json().await?;
        if !http_status.is_success() || payload.status != "success" {
            return Err(AuthError::Rejected {
                message: payload
                    .message
                    .unwrap_or_else(|| "Sign-up failed".to_string()),
            });
        }
        self.sign_in(email, password).await
    }

    pub fn store_session(&self, session: &AuthSession) -> Result<(), Box<dyn std::error::Error>> {
        if !self.use_keyring {
            return Ok(());
        }
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_ACCOUNT)?;
        entry.set_password(&serde_json::to_string(session)?)?;
        Ok(())
    }

    pub fn load_session(&self) -> Result<Option<AuthSession>, Box<dyn std::error::Error>> {
        if !self.use_keyring {
            return Ok(None);
        }
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_ACCOUNT)?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(Box::new(err)),
        }
    }

    pub fn clear_session(&self) -> Result<(), Box<dyn std::error::Error>> {
        if !self.use_keyring {
            return Ok(());
        }
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_ACCOUNT)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(Box::new(err)),
        }
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() || password.trim().is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_credentials_are_rejected_locally() {
        assert!(matches!(
            validate_credentials("", "secret"),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            validate_credentials("ada@example.com", "   "),
            Err(AuthError::MissingCredentials)
        ));
        assert!(validate_credentials("ada@example.com", "secret").is_ok());
    }

    #[test]
    fn auth_responses_tolerate_missing_fields() {
        let payload: AuthResponse =
            serde_json::from_str(r#"{"status": "error", "message": "bad password"}"#).unwrap();
        assert_eq!(payload.status, "error");
        assert_eq!(payload.message.as_deref(), Some("bad password"));
        assert!(payload.user_id.is_none());
        assert!(payload.token.is_none());
    }

    #[test]
    fn sessions_round_trip_through_json() {
        let session = AuthSession {
            user_id: "u-7".into(),
            email: "ada@example.com".into(),
            token: "opaque".into(),
        };
        let raw = serde_json::to_string(&session).unwrap();
        let restored: AuthSession = serde_json::from_str(&raw).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn keyring_is_skipped_when_disabled() {
        let manager = AuthManager::new_with_keyring("http://localhost:5000", false);
        let session = AuthSession {
            user_id: "u-7".into(),
            email: "ada@example.com".into(),
            token: "opaque".into(),
        };
        manager.store_session(&session).unwrap();
        assert!(manager.load_session().unwrap().is_none());
        manager.clear_session().unwrap();
    }
}
