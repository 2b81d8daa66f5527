//! Shared constants used across the application

/// Assistant turn shown when the query service answers without a `response`
/// field.
pub const NO_RESPONSE_PLACEHOLDER: &str = "No response received.";

/// Assistant turn shown when the query service cannot be reached at all.
pub const QUERY_ERROR_PLACEHOLDER: &str = "An error occurred while contacting the server.";

/// Characters of the opening user message that seed a conversation title.
pub const TITLE_PREFIX_CHARS: usize = 15;

/// Session identifier sent with every query until the backend hands out
/// per-conversation sessions.
pub const DEFAULT_SESSION_ID: i64 = 17908;

/// Backend base URL used when neither the CLI nor the config file overrides it.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
