//! Causerie is a terminal client for a personalized chat assistant service.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns runtime state: the conversation history with its
//!   active-conversation pointer, the profile draft/commit workflow, the
//!   questionnaire answer set, and on-disk configuration.
//! - [`api`] defines the JSON payloads and the HTTP client used to talk to
//!   the backend collaborators (query, profile, and answer endpoints).
//! - [`auth`] signs the user in against the account service and keeps the
//!   resulting session in the OS keyring.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop that drives the chat and profile screens.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into [`ui`] for
//! interactive sessions.

pub mod api;
pub mod auth;
pub mod cli;
pub mod core;
pub mod logging;
pub mod ui;
