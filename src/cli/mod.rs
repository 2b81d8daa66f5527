//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the
//! appropriate commands.

use std::error::Error;
use std::io::{self, Write};

use clap::{Parser, Subcommand};

use crate::api::ApiClient;
use crate::auth::{AuthManager, AuthSession};
use crate::core::config::Config;
use crate::core::session::SessionContext;
use crate::logging;
use crate::ui::{run_app, StartScreen};

#[derive(Parser)]
#[command(name = "causerie")]
#[command(about = "A terminal client for a personalized chat assistant")]
#[command(long_about = "Causerie is a full-screen terminal client for a personalized chat \
assistant service. It keeps a local history of your conversations, lets you \
resume any of them, and carries a profile plus questionnaire the backend uses \
to personalize its answers.\n\n\
Authentication:\n\
  Use 'causerie login' (or 'causerie signup') to sign in; the session is\n\
  stored in your system keyring and reused on the next start.\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter             Send the message\n\
  Ctrl+N            Start a new conversation\n\
  Ctrl+O            Cycle through past conversations\n\
  Ctrl+P            Open the profile screen\n\
  Tab               Toggle the history sidebar\n\
  Up/Down           Scroll through the transcript\n\
  Ctrl+C            Quit the application")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL (overrides the config file)
    #[arg(short, long, value_name = "URL")]
    pub server: Option<String>,

    /// Append tracing output to the given file
    #[arg(short, long, value_name = "FILE")]
    pub log: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Open the profile editor and questionnaire
    Profile,
    /// Sign in and store the session
    Login,
    /// Create an account, then sign in
    Signup,
    /// Forget the stored session
    Logout,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init(args.log.as_deref())?;

    let config = Config::load()?;
    let server_url = args
        .server
        .as_deref()
        .unwrap_or_else(|| config.server_url())
        .to_string();
    let auth = AuthManager::new(&server_url);

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Login => {
            let session = prompt_sign_in(&auth, &config).await?;
            auth.store_session(&session)?;
            println!("Signed in as {} ({})", session.email, session.user_id);
            Ok(())
        }
        Commands::Signup => {
            let (email, password) = prompt_credentials(config.default_email.as_deref())?;
            let session = auth.sign_up(&email, &password).await?;
            auth.store_session(&session)?;
            println!("Account created; signed in as {}", session.email);
            Ok(())
        }
        Commands::Logout => {
            auth.clear_session()?;
            println!("Session cleared.");
            Ok(())
        }
        Commands::Chat => run_with_session(&auth, &config, &server_url, StartScreen::Chat).await,
        Commands::Profile => {
            run_with_session(&auth, &config, &server_url, StartScreen::Profile).await
        }
    }
}

async fn run_with_session(
    auth: &AuthManager,
    config: &Config,
    server_url: &str,
    start: StartScreen,
) -> Result<(), Box<dyn Error>> {
    let session = match auth.load_session()? {
        Some(session) => session,
        None => {
            let session = prompt_sign_in(auth, config).await?;
            auth.store_session(&session)?;
            session
        }
    };

    let api = ApiClient::new(server_url);
    let mut context = SessionContext::new(api, &session);
    if let Some(session_id) = config.session_id {
        context.session_id = session_id;
    }
    run_app(context, start).await
}

async fn prompt_sign_in(
    auth: &AuthManager,
    config: &Config,
) -> Result<AuthSession, Box<dyn Error>> {
    let (email, password) = prompt_credentials(config.default_email.as_deref())?;
    Ok(auth.sign_in(&email, &password).await?)
}

fn prompt_credentials(default_email: Option<&str>) -> Result<(String, String), Box<dyn Error>> {
    let email = match default_email {
        Some(known) => {
            let entered = prompt_line(&format!("Email [{known}]: "))?;
            if entered.is_empty() {
                known.to_string()
            } else {
                entered
            }
        }
        None => prompt_line("Email: ")?,
    };
    let password = prompt_line("Password: ")?;
    Ok((email, password))
}

fn prompt_line(prompt: &str) -> Result<String, Box<dyn Error>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
