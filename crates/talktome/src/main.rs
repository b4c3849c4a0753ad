use std::io::{self, Write};
use std::path::PathBuf;

use console_prompt::ProcessPrompter;
use session_store::{session_file, SessionStore};
use talktome::auth::{AuthOutcome, Authenticator};
use talktome::banner;
use talktome::error::{AppError, Result};
use talktome::navigator::Navigator;
use talktome::platforms;
use tracing::error;

const SESSION_DIR_ENV_VAR: &str = "TALKTOME_SESSION_DIR";
const DEBUG_ENV_VAR: &str = "TALKTOME_DEBUG";

fn main() {
    init_logging();

    if let Err(error) = run() {
        error!("{error}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut screen = io::stdout();
    banner::print(&mut screen)?;

    let base_dir = match std::env::var_os(SESSION_DIR_ENV_VAR) {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => std::env::current_dir()?,
    };
    let store = SessionStore::new(session_file(&base_dir));

    let mut client = platforms::client_from_env().map_err(AppError::Config)?;
    let mut prompter = ProcessPrompter::new();

    let outcome = Authenticator::new(client.as_mut(), &mut prompter, store).authenticate()?;
    match outcome {
        AuthOutcome::Authenticated(identity) => {
            writeln!(screen, "Logged in as {}", identity.username)?;
            Navigator::new(client.as_mut(), &mut prompter, &mut screen, identity).run()
        }
        AuthOutcome::Failed(failure) => {
            writeln!(screen, "{failure}")?;
            Ok(())
        }
    }
}

fn init_logging() {
    let debug = std::env::var_os(DEBUG_ENV_VAR).is_some_and(|value| !value.is_empty());
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
