//! Startup authentication: restore the persisted session, or log in with
//! prompted credentials and start capturing state.

use std::fmt;

use console_prompt::PromptProvider;
use platform_client::{
    CaptureError, Credentials, Identity, LoginOutcome, PlatformClient, PlatformError, Session,
    TwoFactorChallenge, TwoFactorParams,
};
use session_store::SessionStore;
use tracing::debug;

use crate::error::{recoverable, Result};

/// Why an attempt did not produce a logged-in client.
///
/// These are reported to the user and the process exits normally; only
/// local-machine failures travel through [`crate::error::AppError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The platform rejected the credential login.
    Login { message: Option<String> },
    /// The platform rejected the two-factor completion.
    TwoFactor { message: Option<String> },
    /// The platform demanded another challenge after the code was accepted.
    SecondChallenge,
    /// The persisted session could not be restored.
    Restore { message: Option<String> },
}

impl AuthError {
    fn login(error: PlatformError) -> Self {
        Self::Login {
            message: error.message().map(str::to_string),
        }
    }

    fn two_factor(error: PlatformError) -> Self {
        Self::TwoFactor {
            message: error.message().map(str::to_string),
        }
    }

    fn restore(error: PlatformError) -> Self {
        Self::Restore {
            message: error.message().map(str::to_string),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Can't log in.")?;

        let detail = match self {
            Self::Login { message } | Self::TwoFactor { message } | Self::Restore { message } => {
                message.as_deref()
            }
            Self::SecondChallenge => Some("A second two-factor challenge is not supported."),
        };
        if let Some(detail) = detail {
            write!(f, " {detail}")?;
        }
        Ok(())
    }
}

/// Result of the startup authentication flow.
#[derive(Debug)]
pub enum AuthOutcome {
    /// The client is logged in and ready for navigation.
    Authenticated(Identity),
    /// No login; the reason has already been shaped for display.
    Failed(AuthError),
}

/// Drives the startup flow against an injected client, prompter, and store.
pub struct Authenticator<'a> {
    client: &'a mut dyn PlatformClient,
    prompter: &'a mut dyn PromptProvider,
    store: SessionStore,
}

impl<'a> Authenticator<'a> {
    pub fn new(
        client: &'a mut dyn PlatformClient,
        prompter: &'a mut dyn PromptProvider,
        store: SessionStore,
    ) -> Self {
        Self {
            client,
            prompter,
            store,
        }
    }

    /// Restores the persisted session when one exists, otherwise asks for
    /// credentials.
    ///
    /// The capture hook is installed only on the credential path: a restored
    /// client keeps running on the state it was restored from.
    pub fn authenticate(&mut self) -> Result<AuthOutcome> {
        if self.store.exists()? {
            debug!(path = %self.store.path().display(), "restoring persisted session");
            self.restore_session()
        } else {
            debug!("no persisted session, asking for credentials");
            self.login_with_credentials()
        }
    }

    fn restore_session(&mut self) -> Result<AuthOutcome> {
        let session = self.store.load()?;
        match self.try_restore(&session) {
            Ok(identity) => Ok(AuthOutcome::Authenticated(identity)),
            // A stale or rejected session is never retried with credentials.
            Err(error) => Ok(AuthOutcome::Failed(AuthError::restore(recoverable(
                error,
            )?))),
        }
    }

    fn try_restore(&mut self, session: &Session) -> std::result::Result<Identity, PlatformError> {
        self.client.pre_auth_handshake()?;
        self.client.deserialize_state(session)?;
        self.client.current_user()
    }

    fn login_with_credentials(&mut self) -> Result<AuthOutcome> {
        let username = self.prompter.ask_text("Enter your username:")?;
        let password = self.prompter.ask_masked_text("Enter your password:")?;

        self.client.generate_device(&username);
        self.install_capture_hook();

        match self.client.login(&Credentials::new(username, password)) {
            Ok(LoginOutcome::Success(identity)) => Ok(AuthOutcome::Authenticated(identity)),
            Ok(LoginOutcome::TwoFactorRequired(challenge)) => self.answer_two_factor(&challenge),
            Err(error) => Ok(AuthOutcome::Failed(AuthError::login(recoverable(error)?))),
        }
    }

    fn install_capture_hook(&mut self) {
        let store = self.store.clone();
        self.client.set_capture_hook(Box::new(move |session| {
            store
                .save(session)
                .map_err(|error| CaptureError::new(error.to_string()))?;
            debug!(path = %store.path().display(), "captured session state");
            Ok(())
        }));
    }

    fn answer_two_factor(&mut self, challenge: &TwoFactorChallenge) -> Result<AuthOutcome> {
        let question = format!("Enter otp received via {}:", challenge.method.label());
        let code = self.prompter.ask_text(&question)?;
        let params = TwoFactorParams::for_challenge(challenge, code);

        match self.client.two_factor_login(&params) {
            Ok(LoginOutcome::Success(identity)) => Ok(AuthOutcome::Authenticated(identity)),
            Ok(LoginOutcome::TwoFactorRequired(_)) => {
                Ok(AuthOutcome::Failed(AuthError::SecondChallenge))
            }
            Err(error) => Ok(AuthOutcome::Failed(AuthError::two_factor(recoverable(
                error,
            )?))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AuthError;

    #[test]
    fn failures_render_with_the_cant_log_in_prefix() {
        let plain = AuthError::Login { message: None };
        assert_eq!(plain.to_string(), "Can't log in.");

        let detailed = AuthError::Login {
            message: Some("The password you entered is incorrect.".to_string()),
        };
        assert_eq!(
            detailed.to_string(),
            "Can't log in. The password you entered is incorrect."
        );

        assert_eq!(
            AuthError::SecondChallenge.to_string(),
            "Can't log in. A second two-factor challenge is not supported."
        );
    }
}
