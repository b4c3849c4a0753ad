//! Deterministic in-memory platform used by the interactive client out of
//! the box and by tests.
//!
//! The mock performs no network I/O. Login behavior follows a configurable
//! [`LoginScript`], and the inbox/follower feeds are plain data handed in
//! through builders, so flows exercise the full contract with predictable
//! results.

use platform_client::{
    CaptureHook, Credentials, Follower, Identity, LoginOutcome, Message, PlatformClient,
    PlatformError, Session, Thread, TwoFactorChallenge, TwoFactorMethod, TwoFactorParams,
    CLIENT_VERSION_KEY,
};
use serde_json::{json, Value};

/// Identifier under which the mock platform is registered.
pub const MOCK_PLATFORM_ID: &str = "mock";

/// Client-library release advertised in serialized state.
pub const MOCK_APP_VERSION: &str = "265.0.0.19.301";

/// How the mock answers credential logins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginScript {
    /// Accept any username/password pair.
    AcceptAny,
    /// Reject every attempt with the given platform message.
    RejectWith(String),
    /// Demand a two-factor code before completing the login.
    RequireTwoFactor {
        identifier: String,
        totp_two_factor_on: bool,
        accepted_code: String,
    },
}

/// Scripted [`PlatformClient`] implementation.
pub struct MockPlatform {
    login_script: LoginScript,
    threads: Vec<Thread>,
    followers: Vec<Follower>,
    handshake_error: Option<String>,
    device_username: Option<String>,
    identity: Option<Identity>,
    pending_challenge: Option<TwoFactorChallenge>,
    capture_hook: Option<CaptureHook>,
    inbox_fetches: u64,
}

impl Default for MockPlatform {
    /// A mock that accepts any credentials and serves a small demo account.
    fn default() -> Self {
        Self {
            login_script: LoginScript::AcceptAny,
            threads: demo_threads(),
            followers: demo_followers(),
            handshake_error: None,
            device_username: None,
            identity: None,
            pending_challenge: None,
            capture_hook: None,
            inbox_fetches: 0,
        }
    }
}

impl MockPlatform {
    #[must_use]
    pub fn with_login_script(mut self, script: LoginScript) -> Self {
        self.login_script = script;
        self
    }

    #[must_use]
    pub fn with_threads(mut self, threads: Vec<Thread>) -> Self {
        self.threads = threads;
        self
    }

    #[must_use]
    pub fn with_followers(mut self, followers: Vec<Follower>) -> Self {
        self.followers = followers;
        self
    }

    /// Makes the pre-authentication handshake fail with the given message.
    #[must_use]
    pub fn with_handshake_error(mut self, message: impl Into<String>) -> Self {
        self.handshake_error = Some(message.into());
        self
    }

    /// Number of inbox fetches served so far.
    #[must_use]
    pub fn inbox_fetch_count(&self) -> u64 {
        self.inbox_fetches
    }

    fn authenticated(&self) -> Result<&Identity, PlatformError> {
        self.identity
            .as_ref()
            .ok_or_else(|| PlatformError::api("login_required"))
    }

    fn complete_login(&mut self, username: &str) -> Result<LoginOutcome, PlatformError> {
        let identity = Identity {
            username: username.to_string(),
            user_id: format!("u-{username}"),
        };
        self.identity = Some(identity.clone());
        self.pending_challenge = None;
        self.fire_capture()?;
        Ok(LoginOutcome::Success(identity))
    }

    fn fire_capture(&mut self) -> Result<(), PlatformError> {
        let state = self.serialize_state()?;
        if let Some(hook) = self.capture_hook.as_mut() {
            hook(&state)?;
        }
        Ok(())
    }
}

impl PlatformClient for MockPlatform {
    fn generate_device(&mut self, username: &str) {
        self.device_username = Some(username.to_string());
    }

    fn set_capture_hook(&mut self, hook: CaptureHook) {
        self.capture_hook = Some(hook);
    }

    fn login(&mut self, credentials: &Credentials) -> Result<LoginOutcome, PlatformError> {
        match self.login_script.clone() {
            LoginScript::AcceptAny => self.complete_login(&credentials.username),
            LoginScript::RejectWith(message) => Err(PlatformError::api(message)),
            LoginScript::RequireTwoFactor {
                identifier,
                totp_two_factor_on,
                ..
            } => {
                let challenge = TwoFactorChallenge {
                    username: credentials.username.clone(),
                    identifier,
                    method: TwoFactorMethod::from_totp_flag(totp_two_factor_on),
                };
                self.pending_challenge = Some(challenge.clone());
                Ok(LoginOutcome::TwoFactorRequired(challenge))
            }
        }
    }

    fn two_factor_login(
        &mut self,
        params: &TwoFactorParams,
    ) -> Result<LoginOutcome, PlatformError> {
        let Some(challenge) = self.pending_challenge.clone() else {
            return Err(PlatformError::api("No two-factor challenge is pending."));
        };
        let LoginScript::RequireTwoFactor { accepted_code, .. } = self.login_script.clone()
        else {
            return Err(PlatformError::api("No two-factor challenge is pending."));
        };

        if params.two_factor_identifier != challenge.identifier {
            return Err(PlatformError::api("Two-factor identifier mismatch."));
        }
        if params.verification_code != accepted_code {
            return Err(PlatformError::api("The verification code is incorrect."));
        }

        let username = challenge.username.clone();
        self.complete_login(&username)
    }

    fn logout(&mut self) -> Result<(), PlatformError> {
        self.authenticated()?;
        self.fire_capture()?;
        self.identity = None;
        self.pending_challenge = None;
        Ok(())
    }

    fn serialize_state(&self) -> Result<Session, PlatformError> {
        let mut session = Session::new();
        session.insert(
            CLIENT_VERSION_KEY,
            json!({ "app_version": MOCK_APP_VERSION }),
        );
        if let Some(device) = &self.device_username {
            session.insert("device", json!(format!("mock-device-{device}")));
        }
        if let Some(identity) = &self.identity {
            session.insert("username", json!(identity.username));
            session.insert("user_id", json!(identity.user_id));
        }
        Ok(session)
    }

    fn deserialize_state(&mut self, session: &Session) -> Result<(), PlatformError> {
        if session.is_empty() {
            return Err(PlatformError::InvalidSessionState(
                "session payload is empty".to_string(),
            ));
        }
        let Some(username) = session.get("username").and_then(Value::as_str) else {
            return Err(PlatformError::InvalidSessionState(
                "session payload is missing a username".to_string(),
            ));
        };
        let Some(user_id) = session.get("user_id").and_then(Value::as_str) else {
            return Err(PlatformError::InvalidSessionState(
                "session payload is missing a user id".to_string(),
            ));
        };

        if let Some(device) = session.get("device").and_then(Value::as_str) {
            self.device_username = Some(
                device
                    .strip_prefix("mock-device-")
                    .unwrap_or(device)
                    .to_string(),
            );
        }
        self.identity = Some(Identity {
            username: username.to_string(),
            user_id: user_id.to_string(),
        });
        Ok(())
    }

    fn pre_auth_handshake(&mut self) -> Result<(), PlatformError> {
        match &self.handshake_error {
            Some(message) => Err(PlatformError::api(message.clone())),
            None => Ok(()),
        }
    }

    fn current_user(&self) -> Result<Identity, PlatformError> {
        self.authenticated().cloned()
    }

    fn list_inbox_threads(&mut self) -> Result<Vec<Thread>, PlatformError> {
        self.authenticated()?;
        self.inbox_fetches += 1;
        let threads = self.threads.clone();
        self.fire_capture()?;
        Ok(threads)
    }

    fn list_followers(&mut self, user_id: &str) -> Result<Vec<Follower>, PlatformError> {
        let identity = self.authenticated()?;
        if identity.user_id != user_id {
            return Err(PlatformError::api("User not found."));
        }
        let followers = self.followers.clone();
        self.fire_capture()?;
        Ok(followers)
    }
}

fn demo_threads() -> Vec<Thread> {
    vec![
        Thread {
            id: "t-1".to_string(),
            title: "maya.codes".to_string(),
            last_preview: Some("See you at the demo tomorrow?".to_string()),
            messages: vec![
                Message::new("See you at the demo tomorrow?"),
                Message::new("I pushed the fix for the login screen."),
                Message::new("Hey! Did you get the build running?"),
            ],
        },
        Thread {
            id: "t-2".to_string(),
            title: "Road trip crew".to_string(),
            last_preview: Some("Nina: I call shotgun.".to_string()),
            messages: vec![
                Message::new("I call shotgun."),
                Message::new("Leaving at 7, don't be late."),
                Message::new("Weather looks perfect for Saturday."),
            ],
        },
        Thread {
            id: "t-3".to_string(),
            title: "sam_dev".to_string(),
            last_preview: None,
            messages: vec![Message::new("Sounds good.")],
        },
    ]
}

fn demo_followers() -> Vec<Follower> {
    vec![
        Follower {
            username: "maya.codes".to_string(),
            full_name: "Maya Alvarez".to_string(),
        },
        Follower {
            username: "sam_dev".to_string(),
            full_name: "Sam Porter".to_string(),
        },
        Follower {
            username: "nina.travels".to_string(),
            full_name: "Nina Kowalski".to_string(),
        },
    ]
}
