//! Backend-agnostic contract for one messaging platform account.
//!
//! This crate defines only the shared authentication/session/feed types and
//! the capability trait consumed by the interactive client. It excludes
//! transport details, wire payloads, and any rendering concerns.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which serialized client state carries the client-library
/// version payload.
///
/// Persisted sessions must never include this entry: a restored session
/// adopts the version of the client library doing the restoring, not the one
/// that captured the state.
pub const CLIENT_VERSION_KEY: &str = "constants";

/// Error returned by a capture hook when persisting serialized state fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureError {
    message: String,
}

impl CaptureError {
    /// Creates a new capture error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the underlying error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CaptureError {}

impl From<String> for CaptureError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for CaptureError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Failure raised by a platform capability call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The platform rejected or failed the request; carries the
    /// human-readable message from the response when one was present.
    Api { message: Option<String> },
    /// Serialized session state could not be applied to the client.
    InvalidSessionState(String),
    /// The capture hook failed while persisting freshly serialized state.
    Capture(CaptureError),
}

impl PlatformError {
    /// Constructs an API failure carrying a platform message.
    #[must_use]
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: Some(message.into()),
        }
    }

    /// Returns the human-readable message for this failure, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Api { message } => message.as_deref(),
            Self::InvalidSessionState(reason) => Some(reason),
            Self::Capture(source) => Some(source.message()),
        }
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api { message: Some(message) } => f.write_str(message),
            Self::Api { message: None } => f.write_str("request failed"),
            Self::InvalidSessionState(reason) => write!(f, "invalid session state: {reason}"),
            Self::Capture(source) => write!(f, "session capture failed: {source}"),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Capture(source) => Some(source),
            _ => None,
        }
    }
}

impl From<CaptureError> for PlatformError {
    fn from(source: CaptureError) -> Self {
        Self::Capture(source)
    }
}

/// Login credentials for one attempt; never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Delivery channel for a two-factor verification code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoFactorMethod {
    Totp,
    Sms,
}

impl TwoFactorMethod {
    /// Maps the platform's `totp_two_factor_on` flag to a method.
    #[must_use]
    pub fn from_totp_flag(totp_two_factor_on: bool) -> Self {
        if totp_two_factor_on {
            Self::Totp
        } else {
            Self::Sms
        }
    }

    /// Wire value understood by the platform (`"0"` TOTP, `"1"` SMS).
    #[must_use]
    pub fn wire_code(self) -> &'static str {
        match self {
            Self::Totp => "0",
            Self::Sms => "1",
        }
    }

    /// Human-readable name used to label the verification-code prompt.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Totp => "TOTP",
            Self::Sms => "SMS",
        }
    }
}

/// Outstanding two-factor requirement returned by a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoFactorChallenge {
    pub username: String,
    pub identifier: String,
    pub method: TwoFactorMethod,
}

/// Input for completing a two-factor challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoFactorParams {
    pub username: String,
    pub verification_code: String,
    pub two_factor_identifier: String,
    pub method: TwoFactorMethod,
    pub trust_this_device: bool,
}

impl TwoFactorParams {
    /// Builds the completion request for a challenge.
    ///
    /// The device is always marked trusted, matching the interactive flow.
    #[must_use]
    pub fn for_challenge(
        challenge: &TwoFactorChallenge,
        verification_code: impl Into<String>,
    ) -> Self {
        Self {
            username: challenge.username.clone(),
            verification_code: verification_code.into(),
            two_factor_identifier: challenge.identifier.clone(),
            method: challenge.method,
            trust_this_device: true,
        }
    }
}

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub user_id: String,
}

/// One direct-message conversation as returned by the inbox feed.
///
/// `messages` are most-recent-first, the order the platform returns them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thread {
    pub id: String,
    pub title: String,
    pub last_preview: Option<String>,
    pub messages: Vec<Message>,
}

/// One message inside a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
}

impl Message {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// One entry of the account-followers feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Follower {
    pub username: String,
    pub full_name: String,
}

/// Serialized device+credential state captured from a client.
///
/// The payload is an opaque JSON object owned by the platform client. An
/// empty object is the explicit "no session" sentinel used by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session {
    fields: Map<String, Value>,
}

impl Session {
    /// Creates the empty-session sentinel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Returns whether this is the "no session" sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    /// Returns this session minus the client version entry
    /// ([`CLIENT_VERSION_KEY`]), leaving every other field untouched.
    #[must_use]
    pub fn without_client_version(mut self) -> Self {
        self.fields.remove(CLIENT_VERSION_KEY);
        self
    }
}

/// Successful result of a login or two-factor-login call.
///
/// Rejection travels on the `Result` error channel as [`PlatformError`]; a
/// two-factor requirement is not an error, it is this tagged outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Success(Identity),
    TwoFactorRequired(TwoFactorChallenge),
}

/// Callback invoked with freshly serialized client state after every
/// successful authenticated exchange.
pub type CaptureHook = Box<dyn FnMut(&Session) -> Result<(), CaptureError> + Send>;

/// Mutable-handle interface to one messaging platform account.
///
/// Implementations carry device and session state across calls. The handle
/// is single-owner: the composition root owns it and lends it mutably to the
/// authentication and navigation flows in turn.
pub trait PlatformClient {
    /// Seeds deterministic device state for the given username.
    ///
    /// Called before the first credential login on a fresh client.
    fn generate_device(&mut self, username: &str);

    /// Registers the capture hook.
    ///
    /// A hook failure surfaces as [`PlatformError::Capture`] from the
    /// exchange that triggered it.
    fn set_capture_hook(&mut self, hook: CaptureHook);

    /// Attempts a credential login.
    fn login(&mut self, credentials: &Credentials) -> Result<LoginOutcome, PlatformError>;

    /// Completes a pending two-factor challenge.
    fn two_factor_login(&mut self, params: &TwoFactorParams)
        -> Result<LoginOutcome, PlatformError>;

    /// Ends the authenticated session on the platform side.
    fn logout(&mut self) -> Result<(), PlatformError>;

    /// Serializes current device+credential state, including the client
    /// version entry.
    fn serialize_state(&self) -> Result<Session, PlatformError>;

    /// Applies state captured by an earlier
    /// [`serialize_state`](Self::serialize_state) to this client.
    fn deserialize_state(&mut self, session: &Session) -> Result<(), PlatformError>;

    /// Runs the pre-authentication handshake required before a restore.
    fn pre_auth_handshake(&mut self) -> Result<(), PlatformError>;

    /// Returns the identity this client is currently authenticated as.
    fn current_user(&self) -> Result<Identity, PlatformError>;

    /// Fetches the direct-message inbox feed.
    fn list_inbox_threads(&mut self) -> Result<Vec<Thread>, PlatformError>;

    /// Fetches the follower feed for the given account.
    fn list_followers(&mut self, user_id: &str) -> Result<Vec<Follower>, PlatformError>;
}
