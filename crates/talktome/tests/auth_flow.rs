mod support;

use std::fs::File;

use platform_client::{
    CaptureHook, Credentials, Follower, Identity, LoginOutcome, PlatformClient, PlatformError,
    Session, Thread, TwoFactorChallenge, TwoFactorMethod, TwoFactorParams, CLIENT_VERSION_KEY,
};
use platform_client_mock::{LoginScript, MockPlatform};
use serde_json::json;
use session_store::{session_file, session_root, SessionStore};
use support::{PromptEvent, ScriptedPrompter};
use talktome::auth::{AuthError, AuthOutcome, Authenticator};
use talktome::error::AppError;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> SessionStore {
    SessionStore::new(session_file(dir.path()))
}

fn authenticated_identity(outcome: AuthOutcome) -> Identity {
    match outcome {
        AuthOutcome::Authenticated(identity) => identity,
        AuthOutcome::Failed(error) => panic!("expected a login, got failure: {error}"),
    }
}

fn failed_auth(outcome: AuthOutcome) -> AuthError {
    match outcome {
        AuthOutcome::Authenticated(identity) => {
            panic!("expected a failure, got login as {}", identity.username)
        }
        AuthOutcome::Failed(error) => error,
    }
}

#[test]
fn fresh_store_asks_for_credentials_and_captures_the_session() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let store = store_in(&dir);
    let mut platform = MockPlatform::default();
    let mut prompter = ScriptedPrompter::with_answers(&["alice", "hunter2"]);

    let outcome = Authenticator::new(&mut platform, &mut prompter, store.clone())
        .authenticate()
        .expect("authentication should run");

    let identity = authenticated_identity(outcome);
    assert_eq!(identity.username, "alice");
    assert_eq!(
        prompter.events,
        vec![
            PromptEvent::Text {
                label: "Enter your username:".to_string()
            },
            PromptEvent::MaskedText {
                label: "Enter your password:".to_string()
            },
        ]
    );

    assert!(store.exists().expect("exists should succeed"));
    let saved = store.load().expect("load should succeed");
    assert!(saved.get(CLIENT_VERSION_KEY).is_none());
}

#[test]
fn sms_challenge_is_answered_with_the_prompted_code() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let mut platform =
        MockPlatform::default().with_login_script(LoginScript::RequireTwoFactor {
            identifier: "abc".to_string(),
            totp_two_factor_on: false,
            accepted_code: "123456".to_string(),
        });
    let mut prompter = ScriptedPrompter::with_answers(&["alice", "hunter2", "123456"]);

    let outcome = Authenticator::new(&mut platform, &mut prompter, store_in(&dir))
        .authenticate()
        .expect("authentication should run");

    assert_eq!(authenticated_identity(outcome).username, "alice");
    assert_eq!(
        prompter.events[2],
        PromptEvent::Text {
            label: "Enter otp received via SMS:".to_string()
        }
    );
}

#[test]
fn totp_challenges_label_the_code_prompt() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let mut platform =
        MockPlatform::default().with_login_script(LoginScript::RequireTwoFactor {
            identifier: "abc".to_string(),
            totp_two_factor_on: true,
            accepted_code: "654321".to_string(),
        });
    let mut prompter = ScriptedPrompter::with_answers(&["alice", "hunter2", "654321"]);

    let outcome = Authenticator::new(&mut platform, &mut prompter, store_in(&dir))
        .authenticate()
        .expect("authentication should run");

    assert_eq!(authenticated_identity(outcome).username, "alice");
    assert_eq!(
        prompter.events[2],
        PromptEvent::Text {
            label: "Enter otp received via TOTP:".to_string()
        }
    );
}

#[test]
fn rejected_credentials_report_cant_log_in() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let store = store_in(&dir);
    let mut platform = MockPlatform::default().with_login_script(LoginScript::RejectWith(
        "The password you entered is incorrect.".to_string(),
    ));
    let mut prompter = ScriptedPrompter::with_answers(&["alice", "wrong"]);

    let outcome = Authenticator::new(&mut platform, &mut prompter, store.clone())
        .authenticate()
        .expect("authentication should run");

    let error = failed_auth(outcome);
    assert_eq!(
        error.to_string(),
        "Can't log in. The password you entered is incorrect."
    );
    assert!(!store.exists().expect("exists should succeed"));
}

#[test]
fn wrong_verification_code_reports_cant_log_in() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let mut platform =
        MockPlatform::default().with_login_script(LoginScript::RequireTwoFactor {
            identifier: "abc".to_string(),
            totp_two_factor_on: false,
            accepted_code: "123456".to_string(),
        });
    let mut prompter = ScriptedPrompter::with_answers(&["alice", "hunter2", "000000"]);

    let outcome = Authenticator::new(&mut platform, &mut prompter, store_in(&dir))
        .authenticate()
        .expect("authentication should run");

    let error = failed_auth(outcome);
    assert!(matches!(error, AuthError::TwoFactor { .. }));
    assert_eq!(
        error.to_string(),
        "Can't log in. The verification code is incorrect."
    );
}

struct SecondChallengeClient;

impl PlatformClient for SecondChallengeClient {
    fn generate_device(&mut self, _username: &str) {}

    fn set_capture_hook(&mut self, _hook: CaptureHook) {}

    fn login(&mut self, credentials: &Credentials) -> Result<LoginOutcome, PlatformError> {
        Ok(LoginOutcome::TwoFactorRequired(TwoFactorChallenge {
            username: credentials.username.clone(),
            identifier: "abc".to_string(),
            method: TwoFactorMethod::Sms,
        }))
    }

    fn two_factor_login(
        &mut self,
        params: &TwoFactorParams,
    ) -> Result<LoginOutcome, PlatformError> {
        Ok(LoginOutcome::TwoFactorRequired(TwoFactorChallenge {
            username: params.username.clone(),
            identifier: "def".to_string(),
            method: TwoFactorMethod::Sms,
        }))
    }

    fn logout(&mut self) -> Result<(), PlatformError> {
        Ok(())
    }

    fn serialize_state(&self) -> Result<Session, PlatformError> {
        Ok(Session::new())
    }

    fn deserialize_state(&mut self, _session: &Session) -> Result<(), PlatformError> {
        Ok(())
    }

    fn pre_auth_handshake(&mut self) -> Result<(), PlatformError> {
        Ok(())
    }

    fn current_user(&self) -> Result<Identity, PlatformError> {
        Err(PlatformError::api("login_required"))
    }

    fn list_inbox_threads(&mut self) -> Result<Vec<Thread>, PlatformError> {
        Ok(Vec::new())
    }

    fn list_followers(&mut self, _user_id: &str) -> Result<Vec<Follower>, PlatformError> {
        Ok(Vec::new())
    }
}

#[test]
fn a_second_challenge_is_not_supported() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let mut platform = SecondChallengeClient;
    let mut prompter = ScriptedPrompter::with_answers(&["alice", "hunter2", "123456"]);

    let outcome = Authenticator::new(&mut platform, &mut prompter, store_in(&dir))
        .authenticate()
        .expect("authentication should run");

    let error = failed_auth(outcome);
    assert_eq!(error, AuthError::SecondChallenge);
    assert_eq!(
        error.to_string(),
        "Can't log in. A second two-factor challenge is not supported."
    );
}

#[test]
fn restore_skips_the_credential_prompts() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let store = store_in(&dir);

    let mut first = MockPlatform::default();
    let mut first_prompter = ScriptedPrompter::with_answers(&["alice", "hunter2"]);
    let outcome = Authenticator::new(&mut first, &mut first_prompter, store.clone())
        .authenticate()
        .expect("first authentication should run");
    authenticated_identity(outcome);

    let mut second = MockPlatform::default();
    let mut second_prompter = ScriptedPrompter::with_answers(&[]);
    let outcome = Authenticator::new(&mut second, &mut second_prompter, store)
        .authenticate()
        .expect("second authentication should run");

    let identity = authenticated_identity(outcome);
    assert_eq!(identity.username, "alice");
    assert!(second_prompter.events.is_empty());
}

#[test]
fn failed_restore_is_not_retried_with_credentials() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let store = store_in(&dir);
    let mut stale = Session::new();
    stale.insert("device", json!("mock-device-alice"));
    store.save(&stale).expect("save should succeed");

    let mut platform = MockPlatform::default();
    let mut prompter = ScriptedPrompter::with_answers(&[]);

    let outcome = Authenticator::new(&mut platform, &mut prompter, store)
        .authenticate()
        .expect("authentication should run");

    let error = failed_auth(outcome);
    assert!(matches!(error, AuthError::Restore { .. }));
    assert!(error.to_string().starts_with("Can't log in."));
    assert!(prompter.events.is_empty());
}

#[test]
fn handshake_failure_fails_the_restore() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let store = store_in(&dir);
    let mut saved = Session::new();
    saved.insert("username", json!("alice"));
    saved.insert("user_id", json!("u-alice"));
    store.save(&saved).expect("save should succeed");

    let mut platform = MockPlatform::default().with_handshake_error("challenge_required");
    let mut prompter = ScriptedPrompter::with_answers(&[]);

    let outcome = Authenticator::new(&mut platform, &mut prompter, store)
        .authenticate()
        .expect("authentication should run");

    let error = failed_auth(outcome);
    assert_eq!(
        error,
        AuthError::Restore {
            message: Some("challenge_required".to_string())
        }
    );
    assert!(prompter.events.is_empty());
}

#[test]
fn capture_failure_ends_authentication() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    // Shadow the session directory with a regular file so the capture
    // hook's save cannot create it.
    File::create(session_root(dir.path())).expect("shadowing file should be created");
    let store = store_in(&dir);

    let mut platform = MockPlatform::default();
    let mut prompter = ScriptedPrompter::with_answers(&["alice", "hunter2"]);

    let error = Authenticator::new(&mut platform, &mut prompter, store)
        .authenticate()
        .expect_err("capture failure must be fatal");

    assert!(matches!(error, AppError::Capture(_)));
}
