//! Interactive terminal client for direct messages.
//!
//! ## Platform bootstrap
//!
//! `talktome` picks its messaging backend at startup:
//!
//! - `TALKTOME_PLATFORM=mock` (the default) runs against the deterministic
//!   in-memory platform with demo data
//!
//! ## Session persistence
//!
//! A successful login is captured to `.talktome/session.json` under the
//! directory named by `TALKTOME_SESSION_DIR` (default: the current working
//! directory), with the client version entry stripped. Later starts restore
//! that state and skip the credential prompts; a restore that fails is
//! reported, never silently retried with credentials.
//!
//! ## Diagnostics
//!
//! Logs go to stderr at `WARN`; set `TALKTOME_DEBUG=1` for `DEBUG`. The
//! interactive transcript itself stays on stdout.

pub mod auth;
pub mod banner;
pub mod commands;
pub mod error;
pub mod navigator;
pub mod platforms;
