use std::path::{Path, PathBuf};

pub const SESSION_DIR: &str = ".talktome";
pub const SESSION_FILE: &str = "session.json";

#[must_use]
pub fn session_root(base: &Path) -> PathBuf {
    base.join(SESSION_DIR)
}

#[must_use]
pub fn session_file(base: &Path) -> PathBuf {
    session_root(base).join(SESSION_FILE)
}
