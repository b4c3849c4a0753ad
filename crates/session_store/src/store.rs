use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use platform_client::Session;

use crate::error::SessionStoreError;

/// File-backed store for one serialized platform session.
///
/// The store is a cheap path handle; cloning it shares no state beyond the
/// path, so a clone can be moved into the platform capture hook.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persists the session, replacing whatever was stored before.
    ///
    /// The client version entry is dropped before writing: a restored session
    /// must adopt the version of the library restoring it. The write goes
    /// through a temp file in the same directory and lands with a rename.
    pub fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        let stripped = session.clone().without_client_version();
        let bytes = serde_json::to_vec_pretty(&stripped)
            .map_err(|source| SessionStoreError::json_serialize(&self.path, source))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| {
                SessionStoreError::io("creating session directory", parent, source)
            })?;
        }

        let tmp_path = self.path.with_extension("tmp");
        let mut file = File::create(&tmp_path).map_err(|source| {
            SessionStoreError::io("creating session temp file", &tmp_path, source)
        })?;
        file.write_all(&bytes).map_err(|source| {
            SessionStoreError::io("writing session temp file", &tmp_path, source)
        })?;
        file.sync_all().map_err(|source| {
            SessionStoreError::io("syncing session temp file", &tmp_path, source)
        })?;
        drop(file);

        fs::rename(&tmp_path, &self.path)
            .map_err(|source| SessionStoreError::io("replacing session file", &self.path, source))
    }

    /// Loads the persisted session.
    ///
    /// An absent or empty file is not an error; both produce the
    /// empty-session sentinel.
    pub fn load(&self) -> Result<Session, SessionStoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(source)
                if matches!(source.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) =>
            {
                return Ok(Session::new());
            }
            Err(source) => {
                return Err(SessionStoreError::io(
                    "reading session file",
                    &self.path,
                    source,
                ));
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Session::new());
        }

        serde_json::from_slice(&bytes)
            .map_err(|source| SessionStoreError::json_parse(&self.path, source))
    }

    /// Whether a non-empty session is persisted at this store's path.
    pub fn exists(&self) -> Result<bool, SessionStoreError> {
        Ok(!self.load()?.is_empty())
    }
}
