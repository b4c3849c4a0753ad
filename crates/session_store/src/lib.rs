mod error;
mod paths;
mod store;

pub use error::SessionStoreError;
pub use paths::{session_file, session_root, SESSION_DIR, SESSION_FILE};
pub use store::SessionStore;
