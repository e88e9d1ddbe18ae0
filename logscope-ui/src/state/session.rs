//! Session token in `localStorage`

use logscope::session::{SessionError, SessionResult, SessionStore, SESSION_KEY};
use web_sys::Storage;

/// Reads and writes the `token` key of the window's local storage
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageSession;

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn unavailable() -> SessionError {
    SessionError::Unavailable("localStorage is not available".to_string())
}

impl SessionStore for LocalStorageSession {
    fn read(&self) -> Option<String> {
        local_storage()?.get_item(SESSION_KEY).ok().flatten()
    }

    fn write(&self, token: &str) -> SessionResult<()> {
        local_storage()
            .ok_or_else(unavailable)?
            .set_item(SESSION_KEY, token)
            .map_err(|e| SessionError::Unavailable(format!("{:?}", e)))
    }

    fn clear(&self) -> SessionResult<()> {
        local_storage()
            .ok_or_else(unavailable)?
            .remove_item(SESSION_KEY)
            .map_err(|e| SessionError::Unavailable(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_login_and_logout_through_local_storage() {
        let session = LocalStorageSession;
        session.clear().unwrap();
        assert!(!session.is_authenticated());

        session.write("header.payload.signature").unwrap();
        assert_eq!(session.token().as_deref(), Some("header.payload.signature"));

        session.clear().unwrap();
        assert!(session.read().is_none());
    }
}
