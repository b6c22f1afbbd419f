//! Cookie sessions.
//!
//! A [`SessionStore`] maps opaque tokens to usernames. It lives for as long
//! as the server that owns it: entries are created on login, never expire,
//! and are not persisted.

use dashmap::DashMap;
use rand::Rng;
use tracing::{debug, info};

use crate::model::User;
use crate::server::Request;
use crate::store::{Store, StoreError};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "user";

/// Length of generated session tokens.
pub const TOKEN_LEN: usize = 16;

/// Characters session tokens are drawn from.
pub const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a token of [`TOKEN_LEN`] characters, each drawn uniformly from
/// [`TOKEN_ALPHABET`].
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN)
        .map(|_| char::from(TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())]))
        .collect()
}

/// Process-wide token to username table.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate credentials and open a session.
    ///
    /// Returns the new token on success, `None` when the credentials are
    /// rejected. The caller is responsible for setting the cookie.
    pub fn login(
        &self,
        store: &Store,
        username: &str,
        password: &str,
    ) -> Result<Option<String>, StoreError> {
        let candidate = User::new(username, password);
        if !candidate.validate_login(store)? {
            debug!(username = %username, "Login rejected");
            return Ok(None);
        }
        let token = generate_token();
        self.sessions.insert(token.clone(), candidate.username);
        info!(username = %username, sessions = self.sessions.len(), "Session opened");
        Ok(Some(token))
    }

    pub fn username_for(&self, token: &str) -> Option<String> {
        self.sessions.get(token).map(|entry| entry.value().clone())
    }

    /// Resolve the user behind the request's session cookie.
    ///
    /// Absent when the cookie is missing, the token is unknown, or the
    /// username no longer matches a stored user.
    pub fn current_user(&self, store: &Store, req: &Request) -> Result<Option<User>, StoreError> {
        let Some(token) = req.cookie(SESSION_COOKIE) else {
            return Ok(None);
        };
        let Some(username) = self.username_for(token) else {
            return Ok(None);
        };
        User::find_by_username(store, &username)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[test]
    fn test_token_shape() {
        for _ in 0..100 {
            let token = generate_token();
            assert_eq!(token.len(), TOKEN_LEN);
            assert!(token.bytes().all(|b| TOKEN_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_tokens_cover_alphabet() {
        // 2000 tokens give 32k draws; every symbol should show up.
        let seen: HashSet<u8> = (0..2000).flat_map(|_| generate_token().into_bytes()).collect();
        assert_eq!(seen.len(), TOKEN_ALPHABET.len());
    }

    #[test]
    fn test_login_and_resolve() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path()).unwrap();
        store.save(&mut User::new("gua", "123")).unwrap();
        let sessions = SessionStore::new();

        assert!(sessions.login(&store, "gua", "nope").unwrap().is_none());
        assert!(sessions.is_empty());

        let token = sessions.login(&store, "gua", "123").unwrap().unwrap();
        assert_eq!(sessions.username_for(&token).as_deref(), Some("gua"));

        let raw = format!("GET / HTTP/1.1\r\nCookie: {SESSION_COOKIE}={token}\r\n\r\n");
        let req = Request::parse(raw.as_bytes()).unwrap();
        let user = sessions.current_user(&store, &req).unwrap().unwrap();
        assert_eq!(user.username, "gua");

        let anonymous = Request::parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        assert!(sessions.current_user(&store, &anonymous).unwrap().is_none());

        let forged = Request::parse(b"GET / HTTP/1.1\r\nCookie: user=unknown\r\n\r\n").unwrap();
        assert!(sessions.current_user(&store, &forged).unwrap().is_none());
    }
}
