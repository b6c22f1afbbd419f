use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{Entity, Kind, Store, StoreError};

/// Minimum length (exclusive) for usernames and passwords at registration.
const MIN_CREDENTIAL_LEN: usize = 2;

/// A registered account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub username: String,
    pub password: String,
    pub note: String,
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Look up a stored user by exact username.
    pub fn find_by_username(store: &Store, username: &str) -> Result<Option<User>, StoreError> {
        store.find_one("username", &Value::from(username))
    }

    /// True iff a stored user has this username and exactly this password.
    pub fn validate_login(&self, store: &Store) -> Result<bool, StoreError> {
        Ok(Self::find_by_username(store, &self.username)?
            .is_some_and(|stored| stored.password == self.password))
    }

    /// True iff both credentials are longer than two characters and the
    /// username (case-sensitive) is not taken yet.
    pub fn validate_register(&self, store: &Store) -> Result<bool, StoreError> {
        // Length is counted in characters, not bytes.
        let valid_form = self.username.chars().count() > MIN_CREDENTIAL_LEN
            && self.password.chars().count() > MIN_CREDENTIAL_LEN;
        if !valid_form {
            return Ok(false);
        }
        Ok(Self::find_by_username(store, &self.username)?.is_none())
    }
}

impl Entity for User {
    const KIND: Kind = Kind::User;

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }
}
