use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{Entity, Kind, Store, StoreError};

/// A todo item. `user_id` points at the owning [`User`](super::User) but the
/// store does not enforce it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Todo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub user_id: u64,
    pub title: String,
}

impl Todo {
    pub fn new(user_id: u64, title: impl Into<String>) -> Self {
        Self {
            id: None,
            user_id,
            title: title.into(),
        }
    }

    /// All todos owned by `user_id`, in file order.
    pub fn for_user(store: &Store, user_id: u64) -> Result<Vec<Todo>, StoreError> {
        store.find_by("user_id", &Value::from(user_id))
    }
}

impl Entity for Todo {
    const KIND: Kind = Kind::Todo;

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }
}
