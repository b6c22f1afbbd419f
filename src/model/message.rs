use serde::{Deserialize, Serialize};

use crate::store::{Entity, Kind};

/// Annotation stamped on every message record.
pub const MESSAGE_EXTRA: &str = "guestbook";

fn default_extra() -> String {
    MESSAGE_EXTRA.to_string()
}

/// A guestbook entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub author: String,
    pub content: String,
    pub extra: String,
}

impl Default for Message {
    fn default() -> Self {
        Self {
            id: None,
            author: String::new(),
            content: String::new(),
            extra: default_extra(),
        }
    }
}

impl Entity for Message {
    const KIND: Kind = Kind::Message;

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }
}
