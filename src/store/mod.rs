//! # Store Module
//!
//! A tiny schema-less record store. Every entity kind owns one collection
//! file holding a JSON array of objects; each object carries the kind's
//! fields plus a reserved integer `id`.
//!
//! ## Overview
//!
//! - [`Store`] performs load/find/save/remove against the collection files
//! - [`Kind`] names a collection and derives its file name
//! - [`Entity`] is implemented by typed records (`User`, `Message`, `Todo`)
//!   and converts them to and from raw [`Record`]s
//!
//! Every call goes back to disk: nothing is cached between operations, so a
//! read always observes the previous write from the same process. Each kind
//! has its own lock which is held across the whole read-modify-write cycle,
//! serialising writers to the same file. There is no atomicity across kinds.
//!
//! ## Example
//!
//! ```rust,no_run
//! use kuweb::model::User;
//! use kuweb::store::{Entity, Store};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Store::open("db")?;
//! let mut user = User::new("gua", "123");
//! store.save(&mut user)?;
//! let found: Option<User> = store.get(user.id().unwrap_or_default())?;
//! assert!(found.is_some());
//! # Ok(())
//! # }
//! ```

mod core;
mod error;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use self::core::{SaveOutcome, Store};
pub use error::StoreError;

/// One persisted object: field name to JSON value, including `id` once assigned.
pub type Record = serde_json::Map<String, Value>;

/// Name of the reserved identity field.
pub const ID_FIELD: &str = "id";

/// The record kinds known to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    User,
    Message,
    Todo,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::User, Kind::Message, Kind::Todo];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::User => "user",
            Kind::Message => "message",
            Kind::Todo => "todo",
        }
    }

    /// File name of the collection, relative to the store root.
    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }

    pub fn parse(s: &str) -> Option<Self> {
        Kind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
    }

    fn index(self) -> usize {
        match self {
            Kind::User => 0,
            Kind::Message => 1,
            Kind::Todo => 2,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed record kind backed by a [`Store`] collection.
///
/// Implementors are plain serde structs with `#[serde(default)]` so that
/// missing fields fall back to the kind's defaults.
pub trait Entity: Serialize + DeserializeOwned {
    const KIND: Kind;

    fn id(&self) -> Option<u64>;

    fn set_id(&mut self, id: u64);

    /// Build an unsaved instance from a field map, applying defaults for
    /// missing fields. A non-integer `id` in the input is ignored.
    fn create(mut fields: Record) -> Result<Self, StoreError> {
        if fields.get(ID_FIELD).and_then(Value::as_u64).is_none() {
            fields.remove(ID_FIELD);
        }
        Self::from_record(fields)
    }

    fn from_record(record: Record) -> Result<Self, StoreError> {
        serde_json::from_value(Value::Object(record)).map_err(|source| {
            StoreError::InvalidRecord {
                kind: Self::KIND,
                source,
            }
        })
    }

    fn to_record(&self) -> Result<Record, StoreError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StoreError::InvalidRecord {
                kind: Self::KIND,
                source: serde::ser::Error::custom("entity did not serialize to an object"),
            }),
            Err(source) => Err(StoreError::InvalidRecord {
                kind: Self::KIND,
                source,
            }),
        }
    }
}

/// Read the `id` of a raw record, if it holds a non-negative integer.
pub fn record_id(record: &Record) -> Option<u64> {
    record.get(ID_FIELD).and_then(Value::as_u64)
}

/// Coerce a textual id to an integer the way `parseInt` does: leading
/// whitespace is skipped and the longest run of decimal digits is used.
///
/// ```
/// use kuweb::store::coerce_id;
///
/// assert_eq!(coerce_id("42"), Some(42));
/// assert_eq!(coerce_id(" 7abc"), Some(7));
/// assert_eq!(coerce_id("abc"), None);
/// ```
pub fn coerce_id(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

/// Convert decoded form fields into a record field map of string values.
pub fn fields_from_pairs<'a, I>(pairs: I) -> Record
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

/// Two-space indented JSON rendering of a record, entity or collection, as
/// shown on the register page and by the `dump` command.
pub fn to_pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}
