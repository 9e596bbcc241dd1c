use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// A row of the books relation.
///
/// The `id` is supplied by the caller; this layer does not enforce uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
}

/// A scalar JSON value accepted for a book field.
///
/// Numbers and booleans are kept in their text form, so `0` is stored as `"0"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    /// Integers above `i64::MAX`, which would otherwise round through `f64`.
    Unsigned(u64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Unsigned(n) => write!(f, "{}", n),
            FieldValue::Float(n) => write!(f, "{}", n),
            FieldValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// The body of a create request. Any field may be absent.
///
/// An absent field and an explicit JSON `null` both deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewBook {
    #[serde(default)]
    pub id: Option<FieldValue>,
    #[serde(default)]
    pub title: Option<FieldValue>,
    #[serde(default)]
    pub author: Option<FieldValue>,
}

impl NewBook {
    /// Checks that all three fields are present and converts them into a `Book`.
    ///
    /// Presence is the only rule: empty strings and zero are accepted.
    pub fn validate(self) -> Result<Book, CoreError> {
        let id = self.id.ok_or(CoreError::MissingField("id"))?;
        let title = self.title.ok_or(CoreError::MissingField("title"))?;
        let author = self.author.ok_or(CoreError::MissingField("author"))?;

        Ok(Book {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
        })
    }
}
