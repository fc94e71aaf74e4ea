//! Creation model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Content kind enum. Closed set: rendering matches on it exhaustively,
/// so a new kind is a compile error until every render site handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "creation_kind", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum CreationKind {
    Article,
    BlogTitle,
    Image,
}

impl CreationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreationKind::Article => "article",
            CreationKind::BlogTitle => "blog-title",
            CreationKind::Image => "image",
        }
    }
}

/// A generated creation. `content` holds the markdown body for text kinds
/// and the public media URL for images; it is immutable once written.
/// `likes` is the only field mutated after insert.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Creation {
    pub id: Uuid,
    pub user_id: String,
    pub prompt: String,
    pub content: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: CreationKind,
    pub publish: bool,
    pub likes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new creation
#[derive(Debug, Clone)]
pub struct NewCreation {
    pub user_id: String,
    pub prompt: String,
    pub content: String,
    pub kind: CreationKind,
    pub publish: bool,
}
