//! Domain DTOs for the lost-found API.
//!
//! # Design
//! Wire records (`LostFound`, `User`) mirror the server's JSON and are
//! defined independently from the mock-server crate; integration tests catch
//! schema drift. `LostFoundItem` is the client-side view of a record, with
//! the integer completion flag already decoded.

use serde::{Deserialize, Serialize};

/// Canonical status for a posting about something that was lost.
pub const STATUS_LOST: &str = "lost";
/// Canonical status for a posting about something that was found.
pub const STATUS_FOUND: &str = "found";

/// A lost-found record as the server returns it.
///
/// `is_completed` is an integer on the wire; only `1` means completed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LostFound {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub status: String,
    pub is_completed: i32,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl LostFound {
    pub fn completed(&self) -> bool {
        self.is_completed == 1
    }

    pub fn to_item(&self) -> LostFoundItem {
        LostFoundItem::from(self)
    }
}

/// A lost-found posting as the client works with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LostFoundItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub is_completed: bool,
    pub cover: Option<String>,
}

impl From<&LostFound> for LostFoundItem {
    fn from(record: &LostFound) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            description: record.description.clone(),
            status: record.status.clone(),
            is_completed: record.completed(),
            cover: record.cover.clone(),
        }
    }
}

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Standard response wrapper: every endpoint answers with a status flag,
/// a message, and an optional payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedData {
    pub lost_found_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LostFoundData {
    #[serde(alias = "lostfound")]
    pub lost_found: LostFound,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LostFoundsData {
    #[serde(alias = "lostfounds")]
    pub lost_founds: Vec<LostFound>,
}

/// Form fields for `auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Form fields for `auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request payload for creating a posting. The server defaults a missing
/// status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateLostFound {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Request payload for updating a posting. Title and description are always
/// sent; status and completion travel as query parameters and are only sent
/// when present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateLostFound {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_completed: Option<bool>,
}

impl UpdateLostFound {
    /// Update that keeps the item's text fields and sets a new completion.
    pub fn completion(item: &LostFoundItem, completed: bool) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
            status: Some(item.status.clone()),
            is_completed: Some(completed),
        }
    }
}

/// Query filters for listing postings. `None` means "don't filter".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListFilter {
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
}
