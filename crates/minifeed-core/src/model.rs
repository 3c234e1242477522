//! Backend entities as the client sees them, plus the JSON envelopes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A post owned by the backend and mirrored in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WirePost")]
pub struct Post {
    /// Assigned by the backend; never changes afterwards.
    pub id: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Either identifier key may be present, or both; `_id` wins.
#[derive(Deserialize)]
struct WireId {
    #[serde(default, rename = "_id")]
    mongo: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

impl WireId {
    fn resolve(self) -> Result<String, String> {
        self.mongo
            .filter(|id| !id.is_empty())
            .or(self.id.filter(|id| !id.is_empty()))
            .ok_or_else(|| "missing field `_id` or `id`".to_string())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePost {
    #[serde(flatten)]
    id: WireId,
    description: String,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    image_base64: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<WirePost> for Post {
    type Error = String;

    fn try_from(wire: WirePost) -> Result<Self, Self::Error> {
        Ok(Post {
            id: wire.id.resolve()?,
            description: wire.description,
            image_url: wire.image_url,
            image_base64: wire.image_base64,
            created_at: wire.created_at,
        })
    }
}

impl Post {
    /// Where to load the picture from: the hosted URL when present, else the
    /// inline payload.
    pub fn image_source(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .or(self.image_base64.as_deref())
    }

    /// The last six characters of the identifier, shown as `#abc123`.
    pub fn short_id(&self) -> &str {
        let start = self
            .id
            .char_indices()
            .rev()
            .nth(5)
            .map(|(index, _)| index)
            .unwrap_or(0);
        &self.id[start..]
    }

    /// Creation date as `Mon DD, YYYY`.
    pub fn display_date(&self) -> String {
        self.created_at.format("%b %d, %Y").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireUser")]
pub struct User {
    pub id: String,
    pub name: String,
    pub mobile: String,
}

#[derive(Deserialize)]
struct WireUser {
    #[serde(flatten)]
    id: WireId,
    name: String,
    #[serde(default)]
    mobile: String,
}

impl TryFrom<WireUser> for User {
    type Error = String;

    fn try_from(wire: WireUser) -> Result<Self, Self::Error> {
        Ok(User {
            id: wire.id.resolve()?,
            name: wire.name,
            mobile: wire.mobile,
        })
    }
}

/// Result of a successful OTP login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Body of `POST /posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub description: String,
    pub image_base64: String,
}

/// `{ "data": ... }` wrapper around successful responses.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: Option<T>,
}

/// `{ "message": ... }` body of failed responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
