use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, ToSchema)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Runtime in minutes.
    pub duration: i32,
    pub artists: String,
    pub genres: String,
    /// Blob-store key under the `videos/` prefix.
    pub url: String,
    /// Incremented once per successful fetch-by-id, never decremented.
    pub total_watched: i32,
    #[serde(with = "time::serde::iso8601")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::iso8601")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: OffsetDateTime,
}
