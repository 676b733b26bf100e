use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::errors::AppError;

/// An append-only per-meeting annotation.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StickyNote {
    pub sticky_note_id: i64,
    pub meeting_id: i64,
    pub message: String,
    pub created_by: String,
    pub created_at: Option<String>,
    pub color: String,
}

/// Note payload; author, timestamp, and color are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStickyNote {
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "createdBy")]
    pub created_by: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Append a note to a meeting. Returns the new note id.
pub async fn add(pool: &SqlitePool, meeting_id: i64, note: &NewStickyNote) -> Result<i64, AppError> {
    if note.message.trim().is_empty() {
        return Err(AppError::Validation("Note message is required".to_string()));
    }
    if !crate::models::meeting::exists(pool, meeting_id).await? {
        return Err(AppError::NotFound("Meeting"));
    }

    let created_by = note.created_by.as_deref().unwrap_or("Anonymous");
    let created_at = note
        .created_at
        .clone()
        .unwrap_or_else(|| Utc::now().to_rfc3339());
    let color = note.color.as_deref().unwrap_or("yellow");

    let result = sqlx::query(
        "INSERT INTO sticky_notes (meeting_id, message, created_by, created_at, color) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(meeting_id)
    .bind(&note.message)
    .bind(created_by)
    .bind(&created_at)
    .bind(color)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Notes for one meeting, oldest first.
pub async fn for_meeting(pool: &SqlitePool, meeting_id: i64) -> Result<Vec<StickyNote>, AppError> {
    let notes = sqlx::query_as::<_, StickyNote>(
        "SELECT sticky_note_id, meeting_id, message, created_by, created_at, color \
         FROM sticky_notes WHERE meeting_id = ?1 ORDER BY sticky_note_id",
    )
    .bind(meeting_id)
    .fetch_all(pool)
    .await?;
    Ok(notes)
}
