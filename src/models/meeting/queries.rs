use chrono::Utc;
use sqlx::SqlitePool;

use crate::errors::AppError;

use super::types::{join_attendees, resolve_date_of_meeting, split_attendees, MeetingRow, NewMeeting};

const MEETING_SELECT: &str = "SELECT meeting_id, meeting_name, organizer_email, \
date_of_meeting, attendees, department, company, plant, present_by_date, created \
FROM meetings";

/// Create a meeting. Attendees are normalized to the comma-joined stored
/// form; the presence map is serialized as JSON text.
pub async fn create(pool: &SqlitePool, new: &NewMeeting) -> Result<MeetingRow, AppError> {
    let date_of_meeting = resolve_date_of_meeting(new);
    let attendees = join_attendees(&new.attendees);
    let present_by_date = serde_json::to_string(&new.present_by_date)?;
    let created = Utc::now().timestamp_millis();

    let (meeting_id,): (i64,) = sqlx::query_as(
        "INSERT INTO meetings (meeting_name, organizer_email, date_of_meeting, attendees, \
         department, company, plant, present_by_date, created) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) \
         RETURNING meeting_id",
    )
    .bind(new.meeting_name.trim())
    .bind(new.organizer_email.trim())
    .bind(&date_of_meeting)
    .bind(&attendees)
    .bind(new.department.as_deref())
    .bind(new.company.as_deref())
    .bind(new.plant.as_deref())
    .bind(&present_by_date)
    .bind(created)
    .fetch_one(pool)
    .await?;

    Ok(MeetingRow {
        meeting_id,
        meeting_name: new.meeting_name.trim().to_string(),
        organizer_email: new.organizer_email.trim().to_string(),
        date_of_meeting,
        attendees,
        department: new.department.clone(),
        company: new.company.clone(),
        plant: new.plant.clone(),
        present_by_date: Some(present_by_date),
        created: Some(created),
    })
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<MeetingRow>, AppError> {
    let row = sqlx::query_as::<_, MeetingRow>(&format!("{MEETING_SELECT} WHERE meeting_id = ?1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// All meetings, newest first. Ties on the millisecond timestamp fall back
/// to id order so the listing is stable.
pub async fn find_all(pool: &SqlitePool) -> Result<Vec<MeetingRow>, AppError> {
    let rows = sqlx::query_as::<_, MeetingRow>(&format!(
        "{MEETING_SELECT} ORDER BY created DESC, meeting_id DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Append an attendee if not already present (case-insensitive).
/// Returns the updated attendee list.
pub async fn add_attendee(
    pool: &SqlitePool,
    meeting_id: i64,
    name: &str,
) -> Result<Vec<String>, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let row = find_by_id(pool, meeting_id)
        .await?
        .ok_or(AppError::NotFound("Meeting"))?;

    let mut current = split_attendees(&row.attendees);
    let already_present = current
        .iter()
        .any(|a| a.to_lowercase() == name.to_lowercase());

    if !already_present {
        current.push(name.to_string());
        sqlx::query("UPDATE meetings SET attendees = ?1 WHERE meeting_id = ?2")
            .bind(join_attendees(&current))
            .bind(meeting_id)
            .execute(pool)
            .await?;
    }

    Ok(current)
}

/// Distinct meeting names, for the attendance report picker.
pub async fn names(pool: &SqlitePool) -> Result<Vec<String>, AppError> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT DISTINCT meeting_name FROM meetings ORDER BY meeting_name")
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|(n,)| n).collect())
}

/// Delete a meeting; action items and sticky notes cascade.
pub async fn delete(pool: &SqlitePool, meeting_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM meetings WHERE meeting_id = ?1")
        .bind(meeting_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Meeting"));
    }
    Ok(())
}

pub async fn exists(pool: &SqlitePool, meeting_id: i64) -> Result<bool, AppError> {
    let found: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM meetings WHERE meeting_id = ?1")
        .bind(meeting_id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}
