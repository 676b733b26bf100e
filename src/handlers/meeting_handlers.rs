use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{meeting, sticky_note};

/// POST /api/meetings — create a meeting.
pub async fn create(
    pool: web::Data<DbPool>,
    body: web::Json<meeting::NewMeeting>,
) -> Result<HttpResponse, AppError> {
    if body.meeting_name.trim().is_empty() {
        return Err(AppError::Validation("Meeting name is required".to_string()));
    }

    let row = meeting::create(&pool, &body).await?;
    Ok(HttpResponse::Created().json(row.into_view(Vec::new())))
}

/// GET /api/meetings — all meetings, newest first, with sticky notes.
pub async fn list(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let rows = meeting::find_all(&pool).await?;

    let mut views = Vec::with_capacity(rows.len());
    for row in rows {
        let notes = sticky_note::for_meeting(&pool, row.meeting_id).await?;
        views.push(row.into_view(notes));
    }

    Ok(HttpResponse::Ok().json(views))
}

/// GET /api/meetings/{id} — one meeting with its sticky notes.
pub async fn detail(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let meeting_id = path.into_inner();
    let row = meeting::find_by_id(&pool, meeting_id)
        .await?
        .ok_or(AppError::NotFound("Meeting"))?;
    let notes = sticky_note::for_meeting(&pool, meeting_id).await?;

    Ok(HttpResponse::Ok().json(row.into_view(notes)))
}

#[derive(Debug, Deserialize)]
pub struct AddAttendeeRequest {
    #[serde(default)]
    pub name: String,
}

/// POST /api/meetings/{id}/attendees — idempotent attendee append.
pub async fn add_attendee(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<AddAttendeeRequest>,
) -> Result<HttpResponse, AppError> {
    let attendees = meeting::add_attendee(&pool, path.into_inner(), &body.name).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Attendee added successfully",
        "attendees": attendees,
    })))
}

/// POST /api/meetings/{id}/stickynotes — append a note.
pub async fn add_sticky_note(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<sticky_note::NewStickyNote>,
) -> Result<HttpResponse, AppError> {
    let note_id = sticky_note::add(&pool, path.into_inner(), &body).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Sticky note added",
        "sticky_note_id": note_id,
    })))
}

/// GET /meeting-names — distinct meeting names for the report picker.
pub async fn names(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let names = meeting::names(&pool).await?;
    Ok(HttpResponse::Ok().json(names))
}
