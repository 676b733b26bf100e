use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::action_item::{
    self, FanOutTarget, NewActionItem, StatusPatch, COLOR_NEED_TIME, COLOR_REASSIGNED,
    STATUS_NEED_TIME, STATUS_REASSIGNED,
};

#[derive(Debug, Deserialize)]
pub struct SubmitMomRequest {
    #[serde(default)]
    pub mom: serde_json::Value,
}

/// POST /api/meetings/{id}/mom — insert a MoM batch.
pub async fn submit(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<SubmitMomRequest>,
) -> Result<HttpResponse, AppError> {
    if !body.mom.is_array() {
        return Err(AppError::Validation("MoM must be an array".to_string()));
    }
    let entries: Vec<NewActionItem> = serde_json::from_value(body.mom.clone())
        .map_err(|e| AppError::Validation(format!("Invalid MoM entries: {e}")))?;

    action_item::submit_batch(&pool, path.into_inner(), &entries).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "MoM inserted successfully" })))
}

/// GET /api/meetings/{id}/mom — action items for a meeting.
pub async fn list_for_meeting(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let items = action_item::find_by_meeting(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// GET /api/meetings/{id}/mom/groups — grouped display view.
pub async fn groups(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let items = action_item::find_by_meeting(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(action_item::group_rows(&items)))
}

/// GET /api/mom/merged-groups — grouping merged across meetings.
pub async fn merged_groups(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let rows = action_item::find_all_with_meeting(&pool).await?;
    Ok(HttpResponse::Ok().json(action_item::group_rows_merged(&rows)))
}

/// POST /api/mom/{id}/update-status — patch one row; a changed deadline
/// also appends a revision record.
pub async fn update_status(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<StatusPatch>,
) -> Result<HttpResponse, AppError> {
    action_item::update_status(&pool, path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "MoM status updated successfully" })))
}

/// GET /api/mom/{id}/deadline-history — revisions, newest first.
pub async fn deadline_history(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let view = action_item::deadline_history(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[derive(Debug, Deserialize)]
pub struct ReassignRequest {
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub targets: Vec<FanOutTarget>,
}

/// POST /api/mom/{id}/reassign — mark the row Reassigned and fan the task
/// out to the selected people as fresh Assigned rows.
pub async fn reassign(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<ReassignRequest>,
) -> Result<HttpResponse, AppError> {
    let mom_id = path.into_inner();
    let row = action_item::find_row(&pool, mom_id)
        .await?
        .ok_or(AppError::NotFound("MoM row"))?;

    let patch = StatusPatch {
        status: Some(STATUS_REASSIGNED.to_string()),
        status_color: Some(COLOR_REASSIGNED.to_string()),
        remark: body.remark.clone(),
        ..StatusPatch::default()
    };
    action_item::update_status(&pool, mom_id, &patch).await?;

    if !body.targets.is_empty() {
        let remark = body.remark.as_deref().unwrap_or(&row.remark);
        action_item::fan_out(
            &pool,
            row.meeting_id,
            &row.job,
            &row.deadline,
            remark,
            &body.targets,
        )
        .await?;
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "MoM status updated successfully" })))
}

#[derive(Debug, Deserialize)]
pub struct NeedTimeRequest {
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub targets: Vec<FanOutTarget>,
}

/// POST /api/mom/{id}/need-time — mark the row Need Time with a revised
/// deadline, optionally fanning the task out to supporting people.
pub async fn need_time(
    pool: web::Data<DbPool>,
    path: web::Path<i64>,
    body: web::Json<NeedTimeRequest>,
) -> Result<HttpResponse, AppError> {
    let mom_id = path.into_inner();
    let row = action_item::find_row(&pool, mom_id)
        .await?
        .ok_or(AppError::NotFound("MoM row"))?;

    let deadline = body
        .deadline
        .clone()
        .unwrap_or_else(|| row.deadline.clone());

    let patch = StatusPatch {
        status: Some(STATUS_NEED_TIME.to_string()),
        status_color: Some(COLOR_NEED_TIME.to_string()),
        deadline: Some(deadline.clone()),
        remark: body.remark.clone(),
        ..StatusPatch::default()
    };
    action_item::update_status(&pool, mom_id, &patch).await?;

    if !body.targets.is_empty() {
        let remark = body.remark.as_deref().unwrap_or(&row.remark);
        action_item::fan_out(&pool, row.meeting_id, &row.job, &deadline, remark, &body.targets)
            .await?;
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "MoM status updated successfully" })))
}
