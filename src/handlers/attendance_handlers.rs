use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::attendance;

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    #[serde(default, rename = "meetingName")]
    pub meeting_name: String,
    #[serde(default)]
    pub month: String,
}

/// GET /attendance-summary?meetingName=&month=YYYY-MM
pub async fn summary(
    pool: web::Data<DbPool>,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse, AppError> {
    let summary = attendance::compute_summary(&pool, &query.meeting_name, &query.month).await?;
    Ok(HttpResponse::Ok().json(summary))
}
