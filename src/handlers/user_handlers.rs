use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user::{self, ImportRow};

/// GET /api/users — all profiles.
pub async fn list(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let users = user::find_all(&pool).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// POST /api/users/import — bulk upsert rows already parsed from the CSV.
/// Partial failures are reported per row; the batch itself succeeds.
pub async fn import(
    pool: web::Data<DbPool>,
    body: web::Json<Vec<ImportRow>>,
) -> Result<HttpResponse, AppError> {
    let result = user::import(&pool, &body).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[derive(Debug, Deserialize)]
pub struct PhotoUpdateRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "photoUrl")]
    pub photo_url: String,
}

/// POST /api/users/me/photo — set the stored photo URL for a user.
pub async fn update_photo(
    pool: web::Data<DbPool>,
    body: web::Json<PhotoUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    if body.email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }
    if body.photo_url.trim().is_empty() {
        return Err(AppError::Validation("No photo uploaded".to_string()));
    }

    user::update_photo(&pool, &body.email.trim().to_lowercase(), &body.photo_url).await?;

    Ok(HttpResponse::Ok().json(json!({ "photoUrl": body.photo_url })))
}
