use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{password, validate};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user::{self, NewUser, UserProfile};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, alias = "managerName")]
    pub manager_name: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

/// POST /api/register — create an account.
pub async fn register(
    pool: web::Data<DbPool>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let mut errors = Vec::new();
    errors.extend(validate::validate_name(&body.name));
    errors.extend(validate::validate_email(&body.email));
    errors.extend(validate::validate_password(&body.password));
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join("; ")));
    }

    let hashed = password::hash_password(&body.password)?;
    let user_id = user::create(
        &pool,
        &NewUser {
            name: body.name.trim().to_string(),
            email: body.email.trim().to_lowercase(),
            password: hashed,
            department: body.department.clone(),
            manager_name: body.manager_name.clone(),
            photo: body.photo.clone(),
        },
    )
    .await
    .map_err(|e| match e {
        AppError::Duplicate(_) => AppError::Duplicate("Email already registered".to_string()),
        other => other,
    })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully",
        "user_id": user_id,
    })))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/login — verify credentials and return the profile.
pub async fn login(
    pool: web::Data<DbPool>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let found = user::find_by_email(&pool, &body.email.trim().to_lowercase()).await?;
    let user = found.ok_or(AppError::InvalidCredentials)?;

    if !password::verify_password(&body.password, &user.password)? {
        return Err(AppError::InvalidCredentials);
    }

    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}
