use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;

/// Application error taxonomy. Validation and not-found are detected before
/// any mutation; store errors surface as 500 with detail in the body.
#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Json(serde_json::Error),
    Validation(String),
    NotFound(&'static str),
    Duplicate(String),
    InvalidCredentials,
    Hash(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Json(e) => write!(f, "Serialization error: {e}"),
            AppError::Validation(msg) => write!(f, "{msg}"),
            AppError::NotFound(what) => write!(f, "{what} not found"),
            AppError::Duplicate(msg) => write!(f, "{msg}"),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(msg) => {
                HttpResponse::BadRequest().json(json!({ "message": msg }))
            }
            AppError::NotFound(what) => {
                HttpResponse::NotFound().json(json!({ "message": format!("{what} not found") }))
            }
            AppError::Duplicate(msg) => HttpResponse::Conflict().json(json!({ "message": msg })),
            AppError::InvalidCredentials => {
                HttpResponse::Unauthorized().json(json!({ "message": "Invalid credentials" }))
            }
            AppError::Db(e) => {
                log::error!("{self}");
                HttpResponse::InternalServerError()
                    .json(json!({ "message": "Database error", "error": e.to_string() }))
            }
            AppError::Json(e) => {
                log::error!("{self}");
                HttpResponse::InternalServerError()
                    .json(json!({ "message": "Serialization error", "error": e.to_string() }))
            }
            AppError::Hash(e) => {
                log::error!("{self}");
                HttpResponse::InternalServerError()
                    .json(json!({ "message": "Internal error", "error": e.clone() }))
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return AppError::Duplicate("Duplicate key".to_string());
            }
        }
        AppError::Db(e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Json(e)
    }
}
