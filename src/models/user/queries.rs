use sqlx::SqlitePool;

use crate::errors::AppError;

use super::types::{NewUser, User, UserProfile};

/// Insert a new user. Duplicate email surfaces as `AppError::Duplicate`.
pub async fn create(pool: &SqlitePool, new: &NewUser) -> Result<i64, AppError> {
    let result = sqlx::query(
        "INSERT INTO users (name, email, password, department, manager_name, photo) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(&new.name)
    .bind(&new.email)
    .bind(&new.password)
    .bind(new.department.as_deref())
    .bind(new.manager_name.as_deref())
    .bind(new.photo.as_deref())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Find a user by email for authentication. Returns the internal row
/// with the password hash.
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT user_id, name, email, password, department, manager_name, photo \
         FROM users WHERE email = ?1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// All users as safe profiles, ordered by id.
pub async fn find_all(pool: &SqlitePool) -> Result<Vec<UserProfile>, AppError> {
    let users = sqlx::query_as::<_, User>(
        "SELECT user_id, name, email, password, department, manager_name, photo \
         FROM users ORDER BY user_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(users.into_iter().map(UserProfile::from).collect())
}

/// Set the stored photo URL for a user, keyed by email.
pub async fn update_photo(pool: &SqlitePool, email: &str, photo_url: &str) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE users SET photo = ?1 WHERE email = ?2")
        .bind(photo_url)
        .bind(email)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User"));
    }
    Ok(())
}
