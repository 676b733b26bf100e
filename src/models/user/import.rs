use sqlx::SqlitePool;

use crate::auth::password;
use crate::errors::AppError;

use super::types::{ImportError, ImportResult, ImportRow};

/// Password assigned to imported rows that don't carry one.
pub const DEFAULT_IMPORT_PASSWORD: &str = "changeme123";

/// Bulk upsert users by email.
///
/// Rows missing a name or email are counted as skipped; a failing row is
/// recorded in `errors` with its 1-based row number and does not abort the
/// rest of the batch. The whole import runs in one transaction so a crash
/// mid-import leaves no partial state behind.
pub async fn import(pool: &SqlitePool, rows: &[ImportRow]) -> Result<ImportResult, AppError> {
    let mut result = ImportResult {
        inserted: 0,
        skipped: 0,
        errors: Vec::new(),
    };

    let mut tx = pool.begin().await?;

    for (i, row) in rows.iter().enumerate() {
        let row_num = i + 1;
        let name = row.name.trim();
        let email = row.email.trim().to_lowercase();
        if name.is_empty() || email.is_empty() {
            result.skipped += 1;
            continue;
        }

        let raw_password = row
            .password
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_IMPORT_PASSWORD);
        let hashed = match password::hash_password(raw_password) {
            Ok(h) => h,
            Err(e) => {
                result.errors.push(ImportError {
                    row: row_num,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let outcome = sqlx::query(
            "INSERT INTO users (name, email, password, department, manager_name, photo) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             ON CONFLICT(email) DO UPDATE SET \
               name = excluded.name, \
               password = excluded.password, \
               department = excluded.department, \
               manager_name = excluded.manager_name, \
               photo = excluded.photo",
        )
        .bind(name)
        .bind(&email)
        .bind(&hashed)
        .bind(row.department.as_deref())
        .bind(row.manager_name.as_deref())
        .bind(row.photo.as_deref())
        .execute(&mut *tx)
        .await;

        match outcome {
            Ok(_) => result.inserted += 1,
            Err(e) => result.errors.push(ImportError {
                row: row_num,
                reason: e.to_string(),
            }),
        }
    }

    tx.commit().await?;

    if !result.errors.is_empty() {
        log::warn!(
            "User import finished with {} error(s), {} inserted, {} skipped",
            result.errors.len(),
            result.inserted,
            result.skipped
        );
    }

    Ok(result)
}
