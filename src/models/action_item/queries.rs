use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::meeting;

use super::types::{
    parse_history, ActionItem, ActionItemRow, DeadlineChange, DeadlineHistoryView, FanOutTarget,
    NewActionItem, StatusPatch, STATUS_ASSIGNED,
};

const ITEM_SELECT: &str = "SELECT mom_id, meeting_id, name, job, deadline, remark, \
assigned_by, category, status, status_color, email, deadline_history FROM mom_table";

/// Insert one row per entry, all in a single transaction: either every row
/// of the batch is persisted or none are.
pub async fn submit_batch(
    pool: &SqlitePool,
    meeting_id: i64,
    entries: &[NewActionItem],
) -> Result<(), AppError> {
    if !meeting::exists(pool, meeting_id).await? {
        return Err(AppError::NotFound("Meeting"));
    }

    let mut tx = pool.begin().await?;

    for entry in entries {
        sqlx::query(
            "INSERT INTO mom_table (meeting_id, name, job, deadline, remark, assigned_by, \
             category, status, email, deadline_history) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, '[]')",
        )
        .bind(meeting_id)
        .bind(&entry.name)
        .bind(&entry.job)
        .bind(&entry.deadline)
        .bind(&entry.remark)
        .bind(&entry.assigned_by)
        .bind(&entry.category)
        .bind(entry.status.as_deref().unwrap_or(STATUS_ASSIGNED))
        .bind(&entry.email)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Action items for one meeting, in insertion order.
pub async fn find_by_meeting(
    pool: &SqlitePool,
    meeting_id: i64,
) -> Result<Vec<ActionItem>, AppError> {
    let rows = sqlx::query_as::<_, ActionItemRow>(&format!(
        "{ITEM_SELECT} WHERE meeting_id = ?1 ORDER BY mom_id"
    ))
    .bind(meeting_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(ActionItemRow::into_item).collect())
}

pub async fn find_row(pool: &SqlitePool, mom_id: i64) -> Result<Option<ActionItemRow>, AppError> {
    let row = sqlx::query_as::<_, ActionItemRow>(&format!("{ITEM_SELECT} WHERE mom_id = ?1"))
        .bind(mom_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Apply a status patch to one row.
///
/// Every present field except `deadline` is a direct overwrite. A deadline
/// that is non-empty and differs (after trimming) from the stored value
/// appends a revision record before the new deadline is staged; a deadline
/// that is present but unchanged is still written (so callers can fix
/// blank values) without touching the history. All staged assignments are
/// applied in one UPDATE.
pub async fn update_status(
    pool: &SqlitePool,
    mom_id: i64,
    patch: &StatusPatch,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let row: Option<ActionItemRow> =
        sqlx::query_as(&format!("{ITEM_SELECT} WHERE mom_id = ?1"))
            .bind(mom_id)
            .fetch_optional(&mut *tx)
            .await?;
    let row = row.ok_or(AppError::NotFound("MoM row"))?;

    if patch.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }

    let mut history = parse_history(&row.deadline_history);
    let current_deadline = row.deadline.trim().to_string();

    let mut deadline = row.deadline.clone();
    if let Some(raw) = patch.deadline.as_deref() {
        let new_deadline = raw.trim().to_string();
        if !new_deadline.is_empty() && new_deadline != current_deadline {
            history.push(DeadlineChange {
                old: (!current_deadline.is_empty()).then(|| current_deadline.clone()),
                new_deadline: new_deadline.clone(),
                reason: patch.status.clone().unwrap_or_else(|| "updated".to_string()),
                remark: patch.remark.clone().unwrap_or_default(),
                by: patch.name.clone(),
                changed_at: Utc::now().to_rfc3339(),
            });
        }
        deadline = new_deadline;
    }

    let status = patch.status.clone().unwrap_or(row.status);
    let remark = patch.remark.clone().unwrap_or(row.remark);
    let status_color = patch.status_color.clone().unwrap_or(row.status_color);
    let name = patch.name.clone().unwrap_or(row.name);
    let email = patch.email.clone().unwrap_or(row.email);
    let history_json = serde_json::to_string(&history)?;

    sqlx::query(
        "UPDATE mom_table SET status = ?1, remark = ?2, status_color = ?3, name = ?4, \
         email = ?5, deadline = ?6, deadline_history = ?7 WHERE mom_id = ?8",
    )
    .bind(&status)
    .bind(&remark)
    .bind(&status_color)
    .bind(&name)
    .bind(&email)
    .bind(&deadline)
    .bind(&history_json)
    .bind(mom_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Deadline revisions for one row, most recent first.
pub async fn deadline_history(
    pool: &SqlitePool,
    mom_id: i64,
) -> Result<DeadlineHistoryView, AppError> {
    let row = find_row(pool, mom_id)
        .await?
        .ok_or(AppError::NotFound("MoM row"))?;

    let mut history = parse_history(&row.deadline_history);
    history.sort_by_key(|entry| std::cmp::Reverse(changed_at_nanos(entry)));

    Ok(DeadlineHistoryView {
        current_deadline: (!row.deadline.is_empty()).then_some(row.deadline),
        history,
    })
}

/// Full-precision sort key; unparseable timestamps sink to the oldest end.
fn changed_at_nanos(entry: &DeadlineChange) -> i64 {
    DateTime::parse_from_rfc3339(&entry.changed_at)
        .ok()
        .and_then(|dt| dt.timestamp_nanos_opt())
        .unwrap_or(i64::MIN)
}

/// Insert a fresh `Assigned` row per target, carrying the template task.
/// Used by the reassign and need-time flows; the originating row's own
/// patch goes through `update_status` separately.
pub async fn fan_out(
    pool: &SqlitePool,
    meeting_id: i64,
    job: &str,
    deadline: &str,
    remark: &str,
    targets: &[FanOutTarget],
) -> Result<(), AppError> {
    let entries: Vec<NewActionItem> = targets
        .iter()
        .map(|t| NewActionItem {
            name: t.name.clone(),
            job: job.to_string(),
            deadline: deadline.to_string(),
            remark: remark.to_string(),
            assigned_by: String::new(),
            category: String::new(),
            status: Some(STATUS_ASSIGNED.to_string()),
            email: t.email.clone(),
        })
        .collect();

    submit_batch(pool, meeting_id, &entries).await
}

/// All rows across meetings, tagged with their meeting's name — input for
/// the merged grouping view.
pub async fn find_all_with_meeting(pool: &SqlitePool) -> Result<Vec<(String, ActionItem)>, AppError> {
    #[derive(sqlx::FromRow)]
    struct Row {
        meeting_name: String,
        #[sqlx(flatten)]
        item: ActionItemRow,
    }

    let rows = sqlx::query_as::<_, Row>(
        "SELECT m.meeting_name, a.mom_id, a.meeting_id, a.name, a.job, a.deadline, a.remark, \
         a.assigned_by, a.category, a.status, a.status_color, a.email, a.deadline_history \
         FROM mom_table a \
         JOIN meetings m ON m.meeting_id = a.meeting_id \
         ORDER BY a.mom_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| (r.meeting_name, r.item.into_item()))
        .collect())
}
