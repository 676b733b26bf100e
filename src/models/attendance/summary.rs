use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::meeting::{parse_presence, PresenceMap};

use super::canonical::{canonical_key, email_local_part, normalize_date_key, sort_names};

/// Canonical roster plus day-by-day presence matrix for one meeting name
/// and month.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceSummary {
    pub attendees: Vec<String>,
    pub dates: BTreeMap<String, Vec<String>>,
}

fn valid_month(month: &str) -> bool {
    let bytes = month.as_bytes();
    bytes.len() == 7
        && bytes[4] == b'-'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[5..].iter().all(u8::is_ascii_digit)
}

/// Build the attendance summary for `meeting_name` over `month` (YYYY-MM).
///
/// Rows are fetched by primary key ascending so first-seen-wins roster
/// collisions resolve the same way on every run.
pub async fn compute_summary(
    pool: &SqlitePool,
    meeting_name: &str,
    month: &str,
) -> Result<AttendanceSummary, AppError> {
    if meeting_name.trim().is_empty() || !valid_month(month) {
        return Err(AppError::Validation(
            "meetingName and month (YYYY-MM) are required".to_string(),
        ));
    }

    let rows: Vec<(String, Option<String>)> = sqlx::query_as(
        "SELECT attendees, present_by_date FROM meetings \
         WHERE meeting_name = ?1 ORDER BY meeting_id ASC",
    )
    .bind(meeting_name)
    .fetch_all(pool)
    .await?;

    // canonical key -> first display form seen
    let mut roster: HashMap<String, String> = HashMap::new();
    for (attendees, _) in &rows {
        for part in attendees.split(',') {
            let display = part.trim();
            if display.is_empty() {
                continue;
            }
            let key = canonical_key(display);
            if key.is_empty() {
                continue;
            }
            roster.entry(key).or_insert_with(|| display.to_string());
        }
    }

    // ISO date -> (canonical key -> display form)
    let mut date_map: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    for (_, present_raw) in &rows {
        let present: PresenceMap = parse_presence(present_raw.as_deref());
        for (raw_date, people) in &present {
            let Some(date_key) = normalize_date_key(raw_date) else {
                continue;
            };
            if !date_key.starts_with(month) {
                continue;
            }

            let bucket = date_map.entry(date_key).or_default();
            for person in people {
                let person = person.trim();
                if person.is_empty() {
                    continue;
                }

                let key_local = canonical_key(email_local_part(person));
                let key_raw = canonical_key(person);

                // Local-part match wins over raw match; anything else is a
                // new roster entry under its raw canonical form.
                if let Some(display) = roster.get(&key_local) {
                    bucket.insert(key_local.clone(), display.clone());
                } else if let Some(display) = roster.get(&key_raw) {
                    bucket.insert(key_raw.clone(), display.clone());
                } else if !key_raw.is_empty() {
                    bucket
                        .entry(key_raw.clone())
                        .or_insert_with(|| person.to_string());
                    roster
                        .entry(key_raw.clone())
                        .or_insert_with(|| person.to_string());
                }
            }
        }
    }

    let mut attendees: Vec<String> = roster.into_values().collect();
    sort_names(&mut attendees);

    let mut dates = BTreeMap::new();
    for (date_key, bucket) in date_map {
        if bucket.is_empty() {
            continue;
        }
        let mut names: Vec<String> = bucket.into_values().collect();
        sort_names(&mut names);
        dates.insert(date_key, names);
    }

    Ok(AttendanceSummary { attendees, dates })
}
