use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::sticky_note::StickyNote;

/// JSON presence map: calendar date -> raw person strings present that day.
pub type PresenceMap = BTreeMap<String, Vec<String>>;

/// Raw meetings row; `attendees` comma-joined, `present_by_date` JSON text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MeetingRow {
    pub meeting_id: i64,
    pub meeting_name: String,
    pub organizer_email: String,
    pub date_of_meeting: String,
    pub attendees: String,
    pub department: Option<String>,
    pub company: Option<String>,
    pub plant: Option<String>,
    pub present_by_date: Option<String>,
    pub created: Option<i64>,
}

/// Wire form of a meeting: attendees split back into a list, presence map
/// decoded, sticky notes attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingView {
    pub meeting_id: i64,
    pub meeting_name: String,
    pub organizer_email: String,
    pub date_of_meeting: String,
    pub attendees: Vec<String>,
    pub department: Option<String>,
    pub company: Option<String>,
    pub plant: Option<String>,
    pub present_by_date: PresenceMap,
    pub sticky_notes: Vec<StickyNote>,
    pub created: Option<i64>,
}

impl MeetingRow {
    pub fn into_view(self, sticky_notes: Vec<StickyNote>) -> MeetingView {
        MeetingView {
            meeting_id: self.meeting_id,
            meeting_name: self.meeting_name,
            organizer_email: self.organizer_email,
            date_of_meeting: self.date_of_meeting,
            attendees: split_attendees(&self.attendees),
            department: self.department,
            company: self.company,
            plant: self.plant,
            present_by_date: parse_presence(self.present_by_date.as_deref()),
            sticky_notes,
            created: self.created,
        }
    }
}

/// Meeting creation payload. The scheduled timestamp may arrive prebuilt
/// (`dateOfMeeting`) or as separate date/time parts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeeting {
    #[serde(default)]
    pub meeting_name: String,
    #[serde(default)]
    pub organizer_email: String,
    #[serde(default)]
    pub meeting_date: Option<String>,
    #[serde(default)]
    pub meeting_time: Option<String>,
    #[serde(default)]
    pub date_of_meeting: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub plant: Option<String>,
    #[serde(default)]
    pub present_by_date: PresenceMap,
}

pub fn split_attendees(stored: &str) -> Vec<String> {
    stored
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn join_attendees(attendees: &[String]) -> String {
    attendees
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Decode the stored presence JSON; anything unreadable counts as empty.
pub fn parse_presence(stored: Option<&str>) -> PresenceMap {
    stored
        .and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}

/// Resolve the scheduled timestamp the way the SPA expects: a prebuilt
/// ISO string wins; else date + time; else date at midnight; else now.
pub fn resolve_date_of_meeting(new: &NewMeeting) -> String {
    if let Some(raw) = new.date_of_meeting.as_deref() {
        if !raw.trim().is_empty() {
            return raw.trim().to_string();
        }
    }

    let now = || Utc::now().to_rfc3339();

    match (new.meeting_date.as_deref(), new.meeting_time.as_deref()) {
        (Some(date), Some(time)) if !date.is_empty() && !time.is_empty() => {
            NaiveDateTime::parse_from_str(&format!("{date}T{time}"), "%Y-%m-%dT%H:%M")
                .map(|dt| dt.and_utc().to_rfc3339())
                .unwrap_or_else(|_| now())
        }
        (Some(date), _) if !date.is_empty() => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(|d| d.and_hms_opt(0, 0, 0).map_or_else(now, |dt| dt.and_utc().to_rfc3339()))
            .unwrap_or_else(|_| now()),
        _ => now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendees_round_trip_trims_and_drops_blanks() {
        let joined = join_attendees(&[
            " Asha ".to_string(),
            "Ben".to_string(),
            "  ".to_string(),
        ]);
        assert_eq!(joined, "Asha, Ben");
        assert_eq!(split_attendees(&joined), vec!["Asha", "Ben"]);
    }

    #[test]
    fn presence_parse_tolerates_garbage() {
        assert!(parse_presence(None).is_empty());
        assert!(parse_presence(Some("not json")).is_empty());

        let map = parse_presence(Some(r#"{"2025-01-02": ["Asha"]}"#));
        assert_eq!(map.get("2025-01-02"), Some(&vec!["Asha".to_string()]));
    }

    #[test]
    fn timestamp_prefers_prebuilt_iso() {
        let new = NewMeeting {
            date_of_meeting: Some("2025-03-01T09:30:00Z".to_string()),
            meeting_date: Some("2025-04-01".to_string()),
            meeting_time: Some("10:00".to_string()),
            ..blank_meeting()
        };
        assert_eq!(resolve_date_of_meeting(&new), "2025-03-01T09:30:00Z");
    }

    #[test]
    fn timestamp_builds_from_date_and_time() {
        let new = NewMeeting {
            meeting_date: Some("2025-04-01".to_string()),
            meeting_time: Some("10:00".to_string()),
            ..blank_meeting()
        };
        assert!(resolve_date_of_meeting(&new).starts_with("2025-04-01T10:00:00"));
    }

    #[test]
    fn timestamp_date_only_is_midnight() {
        let new = NewMeeting {
            meeting_date: Some("2025-04-01".to_string()),
            ..blank_meeting()
        };
        assert!(resolve_date_of_meeting(&new).starts_with("2025-04-01T00:00:00"));
    }

    fn blank_meeting() -> NewMeeting {
        NewMeeting::default()
    }
}
