use serde::{Deserialize, Serialize};

/// Row highlight colors the SPA applies per status.
pub const COLOR_COMPLETED: &str = "#bbf7d0";
pub const COLOR_REASSIGNED: &str = "#bae6fd";
pub const COLOR_REJECTED: &str = "#fecaca";
pub const COLOR_NEED_TIME: &str = "#fed7aa";

pub const STATUS_ASSIGNED: &str = "Assigned";
pub const STATUS_COMPLETED: &str = "Completed";
pub const STATUS_REJECTED: &str = "Rejected";
pub const STATUS_REASSIGNED: &str = "Reassigned";
pub const STATUS_NEED_TIME: &str = "Need Time";

/// Raw mom_table row; `deadline_history` is the JSON column text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActionItemRow {
    pub mom_id: i64,
    pub meeting_id: i64,
    pub name: String,
    pub job: String,
    pub deadline: String,
    pub remark: String,
    pub assigned_by: String,
    pub category: String,
    pub status: String,
    pub status_color: String,
    pub email: String,
    pub deadline_history: String,
}

/// Wire form of an action item with the deadline history decoded.
#[derive(Debug, Clone, Serialize)]
pub struct ActionItem {
    pub mom_id: i64,
    pub meeting_id: i64,
    pub name: String,
    pub job: String,
    pub deadline: String,
    pub remark: String,
    pub assigned_by: String,
    pub category: String,
    pub status: String,
    pub status_color: String,
    pub email: String,
    pub deadline_history: Vec<DeadlineChange>,
}

impl ActionItemRow {
    pub fn into_item(self) -> ActionItem {
        let deadline_history = parse_history(&self.deadline_history);
        ActionItem {
            mom_id: self.mom_id,
            meeting_id: self.meeting_id,
            name: self.name,
            job: self.job,
            deadline: self.deadline,
            remark: self.remark,
            assigned_by: self.assigned_by,
            category: self.category,
            status: self.status,
            status_color: self.status_color,
            email: self.email,
            deadline_history,
        }
    }
}

/// One deadline revision. Records the state *before* the change; entries
/// are appended and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadlineChange {
    pub old: Option<String>,
    #[serde(rename = "new")]
    pub new_deadline: String,
    pub reason: String,
    pub remark: String,
    pub by: Option<String>,
    #[serde(rename = "changedAt")]
    pub changed_at: String,
}

/// Decode a stored history column; unreadable text counts as empty.
pub fn parse_history(stored: &str) -> Vec<DeadlineChange> {
    serde_json::from_str(stored).unwrap_or_default()
}

/// One entry of a MoM submission batch. The SPA sends `assignedBy`; older
/// clients send `assigned_by` — both are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewActionItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default, alias = "assignedBy")]
    pub assigned_by: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub email: String,
}

/// Patch for a status update — every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusPatch {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default, alias = "statusColor")]
    pub status_color: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
}

impl StatusPatch {
    /// True when no field is present — nothing to stage.
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.remark.is_none()
            && self.status_color.is_none()
            && self.name.is_none()
            && self.email.is_none()
            && self.deadline.is_none()
    }
}

/// A person receiving a fanned-out assignment.
#[derive(Debug, Clone, Deserialize)]
pub struct FanOutTarget {
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Deadline history response: current value plus revisions, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct DeadlineHistoryView {
    #[serde(rename = "currentDeadline")]
    pub current_deadline: Option<String>,
    pub history: Vec<DeadlineChange>,
}
