//! Derived grouping of action items for display.
//!
//! A group clusters the rows that represent one logical task assigned to
//! several people: same job and deadline (and, in the merged variant, same
//! source meeting). Groups are computed, never stored.

use std::collections::HashMap;

use serde::Serialize;

use super::types::ActionItem;

/// Display priority of a group, derived from its members' statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "rejected")]
    Rejected,
    #[serde(rename = "needTime")]
    NeedTime,
    #[serde(rename = "reassigned")]
    Reassigned,
    #[serde(rename = "default")]
    Default,
}

/// A derived cluster of rows sharing the same job and deadline.
#[derive(Debug, Clone, Serialize)]
pub struct ActionGroup {
    pub job: String,
    pub deadline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub members: Vec<ActionItem>,
    pub primary: ActionItem,
    pub count: usize,
    pub severity: Severity,
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Completed and Rejected rows are terminal; they never front a group.
fn is_terminal(status: &str) -> bool {
    matches!(normalize(status).as_str(), "completed" | "rejected")
}

/// Severity precedence: completion requires unanimity; a single rejection
/// dominates regardless of how many members completed, then need-time,
/// then reassignment.
pub fn group_severity(members: &[ActionItem]) -> Severity {
    let statuses: Vec<String> = members.iter().map(|m| normalize(&m.status)).collect();
    if !statuses.is_empty() && statuses.iter().all(|s| s == "completed") {
        Severity::Completed
    } else if statuses.iter().any(|s| s == "rejected") {
        Severity::Rejected
    } else if statuses.iter().any(|s| s == "need time") {
        Severity::NeedTime
    } else if statuses.iter().any(|s| s == "reassigned") {
        Severity::Reassigned
    } else {
        Severity::Default
    }
}

fn build_group(from: Option<String>, members: Vec<ActionItem>) -> Option<ActionGroup> {
    let primary = members
        .iter()
        .find(|m| !is_terminal(&m.status))
        .or_else(|| members.first())?
        .clone();
    let first = members.first()?;

    Some(ActionGroup {
        job: first.job.clone(),
        deadline: first.deadline.clone(),
        from,
        severity: group_severity(&members),
        count: members.len(),
        primary,
        members,
    })
}

fn collect_groups<K: std::hash::Hash + Eq + Clone, V>(
    rows: impl Iterator<Item = (K, V)>,
) -> Vec<(K, Vec<V>)> {
    let mut order: Vec<K> = Vec::new();
    let mut buckets: HashMap<K, Vec<V>> = HashMap::new();
    for (key, value) in rows {
        let bucket = buckets.entry(key.clone()).or_default();
        if bucket.is_empty() {
            order.push(key);
        }
        bucket.push(value);
    }
    order
        .into_iter()
        .filter_map(|key| {
            let members = buckets.remove(&key)?;
            Some((key, members))
        })
        .collect()
}

/// Partition rows by normalized `(job, deadline)`, preserving first-seen
/// group order and input member order. `primary` is the first member still
/// in flight, falling back to the first member when all are terminal.
pub fn group_rows(rows: &[ActionItem]) -> Vec<ActionGroup> {
    let keyed = rows
        .iter()
        .map(|r| (format!("{}|{}", normalize(&r.job), normalize(&r.deadline)), r.clone()));

    collect_groups(keyed)
        .into_iter()
        .filter_map(|(_, members)| build_group(None, members))
        .collect()
}

/// Merged variant: identical algorithm, but rows from different meetings
/// only cluster when the source meeting name also matches. Each input row
/// is tagged with its meeting's name.
pub fn group_rows_merged(rows: &[(String, ActionItem)]) -> Vec<ActionGroup> {
    let keyed = rows.iter().map(|(from, r)| {
        (
            format!("{}|{}|{}", normalize(from), normalize(&r.job), normalize(&r.deadline)),
            (from.clone(), r.clone()),
        )
    });

    collect_groups(keyed)
        .into_iter()
        .filter_map(|(_, members)| {
            let from = members.first().map(|(f, _)| f.clone());
            let items: Vec<ActionItem> = members.into_iter().map(|(_, item)| item).collect();
            build_group(from, items)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(mom_id: i64, name: &str, job: &str, deadline: &str, status: &str) -> ActionItem {
        ActionItem {
            mom_id,
            meeting_id: 1,
            name: name.to_string(),
            job: job.to_string(),
            deadline: deadline.to_string(),
            remark: String::new(),
            assigned_by: String::new(),
            category: String::new(),
            status: status.to_string(),
            status_color: String::new(),
            email: String::new(),
            deadline_history: Vec::new(),
        }
    }

    #[test]
    fn one_group_per_job_deadline_with_all_members() {
        let rows = vec![
            item(1, "Asha", "Fix bug", "2025-03-10", "Assigned"),
            item(2, "Ben", "Fix bug", "2025-03-10", "Assigned"),
            item(3, "Carol", "Write docs", "2025-03-10", "Assigned"),
        ];
        let groups = group_rows(&rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members.len(), 2);
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].job, "Fix bug");
        assert_eq!(groups[1].members.len(), 1);
    }

    #[test]
    fn grouping_key_is_case_insensitive_and_trimmed() {
        let rows = vec![
            item(1, "Asha", "Fix bug", "2025-03-10", "Assigned"),
            item(2, "Ben", "  fix BUG ", "2025-03-10 ", "Assigned"),
        ];
        let groups = group_rows(&rows);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members.len(), 2);
        // Display values come from the first row seen.
        assert_eq!(groups[0].job, "Fix bug");
    }

    #[test]
    fn primary_is_first_non_terminal_member() {
        let rows = vec![
            item(1, "Asha", "Fix bug", "2025-03-10", "Completed"),
            item(2, "Ben", "Fix bug", "2025-03-10", "Assigned"),
            item(3, "Carol", "Fix bug", "2025-03-10", "Assigned"),
        ];
        let groups = group_rows(&rows);
        assert_eq!(groups[0].primary.name, "Ben");
    }

    #[test]
    fn primary_falls_back_to_first_when_all_terminal() {
        let rows = vec![
            item(1, "Asha", "Fix bug", "2025-03-10", "Completed"),
            item(2, "Ben", "Fix bug", "2025-03-10", "Rejected"),
        ];
        let groups = group_rows(&rows);
        assert_eq!(groups[0].primary.name, "Asha");
    }

    #[test]
    fn rejection_dominates_completion() {
        let rows = vec![
            item(1, "Asha", "Fix bug", "2025-03-10", "Completed"),
            item(2, "Ben", "Fix bug", "2025-03-10", "Rejected"),
        ];
        assert_eq!(group_rows(&rows)[0].severity, Severity::Rejected);
    }

    #[test]
    fn completion_requires_unanimity() {
        let all_done = vec![
            item(1, "Asha", "Fix bug", "2025-03-10", "Completed"),
            item(2, "Ben", "Fix bug", "2025-03-10", "completed"),
        ];
        assert_eq!(group_rows(&all_done)[0].severity, Severity::Completed);

        let one_pending = vec![
            item(1, "Asha", "Fix bug", "2025-03-10", "Completed"),
            item(2, "Ben", "Fix bug", "2025-03-10", "Assigned"),
        ];
        assert_eq!(group_rows(&one_pending)[0].severity, Severity::Default);
    }

    #[test]
    fn need_time_outranks_reassigned() {
        let rows = vec![
            item(1, "Asha", "Fix bug", "2025-03-10", "Reassigned"),
            item(2, "Ben", "Fix bug", "2025-03-10", "Need Time"),
        ];
        assert_eq!(group_rows(&rows)[0].severity, Severity::NeedTime);
    }

    #[test]
    fn merged_variant_splits_by_meeting_name() {
        let rows = vec![
            ("Weekly Sync".to_string(), item(1, "Asha", "Fix bug", "2025-03-10", "Assigned")),
            ("Weekly Sync".to_string(), item(2, "Ben", "Fix bug", "2025-03-10", "Assigned")),
            ("Ops Review".to_string(), item(3, "Carol", "Fix bug", "2025-03-10", "Assigned")),
        ];
        let groups = group_rows_merged(&rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].from.as_deref(), Some("Weekly Sync"));
        assert_eq!(groups[0].members.len(), 2);
        assert_eq!(groups[1].from.as_deref(), Some("Ops Review"));
    }
}
