use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single task.
///
/// Serialized in camelCase, the field naming of the persisted collection
/// blobs (`things-tasks`), so an existing data directory loads unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Creation-timestamp-derived identifier (epoch millis). Collisions are
    /// accepted as negligible, not mitigated.
    pub id: i64,
    /// Task text, non-empty after trimming
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// Weak reference to a project; `None` means inbox
    #[serde(default)]
    pub project_id: Option<i64>,
    /// Immutable after creation
    pub created_at: DateTime<Utc>,
    /// Optional due instant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Reminder lead time, in minutes before `due_date`. Meaningful only when
    /// `due_date` is also set; a task with one and not the other never
    /// schedules a reminder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_minutes: Option<u32>,
    /// Owning user, present only in the remote-backed variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Task {
    /// Create a new incomplete task with an id derived from the current time.
    pub fn new(text: String, project_id: Option<i64>) -> Self {
        let now = Utc::now();
        Task {
            id: now.timestamp_millis(),
            text,
            completed: false,
            project_id,
            created_at: now,
            due_date: None,
            reminder_minutes: None,
            user_id: None,
        }
    }

    /// Whether this task carries enough to ever schedule a reminder
    pub fn has_reminder(&self) -> bool {
        self.due_date.is_some() && self.reminder_minutes.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_task_defaults() {
        let task = Task::new("Buy milk".into(), None);
        assert!(!task.completed);
        assert_eq!(task.project_id, None);
        assert_eq!(task.due_date, None);
        assert_eq!(task.reminder_minutes, None);
        assert_eq!(task.user_id, None);
        assert_eq!(task.id, task.created_at.timestamp_millis());
    }

    #[test]
    fn serde_uses_camel_case_field_names() {
        let task = Task::new("Buy milk".into(), Some(7));
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["projectId"], 7);
        assert!(json.get("createdAt").is_some());
        // Unset optionals are omitted from the blob
        assert!(json.get("dueDate").is_none());
        assert!(json.get("reminderMinutes").is_none());
    }

    #[test]
    fn deserializes_minimal_legacy_record() {
        let json = r#"{"id":1718000000000,"text":"Buy milk","createdAt":"2024-06-10T00:00:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(!task.completed);
        assert_eq!(task.project_id, None);
        assert!(!task.has_reminder());
    }

    #[test]
    fn has_reminder_requires_both_fields() {
        let mut task = Task::new("call".into(), None);
        assert!(!task.has_reminder());
        task.reminder_minutes = Some(10);
        assert!(!task.has_reminder());
        task.due_date = Some(Utc::now());
        assert!(task.has_reminder());
    }
}
