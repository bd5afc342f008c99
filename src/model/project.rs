use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default project accent color
pub const DEFAULT_COLOR: &str = "#3B82F6";

/// A project grouping tasks. Membership is derived by scanning tasks'
/// `project_id`; no count is stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Creation-timestamp-derived identifier (epoch millis)
    pub id: i64,
    /// Non-empty display name
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Project {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Project {
            id: now.timestamp_millis(),
            name,
            created_at: now,
            color: default_color(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_project_gets_accent_color() {
        let project = Project::new("Groceries".into());
        assert_eq!(project.color, DEFAULT_COLOR);
        assert_eq!(project.id, project.created_at.timestamp_millis());
    }

    #[test]
    fn missing_color_defaults_on_deserialize() {
        let json = r#"{"id":1,"name":"Groceries","createdAt":"2024-06-10T00:00:00Z"}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.color, DEFAULT_COLOR);
    }
}
