use serde::{Deserialize, Serialize};

/// A named filter lens over the task collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    #[default]
    Inbox,
    /// Filters by completion only, not by date; every open task appears here
    Today,
    Completed,
    Project,
}

impl ViewType {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewType::Inbox => "inbox",
            ViewType::Today => "today",
            ViewType::Completed => "completed",
            ViewType::Project => "project",
        }
    }
}

impl std::str::FromStr for ViewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inbox" => Ok(ViewType::Inbox),
            "today" => Ok(ViewType::Today),
            "completed" => Ok(ViewType::Completed),
            "project" => Ok(ViewType::Project),
            other => Err(format!(
                "unknown view '{}' (expected inbox, today, completed, project)",
                other
            )),
        }
    }
}

impl std::fmt::Display for ViewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
