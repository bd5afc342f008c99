use serde::Serialize;

use crate::model::project::Project;
use crate::model::task::Task;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListJson<'a> {
    pub view: String,
    pub title: String,
    pub tasks: &'a [Task],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfoJson<'a> {
    pub id: i64,
    pub name: &'a str,
    pub color: &'a str,
    pub open_tasks: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewStateJson {
    pub view: String,
    pub title: String,
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One listing line: checkbox, text, optional due/reminder suffix
pub fn format_task_line(task: &Task) -> String {
    let checkbox = if task.completed { "[x]" } else { "[ ]" };
    let mut line = format!("{} {}  ({})", checkbox, task.text, task.id);
    if let Some(due) = task.due_date {
        line.push_str(&format!("  due {}", due.format("%Y-%m-%d %H:%M")));
        if let Some(minutes) = task.reminder_minutes {
            line.push_str(&format!(" (remind {}m before)", minutes));
        }
    }
    line
}

/// One project listing line with the derived open-task count
pub fn format_project_line(project: &Project, open_tasks: usize) -> String {
    format!("{}  {} ({} open)", project.id, project.name, open_tasks)
}
