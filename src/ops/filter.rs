use crate::model::project::Project;
use crate::model::task::Task;
use crate::model::view::ViewType;

/// Derive the visible task list for a view.
///
/// A non-empty query applies first as a case-insensitive substring match on
/// task text, then the view lens:
/// - inbox: no project and not completed
/// - today: not completed (deliberately not date-scoped)
/// - completed: completed
/// - project: matches `selected_project` and not completed
pub fn filter_tasks(
    tasks: &[Task],
    view: ViewType,
    selected_project: Option<i64>,
    query: &str,
) -> Vec<Task> {
    let query = query.trim().to_lowercase();
    let matches_query =
        |t: &Task| query.is_empty() || t.text.to_lowercase().contains(query.as_str());

    tasks
        .iter()
        .filter(|t| matches_query(t))
        .filter(|t| match view {
            ViewType::Inbox => t.project_id.is_none() && !t.completed,
            ViewType::Today => !t.completed,
            ViewType::Completed => t.completed,
            ViewType::Project => t.project_id == selected_project && !t.completed,
        })
        .cloned()
        .collect()
}

/// Title shown for a view; the project view resolves to the project's name.
pub fn view_title(view: ViewType, selected_project: Option<i64>, projects: &[Project]) -> String {
    match view {
        ViewType::Inbox => "Inbox".to_string(),
        ViewType::Today => "Today".to_string(),
        ViewType::Completed => "Completed".to_string(),
        ViewType::Project => selected_project
            .and_then(|id| projects.iter().find(|p| p.id == id))
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "Project".to_string()),
    }
}

/// Open-task count for a project, derived by scanning (never stored)
pub fn project_task_count(tasks: &[Task], project_id: i64) -> usize {
    tasks
        .iter()
        .filter(|t| t.project_id == Some(project_id) && !t.completed)
        .count()
}
