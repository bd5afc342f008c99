use std::sync::Arc;

use crate::host::SessionProvider;
use crate::io::gateway::{Gateway, PROJECTS_KEY, TASKS_KEY};
use crate::io::remote::RemoteRecords;
use crate::io::state::ViewState;
use crate::model::project::Project;
use crate::model::task::Task;
use crate::model::view::ViewType;

/// Which persistence tier backs the store. Chosen at construction, never
/// switched at runtime.
enum Backend {
    /// Whole-collection blobs through the persistence gateway
    Local(Gateway),
    /// Per-record upsert/delete scoped to the session's owner identity
    Remote {
        records: RemoteRecords,
        session: Arc<dyn SessionProvider>,
    },
}

/// Owns the authoritative in-memory task and project collections. Every
/// mutation updates memory first (optimistically, no rollback) and then
/// mirrors to the backing tier; persistence failures are logged and degrade
/// to "nothing happened".
pub struct DomainStore {
    tasks: Vec<Task>,
    projects: Vec<Project>,
    backend: Backend,
}

impl DomainStore {
    pub fn local(gateway: Gateway) -> Self {
        DomainStore {
            tasks: Vec::new(),
            projects: Vec::new(),
            backend: Backend::Local(gateway),
        }
    }

    pub fn remote(records: RemoteRecords, session: Arc<dyn SessionProvider>) -> Self {
        DomainStore {
            tasks: Vec::new(),
            projects: Vec::new(),
            backend: Backend::Remote { records, session },
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    fn owner(&self) -> Option<String> {
        match &self.backend {
            Backend::Local(_) => None,
            Backend::Remote { session, .. } => session.current_user().map(|u| u.id),
        }
    }

    /// Owned handles for the remote tier, `None` in local mode. Cloned out so
    /// callers can mutate the collections while persisting.
    fn remote_handles(&self) -> Option<(RemoteRecords, Arc<dyn SessionProvider>)> {
        match &self.backend {
            Backend::Local(_) => None,
            Backend::Remote { records, session } => Some((records.clone(), session.clone())),
        }
    }

    /// Load both collections from the backing tier. Absent or corrupt data
    /// loads as empty; in remote mode a signed-out session clears both.
    pub async fn load_all(&mut self) {
        match &self.backend {
            Backend::Local(gateway) => {
                self.tasks = read_blob(gateway, TASKS_KEY).await;
                self.projects = read_blob(gateway, PROJECTS_KEY).await;
            }
            Backend::Remote { records, session } => match session.current_user() {
                Some(user) => {
                    self.tasks = records.get_tasks(&user.id).await;
                    self.projects = records.get_projects(&user.id).await;
                }
                None => {
                    self.tasks.clear();
                    self.projects.clear();
                }
            },
        }
    }

    /// Create a task from trimmed text. Empty text is silently rejected. The
    /// task lands in the active project only when the view context is the
    /// project view; every other view files it to the inbox.
    pub async fn create_task(
        &mut self,
        text: &str,
        due_date: Option<chrono::DateTime<chrono::Utc>>,
        reminder_minutes: Option<u32>,
        ctx: &ViewState,
    ) -> Option<Task> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let project_id = if ctx.view == ViewType::Project {
            ctx.selected_project
        } else {
            None
        };

        let mut task = Task::new(text.to_string(), project_id);
        task.due_date = due_date;
        task.reminder_minutes = reminder_minutes;

        match self.remote_handles() {
            None => {
                self.tasks.push(task.clone());
                self.save_local().await;
            }
            Some((records, session)) => {
                let user = session.current_user()?;
                task.user_id = Some(user.id);
                self.tasks.push(task.clone());
                if let Some(saved) = records.save_task(&task).await {
                    self.replace_task(saved.clone());
                    task = saved;
                }
            }
        }
        Some(task)
    }

    /// Flip a task's completed flag and re-persist the whole record.
    /// Applying twice restores the original record.
    pub async fn toggle_task(&mut self, id: i64) -> Option<Task> {
        if self.owner_required_and_missing() {
            return None;
        }
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        let mut updated = task.clone();

        match self.remote_handles() {
            None => self.save_local().await,
            Some((records, _)) => {
                // Memory already holds the optimistic value; a failed upsert
                // is logged by the adapter and not rolled back
                if let Some(saved) = records.save_task(&updated).await {
                    self.replace_task(saved.clone());
                    updated = saved;
                }
            }
        }
        Some(updated)
    }

    /// Delete a task by id. A failed remote delete leaves memory unchanged.
    pub async fn delete_task(&mut self, id: i64) -> bool {
        match self.remote_handles() {
            None => {
                let before = self.tasks.len();
                self.tasks.retain(|t| t.id != id);
                if self.tasks.len() == before {
                    return false;
                }
                self.save_local().await;
                true
            }
            Some((records, session)) => {
                let Some(user) = session.current_user() else {
                    return false;
                };
                if !records.delete_task(id, &user.id).await {
                    return false;
                }
                self.tasks.retain(|t| t.id != id);
                true
            }
        }
    }

    /// Create a project. Empty name is silently rejected.
    pub async fn create_project(&mut self, name: &str) -> Option<Project> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let mut project = Project::new(name.to_string());

        match self.remote_handles() {
            None => {
                self.projects.push(project.clone());
                self.save_local().await;
            }
            Some((records, session)) => {
                let user = session.current_user()?;
                self.projects.push(project.clone());
                if let Some(saved) = records.save_project(&project, &user.id).await {
                    if let Some(existing) = self.projects.iter_mut().find(|p| p.id == saved.id) {
                        *existing = saved.clone();
                    }
                    project = saved;
                }
            }
        }
        Some(project)
    }

    /// Delete a project and cascade-clear its tasks: referencing tasks are
    /// dissociated (moved to the inbox) and the clear is persisted, in both
    /// modes. A failed remote delete leaves everything unchanged.
    pub async fn delete_project(&mut self, id: i64) -> bool {
        match self.remote_handles() {
            None => {
                let before = self.projects.len();
                self.projects.retain(|p| p.id != id);
                if self.projects.len() == before {
                    return false;
                }
                for task in self.tasks.iter_mut() {
                    if task.project_id == Some(id) {
                        task.project_id = None;
                    }
                }
                self.save_local().await;
                true
            }
            Some((records, session)) => {
                let Some(user) = session.current_user() else {
                    return false;
                };
                if !records.delete_project(id, &user.id).await {
                    return false;
                }
                self.projects.retain(|p| p.id != id);
                // Persist each dissociation as a whole-record upsert
                let mut cleared = Vec::new();
                for task in self.tasks.iter_mut() {
                    if task.project_id == Some(id) {
                        task.project_id = None;
                        cleared.push(task.clone());
                    }
                }
                for task in cleared {
                    records.save_task(&task).await;
                }
                true
            }
        }
    }

    fn replace_task(&mut self, saved: Task) {
        if let Some(existing) = self.tasks.iter_mut().find(|t| t.id == saved.id) {
            *existing = saved;
        }
    }

    fn owner_required_and_missing(&self) -> bool {
        matches!(&self.backend, Backend::Remote { .. }) && self.owner().is_none()
    }

    /// Mirror both collections as blobs. Skipped while both are empty so a
    /// fresh session never clobbers existing data with an empty state.
    async fn save_local(&self) {
        let Backend::Local(gateway) = &self.backend else {
            return;
        };
        if self.tasks.is_empty() && self.projects.is_empty() {
            return;
        }
        match serde_json::to_string(&self.tasks) {
            Ok(blob) => {
                gateway.set(TASKS_KEY, &blob).await;
            }
            Err(e) => log::error!("could not serialize tasks: {}", e),
        }
        match serde_json::to_string(&self.projects) {
            Ok(blob) => {
                gateway.set(PROJECTS_KEY, &blob).await;
            }
            Err(e) => log::error!("could not serialize projects: {}", e),
        }
    }
}

async fn read_blob<T: serde::de::DeserializeOwned>(gateway: &Gateway, key: &str) -> Vec<T> {
    match gateway.get(key).await {
        Some(blob) => serde_json::from_str(&blob).unwrap_or_else(|e| {
            log::error!("corrupt blob under '{}', loading empty: {}", key, e);
            Vec::new()
        }),
        None => Vec::new(),
    }
}
