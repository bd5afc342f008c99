use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::project::{DEFAULT_COLOR, Project};
use crate::model::task::Task;

/// Error from the remote record store. The adapter logs these and degrades;
/// callers never see error subtypes, only "nothing changed".
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("record store backend error: {0}")]
    Backend(String),
    #[error("row not returned by upsert")]
    Missing,
}

/// Row shape of the remote `tasks` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: i64,
    pub user_id: String,
    pub text: String,
    pub completed: bool,
    pub project_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub reminder_minutes: Option<u32>,
}

/// Row shape of the remote `projects` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRow {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub color: Option<String>,
}

/// The relational collaborator behind the remote-backed variant. Reads are
/// owner-filtered; writes and deletes must additionally assert the owner so
/// no call can mutate another user's rows. The wire protocol behind an
/// implementation is its own concern.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn select_tasks(&self, user_id: &str) -> Result<Vec<TaskRow>, RemoteError>;
    async fn upsert_task(&self, row: TaskRow) -> Result<TaskRow, RemoteError>;
    async fn delete_task(&self, id: i64, user_id: &str) -> Result<(), RemoteError>;
    async fn select_projects(&self, user_id: &str) -> Result<Vec<ProjectRow>, RemoteError>;
    async fn upsert_project(&self, row: ProjectRow) -> Result<ProjectRow, RemoteError>;
    async fn delete_project(&self, id: i64, user_id: &str) -> Result<(), RemoteError>;
}

// ---------------------------------------------------------------------------
// Domain <-> row mapping
// ---------------------------------------------------------------------------

fn task_to_row(task: &Task, user_id: &str) -> TaskRow {
    TaskRow {
        id: task.id,
        user_id: user_id.to_string(),
        text: task.text.clone(),
        completed: task.completed,
        project_id: task.project_id,
        created_at: task.created_at,
        due_date: task.due_date,
        reminder_minutes: task.reminder_minutes,
    }
}

fn row_to_task(row: TaskRow) -> Task {
    Task {
        id: row.id,
        text: row.text,
        completed: row.completed,
        project_id: row.project_id,
        created_at: row.created_at,
        due_date: row.due_date,
        reminder_minutes: row.reminder_minutes,
        user_id: Some(row.user_id),
    }
}

fn project_to_row(project: &Project, user_id: &str) -> ProjectRow {
    ProjectRow {
        id: project.id,
        user_id: user_id.to_string(),
        name: project.name.clone(),
        created_at: project.created_at,
        color: Some(project.color.clone()),
    }
}

fn row_to_project(row: ProjectRow) -> Project {
    Project {
        id: row.id,
        name: row.name,
        created_at: row.created_at,
        color: row.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// Maps domain records to/from the remote row shape, scoped by owner
/// identity. Every failure is logged and reported as "nothing changed":
/// empty collection on reads, `None`/`false` on writes and deletes.
#[derive(Clone)]
pub struct RemoteRecords {
    store: Arc<dyn RecordStore>,
}

impl RemoteRecords {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        RemoteRecords { store }
    }

    /// Owner's tasks, newest first
    pub async fn get_tasks(&self, user_id: &str) -> Vec<Task> {
        match self.store.select_tasks(user_id).await {
            Ok(mut rows) => {
                rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                rows.into_iter().map(row_to_task).collect()
            }
            Err(e) => {
                log::error!("task select failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Upsert the whole task record. Requires an owner on the task itself.
    pub async fn save_task(&self, task: &Task) -> Option<Task> {
        let Some(user_id) = task.user_id.as_deref() else {
            log::error!("cannot save task {}: no owner identity", task.id);
            return None;
        };
        match self.store.upsert_task(task_to_row(task, user_id)).await {
            Ok(row) => Some(row_to_task(row)),
            Err(e) => {
                log::error!("task upsert failed: {}", e);
                None
            }
        }
    }

    pub async fn delete_task(&self, id: i64, user_id: &str) -> bool {
        match self.store.delete_task(id, user_id).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("task delete failed: {}", e);
                false
            }
        }
    }

    /// Owner's projects, newest first
    pub async fn get_projects(&self, user_id: &str) -> Vec<Project> {
        match self.store.select_projects(user_id).await {
            Ok(mut rows) => {
                rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                rows.into_iter().map(row_to_project).collect()
            }
            Err(e) => {
                log::error!("project select failed: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn save_project(&self, project: &Project, user_id: &str) -> Option<Project> {
        match self
            .store
            .upsert_project(project_to_row(project, user_id))
            .await
        {
            Ok(row) => Some(row_to_project(row)),
            Err(e) => {
                log::error!("project upsert failed: {}", e);
                None
            }
        }
    }

    pub async fn delete_project(&self, id: i64, user_id: &str) -> bool {
        match self.store.delete_project(id, user_id).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("project delete failed: {}", e);
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory record store
// ---------------------------------------------------------------------------

/// In-memory `RecordStore` with owner scoping and failure injection. Serves
/// tests and reference wiring; a production deployment injects a real
/// relational backend instead.
#[derive(Default)]
pub struct MemoryRecordStore {
    inner: std::sync::Mutex<MemoryTables>,
    fail: std::sync::atomic::AtomicBool,
}

#[derive(Default)]
struct MemoryTables {
    tasks: Vec<TaskRow>,
    projects: Vec<ProjectRow>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (simulates a network/auth outage)
    pub fn set_failing(&self, failing: bool) {
        self.fail
            .store(failing, std::sync::atomic::Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), RemoteError> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            Err(RemoteError::Backend("injected failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn select_tasks(&self, user_id: &str) -> Result<Vec<TaskRow>, RemoteError> {
        self.check()?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .tasks
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn upsert_task(&self, row: TaskRow) -> Result<TaskRow, RemoteError> {
        self.check()?;
        let mut inner = self.inner.lock().unwrap();
        if let Some(existing) = inner.tasks.iter_mut().find(|r| r.id == row.id) {
            if existing.user_id != row.user_id {
                return Err(RemoteError::Backend("owner mismatch".into()));
            }
            *existing = row.clone();
        } else {
            inner.tasks.push(row.clone());
        }
        Ok(row)
    }

    async fn delete_task(&self, id: i64, user_id: &str) -> Result<(), RemoteError> {
        self.check()?;
        let mut inner = self.inner.lock().unwrap();
        inner.tasks.retain(|r| !(r.id == id && r.user_id == user_id));
        Ok(())
    }

    async fn select_projects(&self, user_id: &str) -> Result<Vec<ProjectRow>, RemoteError> {
        self.check()?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .projects
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn upsert_project(&self, row: ProjectRow) -> Result<ProjectRow, RemoteError> {
        self.check()?;
        let mut inner = self.inner.lock().unwrap();
        if let Some(existing) = inner.projects.iter_mut().find(|r| r.id == row.id) {
            if existing.user_id != row.user_id {
                return Err(RemoteError::Backend("owner mismatch".into()));
            }
            *existing = row.clone();
        } else {
            inner.projects.push(row.clone());
        }
        Ok(row)
    }

    async fn delete_project(&self, id: i64, user_id: &str) -> Result<(), RemoteError> {
        self.check()?;
        let mut inner = self.inner.lock().unwrap();
        inner
            .projects
            .retain(|r| !(r.id == id && r.user_id == user_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn task_at(id: i64, secs: i64, user: &str) -> Task {
        Task {
            id,
            text: format!("task {}", id),
            completed: false,
            project_id: None,
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
            due_date: None,
            reminder_minutes: None,
            user_id: Some(user.to_string()),
        }
    }

    #[tokio::test]
    async fn reads_are_owner_scoped_and_newest_first() {
        let store = Arc::new(MemoryRecordStore::new());
        let records = RemoteRecords::new(store);
        records.save_task(&task_at(1, 100, "alice")).await.unwrap();
        records.save_task(&task_at(2, 300, "alice")).await.unwrap();
        records.save_task(&task_at(3, 200, "bob")).await.unwrap();

        let tasks = records.get_tasks("alice").await;
        assert_eq!(tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[tokio::test]
    async fn save_task_without_owner_is_rejected() {
        let records = RemoteRecords::new(Arc::new(MemoryRecordStore::new()));
        let mut task = task_at(1, 0, "alice");
        task.user_id = None;
        assert_eq!(records.save_task(&task).await, None);
    }

    #[tokio::test]
    async fn delete_cannot_cross_users() {
        let store = Arc::new(MemoryRecordStore::new());
        let records = RemoteRecords::new(store);
        records.save_task(&task_at(1, 0, "alice")).await.unwrap();
        // bob "deletes" alice's task id: filtered out by owner scoping
        assert!(records.delete_task(1, "bob").await);
        assert_eq!(records.get_tasks("alice").await.len(), 1);
    }

    #[tokio::test]
    async fn backend_failure_degrades_to_empty_and_false() {
        let store = Arc::new(MemoryRecordStore::new());
        let records = RemoteRecords::new(store.clone());
        records.save_task(&task_at(1, 0, "alice")).await.unwrap();

        store.set_failing(true);
        assert!(records.get_tasks("alice").await.is_empty());
        assert_eq!(records.save_task(&task_at(2, 0, "alice")).await, None);
        assert!(!records.delete_task(1, "alice").await);

        store.set_failing(false);
        assert_eq!(records.get_tasks("alice").await.len(), 1);
    }

    #[tokio::test]
    async fn missing_project_color_gets_the_default() {
        let store = MemoryRecordStore::new();
        store
            .upsert_project(ProjectRow {
                id: 1,
                user_id: "alice".into(),
                name: "Groceries".into(),
                created_at: Utc::now(),
                color: None,
            })
            .await
            .unwrap();
        let records = RemoteRecords::new(Arc::new(store));
        let projects = records.get_projects("alice").await;
        assert_eq!(projects[0].color, DEFAULT_COLOR);
    }

    #[tokio::test]
    async fn upsert_replaces_whole_record() {
        let store = Arc::new(MemoryRecordStore::new());
        let records = RemoteRecords::new(store);
        let mut task = task_at(1, 0, "alice");
        records.save_task(&task).await.unwrap();
        task.completed = true;
        let saved = records.save_task(&task).await.unwrap();
        assert!(saved.completed);
        let tasks = records.get_tasks("alice").await;
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].completed);
    }
}
