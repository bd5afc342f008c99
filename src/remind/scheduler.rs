use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::host::{NotificationHost, NotificationOptions};
use crate::model::task::Task;

/// Notification title used for every reminder
pub const REMINDER_TITLE: &str = "Task reminder";

/// Icon passed through to the notification host
pub const REMINDER_ICON: &str = "/logo192.png";

/// The instant a task's reminder should fire: due date minus lead time.
/// `None` when the task can never remind (missing due date or lead time).
pub fn fire_time(task: &Task) -> Option<DateTime<Utc>> {
    let due = task.due_date?;
    let minutes = task.reminder_minutes?;
    Some(due - chrono::Duration::minutes(i64::from(minutes)))
}

/// Arms one cancellable deferred notification per qualifying task.
///
/// Nothing here is persisted: the armed set is recomputed from the task
/// collection on every rescan. A task qualifies while it is incomplete, has
/// both a due date and a lead time, and its fire time is still in the
/// future; a fire time already past is skipped silently, never fired
/// retroactively. Re-arming a task aborts its previous timer before
/// scheduling the new one, and each notification carries a `task-<id>` tag
/// so the host replaces rather than duplicates a still-pending display.
/// Delivery is best-effort: dropping the scheduler (or the process) abandons
/// every pending timer.
pub struct ReminderScheduler {
    host: Arc<dyn NotificationHost>,
    timers: HashMap<i64, JoinHandle<()>>,
}

impl ReminderScheduler {
    pub fn new(host: Arc<dyn NotificationHost>) -> Self {
        ReminderScheduler {
            host,
            timers: HashMap::new(),
        }
    }

    /// Re-evaluate the whole task collection: arm qualifying tasks, disarm
    /// everything else. Call after every create/update/delete.
    pub fn rescan(&mut self, tasks: &[Task]) {
        let now = Utc::now();
        let mut qualifying: HashSet<i64> = HashSet::new();

        for task in tasks {
            if task.completed {
                continue;
            }
            let Some(fire) = fire_time(task) else {
                continue;
            };
            if fire <= now {
                // Already past due at evaluation time
                continue;
            }
            qualifying.insert(task.id);
            self.arm(task, fire - now);
        }

        // Disarm timers whose task no longer qualifies (completed, deleted,
        // or reminder fields cleared)
        let stale: Vec<i64> = self
            .timers
            .keys()
            .filter(|id| !qualifying.contains(id))
            .copied()
            .collect();
        for id in stale {
            self.disarm(id);
        }
    }

    /// Cancel the pending timer for a task, if any
    pub fn disarm(&mut self, id: i64) {
        if let Some(handle) = self.timers.remove(&id) {
            handle.abort();
        }
    }

    /// Number of currently armed timers
    pub fn armed_count(&self) -> usize {
        self.timers.len()
    }

    pub fn is_armed(&self, id: i64) -> bool {
        self.timers.contains_key(&id)
    }

    fn arm(&mut self, task: &Task, delay: chrono::Duration) {
        // Replace any prior timer for the same task
        self.disarm(task.id);

        let delay = delay.to_std().unwrap_or(Duration::ZERO);
        let host = self.host.clone();
        let body = task.text.clone();
        let tag = format!("task-{}", task.id);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            host.request_display(
                REMINDER_TITLE,
                NotificationOptions {
                    body,
                    icon: Some(REMINDER_ICON.to_string()),
                    tag,
                },
            )
            .await;
        });
        self.timers.insert(task.id, handle);
    }

    #[cfg(test)]
    fn timer_mut(&mut self, id: i64) -> Option<&mut JoinHandle<()>> {
        self.timers.get_mut(&id)
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        for handle in self.timers.values() {
            handle.abort();
        }
    }
}
