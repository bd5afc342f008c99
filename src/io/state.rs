use serde::{Deserialize, Serialize};

use crate::io::gateway::{Gateway, STATE_KEY};
use crate::model::view::ViewType;

/// The active view context. Each CLI invocation is a fresh process, so the
/// context that decides where `add` files a task is persisted through the
/// gateway between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    #[serde(default)]
    pub view: ViewType,
    /// Active project id, meaningful only when `view` is `Project`
    #[serde(default)]
    pub selected_project: Option<i64>,
}

/// Read the persisted view context. Absent or corrupt state falls back to
/// the default (inbox).
pub async fn read_view_state(gateway: &Gateway) -> ViewState {
    match gateway.get(STATE_KEY).await {
        Some(blob) => serde_json::from_str(&blob).unwrap_or_else(|e| {
            log::debug!("corrupt view state, resetting to inbox: {}", e);
            ViewState::default()
        }),
        None => ViewState::default(),
    }
}

/// Persist the view context. Failure is a logged no-op like every other
/// storage failure.
pub async fn write_view_state(gateway: &Gateway, state: &ViewState) {
    match serde_json::to_string(state) {
        Ok(blob) => {
            gateway.set(STATE_KEY, &blob).await;
        }
        Err(e) => log::error!("could not serialize view state: {}", e),
    }
}
