use std::sync::Arc;

use crate::host::{InstallOutcome, InstallPrompt};

/// Install banner driven by the host's "can install" event. Holds the
/// deferred prompt handed over with the event; a shown prompt is consumed
/// whatever the user chose.
#[derive(Default)]
pub struct InstallBanner {
    visible: bool,
    deferred: Option<Arc<dyn InstallPrompt>>,
}

impl InstallBanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Host raised the can-install event with its deferred prompt
    pub fn on_can_install(&mut self, prompt: Arc<dyn InstallPrompt>) {
        self.deferred = Some(prompt);
        self.visible = true;
    }

    /// User dismissed the banner without prompting
    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    /// Trigger the host prompt and wait for the user's choice. The deferred
    /// prompt is single-use; the banner hides only on acceptance.
    pub async fn install(&mut self) -> Option<InstallOutcome> {
        let prompt = self.deferred.take()?;
        prompt.prompt().await;
        let outcome = prompt.user_choice().await;
        if outcome == InstallOutcome::Accepted {
            self.visible = false;
        }
        Some(outcome)
    }
}
