use async_trait::async_trait;

use crate::host::{NotificationHost, NotificationOptions};

/// Notification host that prints to the terminal. Used by `gd watch`; an
/// embedding shell with a native notification surface injects its own host
/// instead.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

#[async_trait]
impl NotificationHost for TerminalNotifier {
    async fn request_display(&self, title: &str, options: NotificationOptions) {
        log::info!("notification displayed (tag {})", options.tag);
        println!("[!] {}: {}", title, options.body);
    }
}
