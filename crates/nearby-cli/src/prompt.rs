//! Interactive location permission for terminal sessions.

use std::io::{BufRead, Write};
use std::sync::Mutex;

use futures::future::BoxFuture;
use nearby_core::PermissionSetting;
use nearby_locator::PermissionGate;

/// Asks on stdin the first time permission is needed and remembers the
/// answer for later cycles.
pub struct PromptPermission {
    state: Mutex<PermissionSetting>,
}

impl PromptPermission {
    pub fn new(initial: PermissionSetting) -> Self {
        Self {
            state: Mutex::new(initial),
        }
    }

    fn remember(&self, answer: PermissionSetting) {
        if let Ok(mut state) = self.state.lock() {
            *state = answer;
        }
    }
}

impl PermissionGate for PromptPermission {
    fn status(&self) -> PermissionSetting {
        self.state
            .lock()
            .map_or(PermissionSetting::Denied, |state| *state)
    }

    fn request(&self) -> BoxFuture<'_, PermissionSetting> {
        Box::pin(async move {
            let answer = tokio::task::spawn_blocking(ask_on_terminal)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "permission prompt failed");
                    PermissionSetting::Denied
                });
            self.remember(answer);
            answer
        })
    }
}

fn ask_on_terminal() -> PermissionSetting {
    let mut stderr = std::io::stderr();
    let _ = write!(stderr, "Allow nearby to use your location? [y/N] ");
    let _ = stderr.flush();

    let mut line = String::new();
    if std::io::stdin().lock().read_line(&mut line).is_err() {
        return PermissionSetting::Denied;
    }
    parse_answer(&line)
}

fn parse_answer(line: &str) -> PermissionSetting {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => PermissionSetting::Granted,
        _ => PermissionSetting::Denied,
    }
}
