//! Task status polling.
//!
//! After a message or task submission returns a task id, the poller fetches
//! status on a fixed cadence until the task resolves, fails, or the attempt
//! ceiling is reached. The poll chain is owned through an explicit handle
//! with `cancel()`; nothing is coupled to UI lifecycle.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::PlatformClient;
use crate::logging;
use crate::modules::tasks;

/// Fixed poll cadence.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Poll ceiling; with the 5 s cadence this is roughly five minutes.
pub const MAX_ATTEMPTS: u32 = 60;

/// User-facing copy for the exhausted-ceiling case. Distinct from failure.
pub const TIMEOUT_MESSAGE: &str = "Response timeout. Please try again.";

const FETCH_FAILED_MESSAGE: &str = "Sorry, something went wrong while checking the task status.";

// === Types ===

/// Poll parameters. Production code uses the defaults; tests shrink the
/// cadence to keep runs fast.
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

/// One update from the poll chain. Terminal variants end the chain; exactly
/// one terminal update is delivered per poll (unless cancelled first).
#[derive(Debug, Clone, PartialEq)]
pub enum PollUpdate {
    /// Non-terminal status observed; nothing to change besides the attempt
    /// counter.
    Running { attempt: u32 },
    /// Task finished; carries the final content.
    Completed { content: String },
    /// Task failed, or the status fetch itself errored.
    Failed { message: String },
    /// Attempt ceiling reached without a terminal status.
    TimedOut,
}

impl PollUpdate {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollUpdate::Running { .. })
    }
}

/// Handle owning a running poll chain.
///
/// Dropping the handle does not stop the chain; cancellation is always
/// explicit via [`PollHandle::cancel`].
pub struct PollHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop the poll chain. In-flight fetches are abandoned; no further
    /// updates are delivered.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Wait for the poll chain to finish (terminal update sent or cancelled).
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

// === Polling ===

/// Start polling `task_id`. Updates arrive on the returned receiver; the
/// chain ends after the first terminal update or on `cancel()`.
pub fn spawn(
    client: PlatformClient,
    task_id: String,
    settings: PollSettings,
) -> (PollHandle, mpsc::UnboundedReceiver<PollUpdate>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let token = CancellationToken::new();
    let poll_token = token.clone();

    let task = tokio::spawn(async move {
        run_poll_loop(&client, &task_id, &settings, &poll_token, &sender).await;
    });

    (PollHandle { token, task }, receiver)
}

async fn run_poll_loop(
    client: &PlatformClient,
    task_id: &str,
    settings: &PollSettings,
    token: &CancellationToken,
    sender: &mpsc::UnboundedSender<PollUpdate>,
) {
    for attempt in 1..=settings.max_attempts {
        tokio::select! {
            () = token.cancelled() => return,
            () = tokio::time::sleep(settings.interval) => {}
        }

        let status = match tasks::status(client, task_id).await {
            Ok(status) => status,
            Err(err) => {
                // A failed fetch is terminal; only the absence of a terminal
                // task status drives re-polling, never transport retries.
                logging::error(format!("Status fetch for task {task_id} failed: {err}"));
                let _ = sender.send(PollUpdate::Failed {
                    message: FETCH_FAILED_MESSAGE.to_string(),
                });
                return;
            }
        };

        if status.status.is_success() {
            let _ = sender.send(PollUpdate::Completed {
                content: status.final_content().unwrap_or_default(),
            });
            return;
        }
        if status.status.is_failure() {
            let error = status.error.unwrap_or_else(|| "unknown error".to_string());
            let _ = sender.send(PollUpdate::Failed {
                message: format!("Sorry, the agent run failed: {error}"),
            });
            return;
        }

        logging::info(format!(
            "Task {task_id} still {:?} (attempt {attempt} of {})",
            status.status, settings.max_attempts
        ));
        let _ = sender.send(PollUpdate::Running { attempt });
    }

    let _ = sender.send(PollUpdate::TimedOut);
}
