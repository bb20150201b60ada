mod poll;
mod poll_action;
mod poller;
#[cfg(test)]
pub(crate) mod test_helpers;

pub use poll::{Poll, PollResult, NoTradeReason};
pub use poll_action::PollAction;
pub use poller::Poller;

use std::sync::Arc;
use chrono::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

const DEFAULT_POLL_INTERVAL_MINUTES: i64 = 30;

/// Options for polling.
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    /// Interval to poll at. Default is 30 minutes.
    pub poll_interval: Duration,
    /// Whether to poll as soon as polling starts. By default the first poll happens one
    /// interval after polling starts.
    pub poll_immediately: bool,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::minutes(DEFAULT_POLL_INTERVAL_MINUTES),
            poll_immediately: false,
        }
    }
}

impl PollOptions {
    /// The poll interval as a [`std::time::Duration`]. Zero or negative intervals fall back to
    /// the default.
    fn poll_interval(&self) -> std::time::Duration {
        match self.poll_interval.to_std() {
            Ok(interval) if !interval.is_zero() => interval,
            _ => {
                log::warn!("Invalid poll interval {}, using the default", self.poll_interval);
                std::time::Duration::from_secs(DEFAULT_POLL_INTERVAL_MINUTES as u64 * 60)
            },
        }
    }
}

/// The channels and task handle for a running poller.
#[derive(Debug)]
pub struct PollingMpsc {
    /// Allows sending actions into the poller.
    pub sender: mpsc::Sender<PollAction>,
    /// Receives the result of every poll. Dropping it stops polling.
    pub receiver: mpsc::Receiver<PollResult>,
    /// The polling task.
    pub handle: JoinHandle<()>,
}

/// Starts polling. Permission to show notifications is requested once before the first poll
/// if it has not been requested yet.
///
/// Each poll runs in its own task and the timer does not wait for the previous poll to
/// complete, so a slow poll may overlap with the next one.
pub fn create_poller(
    poller: Poller,
    options: PollOptions,
) -> PollingMpsc {
    // Allows sending a message into the poller.
    let (
        tx,
        mut rx,
    ) = mpsc::channel::<PollAction>(10);
    // Allows broadcasting polls outside of the poller.
    let (
        polling_tx,
        polling_rx,
    ) = mpsc::channel::<PollResult>(10);
    let poller = Arc::new(poller);
    let handle = tokio::spawn(async move {
        poller.request_permission().await;

        let poll_interval = options.poll_interval();
        let start = if options.poll_immediately {
            Instant::now()
        } else {
            Instant::now() + poll_interval
        };
        let mut interval = time::interval_at(start, poll_interval);
        // To prevent spam.
        let mut last_manual_poll: Option<Instant> = None;
        let mut actions_open = true;

        // Avoids a burst of polls after the system wakes from sleep.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    spawn_poll(&poller, &polling_tx);
                },
                message = rx.recv(), if actions_open => match message {
                    Some(PollAction::DoPoll) => {
                        let now = Instant::now();
                        // Last called within the last half a second.
                        let called_too_recently = last_manual_poll
                            .map(|last_poll| now - last_poll < std::time::Duration::from_millis(500))
                            .unwrap_or(false);

                        if called_too_recently {
                            log::debug!("Ignoring poll requested too recently");
                            continue;
                        }

                        last_manual_poll = Some(now);
                        spawn_poll(&poller, &polling_tx);
                    },
                    Some(PollAction::StopPolling) => break,
                    // All senders were dropped; keep polling on the timer.
                    None => actions_open = false,
                },
                // They closed the connection.
                _ = polling_tx.closed() => break,
            }
        }

        log::debug!("Polling stopped");
    });

    PollingMpsc {
        sender: tx,
        receiver: polling_rx,
        handle,
    }
}

fn spawn_poll(
    poller: &Arc<Poller>,
    polling_tx: &mpsc::Sender<PollResult>,
) {
    let poller = Arc::clone(poller);
    let polling_tx = polling_tx.clone();

    tokio::spawn(async move {
        let poll = poller.do_poll().await;

        if let Err(error) = &poll {
            log::error!("Poll failed: {error}");
        }

        // The receiver may have been dropped while polling.
        let _ = polling_tx.send(poll).await;
    });
}
