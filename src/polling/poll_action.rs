/// An action to send to the polling task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollAction {
    /// Perform a poll now, in addition to the scheduled polls.
    DoPoll,
    /// Stop polling.
    StopPolling,
}
