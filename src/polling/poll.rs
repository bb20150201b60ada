use crate::error::Error;
use crate::notifier::{Notification, Permission};
use crate::response::TradeSummary;
use strum_macros::Display;

/// The outcome of a poll.
#[derive(Debug, Clone, PartialEq)]
pub enum Poll {
    /// There is no trade to notify about.
    NoNewTrade(NoTradeReason),
    /// A notification was shown for a trade.
    Notified {
        /// The trade.
        summary: TradeSummary,
        /// The notification that was shown.
        notification: Notification,
    },
    /// A trade was found but notifications are not permitted.
    Suppressed {
        /// The trade.
        summary: TradeSummary,
        /// The notification that would have been shown.
        notification: Notification,
        /// The permission at the time of the poll.
        permission: Permission,
    },
}

impl Poll {
    /// The notification that was shown, if any.
    pub fn notification(&self) -> Option<&Notification> {
        match self {
            Self::Notified { notification, .. } => Some(notification),
            _ => None,
        }
    }
}

/// Why a poll did not find a trade.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoTradeReason {
    /// The inbound count was zero or could not be fetched.
    #[strum(serialize = "no inbound trades")]
    NoInboundTrades,
    /// The latest inbound trade ID was missing or could not be fetched.
    #[strum(serialize = "no inbound trade ID")]
    NoTradeId,
    /// The trade details could not be fetched.
    #[strum(serialize = "trade details unavailable")]
    DetailsUnavailable,
}

/// The result of a poll. Failed lookups are never errors; only a failure to show a
/// notification is.
pub type PollResult = Result<Poll, Error>;
