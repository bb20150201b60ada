//! Notification emission.

mod desktop;
mod icon;

pub use desktop::DesktopNotifier;
pub use icon::IconCache;

use crate::error::Error;
use crate::response::TradeSummary;
use async_trait::async_trait;
use strum_macros::{Display, EnumString};

/// Whether notifications may be shown.
#[derive(Display, EnumString, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Permission {
    /// Permission has not been requested yet.
    Default,
    /// Notifications may be shown.
    Granted,
    /// Notifications may not be shown.
    Denied,
}

/// A notification to show.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// The title.
    pub title: String,
    /// The body text.
    pub body: String,
    /// URL of the icon.
    pub icon: String,
    /// URL to open when the notification is clicked.
    pub click_url: String,
}

impl Notification {
    /// Creates the notification for a received trade.
    pub fn from_summary(
        summary: &TradeSummary,
        icon: String,
        click_url: String,
    ) -> Self {
        Self {
            title: format!("Trade received from {}!", summary.display_name),
            body: format!("{} RAP vs {} RAP", summary.user_rap, summary.other_rap),
            icon,
            click_url,
        }
    }
}

/// Something that can show notifications to the user.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// The current permission.
    fn permission(&self) -> Permission;

    /// Asks for permission to show notifications and returns the resulting permission.
    async fn request_permission(&self) -> Permission;

    /// Shows a notification.
    async fn notify(&self, notification: &Notification) -> Result<(), Error>;
}
