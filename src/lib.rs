//! Desktop notifications for new trade offers on [Strrev](https://www.strrev.com).
//!
//! The [`polling::Poller`] checks the inbound trade count, looks up the latest inbound trade
//! and its counterparty's avatar, then shows a notification summarizing the RAP on each side.
//! [`polling::create_poller`] runs it on a timer.
//!
//! ```no_run
//! use strrev_trade_notifier::{TradeAPI, DesktopNotifier, IconCache};
//! use strrev_trade_notifier::polling::{create_poller, Poller, PollOptions};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), strrev_trade_notifier::error::Error> {
//! let api = TradeAPI::new()?;
//!
//! api.set_cookies(&[String::from(".ROBLOSECURITY=...")]);
//!
//! let notifier = DesktopNotifier::new(IconCache::new(api.clone(), "icons"));
//! let poller = Poller::new(Arc::new(api), Arc::new(notifier));
//! let mut polling = create_poller(poller, PollOptions::default());
//!
//! while let Some(poll) = polling.receiver.recv().await {
//!     println!("{poll:?}");
//! }
//! # Ok(())
//! # }
//! ```

mod helpers;
mod serialize;

pub mod api;
pub mod config;
pub mod error;
pub mod notifier;
pub mod polling;
pub mod response;
pub mod types;

pub use api::{TradeAPI, TradeSource};
pub use config::Config;
pub use notifier::{DesktopNotifier, IconCache, Notification, Notifier, Permission};
pub use helpers::parse_cookies;
