use super::{IconCache, Notification, Notifier, Permission};
use crate::error::Error;
use std::path::PathBuf;
use std::sync::RwLock;
#[cfg(all(unix, not(target_os = "macos")))]
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;

const APP_NAME: &str = "Strrev Trade Notifier";
#[cfg(all(unix, not(target_os = "macos")))]
const DEFAULT_ACTION: &str = "default";
/// The most notifications waiting for a click at once. Each one holds a thread until it is
/// closed, so past this the trades link is shown in the body instead.
#[cfg(all(unix, not(target_os = "macos")))]
const MAX_ACTION_LISTENERS: usize = 4;

#[cfg(all(unix, not(target_os = "macos")))]
static ACTION_LISTENERS: ActionListeners = ActionListeners::new(MAX_ACTION_LISTENERS);

/// Shows notifications through the desktop's notification service.
#[derive(Debug)]
pub struct DesktopNotifier {
    icons: IconCache,
    permission: RwLock<Permission>,
}

impl DesktopNotifier {
    /// Creates a new [`DesktopNotifier`]. Icons are downloaded through `icons`.
    pub fn new(icons: IconCache) -> Self {
        Self {
            icons,
            permission: RwLock::new(Permission::Default),
        }
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    fn permission(&self) -> Permission {
        self.permission
            .read()
            .map(|permission| *permission)
            .unwrap_or(Permission::Denied)
    }

    async fn request_permission(&self) -> Permission {
        let permission = tokio::task::spawn_blocking(query_server)
            .await
            .unwrap_or(Permission::Denied);

        if let Ok(mut current) = self.permission.write() {
            *current = permission;
        }

        permission
    }

    async fn notify(&self, notification: &Notification) -> Result<(), Error> {
        let icon = self.icons.get(&notification.icon).await;
        let notification = notification.clone();

        tokio::task::spawn_blocking(move || show(&notification, icon))
            .await
            .map_err(|error| Error::Notification(error.to_string()))?
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn query_server() -> Permission {
    match notify_rust::get_server_information() {
        Ok(info) => {
            log::debug!("Notification server: {} {}", info.name, info.version);
            Permission::Granted
        },
        Err(error) => {
            log::warn!("No notification server available: {error}");
            Permission::Denied
        },
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn query_server() -> Permission {
    Permission::Granted
}

fn show(notification: &Notification, icon: Option<PathBuf>) -> Result<(), Error> {
    let mut desktop = notify_rust::Notification::new();

    desktop
        .appname(APP_NAME)
        .summary(&notification.title);

    if let Some(icon) = icon.as_deref().and_then(|icon| icon.to_str()) {
        desktop.icon(icon);
    }

    show_with_click_handler(desktop, notification)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn show_with_click_handler(
    mut desktop: notify_rust::Notification,
    notification: &Notification,
) -> Result<(), Error> {
    let Some(slot) = ACTION_LISTENERS.try_acquire() else {
        log::debug!("{MAX_ACTION_LISTENERS} notifications are already waiting for a click");
        return show_with_link(desktop, notification);
    };
    let handle = desktop
        .body(&notification.body)
        .action(DEFAULT_ACTION, "Open trades")
        .show()
        .map_err(|error| Error::Notification(error.to_string()))?;
    let click_url = notification.click_url.clone();

    // Blocks until the notification is closed.
    std::thread::spawn(move || {
        let _slot = slot;

        handle.wait_for_action(|action| {
            if action == DEFAULT_ACTION {
                if let Err(error) = open::that(&click_url) {
                    log::warn!("Failed to open {click_url}: {error}");
                }
            }
        });
    });

    Ok(())
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn show_with_click_handler(
    desktop: notify_rust::Notification,
    notification: &Notification,
) -> Result<(), Error> {
    // Actions are not supported here.
    show_with_link(desktop, notification)
}

fn show_with_link(
    mut desktop: notify_rust::Notification,
    notification: &Notification,
) -> Result<(), Error> {
    desktop
        .body(&format!("{}\n{}", notification.body, notification.click_url))
        .show()
        .map(|_| ())
        .map_err(|error| Error::Notification(error.to_string()))
}

/// Counts the threads waiting on notification actions.
#[cfg(all(unix, not(target_os = "macos")))]
#[derive(Debug)]
struct ActionListeners {
    active: AtomicUsize,
    limit: usize,
}

#[cfg(all(unix, not(target_os = "macos")))]
impl ActionListeners {
    const fn new(limit: usize) -> Self {
        Self {
            active: AtomicUsize::new(0),
            limit,
        }
    }

    /// Takes a slot if fewer than `limit` are taken. The slot is given back when dropped.
    fn try_acquire(&self) -> Option<ListenerSlot<'_>> {
        self.active
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |active| {
                (active < self.limit).then_some(active + 1)
            })
            .ok()?;

        Some(ListenerSlot {
            active: &self.active,
        })
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
#[derive(Debug)]
struct ListenerSlot<'a> {
    active: &'a AtomicUsize,
}

#[cfg(all(unix, not(target_os = "macos")))]
impl Drop for ListenerSlot<'_> {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::AcqRel);
    }
}
