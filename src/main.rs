use strrev_trade_notifier::{
    Config,
    DesktopNotifier,
    IconCache,
    TradeAPI,
    api::{FALLBACK_ICON_PATH, TRADES_PAGE_PATH},
    polling::{create_poller, Poll, Poller},
};
use std::sync::Arc;
use env_logger::Env;

/// Cached avatars older than this are deleted on start-up.
const ICON_MAX_AGE_DAYS: i64 = 7;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let api = TradeAPI::builder()
        .hostname(config.hostname.as_str())
        .api_path(config.api_path.as_str())
        .build()?;

    api.set_cookies(&config.cookies);

    let icons = IconCache::new(api.clone(), config.icon_directory());

    if let Err(error) = icons.prune(chrono::Duration::days(ICON_MAX_AGE_DAYS)).await {
        log::warn!("Failed to prune cached icons: {error}");
    }

    let notifier = DesktopNotifier::new(icons);
    let poller = Poller::new(Arc::new(api.clone()), Arc::new(notifier))
        .fallback_icon(api.get_url(FALLBACK_ICON_PATH)?)
        .trades_url(api.get_url(TRADES_PAGE_PATH)?);
    let mut polling = create_poller(poller, config.poll_options);

    log::info!(
        "Checking for new trades on {} every {} seconds",
        config.hostname,
        config.poll_options.poll_interval.num_seconds(),
    );

    while let Some(poll) = polling.receiver.recv().await {
        match poll {
            Ok(Poll::Notified { notification, .. }) => {
                log::info!("{}: {}", notification.title, notification.body);
            },
            Ok(Poll::Suppressed { summary, permission, .. }) => {
                log::warn!("Trade {} received but notification permission is {permission}", summary.tradeid);
            },
            Ok(Poll::NoNewTrade(reason)) => {
                log::debug!("No new trade: {reason}");
            },
            Err(error) => {
                log::error!("Failed to show notification: {error}");
            },
        }
    }

    Ok(())
}
