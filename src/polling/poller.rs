use super::{NoTradeReason, Poll, PollResult};
use crate::api::{TradeSource, DEFAULT_HOSTNAME, FALLBACK_ICON_PATH, TRADES_PAGE_PATH};
use crate::notifier::{Notification, Notifier, Permission};
use crate::response::TradeSummary;
use std::sync::Arc;

/// Checks for new inbound trades and notifies about the latest one.
pub struct Poller {
    source: Arc<dyn TradeSource>,
    notifier: Arc<dyn Notifier>,
    /// Icon to use when the avatar cannot be fetched.
    fallback_icon: String,
    /// Page opened when the notification is clicked.
    trades_url: String,
}

impl Poller {
    /// Creates a new [`Poller`] using the default site links.
    pub fn new(
        source: Arc<dyn TradeSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            source,
            notifier,
            fallback_icon: format!("{DEFAULT_HOSTNAME}{FALLBACK_ICON_PATH}"),
            trades_url: format!("{DEFAULT_HOSTNAME}{TRADES_PAGE_PATH}"),
        }
    }

    /// The icon to use when the avatar cannot be fetched.
    pub fn fallback_icon(mut self, fallback_icon: String) -> Self {
        self.fallback_icon = fallback_icon;
        self
    }

    /// The page opened when a notification is clicked.
    pub fn trades_url(mut self, trades_url: String) -> Self {
        self.trades_url = trades_url;
        self
    }

    /// Requests notification permission if it has not been requested yet.
    pub async fn request_permission(&self) -> Permission {
        match self.notifier.permission() {
            Permission::Default => {
                let permission = self.notifier.request_permission().await;

                log::info!("Notification permission {permission}");
                permission
            },
            permission => permission,
        }
    }

    /// Performs a poll: looks up the latest inbound trade and shows a notification for it.
    /// Every poll notifies about the latest trade, even if the same trade was notified
    /// about before.
    pub async fn do_poll(&self) -> PollResult {
        let (summary, notification) = match self.check_for_new_trade().await {
            Ok(found) => found,
            Err(reason) => {
                log::debug!("No trade to notify: {reason}");
                return Ok(Poll::NoNewTrade(reason));
            },
        };
        let permission = self.notifier.permission();

        if permission != Permission::Granted {
            log::debug!("Notification permission is {permission}, not notifying for trade {}", summary.tradeid);
            return Ok(Poll::Suppressed {
                summary,
                notification,
                permission,
            });
        }

        self.notifier.notify(&notification).await?;
        log::info!("Notified of trade {} from {}", summary.tradeid, summary.display_name);

        Ok(Poll::Notified {
            summary,
            notification,
        })
    }

    /// Runs the lookups in order, stopping at the first one that yields nothing.
    async fn check_for_new_trade(&self) -> Result<(TradeSummary, Notification), NoTradeReason> {
        let count = self.source.get_inbound_count().await
            .unwrap_or_else(|error| {
                log::error!("Failed to fetch inbound count: {error}");
                0
            });

        if count <= 0 {
            return Err(NoTradeReason::NoInboundTrades);
        }

        let tradeid = match self.source.get_latest_inbound_trade_id().await {
            Ok(Some(tradeid)) => tradeid,
            Ok(None) => return Err(NoTradeReason::NoTradeId),
            Err(error) => {
                log::error!("Failed to fetch inbound trade ID: {error}");
                return Err(NoTradeReason::NoTradeId);
            },
        };
        let summary = match self.source.get_trade(&tradeid).await
            .and_then(|trade| trade.summary())
        {
            Ok(summary) => summary,
            Err(error) => {
                log::error!("Failed to fetch trade details for {tradeid}: {error}");
                return Err(NoTradeReason::DetailsUnavailable);
            },
        };
        let icon = match self.source.get_avatar_url(&summary.user_id).await {
            Ok(icon) => icon,
            Err(error) => {
                log::error!("Failed to fetch headshot for {}: {error}", summary.user_id);
                self.fallback_icon.clone()
            },
        };
        let notification = Notification::from_summary(
            &summary,
            icon,
            self.trades_url.clone(),
        );

        Ok((summary, notification))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polling::test_helpers::{bob_trade, MockNotifier, MockSource};

    const FALLBACK_ICON: &str = "https://www.strrev.com/img/logo_R.svg";

    fn poller(source: &Arc<MockSource>, notifier: &Arc<MockNotifier>) -> Poller {
        Poller::new(source.clone(), notifier.clone())
    }

    #[tokio::test]
    async fn zero_count_stops_poll() {
        let source = Arc::new(MockSource::with_count(Ok(0)));
        let notifier = Arc::new(MockNotifier::granted());
        let poll = poller(&source, &notifier).do_poll().await.unwrap();

        assert_eq!(poll, Poll::NoNewTrade(NoTradeReason::NoInboundTrades));
        assert_eq!(source.calls(), (1, 0, 0, 0));
        assert!(notifier.shown().is_empty());
    }

    #[tokio::test]
    async fn negative_or_failed_count_stops_poll() {
        for count in [Ok(-1), Err(())] {
            let source = Arc::new(MockSource::with_count(count));
            let notifier = Arc::new(MockNotifier::granted());
            let poll = poller(&source, &notifier).do_poll().await.unwrap();

            assert_eq!(poll, Poll::NoNewTrade(NoTradeReason::NoInboundTrades));
            assert_eq!(source.calls(), (1, 0, 0, 0));
            assert!(notifier.shown().is_empty());
        }
    }

    #[tokio::test]
    async fn missing_tradeid_stops_poll() {
        for tradeid in [Ok(None), Err(())] {
            let mut source = MockSource::bob();

            source.tradeid = tradeid;

            let source = Arc::new(source);
            let notifier = Arc::new(MockNotifier::granted());
            let poll = poller(&source, &notifier).do_poll().await.unwrap();

            assert_eq!(poll, Poll::NoNewTrade(NoTradeReason::NoTradeId));
            assert_eq!(source.calls(), (1, 1, 0, 0));
            assert!(notifier.shown().is_empty());
        }
    }

    #[tokio::test]
    async fn failed_details_stop_poll() {
        let mut source = MockSource::bob();

        source.trade = Err(());

        let source = Arc::new(source);
        let notifier = Arc::new(MockNotifier::granted());
        let poll = poller(&source, &notifier).do_poll().await.unwrap();

        assert_eq!(poll, Poll::NoNewTrade(NoTradeReason::DetailsUnavailable));
        assert_eq!(source.calls(), (1, 1, 1, 0));
        assert!(notifier.shown().is_empty());
    }

    #[tokio::test]
    async fn trade_with_one_offer_stops_poll() {
        let mut source = MockSource::bob();
        let mut trade = bob_trade();

        trade.offers.truncate(1);
        source.trade = Ok(trade);

        let source = Arc::new(source);
        let notifier = Arc::new(MockNotifier::granted());
        let poll = poller(&source, &notifier).do_poll().await.unwrap();

        assert_eq!(poll, Poll::NoNewTrade(NoTradeReason::DetailsUnavailable));
        assert!(notifier.shown().is_empty());
    }

    #[tokio::test]
    async fn notifies_received_trade() {
        let source = Arc::new(MockSource::bob());
        let notifier = Arc::new(MockNotifier::granted());
        let poll = poller(&source, &notifier).do_poll().await.unwrap();
        let shown = notifier.shown();

        assert_eq!(source.calls(), (1, 1, 1, 1));
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, "Trade received from Bob!");
        assert_eq!(shown[0].body, "150 RAP vs 200 RAP");
        assert_eq!(shown[0].icon, "https://www.strrev.com/img/u1.png");
        assert_eq!(shown[0].click_url, "https://www.strrev.com/My/Trades.aspx");
        assert_eq!(poll.notification(), Some(&shown[0]));
        assert_eq!(source.avatar_user_ids(), vec![String::from("U1")]);
    }

    #[tokio::test]
    async fn failed_avatar_uses_fallback_icon() {
        let mut source = MockSource::bob();

        source.avatar = Err(());

        let source = Arc::new(source);
        let notifier = Arc::new(MockNotifier::granted());

        poller(&source, &notifier).do_poll().await.unwrap();

        let shown = notifier.shown();

        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, "Trade received from Bob!");
        assert_eq!(shown[0].body, "150 RAP vs 200 RAP");
        assert_eq!(shown[0].icon, FALLBACK_ICON);
    }

    #[tokio::test]
    async fn uses_configured_links() {
        let mut source = MockSource::bob();

        source.avatar = Err(());

        let source = Arc::new(source);
        let notifier = Arc::new(MockNotifier::granted());

        poller(&source, &notifier)
            .fallback_icon(String::from("http://localhost/icon.svg"))
            .trades_url(String::from("http://localhost/trades"))
            .do_poll()
            .await
            .unwrap();

        let shown = notifier.shown();

        assert_eq!(shown[0].icon, "http://localhost/icon.svg");
        assert_eq!(shown[0].click_url, "http://localhost/trades");
    }

    #[tokio::test]
    async fn repeated_polls_notify_again() {
        let source = Arc::new(MockSource::bob());
        let notifier = Arc::new(MockNotifier::granted());
        let poller = poller(&source, &notifier);

        poller.do_poll().await.unwrap();
        poller.do_poll().await.unwrap();

        let shown = notifier.shown();

        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0], shown[1]);
    }

    #[tokio::test]
    async fn denied_permission_suppresses_notification() {
        let source = Arc::new(MockSource::bob());
        let notifier = Arc::new(MockNotifier::new(Permission::Denied));
        let poll = poller(&source, &notifier).do_poll().await.unwrap();

        assert!(matches!(poll, Poll::Suppressed { permission: Permission::Denied, .. }));
        assert!(notifier.shown().is_empty());
    }

    #[tokio::test]
    async fn notifier_failure_is_returned() {
        let source = Arc::new(MockSource::bob());
        let notifier = Arc::new(MockNotifier::failing());
        let poll = poller(&source, &notifier).do_poll().await;

        assert!(poll.is_err());
    }

    #[tokio::test]
    async fn requests_permission_only_when_default() {
        let source = Arc::new(MockSource::bob());
        let notifier = Arc::new(MockNotifier::new(Permission::Default));
        let poller = poller(&source, &notifier);

        assert_eq!(poller.request_permission().await, Permission::Granted);
        assert_eq!(poller.request_permission().await, Permission::Granted);
        assert_eq!(notifier.permission_requests(), 1);

        let notifier = Arc::new(MockNotifier::new(Permission::Denied));
        let poller = Poller::new(source.clone(), notifier.clone());

        assert_eq!(poller.request_permission().await, Permission::Denied);
        assert_eq!(notifier.permission_requests(), 0);
    }
}
