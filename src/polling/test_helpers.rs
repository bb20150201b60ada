//! In-memory lookups and notifier for testing polls.

use crate::api::TradeSource;
use crate::error::Error;
use crate::notifier::{Notification, Notifier, Permission};
use crate::response::{Asset, Offer, Trade, User};
use crate::types::{TradeId, UserId};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;

fn offer(prices: &[f64]) -> Offer {
    Offer {
        user_assets: prices
            .iter()
            .map(|price| Asset { recent_average_price: *price })
            .collect(),
    }
}

/// The trade from Bob: 100 + 50 RAP for 200 RAP.
pub fn bob_trade() -> Trade {
    Trade {
        id: String::from("T1"),
        offers: vec![offer(&[100.0, 50.0]), offer(&[200.0])],
        user: User {
            display_name: String::from("Bob"),
            id: String::from("U1"),
        },
    }
}

fn failed() -> Error {
    Error::Response("mocked failure".into())
}

/// Responds to lookups with fixed values. `Err(())` makes the lookup fail.
pub struct MockSource {
    pub count: Result<i64, ()>,
    pub tradeid: Result<Option<TradeId>, ()>,
    pub trade: Result<Trade, ()>,
    pub avatar: Result<String, ()>,
    count_calls: AtomicUsize,
    tradeid_calls: AtomicUsize,
    trade_calls: AtomicUsize,
    avatar_calls: Mutex<Vec<UserId>>,
}

impl MockSource {
    /// A source with a pending trade from Bob whose avatar resolves.
    pub fn bob() -> Self {
        Self {
            count: Ok(2),
            tradeid: Ok(Some(String::from("T1"))),
            trade: Ok(bob_trade()),
            avatar: Ok(String::from("https://www.strrev.com/img/u1.png")),
            count_calls: AtomicUsize::new(0),
            tradeid_calls: AtomicUsize::new(0),
            trade_calls: AtomicUsize::new(0),
            avatar_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_count(count: Result<i64, ()>) -> Self {
        Self {
            count,
            ..Self::bob()
        }
    }

    /// Number of calls to the count, ID, detail and avatar lookups.
    pub fn calls(&self) -> (usize, usize, usize, usize) {
        (
            self.count_calls.load(Ordering::SeqCst),
            self.tradeid_calls.load(Ordering::SeqCst),
            self.trade_calls.load(Ordering::SeqCst),
            self.avatar_user_ids().len(),
        )
    }

    pub fn avatar_user_ids(&self) -> Vec<UserId> {
        self.avatar_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TradeSource for MockSource {
    async fn get_inbound_count(&self) -> Result<i64, Error> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.count.map_err(|_| failed())
    }

    async fn get_latest_inbound_trade_id(&self) -> Result<Option<TradeId>, Error> {
        self.tradeid_calls.fetch_add(1, Ordering::SeqCst);
        self.tradeid.clone().map_err(|_| failed())
    }

    async fn get_trade(&self, tradeid: &TradeId) -> Result<Trade, Error> {
        self.trade_calls.fetch_add(1, Ordering::SeqCst);
        self.trade
            .clone()
            .map(|mut trade| {
                trade.id = tradeid.clone();
                trade
            })
            .map_err(|_| failed())
    }

    async fn get_avatar_url(&self, user_id: &UserId) -> Result<String, Error> {
        self.avatar_calls.lock().unwrap().push(user_id.clone());
        self.avatar.clone().map_err(|_| failed())
    }
}

/// Records notifications instead of showing them.
pub struct MockNotifier {
    permission: Mutex<Permission>,
    shown: Mutex<Vec<Notification>>,
    permission_requests: AtomicUsize,
    fails: bool,
}

impl MockNotifier {
    /// A notifier with `permission`. Requesting permission grants it.
    pub fn new(permission: Permission) -> Self {
        Self {
            permission: Mutex::new(permission),
            shown: Mutex::new(Vec::new()),
            permission_requests: AtomicUsize::new(0),
            fails: false,
        }
    }

    pub fn granted() -> Self {
        Self::new(Permission::Granted)
    }

    /// A notifier that fails to show notifications.
    pub fn failing() -> Self {
        Self {
            fails: true,
            ..Self::granted()
        }
    }

    pub fn shown(&self) -> Vec<Notification> {
        self.shown.lock().unwrap().clone()
    }

    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn permission(&self) -> Permission {
        *self.permission.lock().unwrap()
    }

    async fn request_permission(&self) -> Permission {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);

        let mut permission = self.permission.lock().unwrap();

        if *permission == Permission::Default {
            *permission = Permission::Granted;
        }

        *permission
    }

    async fn notify(&self, notification: &Notification) -> Result<(), Error> {
        if self.fails {
            return Err(Error::Notification("mocked failure".into()));
        }

        self.shown.lock().unwrap().push(notification.clone());
        Ok(())
    }
}
