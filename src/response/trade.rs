use crate::{
    error::Error,
    serialize::null_as_zero,
    types::{Rap, TradeId},
};
use super::User;
use serde::{Deserialize, Serialize};

/// A trade with the offers from both parties.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Trade {
    /// The trade ID. Not part of the response body; filled in from the requested ID.
    #[serde(default, skip_deserializing)]
    pub id: TradeId,
    /// The offers in this trade. The first offer is ours, the second is the other party's.
    #[serde(default)]
    pub offers: Vec<Offer>,
    /// The other party.
    pub user: User,
}

impl Trade {
    /// Our offer.
    pub fn our_offer(&self) -> Option<&Offer> {
        self.offers.first()
    }

    /// The other party's offer.
    pub fn their_offer(&self) -> Option<&Offer> {
        self.offers.get(1)
    }

    /// Summarizes the trade for display. Fails if the trade does not have an offer for each
    /// party.
    pub fn summary(&self) -> Result<TradeSummary, Error> {
        match (self.our_offer(), self.their_offer()) {
            (Some(ours), Some(theirs)) => Ok(TradeSummary {
                tradeid: self.id.clone(),
                display_name: self.user.display_name.clone(),
                user_id: self.user.id.clone(),
                user_rap: ours.rap_total(),
                other_rap: theirs.rap_total(),
            }),
            _ => Err(Error::MissingOffers(self.offers.len())),
        }
    }
}

/// One party's side of a trade.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    /// The assets offered.
    #[serde(default)]
    pub user_assets: Vec<Asset>,
}

impl Offer {
    /// The sum of the recent average prices of all assets in this offer.
    pub fn rap_total(&self) -> Rap {
        self.user_assets
            .iter()
            .map(|asset| asset.recent_average_price)
            .sum()
    }
}

/// An asset in an offer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// The recent average price. Assets without a price count as `0`.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub recent_average_price: Rap,
}

/// The values from a [`Trade`] which are shown in a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeSummary {
    /// The trade ID.
    pub tradeid: TradeId,
    /// The other party's display name.
    pub display_name: String,
    /// The other party's user ID.
    pub user_id: String,
    /// RAP total of our offer.
    pub user_rap: Rap,
    /// RAP total of the other party's offer.
    pub other_rap: Rap,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(prices: &[f64]) -> Offer {
        Offer {
            user_assets: prices
                .iter()
                .map(|price| Asset { recent_average_price: *price })
                .collect(),
        }
    }

    fn trade(offers: Vec<Offer>) -> Trade {
        Trade {
            id: String::from("T1"),
            offers,
            user: User {
                display_name: String::from("Bob"),
                id: String::from("U1"),
            },
        }
    }

    #[test]
    fn sums_rap() {
        assert_eq!(offer(&[100.0, 50.0]).rap_total(), 150.0);
        assert_eq!(offer(&[]).rap_total(), 0.0);
    }

    #[test]
    fn summarizes_trade() {
        let summary = trade(vec![offer(&[100.0, 50.0]), offer(&[200.0])]).summary().unwrap();

        assert_eq!(summary.tradeid, "T1");
        assert_eq!(summary.display_name, "Bob");
        assert_eq!(summary.user_id, "U1");
        assert_eq!(summary.user_rap, 150.0);
        assert_eq!(summary.other_rap, 200.0);
    }

    #[test]
    fn summary_requires_two_offers() {
        let error = trade(vec![offer(&[100.0])]).summary().unwrap_err();

        assert!(matches!(error, Error::MissingOffers(1)));
    }

    #[test]
    fn deserializes_trade() {
        let trade: Trade = serde_json::from_str(include_str!("../api/fixtures/trade.json")).unwrap();

        assert_eq!(trade.offers.len(), 2);
        assert_eq!(trade.offers[0].user_assets.len(), 2);
        assert_eq!(trade.offers[0].rap_total(), 150.0);
        assert_eq!(trade.offers[1].rap_total(), 200.0);
        assert_eq!(trade.user.display_name, "Bob");
        assert_eq!(trade.user.id, "U1");
        // the id comes from the request, not the body
        assert!(trade.id.is_empty());
    }

    #[test]
    fn deserializes_numeric_user_id_and_null_price() {
        let json = r#"{
            "offers": [
                {"userAssets": [{"recentAveragePrice": null, "assetId": 1}]},
                {"userAssets": [{"recentAveragePrice": 12.5}]}
            ],
            "user": {"displayName": "Alice", "id": 42}
        }"#;
        let trade: Trade = serde_json::from_str(json).unwrap();
        let summary = trade.summary().unwrap();

        assert_eq!(summary.user_id, "42");
        assert_eq!(summary.user_rap, 0.0);
        assert_eq!(summary.other_rap, 12.5);
    }
}
