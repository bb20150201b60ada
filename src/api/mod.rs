//! The Strrev web API.

mod builder;
mod helpers;
mod response;

pub use builder::TradeAPIBuilder;

use response::{InboundCountResponse, InboundTradesResponse, ThumbnailsResponse};
use crate::error::{Error, ParameterError};
use crate::helpers::{check_response, parses_response};
use crate::response::Trade;
use crate::types::{HttpClient, TradeId, UserId};
use std::sync::Arc;
use async_trait::async_trait;
use reqwest::cookie::Jar;
use url::Url;

pub(crate) const DEFAULT_HOSTNAME: &str = "https://www.strrev.com";
pub(crate) const DEFAULT_API_PATH: &str = "/apisite";
/// Path of the icon used when an avatar cannot be fetched.
pub const FALLBACK_ICON_PATH: &str = "/img/logo_R.svg";
/// Path of the page listing trades.
pub const TRADES_PAGE_PATH: &str = "/My/Trades.aspx";
const AVATAR_SIZE: &str = "420x420";
const AVATAR_FORMAT: &str = "png";

/// The lookups needed to check for new trades. [`TradeAPI`] implements this over HTTP.
#[async_trait]
pub trait TradeSource: Send + Sync {
    /// Gets the number of pending inbound trades.
    async fn get_inbound_count(&self) -> Result<i64, Error>;

    /// Gets the ID of the most recent inbound trade, or `None` if there are no inbound trades.
    async fn get_latest_inbound_trade_id(&self) -> Result<Option<TradeId>, Error>;

    /// Gets the details of a trade.
    async fn get_trade(&self, tradeid: &TradeId) -> Result<Trade, Error>;

    /// Gets the fully-qualified URL of a user's avatar headshot.
    async fn get_avatar_url(&self, user_id: &UserId) -> Result<String, Error>;
}

/// Makes authenticated requests to the Strrev web API. Authentication is done entirely
/// through the session cookies set on this API.
#[derive(Debug, Clone)]
pub struct TradeAPI {
    /// The client for making requests.
    pub(crate) client: HttpClient,
    /// The cookies to make requests with.
    pub(crate) cookies: Arc<Jar>,
    /// The site root.
    pub(crate) hostname: Url,
    /// The root of API endpoints, without a trailing slash.
    pub(crate) api_url: String,
}

impl TradeAPI {
    /// Creates a new [`TradeAPI`] with the default settings.
    pub fn new() -> Result<Self, Error> {
        Self::builder().build()
    }

    /// Builder for constructing a [`TradeAPI`].
    pub fn builder() -> TradeAPIBuilder {
        TradeAPIBuilder::new()
    }

    /// Gets the URL of a page on the site.
    pub fn get_url(&self, pathname: &str) -> Result<String, Error> {
        let url = self.hostname.join(pathname)
            .map_err(ParameterError::UrlParse)?;

        Ok(url.into())
    }

    fn get_api_url(&self, pathname: &str) -> String {
        format!("{}{}", self.api_url, pathname)
    }

    /// Sets cookies. Each cookie should be in `name=value` form.
    pub fn set_cookies(&self, cookies: &[String]) {
        for cookie_str in cookies {
            self.cookies.add_cookie_str(cookie_str, &self.hostname);
        }
    }

    /// Downloads a file from the site, e.g. an avatar image.
    pub async fn download(&self, url: &str) -> Result<bytes::Bytes, Error> {
        let response = self.client.get(url)
            .send()
            .await?;

        check_response(response).await
    }

    /// Gets the number of pending inbound trades.
    pub async fn get_inbound_count(&self) -> Result<i64, Error> {
        let uri = self.get_api_url("/trades/v1/trades/inbound/count");
        let response = self.client.get(&uri)
            .send()
            .await?;
        let body: InboundCountResponse = parses_response(response).await?;

        Ok(body.count)
    }

    /// Gets the ID of the most recent inbound trade from the first page of inbound trades.
    pub async fn get_latest_inbound_trade_id(&self) -> Result<Option<TradeId>, Error> {
        let uri = self.get_api_url("/trades/v1/trades/inbound");
        let response = self.client.get(&uri)
            .query(&[("cursor", "")])
            .send()
            .await?;
        let body: InboundTradesResponse = parses_response(response).await?;

        Ok(helpers::latest_tradeid(body))
    }

    /// Gets the details of a trade.
    pub async fn get_trade(&self, tradeid: &TradeId) -> Result<Trade, Error> {
        let uri = self.get_api_url(&format!("/trades/v1/trades/{tradeid}"));
        let response = self.client.get(&uri)
            .send()
            .await?;
        let mut trade: Trade = parses_response(response).await?;

        trade.id = tradeid.clone();

        Ok(trade)
    }

    /// Gets the fully-qualified URL of a user's avatar headshot.
    pub async fn get_avatar_url(&self, user_id: &UserId) -> Result<String, Error> {
        let uri = self.get_api_url("/thumbnails/v1/users/avatar-headshot");
        let response = self.client.get(&uri)
            .query(&[
                ("size", AVATAR_SIZE),
                ("format", AVATAR_FORMAT),
                ("userIds", user_id.as_str()),
            ])
            .send()
            .await?;
        let body: ThumbnailsResponse = parses_response(response).await?;
        let image_url = helpers::first_image_url(body)?;
        let url = helpers::resolve_image_url(&self.hostname, &image_url)?;

        Ok(url)
    }
}

#[async_trait]
impl TradeSource for TradeAPI {
    async fn get_inbound_count(&self) -> Result<i64, Error> {
        TradeAPI::get_inbound_count(self).await
    }

    async fn get_latest_inbound_trade_id(&self) -> Result<Option<TradeId>, Error> {
        TradeAPI::get_latest_inbound_trade_id(self).await
    }

    async fn get_trade(&self, tradeid: &TradeId) -> Result<Trade, Error> {
        TradeAPI::get_trade(self, tradeid).await
    }

    async fn get_avatar_url(&self, user_id: &UserId) -> Result<String, Error> {
        TradeAPI::get_avatar_url(self, user_id).await
    }
}
