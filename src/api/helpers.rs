use super::response::{InboundTradesResponse, ThumbnailsResponse};
use crate::error::{Error, ParameterError};
use crate::types::TradeId;
use url::Url;

/// Joins the site hostname with an API prefix, e.g. `https://www.strrev.com` and `/apisite`.
pub fn api_base_url(hostname: &Url, api_path: &str) -> String {
    format!(
        "{}/{}",
        hostname.as_str().trim_end_matches('/'),
        api_path.trim_matches('/'),
    )
}

/// Resolves an image URL from the thumbnails API against the site hostname. Relative URLs are
/// made absolute; absolute URLs are returned unchanged.
pub fn resolve_image_url(hostname: &Url, image_url: &str) -> Result<String, ParameterError> {
    let url = hostname.join(image_url)?;

    Ok(url.into())
}

/// The most recent trade in a page of inbound trades.
pub fn latest_tradeid(body: InboundTradesResponse) -> Option<TradeId> {
    body.data
        .into_iter()
        .next()
        .map(|trade| trade.id)
        .filter(|id| !id.is_empty())
}

/// The first image URL in a thumbnails response.
pub fn first_image_url(body: ThumbnailsResponse) -> Result<String, Error> {
    body.data
        .into_iter()
        .next()
        .ok_or_else(|| Error::Response("No thumbnails in response".into()))?
        .image_url
        .filter(|image_url| !image_url.is_empty())
        .ok_or_else(|| Error::Response("Thumbnail has no image URL".into()))
}
