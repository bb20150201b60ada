//! Raw response bodies for API endpoints.

use crate::serialize::string_or_number;
use crate::types::TradeId;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct InboundCountResponse {
    pub count: i64,
}

#[derive(Deserialize, Debug)]
pub struct InboundTrade {
    #[serde(deserialize_with = "string_or_number")]
    pub id: TradeId,
}

#[derive(Deserialize, Debug)]
pub struct InboundTradesResponse {
    #[serde(default)]
    pub data: Vec<InboundTrade>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    /// Thumbnails which are still being rendered have no URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ThumbnailsResponse {
    #[serde(default)]
    pub data: Vec<Thumbnail>,
}
