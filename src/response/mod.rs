//! Models for responses.

mod trade;
mod user;

pub use trade::{Trade, Offer, Asset, TradeSummary};
pub use user::User;
