//! Types for common values in Strrev responses.

/// An ID of a trade. Trade IDs may be sent as numbers or strings and are always stored as
/// strings.
pub type TradeId = String;
/// An ID of a user.
pub type UserId = String;
/// A "recent average price" valuation.
pub type Rap = f64;

// Types internally used by the crate.
use reqwest_middleware::ClientWithMiddleware;

pub(crate) type HttpClient = ClientWithMiddleware;
