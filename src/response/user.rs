use crate::{serialize::string_or_number, types::UserId};
use serde::{Deserialize, Serialize};

/// A user on the other side of a trade.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user's display name.
    pub display_name: String,
    /// The user's ID.
    #[serde(deserialize_with = "string_or_number")]
    pub id: UserId,
}
