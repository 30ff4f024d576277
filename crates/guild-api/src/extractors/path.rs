//! Path parameter types
//!
//! Axum deserializes the raw segments; the accessors parse them into
//! Snowflakes so a malformed ID becomes a 400 with a stable error code.

use guild_core::Snowflake;
use serde::Deserialize;

use crate::response::ApiError;

/// Segment standing for the authenticated user
const ME: &str = "@me";

fn parse_id(raw: &str, name: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

/// `/guilds/{guild_id}/...`
#[derive(Debug, Deserialize)]
pub struct GuildIdPath {
    pub guild_id: String,
}

impl GuildIdPath {
    pub fn guild_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.guild_id, "guild_id")
    }
}

/// `/guilds/{guild_id}/members/{user_id}/...`; `user_id` may be `@me`
#[derive(Debug, Deserialize)]
pub struct GuildMemberPath {
    pub guild_id: String,
    pub user_id: String,
}

impl GuildMemberPath {
    pub fn guild_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.guild_id, "guild_id")
    }

    /// Target user, resolving `@me` to the caller
    pub fn user_id(&self, me: Snowflake) -> Result<Snowflake, ApiError> {
        if self.user_id == ME {
            Ok(me)
        } else {
            parse_id(&self.user_id, "user_id")
        }
    }
}

/// `/loot-sales/{sale_id}/...`
#[derive(Debug, Deserialize)]
pub struct SaleIdPath {
    pub sale_id: String,
}

impl SaleIdPath {
    pub fn sale_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.sale_id, "sale_id")
    }
}

/// `/loot-sales/{sale_id}/bids/{bid_id}`
#[derive(Debug, Deserialize)]
pub struct SaleBidPath {
    pub sale_id: String,
    pub bid_id: String,
}

impl SaleBidPath {
    pub fn sale_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.sale_id, "sale_id")
    }

    pub fn bid_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.bid_id, "bid_id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_path_resolves_me() {
        let path = GuildMemberPath {
            guild_id: "10".to_string(),
            user_id: "@me".to_string(),
        };
        assert_eq!(path.user_id(Snowflake::new(42)).unwrap(), Snowflake::new(42));
        assert_eq!(path.guild_id().unwrap(), Snowflake::new(10));
    }

    #[test]
    fn test_malformed_id_is_bad_request() {
        let path = SaleBidPath {
            sale_id: "1".to_string(),
            bid_id: "abc".to_string(),
        };
        let err = path.bid_id().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PATH_PARAMETER");
        assert!(err.to_string().contains("bid_id"));
    }
}
