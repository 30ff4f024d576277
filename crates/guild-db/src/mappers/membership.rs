//! Membership entity <-> model mapper

use guild_core::entities::Membership;
use guild_core::error::DomainError;
use guild_core::value_objects::Snowflake;

use crate::models::MembershipModel;

/// Role and status columns are CHECK-constrained; an unknown value is corruption
impl TryFrom<MembershipModel> for Membership {
    type Error = DomainError;

    fn try_from(model: MembershipModel) -> Result<Self, Self::Error> {
        Ok(Membership {
            id: Snowflake::new(model.id),
            guild_id: Snowflake::new(model.guild_id),
            user_id: Snowflake::new(model.user_id),
            role: model.role.parse()?,
            status: model.status.parse()?,
            balance: model.balance,
            last_seen_balance_at: model.last_seen_balance_at,
            joined_at: model.joined_at,
            updated_at: model.updated_at,
        })
    }
}

/// Membership values for database insertion
pub struct MembershipInsert {
    pub id: i64,
    pub guild_id: i64,
    pub user_id: i64,
    pub role: &'static str,
    pub status: &'static str,
    pub balance: i64,
}

impl MembershipInsert {
    pub fn new(membership: &Membership) -> Self {
        Self {
            id: membership.id.into_inner(),
            guild_id: membership.guild_id.into_inner(),
            user_id: membership.user_id.into_inner(),
            role: membership.role.as_str(),
            status: membership.status.as_str(),
            balance: membership.balance,
        }
    }
}
