//! Membership entity - a user's standing in one guild, including their silver balance

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Guild role, ordered by authority: `Player < Officer < Owner`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    Player,
    Officer,
    Owner,
}

impl MemberRole {
    /// Numeric rank used for access checks
    #[inline]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Player => 1,
            Self::Officer => 2,
            Self::Owner => 3,
        }
    }

    /// True if this role is at least as privileged as `required`
    #[inline]
    pub const fn at_least(self, required: MemberRole) -> bool {
        self.rank() >= required.rank()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Player => "PLAYER",
            Self::Officer => "OFFICER",
            Self::Owner => "OWNER",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLAYER" => Ok(Self::Player),
            "OFFICER" => Ok(Self::Officer),
            "OWNER" => Ok(Self::Owner),
            other => Err(DomainError::InternalError(format!("unknown member role: {other}"))),
        }
    }
}

/// Membership lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    Pending,
    Active,
    Suspended,
}

impl MemberStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "ACTIVE" => Ok(Self::Active),
            "SUSPENDED" => Ok(Self::Suspended),
            other => Err(DomainError::InternalError(format!("unknown member status: {other}"))),
        }
    }
}

/// Membership entity (one per user per guild)
///
/// `balance` is only ever changed by the ledger; callers never assign it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub role: MemberRole,
    pub status: MemberStatus,
    pub balance: i64,
    pub last_seen_balance_at: Option<DateTime<Utc>>,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Membership {
    /// Create a new active membership with a zero balance
    pub fn new(id: Snowflake, guild_id: Snowflake, user_id: Snowflake, role: MemberRole) -> Self {
        let now = Utc::now();
        Self {
            id,
            guild_id,
            user_id,
            role,
            status: MemberStatus::Active,
            balance: 0,
            last_seen_balance_at: None,
            joined_at: now,
            updated_at: now,
        }
    }

    pub fn with_status(mut self, status: MemberStatus) -> Self {
        self.status = status;
        self
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    /// Active and holding at least `required`
    #[inline]
    pub fn can_act_as(&self, required: MemberRole) -> bool {
        self.is_active() && self.role.at_least(required)
    }
}
