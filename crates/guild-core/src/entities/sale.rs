//! Loot-tab sale entity - a time-boxed auction for a guild's loot tab

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entities::MAX_REASON_LENGTH;
use crate::error::DomainError;
use crate::value_objects::Snowflake;

pub const MIN_SALE_DURATION_HOURS: i32 = 1;
pub const MAX_SALE_DURATION_HOURS: i32 = 168;
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// Sale lifecycle; `Drawn` and `Cancelled` are terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    Open,
    Drawn,
    Cancelled,
}

impl SaleStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Drawn => "DRAWN",
            Self::Cancelled => "CANCELLED",
        }
    }

    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Open)
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaleStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "DRAWN" => Ok(Self::Drawn),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(DomainError::InternalError(format!("unknown sale status: {other}"))),
        }
    }
}

/// Validated input for opening a sale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    pub guild_id: Snowflake,
    pub created_by: Snowflake,
    pub price: i64,
    pub duration_hours: i32,
    pub description: Option<String>,
    pub repair_cost: i64,
    pub silver_bags: i64,
}

impl NewSale {
    /// Check price, duration and cost bounds
    ///
    /// Costs must stay strictly below the price so the net of costs for any
    /// accepted bid (which is never below the price) is positive.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.price <= 0 {
            return Err(DomainError::InvalidPrice);
        }
        if !(MIN_SALE_DURATION_HOURS..=MAX_SALE_DURATION_HOURS).contains(&self.duration_hours) {
            return Err(DomainError::InvalidDuration {
                min: MIN_SALE_DURATION_HOURS,
                max: MAX_SALE_DURATION_HOURS,
            });
        }
        if self.repair_cost < 0 || self.silver_bags < 0 {
            return Err(DomainError::InvalidCosts(
                "costs cannot be negative".to_string(),
            ));
        }
        let costs = self
            .repair_cost
            .checked_add(self.silver_bags)
            .ok_or_else(|| DomainError::InvalidCosts("costs overflow".to_string()))?;
        if costs >= self.price {
            return Err(DomainError::InvalidCosts(
                "repair cost plus silver bags must be below the price".to_string(),
            ));
        }
        if self
            .description
            .as_ref()
            .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LENGTH)
        {
            return Err(DomainError::DescriptionTooLong {
                max: MAX_DESCRIPTION_LENGTH,
            });
        }
        Ok(())
    }
}

/// Loot-tab sale entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootTabSale {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub created_by: Snowflake,
    pub price: i64,
    pub duration_hours: i32,
    pub expires_at: DateTime<Utc>,
    pub description: Option<String>,
    pub repair_cost: i64,
    pub silver_bags: i64,
    pub status: SaleStatus,
    pub winner_id: Option<Snowflake>,
    pub split_completed: bool,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl LootTabSale {
    /// Open a sale at `now`; validates the input first
    pub fn open(id: Snowflake, new: NewSale, now: DateTime<Utc>) -> Result<Self, DomainError> {
        new.validate()?;
        let description = new
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id,
            guild_id: new.guild_id,
            created_by: new.created_by,
            price: new.price,
            duration_hours: new.duration_hours,
            expires_at: now + Duration::hours(i64::from(new.duration_hours)),
            description,
            repair_cost: new.repair_cost,
            silver_bags: new.silver_bags,
            status: SaleStatus::Open,
            winner_id: None,
            split_completed: false,
            created_at: now,
            closed_at: None,
        })
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == SaleStatus::Open
    }

    /// Expiry is inclusive: a sale is expired at exactly `expires_at`
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Sum of informational costs
    #[inline]
    pub fn total_costs(&self) -> i64 {
        self.repair_cost + self.silver_bags
    }

    /// Fail unless the sale is still OPEN
    pub fn ensure_open(&self) -> Result<(), DomainError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(DomainError::SaleNotOpen {
                status: self.status,
            })
        }
    }

    /// Check that a bid of `amount` may be placed at `now`
    pub fn check_bid(&self, amount: i64, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.ensure_participants_mutable()?;
        if self.is_expired(now) {
            return Err(DomainError::SaleExpired);
        }
        if amount < self.price {
            return Err(DomainError::BidBelowReserve { price: self.price });
        }
        Ok(())
    }

    /// Participants may only change while the sale is OPEN and unsettled
    pub fn ensure_participants_mutable(&self) -> Result<(), DomainError> {
        if self.split_completed {
            return Err(DomainError::SplitCompleted);
        }
        self.ensure_open()
    }

    /// Ledger reason recorded for the settlement of this sale
    ///
    /// Long descriptions are cut so the reason fits a ledger row.
    pub fn settlement_reason(&self) -> String {
        const PREFIX: &str = "Loot tab sale: ";
        match &self.description {
            Some(description) => {
                let room = MAX_REASON_LENGTH - PREFIX.len();
                let description: String = description.chars().take(room).collect();
                format!("{PREFIX}{description}")
            }
            None => format!("Loot tab sale #{}", self.id),
        }
    }

    /// Transition to DRAWN
    pub fn mark_drawn(&mut self, winner_id: Snowflake, now: DateTime<Utc>) {
        self.status = SaleStatus::Drawn;
        self.winner_id = Some(winner_id);
        self.split_completed = true;
        self.closed_at = Some(now);
    }

    /// Transition to CANCELLED
    pub fn mark_cancelled(&mut self, now: DateTime<Utc>) {
        self.status = SaleStatus::Cancelled;
        self.closed_at = Some(now);
    }
}
