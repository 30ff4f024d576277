//! Settlement formula for a drawn sale
//!
//! The winner buys the loot tab, so settlement is a single debit against the
//! winner's membership. The policy decides whether the sale's repair cost and
//! silver bags are deducted from the amount the winner pays.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entities::LootTabSale;
use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementPolicy {
    /// Winner pays the full winning bid
    #[default]
    WinningBid,
    /// Winner pays the winning bid minus repair cost and silver bags
    NetOfCosts,
}

impl SettlementPolicy {
    /// Signed ledger amount (always negative) for a winning bid of `winning_amount`
    pub fn settlement_amount(self, sale: &LootTabSale, winning_amount: i64) -> Result<i64, DomainError> {
        let due = match self {
            Self::WinningBid => winning_amount,
            Self::NetOfCosts => winning_amount - sale.total_costs(),
        };
        if due <= 0 {
            return Err(DomainError::SettlementFailed(format!(
                "settlement amount must be positive, got {due}"
            )));
        }
        Ok(-due)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WinningBid => "winning_bid",
            Self::NetOfCosts => "net_of_costs",
        }
    }
}

impl fmt::Display for SettlementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettlementPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "winning_bid" => Ok(Self::WinningBid),
            "net_of_costs" => Ok(Self::NetOfCosts),
            other => Err(DomainError::ValidationError(format!(
                "unknown settlement policy: {other}"
            ))),
        }
    }
}
