//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use guild_core::entities::{BalanceTransaction, LootTabBid, LootTabSale, Membership, SaleStatus};
use guild_core::traits::DrawOutcome;
use guild_core::leading_bids;

use super::responses::{
    BalanceResponse, BidResponse, DrawResponse, SaleDetailsResponse, SaleResponse,
    TransactionResponse,
};

// ============================================================================
// Ledger Mappers
// ============================================================================

/// Membership paired with its unseen transaction count
#[derive(Debug, Clone)]
pub struct MembershipBalance {
    pub membership: Membership,
    pub unseen_transactions: i64,
}

impl From<MembershipBalance> for BalanceResponse {
    fn from(value: MembershipBalance) -> Self {
        let MembershipBalance {
            membership,
            unseen_transactions,
        } = value;
        Self {
            membership_id: membership.id.to_string(),
            guild_id: membership.guild_id.to_string(),
            user_id: membership.user_id.to_string(),
            role: membership.role,
            balance: membership.balance,
            unseen_transactions,
            last_seen_balance_at: membership.last_seen_balance_at,
        }
    }
}

impl From<&BalanceTransaction> for TransactionResponse {
    fn from(tx: &BalanceTransaction) -> Self {
        Self {
            id: tx.id.to_string(),
            membership_id: tx.membership_id.to_string(),
            amount: tx.amount,
            balance_after: tx.balance_after,
            sequence: tx.sequence,
            reason: tx.reason.clone(),
            performed_by: tx.performed_by.to_string(),
            created_at: tx.created_at,
        }
    }
}

impl From<BalanceTransaction> for TransactionResponse {
    fn from(tx: BalanceTransaction) -> Self {
        Self::from(&tx)
    }
}

// ============================================================================
// Auction Mappers
// ============================================================================

impl From<&LootTabSale> for SaleResponse {
    fn from(sale: &LootTabSale) -> Self {
        Self {
            id: sale.id.to_string(),
            guild_id: sale.guild_id.to_string(),
            created_by: sale.created_by.to_string(),
            price: sale.price,
            duration_hours: sale.duration_hours,
            expires_at: sale.expires_at,
            description: sale.description.clone(),
            repair_cost: sale.repair_cost,
            silver_bags: sale.silver_bags,
            status: sale.status,
            winner_id: sale.winner_id.map(|id| id.to_string()),
            split_completed: sale.split_completed,
            created_at: sale.created_at,
            closed_at: sale.closed_at,
        }
    }
}

impl From<LootTabSale> for SaleResponse {
    fn from(sale: LootTabSale) -> Self {
        Self::from(&sale)
    }
}

impl From<&LootTabBid> for BidResponse {
    fn from(bid: &LootTabBid) -> Self {
        Self {
            id: bid.id.to_string(),
            sale_id: bid.sale_id.to_string(),
            user_id: bid.user_id.to_string(),
            amount: bid.amount,
            created_at: bid.created_at,
        }
    }
}

impl From<LootTabBid> for BidResponse {
    fn from(bid: LootTabBid) -> Self {
        Self::from(&bid)
    }
}

/// Sale with its bids, as loaded from storage
#[derive(Debug, Clone)]
pub struct SaleWithBids {
    pub sale: LootTabSale,
    pub bids: Vec<LootTabBid>,
}

impl From<SaleWithBids> for SaleDetailsResponse {
    fn from(value: SaleWithBids) -> Self {
        let standings = leading_bids(&value.bids)
            .into_iter()
            .map(BidResponse::from)
            .collect();
        let mut bids = value.bids;
        bids.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Self {
            sale: SaleResponse::from(&value.sale),
            bids: bids.iter().map(BidResponse::from).collect(),
            standings,
        }
    }
}

impl From<DrawOutcome> for DrawResponse {
    fn from(outcome: DrawOutcome) -> Self {
        match outcome {
            DrawOutcome::Drawn {
                sale,
                winning_bid,
                transaction,
            } => Self {
                outcome: SaleStatus::Drawn,
                sale: SaleResponse::from(&sale),
                winning_bid: Some(BidResponse::from(&winning_bid)),
                transaction: Some(TransactionResponse::from(&transaction)),
            },
            DrawOutcome::Cancelled { sale } => Self {
                outcome: SaleStatus::Cancelled,
                sale: SaleResponse::from(&sale),
                winning_bid: None,
                transaction: None,
            },
        }
    }
}
