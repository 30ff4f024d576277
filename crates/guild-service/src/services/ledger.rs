//! Ledger service
//!
//! Balance adjustments, loot splits, balance lookups and transaction history.
//! Every balance change goes through [`LedgerRepository::apply`] so the
//! balance and its transaction rows are written together.
//!
//! [`LedgerRepository::apply`]: guild_core::traits::LedgerRepository::apply

use std::collections::HashSet;

use chrono::Utc;
use guild_core::entities::{LedgerEntry, MemberRole, Membership};
use guild_core::traits::TransactionQuery;
use guild_core::Snowflake;
use tracing::{info, instrument};

use crate::dto::{
    AdjustBalanceRequest, BalanceAdjustmentResponse, BalanceResponse, LootSplitResponse,
    MembershipBalance, PaginatedResponse, SplitLootRequest, TransactionResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::PermissionService;

/// Maximum history page size
pub const MAX_HISTORY_LIMIT: i64 = 100;

/// Ledger service
pub struct LedgerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LedgerService<'a> {
    /// Create a new LedgerService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply one signed adjustment to a membership
    ///
    /// No permission check happens here; callers resolve the actor first.
    #[instrument(skip(self, reason))]
    pub async fn adjust_balance(
        &self,
        membership_id: Snowflake,
        amount: i64,
        reason: Option<String>,
        performed_by: Snowflake,
    ) -> ServiceResult<BalanceAdjustmentResponse> {
        let entry = LedgerEntry::new(self.ctx.generate_id(), membership_id, amount, reason, performed_by)?;

        let transaction = self
            .ctx
            .ledger_repo()
            .apply(&[entry])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::internal("ledger returned no transaction"))?;

        info!(
            membership_id = %membership_id,
            amount,
            balance = transaction.balance_after,
            "Balance adjusted"
        );

        Ok(BalanceAdjustmentResponse {
            new_balance: transaction.balance_after,
            transaction: TransactionResponse::from(transaction),
        })
    }

    /// Officer adjusts another member's balance
    #[instrument(skip(self, request))]
    pub async fn adjust_balance_as(
        &self,
        guild_id: Snowflake,
        actor_id: Snowflake,
        target_user_id: Snowflake,
        request: AdjustBalanceRequest,
    ) -> ServiceResult<BalanceAdjustmentResponse> {
        PermissionService::new(self.ctx)
            .require_role(guild_id, actor_id, MemberRole::Officer)
            .await?;
        let target = self.find_membership(guild_id, target_user_id).await?;

        self.adjust_balance(target.id, request.amount, request.reason, actor_id)
            .await
    }

    /// Split `total` evenly among distinct participants in one atomic batch
    ///
    /// Each participant receives `total / n`; the remainder is reported and
    /// left undistributed.
    #[instrument(skip(self, request), fields(total = request.total))]
    pub async fn split_loot(
        &self,
        guild_id: Snowflake,
        actor_id: Snowflake,
        request: SplitLootRequest,
    ) -> ServiceResult<LootSplitResponse> {
        PermissionService::new(self.ctx)
            .require_role(guild_id, actor_id, MemberRole::Officer)
            .await?;

        if request.total <= 0 {
            return Err(ServiceError::validation("Total must be positive"));
        }

        let mut seen = HashSet::new();
        let mut participants = Vec::with_capacity(request.participants.len());
        for raw in &request.participants {
            let user_id = raw
                .parse::<Snowflake>()
                .map_err(|_| ServiceError::validation(format!("Invalid participant id: {raw}")))?;
            if seen.insert(user_id) {
                participants.push(user_id);
            }
        }
        if participants.is_empty() {
            return Err(ServiceError::validation("At least one participant is required"));
        }

        let count = participants.len() as i64;
        let share = request.total / count;
        if share < 1 {
            return Err(ServiceError::validation(format!(
                "Total {} is too small to split among {count} participants",
                request.total
            )));
        }
        let remainder = request.total % count;

        let mut entries = Vec::with_capacity(participants.len());
        for user_id in participants {
            let membership = self.find_membership(guild_id, user_id).await?;
            entries.push(LedgerEntry::new(
                self.ctx.generate_id(),
                membership.id,
                share,
                request.reason.clone(),
                actor_id,
            )?);
        }

        let transactions = self.ctx.ledger_repo().apply(&entries).await?;

        info!(
            guild_id = %guild_id,
            participants = transactions.len(),
            share,
            remainder,
            "Loot split"
        );

        Ok(LootSplitResponse {
            total: request.total,
            share,
            remainder,
            transactions: transactions.iter().map(TransactionResponse::from).collect(),
        })
    }

    /// Current balance plus the number of transactions not yet acknowledged
    #[instrument(skip(self))]
    pub async fn balance(&self, guild_id: Snowflake, user_id: Snowflake) -> ServiceResult<BalanceResponse> {
        let membership = PermissionService::new(self.ctx)
            .membership(guild_id, user_id)
            .await?;
        let unseen_transactions = self
            .ctx
            .ledger_repo()
            .count_since(membership.id, membership.last_seen_balance_at)
            .await?;

        Ok(BalanceResponse::from(MembershipBalance {
            membership,
            unseen_transactions,
        }))
    }

    /// Mark every current transaction as seen
    #[instrument(skip(self))]
    pub async fn acknowledge_balance(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<BalanceResponse> {
        let mut membership = PermissionService::new(self.ctx)
            .membership(guild_id, user_id)
            .await?;
        let now = Utc::now();
        self.ctx
            .membership_repo()
            .mark_balance_seen(membership.id, now)
            .await?;
        membership.last_seen_balance_at = Some(now);

        Ok(BalanceResponse::from(MembershipBalance {
            membership,
            unseen_transactions: 0,
        }))
    }

    /// Transaction history, newest first
    ///
    /// Members may read their own history; officers may read anyone's.
    #[instrument(skip(self))]
    pub async fn history(
        &self,
        guild_id: Snowflake,
        actor_id: Snowflake,
        target_user_id: Snowflake,
        before: Option<Snowflake>,
        limit: i64,
    ) -> ServiceResult<PaginatedResponse<TransactionResponse>> {
        let permissions = PermissionService::new(self.ctx);
        if actor_id == target_user_id {
            permissions.membership(guild_id, actor_id).await?;
        } else {
            permissions
                .require_role(guild_id, actor_id, MemberRole::Officer)
                .await?;
        }
        let target = self.find_membership(guild_id, target_user_id).await?;

        let limit = limit.clamp(1, MAX_HISTORY_LIMIT);
        let transactions = self
            .ctx
            .ledger_repo()
            .find_by_membership(target.id, TransactionQuery { before, limit })
            .await?;

        let has_more = transactions.len() as i64 == limit;
        let cursor = transactions.last().map(|tx| tx.id.to_string());

        Ok(PaginatedResponse::new(
            transactions.iter().map(TransactionResponse::from).collect(),
            cursor,
            has_more,
            limit,
        ))
    }

    async fn find_membership(&self, guild_id: Snowflake, user_id: Snowflake) -> ServiceResult<Membership> {
        self.ctx
            .membership_repo()
            .find(guild_id, user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Membership", format!("{guild_id}/{user_id}")))
    }
}
