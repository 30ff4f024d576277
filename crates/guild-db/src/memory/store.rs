//! Mutex-guarded implementation of the repository traits

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::instrument;

use guild_core::auction::select_winner;
use guild_core::entities::{
    BalanceTransaction, LedgerEntry, LootTabBid, LootTabSale, Membership, SaleStatus,
};
use guild_core::error::DomainError;
use guild_core::traits::{
    BidRepository, DrawOutcome, DrawRequest, LedgerRepository, MembershipRepository, RepoResult,
    SaleRepository, TransactionQuery,
};
use guild_core::value_objects::Snowflake;

use crate::repositories::error::into_settlement_failure;

#[derive(Debug, Default)]
struct State {
    memberships: HashMap<Snowflake, Membership>,
    /// (guild_id, user_id) -> membership id
    membership_index: HashMap<(Snowflake, Snowflake), Snowflake>,
    transactions: HashMap<Snowflake, BalanceTransaction>,
    /// membership id -> sequence of its latest transaction
    ledger_seq: HashMap<Snowflake, i64>,
    sales: HashMap<Snowflake, LootTabSale>,
    /// sale id -> last time the sweep failed to settle it
    sweep_failures: HashMap<Snowflake, DateTime<Utc>>,
    bids: BTreeMap<Snowflake, LootTabBid>,
}

impl State {
    fn sale(&self, id: Snowflake) -> RepoResult<&LootTabSale> {
        self.sales.get(&id).ok_or(DomainError::SaleNotFound(id))
    }

    /// Validate the whole batch first, then write; nothing changes on error
    fn apply_entries(
        &mut self,
        entries: &[LedgerEntry],
        now: DateTime<Utc>,
    ) -> RepoResult<Vec<BalanceTransaction>> {
        let mut balances: HashMap<Snowflake, i64> = HashMap::new();
        let mut balance_after = Vec::with_capacity(entries.len());

        for entry in entries {
            if self.transactions.contains_key(&entry.id) {
                return Err(DomainError::InternalError(format!(
                    "duplicate transaction id {}",
                    entry.id
                )));
            }
            let current = match balances.get(&entry.membership_id) {
                Some(balance) => *balance,
                None => {
                    self.memberships
                        .get(&entry.membership_id)
                        .ok_or(DomainError::MembershipNotFound)?
                        .balance
                }
            };
            let next = current.checked_add(entry.amount).ok_or_else(|| {
                DomainError::DatabaseError(format!(
                    "balance overflow for membership {}",
                    entry.membership_id
                ))
            })?;
            balances.insert(entry.membership_id, next);
            balance_after.push(next);
        }

        let mut applied = Vec::with_capacity(entries.len());
        for (entry, balance) in entries.iter().zip(balance_after) {
            if let Some(membership) = self.memberships.get_mut(&entry.membership_id) {
                membership.balance = balance;
                membership.updated_at = now;
            }
            let sequence = self.ledger_seq.entry(entry.membership_id).or_insert(0);
            *sequence += 1;
            let transaction = entry.clone().into_transaction(balance, *sequence, now);
            self.transactions.insert(transaction.id, transaction.clone());
            applied.push(transaction);
        }

        Ok(applied)
    }

    fn settle(
        &mut self,
        sale: &LootTabSale,
        winning_bid: &LootTabBid,
        request: &DrawRequest,
    ) -> RepoResult<BalanceTransaction> {
        let membership_id = self
            .membership_index
            .get(&(sale.guild_id, winning_bid.user_id))
            .copied()
            .ok_or_else(|| {
                DomainError::SettlementFailed(format!(
                    "winner {} has no membership in guild {}",
                    winning_bid.user_id, sale.guild_id
                ))
            })?;

        let amount = request.policy.settlement_amount(sale, winning_bid.amount)?;
        let entry = LedgerEntry::new(
            request.transaction_id,
            membership_id,
            amount,
            Some(sale.settlement_reason()),
            request.performed_by,
        )?;

        let mut applied = self.apply_entries(std::slice::from_ref(&entry), request.now)?;
        applied
            .pop()
            .ok_or_else(|| DomainError::InternalError("settlement produced no transaction".to_string()))
    }
}

/// In-process store shared by clones
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a membership, as happens when a member leaves the guild
    ///
    /// Returns `false` if there was no such membership. Existing ledger rows
    /// are kept.
    pub fn remove_membership(&self, guild_id: Snowflake, user_id: Snowflake) -> bool {
        let mut state = self.state.lock();
        match state.membership_index.remove(&(guild_id, user_id)) {
            Some(id) => state.memberships.remove(&id).is_some(),
            None => false,
        }
    }
}

#[async_trait]
impl MembershipRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Membership>> {
        Ok(self.state.lock().memberships.get(&id).cloned())
    }

    async fn find(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Membership>> {
        let state = self.state.lock();
        Ok(state
            .membership_index
            .get(&(guild_id, user_id))
            .and_then(|id| state.memberships.get(id))
            .cloned())
    }

    #[instrument(skip(self, membership), fields(guild_id = %membership.guild_id, user_id = %membership.user_id))]
    async fn create(&self, membership: &Membership) -> RepoResult<()> {
        let mut state = self.state.lock();
        let key = (membership.guild_id, membership.user_id);
        if state.membership_index.contains_key(&key) {
            return Err(DomainError::AlreadyMember);
        }
        state.membership_index.insert(key, membership.id);
        state.memberships.insert(membership.id, membership.clone());
        Ok(())
    }

    async fn mark_balance_seen(&self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<()> {
        let mut state = self.state.lock();
        let membership = state
            .memberships
            .get_mut(&id)
            .ok_or(DomainError::MembershipNotFound)?;
        membership.last_seen_balance_at = Some(at);
        Ok(())
    }
}

#[async_trait]
impl LedgerRepository for MemoryStore {
    #[instrument(skip(self, entries), fields(entries = entries.len()))]
    async fn apply(&self, entries: &[LedgerEntry]) -> RepoResult<Vec<BalanceTransaction>> {
        self.state.lock().apply_entries(entries, Utc::now())
    }

    async fn find_by_membership(
        &self,
        membership_id: Snowflake,
        query: TransactionQuery,
    ) -> RepoResult<Vec<BalanceTransaction>> {
        let limit = usize::try_from(query.limit.clamp(1, 100)).unwrap_or(100);
        let state = self.state.lock();

        let upper = match query.before {
            Some(before) => match state.transactions.get(&before) {
                Some(t) if t.membership_id == membership_id => t.sequence,
                _ => return Ok(Vec::new()),
            },
            None => i64::MAX,
        };

        let mut page: Vec<_> = state
            .transactions
            .values()
            .filter(|t| t.membership_id == membership_id && t.sequence < upper)
            .cloned()
            .collect();
        page.sort_by(|a, b| b.sequence.cmp(&a.sequence));
        page.truncate(limit);
        Ok(page)
    }

    async fn count_since(
        &self,
        membership_id: Snowflake,
        since: Option<DateTime<Utc>>,
    ) -> RepoResult<i64> {
        let state = self.state.lock();
        let count = state
            .transactions
            .values()
            .filter(|t| t.membership_id == membership_id)
            .filter(|t| since.map_or(true, |since| t.created_at > since))
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }
}

#[async_trait]
impl SaleRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<LootTabSale>> {
        Ok(self.state.lock().sales.get(&id).cloned())
    }

    async fn find_by_guild(
        &self,
        guild_id: Snowflake,
        status: Option<SaleStatus>,
    ) -> RepoResult<Vec<LootTabSale>> {
        let state = self.state.lock();
        let mut sales: Vec<_> = state
            .sales
            .values()
            .filter(|s| s.guild_id == guild_id)
            .filter(|s| status.map_or(true, |status| s.status == status))
            .cloned()
            .collect();
        sales.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(sales)
    }

    async fn find_expired_open(&self, now: DateTime<Utc>, limit: i64) -> RepoResult<Vec<LootTabSale>> {
        let limit = usize::try_from(limit.max(1)).unwrap_or(usize::MAX);
        let state = self.state.lock();
        let mut sales: Vec<_> = state
            .sales
            .values()
            .filter(|s| s.is_open() && s.is_expired(now))
            .map(|s| (state.sweep_failures.get(&s.id).copied(), s.clone()))
            .collect();
        // None sorts before Some, so never-failed sales come first
        sales.sort_by(|(fa, a), (fb, b)| {
            fa.cmp(fb)
                .then(a.expires_at.cmp(&b.expires_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(sales.into_iter().take(limit).map(|(_, s)| s).collect())
    }

    async fn record_sweep_failure(&self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<()> {
        let mut state = self.state.lock();
        if !state.sales.get(&id).is_some_and(LootTabSale::is_open) {
            return Ok(());
        }
        state.sweep_failures.insert(id, at);
        Ok(())
    }

    #[instrument(skip(self, sale), fields(sale_id = %sale.id, guild_id = %sale.guild_id))]
    async fn create(&self, sale: &LootTabSale) -> RepoResult<()> {
        let mut state = self.state.lock();
        if state.sales.contains_key(&sale.id) {
            return Err(DomainError::InternalError(format!("duplicate sale id {}", sale.id)));
        }
        state.sales.insert(sale.id, sale.clone());
        Ok(())
    }

    async fn cancel(&self, id: Snowflake, now: DateTime<Utc>) -> RepoResult<LootTabSale> {
        let mut state = self.state.lock();
        let sale = state.sales.get_mut(&id).ok_or(DomainError::SaleNotFound(id))?;
        sale.ensure_open()?;
        sale.mark_cancelled(now);
        Ok(sale.clone())
    }

    #[instrument(skip(self, request), fields(sale_id = %request.sale_id, policy = %request.policy))]
    async fn draw(&self, request: DrawRequest) -> RepoResult<DrawOutcome> {
        let mut state = self.state.lock();

        let mut sale = state.sale(request.sale_id)?.clone();
        sale.ensure_open()?;

        let bids: Vec<LootTabBid> = state
            .bids
            .values()
            .filter(|b| b.sale_id == sale.id)
            .cloned()
            .collect();

        let outcome = match select_winner(&bids).cloned() {
            None => {
                sale.mark_cancelled(request.now);
                DrawOutcome::Cancelled { sale: sale.clone() }
            }
            Some(winning_bid) => {
                let transaction = state
                    .settle(&sale, &winning_bid, &request)
                    .map_err(into_settlement_failure)?;
                sale.mark_drawn(winning_bid.user_id, request.now);
                DrawOutcome::Drawn {
                    sale: sale.clone(),
                    winning_bid,
                    transaction,
                }
            }
        };

        state.sales.insert(sale.id, sale);
        Ok(outcome)
    }
}

#[async_trait]
impl BidRepository for MemoryStore {
    async fn find_by_sale(&self, sale_id: Snowflake) -> RepoResult<Vec<LootTabBid>> {
        let state = self.state.lock();
        Ok(state
            .bids
            .values()
            .filter(|b| b.sale_id == sale_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self, bid), fields(sale_id = %bid.sale_id, user_id = %bid.user_id, amount = bid.amount))]
    async fn place(&self, bid: &LootTabBid, now: DateTime<Utc>) -> RepoResult<()> {
        let mut state = self.state.lock();
        state.sale(bid.sale_id)?.check_bid(bid.amount, now)?;
        state.bids.insert(bid.id, bid.clone());
        Ok(())
    }

    async fn delete(&self, sale_id: Snowflake, bid_id: Snowflake) -> RepoResult<()> {
        let mut state = self.state.lock();
        state.sale(sale_id)?.ensure_participants_mutable()?;
        match state.bids.get(&bid_id) {
            Some(bid) if bid.sale_id == sale_id => {
                state.bids.remove(&bid_id);
                Ok(())
            }
            _ => Err(DomainError::BidNotFound(bid_id)),
        }
    }
}
