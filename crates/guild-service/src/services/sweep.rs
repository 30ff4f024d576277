//! Expired-sale sweep
//!
//! Draws every OPEN sale whose `expires_at` has passed. Each sale is drawn
//! independently so one failing settlement never stops the rest of the batch.
//! A sale that fails is marked, and later runs reach it only after the sales
//! that have not failed, so a stuck sale cannot hold a batch slot forever.

use chrono::{DateTime, Utc};
use guild_core::traits::DrawOutcome;
use guild_core::Snowflake;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::auction::AuctionService;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Default number of expired sales drawn per run
pub const DEFAULT_BATCH_SIZE: i64 = 100;

/// What happened to one sale during a sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepResult {
    Drawn { winner_id: Snowflake, amount: i64 },
    /// No bids; closed without settlement
    Cancelled,
    /// Someone else closed the sale first
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepEntry {
    pub sale_id: Snowflake,
    pub result: SweepResult,
}

/// Per-sale results of one sweep run
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub entries: Vec<SweepEntry>,
}

impl SweepReport {
    fn count(&self, pred: impl Fn(&SweepResult) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.result)).count()
    }

    pub fn drawn(&self) -> usize {
        self.count(|r| matches!(r, SweepResult::Drawn { .. }))
    }

    pub fn cancelled(&self) -> usize {
        self.count(|r| matches!(r, SweepResult::Cancelled))
    }

    pub fn skipped(&self) -> usize {
        self.count(|r| matches!(r, SweepResult::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|r| matches!(r, SweepResult::Failed(_)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Result recorded for `sale_id`, if the sale was part of this run
    pub fn result_for(&self, sale_id: Snowflake) -> Option<&SweepResult> {
        self.entries
            .iter()
            .find(|e| e.sale_id == sale_id)
            .map(|e| &e.result)
    }
}

/// Sweep service
pub struct SweepService<'a> {
    ctx: &'a ServiceContext,
    batch_size: i64,
}

impl<'a> SweepService<'a> {
    /// Create a new SweepService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self {
            ctx,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: i64) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Draw every sale that is OPEN and expired at `now`
    ///
    /// # Errors
    /// Only listing the expired sales can fail the run; per-sale failures are
    /// recorded in the report.
    #[instrument(skip(self))]
    pub async fn run_once(&self, now: DateTime<Utc>) -> ServiceResult<SweepReport> {
        let run_id = Uuid::new_v4();
        let sales = self
            .ctx
            .sale_repo()
            .find_expired_open(now, self.batch_size)
            .await?;

        let auctions = AuctionService::new(self.ctx);
        let mut entries = Vec::with_capacity(sales.len());

        for sale in sales {
            let result = match auctions.draw_as_system(sale.id, now).await {
                Ok(DrawOutcome::Drawn {
                    winning_bid,
                    transaction,
                    ..
                }) => SweepResult::Drawn {
                    winner_id: winning_bid.user_id,
                    amount: transaction.amount,
                },
                Ok(DrawOutcome::Cancelled { .. }) => SweepResult::Cancelled,
                Err(e) if e.is_conflict() || e.is_not_found() => {
                    debug!(run_id = %run_id, sale_id = %sale.id, error = %e, "Sale already closed");
                    SweepResult::Skipped
                }
                Err(e) => {
                    warn!(run_id = %run_id, sale_id = %sale.id, error = %e, "Failed to draw expired sale");
                    if let Err(mark_err) = self
                        .ctx
                        .sale_repo()
                        .record_sweep_failure(sale.id, Utc::now())
                        .await
                    {
                        warn!(run_id = %run_id, sale_id = %sale.id, error = %mark_err, "Failed to record sweep failure");
                    }
                    SweepResult::Failed(e.to_string())
                }
            };
            entries.push(SweepEntry {
                sale_id: sale.id,
                result,
            });
        }

        let report = SweepReport {
            run_id,
            started_at: now,
            entries,
        };

        if !report.is_empty() {
            info!(
                run_id = %run_id,
                drawn = report.drawn(),
                cancelled = report.cancelled(),
                skipped = report.skipped(),
                failed = report.failed(),
                "Sweep finished"
            );
        }

        Ok(report)
    }
}
