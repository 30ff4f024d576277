//! BalanceTransaction entity <-> model mapper

use guild_core::entities::BalanceTransaction;
use guild_core::value_objects::Snowflake;

use crate::models::TransactionModel;

impl From<TransactionModel> for BalanceTransaction {
    fn from(model: TransactionModel) -> Self {
        BalanceTransaction {
            id: Snowflake::new(model.id),
            membership_id: Snowflake::new(model.membership_id),
            amount: model.amount,
            balance_after: model.balance_after,
            sequence: model.sequence,
            reason: model.reason,
            performed_by: Snowflake::new(model.performed_by),
            created_at: model.created_at,
        }
    }
}
