//! LootTabBid entity <-> model mapper

use guild_core::entities::LootTabBid;
use guild_core::value_objects::Snowflake;

use crate::models::BidModel;

impl From<BidModel> for LootTabBid {
    fn from(model: BidModel) -> Self {
        LootTabBid {
            id: Snowflake::new(model.id),
            sale_id: Snowflake::new(model.sale_id),
            user_id: Snowflake::new(model.user_id),
            amount: model.amount,
            created_at: model.created_at,
        }
    }
}
