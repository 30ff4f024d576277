//! LootTabSale entity <-> model mapper

use guild_core::entities::LootTabSale;
use guild_core::error::DomainError;
use guild_core::value_objects::Snowflake;

use crate::models::SaleModel;

impl TryFrom<SaleModel> for LootTabSale {
    type Error = DomainError;

    fn try_from(model: SaleModel) -> Result<Self, Self::Error> {
        Ok(LootTabSale {
            id: Snowflake::new(model.id),
            guild_id: Snowflake::new(model.guild_id),
            created_by: Snowflake::new(model.created_by),
            price: model.price,
            duration_hours: model.duration_hours,
            expires_at: model.expires_at,
            description: model.description,
            repair_cost: model.repair_cost,
            silver_bags: model.silver_bags,
            status: model.status.parse()?,
            winner_id: model.winner_id.map(Snowflake::new),
            split_completed: model.split_completed,
            created_at: model.created_at,
            closed_at: model.closed_at,
        })
    }
}

/// Sale values for database insertion
pub struct SaleInsert<'a> {
    pub id: i64,
    pub guild_id: i64,
    pub created_by: i64,
    pub price: i64,
    pub duration_hours: i32,
    pub description: Option<&'a str>,
    pub repair_cost: i64,
    pub silver_bags: i64,
    pub status: &'static str,
}

impl<'a> SaleInsert<'a> {
    pub fn new(sale: &'a LootTabSale) -> Self {
        Self {
            id: sale.id.into_inner(),
            guild_id: sale.guild_id.into_inner(),
            created_by: sale.created_by.into_inner(),
            price: sale.price,
            duration_hours: sale.duration_hours,
            description: sale.description.as_deref(),
            repair_cost: sale.repair_cost,
            silver_bags: sale.silver_bags,
            status: sale.status.as_str(),
        }
    }
}
