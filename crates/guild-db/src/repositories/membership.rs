//! PostgreSQL implementation of MembershipRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use guild_core::entities::Membership;
use guild_core::error::DomainError;
use guild_core::traits::{MembershipRepository, RepoResult};
use guild_core::value_objects::Snowflake;

use crate::mappers::MembershipInsert;
use crate::models::MembershipModel;

use super::error::{map_db_error, map_unique_violation, membership_not_found};

/// PostgreSQL implementation of MembershipRepository
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    /// Create a new PgMembershipRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Membership>> {
        let result = sqlx::query_as::<_, MembershipModel>(
            r#"
            SELECT id, guild_id, user_id, role, status, balance,
                   last_seen_balance_at, joined_at, updated_at
            FROM memberships
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Membership::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Membership>> {
        let result = sqlx::query_as::<_, MembershipModel>(
            r#"
            SELECT id, guild_id, user_id, role, status, balance,
                   last_seen_balance_at, joined_at, updated_at
            FROM memberships
            WHERE guild_id = $1 AND user_id = $2
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Membership::try_from).transpose()
    }

    #[instrument(skip(self, membership), fields(guild_id = %membership.guild_id, user_id = %membership.user_id))]
    async fn create(&self, membership: &Membership) -> RepoResult<()> {
        let insert = MembershipInsert::new(membership);

        sqlx::query(
            r#"
            INSERT INTO memberships (id, guild_id, user_id, role, status, balance, joined_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(insert.id)
        .bind(insert.guild_id)
        .bind(insert.user_id)
        .bind(insert.role)
        .bind(insert.status)
        .bind(insert.balance)
        .bind(membership.joined_at)
        .bind(membership.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyMember))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn mark_balance_seen(&self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE memberships
            SET last_seen_balance_at = $2
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(membership_not_found());
        }

        Ok(())
    }
}
