//! Permission service
//!
//! Resolves a caller's membership in a guild and checks it against the role
//! an operation requires.

use guild_core::entities::{MemberRole, Membership};
use guild_core::{DomainError, Snowflake};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Permission service for access control
pub struct PermissionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PermissionService<'a> {
    /// Create a new PermissionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Membership of `user_id` in `guild_id`, in any status
    #[instrument(skip(self))]
    pub async fn membership(&self, guild_id: Snowflake, user_id: Snowflake) -> ServiceResult<Membership> {
        self.ctx
            .membership_repo()
            .find(guild_id, user_id)
            .await?
            .ok_or_else(|| DomainError::NotGuildMember.into())
    }

    /// Membership of an ACTIVE member; suspended or departed members may not act
    #[instrument(skip(self))]
    pub async fn require_member(&self, guild_id: Snowflake, user_id: Snowflake) -> ServiceResult<Membership> {
        let membership = self.membership(guild_id, user_id).await?;
        if !membership.is_active() {
            return Err(DomainError::MembershipInactive.into());
        }
        Ok(membership)
    }

    /// Membership of an ACTIVE member holding at least `required`
    #[instrument(skip(self))]
    pub async fn require_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        required: MemberRole,
    ) -> ServiceResult<Membership> {
        let membership = self.require_member(guild_id, user_id).await?;
        if !membership.can_act_as(required) {
            debug!(
                user_id = %user_id,
                guild_id = %guild_id,
                role = %membership.role,
                required = %required,
                "Role check failed"
            );
            return Err(DomainError::InsufficientRole { required }.into());
        }
        Ok(membership)
    }
}
