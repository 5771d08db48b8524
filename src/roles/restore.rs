use async_trait::async_trait;

use crate::roles::error::RoleMemoryError;
use crate::roles::store::RoleStore;

/// Asks the platform to add roles to a member
#[async_trait]
pub(crate) trait RoleGranter: Sync {
    async fn grant_roles(
        &self,
        guild_id: &str,
        member_id: &str,
        role_ids: &[String],
    ) -> Result<(), RoleMemoryError>;
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum RestoreOutcome {
    NothingRecorded,
    Restored { role_count: usize },
}

/// Re-applies the roles recorded for a member who just joined.
pub(crate) async fn restore_member<S, G>(
    store: &S,
    granter: &G,
    guild_id: &str,
    member_id: &str,
) -> Result<RestoreOutcome, RoleMemoryError>
where
    S: RoleStore + ?Sized,
    G: RoleGranter + ?Sized,
{
    let Some(record) = store.get(guild_id, member_id).await? else {
        return Ok(RestoreOutcome::NothingRecorded);
    };
    if record.role_ids.is_empty() {
        return Ok(RestoreOutcome::NothingRecorded);
    }

    granter
        .grant_roles(guild_id, member_id, &record.role_ids)
        .await?;

    Ok(RestoreOutcome::Restored {
        role_count: record.role_ids.len(),
    })
}
