use async_trait::async_trait;
use entity::user_role::{self, RoleIdList};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait};

use crate::roles::error::RoleMemoryError;
use crate::roles::record::RoleRecord;

/// Persistent map from (guild, member) to the roles recorded for that member
#[async_trait]
pub(crate) trait RoleStore: Sync {
    /// Writes or replaces the record for the record's (guild, member) pair
    async fn upsert(&self, record: RoleRecord) -> Result<(), RoleMemoryError>;

    async fn get(
        &self,
        guild_id: &str,
        member_id: &str,
    ) -> Result<Option<RoleRecord>, RoleMemoryError>;
}

pub(crate) struct DbRoleStore<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DbRoleStore<'a> {
    pub(crate) fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleStore for DbRoleStore<'_> {
    async fn upsert(&self, record: RoleRecord) -> Result<(), RoleMemoryError> {
        let RoleRecord {
            guild_id,
            member_id,
            role_ids,
            display_name,
        } = record;

        let row = user_role::ActiveModel {
            guild_id: ActiveValue::Set(guild_id.clone()),
            user_id: ActiveValue::Set(member_id.clone()),
            role_ids: ActiveValue::Set(RoleIdList(role_ids)),
            username: ActiveValue::Set(display_name),
        };

        // single statement, so a key is never seen half-written
        user_role::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([user_role::Column::GuildId, user_role::Column::UserId])
                    .update_columns([user_role::Column::RoleIds, user_role::Column::Username])
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await
            .map_err(|err| RoleMemoryError::from_write(&guild_id, &member_id, err))?;

        Ok(())
    }

    async fn get(
        &self,
        guild_id: &str,
        member_id: &str,
    ) -> Result<Option<RoleRecord>, RoleMemoryError> {
        let row = user_role::Entity::find_by_id((guild_id.to_owned(), member_id.to_owned()))
            .one(self.db)
            .await
            .map_err(RoleMemoryError::StoreUnavailable)?;

        Ok(row.map(RoleRecord::from))
    }
}
