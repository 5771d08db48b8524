//! Serenity-backed member directory and role granter

use std::num::{NonZeroU64, ParseIntError};

use async_trait::async_trait;
use futures::TryStreamExt as _;
use serenity::all::{GuildId, Http, Member, RoleId, UserId};
use tracing::warn;

use crate::roles::error::{BoxedError, RoleMemoryError};
use crate::roles::record::MemberRoles;
use crate::roles::restore::RoleGranter;
use crate::roles::snapshot::MemberDirectory;

const RESTORE_AUDIT_REASON: &str = "Restoring roles recorded before the member left";

fn snowflake(id: &str) -> Result<NonZeroU64, ParseIntError> {
    id.trim().parse::<NonZeroU64>()
}

pub(crate) fn member_roles(member: &Member) -> MemberRoles {
    MemberRoles {
        member_id: member.user.id.to_string(),
        display_name: member.display_name().to_owned(),
        role_ids: member.roles.iter().map(RoleId::to_string).collect(),
    }
}

pub(crate) struct GuildDirectory<'a> {
    http: &'a Http,
}

impl<'a> GuildDirectory<'a> {
    pub(crate) fn new(http: &'a Http) -> Self {
        Self { http }
    }
}

#[async_trait]
impl MemberDirectory for GuildDirectory<'_> {
    async fn fetch_members(&self, guild_id: &str) -> Result<Vec<MemberRoles>, RoleMemoryError> {
        let fetch_failed = |source: BoxedError| RoleMemoryError::DirectoryFetchFailed {
            guild_id: guild_id.to_owned(),
            source,
        };

        let guild = GuildId::from(snowflake(guild_id).map_err(|e| fetch_failed(e.into()))?);
        let members: Vec<Member> = guild
            .members_iter(self.http)
            .try_collect()
            .await
            .map_err(|e| fetch_failed(e.into()))?;

        Ok(members.iter().map(member_roles).collect())
    }
}

pub(crate) struct DiscordRoleGranter<'a> {
    http: &'a Http,
}

impl<'a> DiscordRoleGranter<'a> {
    pub(crate) fn new(http: &'a Http) -> Self {
        Self { http }
    }
}

#[async_trait]
impl RoleGranter for DiscordRoleGranter<'_> {
    /// Adds each role on its own so that one deleted role doesn't block the others
    async fn grant_roles(
        &self,
        guild_id: &str,
        member_id: &str,
        role_ids: &[String],
    ) -> Result<(), RoleMemoryError> {
        let grant_failed = |role_ids: Vec<String>, source: BoxedError| RoleMemoryError::RoleGrantFailed {
            guild_id: guild_id.to_owned(),
            member_id: member_id.to_owned(),
            role_ids,
            source,
        };

        let (guild, user) = match (snowflake(guild_id), snowflake(member_id)) {
            (Ok(guild), Ok(user)) => (GuildId::from(guild), UserId::from(user)),
            (Err(e), _) | (_, Err(e)) => return Err(grant_failed(role_ids.to_vec(), e.into())),
        };

        let mut failed = Vec::new();
        let mut last_error: Option<BoxedError> = None;
        for role_id in role_ids {
            let role = match snowflake(role_id) {
                Ok(role) => RoleId::from(role),
                Err(err) => {
                    warn!(guild_id, member_id, role_id, "malformed recorded role id");
                    failed.push(role_id.clone());
                    last_error = Some(err.into());
                    continue;
                }
            };

            if let Err(err) = self
                .http
                .add_member_role(guild, user, role, Some(RESTORE_AUDIT_REASON))
                .await
            {
                warn!(guild_id, member_id, role_id, error = %err, "couldn't grant role");
                failed.push(role_id.clone());
                last_error = Some(err.into());
            }
        }

        match last_error {
            None => Ok(()),
            Some(source) => Err(grant_failed(failed, source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflakes_parse() {
        assert_eq!(snowflake(" 760915616793755669").unwrap().get(), 760915616793755669);
        assert!(snowflake("0").is_err());
        assert!(snowflake("everyone").is_err());
    }

    #[tokio::test]
    async fn malformed_role_ids_are_not_reported_as_granted() {
        let http = Http::new("");
        let granter = DiscordRoleGranter::new(&http);
        let role_ids = vec![String::from("everyone"), String::from("0")];

        let err = granter.grant_roles("1", "2", &role_ids).await.unwrap_err();

        match err {
            RoleMemoryError::RoleGrantFailed { role_ids: failed, .. } => {
                assert_eq!(failed, role_ids)
            }
            other => panic!("expected a grant failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_member_id_fails_every_role() {
        let http = Http::new("");
        let granter = DiscordRoleGranter::new(&http);

        let err = granter
            .grant_roles("1", "someone", &[String::from("10")])
            .await
            .unwrap_err();

        assert!(matches!(err, RoleMemoryError::RoleGrantFailed { .. }));
    }
}
