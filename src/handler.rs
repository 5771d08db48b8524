use crate::AppVars;
use crate::roles::discord::DiscordRoleGranter;
use crate::roles::restore::{RestoreOutcome, restore_member};
use crate::roles::store::DbRoleStore;
use crate::util::text::bot_invite_url;
use serenity::all::{Context, EventHandler, Member, Permissions, Ready};
use serenity::async_trait;
use tracing::{debug, error, info};

pub(crate) struct RoleMemoryEventHandler {
    pub(crate) data: AppVars,
}

#[async_trait]
impl EventHandler for RoleMemoryEventHandler {
    async fn ready(&self, _ctx: Context, ready_info: Ready) {
        info!(
            "ok, connected as {} (UID {})",
            ready_info.user.tag(),
            ready_info.user.id
        );
        info!("using discord API version {}", ready_info.version);
        info!(
            "invite link: {}",
            bot_invite_url(ready_info.user.id, Permissions::MANAGE_ROLES, true)
        );
    }

    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        let guild_id = new_member.guild_id.to_string();
        let member_id = new_member.user.id.to_string();
        let store = DbRoleStore::new(&self.data.db);
        let granter = DiscordRoleGranter::new(&ctx.http);

        // nobody to reply to here, so every outcome ends in the log
        match restore_member(&store, &granter, &guild_id, &member_id).await {
            Ok(RestoreOutcome::Restored { role_count }) => info!(
                guild_id,
                member_id,
                role_count,
                "restored roles for {}",
                new_member.user.tag()
            ),
            Ok(RestoreOutcome::NothingRecorded) => {
                debug!(guild_id, member_id, "no recorded roles for joining member")
            }
            Err(err) => error!(
                guild_id,
                member_id,
                error = format!("{:#}", anyhow::Error::new(err)),
                "couldn't restore roles for {}",
                new_member.user.tag()
            ),
        }
    }
}
