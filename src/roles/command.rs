use anyhow::bail;
use tracing::error;

use crate::roles::discord::GuildDirectory;
use crate::roles::snapshot::{index_reply, snapshot_guild};
use crate::roles::store::DbRoleStore;
use crate::{AppContext, AppError};

/// Index all users and their roles in the server
#[poise::command(
    slash_command,
    rename = "index",
    guild_only,
    default_member_permissions = "MANAGE_ROLES"
)]
pub(crate) async fn index_roles(ctx: AppContext<'_>) -> Result<(), AppError> {
    let Some(guild_id) = ctx.guild_id() else {
        bail!("unexpected non-guild interaction");
    };
    // the member fetch can outlast the interaction window, the result goes out as a follow-up
    ctx.defer().await?;

    let guild_id = guild_id.to_string();
    let directory = GuildDirectory::new(&ctx.serenity_context().http);
    let store = DbRoleStore::new(&ctx.data().db);

    // the everyone role shares its id with the guild
    let result = snapshot_guild(&directory, &store, &guild_id, &guild_id).await;
    let reply = index_reply(&result);
    if let Err(err) = result {
        error!(guild_id, error = format!("{:#}", anyhow::Error::new(err)), "indexing failed");
    }

    ctx.say(reply).await?;
    Ok(())
}
