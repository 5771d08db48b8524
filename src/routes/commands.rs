use std::num::NonZeroU64;

use actix_web::{HttpResponse, post, web};
use serde::Serialize;
use serenity::all::GuildId;

use crate::server::ExtractedAppData;
use crate::setup;

#[derive(Debug, Serialize)]
struct RegistrationStatus {
    guild_id: String,
    commands: usize,
}

/// Re-registers the bot's commands in one guild, e.g. after the bot was re-invited
#[post("/register/{guild_id}")]
pub(crate) async fn register_guild(
    data: ExtractedAppData,
    path: web::Path<NonZeroU64>,
) -> crate::server::Result<HttpResponse> {
    let guild_id = GuildId::from(path.into_inner());
    let commands = setup::register_in_guild(&data.http_action, guild_id).await?;

    Ok(HttpResponse::Ok().json(RegistrationStatus {
        guild_id: guild_id.to_string(),
        commands,
    }))
}
