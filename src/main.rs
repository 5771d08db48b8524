mod config;
mod handler;
mod meta;
mod roles;
mod routes;
mod server;
mod setup;
mod util;

use crate::config::Vars;
use anyhow::Context as _;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use serenity::Client;
use serenity::all::GatewayIntents;
use std::sync::Arc;
use tracing::info;

pub(crate) struct AppVarsInner {
    pub(crate) db: DatabaseConnection,
    pub(crate) env: Vars,
}

pub(crate) type AppVars = Arc<AppVarsInner>;
pub(crate) type AppError = anyhow::Error;
pub(crate) type AppContext<'a> = poise::Context<'a, AppVars, AppError>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = setup::cli().get_matches();
    setup::load_env(&args);
    setup::init_tracing();

    let env = Vars::from_env().context("read configuration")?;
    let db = Database::connect(&env.db.url)
        .await
        .context("connect to database")?;
    Migrator::up(&db, None).await.context("run migrations")?;
    info!("database ready");

    let data: AppVars = Arc::new(AppVarsInner { db, env });

    let setup_data = data.clone();
    let framework = poise::Framework::builder()
        .options(setup::create_bot_framework_options())
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                setup::register_commands(&setup_data, ctx, framework).await?;
                Ok(setup_data)
            })
        })
        .build();

    let mut client = Client::builder(
        &data.env.bot.token,
        GatewayIntents::non_privileged() | GatewayIntents::GUILD_MEMBERS,
    )
    .event_handler(handler::RoleMemoryEventHandler { data: data.clone() })
    .framework(framework)
    .await
    .context("couldn't make client")?;

    let http_action = client.http.clone();
    tokio::try_join!(server::run(data, http_action), async {
        client.start().await.context("gateway client stopped")
    })?;

    Ok(())
}
