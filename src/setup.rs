use crate::util::ContextExtras;
use crate::{AppError, AppVars, AppVarsInner, meta, roles};
use clap::{Arg, ArgMatches, value_parser};
use pluralizer::pluralize;
use poise::{BoxFuture, Command, Framework, FrameworkError, FrameworkOptions};
use serenity::FutureExt;
use serenity::all::{Context, GuildId, Http};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub(crate) fn cli() -> clap::Command {
    clap::Command::new(clap::crate_name!())
        .version(clap::crate_version!())
        .about("Remembers member roles and gives them back on rejoin")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("env file to load before reading configuration")
                .value_parser(value_parser!(PathBuf))
                .default_value(".env"),
        )
}

pub(crate) fn load_env(args: &ArgMatches) {
    if let Some(path) = args.get_one::<PathBuf>("config") {
        dotenv::from_filename(path).ok();
    }
}

pub(crate) fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

// Bot setup

pub(crate) async fn register_commands(
    data: &AppVarsInner,
    ctx: &Context,
    framework: &Framework<AppVars, AppError>,
) -> Result<(), AppError> {
    let is_global = data.env.bot.commands.register_globally;
    let no_commands = &[] as &[Command<AppVars, AppError>];
    let commands = &framework.options().commands;
    let global_registration = if is_global { commands } else { no_commands };
    let local_registration = if is_global { no_commands } else { commands };
    let guilds = &data.env.bot.commands.guilds;

    poise::builtins::register_globally(ctx, global_registration).await?;

    for id in guilds.iter() {
        poise::builtins::register_in_guild(ctx, local_registration, *id).await?;
    }

    let commands_text = pluralize("command", commands.len() as isize, true);
    if is_global {
        info!("[setup] Registered {commands_text} globally");
    } else {
        let guilds_text = pluralize("guild", guilds.len() as isize, true);
        info!("[setup] Registered {commands_text} locally in {guilds_text}");
    }

    Ok(())
}

/// Registers the bot's commands in a single guild, returning how many were registered
pub(crate) async fn register_in_guild(http: &Http, guild_id: GuildId) -> Result<usize, AppError> {
    let commands = get_bot_commands();
    poise::builtins::register_in_guild(http, &commands, guild_id).await?;

    info!(%guild_id, "[setup] Registered {}", pluralize("command", commands.len() as isize, true));
    Ok(commands.len())
}

/// What the invoker sees when a command fails; the cause only goes to the log
fn command_error_reply(error: &AppError) -> &'static str {
    error!("Command error: {error:#}");
    "An unexpected error occurred. Please try again later."
}

fn handle_framework_error(error: FrameworkError<AppVars, AppError>) -> BoxFuture<()> {
    async move {
        error!("Error: {error}");

        let Some(ctx) = error.ctx() else { return };
        let error_res = match error {
            FrameworkError::Command {
                error: wrapped_error,
                ..
            } => ctx.reply_ephemeral(command_error_reply(&wrapped_error)).await,
            _ => ctx.reply_ephemeral("An unknown error occurred").await,
        };
        if let Err(e) = error_res {
            error!("A further error occurred sending the error message to discord: {e:?}")
        }
    }
    .boxed()
}

fn get_bot_commands() -> Vec<Command<AppVars, AppError>> {
    vec![meta::ping::ping(), roles::command::index_roles()]
}

pub(crate) fn create_bot_framework_options() -> FrameworkOptions<AppVars, AppError> {
    FrameworkOptions {
        on_error: handle_framework_error,
        commands: get_bot_commands(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_flag_defaults_to_dotenv() {
        let args = cli().try_get_matches_from(["role-memory-bot"]).unwrap();
        assert_eq!(
            args.get_one::<PathBuf>("config"),
            Some(&PathBuf::from(".env"))
        );

        let args = cli()
            .try_get_matches_from(["role-memory-bot", "-c", "prod.env"])
            .unwrap();
        assert_eq!(
            args.get_one::<PathBuf>("config"),
            Some(&PathBuf::from("prod.env"))
        );
    }

    #[test]
    fn command_errors_reply_without_detail() {
        let error = anyhow::anyhow!("Unknown interaction")
            .context("postgres://bot:hunter2@db/roles refused connection");

        let reply = command_error_reply(&error);

        assert!(!reply.contains("hunter2"));
        assert!(!reply.contains("Unknown interaction"));
        assert_eq!(reply, "An unexpected error occurred. Please try again later.");
    }

    #[test]
    fn slash_command_names() {
        let names: Vec<String> = get_bot_commands().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["ping", "index"]);
    }
}
