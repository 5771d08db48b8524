use std::env;
use std::num::NonZeroU64;

use anyhow::{Context as _, Result, bail};
use serenity::all::GuildId;

const DEFAULT_PORT: u16 = 3000;

// Env Setup
#[derive(Clone)]
pub(crate) struct Vars {
    pub(crate) bot: BotEnv,
    pub(crate) app: AppEnv,
    pub(crate) db: DbEnv,
}

#[derive(Clone)]
pub(crate) struct BotEnv {
    pub(crate) token: String,
    pub(crate) commands: CommandEnv,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CommandEnv {
    pub(crate) register_globally: bool,
    /// Guilds to register commands in when not registering globally
    pub(crate) guilds: Vec<GuildId>,
}

#[derive(Clone, Debug)]
pub(crate) struct AppEnv {
    pub(crate) port: u16,
}

#[derive(Clone)]
pub(crate) struct DbEnv {
    pub(crate) url: String,
}

impl Vars {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| match lookup(key) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => bail!("${key} must be set"),
        };

        let port = match lookup("PORT") {
            Some(port) => port.trim().parse::<u16>().context("$PORT not valid u16 port")?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            bot: BotEnv {
                token: required("DISCORD_TOKEN")?,
                commands: CommandEnv {
                    register_globally: lookup("REGISTER_COMMANDS_GLOBALLY")
                        .is_some_and(|v| !v.is_empty()),
                    guilds: parse_guilds(&lookup("COMMAND_GUILDS").unwrap_or_default())?,
                },
            },
            app: AppEnv { port },
            db: DbEnv {
                url: required("DATABASE_URL")?,
            },
        })
    }
}

fn parse_guilds(list: &str) -> Result<Vec<GuildId>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|id| {
            id.parse::<NonZeroU64>()
                .map(GuildId::from)
                .with_context(|| format!("guild id {id:?} in $COMMAND_GUILDS not valid snowflake"))
        })
        .collect()
}
