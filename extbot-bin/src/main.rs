mod config;
mod logger;
mod plugins;

/// Path of the default config.toml file.
const DEFAULT_CONFIG: &str = "./config.toml";

use config::Config;
use extbot_core::builders::BotBuilder;

use clap::Parser;

use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(name = "extbot", version, about = "An extensible Discord bot")]
struct Args {
    /// Provide a path to the config file
    #[clap(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG)]
    config: PathBuf,
}

fn bot_builder(config: &Config) -> BotBuilder {
    let cache_messages = config.cache.messages;
    let prefix = config.prefix.clone();
    let slash = config.slash.clone();
    let members = config.members.clone();
    let presence = config.presence.clone();

    BotBuilder::new()
        .cache(|c| {
            c.cached_messages(Some(cache_messages));
        })
        .message_commands(|m| {
            m.default_prefix(prefix);
        })
        .slash_commands(|s| {
            s.enabled(slash.enabled).default_guild(slash.default_guild);
        })
        .members(|m| {
            if members.all {
                m.all();
            } else {
                m.fill(members.guilds);
            }
            m.fill_presences(members.presences);
        })
        .presence(|p| {
            p.status(presence.status);
            if let Some(activity) = presence.activity {
                p.activity(activity);
            }
        })
        .extensions(plugins::init)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}: {}", args.config.display(), err);
            std::process::exit(1);
        }
    };

    logger::init(config.loglevel);

    log::info!("[BOT] Building bot");
    let bot = bot_builder(&config).build().await;

    log::info!("[BOT] Connecting");
    if let Err(err) = bot.start(&config.token).await {
        log::error!("[BOT] Fatal error: {}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{bot_builder, Args};
    use crate::config::Config;

    use clap::Parser;
    use serenity::model::gateway::GatewayIntents;

    #[test]
    fn test_args() {
        let args = Args::parse_from(["extbot"]);
        assert_eq!(args.config.to_str(), Some("./config.toml"));

        let args = Args::parse_from(["extbot", "--config", "bot.toml"]);
        assert_eq!(args.config.to_str(), Some("bot.toml"));
    }

    #[tokio::test]
    async fn test_bot_builder() {
        let mut config: Config = "token = \"abc\"\nprefix = \"?\"".parse().unwrap();
        config.members.guilds = vec![1];

        let builder = bot_builder(&config);
        assert!(builder
            .gateway_intents()
            .contains(GatewayIntents::GUILD_MEMBERS));

        let bot = builder.build().await;
        let commands = bot.state().message_commands();
        assert!(commands.get("ping").is_some());
        assert!(commands.get("whois").is_some());
        assert!(commands.get("help").is_some());
        assert_eq!(bot.state().slash_commands().len(), 1);
    }
}
