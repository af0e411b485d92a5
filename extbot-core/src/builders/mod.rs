//! The bot builder DSL.
mod cache;
mod extensions;
mod hooks;
mod i18n;
mod members;
mod message_commands;
mod presence;
mod slash_commands;

pub use cache::{CacheBuilder, DEFAULT_CACHED_MESSAGES};
pub use extensions::{ExtensionsBuilder, HelpExtensionBuilder};
pub use hooks::{ExtensionHook, Hook, HookResult, HooksBuilder};
pub use i18n::{I18nBuilder, LocaleResolver};
pub use members::MembersBuilder;
pub use message_commands::{MessageCommandsBuilder, PrefixResolver};
pub use presence::{Activity, PresenceBuilder, Status};
pub use slash_commands::SlashCommandsBuilder;

pub(crate) use hooks::{run_extension_hooks, run_hooks};

use crate::bot::ExtensibleBot;
use crate::help::HelpExtension;
use crate::state::State;

use serenity::client::ClientBuilder;
use serenity::model::gateway::GatewayIntents;

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// The shards started by this process.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Shards {
    /// Let Discord decide the number of shards and start all of them.
    Auto,
    /// Start `0..n` of `n` shards.
    Count(u64),
    /// Start `start..=end` of `total` shards.
    Range { start: u64, end: u64, total: u64 },
}

impl Default for Shards {
    fn default() -> Self {
        Self::Auto
    }
}

/// Picks the shards to start, receiving the recommended shard count.
pub type ShardingFn = Arc<dyn Fn(u64) -> Shards + Send + Sync>;

pub type IntentsHook = Arc<dyn Fn(&mut GatewayIntents) + Send + Sync>;

pub type ClientHook = Arc<dyn Fn(ClientBuilder) -> ClientBuilder + Send + Sync>;

/// Builds an [`ExtensibleBot`].
///
/// ```ignore
/// let bot = BotBuilder::new()
///     .message_commands(|m| {
///         m.default_prefix("?");
///     })
///     .extensions(|e| {
///         e.add(|| PingExtension);
///     })
///     .build()
///     .await;
/// ```
#[derive(Clone, Default)]
pub struct BotBuilder {
    cache: CacheBuilder,
    extensions: ExtensionsBuilder,
    hooks: HooksBuilder,
    i18n: I18nBuilder,
    members: MembersBuilder,
    message_commands: MessageCommandsBuilder,
    slash_commands: SlashCommandsBuilder,
    presence: PresenceBuilder,
    sharding: Option<ShardingFn>,
    intents: Vec<IntentsHook>,
    client: Vec<ClientHook>,
}

macro_rules! sub_builder {
    ($(#[$attr:meta])* $name:ident, $builder:ty) => {
        $(#[$attr])*
        pub fn $name<F>(mut self, f: F) -> Self
        where
            F: FnOnce(&mut $builder),
        {
            f(&mut self.$name);
            self
        }
    };
}

impl BotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    sub_builder!(cache, CacheBuilder);
    sub_builder!(
        /// Adds extensions and configures the bundled help extension.
        extensions,
        ExtensionsBuilder
    );
    sub_builder!(hooks, HooksBuilder);
    sub_builder!(i18n, I18nBuilder);
    sub_builder!(
        /// Configures which guilds have their members requested on connect.
        members,
        MembersBuilder
    );
    sub_builder!(message_commands, MessageCommandsBuilder);
    sub_builder!(slash_commands, SlashCommandsBuilder);
    sub_builder!(presence, PresenceBuilder);

    /// Picks the shards to start. Without this all recommended shards are
    /// started.
    pub fn sharding<F>(mut self, f: F) -> Self
    where
        F: Fn(u64) -> Shards + Send + Sync + 'static,
    {
        self.sharding = Some(Arc::new(f));
        self
    }

    /// Adjusts the gateway intents after the defaults were computed.
    pub fn intents<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut GatewayIntents) + Send + Sync + 'static,
    {
        self.intents.push(Arc::new(f));
        self
    }

    /// Adjusts the serenity client builder before connecting.
    pub fn client<F>(mut self, f: F) -> Self
    where
        F: Fn(ClientBuilder) -> ClientBuilder + Send + Sync + 'static,
    {
        self.client.push(Arc::new(f));
        self
    }

    /// Returns the gateway intents the bot connects with.
    pub fn gateway_intents(&self) -> GatewayIntents {
        let mut intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        if self.members.fills_any() {
            intents |= GatewayIntents::GUILD_MEMBERS;
        }

        if self.members.fills_presences() {
            intents |= GatewayIntents::GUILD_PRESENCES;
        }

        for hook in &self.intents {
            hook(&mut intents);
        }

        intents
    }

    /// Creates the bot and adds all extensions. Extensions that fail to
    /// load are logged and skipped.
    pub async fn build(self) -> ExtensibleBot {
        let intents = self.gateway_intents();

        let state = Arc::new(State::new(
            self.message_commands,
            self.slash_commands,
            self.i18n,
            self.cache.default_strategy,
        ));

        let bot = ExtensibleBot {
            state,
            hooks: self.hooks,
            cache: self.cache,
            members: self.members,
            presence: self.presence,
            sharding: self.sharding,
            intents,
            client_hooks: self.client,
        };

        run_hooks("created", &bot.hooks.created, &bot).await;

        let help = self.extensions.help;
        if help.enable_bundled_extension && bot.state.message_settings.enabled {
            let extension = HelpExtension::new(bot.state.message_commands().clone(), help);

            if let Err(err) = bot.state.extensions().add(Arc::new(extension)).await {
                log::error!("[CORE] Failed to load the help extension: {}", err);
            }
        }

        run_hooks("setup", &bot.hooks.setup, &bot).await;
        run_hooks(
            "before_extensions_added",
            &bot.hooks.before_extensions_added,
            &bot,
        )
        .await;

        for factory in &self.extensions.extensions {
            let extension = factory();
            let name = extension.name().to_owned();

            if let Err(err) = bot.add_dyn_extension(extension).await {
                log::error!("[CORE] Failed to load extension {}: {}", name, err);
            }
        }

        run_hooks(
            "after_extensions_added",
            &bot.hooks.after_extensions_added,
            &bot,
        )
        .await;

        bot
    }
}

impl Debug for BotBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotBuilder")
            .field("cache", &self.cache)
            .field("extensions", &self.extensions)
            .field("hooks", &self.hooks)
            .field("i18n", &self.i18n)
            .field("members", &self.members)
            .field("message_commands", &self.message_commands)
            .field("slash_commands", &self.slash_commands)
            .field("presence", &self.presence)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{BotBuilder, HookResult};
    use crate::bot::ExtensibleBot;
    use crate::error::Result;
    use crate::extension::{Extension, ExtensionBuilder};

    use async_trait::async_trait;
    use futures::future::{BoxFuture, FutureExt};
    use parking_lot::Mutex;
    use serenity::model::gateway::GatewayIntents;

    use std::sync::Arc;

    struct Ping;

    #[async_trait]
    impl Extension for Ping {
        fn name(&self) -> &str {
            "ping"
        }

        async fn setup(&self, builder: &mut ExtensionBuilder) -> Result {
            builder.message_command::<(), _>(|cmd| {
                cmd.name("ping")
                    .action(|ctx| async move { ctx.respond("Pong!").await });
            })?;

            Ok(())
        }
    }

    fn record(
        calls: &Arc<Mutex<Vec<String>>>,
        name: &'static str,
    ) -> impl for<'a> Fn(&'a ExtensibleBot) -> BoxFuture<'a, HookResult> + Send + Sync + 'static
    {
        let calls = calls.clone();

        move |_| {
            calls.lock().push(name.to_owned());
            async { HookResult::Ok(()) }.boxed()
        }
    }

    #[test]
    fn test_gateway_intents() {
        let intents = BotBuilder::new().gateway_intents();
        assert!(intents.contains(GatewayIntents::MESSAGE_CONTENT));
        assert!(!intents.contains(GatewayIntents::GUILD_MEMBERS));

        let intents = BotBuilder::new()
            .members(|m| {
                m.all().fill_presences(true);
            })
            .intents(|intents| intents.remove(GatewayIntents::DIRECT_MESSAGES))
            .gateway_intents();
        assert!(intents.contains(GatewayIntents::GUILD_MEMBERS));
        assert!(intents.contains(GatewayIntents::GUILD_PRESENCES));
        assert!(!intents.contains(GatewayIntents::DIRECT_MESSAGES));
    }

    #[tokio::test]
    async fn test_build() {
        let calls = Arc::new(Mutex::new(Vec::new()));

        let added = calls.clone();

        let bot = BotBuilder::new()
            .hooks(|h| {
                h.created(record(&calls, "created"))
                    .setup(record(&calls, "setup"))
                    .before_extensions_added(record(&calls, "before"))
                    .after_extensions_added(record(&calls, "after"))
                    .extension_added(move |_, name| {
                        added.lock().push(format!("added {}", name));
                        async { HookResult::Ok(()) }.boxed()
                    });
            })
            .extensions(|e| {
                e.add(|| Ping);
            })
            .build()
            .await;

        assert_eq!(
            *calls.lock(),
            ["created", "setup", "before", "added ping", "after"]
        );

        let commands = bot.state().message_commands();
        assert!(commands.get("help").is_some());
        assert!(commands.get("ping").is_some());
        assert_eq!(bot.state().extensions().list().len(), 2);
    }

    #[tokio::test]
    async fn test_build_without_help() {
        let bot = BotBuilder::new()
            .extensions(|e| {
                e.help(|h| {
                    h.enable_bundled_extension(false);
                });
            })
            .build()
            .await;

        assert!(bot.state().message_commands().is_empty());
    }
}
