use crate::builders::{
    run_extension_hooks, run_hooks, CacheBuilder, ClientHook, HooksBuilder, MembersBuilder,
    PresenceBuilder, Shards, ShardingFn,
};
use crate::error::Result;
use crate::extension::{Extension, ExtensionId};
use crate::handlers::Handler;
use crate::state::State;

use serenity::http::Http;
use serenity::model::gateway::GatewayIntents;
use serenity::Client;

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// A bot built by [`BotBuilder`](crate::builders::BotBuilder).
pub struct ExtensibleBot {
    pub(crate) state: Arc<State>,
    pub(crate) hooks: HooksBuilder,
    pub(crate) cache: CacheBuilder,
    pub(crate) members: MembersBuilder,
    pub(crate) presence: PresenceBuilder,
    pub(crate) sharding: Option<ShardingFn>,
    pub(crate) intents: GatewayIntents,
    pub(crate) client_hooks: Vec<ClientHook>,
}

impl ExtensibleBot {
    pub fn state(&self) -> &Arc<State> {
        &self.state
    }

    pub fn intents(&self) -> GatewayIntents {
        self.intents
    }

    /// Loads `extension` and runs the `extension_added` hooks.
    pub async fn add_extension<E>(&self, extension: E) -> Result<ExtensionId>
    where
        E: Extension,
    {
        self.add_dyn_extension(Arc::new(extension)).await
    }

    pub(crate) async fn add_dyn_extension(
        &self,
        extension: Arc<dyn Extension>,
    ) -> Result<ExtensionId> {
        let name = extension.name().to_owned();
        let id = self.state.extensions().add(extension).await?;

        run_extension_hooks(&self.hooks.extension_added, self, &name).await;

        Ok(id)
    }

    /// Unloads the extension `name` together with its commands and event
    /// handlers.
    pub async fn unload_extension(&self, name: &str) -> Result {
        self.state.extensions().remove(name).await
    }

    /// Connects to Discord and runs until all shards are shut down.
    pub async fn start(self, token: &str) -> Result {
        run_hooks("before_start", &self.hooks.before_start, &self).await;

        let cache = self.cache.clone();
        let handler = Handler {
            state: self.state.clone(),
            presence: self.presence.clone(),
            members: self.members.clone(),
        };

        let mut builder = Client::builder(token, self.intents)
            .event_handler(handler)
            .cache_settings(move |settings| cache.apply(settings));

        for hook in &self.client_hooks {
            builder = hook(builder);
        }

        let mut client = builder.await?;

        let shards = match &self.sharding {
            Some(sharding) => {
                let recommended = recommended_shards(&client.cache_and_http.http).await?;
                sharding(recommended)
            }
            None => Shards::Auto,
        };

        log::info!("[CORE] Starting with {:?}", shards);

        match shards {
            Shards::Auto => client.start_autosharded().await?,
            Shards::Count(total) => client.start_shards(total).await?,
            Shards::Range { start, end, total } => {
                client.start_shard_range([start, end], total).await?
            }
        }

        Ok(())
    }
}

async fn recommended_shards(http: &Http) -> Result<u64> {
    Ok(http.get_bot_gateway().await?.shards)
}

impl Debug for ExtensibleBot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensibleBot")
            .field("state", &self.state)
            .field("intents", &self.intents)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::builders::BotBuilder;
    use crate::error::{Error, Result};
    use crate::extension::{Extension, ExtensionBuilder};

    use async_trait::async_trait;

    struct Greeter;

    #[async_trait]
    impl Extension for Greeter {
        fn name(&self) -> &str {
            "greeter"
        }

        async fn setup(&self, builder: &mut ExtensionBuilder) -> Result {
            builder.message_command::<(), _>(|cmd| {
                cmd.name("greet")
                    .action(|ctx| async move { ctx.respond("Hello!").await });
            })?;

            Ok(())
        }
    }

    #[tokio::test]
    async fn test_add_and_unload_extension() {
        let bot = BotBuilder::new().build().await;

        bot.add_extension(Greeter).await.unwrap();
        assert!(bot.state().message_commands().get("greet").is_some());

        assert!(matches!(
            bot.add_extension(Greeter).await,
            Err(Error::DuplicateExtension(name)) if name == "greeter"
        ));

        bot.unload_extension("greeter").await.unwrap();
        assert!(bot.state().message_commands().get("greet").is_none());
        assert!(matches!(
            bot.unload_extension("greeter").await,
            Err(Error::UnknownExtension(_))
        ));
    }
}
