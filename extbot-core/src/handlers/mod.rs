//! Gateway event handling.
mod interaction;
mod message;

pub use interaction::handle_interaction;
pub use message::handle_message;

use crate::builders::{MembersBuilder, PresenceBuilder};
use crate::extension::EventContext;
use crate::responder::{InteractionResponder, MessageResponder};
use crate::slash::interaction::SlashInteraction;
use crate::state::State;
use crate::supplier::{EntitySupplier, SerenitySupplier};

use extbot::event::{
    EventData, GuildMemberAdditionData, GuildMemberRemovalData, MessageData, ReadyData,
};

use async_trait::async_trait;
use chrono::Utc;
use serenity::client::bridge::gateway::ChunkGuildFilter;
use serenity::client::{Context, EventHandler};
use serenity::model::application::interaction::Interaction;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::guild::Member;
use serenity::model::id::GuildId;
use serenity::model::user::User;

use std::sync::Arc;

/// Forwards serenity events to the command handlers and extensions.
pub(crate) struct Handler {
    pub(crate) state: Arc<State>,
    pub(crate) presence: PresenceBuilder,
    pub(crate) members: MembersBuilder,
}

impl Handler {
    fn supplier(&self, ctx: &Context) -> Arc<dyn EntitySupplier> {
        Arc::new(SerenitySupplier::new(
            ctx.cache.clone(),
            ctx.http.clone(),
            self.state.strategy(),
        ))
    }

    async fn dispatch<T>(&self, ctx: &Context, event: T)
    where
        T: Into<EventData> + Send,
    {
        let ctx = EventContext {
            event: event.into(),
            http: ctx.http.clone(),
            supplier: self.supplier(ctx),
            translations: self.state.translations(),
        };

        self.state.extensions().dispatch(ctx).await;
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        log::info!(
            "[CORE] Connected as {}#{:04}",
            ready.user.name,
            ready.user.discriminator
        );

        self.state.set_bot_id(ready.user.id.into());
        *self.state.connect_time.write() = Some(Utc::now());

        let (activity, status) = self.presence.to_serenity();
        ctx.set_presence(activity, status).await;

        for guild in &ready.guilds {
            if self.members.should_fill(guild.id.into()) {
                log::debug!("[CORE] Requesting members of guild {}", guild.id);
                ctx.shard
                    .chunk_guild(guild.id, None, ChunkGuildFilter::None, None);
            }
        }

        let settings = &self.state.slash_settings;
        if settings.enabled && settings.register {
            if let Err(err) = self.state.slash_commands().sync(&ctx.http).await {
                log::error!("[CORE] Failed to register slash commands: {}", err);
            }
        }

        let event = ReadyData {
            user: extbot::model::User {
                id: ready.user.id.into(),
                bot: ready.user.bot,
                discriminator: ready.user.discriminator,
                name: ready.user.name.clone(),
            },
            guilds: ready.guilds.iter().map(|guild| guild.id.into()).collect(),
        };

        self.dispatch(&ctx, event).await;
    }

    async fn message(&self, ctx: Context, message: Message) {
        let message = extbot::model::Message::from(message);

        self.dispatch(&ctx, MessageData(message.clone())).await;

        let responder = Arc::new(MessageResponder::new(
            ctx.http.clone(),
            message.channel_id,
            message.id,
        ));

        if let Err(err) =
            handle_message(&self.state, message, self.supplier(&ctx), responder).await
        {
            log::error!("[CORE] Failed to handle message: {}", err);
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let interaction = match interaction {
            Interaction::ApplicationCommand(interaction) => interaction,
            _ => return,
        };

        let responder = Arc::new(InteractionResponder::new(
            ctx.http.clone(),
            interaction.clone(),
        ));

        if let Err(err) = handle_interaction(
            &self.state,
            SlashInteraction::from(interaction),
            self.supplier(&ctx),
            responder,
        )
        .await
        {
            log::error!("[CORE] Failed to handle interaction: {}", err);
        }
    }

    async fn guild_member_addition(&self, ctx: Context, member: Member) {
        let event = GuildMemberAdditionData {
            guild_id: member.guild_id.into(),
            member: member.into(),
        };

        self.dispatch(&ctx, event).await;
    }

    async fn guild_member_removal(
        &self,
        ctx: Context,
        guild_id: GuildId,
        user: User,
        member: Option<Member>,
    ) {
        let event = GuildMemberRemovalData {
            guild_id: guild_id.into(),
            user: user.into(),
            member: member.map(Into::into),
        };

        self.dispatch(&ctx, event).await;
    }
}
