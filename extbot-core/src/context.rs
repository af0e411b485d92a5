use crate::error::{CommandError, Result};
use crate::responder::Responder;
use crate::slash::interaction::SlashInteraction;
use crate::supplier::EntitySupplier;

use extbot::builder::CreateMessage;
use extbot::i18n::{Locale, Translations};
use extbot::model::{ChannelId, GuildId, Message, User};

use std::fmt::{self, Debug, Formatter};
use std::ops::Deref;
use std::sync::Arc;

/// Everything a converter or command handler needs to know about the
/// invocation it is serving.
#[derive(Clone)]
pub struct CommandContext {
    pub supplier: Arc<dyn EntitySupplier>,
    pub translations: Arc<dyn Translations>,
    pub locale: Locale,
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub author: User,
    /// Makes all responses ephemeral.
    pub ephemeral: bool,
    responder: Arc<dyn Responder>,
}

impl CommandContext {
    pub fn new(
        supplier: Arc<dyn EntitySupplier>,
        translations: Arc<dyn Translations>,
        responder: Arc<dyn Responder>,
        channel_id: ChannelId,
        author: User,
    ) -> Self {
        Self {
            supplier,
            translations,
            locale: Locale::default(),
            guild_id: None,
            channel_id,
            author,
            ephemeral: false,
            responder,
        }
    }

    /// Translates `key` into the locale of this invocation.
    pub fn translate(&self, key: &str, replacements: &[&str]) -> String {
        self.translations
            .translate(key, &self.locale, replacements)
    }

    /// Creates a [`CommandError`] with the translation of `key`.
    pub fn error(&self, key: &str, replacements: &[&str]) -> CommandError {
        CommandError(self.translate(key, replacements))
    }

    pub async fn respond<T>(&self, message: T) -> Result
    where
        T: Into<CreateMessage>,
    {
        let mut message = message.into();

        if self.ephemeral {
            message.ephemeral(true);
        }

        self.responder.respond(message).await
    }

    /// Responds with an error. Error responses of slash commands are always
    /// ephemeral, regardless of `show_source`.
    pub async fn respond_error<T>(&self, message: T) -> Result
    where
        T: Into<CreateMessage>,
    {
        let mut message = message.into();
        message.ephemeral(true);

        self.responder.respond(message).await
    }
}

impl Debug for CommandContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("locale", &self.locale)
            .field("guild_id", &self.guild_id)
            .field("channel_id", &self.channel_id)
            .field("author", &self.author)
            .field("ephemeral", &self.ephemeral)
            .finish()
    }
}

/// The context received by message command handlers.
#[derive(Clone, Debug)]
pub struct MessageCommandContext<A> {
    pub ctx: CommandContext,
    pub message: Message,
    pub args: A,
    /// The prefix the command was invoked with.
    pub prefix: String,
    /// The command path as typed by the user, e.g. `config prefix`.
    pub invoked: String,
}

impl<A> Deref for MessageCommandContext<A> {
    type Target = CommandContext;

    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

/// The context received by slash command handlers.
#[derive(Clone, Debug)]
pub struct SlashCommandContext<A> {
    pub ctx: CommandContext,
    pub interaction: SlashInteraction,
    pub args: A,
}

impl<A> Deref for SlashCommandContext<A> {
    type Target = CommandContext;

    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}
