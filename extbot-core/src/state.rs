use crate::builders::{I18nBuilder, MessageCommandsBuilder, SlashCommandsBuilder};
use crate::command::MessageCommandRegistry;
use crate::extension::ExtensionRegistry;
use crate::slash::SlashCommandRegistry;
use crate::supplier::SupplyStrategy;

use extbot::i18n::{Locale, Translations};
use extbot::model::{ChannelId, GuildId, UserId};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// The global shared state.
pub struct State {
    pub(crate) message_settings: MessageCommandsBuilder,
    pub(crate) slash_settings: SlashCommandsBuilder,
    i18n: I18nBuilder,
    translations: Arc<dyn Translations>,
    strategy: SupplyStrategy,
    message_commands: MessageCommandRegistry,
    slash_commands: SlashCommandRegistry,
    extensions: ExtensionRegistry,
    bot_id: RwLock<Option<UserId>>,
    pub connect_time: RwLock<Option<DateTime<Utc>>>,
}

impl State {
    pub fn new(
        message_settings: MessageCommandsBuilder,
        slash_settings: SlashCommandsBuilder,
        i18n: I18nBuilder,
        strategy: SupplyStrategy,
    ) -> Self {
        let message_commands = MessageCommandRegistry::new();
        let slash_commands = SlashCommandRegistry::new(slash_settings.default_guild);
        let extensions = ExtensionRegistry::new(message_commands.clone(), slash_commands.clone());

        Self {
            translations: i18n.build_translations(),
            message_settings,
            slash_settings,
            i18n,
            strategy,
            message_commands,
            slash_commands,
            extensions,
            bot_id: RwLock::new(None),
            connect_time: RwLock::new(None),
        }
    }

    /// Returns a reference to the [`MessageCommandRegistry`].
    pub fn message_commands(&self) -> &MessageCommandRegistry {
        &self.message_commands
    }

    /// Returns a reference to the [`SlashCommandRegistry`].
    pub fn slash_commands(&self) -> &SlashCommandRegistry {
        &self.slash_commands
    }

    /// Returns a reference to the [`ExtensionRegistry`].
    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    pub fn translations(&self) -> Arc<dyn Translations> {
        self.translations.clone()
    }

    /// The strategy used by suppliers created for events.
    pub fn strategy(&self) -> SupplyStrategy {
        self.strategy
    }

    /// The user id of the bot, known once connected.
    pub fn bot_id(&self) -> Option<UserId> {
        *self.bot_id.read()
    }

    pub(crate) fn set_bot_id(&self, id: UserId) {
        *self.bot_id.write() = Some(id);
    }

    pub async fn resolve_locale(
        &self,
        guild_id: Option<GuildId>,
        channel_id: ChannelId,
        user_id: UserId,
        user_locale: Option<&str>,
    ) -> Locale {
        self.i18n
            .resolve(guild_id, channel_id, user_id, user_locale)
            .await
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new(
            MessageCommandsBuilder::default(),
            SlashCommandsBuilder::default(),
            I18nBuilder::default(),
            SupplyStrategy::default(),
        )
    }
}

impl Debug for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("message_settings", &self.message_settings)
            .field("slash_settings", &self.slash_settings)
            .field("i18n", &self.i18n)
            .field("strategy", &self.strategy)
            .field("message_commands", &self.message_commands.len())
            .field("slash_commands", &self.slash_commands.len())
            .field("bot_id", &self.bot_id())
            .finish()
    }
}
