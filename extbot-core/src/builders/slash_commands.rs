use crate::check::{Check, InteractionCreateEvent};

use extbot::model::GuildId;

use std::fmt::{self, Debug, Formatter};

/// Settings for slash commands.
#[derive(Clone)]
pub struct SlashCommandsBuilder {
    pub(crate) enabled: bool,
    pub(crate) default_guild: Option<GuildId>,
    pub(crate) register: bool,
    pub(crate) checks: Vec<Check<InteractionCreateEvent>>,
}

impl SlashCommandsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(&mut self, enabled: bool) -> &mut Self {
        self.enabled = enabled;
        self
    }

    /// Registers commands without a guild of their own in `guild_id`
    /// instead of globally.
    pub fn default_guild<T>(&mut self, guild_id: Option<T>) -> &mut Self
    where
        T: Into<GuildId>,
    {
        self.default_guild = guild_id.map(Into::into);
        self
    }

    /// Whether commands are synchronised with Discord when connecting.
    pub fn register(&mut self, register: bool) -> &mut Self {
        self.register = register;
        self
    }

    /// Adds a check every slash command invocation has to pass.
    pub fn check(&mut self, check: Check<InteractionCreateEvent>) -> &mut Self {
        self.checks.push(check);
        self
    }
}

impl Default for SlashCommandsBuilder {
    fn default() -> Self {
        Self {
            enabled: false,
            default_guild: None,
            register: true,
            checks: Vec::new(),
        }
    }
}

impl Debug for SlashCommandsBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlashCommandsBuilder")
            .field("enabled", &self.enabled)
            .field("default_guild", &self.default_guild)
            .field("register", &self.register)
            .field("checks", &self.checks.len())
            .finish()
    }
}
