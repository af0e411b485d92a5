pub mod argument;
pub mod bot;
pub mod builders;
pub mod check;
pub mod command;
pub mod context;
pub mod converters;
pub mod error;
pub mod executor;
pub mod extension;
pub mod handlers;
pub mod help;
pub mod responder;
pub mod router;
pub mod slash;
pub mod state;
pub mod supplier;

pub use extbot;

pub use {
    argument::{Argument, Arguments, ParsedArguments},
    bot::ExtensibleBot,
    builders::BotBuilder,
    command::MessageCommand,
    context::{CommandContext, MessageCommandContext, SlashCommandContext},
    error::{CommandError, Error, Result},
    extension::{EventContext, Extension, ExtensionBuilder},
    slash::SlashCommand,
};
