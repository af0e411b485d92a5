pub mod arguments;
pub mod builder;
pub mod event;
pub mod i18n;
pub mod model;

pub use {
    arguments::{parse_args, CommandArguments},
    builder::{Color, CreateEmbed, CreateMessage},
    i18n::{Locale, Translations},
};
