use crate::check::{Check, MessageCreateEvent};
use crate::extension::Extension;

use extbot::builder::Color;

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

type ExtensionFactory = Arc<dyn Fn() -> Arc<dyn Extension> + Send + Sync>;

/// The extensions loaded when the bot is built.
#[derive(Clone, Default)]
pub struct ExtensionsBuilder {
    pub(crate) extensions: Vec<ExtensionFactory>,
    pub(crate) help: HelpExtensionBuilder,
}

impl ExtensionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an extension created by `factory`.
    pub fn add<F, E>(&mut self, factory: F) -> &mut Self
    where
        F: Fn() -> E + Send + Sync + 'static,
        E: Extension,
    {
        self.extensions
            .push(Arc::new(move || Arc::new(factory()) as Arc<dyn Extension>));
        self
    }

    /// Configures the bundled help extension.
    pub fn help<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut HelpExtensionBuilder),
    {
        f(&mut self.help);
        self
    }
}

impl Debug for ExtensionsBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionsBuilder")
            .field("extensions", &self.extensions.len())
            .field("help", &self.help)
            .finish()
    }
}

/// Settings of the bundled help extension.
#[derive(Clone)]
pub struct HelpExtensionBuilder {
    pub(crate) enable_bundled_extension: bool,
    pub(crate) ping_in_reply: bool,
    pub(crate) colour: Color,
    pub(crate) checks: Vec<Check<MessageCreateEvent>>,
}

impl HelpExtensionBuilder {
    pub fn enable_bundled_extension(&mut self, enable: bool) -> &mut Self {
        self.enable_bundled_extension = enable;
        self
    }

    /// Whether help replies mention the invoking user.
    pub fn ping_in_reply(&mut self, ping: bool) -> &mut Self {
        self.ping_in_reply = ping;
        self
    }

    pub fn colour<T>(&mut self, colour: T) -> &mut Self
    where
        T: Into<Color>,
    {
        self.colour = colour.into();
        self
    }

    pub fn check(&mut self, check: Check<MessageCreateEvent>) -> &mut Self {
        self.checks.push(check);
        self
    }
}

impl Default for HelpExtensionBuilder {
    fn default() -> Self {
        Self {
            enable_bundled_extension: true,
            ping_in_reply: true,
            colour: Color::BLURPLE,
            checks: Vec::new(),
        }
    }
}

impl Debug for HelpExtensionBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelpExtensionBuilder")
            .field("enable_bundled_extension", &self.enable_bundled_extension)
            .field("ping_in_reply", &self.ping_in_reply)
            .field("colour", &self.colour)
            .field("checks", &self.checks.len())
            .finish()
    }
}
