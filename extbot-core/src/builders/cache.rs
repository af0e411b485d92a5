use crate::supplier::SupplyStrategy;

use serenity::cache::Settings;

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

pub const DEFAULT_CACHED_MESSAGES: usize = 10_000;

type SettingsHook = Arc<dyn Fn(&mut Settings) + Send + Sync>;

/// Configures the serenity cache and how entities are looked up.
#[derive(Clone)]
pub struct CacheBuilder {
    pub(crate) cached_messages: Option<usize>,
    pub(crate) default_strategy: SupplyStrategy,
    settings: Vec<SettingsHook>,
}

impl CacheBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of messages cached per channel. `None` or `0` disables
    /// the message cache.
    pub fn cached_messages(&mut self, cached_messages: Option<usize>) -> &mut Self {
        self.cached_messages = cached_messages;
        self
    }

    pub fn default_strategy(&mut self, strategy: SupplyStrategy) -> &mut Self {
        self.default_strategy = strategy;
        self
    }

    /// Adjusts the serenity cache settings directly. Runs after the message
    /// limit was applied.
    pub fn settings<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&mut Settings) + Send + Sync + 'static,
    {
        self.settings.push(Arc::new(f));
        self
    }

    pub(crate) fn apply<'a>(&self, settings: &'a mut Settings) -> &'a mut Settings {
        settings.max_messages(self.cached_messages.unwrap_or(0));

        for hook in &self.settings {
            hook(settings);
        }

        settings
    }
}

impl Default for CacheBuilder {
    fn default() -> Self {
        Self {
            cached_messages: Some(DEFAULT_CACHED_MESSAGES),
            default_strategy: SupplyStrategy::default(),
            settings: Vec::new(),
        }
    }
}

impl Debug for CacheBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheBuilder")
            .field("cached_messages", &self.cached_messages)
            .field("default_strategy", &self.default_strategy)
            .finish()
    }
}
