use crate::check::{Check, MessageCreateEvent};

use extbot::model::Message;

use futures::future::BoxFuture;

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Resolves the prefix of a message, receiving the default prefix.
pub type PrefixResolver =
    Arc<dyn for<'a> Fn(&'a Message, &'a str) -> BoxFuture<'a, String> + Send + Sync>;

/// Settings for message commands.
#[derive(Clone)]
pub struct MessageCommandsBuilder {
    pub(crate) enabled: bool,
    pub(crate) default_prefix: String,
    pub(crate) invoke_on_mention: bool,
    pub(crate) prefix: Option<PrefixResolver>,
    pub(crate) checks: Vec<Check<MessageCreateEvent>>,
}

impl MessageCommandsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(&mut self, enabled: bool) -> &mut Self {
        self.enabled = enabled;
        self
    }

    pub fn default_prefix<T>(&mut self, prefix: T) -> &mut Self
    where
        T: ToString,
    {
        self.default_prefix = prefix.to_string();
        self
    }

    /// Whether mentioning the bot works as a prefix.
    pub fn invoke_on_mention(&mut self, invoke: bool) -> &mut Self {
        self.invoke_on_mention = invoke;
        self
    }

    /// Resolves the prefix per message, e.g. from a per-guild setting.
    pub fn prefix<F>(&mut self, f: F) -> &mut Self
    where
        F: for<'a> Fn(&'a Message, &'a str) -> BoxFuture<'a, String> + Send + Sync + 'static,
    {
        self.prefix = Some(Arc::new(f));
        self
    }

    /// Adds a check every message command invocation has to pass.
    pub fn check(&mut self, check: Check<MessageCreateEvent>) -> &mut Self {
        self.checks.push(check);
        self
    }

    pub(crate) async fn resolve_prefix(&self, message: &Message) -> String {
        match &self.prefix {
            Some(prefix) => prefix(message, &self.default_prefix).await,
            None => self.default_prefix.clone(),
        }
    }
}

impl Default for MessageCommandsBuilder {
    fn default() -> Self {
        Self {
            enabled: true,
            default_prefix: String::from("!"),
            invoke_on_mention: true,
            prefix: None,
            checks: Vec::new(),
        }
    }
}

impl Debug for MessageCommandsBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageCommandsBuilder")
            .field("enabled", &self.enabled)
            .field("default_prefix", &self.default_prefix)
            .field("invoke_on_mention", &self.invoke_on_mention)
            .field("prefix", &self.prefix.is_some())
            .field("checks", &self.checks.len())
            .finish()
    }
}
