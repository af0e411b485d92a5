use crate::bot::ExtensibleBot;

use futures::future::BoxFuture;

use std::error::Error as StdError;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

pub type HookResult = Result<(), Box<dyn StdError + Send + Sync>>;

pub type Hook = Arc<dyn for<'a> Fn(&'a ExtensibleBot) -> BoxFuture<'a, HookResult> + Send + Sync>;

/// A hook receiving the name of the extension that was added.
pub type ExtensionHook =
    Arc<dyn for<'a> Fn(&'a ExtensibleBot, &'a str) -> BoxFuture<'a, HookResult> + Send + Sync>;

/// Hooks into the lifecycle of the bot. Hooks of one kind run in the order
/// they were added. A failing hook is logged and does not stop the others.
#[derive(Clone, Default)]
pub struct HooksBuilder {
    pub(crate) created: Vec<Hook>,
    pub(crate) setup: Vec<Hook>,
    pub(crate) before_extensions_added: Vec<Hook>,
    pub(crate) extension_added: Vec<ExtensionHook>,
    pub(crate) after_extensions_added: Vec<Hook>,
    pub(crate) before_start: Vec<Hook>,
}

macro_rules! hook_setter {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        pub fn $name<F>(&mut self, f: F) -> &mut Self
        where
            F: for<'a> Fn(&'a ExtensibleBot) -> BoxFuture<'a, HookResult> + Send + Sync + 'static,
        {
            self.$name.push(Arc::new(f));
            self
        }
    };
}

impl HooksBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    hook_setter!(
        /// Runs right after the bot was created.
        created
    );
    hook_setter!(
        /// Runs after the bot set up its registries and bundled extensions.
        setup
    );
    hook_setter!(before_extensions_added);
    hook_setter!(after_extensions_added);
    hook_setter!(
        /// Runs before connecting to Discord.
        before_start
    );

    /// Runs after every successfully added extension.
    pub fn extension_added<F>(&mut self, f: F) -> &mut Self
    where
        F: for<'a> Fn(&'a ExtensibleBot, &'a str) -> BoxFuture<'a, HookResult>
            + Send
            + Sync
            + 'static,
    {
        self.extension_added.push(Arc::new(f));
        self
    }
}

impl Debug for HooksBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("HooksBuilder")
            .field("created", &self.created.len())
            .field("setup", &self.setup.len())
            .field("before_extensions_added", &self.before_extensions_added.len())
            .field("extension_added", &self.extension_added.len())
            .field("after_extensions_added", &self.after_extensions_added.len())
            .field("before_start", &self.before_start.len())
            .finish()
    }
}

/// Runs `hooks` in order, logging failures.
pub(crate) async fn run_hooks(name: &str, hooks: &[Hook], bot: &ExtensibleBot) {
    for (index, hook) in hooks.iter().enumerate() {
        if let Err(err) = hook(bot).await {
            log::error!("[CORE] {} hook #{} failed: {}", name, index, err);
        }
    }
}

pub(crate) async fn run_extension_hooks(hooks: &[ExtensionHook], bot: &ExtensibleBot, extension: &str) {
    for (index, hook) in hooks.iter().enumerate() {
        if let Err(err) = hook(bot, extension).await {
            log::error!(
                "[CORE] extension_added hook #{} failed for {}: {}",
                index,
                extension,
                err
            );
        }
    }
}
