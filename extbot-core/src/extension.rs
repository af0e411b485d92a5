//! Extensions bundle commands and event handlers that are loaded and
//! unloaded together.
use crate::argument::Arguments;
use crate::command::{LoadedCommand, MessageCommand, MessageCommandRegistry};
use crate::error::{Error, InvalidCommand, Result};
use crate::executor::Executor;
use crate::slash::{LoadedSlashCommand, SlashCommand, SlashCommandRegistry};
use crate::supplier::EntitySupplier;

use extbot::event::{Event, EventData, EventKind};
use extbot::i18n::Translations;

use async_trait::async_trait;
use futures::future::BoxFuture;
use parking_lot::RwLock;
use serenity::http::Http;

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExtensionId(pub u32);

impl Display for ExtensionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[async_trait]
pub trait Extension: Send + Sync + 'static {
    /// The unique name of the extension.
    fn name(&self) -> &str;

    /// Registers the commands and event handlers of the extension.
    async fn setup(&self, builder: &mut ExtensionBuilder) -> Result;

    /// Called after the extension was unloaded.
    async fn unload(&self) -> Result {
        Ok(())
    }
}

/// The context received by event handlers.
#[derive(Clone)]
pub struct EventContext<T> {
    pub event: T,
    pub http: Arc<Http>,
    pub supplier: Arc<dyn EntitySupplier>,
    pub translations: Arc<dyn Translations>,
}

impl<T> EventContext<T> {
    /// Replaces the event, returning the old one.
    pub fn swap<U>(self, event: U) -> (T, EventContext<U>) {
        (
            self.event,
            EventContext {
                event,
                http: self.http,
                supplier: self.supplier,
                translations: self.translations,
            },
        )
    }
}

impl<T> Debug for EventContext<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventContext")
            .field("event", &self.event)
            .finish()
    }
}

#[derive(Clone, Debug)]
struct EventHandler {
    kind: EventKind,
    executor: Executor<EventContext<EventData>>,
    extension: ExtensionId,
}

/// Collects what an extension registers during setup.
#[derive(Default)]
pub struct ExtensionBuilder {
    message_commands: Vec<LoadedCommand>,
    slash_commands: Vec<LoadedSlashCommand>,
    handlers: Vec<(EventKind, Executor<EventContext<EventData>>)>,
}

impl ExtensionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message_command<A, F>(&mut self, f: F) -> Result<&mut Self, InvalidCommand>
    where
        A: Arguments,
        F: FnOnce(&mut MessageCommand<A>),
    {
        let mut cmd = MessageCommand::new();
        f(&mut cmd);

        self.message_commands.push(cmd.load()?);
        Ok(self)
    }

    pub fn slash_command<A, F>(&mut self, f: F) -> Result<&mut Self, InvalidCommand>
    where
        A: Arguments,
        F: FnOnce(&mut SlashCommand<A>),
    {
        let mut cmd = SlashCommand::new();
        f(&mut cmd);

        self.slash_commands.push(cmd.load()?);
        Ok(self)
    }

    /// Adds an already loaded message command.
    pub fn add_message_command(&mut self, command: LoadedCommand) -> &mut Self {
        self.message_commands.push(command);
        self
    }

    /// Registers a handler for events of type `T`.
    pub fn event<T, F, Fut>(&mut self, f: F) -> &mut Self
    where
        T: Event,
        F: Fn(EventContext<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result> + Send + 'static,
    {
        let executor = Executor::from_fn(
            move |ctx: EventContext<EventData>| -> BoxFuture<'static, Result> {
                let (data, ctx) = ctx.swap(());

                match T::try_from(data) {
                    Ok(event) => Box::pin(f(ctx.swap(event).1)),
                    Err(_) => Box::pin(async { Ok(()) }),
                }
            },
        );

        self.handlers.push((T::kind(), executor));
        self
    }
}

#[derive(Clone)]
pub struct LoadedExtension {
    pub name: String,
    pub id: ExtensionId,
    extension: Arc<dyn Extension>,
}

impl Borrow<str> for LoadedExtension {
    fn borrow(&self) -> &str {
        &self.name
    }
}

impl PartialEq for LoadedExtension {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for LoadedExtension {}

impl Hash for LoadedExtension {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.name.hash(state);
    }
}

impl Debug for LoadedExtension {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedExtension")
            .field("name", &self.name)
            .field("id", &self.id)
            .finish()
    }
}

#[derive(Debug)]
struct InnerExtensionRegistry {
    map: RwLock<HashSet<LoadedExtension>>,
    handlers: RwLock<Vec<EventHandler>>,
    counter: AtomicU32,
    message_commands: MessageCommandRegistry,
    slash_commands: SlashCommandRegistry,
}

#[derive(Clone, Debug)]
pub struct ExtensionRegistry {
    inner: Arc<InnerExtensionRegistry>,
}

impl ExtensionRegistry {
    pub fn new(
        message_commands: MessageCommandRegistry,
        slash_commands: SlashCommandRegistry,
    ) -> Self {
        Self {
            inner: Arc::new(InnerExtensionRegistry {
                map: RwLock::default(),
                handlers: RwLock::default(),
                counter: AtomicU32::new(0),
                message_commands,
                slash_commands,
            }),
        }
    }

    /// Returns a single extension.
    pub fn get(&self, name: &str) -> Option<LoadedExtension> {
        self.inner.map.read().get(name).cloned()
    }

    /// Returns a list of all extensions.
    pub fn list(&self) -> Vec<LoadedExtension> {
        self.inner.map.read().iter().cloned().collect()
    }

    /// Sets up and loads an extension. Its commands and event handlers are
    /// associated with the returned id. Nothing is registered if any of
    /// them cannot be.
    pub async fn add(&self, extension: Arc<dyn Extension>) -> Result<ExtensionId> {
        let name = extension.name().to_owned();

        if self.inner.map.read().contains(name.as_str()) {
            return Err(Error::DuplicateExtension(name));
        }

        let mut builder = ExtensionBuilder::new();
        extension.setup(&mut builder).await?;

        let mut extensions = self.inner.map.write();

        if extensions.contains(name.as_str()) {
            return Err(Error::DuplicateExtension(name));
        }

        let id = self.generate_id()?;

        if let Err(err) = self.register(id, builder) {
            self.unregister(id);
            return Err(err);
        }

        extensions.insert(LoadedExtension {
            name: name.clone(),
            id,
            extension,
        });

        log::info!("[CORE] Loaded extension {} ({})", name, id);
        Ok(id)
    }

    fn register(&self, id: ExtensionId, builder: ExtensionBuilder) -> Result {
        for mut command in builder.message_commands {
            command.set_extension(Some(id));
            self.inner.message_commands.add(command, None)?;
        }

        for mut command in builder.slash_commands {
            command.set_extension(Some(id));
            self.inner.slash_commands.add(command)?;
        }

        self.inner
            .handlers
            .write()
            .extend(builder.handlers.into_iter().map(|(kind, executor)| EventHandler {
                kind,
                executor,
                extension: id,
            }));

        Ok(())
    }

    fn unregister(&self, id: ExtensionId) {
        self.inner.message_commands.remove_extension(id);
        self.inner.slash_commands.remove_extension(id);
        self.inner
            .handlers
            .write()
            .retain(|handler| handler.extension != id);
    }

    /// Unloads an extension together with its commands and event handlers.
    pub async fn remove(&self, name: &str) -> Result {
        let extension = self
            .inner
            .map
            .write()
            .take(name)
            .ok_or_else(|| Error::UnknownExtension(name.to_owned()))?;

        self.unregister(extension.id);
        log::info!("[CORE] Unloaded extension {}", name);

        extension.extension.unload().await
    }

    /// Runs all handlers for the kind of `ctx.event` concurrently. Failures
    /// are logged.
    pub async fn dispatch(&self, ctx: EventContext<EventData>) {
        let kind = ctx.event.kind();

        let handlers: Vec<_> = self
            .inner
            .handlers
            .read()
            .iter()
            .filter(|handler| handler.kind == kind)
            .cloned()
            .collect();

        let calls = handlers.iter().map(|handler| {
            let ctx = ctx.clone();

            async move {
                if let Err(err) = handler.executor.call(ctx).await {
                    log::error!(
                        "[CORE] {} handler of extension {} failed: {}",
                        kind,
                        handler.extension,
                        err
                    );
                }
            }
        });

        futures::future::join_all(calls).await;
    }

    /// Creates a new unique `ExtensionId`.
    fn generate_id(&self) -> Result<ExtensionId> {
        let val = self.inner.counter.fetch_add(1, Ordering::SeqCst);

        match val.checked_add(1) {
            Some(val) => Ok(ExtensionId(val)),
            None => Err(Error::other("reached the maximum amount of extensions")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Extension, ExtensionBuilder, ExtensionRegistry, EventContext};
    use crate::command::MessageCommandRegistry;
    use crate::error::{Error, Result};
    use crate::slash::SlashCommandRegistry;
    use crate::supplier::MemorySupplier;

    use extbot::event::{EventData, MessageData};
    use extbot::i18n::DefaultTranslations;
    use extbot::model::{ChannelId, Message, MessageId, User, UserId};

    use async_trait::async_trait;
    use serenity::http::Http;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counter {
        name: &'static str,
        seen: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Extension for Counter {
        fn name(&self) -> &str {
            self.name
        }

        async fn setup(&self, builder: &mut ExtensionBuilder) -> Result {
            builder.message_command::<(), _>(|cmd| {
                cmd.name(self.name).action(|_| async { Ok(()) });
            })?;

            let seen = self.seen.clone();
            builder.event(move |_: EventContext<MessageData>| {
                let seen = seen.clone();
                async move {
                    seen.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            });

            Ok(())
        }
    }

    struct Broken;

    #[async_trait]
    impl Extension for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        async fn setup(&self, builder: &mut ExtensionBuilder) -> Result {
            builder.message_command::<(), _>(|cmd| {
                cmd.name("fine").action(|_| async { Ok(()) });
            })?;
            // Clashes with the command of the `counter` extension.
            builder.message_command::<(), _>(|cmd| {
                cmd.name("counter").action(|_| async { Ok(()) });
            })?;
            Ok(())
        }
    }

    fn registry() -> (ExtensionRegistry, MessageCommandRegistry) {
        let commands = MessageCommandRegistry::new();
        let registry = ExtensionRegistry::new(commands.clone(), SlashCommandRegistry::new(None));
        (registry, commands)
    }

    fn message_event() -> EventContext<EventData> {
        EventContext {
            event: MessageData(Message {
                id: MessageId(1),
                channel_id: ChannelId(2),
                guild_id: None,
                author: User {
                    id: UserId(3),
                    bot: false,
                    discriminator: 1,
                    name: String::from("alice"),
                },
                content: String::from("hi"),
            })
            .into(),
            http: Arc::new(Http::new("")),
            supplier: Arc::new(MemorySupplier::new()),
            translations: Arc::new(DefaultTranslations::default()),
        }
    }

    #[tokio::test]
    async fn test_add_remove() {
        let (registry, commands) = registry();
        let seen = Arc::new(AtomicUsize::new(0));

        let counter = Arc::new(Counter {
            name: "counter",
            seen: seen.clone(),
        });
        let id = registry.add(counter.clone()).await.unwrap();
        assert_eq!(registry.get("counter").unwrap().id, id);
        assert_eq!(commands.get("counter").unwrap().extension(), Some(id));

        assert!(matches!(
            registry.add(counter).await,
            Err(Error::DuplicateExtension(_))
        ));

        registry.dispatch(message_event()).await;
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        registry.remove("counter").await.unwrap();
        assert!(commands.is_empty());
        registry.dispatch(message_event()).await;
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        assert!(matches!(
            registry.remove("counter").await,
            Err(Error::UnknownExtension(_))
        ));
    }

    #[tokio::test]
    async fn test_add_rollback() {
        let (registry, commands) = registry();
        let seen = Arc::new(AtomicUsize::new(0));

        registry
            .add(Arc::new(Counter {
                name: "counter",
                seen,
            }))
            .await
            .unwrap();

        assert!(matches!(
            registry.add(Arc::new(Broken)).await,
            Err(Error::DuplicateName(_))
        ));
        assert!(commands.get("fine").is_none());
        assert!(registry.get("broken").is_none());
        assert_eq!(registry.list().len(), 1);
    }
}
