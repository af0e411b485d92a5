//! Message commands.
mod registry;

pub use registry::MessageCommandRegistry;

use crate::argument::{parse_message_arguments, signature_string, Arguments};
use crate::check::{Check, MessageCreateEvent};
use crate::context::{CommandContext, MessageCommandContext};
use crate::error::{InvalidCommand, Result};
use crate::executor::Executor;
use crate::extension::ExtensionId;

use extbot::arguments::CommandArguments;
use extbot::model::Message;

use futures::future::BoxFuture;

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

type MessageAction<A> =
    Arc<dyn Fn(MessageCommandContext<A>) -> BoxFuture<'static, Result> + Send + Sync>;

/// Everything an erased message command executor needs to run.
#[derive(Debug)]
pub(crate) struct MessageInvocation {
    pub ctx: CommandContext,
    pub message: Message,
    pub args: CommandArguments,
    pub prefix: String,
    pub invoked: String,
}

/// Builder of a message command taking the arguments `A`.
///
/// ```ignore
/// let mut cmd = MessageCommand::<BanArgs>::new();
/// cmd.name("ban")
///     .description("Bans a member.")
///     .guild_only(true)
///     .action(|ctx| async move {
///         ctx.respond(format!("Banned {}", ctx.args.target.user.tag())).await
///     });
/// let cmd = cmd.load()?;
/// ```
pub struct MessageCommand<A = ()> {
    name: String,
    aliases: Vec<String>,
    description: String,
    signature: Option<String>,
    hidden: bool,
    enabled: bool,
    guild_only: bool,
    checks: Vec<Check<MessageCreateEvent>>,
    action: Option<MessageAction<A>>,
    sub_commands: Vec<LoadedCommand>,
    errors: Vec<InvalidCommand>,
    _marker: PhantomData<fn() -> A>,
}

impl<A> MessageCommand<A>
where
    A: Arguments,
{
    pub fn new() -> Self {
        Self {
            name: String::new(),
            aliases: Vec::new(),
            description: String::new(),
            signature: None,
            hidden: false,
            enabled: true,
            guild_only: false,
            checks: Vec::new(),
            action: None,
            sub_commands: Vec::new(),
            errors: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn name<T>(&mut self, name: T) -> &mut Self
    where
        T: ToString,
    {
        self.name = name.to_string();
        self
    }

    pub fn alias<T>(&mut self, alias: T) -> &mut Self
    where
        T: ToString,
    {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn aliases<I, T>(&mut self, aliases: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        self.aliases
            .extend(aliases.into_iter().map(|alias| alias.to_string()));
        self
    }

    pub fn description<T>(&mut self, description: T) -> &mut Self
    where
        T: ToString,
    {
        self.description = description.to_string();
        self
    }

    /// Overrides the signature rendered from the arguments.
    pub fn signature<T>(&mut self, signature: T) -> &mut Self
    where
        T: ToString,
    {
        self.signature = Some(signature.to_string());
        self
    }

    /// Hidden commands are not listed by the help command.
    pub fn hidden(&mut self, hidden: bool) -> &mut Self {
        self.hidden = hidden;
        self
    }

    pub fn enabled(&mut self, enabled: bool) -> &mut Self {
        self.enabled = enabled;
        self
    }

    pub fn guild_only(&mut self, guild_only: bool) -> &mut Self {
        self.guild_only = guild_only;
        self
    }

    pub fn check(&mut self, check: Check<MessageCreateEvent>) -> &mut Self {
        self.checks.push(check);
        self
    }

    pub fn action<F, Fut>(&mut self, f: F) -> &mut Self
    where
        F: Fn(MessageCommandContext<A>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result> + Send + 'static,
    {
        self.action = Some(Arc::new(move |ctx| Box::pin(f(ctx))));
        self
    }

    /// Builds a sub command in `f`. An invalid sub command makes this command
    /// invalid.
    pub fn sub_command<B, F>(&mut self, f: F) -> &mut Self
    where
        B: Arguments,
        F: FnOnce(&mut MessageCommand<B>),
    {
        let mut cmd = MessageCommand::new();
        f(&mut cmd);

        match cmd.load() {
            Ok(cmd) => self.sub_commands.push(cmd),
            Err(err) => self.errors.push(err),
        }

        self
    }

    pub fn add_sub_command(&mut self, command: LoadedCommand) -> &mut Self {
        self.sub_commands.push(command);
        self
    }

    pub fn validate(&self) -> Result<(), InvalidCommand> {
        if let Some(err) = self.errors.first() {
            return Err(err.clone());
        }

        if self.name.is_empty() {
            return Err(InvalidCommand::new(&self.name, "No command name given."));
        }

        if self.name.contains(char::is_whitespace) {
            return Err(InvalidCommand::new(
                &self.name,
                "Command names may not contain whitespace.",
            ));
        }

        if self
            .aliases
            .iter()
            .any(|alias| alias.is_empty() || alias.contains(char::is_whitespace))
        {
            return Err(InvalidCommand::new(
                &self.name,
                "Command aliases must not be empty or contain whitespace.",
            ));
        }

        if self.action.is_none() && self.sub_commands.is_empty() {
            return Err(InvalidCommand::new(&self.name, "No command action given."));
        }

        let mut names = HashSet::new();
        for sub in &self.sub_commands {
            let taken = std::iter::once(&sub.name)
                .chain(sub.aliases.iter())
                .any(|name| !names.insert(name.as_str()));

            if taken {
                return Err(InvalidCommand::new(
                    &self.name,
                    format!("Duplicate sub command name `{}`.", sub.name),
                ));
            }
        }

        Ok(())
    }

    /// Validates the command and erases its argument type.
    pub fn load(self) -> Result<LoadedCommand, InvalidCommand> {
        self.validate()?;

        let signature = self
            .signature
            .unwrap_or_else(|| signature_string(&A::signature()));

        let executor = self.action.map(|action| {
            Executor::from_fn(move |invocation| invoke::<A>(action.clone(), invocation))
        });

        Ok(LoadedCommand {
            name: self.name.to_lowercase(),
            aliases: self
                .aliases
                .iter()
                .map(|alias| alias.to_lowercase())
                .collect(),
            description: self.description,
            signature,
            hidden: self.hidden,
            enabled: self.enabled,
            guild_only: self.guild_only,
            executor,
            sub_commands: self
                .sub_commands
                .into_iter()
                .map(|mut sub| {
                    sub.inherit(&self.checks, self.guild_only, self.enabled);
                    sub
                })
                .collect(),
            checks: self.checks,
            extension: None,
        })
    }
}

impl<A> Default for MessageCommand<A>
where
    A: Arguments,
{
    fn default() -> Self {
        Self::new()
    }
}

async fn invoke<A>(action: MessageAction<A>, invocation: MessageInvocation) -> Result
where
    A: Arguments,
{
    let MessageInvocation {
        ctx,
        message,
        mut args,
        prefix,
        invoked,
    } = invocation;

    let parsed = parse_message_arguments(&A::signature(), &mut args, &ctx)
        .await
        .and_then(|mut parsed| A::from_parsed(&mut parsed));

    let args = match parsed {
        Ok(args) => args,
        Err(err) => {
            let usage = format!(
                "{}{} {}",
                prefix,
                invoked,
                signature_string(&A::signature())
            );
            let usage = ctx.translate("commands.error.usage", &[usage.trim_end()]);

            ctx.respond(format!("{}\n{}", err, usage)).await?;
            return Ok(());
        }
    };

    action(MessageCommandContext {
        ctx,
        message,
        args,
        prefix,
        invoked,
    })
    .await
}

/// A validated message command with its argument type erased.
#[derive(Clone)]
pub struct LoadedCommand {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub signature: String,
    pub hidden: bool,
    pub enabled: bool,
    pub guild_only: bool,
    pub sub_commands: HashSet<LoadedCommand>,
    pub(crate) checks: Vec<Check<MessageCreateEvent>>,
    pub(crate) executor: Option<Executor<MessageInvocation>>,
    pub(crate) extension: Option<ExtensionId>,
}

impl LoadedCommand {
    /// The extension this command was registered by.
    pub fn extension(&self) -> Option<ExtensionId> {
        self.extension
    }

    /// Whether the command runs an action when invoked. Commands without
    /// one only group sub commands.
    pub fn is_executable(&self) -> bool {
        self.executor.is_some()
    }

    /// Prepends the checks of a parent command. Sub commands of guild only
    /// or disabled commands are guild only or disabled as well.
    fn inherit(&mut self, checks: &[Check<MessageCreateEvent>], guild_only: bool, enabled: bool) {
        let mut merged = checks.to_vec();
        merged.append(&mut self.checks);
        self.checks = merged;
        self.guild_only |= guild_only;
        self.enabled &= enabled;

        self.sub_commands = self
            .sub_commands
            .drain()
            .map(|mut cmd| {
                cmd.inherit(checks, guild_only, enabled);
                cmd
            })
            .collect();
    }

    pub(crate) fn set_extension(&mut self, id: Option<ExtensionId>) {
        self.extension = id;

        self.sub_commands = self
            .sub_commands
            .drain()
            .map(|mut cmd| {
                cmd.set_extension(id);
                cmd
            })
            .collect();
    }

    /// Whether this command is called `name` or has it as alias.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|alias| alias == name)
    }
}

impl Borrow<str> for LoadedCommand {
    fn borrow(&self) -> &str {
        &self.name
    }
}

impl PartialEq for LoadedCommand {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for LoadedCommand {}

impl Hash for LoadedCommand {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.name.hash(state);
    }
}

impl Debug for LoadedCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedCommand")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("description", &self.description)
            .field("signature", &self.signature)
            .field("hidden", &self.hidden)
            .field("enabled", &self.enabled)
            .field("guild_only", &self.guild_only)
            .field("sub_commands", &self.sub_commands)
            .field("extension", &self.extension)
            .finish()
    }
}
