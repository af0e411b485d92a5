//! Slash commands.
pub mod interaction;
mod registry;

pub use registry::SlashCommandRegistry;

use crate::argument::{parse_slash_arguments, Argument, Arguments, Arity};
use crate::check::{run_checks, Check, InteractionCreateEvent};
use crate::context::{CommandContext, SlashCommandContext};
use crate::error::{InvalidCommand, Result};
use crate::executor::Executor;
use crate::extension::ExtensionId;

use interaction::{InteractionOption, OptionKind, SlashInteraction};

use extbot::model::GuildId;

use futures::future::BoxFuture;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use serenity::builder::{CreateApplicationCommand, CreateApplicationCommandOption};

use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

const MAX_DESCRIPTION_LENGTH: usize = 100;
const MAX_OPTIONS: usize = 25;

static NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-_\p{L}\p{N}]{1,32}$").expect("valid name regex"));

type SlashAction<A> =
    Arc<dyn Fn(SlashCommandContext<A>) -> BoxFuture<'static, Result> + Send + Sync>;

/// Everything an erased slash command executor needs to run.
#[derive(Debug)]
pub(crate) struct SlashInvocation {
    pub ctx: CommandContext,
    pub interaction: SlashInteraction,
    pub options: Vec<InteractionOption>,
}

/// Whether `name` is a valid slash command, group or option name: 1 to 32
/// lowercase letters, numbers, `-` or `_`.
pub fn is_valid_name(name: &str) -> bool {
    NAME_REGEX.is_match(name) && name.to_lowercase() == name
}

fn validate_name(name: &str) -> Result<(), InvalidCommand> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(InvalidCommand::new(
            name,
            "Names must be 1-32 lowercase letters, numbers, dashes or underscores.",
        ))
    }
}

fn validate_description(name: &str, description: Option<&str>) -> Result<(), InvalidCommand> {
    match description {
        None | Some("") => Err(InvalidCommand::new(name, "No command description given.")),
        Some(description) if description.chars().count() > MAX_DESCRIPTION_LENGTH => Err(
            InvalidCommand::new(name, "Descriptions may not be longer than 100 characters."),
        ),
        Some(_) => Ok(()),
    }
}

/// Builder of a slash command taking the arguments `A`.
///
/// Without `show_source`, all responses are only visible to the invoking
/// user.
pub struct SlashCommand<A = ()> {
    name: String,
    description: Option<String>,
    guild: Option<GuildId>,
    show_source: bool,
    checks: Vec<Check<InteractionCreateEvent>>,
    action: Option<SlashAction<A>>,
    sub_commands: Vec<LoadedSlashCommand>,
    groups: Vec<SlashGroup>,
    errors: Vec<InvalidCommand>,
    _marker: PhantomData<fn() -> A>,
}

impl<A> SlashCommand<A>
where
    A: Arguments,
{
    pub fn new() -> Self {
        Self {
            name: String::new(),
            description: None,
            guild: None,
            show_source: false,
            checks: Vec::new(),
            action: None,
            sub_commands: Vec::new(),
            groups: Vec::new(),
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

    pub fn description<T>(&mut self, description: T) -> &mut Self
    where
        T: ToString,
    {
        self.description = Some(description.to_string());
        self
    }

    /// Registers the command in `guild_id` only instead of the default
    /// guild or globally.
    pub fn guild<T>(&mut self, guild_id: T) -> &mut Self
    where
        T: Into<GuildId>,
    {
        self.guild = Some(guild_id.into());
        self
    }

    pub fn show_source(&mut self, show_source: bool) -> &mut Self {
        self.show_source = show_source;
        self
    }

    pub fn check(&mut self, check: Check<InteractionCreateEvent>) -> &mut Self {
        self.checks.push(check);
        self
    }

    pub fn action<F, Fut>(&mut self, f: F) -> &mut Self
    where
        F: Fn(SlashCommandContext<A>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result> + Send + 'static,
    {
        self.action = Some(Arc::new(move |ctx| Box::pin(f(ctx))));
        self
    }

    pub fn sub_command<B, F>(&mut self, f: F) -> &mut Self
    where
        B: Arguments,
        F: FnOnce(&mut SlashCommand<B>),
    {
        let mut cmd = SlashCommand::new();
        f(&mut cmd);

        match cmd.load() {
            Ok(cmd) => self.sub_commands.push(cmd),
            Err(err) => self.errors.push(err),
        }

        self
    }

    /// Adds a group of sub commands named `name`.
    pub fn group<T, F>(&mut self, name: T, f: F) -> &mut Self
    where
        T: ToString,
        F: FnOnce(&mut SlashGroup),
    {
        let mut group = SlashGroup::new(name);
        f(&mut group);

        match group.validate() {
            Ok(()) => self.groups.push(group),
            Err(err) => self.errors.push(err),
        }

        self
    }

    pub fn validate(&self) -> Result<(), InvalidCommand> {
        if let Some(err) = self.errors.first() {
            return Err(err.clone());
        }

        validate_name(&self.name)?;
        validate_description(&self.name, self.description.as_deref())?;

        let has_subs = !self.sub_commands.is_empty() || !self.groups.is_empty();

        if self.action.is_none() && !has_subs {
            return Err(InvalidCommand::new(&self.name, "No command action given."));
        }

        if self.action.is_some() && has_subs {
            return Err(InvalidCommand::new(
                &self.name,
                "Commands with sub commands may not have an action.",
            ));
        }

        if self.sub_commands.len() + self.groups.len() > MAX_OPTIONS {
            return Err(InvalidCommand::new(
                &self.name,
                "Commands may not have more than 25 sub commands and groups.",
            ));
        }

        let signature = A::signature();

        if has_subs && !signature.is_empty() {
            return Err(InvalidCommand::new(
                &self.name,
                "Commands with sub commands may not take arguments.",
            ));
        }

        if signature.len() > MAX_OPTIONS {
            return Err(InvalidCommand::new(
                &self.name,
                "Slash commands may not have more than 25 arguments.",
            ));
        }

        let mut optional_seen = false;
        for argument in &signature {
            if argument.is_list() {
                return Err(InvalidCommand::new(
                    &self.name,
                    format!(
                        "List argument `{}` is not supported by slash commands.",
                        argument.name
                    ),
                ));
            }

            if !is_valid_name(&argument.name) {
                return Err(InvalidCommand::new(
                    &self.name,
                    format!("Invalid argument name `{}`.", argument.name),
                ));
            }

            if argument.is_required() {
                if optional_seen {
                    return Err(InvalidCommand::new(
                        &self.name,
                        format!(
                            "Required argument `{}` follows an optional one.",
                            argument.name
                        ),
                    ));
                }
            } else {
                optional_seen = true;
            }
        }

        Ok(())
    }

    /// Validates the command and erases its argument type.
    pub fn load(self) -> Result<LoadedSlashCommand, InvalidCommand> {
        self.validate()?;

        let executor = self.action.map(|action| {
            Executor::from_fn(move |invocation| invoke::<A>(action.clone(), invocation))
        });

        Ok(LoadedSlashCommand {
            description: self.description.unwrap_or_default(),
            name: self.name,
            guild: self.guild,
            show_source: self.show_source,
            arguments: Arc::new(A::signature()),
            checks: self.checks,
            executor,
            sub_commands: self.sub_commands,
            groups: self.groups,
            extension: None,
        })
    }
}

impl<A> Default for SlashCommand<A>
where
    A: Arguments,
{
    fn default() -> Self {
        Self::new()
    }
}

async fn invoke<A>(action: SlashAction<A>, invocation: SlashInvocation) -> Result
where
    A: Arguments,
{
    let SlashInvocation {
        ctx,
        interaction,
        options,
    } = invocation;

    let mut parsed = parse_slash_arguments(&A::signature(), &options, &ctx).await?;
    let args = A::from_parsed(&mut parsed)?;

    action(SlashCommandContext {
        ctx,
        interaction,
        args,
    })
    .await
}

/// A named group of slash sub commands.
#[derive(Clone, Debug)]
pub struct SlashGroup {
    pub name: String,
    pub description: Option<String>,
    pub sub_commands: Vec<LoadedSlashCommand>,
    errors: Vec<InvalidCommand>,
}

impl SlashGroup {
    fn new<T>(name: T) -> Self
    where
        T: ToString,
    {
        Self {
            name: name.to_string(),
            description: None,
            sub_commands: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn description<T>(&mut self, description: T) -> &mut Self
    where
        T: ToString,
    {
        self.description = Some(description.to_string());
        self
    }

    pub fn sub_command<A, F>(&mut self, f: F) -> &mut Self
    where
        A: Arguments,
        F: FnOnce(&mut SlashCommand<A>),
    {
        let mut cmd = SlashCommand::new();
        f(&mut cmd);

        match cmd.load() {
            Ok(cmd) => self.sub_commands.push(cmd),
            Err(err) => self.errors.push(err),
        }

        self
    }

    fn validate(&self) -> Result<(), InvalidCommand> {
        if let Some(err) = self.errors.first() {
            return Err(err.clone());
        }

        validate_name(&self.name)?;
        validate_description(&self.name, self.description.as_deref())?;

        if self.sub_commands.is_empty() {
            return Err(InvalidCommand::new(
                &self.name,
                "Groups need at least one sub command.",
            ));
        }

        if self.sub_commands.iter().any(|cmd| !cmd.is_leaf()) {
            return Err(InvalidCommand::new(
                &self.name,
                "Sub commands of groups may not have sub commands themselves.",
            ));
        }

        Ok(())
    }
}

/// A validated slash command with its argument type erased.
#[derive(Clone)]
pub struct LoadedSlashCommand {
    pub name: String,
    pub description: String,
    pub guild: Option<GuildId>,
    pub show_source: bool,
    pub sub_commands: Vec<LoadedSlashCommand>,
    pub groups: Vec<SlashGroup>,
    pub(crate) arguments: Arc<Vec<Argument>>,
    pub(crate) checks: Vec<Check<InteractionCreateEvent>>,
    pub(crate) executor: Option<Executor<SlashInvocation>>,
    pub(crate) extension: Option<ExtensionId>,
}

impl LoadedSlashCommand {
    pub fn extension(&self) -> Option<ExtensionId> {
        self.extension
    }

    pub(crate) fn set_extension(&mut self, id: Option<ExtensionId>) {
        self.extension = id;
    }

    fn is_leaf(&self) -> bool {
        self.sub_commands.is_empty() && self.groups.is_empty()
    }

    /// Runs the checks of this command in order.
    pub async fn run_checks(&self, event: &InteractionCreateEvent) -> bool {
        run_checks(&self.checks, event).await
    }

    /// Returns the (sub) command at `path` below this command. `path` is
    /// empty for the command itself, `[sub]` for a sub command and
    /// `[group, sub]` for a sub command of a group.
    pub fn resolve(&self, path: &[&str]) -> Option<&LoadedSlashCommand> {
        match path {
            [] => Some(self),
            [sub] => self.sub_commands.iter().find(|cmd| cmd.name == *sub),
            [group, sub] => self
                .groups
                .iter()
                .find(|g| g.name == *group)?
                .sub_commands
                .iter()
                .find(|cmd| cmd.name == *sub),
            _ => None,
        }
    }

    /// Describes this command the way it is registered with Discord.
    pub fn to_application_command(&self) -> ApplicationCommand {
        ApplicationCommand {
            name: self.name.clone(),
            description: self.description.clone(),
            options: self.options(),
        }
    }

    fn options(&self) -> Vec<CommandOption> {
        let arguments = self.arguments.iter().map(CommandOption::from_argument);

        let sub_commands = self.sub_commands.iter().map(|cmd| CommandOption {
            kind: OptionKind::SubCommand,
            name: cmd.name.clone(),
            description: cmd.description.clone(),
            required: false,
            choices: Vec::new(),
            options: cmd.options(),
        });

        let groups = self.groups.iter().map(|group| CommandOption {
            kind: OptionKind::SubCommandGroup,
            name: group.name.clone(),
            description: group.description.clone().unwrap_or_default(),
            required: false,
            choices: Vec::new(),
            options: group
                .sub_commands
                .iter()
                .map(|cmd| CommandOption {
                    kind: OptionKind::SubCommand,
                    name: cmd.name.clone(),
                    description: cmd.description.clone(),
                    required: false,
                    choices: Vec::new(),
                    options: cmd.options(),
                })
                .collect(),
        });

        arguments.chain(sub_commands).chain(groups).collect()
    }
}

impl Debug for LoadedSlashCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedSlashCommand")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("guild", &self.guild)
            .field("show_source", &self.show_source)
            .field("arguments", &self.arguments)
            .field("sub_commands", &self.sub_commands)
            .field("groups", &self.groups)
            .field("extension", &self.extension)
            .finish()
    }
}

/// The payload describing a slash command to Discord.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApplicationCommand {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

impl ApplicationCommand {
    pub fn to_builder(&self) -> CreateApplicationCommand {
        let mut cmd = CreateApplicationCommand::default();
        cmd.name(&self.name).description(&self.description);

        for option in &self.options {
            cmd.create_option(|builder| {
                option.fill_builder(builder);
                builder
            });
        }

        cmd
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommandOption {
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub name: String,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<OptionChoice>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

impl CommandOption {
    fn from_argument(argument: &Argument) -> Self {
        let description = if argument.description.is_empty() {
            argument.name.clone()
        } else {
            argument.description.clone()
        };

        Self {
            kind: argument.option_kind(),
            name: argument.name.clone(),
            description,
            required: matches!(argument.arity(), Arity::Single | Arity::Coalescing),
            choices: argument
                .choices()
                .into_iter()
                .map(|(name, value)| OptionChoice { name, value })
                .collect(),
            options: Vec::new(),
        }
    }

    fn fill_builder(&self, builder: &mut CreateApplicationCommandOption) {
        builder
            .kind(self.kind.into())
            .name(&self.name)
            .description(&self.description)
            .required(self.required);

        for choice in &self.choices {
            builder.add_string_choice(&choice.name, &choice.value);
        }

        for option in &self.options {
            builder.create_sub_option(|sub| {
                option.fill_builder(sub);
                sub
            });
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OptionChoice {
    pub name: String,
    pub value: String,
}

impl Serialize for OptionKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(*self as u8)
    }
}
