//! The bundled `help` command.
use crate::argument::{Argument, Arguments, ParsedArguments};
use crate::builders::HelpExtensionBuilder;
use crate::command::{LoadedCommand, MessageCommandRegistry};
use crate::context::{CommandContext, MessageCommandContext};
use crate::converters::StringConverter;
use crate::error::{CommandError, Result};
use crate::extension::{Extension, ExtensionBuilder};

use extbot::builder::{Color, CreateEmbed, CreateMessage};

use async_trait::async_trait;

/// Discord's limit for embed descriptions, in characters.
const MAX_DESCRIPTION_LENGTH: usize = 4096;

pub struct HelpArgs {
    pub path: Vec<String>,
}

impl Arguments for HelpArgs {
    fn signature() -> Vec<Argument> {
        vec![Argument::list(
            "command",
            "The command to show help for",
            StringConverter::new(),
            false,
        )]
    }

    fn from_parsed(args: &mut ParsedArguments) -> Result<Self, CommandError> {
        Ok(Self {
            path: args.take("command")?,
        })
    }
}

pub struct HelpExtension {
    registry: MessageCommandRegistry,
    settings: HelpExtensionBuilder,
}

impl HelpExtension {
    pub fn new(registry: MessageCommandRegistry, settings: HelpExtensionBuilder) -> Self {
        Self { registry, settings }
    }
}

#[async_trait]
impl Extension for HelpExtension {
    fn name(&self) -> &str {
        "help"
    }

    async fn setup(&self, builder: &mut ExtensionBuilder) -> Result {
        let registry = self.registry.clone();
        let settings = self.settings.clone();

        builder.message_command::<HelpArgs, _>(|cmd| {
            cmd.name("help")
                .alias("h")
                .description("Shows the available commands or the details of one command.");

            for check in &settings.checks {
                cmd.check(check.clone());
            }

            cmd.action(move |ctx| {
                let registry = registry.clone();
                let settings = settings.clone();

                async move { help(ctx, registry, settings).await }
            });
        })?;

        Ok(())
    }
}

async fn help(
    ctx: MessageCommandContext<HelpArgs>,
    registry: MessageCommandRegistry,
    settings: HelpExtensionBuilder,
) -> Result {
    let embeds = if ctx.args.path.is_empty() {
        command_list(&ctx, &ctx.prefix, &registry.list(), settings.colour)
    } else {
        let path = ctx.args.path.join(" ");

        match registry
            .get(&path)
            .filter(|cmd| cmd.enabled && !cmd.hidden)
        {
            Some(cmd) => vec![command_help(&ctx, &ctx.prefix, &path, &cmd, settings.colour)],
            None => {
                return Err(ctx
                    .error("extensions.help.error.missingCommand", &[&path])
                    .into())
            }
        }
    };

    for embed in embeds {
        let mut message = CreateMessage::from(embed);
        message.mention_reply(settings.ping_in_reply);

        ctx.respond(message).await?;
    }

    Ok(())
}

fn visible(commands: &[LoadedCommand]) -> impl Iterator<Item = &LoadedCommand> {
    commands.iter().filter(|cmd| cmd.enabled && !cmd.hidden)
}

fn summary(prefix: &str, path: &str, cmd: &LoadedCommand) -> String {
    let usage = format!("{}{} {}", prefix, path, cmd.signature);

    if cmd.description.is_empty() {
        format!("`{}`", usage.trim_end())
    } else {
        format!("`{}` - {}", usage.trim_end(), cmd.description)
    }
}

/// Groups `lines` into pages whose joined length fits into an embed
/// description. Lines too long for a page of their own are truncated.
fn paginate(lines: Vec<String>) -> Vec<String> {
    let mut pages = Vec::new();
    let mut page = String::new();

    for mut line in lines {
        if line.chars().count() > MAX_DESCRIPTION_LENGTH {
            line = line.chars().take(MAX_DESCRIPTION_LENGTH).collect();
        }

        let len = page.chars().count();

        if len > 0 && len + 1 + line.chars().count() > MAX_DESCRIPTION_LENGTH {
            pages.push(std::mem::take(&mut page));
        }

        if !page.is_empty() {
            page.push('\n');
        }
        page.push_str(&line);
    }

    if !page.is_empty() {
        pages.push(page);
    }

    pages
}

/// Lists all visible commands, split over as many embeds as needed.
pub(crate) fn command_list(
    ctx: &CommandContext,
    prefix: &str,
    commands: &[LoadedCommand],
    colour: Color,
) -> Vec<CreateEmbed> {
    let lines: Vec<_> = visible(commands)
        .map(|cmd| summary(prefix, &cmd.name, cmd))
        .collect();

    let title = ctx.translate("extensions.help.commandList.title", &[]);
    let footer = ctx.translate("extensions.help.commandList.footer", &[prefix]);

    let pages = paginate(lines);
    if pages.is_empty() {
        return vec![CreateEmbed::new(|e| {
            e.title(&title)
                .color(colour)
                .footer(&footer)
                .description(ctx.translate("extensions.help.commandList.empty", &[]));
        })];
    }

    let count = pages.len();
    pages
        .into_iter()
        .enumerate()
        .map(|(index, page)| {
            CreateEmbed::new(|e| {
                if count == 1 {
                    e.title(&title);
                } else {
                    e.title(format!("{} ({}/{})", title, index + 1, count));
                }

                e.color(colour).footer(&footer).description(page);
            })
        })
        .collect()
}

/// Describes the command `cmd` found at `path`.
pub(crate) fn command_help(
    ctx: &CommandContext,
    prefix: &str,
    path: &str,
    cmd: &LoadedCommand,
    colour: Color,
) -> CreateEmbed {
    let mut sub_commands: Vec<_> = cmd.sub_commands.iter().cloned().collect();
    sub_commands.sort_by(|a, b| a.name.cmp(&b.name));

    let sub_commands: Vec<_> = visible(&sub_commands)
        .map(|sub| summary(prefix, &format!("{} {}", path, sub.name), sub))
        .collect();

    CreateEmbed::new(|e| {
        e.title(format!("{}{}", prefix, path)).color(colour);

        if !cmd.description.is_empty() {
            e.description(&cmd.description);
        }

        if cmd.is_executable() {
            let usage = format!("{}{} {}", prefix, path, cmd.signature);
            e.field(
                ctx.translate("extensions.help.field.usage", &[]),
                format!("`{}`", usage.trim_end()),
                false,
            );
        }

        if !cmd.aliases.is_empty() {
            e.field(
                ctx.translate("extensions.help.field.aliases", &[]),
                cmd.aliases.join(", "),
                false,
            );
        }

        if !sub_commands.is_empty() {
            e.field(
                ctx.translate("extensions.help.field.subCommands", &[]),
                sub_commands.join("\n"),
                false,
            );
        }
    })
}
