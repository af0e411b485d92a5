//! # Utility plugin
//! Small informational commands and a greeting for new members.
use extbot::builder::{Color, CreateEmbed, CreateMessage};
use extbot::event::GuildMemberAdditionData;
use extbot::model::{Member, User};
use extbot_core::argument::{Argument, Arguments, ParsedArguments};
use extbot_core::converters::{MemberConverter, UserConverter};
use extbot_core::error::{CommandError, Result};
use extbot_core::extension::{EventContext, Extension, ExtensionBuilder};
use extbot_core::{MessageCommandContext, SlashCommandContext};

use async_trait::async_trait;

const EMBED_COLOR: Color = Color::BLURPLE;

pub struct Utility;

#[async_trait]
impl Extension for Utility {
    fn name(&self) -> &str {
        "utility"
    }

    async fn setup(&self, builder: &mut ExtensionBuilder) -> Result {
        builder
            .message_command::<(), _>(|cmd| {
                cmd.name("ping")
                    .description("Checks whether the bot is responding.")
                    .action(|ctx| async move { ctx.respond("Pong!").await });
            })?
            .message_command::<WhoisArgs, _>(|cmd| {
                cmd.name("whois")
                    .alias("userinfo")
                    .description("Shows information about a member.")
                    .guild_only(true)
                    .action(whois);
            })?
            .slash_command::<SlashWhoisArgs, _>(|cmd| {
                cmd.name("whois")
                    .description("Shows information about a user.")
                    .action(slash_whois);
            })?
            .event(greet);

        Ok(())
    }
}

pub struct WhoisArgs {
    member: Member,
}

impl Arguments for WhoisArgs {
    fn signature() -> Vec<Argument> {
        vec![Argument::single(
            "member",
            "The member to show",
            MemberConverter::new(),
        )]
    }

    fn from_parsed(args: &mut ParsedArguments) -> Result<Self, CommandError> {
        Ok(Self {
            member: args.take("member")?,
        })
    }
}

pub struct SlashWhoisArgs {
    user: User,
}

impl Arguments for SlashWhoisArgs {
    fn signature() -> Vec<Argument> {
        vec![Argument::single("user", "The user to show", UserConverter)]
    }

    fn from_parsed(args: &mut ParsedArguments) -> Result<Self, CommandError> {
        Ok(Self {
            user: args.take("user")?,
        })
    }
}

fn user_embed(user: &User, member: Option<&Member>) -> CreateEmbed {
    CreateEmbed::new(|e| {
        e.title(user.tag())
            .color(EMBED_COLOR)
            .field("ID", user.id.to_string(), true)
            .field("Bot", if user.bot { "Yes" } else { "No" }, true);

        if let Some(member) = member {
            e.field("Display name", member.display_name(), true)
                .field("Roles", member.roles.len().to_string(), true);
        }
    })
}

async fn whois(ctx: MessageCommandContext<WhoisArgs>) -> Result {
    let member = &ctx.args.member;
    ctx.respond(user_embed(&member.user, Some(member))).await
}

async fn slash_whois(ctx: SlashCommandContext<SlashWhoisArgs>) -> Result {
    let member = match ctx.guild_id {
        Some(guild_id) => ctx.supplier.member(guild_id, ctx.args.user.id).await?,
        None => None,
    };

    ctx.respond(user_embed(&ctx.args.user, member.as_ref())).await
}

fn greeting(member: &Member, guild_name: &str) -> String {
    format!("Welcome to {}, {}!", guild_name, member.display_name())
}

/// Greets new members with a direct message.
async fn greet(ctx: EventContext<GuildMemberAdditionData>) -> Result {
    let GuildMemberAdditionData { guild_id, member } = ctx.event;

    if member.user.bot {
        return Ok(());
    }

    let guild_name = match ctx.supplier.guild(guild_id).await? {
        Some(guild) => guild.name,
        None => guild_id.to_string(),
    };

    let message = CreateMessage::from(greeting(&member, &guild_name));

    let channel = serenity::model::id::UserId::from(member.user.id)
        .create_dm_channel(&*ctx.http)
        .await?;

    channel
        .id
        .send_message(&*ctx.http, |m| {
            message.fill_builder(m);
            m
        })
        .await?;

    log::debug!("[UTILITY] Greeted {} in guild {}", member.user.id, guild_id);
    Ok(())
}
