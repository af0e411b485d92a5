use crate::check::{run_checks, MessageCreateEvent};
use crate::command::MessageInvocation;
use crate::context::CommandContext;
use crate::error::{Error, Result};
use crate::help;
use crate::responder::Responder;
use crate::state::State;
use crate::supplier::EntitySupplier;

use extbot::arguments::{parse_args, CommandArguments};
use extbot::builder::Color;
use extbot::model::{Message, UserId};

use std::sync::Arc;

/// Strips a mention of `bot_id` followed by whitespace from `content`.
fn strip_mention(content: &str, bot_id: UserId) -> Option<(String, &str)> {
    [format!("<@{}>", bot_id), format!("<@!{}>", bot_id)]
        .into_iter()
        .find_map(|mention| {
            let rest = content.strip_prefix(mention.as_str())?;

            if rest.starts_with(char::is_whitespace) {
                Some((mention, rest.trim_start()))
            } else {
                None
            }
        })
}

/// Runs the message command `message` invokes, if any.
pub async fn handle_message(
    state: &State,
    message: Message,
    supplier: Arc<dyn EntitySupplier>,
    responder: Arc<dyn Responder>,
) -> Result {
    let settings = &state.message_settings;

    // Always ignore messages from bots.
    if !settings.enabled || message.author.bot {
        return Ok(());
    }

    let event = MessageCreateEvent {
        message: message.clone(),
        supplier: supplier.clone(),
    };

    if !run_checks(&settings.checks, &event).await {
        return Ok(());
    }

    let prefix = settings.resolve_prefix(&message).await;

    let (prefix, content) = match message.content.strip_prefix(prefix.as_str()) {
        Some(content) => (prefix, content),
        None => match state.bot_id().filter(|_| settings.invoke_on_mention) {
            Some(bot_id) => match strip_mention(&message.content, bot_id) {
                Some((mention, content)) => (format!("{} ", mention), content),
                None => return Ok(()),
            },
            None => return Ok(()),
        },
    };

    let mut args = CommandArguments::from(parse_args(content));

    let command = match state.message_commands().find(&mut args) {
        Some(cmd) if cmd.enabled => cmd,
        _ => return Ok(()),
    };

    let invoked = args.consumed().join(" ");

    let mut ctx = CommandContext::new(
        supplier,
        state.translations(),
        responder,
        message.channel_id,
        message.author.clone(),
    );
    ctx.guild_id = message.guild_id;
    ctx.locale = state
        .resolve_locale(message.guild_id, message.channel_id, message.author.id, None)
        .await;

    // Returns if the command is guild-only and the message was not sent from within a guild.
    if command.guild_only && message.guild_id.is_none() {
        return ctx
            .respond(ctx.translate("commands.error.guildOnly", &[]))
            .await;
    }

    if !run_checks(&command.checks, &event).await {
        log::debug!(
            "[CORE] Checks of command {} failed for user {}",
            command.name,
            message.author.id
        );
        return Ok(());
    }

    // Commands without an action only group their sub commands.
    let executor = match &command.executor {
        Some(executor) => executor.clone(),
        None => {
            let embed = help::command_help(&ctx, &prefix, &invoked, &command, Color::BLURPLE);
            return ctx.respond(embed).await;
        }
    };

    let invocation = MessageInvocation {
        ctx: ctx.clone(),
        message,
        args,
        prefix,
        invoked,
    };

    match executor.call(invocation).await {
        Ok(()) => Ok(()),
        Err(Error::Command(err)) => ctx.respond(err.0).await,
        Err(err) => {
            log::error!("[CORE] Command {} failed: {}", command.name, err);
            ctx.respond(ctx.translate("commands.error.internal", &[]))
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{handle_message, strip_mention};
    use crate::argument::{Argument, Arguments, ParsedArguments};
    use crate::builders::MessageCommandsBuilder;
    use crate::check::predicate;
    use crate::command::MessageCommand;
    use crate::converters::StringConverter;
    use crate::error::{CommandError, Error};
    use crate::responder::RecordingResponder;
    use crate::state::State;
    use crate::supplier::MemorySupplier;

    use extbot::model::{ChannelId, GuildId, Message, MessageId, User, UserId};

    use std::sync::Arc;

    struct EchoArgs {
        text: String,
    }

    impl Arguments for EchoArgs {
        fn signature() -> Vec<Argument> {
            vec![Argument::coalescing("text", "Text to echo", StringConverter::new())]
        }

        fn from_parsed(args: &mut ParsedArguments) -> Result<Self, CommandError> {
            Ok(Self {
                text: args.take("text")?,
            })
        }
    }

    fn build_state(settings: MessageCommandsBuilder) -> State {
        let state = State::new(
            settings,
            Default::default(),
            Default::default(),
            Default::default(),
        );

        let mut echo = MessageCommand::<EchoArgs>::new();
        echo.name("echo")
            .action(|ctx| async move { ctx.respond(ctx.args.text.clone()).await });
        state.message_commands().add(echo.load().unwrap(), None).unwrap();

        let mut guild = MessageCommand::<()>::new();
        guild
            .name("guild")
            .guild_only(true)
            .action(|ctx| async move { ctx.respond("in guild").await });
        state.message_commands().add(guild.load().unwrap(), None).unwrap();

        let mut fail = MessageCommand::<()>::new();
        fail.name("fail").action(|_| async { Err(Error::Command(CommandError::new("Nope"))) });
        state.message_commands().add(fail.load().unwrap(), None).unwrap();

        let mut crash = MessageCommand::<()>::new();
        crash
            .name("crash")
            .action(|_| async { Err(Error::other("database gone")) });
        state.message_commands().add(crash.load().unwrap(), None).unwrap();

        let mut secret = MessageCommand::<()>::new();
        secret
            .name("secret")
            .check(predicate(|event: &crate::check::MessageCreateEvent| {
                event.message.author.id == UserId(99)
            }))
            .action(|ctx| async move { ctx.respond("secret").await });
        state.message_commands().add(secret.load().unwrap(), None).unwrap();

        let mut group = MessageCommand::<()>::new();
        group
            .name("group")
            .sub_command::<(), _>(|sub| {
                sub.name("member").description("A member").action(|_| async { Ok(()) });
            });
        state.message_commands().add(group.load().unwrap(), None).unwrap();

        state
    }

    fn message(content: &str, bot: bool, guild_id: Option<GuildId>) -> Message {
        Message {
            id: MessageId(1),
            channel_id: ChannelId(2),
            guild_id,
            author: User {
                id: UserId(3),
                bot,
                discriminator: 1,
                name: String::from("alice"),
            },
            content: content.to_owned(),
        }
    }

    async fn run(state: &State, content: &str, bot: bool, guild_id: Option<GuildId>) -> Vec<String> {
        let responder = Arc::new(RecordingResponder::new());

        handle_message(
            state,
            message(content, bot, guild_id),
            Arc::new(MemorySupplier::new()),
            responder.clone(),
        )
        .await
        .unwrap();

        responder.contents()
    }

    #[test]
    fn test_strip_mention() {
        assert_eq!(
            strip_mention("<@5> echo", UserId(5)),
            Some((String::from("<@5>"), "echo"))
        );
        assert_eq!(
            strip_mention("<@!5>   echo", UserId(5)),
            Some((String::from("<@!5>"), "echo"))
        );
        assert_eq!(strip_mention("<@5>echo", UserId(5)), None);
        assert_eq!(strip_mention("<@6> echo", UserId(5)), None);
    }

    #[tokio::test]
    async fn test_handle_message() {
        let state = build_state(MessageCommandsBuilder::default());

        assert_eq!(run(&state, "!echo hi", false, None).await, ["hi"]);
        assert_eq!(run(&state, "!ECHO hi", false, None).await, ["hi"]);
        assert!(run(&state, "!echo hi", true, None).await.is_empty());
        assert!(run(&state, "echo hi", false, None).await.is_empty());
        assert!(run(&state, "!unknown", false, None).await.is_empty());

        assert_eq!(
            run(&state, "!guild", false, None).await,
            ["This command can only be used in guilds."]
        );
        assert_eq!(run(&state, "!guild", false, Some(GuildId(1))).await, ["in guild"]);

        assert_eq!(run(&state, "!fail", false, None).await, ["Nope"]);
        assert_eq!(
            run(&state, "!crash", false, None).await,
            ["An error occurred while running this command."]
        );

        assert!(run(&state, "!secret", false, None).await.is_empty());
        assert_eq!(
            run(&state, "!echo two words", false, None).await,
            ["two words"]
        );
    }

    #[tokio::test]
    async fn test_unexpected_argument() {
        let state = build_state(MessageCommandsBuilder::default());

        let contents = run(&state, "!guild extra", false, Some(GuildId(1))).await;
        assert_eq!(
            contents,
            ["Unexpected argument: `extra`\n**Usage:** `!guild`"]
        );
    }

    #[tokio::test]
    async fn test_prefix_and_mention() {
        let mut settings = MessageCommandsBuilder::default();
        settings.default_prefix("?");
        let state = build_state(settings);

        assert!(run(&state, "<@7> echo hi", false, None).await.is_empty());
        state.set_bot_id(UserId(7));
        assert_eq!(run(&state, "<@7> echo hi", false, None).await, ["hi"]);
        assert_eq!(run(&state, "?echo hi", false, None).await, ["hi"]);
        assert!(run(&state, "!echo hi", false, None).await.is_empty());

        let mut settings = MessageCommandsBuilder::default();
        settings.invoke_on_mention(false);
        let state = build_state(settings);
        state.set_bot_id(UserId(7));
        assert!(run(&state, "<@7> echo hi", false, None).await.is_empty());
    }

    #[tokio::test]
    async fn test_disabled() {
        let mut settings = MessageCommandsBuilder::default();
        settings.enabled(false);
        let state = build_state(settings);

        assert!(run(&state, "!echo hi", false, None).await.is_empty());
    }

    #[tokio::test]
    async fn test_group_without_action() {
        let state = build_state(MessageCommandsBuilder::default());

        let responder = Arc::new(RecordingResponder::new());
        handle_message(
            &state,
            message("!group", false, None),
            Arc::new(MemorySupplier::new()),
            responder.clone(),
        )
        .await
        .unwrap();

        let messages = responder.messages();
        let embed = messages[0].get_embed().unwrap();
        assert_eq!(embed.get_title(), Some("!group"));
        assert_eq!(embed.get_fields()[0].1, "`!group member` - A member");
    }
}
