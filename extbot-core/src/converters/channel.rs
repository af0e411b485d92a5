use super::Converter;
use crate::context::CommandContext;
use crate::error::CommandError;
use crate::slash::interaction::OptionKind;

use extbot::arguments::ChannelMention;
use extbot::model::{Channel, ChannelId, GuildId};

use async_trait::async_trait;

/// Resolves a channel mention or a channel ID.
///
/// With a required guild, channels of other guilds are not found.
#[derive(Copy, Clone, Debug, Default)]
pub struct ChannelConverter {
    required_guild: Option<GuildId>,
}

impl ChannelConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required_guild<T>(mut self, guild_id: T) -> Self
    where
        T: Into<GuildId>,
    {
        self.required_guild = Some(guild_id.into());
        self
    }
}

#[async_trait]
impl Converter for ChannelConverter {
    type Output = Channel;

    fn signature_type(&self) -> &'static str {
        "converters.channel.signatureType"
    }

    fn option_kind(&self) -> OptionKind {
        OptionKind::Channel
    }

    async fn parse(&self, input: &str, ctx: &CommandContext) -> Result<Channel, CommandError> {
        let channel_id: ChannelId = if input.starts_with("<#") && input.ends_with('>') {
            match input.parse::<ChannelMention>() {
                Ok(mention) => mention.id,
                Err(_) => return Err(ctx.error("converters.channel.error.invalid", &[input])),
            }
        } else {
            match input.parse() {
                Ok(id) => id,
                Err(_) => return Err(ctx.error("converters.channel.error.missing", &[input])),
            }
        };

        let channel = ctx.supplier.channel(channel_id).await.map_err(|err| {
            log::warn!("[CONV] Failed to fetch channel {}: {}", channel_id, err);
            ctx.error("commands.error.lookupFailed", &[])
        })?;

        channel
            .filter(|channel| match self.required_guild {
                Some(guild_id) => channel.guild_id == Some(guild_id),
                None => true,
            })
            .ok_or_else(|| ctx.error("converters.channel.error.missing", &[input]))
    }
}

#[cfg(test)]
mod tests {
    use super::ChannelConverter;
    use crate::context::tests::context;
    use crate::converters::Converter;
    use crate::supplier::MemorySupplier;

    use extbot::model::{Channel, ChannelId, ChannelKind, GuildId};

    fn supplier() -> MemorySupplier {
        let supplier = MemorySupplier::new();
        supplier.insert_channel(Channel {
            id: ChannelId(7),
            guild_id: Some(GuildId(1)),
            name: String::from("general"),
            kind: ChannelKind::Text,
        });
        supplier
    }

    #[tokio::test]
    async fn test_channel_converter() {
        let (ctx, _) = context(supplier(), None);

        for input in ["<#7>", "7"] {
            let channel = ChannelConverter::new().parse(input, &ctx).await.unwrap();
            assert_eq!(channel.name, "general");
        }

        assert!(ChannelConverter::new().parse("<#x>", &ctx).await.is_err());
        assert!(ChannelConverter::new().parse("general", &ctx).await.is_err());
        assert!(ChannelConverter::new().parse("8", &ctx).await.is_err());
        assert_eq!(
            ChannelConverter::new().parse("<#x>", &ctx).await.unwrap_err().0,
            "Value `<#x>` is not a valid channel ID."
        );
        assert_eq!(
            ChannelConverter::new().parse("<#7", &ctx).await.unwrap_err().0,
            "Unable to find channel: <#7"
        );

        assert!(ChannelConverter::new()
            .required_guild(GuildId(2))
            .parse("7", &ctx)
            .await
            .is_err());
    }
}
