use super::Converter;
use crate::context::CommandContext;
use crate::error::{CommandError, Error};

use extbot::model::{Guild, GuildId};

use async_trait::async_trait;

/// Resolves a guild ID or a guild name (ignoring case) among the guilds the
/// bot is part of.
#[derive(Copy, Clone, Debug, Default)]
pub struct GuildConverter;

#[async_trait]
impl Converter for GuildConverter {
    type Output = Guild;

    fn signature_type(&self) -> &'static str {
        "converters.guild.signatureType"
    }

    async fn parse(&self, input: &str, ctx: &CommandContext) -> Result<Guild, CommandError> {
        let lookup_failed = |err: Error| {
            log::warn!("[CONV] Failed to fetch guilds: {}", err);
            ctx.error("commands.error.lookupFailed", &[])
        };

        let guild = match input.parse::<GuildId>() {
            Ok(id) => ctx.supplier.guild(id).await.map_err(lookup_failed)?,
            Err(_) => {
                let name = input.to_lowercase();

                ctx.supplier
                    .guilds()
                    .await
                    .map_err(lookup_failed)?
                    .into_iter()
                    .find(|guild| guild.name.to_lowercase() == name)
            }
        };

        guild.ok_or_else(|| ctx.error("converters.guild.error.missing", &[input]))
    }
}

#[cfg(test)]
mod tests {
    use super::GuildConverter;
    use crate::context::tests::context;
    use crate::converters::Converter;
    use crate::supplier::MemorySupplier;

    use extbot::model::{Guild, GuildId};

    #[tokio::test]
    async fn test_guild_converter() {
        let supplier = MemorySupplier::new();
        supplier.insert_guild(Guild {
            id: GuildId(1),
            name: String::from("Rust Lounge"),
        });

        let (ctx, _) = context(supplier, None);

        assert_eq!(GuildConverter.parse("1", &ctx).await.unwrap().id, GuildId(1));
        assert_eq!(
            GuildConverter.parse("rust lounge", &ctx).await.unwrap().id,
            GuildId(1)
        );
        assert_eq!(
            GuildConverter.parse("2", &ctx).await.unwrap_err().0,
            "Unable to find server: 2"
        );
    }
}
