use super::user::{find_by_tag, UserRef};
use super::Converter;
use crate::context::CommandContext;
use crate::error::CommandError;
use crate::slash::interaction::OptionKind;

use extbot::model::{GuildId, Member};

use async_trait::async_trait;

/// Resolves a mention, an ID or a user tag into a [`Member`].
///
/// Members are looked up in the required guild if one is set and in the
/// guild the command was invoked in otherwise. Without a guild no member
/// can be found.
#[derive(Copy, Clone, Debug, Default)]
pub struct MemberConverter {
    required_guild: Option<GuildId>,
}

impl MemberConverter {
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
impl Converter for MemberConverter {
    type Output = Member;

    fn signature_type(&self) -> &'static str {
        "converters.member.signatureType"
    }

    fn option_kind(&self) -> OptionKind {
        OptionKind::User
    }

    async fn parse(&self, input: &str, ctx: &CommandContext) -> Result<Member, CommandError> {
        let missing = || ctx.error("converters.member.error.missing", &[input]);

        let user_id = match UserRef::parse(input) {
            Ok(Some(UserRef::Id(id))) => id,
            Ok(Some(UserRef::Tag(tag))) => match find_by_tag(&tag, ctx).await? {
                Some(user) => user.id,
                None => return Err(missing()),
            },
            Ok(None) => return Err(missing()),
            Err(_) => return Err(ctx.error("converters.member.error.invalid", &[input])),
        };

        let guild_id = match self.required_guild.or(ctx.guild_id) {
            Some(guild_id) => guild_id,
            None => return Err(missing()),
        };

        let member = ctx
            .supplier
            .member(guild_id, user_id)
            .await
            .map_err(|err| {
                log::warn!("[CONV] Failed to fetch member {}: {}", user_id, err);
                ctx.error("commands.error.lookupFailed", &[])
            })?;

        member.ok_or_else(missing)
    }
}

#[cfg(test)]
mod tests {
    use super::MemberConverter;
    use crate::context::tests::context;
    use crate::converters::Converter;
    use crate::supplier::MemorySupplier;

    use extbot::model::{GuildId, Member, User, UserId};

    fn supplier() -> MemorySupplier {
        let supplier = MemorySupplier::new();
        supplier.insert_member(Member {
            guild_id: GuildId(1),
            user: User {
                id: UserId(42),
                bot: false,
                discriminator: 7,
                name: String::from("Bob"),
            },
            nick: Some(String::from("Bobby")),
            roles: Vec::new(),
        });
        supplier
    }

    #[tokio::test]
    async fn test_member_converter_context_guild() {
        let (ctx, _) = context(supplier(), Some(GuildId(1)));

        for input in ["<@42>", "<@!42>", "42", "bob#0007"] {
            let member = MemberConverter::new().parse(input, &ctx).await.unwrap();
            assert_eq!(member.display_name(), "Bobby");
        }

        assert_eq!(
            MemberConverter::new().parse("<@!x>", &ctx).await.unwrap_err().0,
            "Value `<@!x>` is not a valid member ID."
        );
        assert_eq!(
            MemberConverter::new().parse("43", &ctx).await.unwrap_err().0,
            "Unable to find member: 43"
        );
    }

    #[tokio::test]
    async fn test_member_converter_required_guild() {
        let (ctx, _) = context(supplier(), Some(GuildId(2)));

        assert!(MemberConverter::new().parse("42", &ctx).await.is_err());
        assert!(MemberConverter::new()
            .required_guild(GuildId(1))
            .parse("42", &ctx)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_member_converter_no_guild() {
        let (ctx, _) = context(supplier(), None);

        assert_eq!(
            MemberConverter::new().parse("42", &ctx).await.unwrap_err().0,
            "Unable to find member: 42"
        );
    }
}
