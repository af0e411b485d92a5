use super::Converter;
use crate::context::CommandContext;
use crate::error::CommandError;
use crate::slash::interaction::OptionKind;

use extbot::arguments::{InvalidMention, UserMention};
use extbot::model::{User, UserId};

use async_trait::async_trait;

/// What a user argument refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum UserRef {
    Id(UserId),
    Tag(String),
}

impl UserRef {
    /// Classifies `input` as a mention, an ID or a `name#discriminator` tag.
    ///
    /// Returns `Ok(None)` if the input can be none of them and
    /// `Err(InvalidMention)` for malformed mentions.
    pub(crate) fn parse(input: &str) -> Result<Option<Self>, InvalidMention> {
        if input.starts_with("<@") && input.ends_with('>') {
            let mention: UserMention = input.parse()?;
            return Ok(Some(Self::Id(mention.id)));
        }

        if let Ok(id) = input.parse() {
            return Ok(Some(Self::Id(id)));
        }

        if input.contains('#') {
            return Ok(Some(Self::Tag(input.to_owned())));
        }

        Ok(None)
    }
}

/// Searches the supplier's known users for `tag`, ignoring case.
pub(crate) async fn find_by_tag(
    tag: &str,
    ctx: &CommandContext,
) -> Result<Option<User>, CommandError> {
    let tag = tag.to_lowercase();

    let users = ctx.supplier.users().await.map_err(|err| {
        log::warn!("[CONV] Failed to list users: {}", err);
        ctx.error("commands.error.lookupFailed", &[])
    })?;

    Ok(users.into_iter().find(|user| user.tag().to_lowercase() == tag))
}

/// Resolves a mention, an ID or a user tag into a [`User`].
#[derive(Copy, Clone, Debug, Default)]
pub struct UserConverter;

#[async_trait]
impl Converter for UserConverter {
    type Output = User;

    fn signature_type(&self) -> &'static str {
        "converters.user.signatureType"
    }

    fn option_kind(&self) -> OptionKind {
        OptionKind::User
    }

    async fn parse(&self, input: &str, ctx: &CommandContext) -> Result<User, CommandError> {
        let user = match UserRef::parse(input) {
            Ok(Some(UserRef::Id(id))) => ctx.supplier.user(id).await.map_err(|err| {
                log::warn!("[CONV] Failed to fetch user {}: {}", id, err);
                ctx.error("commands.error.lookupFailed", &[])
            })?,
            Ok(Some(UserRef::Tag(tag))) => find_by_tag(&tag, ctx).await?,
            Ok(None) => None,
            Err(_) => return Err(ctx.error("converters.user.error.invalid", &[input])),
        };

        user.ok_or_else(|| ctx.error("converters.user.error.missing", &[input]))
    }
}
