use super::Converter;
use crate::context::CommandContext;
use crate::error::{CommandError, Error};
use crate::slash::interaction::OptionKind;

use extbot::arguments::RoleMention;
use extbot::model::{GuildId, Role, RoleId};

use async_trait::async_trait;

/// Resolves a role mention, a role ID or a role name (ignoring case).
#[derive(Copy, Clone, Debug, Default)]
pub struct RoleConverter {
    required_guild: Option<GuildId>,
}

impl RoleConverter {
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
impl Converter for RoleConverter {
    type Output = Role;

    fn signature_type(&self) -> &'static str {
        "converters.role.signatureType"
    }

    fn option_kind(&self) -> OptionKind {
        OptionKind::Role
    }

    async fn parse(&self, input: &str, ctx: &CommandContext) -> Result<Role, CommandError> {
        let missing = || ctx.error("converters.role.error.missing", &[input]);
        let lookup_failed = |err: Error| {
            log::warn!("[CONV] Failed to fetch roles: {}", err);
            ctx.error("commands.error.lookupFailed", &[])
        };

        let role_id: Option<RoleId> = if input.starts_with("<@&") && input.ends_with('>') {
            match input.parse::<RoleMention>() {
                Ok(mention) => Some(mention.id),
                Err(_) => return Err(ctx.error("converters.role.error.invalid", &[input])),
            }
        } else {
            input.parse().ok()
        };

        let guild_id = self.required_guild.or(ctx.guild_id).ok_or_else(missing)?;

        let role = match role_id {
            Some(role_id) => ctx
                .supplier
                .role(guild_id, role_id)
                .await
                .map_err(lookup_failed)?,
            None => {
                let name = input.to_lowercase();

                ctx.supplier
                    .roles(guild_id)
                    .await
                    .map_err(lookup_failed)?
                    .into_iter()
                    .find(|role| role.name.to_lowercase() == name)
            }
        };

        role.ok_or_else(missing)
    }
}
