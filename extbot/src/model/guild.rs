use serde::{Deserialize, Serialize};

use super::id::{GuildId, RoleId};
use super::user::User;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    pub id: GuildId,
    pub name: String,
}

impl From<serenity::model::guild::Guild> for Guild {
    fn from(src: serenity::model::guild::Guild) -> Self {
        Self {
            id: src.id.into(),
            name: src.name,
        }
    }
}

impl From<serenity::model::guild::PartialGuild> for Guild {
    fn from(src: serenity::model::guild::PartialGuild) -> Self {
        Self {
            id: src.id.into(),
            name: src.name,
        }
    }
}

/// A [`User`] that is part of a guild.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub guild_id: GuildId,
    pub user: User,
    pub nick: Option<String>,
    pub roles: Vec<RoleId>,
}

impl Member {
    /// Returns the nickname of the member, falling back to the username.
    pub fn display_name(&self) -> &str {
        self.nick.as_deref().unwrap_or(&self.user.name)
    }

    pub fn has_role(&self, role_id: RoleId) -> bool {
        self.roles.contains(&role_id)
    }
}

impl From<serenity::model::guild::Member> for Member {
    fn from(src: serenity::model::guild::Member) -> Self {
        Self {
            guild_id: src.guild_id.into(),
            user: src.user.into(),
            nick: src.nick,
            roles: src.roles.into_iter().map(RoleId::from).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub guild_id: GuildId,
    pub name: String,
}

impl Role {
    pub fn mention(&self) -> String {
        format!("<@&{}>", self.id)
    }
}

impl From<serenity::model::guild::Role> for Role {
    fn from(src: serenity::model::guild::Role) -> Self {
        Self {
            id: src.id.into(),
            guild_id: src.guild_id.into(),
            name: src.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Member;
    use crate::model::id::{GuildId, RoleId, UserId};
    use crate::model::user::User;

    #[test]
    fn test_member_display_name() {
        let mut member = Member {
            guild_id: GuildId(1),
            user: User {
                id: UserId(2),
                bot: false,
                discriminator: 1,
                name: String::from("robbie"),
            },
            nick: None,
            roles: vec![RoleId(3)],
        };

        assert_eq!(member.display_name(), "robbie");
        assert!(member.has_role(RoleId(3)));
        assert!(!member.has_role(RoleId(4)));

        member.nick = Some(String::from("rob"));
        assert_eq!(member.display_name(), "rob");
    }
}
