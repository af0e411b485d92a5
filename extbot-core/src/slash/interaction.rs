use extbot::model::{ChannelId, GuildId, Member, RoleId, User, UserId};

use serde_json::Value;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption,
};

/// The type of a slash command option.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OptionKind {
    SubCommand = 1,
    SubCommandGroup = 2,
    String = 3,
    Integer = 4,
    Boolean = 5,
    User = 6,
    Channel = 7,
    Role = 8,
    Mentionable = 9,
    Number = 10,
}

impl OptionKind {
    pub fn is_sub_command(&self) -> bool {
        matches!(self, Self::SubCommand | Self::SubCommandGroup)
    }
}

impl From<OptionKind> for CommandOptionType {
    fn from(kind: OptionKind) -> Self {
        match kind {
            OptionKind::SubCommand => Self::SubCommand,
            OptionKind::SubCommandGroup => Self::SubCommandGroup,
            OptionKind::String => Self::String,
            OptionKind::Integer => Self::Integer,
            OptionKind::Boolean => Self::Boolean,
            OptionKind::User => Self::User,
            OptionKind::Channel => Self::Channel,
            OptionKind::Role => Self::Role,
            OptionKind::Mentionable => Self::Mentionable,
            OptionKind::Number => Self::Number,
        }
    }
}

impl From<CommandOptionType> for OptionKind {
    fn from(kind: CommandOptionType) -> Self {
        match kind {
            CommandOptionType::SubCommand => Self::SubCommand,
            CommandOptionType::SubCommandGroup => Self::SubCommandGroup,
            CommandOptionType::Integer => Self::Integer,
            CommandOptionType::Boolean => Self::Boolean,
            CommandOptionType::User => Self::User,
            CommandOptionType::Channel => Self::Channel,
            CommandOptionType::Role => Self::Role,
            CommandOptionType::Mentionable => Self::Mentionable,
            CommandOptionType::Number => Self::Number,
            _ => Self::String,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    User(UserId),
    Channel(ChannelId),
    Role(RoleId),
    Mentionable(u64),
}

impl OptionValue {
    /// Decodes a raw option value of the given kind.
    pub fn from_json(kind: OptionKind, value: &Value) -> Option<Self> {
        let id = || value.as_str().and_then(|s| s.parse::<u64>().ok());

        match kind {
            OptionKind::String => value.as_str().map(|s| Self::String(s.to_owned())),
            OptionKind::Integer => value.as_i64().map(Self::Integer),
            OptionKind::Number => value.as_f64().map(Self::Number),
            OptionKind::Boolean => value.as_bool().map(Self::Boolean),
            OptionKind::User => id().map(|id| Self::User(UserId(id))),
            OptionKind::Channel => id().map(|id| Self::Channel(ChannelId(id))),
            OptionKind::Role => id().map(|id| Self::Role(RoleId(id))),
            OptionKind::Mentionable => id().map(Self::Mentionable),
            OptionKind::SubCommand | OptionKind::SubCommandGroup => None,
        }
    }

    /// Returns the value in the textual form converters accept.
    pub fn to_argument_string(&self) -> String {
        match self {
            Self::String(val) => val.clone(),
            Self::Integer(val) => val.to_string(),
            Self::Number(val) => val.to_string(),
            Self::Boolean(val) => val.to_string(),
            Self::User(id) => id.to_string(),
            Self::Channel(id) => id.to_string(),
            Self::Role(id) => id.to_string(),
            Self::Mentionable(id) => id.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InteractionOption {
    pub name: String,
    pub kind: OptionKind,
    pub value: Option<OptionValue>,
    /// Nested options of sub commands and groups.
    pub options: Vec<InteractionOption>,
}

impl From<CommandDataOption> for InteractionOption {
    fn from(src: CommandDataOption) -> Self {
        let kind = OptionKind::from(src.kind);

        Self {
            value: src
                .value
                .as_ref()
                .and_then(|value| OptionValue::from_json(kind, value)),
            name: src.name,
            kind,
            options: src.options.into_iter().map(Self::from).collect(),
        }
    }
}

/// An invocation of a slash command.
#[derive(Clone, Debug, PartialEq)]
pub struct SlashInteraction {
    pub id: u64,
    pub command_name: String,
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub user: User,
    pub member: Option<Member>,
    /// The locale selected by the invoking user.
    pub locale: Option<String>,
    pub options: Vec<InteractionOption>,
}

impl SlashInteraction {
    /// Descends into sub command group and sub command options.
    ///
    /// Returns the invoked path below the command name and the options of
    /// the invoked (sub) command.
    pub fn resolve(&self) -> (Vec<&str>, &[InteractionOption]) {
        let mut path = Vec::new();
        let mut options = &self.options[..];

        while let Some(option) = options.first() {
            if !option.kind.is_sub_command() {
                break;
            }

            path.push(option.name.as_str());
            options = &option.options;
        }

        (path, options)
    }
}

impl From<ApplicationCommandInteraction> for SlashInteraction {
    fn from(src: ApplicationCommandInteraction) -> Self {
        Self {
            id: src.id.0,
            command_name: src.data.name,
            guild_id: src.guild_id.map(GuildId::from),
            channel_id: src.channel_id.into(),
            user: src.user.into(),
            member: src.member.map(Member::from),
            locale: Some(src.locale).filter(|locale| !locale.is_empty()),
            options: src
                .data
                .options
                .into_iter()
                .map(InteractionOption::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InteractionOption, OptionKind, OptionValue, SlashInteraction};

    use extbot::model::{ChannelId, User, UserId};
    use serde_json::json;

    #[test]
    fn test_option_value_from_json() {
        assert_eq!(
            OptionValue::from_json(OptionKind::User, &json!("1234")),
            Some(OptionValue::User(UserId(1234)))
        );
        assert_eq!(
            OptionValue::from_json(OptionKind::Integer, &json!(12)),
            Some(OptionValue::Integer(12))
        );
        assert_eq!(OptionValue::from_json(OptionKind::Integer, &json!("x")), None);
        assert_eq!(OptionValue::User(UserId(5)).to_argument_string(), "5");
    }

    #[test]
    fn test_resolve_sub_command() {
        let interaction = SlashInteraction {
            id: 1,
            command_name: String::from("config"),
            guild_id: None,
            channel_id: ChannelId(2),
            user: User {
                id: UserId(3),
                bot: false,
                discriminator: 1,
                name: String::from("alice"),
            },
            member: None,
            locale: None,
            options: vec![InteractionOption {
                name: String::from("prefix"),
                kind: OptionKind::SubCommandGroup,
                value: None,
                options: vec![InteractionOption {
                    name: String::from("set"),
                    kind: OptionKind::SubCommand,
                    value: None,
                    options: vec![InteractionOption {
                        name: String::from("value"),
                        kind: OptionKind::String,
                        value: Some(OptionValue::String(String::from("?"))),
                        options: Vec::new(),
                    }],
                }],
            }],
        };

        let (path, options) = interaction.resolve();
        assert_eq!(path, vec!["prefix", "set"]);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].name, "value");
    }
}
