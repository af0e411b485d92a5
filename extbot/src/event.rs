use crate::model::{GuildId, Member, Message, User};

use std::convert::TryFrom;
use std::fmt::{self, Display, Formatter};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ready,
    Message,
    GuildMemberAddition,
    GuildMemberRemoval,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InvalidEventKindError;

impl Display for InvalidEventKindError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "invalid event kind")
    }
}

impl std::error::Error for InvalidEventKindError {}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Ready => "Ready",
                Self::Message => "Message",
                Self::GuildMemberAddition => "GuildMemberAddition",
                Self::GuildMemberRemoval => "GuildMemberRemoval",
            }
        )
    }
}

/// An event extensions can subscribe to.
pub trait Event:
    TryFrom<EventData, Error = InvalidEventKindError> + Into<EventData> + Send + 'static
{
    /// Returns the appropriate [`EventKind`] of the `Event`.
    fn kind() -> EventKind;
}

#[derive(Clone, Debug)]
pub enum EventData {
    Ready(Box<ReadyData>),
    Message(Box<MessageData>),
    GuildMemberAddition(Box<GuildMemberAdditionData>),
    GuildMemberRemoval(Box<GuildMemberRemovalData>),
}

impl EventData {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Ready(_) => EventKind::Ready,
            Self::Message(_) => EventKind::Message,
            Self::GuildMemberAddition(_) => EventKind::GuildMemberAddition,
            Self::GuildMemberRemoval(_) => EventKind::GuildMemberRemoval,
        }
    }
}

/// The bot connected to the gateway.
#[derive(Clone, Debug)]
pub struct ReadyData {
    pub user: User,
    pub guilds: Vec<GuildId>,
}

#[derive(Clone, Debug)]
pub struct MessageData(pub Message);

#[derive(Clone, Debug)]
pub struct GuildMemberAdditionData {
    pub guild_id: GuildId,
    pub member: Member,
}

#[derive(Clone, Debug)]
pub struct GuildMemberRemovalData {
    pub guild_id: GuildId,
    pub user: User,
    pub member: Option<Member>,
}

macro_rules! impl_event {
    ($struct_name:ty, $event_name:tt) => {
        impl TryFrom<EventData> for $struct_name {
            type Error = InvalidEventKindError;

            fn try_from(event: EventData) -> Result<Self, Self::Error> {
                match event {
                    EventData::$event_name(event) => Ok(*event),
                    _ => Err(InvalidEventKindError),
                }
            }
        }

        impl From<$struct_name> for EventData {
            fn from(event: $struct_name) -> Self {
                Self::$event_name(Box::new(event))
            }
        }

        impl Event for $struct_name {
            fn kind() -> EventKind {
                EventKind::$event_name
            }
        }
    };
}

impl_event!(ReadyData, Ready);
impl_event!(MessageData, Message);
impl_event!(GuildMemberAdditionData, GuildMemberAddition);
impl_event!(GuildMemberRemovalData, GuildMemberRemoval);

#[cfg(test)]
mod tests {
    use super::{Event, EventData, EventKind, GuildMemberRemovalData, MessageData};
    use crate::model::{ChannelId, GuildId, Message, MessageId, User, UserId};

    use std::convert::TryFrom;

    fn user() -> User {
        User {
            id: UserId(1),
            bot: false,
            discriminator: 1,
            name: String::from("alice"),
        }
    }

    #[test]
    fn test_event_kind() {
        assert_eq!(EventKind::GuildMemberRemoval.to_string(), "GuildMemberRemoval");
    }

    #[test]
    fn test_event_data() {
        let data: EventData = GuildMemberRemovalData {
            guild_id: GuildId(1),
            user: user(),
            member: None,
        }
        .into();

        assert_eq!(data.kind(), GuildMemberRemovalData::kind());
        assert!(MessageData::try_from(data.clone()).is_err());
        assert_eq!(
            GuildMemberRemovalData::try_from(data).unwrap().guild_id,
            GuildId(1)
        );

        let data: EventData = MessageData(Message {
            id: MessageId(2),
            channel_id: ChannelId(3),
            guild_id: None,
            author: user(),
            content: String::from("hi"),
        })
        .into();
        assert_eq!(data.kind(), EventKind::Message);
    }
}
