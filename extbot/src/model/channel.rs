use serde::{Deserialize, Serialize};

use serenity::model::channel::{Channel as SChannel, ChannelType, GuildChannel};

use super::id::{ChannelId, GuildId, MessageId};
use super::user::User;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    Text,
    Voice,
    Category,
    News,
    Thread,
    Private,
    Other,
}

impl From<ChannelType> for ChannelKind {
    fn from(src: ChannelType) -> Self {
        match src {
            ChannelType::Text => Self::Text,
            ChannelType::Voice | ChannelType::Stage => Self::Voice,
            ChannelType::Category => Self::Category,
            ChannelType::News => Self::News,
            ChannelType::NewsThread | ChannelType::PublicThread | ChannelType::PrivateThread => {
                Self::Thread
            }
            ChannelType::Private => Self::Private,
            _ => Self::Other,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    /// `None` for private channels.
    pub guild_id: Option<GuildId>,
    pub name: String,
    pub kind: ChannelKind,
}

impl Channel {
    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }
}

impl From<GuildChannel> for Channel {
    fn from(src: GuildChannel) -> Self {
        Self {
            id: src.id.into(),
            guild_id: Some(src.guild_id.into()),
            name: src.name,
            kind: src.kind.into(),
        }
    }
}

impl From<SChannel> for Channel {
    fn from(src: SChannel) -> Self {
        match src {
            SChannel::Guild(channel) => channel.into(),
            SChannel::Category(category) => Self {
                id: category.id.into(),
                guild_id: Some(category.guild_id.into()),
                name: category.name,
                kind: ChannelKind::Category,
            },
            SChannel::Private(channel) => Self {
                id: channel.id.into(),
                guild_id: None,
                name: channel.recipient.name,
                kind: ChannelKind::Private,
            },
            _ => Self {
                id: src.id().into(),
                guild_id: None,
                name: String::new(),
                kind: ChannelKind::Other,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub guild_id: Option<GuildId>,
    pub author: User,
    pub content: String,
}

impl AsRef<ChannelId> for Message {
    fn as_ref(&self) -> &ChannelId {
        &self.channel_id
    }
}

impl AsRef<MessageId> for Message {
    fn as_ref(&self) -> &MessageId {
        &self.id
    }
}

impl From<serenity::model::channel::Message> for Message {
    fn from(src: serenity::model::channel::Message) -> Self {
        Self {
            id: src.id.into(),
            channel_id: src.channel_id.into(),
            guild_id: src.guild_id.map(GuildId::from),
            author: src.author.into(),
            content: src.content,
        }
    }
}
