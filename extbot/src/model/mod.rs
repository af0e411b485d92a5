pub mod channel;
pub mod guild;
pub mod id;
pub mod user;

pub use channel::{Channel, ChannelKind, Message};
pub use guild::{Guild, Member, Role};
pub use id::{ChannelId, GuildId, MessageId, RoleId, UserId};
pub use user::User;
