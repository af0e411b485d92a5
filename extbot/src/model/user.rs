use serde::{Deserialize, Serialize};

use serenity::model::user::User as SUser;

use super::id::UserId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub bot: bool,
    pub discriminator: u16,
    #[serde(rename = "username")]
    pub name: String,
}

impl User {
    /// Returns the `username#discriminator` tag of the user.
    pub fn tag(&self) -> String {
        format!("{}#{:04}", self.name, self.discriminator)
    }

    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

impl From<SUser> for User {
    fn from(src: SUser) -> Self {
        Self {
            id: src.id.into(),
            bot: src.bot,
            discriminator: src.discriminator,
            name: src.name,
        }
    }
}
