use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::fmt::{self, Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid format")]
    InvalidFormat,
    #[error(transparent)]
    ParseIntError(#[from] ParseIntError),
}

macro_rules! snowflake {
    ($name:ident, $raw:ty) => {
        #[derive(
            Copy,
            Clone,
            Debug,
            Default,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
        )]
        pub struct $name(pub u64);

        /// Parses a plain decimal snowflake. Signs and whitespace are rejected.
        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ParseError::InvalidFormat);
                }

                Ok(Self(s.parse()?))
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$raw> for $name {
            fn from(src: $raw) -> Self {
                Self(src.0)
            }
        }

        impl From<$name> for $raw {
            fn from(id: $name) -> Self {
                <$raw>::from(id.0)
            }
        }
    };
}

snowflake!(ChannelId, serenity::model::id::ChannelId);
snowflake!(GuildId, serenity::model::id::GuildId);
snowflake!(MessageId, serenity::model::id::MessageId);
snowflake!(RoleId, serenity::model::id::RoleId);
snowflake!(UserId, serenity::model::id::UserId);
