use thiserror::Error;

use std::error::Error as StdError;

pub type Result<T = (), E = Error> = std::result::Result<T, E>;

/// A failure that is shown to the user who invoked a command.
///
/// Converters, the argument parser and command handlers return this error
/// when the input was wrong rather than the bot.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CommandError(pub String);

impl CommandError {
    pub fn new<T>(message: T) -> Self
    where
        T: ToString,
    {
        Self(message.to_string())
    }
}

/// A command definition is missing a required property or uses an
/// unsupported one.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Invalid command `{name}`: {reason}")]
pub struct InvalidCommand {
    pub name: String,
    pub reason: String,
}

impl InvalidCommand {
    pub fn new<N, R>(name: N, reason: R) -> Self
    where
        N: ToString,
        R: ToString,
    {
        Self {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Client(#[from] serenity::Error),
    #[error(transparent)]
    InvalidCommand(#[from] InvalidCommand),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("DuplicateName: a command with the name `{0}` already exists")]
    DuplicateName(String),
    #[error("InvalidPath: no command at `{0}`")]
    InvalidPath(String),
    #[error("DuplicateExtension: an extension named `{0}` is already loaded")]
    DuplicateExtension(String),
    #[error("UnknownExtension: no extension named `{0}` is loaded")]
    UnknownExtension(String),
    #[error("NoResponse: the handler did not respond")]
    NoResponse,
    #[error(transparent)]
    Other(Box<dyn StdError + Send + Sync + 'static>),
}

impl Error {
    pub fn other<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        Self::Other(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::{CommandError, Error, InvalidCommand};

    #[test]
    fn test_error_display() {
        let err = InvalidCommand::new("ping", "No command action given.");
        assert_eq!(err.to_string(), "Invalid command `ping`: No command action given.");

        let err = Error::from(CommandError::new("Unknown user"));
        assert_eq!(err.to_string(), "Unknown user");

        let err = Error::other("boom");
        assert_eq!(err.to_string(), "boom");
    }
}
