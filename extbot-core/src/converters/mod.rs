//! Converters turn a single textual argument into a typed value.
mod boolean;
mod channel;
mod duration;
mod guild;
mod member;
mod number;
mod pattern;
mod role;
mod string;
mod user;

pub use boolean::BooleanConverter;
pub use channel::ChannelConverter;
pub use duration::DurationConverter;
pub use guild::GuildConverter;
pub use member::MemberConverter;
pub use number::{DecimalConverter, IntConverter};
pub use pattern::RegexConverter;
pub use role::RoleConverter;
pub use string::{ChoiceConverter, StringConverter};
pub use user::UserConverter;

use crate::context::CommandContext;
use crate::error::CommandError;
use crate::slash::interaction::OptionKind;

use async_trait::async_trait;

use std::any::Any;

#[async_trait]
pub trait Converter: Send + Sync + 'static {
    type Output: Send + 'static;

    /// Translation key of the type name shown in command signatures.
    fn signature_type(&self) -> &'static str;

    /// The slash command option type used for this converter.
    fn option_kind(&self) -> OptionKind {
        OptionKind::String
    }

    /// Fixed `(name, value)` choices offered for slash command options.
    fn choices(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    async fn parse(&self, input: &str, ctx: &CommandContext) -> Result<Self::Output, CommandError>;
}

/// A parsed value with its type erased.
pub type AnyValue = Box<dyn Any + Send>;

/// A [`Converter`] with its output type erased.
#[async_trait]
pub(crate) trait ErasedConverter: Send + Sync {
    fn signature_type(&self) -> &'static str;

    fn option_kind(&self) -> OptionKind;

    fn choices(&self) -> Vec<(String, String)>;

    async fn parse(&self, input: &str, ctx: &CommandContext) -> Result<AnyValue, CommandError>;

    /// Returns `Option::<Output>::None`.
    fn none(&self) -> AnyValue;

    /// Wraps a parsed value into `Option::<Output>::Some`.
    fn some(&self, value: AnyValue) -> AnyValue;

    /// Collects parsed values into a `Vec<Output>`.
    fn collect(&self, values: Vec<AnyValue>) -> AnyValue;
}

pub(crate) struct Erased<C>(pub C);

#[async_trait]
impl<C> ErasedConverter for Erased<C>
where
    C: Converter,
{
    fn signature_type(&self) -> &'static str {
        self.0.signature_type()
    }

    fn option_kind(&self) -> OptionKind {
        self.0.option_kind()
    }

    fn choices(&self) -> Vec<(String, String)> {
        self.0.choices()
    }

    async fn parse(&self, input: &str, ctx: &CommandContext) -> Result<AnyValue, CommandError> {
        let value = self.0.parse(input, ctx).await?;
        Ok(Box::new(value))
    }

    fn none(&self) -> AnyValue {
        Box::new(Option::<C::Output>::None)
    }

    fn some(&self, value: AnyValue) -> AnyValue {
        match value.downcast::<C::Output>() {
            Ok(value) => Box::new(Some(*value)),
            Err(value) => value,
        }
    }

    fn collect(&self, values: Vec<AnyValue>) -> AnyValue {
        let values: Vec<C::Output> = values
            .into_iter()
            .filter_map(|value| value.downcast::<C::Output>().ok())
            .map(|value| *value)
            .collect();

        Box::new(values)
    }
}
