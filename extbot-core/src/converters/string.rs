use super::Converter;
use crate::context::CommandContext;
use crate::error::CommandError;

use async_trait::async_trait;

#[derive(Copy, Clone, Debug, Default)]
pub struct StringConverter {
    max_length: Option<usize>,
}

impl StringConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects values longer than `max_length` characters.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }
}

#[async_trait]
impl Converter for StringConverter {
    type Output = String;

    fn signature_type(&self) -> &'static str {
        "converters.string.signatureType"
    }

    async fn parse(&self, input: &str, ctx: &CommandContext) -> Result<String, CommandError> {
        if let Some(max_length) = self.max_length {
            if input.chars().count() > max_length {
                return Err(ctx.error(
                    "converters.string.error.tooLong",
                    &[&max_length.to_string()],
                ));
            }
        }

        Ok(input.to_owned())
    }
}

/// Accepts one of a fixed set of values, ignoring case.
///
/// The parsed value is the choice as it was defined, not as it was typed.
#[derive(Clone, Debug)]
pub struct ChoiceConverter {
    choices: Vec<String>,
}

impl ChoiceConverter {
    pub fn new<I, T>(choices: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Self {
            choices: choices.into_iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[async_trait]
impl Converter for ChoiceConverter {
    type Output = String;

    fn signature_type(&self) -> &'static str {
        "converters.choice.signatureType"
    }

    fn choices(&self) -> Vec<(String, String)> {
        self.choices
            .iter()
            .map(|choice| (choice.clone(), choice.clone()))
            .collect()
    }

    async fn parse(&self, input: &str, ctx: &CommandContext) -> Result<String, CommandError> {
        let input_lower = input.to_lowercase();

        match self
            .choices
            .iter()
            .find(|choice| choice.to_lowercase() == input_lower)
        {
            Some(choice) => Ok(choice.clone()),
            None => Err(ctx.error(
                "converters.choice.error.invalid",
                &[input, &self.choices.join(", ")],
            )),
        }
    }
}
