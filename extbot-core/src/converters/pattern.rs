use super::Converter;
use crate::context::CommandContext;
use crate::error::CommandError;

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};

/// Compiles the input into a [`Regex`].
#[derive(Copy, Clone, Debug, Default)]
pub struct RegexConverter {
    case_insensitive: bool,
}

impl RegexConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }
}

#[async_trait]
impl Converter for RegexConverter {
    type Output = Regex;

    fn signature_type(&self) -> &'static str {
        "converters.regex.signatureType"
    }

    async fn parse(&self, input: &str, ctx: &CommandContext) -> Result<Regex, CommandError> {
        RegexBuilder::new(input)
            .case_insensitive(self.case_insensitive)
            .build()
            .map_err(|_| ctx.error("converters.regex.error.invalid", &[input]))
    }
}

#[cfg(test)]
mod tests {
    use super::RegexConverter;
    use crate::context::tests::context;
    use crate::converters::Converter;
    use crate::supplier::MemorySupplier;

    #[tokio::test]
    async fn test_regex_converter() {
        let (ctx, _) = context(MemorySupplier::new(), None);

        let regex = RegexConverter::new().parse("^a+b$", &ctx).await.unwrap();
        assert!(regex.is_match("aab"));
        assert!(!regex.is_match("AAB"));

        let regex = RegexConverter::new()
            .case_insensitive(true)
            .parse("^a+b$", &ctx)
            .await
            .unwrap();
        assert!(regex.is_match("AAB"));

        assert!(RegexConverter::new().parse("(", &ctx).await.is_err());
    }
}
