use super::Converter;
use crate::context::CommandContext;
use crate::error::CommandError;
use crate::slash::interaction::OptionKind;

use async_trait::async_trait;

#[derive(Copy, Clone, Debug, Default)]
pub struct BooleanConverter;

#[async_trait]
impl Converter for BooleanConverter {
    type Output = bool;

    fn signature_type(&self) -> &'static str {
        "converters.boolean.signatureType"
    }

    fn option_kind(&self) -> OptionKind {
        OptionKind::Boolean
    }

    async fn parse(&self, input: &str, ctx: &CommandContext) -> Result<bool, CommandError> {
        match input.to_lowercase().as_str() {
            "true" | "yes" | "y" | "on" | "1" => Ok(true),
            "false" | "no" | "n" | "off" | "0" => Ok(false),
            _ => Err(ctx.error("converters.boolean.error.invalid", &[input])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BooleanConverter;
    use crate::context::tests::context;
    use crate::converters::Converter;
    use crate::supplier::MemorySupplier;

    #[tokio::test]
    async fn test_boolean_converter() {
        let (ctx, _) = context(MemorySupplier::new(), None);

        for input in ["true", "Yes", "y", "ON", "1"] {
            assert!(BooleanConverter.parse(input, &ctx).await.unwrap());
        }

        for input in ["false", "no", "N", "off", "0"] {
            assert!(!BooleanConverter.parse(input, &ctx).await.unwrap());
        }

        assert!(BooleanConverter.parse("maybe", &ctx).await.is_err());
    }
}
