use super::Converter;
use crate::context::CommandContext;
use crate::error::CommandError;
use crate::slash::interaction::OptionKind;

use async_trait::async_trait;

/// Parses a whole number in the given radix (10 by default).
#[derive(Copy, Clone, Debug)]
pub struct IntConverter {
    radix: u32,
}

impl IntConverter {
    pub fn new() -> Self {
        Self { radix: 10 }
    }

    /// # Panics
    ///
    /// Panics if `radix` is not in the range `2..=36`.
    pub fn radix(mut self, radix: u32) -> Self {
        assert!((2..=36).contains(&radix), "radix must be in 2..=36");
        self.radix = radix;
        self
    }
}

impl Default for IntConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Converter for IntConverter {
    type Output = i64;

    fn signature_type(&self) -> &'static str {
        "converters.number.signatureType"
    }

    fn option_kind(&self) -> OptionKind {
        // Discord only sends base 10 integers.
        if self.radix == 10 {
            OptionKind::Integer
        } else {
            OptionKind::String
        }
    }

    async fn parse(&self, input: &str, ctx: &CommandContext) -> Result<i64, CommandError> {
        match i64::from_str_radix(input, self.radix) {
            Ok(val) => Ok(val),
            Err(_) if self.radix == 10 => Err(ctx.error("converters.number.error.invalid", &[input])),
            Err(_) => Err(ctx.error(
                "converters.number.error.invalid.base",
                &[input, &self.radix.to_string()],
            )),
        }
    }
}

/// Parses a finite floating point number.
#[derive(Copy, Clone, Debug, Default)]
pub struct DecimalConverter;

#[async_trait]
impl Converter for DecimalConverter {
    type Output = f64;

    fn signature_type(&self) -> &'static str {
        "converters.decimal.signatureType"
    }

    fn option_kind(&self) -> OptionKind {
        OptionKind::Number
    }

    async fn parse(&self, input: &str, ctx: &CommandContext) -> Result<f64, CommandError> {
        match input.parse::<f64>() {
            Ok(val) if val.is_finite() => Ok(val),
            _ => Err(ctx.error("converters.decimal.error.invalid", &[input])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DecimalConverter, IntConverter};
    use crate::context::tests::context;
    use crate::converters::Converter;
    use crate::slash::interaction::OptionKind;
    use crate::supplier::MemorySupplier;

    #[tokio::test]
    async fn test_int_converter() {
        let (ctx, _) = context(MemorySupplier::new(), None);

        let converter = IntConverter::new();
        assert_eq!(converter.parse("-42", &ctx).await.unwrap(), -42);
        assert_eq!(
            converter.parse("4.2", &ctx).await.unwrap_err().0,
            "Value `4.2` is not a valid number."
        );
        assert_eq!(converter.option_kind(), OptionKind::Integer);

        let converter = IntConverter::new().radix(16);
        assert_eq!(converter.parse("ff", &ctx).await.unwrap(), 255);
        assert_eq!(
            converter.parse("fg", &ctx).await.unwrap_err().0,
            "Value `fg` is not a valid base-16 number."
        );
        assert_eq!(converter.option_kind(), OptionKind::String);
    }

    #[tokio::test]
    async fn test_decimal_converter() {
        let (ctx, _) = context(MemorySupplier::new(), None);

        assert_eq!(DecimalConverter.parse("1.5", &ctx).await.unwrap(), 1.5);
        assert!(DecimalConverter.parse("NaN", &ctx).await.is_err());
        assert!(DecimalConverter.parse("inf", &ctx).await.is_err());
        assert!(DecimalConverter.parse("one", &ctx).await.is_err());
    }
}
