use super::Converter;
use crate::context::CommandContext;
use crate::error::CommandError;

use async_trait::async_trait;
use chrono::Duration;

/// Parses durations like `1w2d`, `90m` or `1h30m15s`.
///
/// Supported units are `w`, `d`, `h`, `m` and `s`. Units may appear in any
/// order and are case-insensitive.
#[derive(Copy, Clone, Debug, Default)]
pub struct DurationConverter {
    allow_zero: bool,
}

impl DurationConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_zero(mut self, allow_zero: bool) -> Self {
        self.allow_zero = allow_zero;
        self
    }
}

/// Returns the total number of seconds in `input`.
fn parse_seconds(input: &str) -> Option<i64> {
    let mut total: i64 = 0;
    let mut number = String::new();
    let mut units = 0;

    for c in input.chars() {
        if c.is_ascii_digit() {
            number.push(c);
            continue;
        }

        if number.is_empty() {
            return None;
        }

        let scale = match c.to_ascii_lowercase() {
            'w' => 7 * 24 * 60 * 60,
            'd' => 24 * 60 * 60,
            'h' => 60 * 60,
            'm' => 60,
            's' => 1,
            _ => return None,
        };

        let value: i64 = number.parse().ok()?;
        total = total.checked_add(value.checked_mul(scale)?)?;
        number.clear();
        units += 1;
    }

    // Trailing digits without a unit.
    if !number.is_empty() || units == 0 {
        return None;
    }

    Some(total)
}

#[async_trait]
impl Converter for DurationConverter {
    type Output = Duration;

    fn signature_type(&self) -> &'static str {
        "converters.duration.signatureType"
    }

    async fn parse(&self, input: &str, ctx: &CommandContext) -> Result<Duration, CommandError> {
        let seconds = parse_seconds(input)
            .filter(|seconds| self.allow_zero || *seconds > 0)
            // chrono panics above i64::MAX milliseconds.
            .filter(|seconds| *seconds <= i64::MAX / 1000)
            .ok_or_else(|| ctx.error("converters.duration.error.invalid", &[input]))?;

        Ok(Duration::seconds(seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_seconds, DurationConverter};
    use crate::context::tests::context;
    use crate::converters::Converter;
    use crate::supplier::MemorySupplier;

    use chrono::Duration;

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds("5s"), Some(5));
        assert_eq!(parse_seconds("1h30m"), Some(5400));
        assert_eq!(parse_seconds("1w2d3h4m5s"), Some(788645));
        assert_eq!(parse_seconds("2D"), Some(172800));
        assert_eq!(parse_seconds("10"), None);
        assert_eq!(parse_seconds("h"), None);
        assert_eq!(parse_seconds("1x"), None);
        assert_eq!(parse_seconds(""), None);
        assert_eq!(parse_seconds("99999999999999999999w"), None);
    }

    #[tokio::test]
    async fn test_duration_converter() {
        let (ctx, _) = context(MemorySupplier::new(), None);

        assert_eq!(
            DurationConverter::new().parse("1h", &ctx).await.unwrap(),
            Duration::hours(1)
        );
        assert!(DurationConverter::new().parse("0s", &ctx).await.is_err());
        assert_eq!(
            DurationConverter::new()
                .allow_zero(true)
                .parse("0s", &ctx)
                .await
                .unwrap(),
            Duration::zero()
        );
    }
}
