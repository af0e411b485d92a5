//! Typed command arguments.
//!
//! A command declares its arguments through the [`Arguments`] trait. The
//! parser fills a [`ParsedArguments`] map from message tokens or slash
//! command options which is then turned into the typed arguments struct.
use crate::context::CommandContext;
use crate::converters::{AnyValue, Converter, Erased, ErasedConverter};
use crate::error::CommandError;
use crate::slash::interaction::{InteractionOption, OptionKind};

use extbot::arguments::{parse_args, ArgumentsExt, CommandArguments};

use std::any::Any;
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

type Validator = Arc<dyn Fn(&dyn Any, &CommandContext) -> Result<(), CommandError> + Send + Sync>;

/// How many values an argument takes and what happens when it is absent.
#[derive(Clone)]
pub enum Arity {
    /// Exactly one value is required.
    Single,
    /// Zero or one value. Unparseable input is left for the next argument.
    Optional,
    /// Like [`Arity::Optional`], producing a default value when absent.
    Defaulting(Arc<dyn Fn() -> AnyValue + Send + Sync>),
    /// As many values as parse. `required` lists need at least one.
    List { required: bool },
    /// All remaining input, joined by spaces, as one value.
    Coalescing,
}

impl Debug for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "Single"),
            Self::Optional => write!(f, "Optional"),
            Self::Defaulting(_) => write!(f, "Defaulting"),
            Self::List { required } => write!(f, "List {{ required: {} }}", required),
            Self::Coalescing => write!(f, "Coalescing"),
        }
    }
}

#[derive(Clone)]
pub struct Argument {
    pub name: String,
    pub description: String,
    arity: Arity,
    converter: Arc<dyn ErasedConverter>,
    validator: Option<Validator>,
}

impl Argument {
    fn new<N, D, C>(name: N, description: D, converter: C, arity: Arity) -> Self
    where
        N: ToString,
        D: ToString,
        C: Converter,
    {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            arity,
            converter: Arc::new(Erased(converter)),
            validator: None,
        }
    }

    /// A required argument. Taken as `C::Output`.
    pub fn single<N, D, C>(name: N, description: D, converter: C) -> Self
    where
        N: ToString,
        D: ToString,
        C: Converter,
    {
        Self::new(name, description, converter, Arity::Single)
    }

    /// An optional argument. Taken as `Option<C::Output>`.
    pub fn optional<N, D, C>(name: N, description: D, converter: C) -> Self
    where
        N: ToString,
        D: ToString,
        C: Converter,
    {
        Self::new(name, description, converter, Arity::Optional)
    }

    /// An optional argument with a default value. Taken as `C::Output`.
    pub fn defaulting<N, D, C>(name: N, description: D, converter: C, default: C::Output) -> Self
    where
        N: ToString,
        D: ToString,
        C: Converter,
        C::Output: Clone + Sync,
    {
        let default = Arity::Defaulting(Arc::new(move || Box::new(default.clone()) as AnyValue));
        Self::new(name, description, converter, default)
    }

    /// A list of values. Taken as `Vec<C::Output>`.
    pub fn list<N, D, C>(name: N, description: D, converter: C, required: bool) -> Self
    where
        N: ToString,
        D: ToString,
        C: Converter,
    {
        Self::new(name, description, converter, Arity::List { required })
    }

    /// Consumes all remaining input. Taken as `C::Output`.
    pub fn coalescing<N, D, C>(name: N, description: D, converter: C) -> Self
    where
        N: ToString,
        D: ToString,
        C: Converter,
    {
        Self::new(name, description, converter, Arity::Coalescing)
    }

    /// Adds a validator that runs on every successfully parsed value.
    ///
    /// `T` must be the output type of the argument's converter, the
    /// validator is skipped for values of any other type.
    pub fn validate<T, F>(mut self, f: F) -> Self
    where
        T: 'static,
        F: Fn(&T, &CommandContext) -> Result<(), CommandError> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(move |value: &dyn Any, ctx: &CommandContext| {
            match value.downcast_ref::<T>() {
                Some(value) => f(value, ctx),
                None => Ok(()),
            }
        }));
        self
    }

    pub fn arity(&self) -> &Arity {
        &self.arity
    }

    pub fn is_required(&self) -> bool {
        matches!(
            self.arity,
            Arity::Single | Arity::Coalescing | Arity::List { required: true }
        )
    }

    pub fn is_list(&self) -> bool {
        matches!(self.arity, Arity::List { .. })
    }

    /// Translation key of the argument's type name.
    pub fn signature_type(&self) -> &'static str {
        self.converter.signature_type()
    }

    pub fn option_kind(&self) -> OptionKind {
        self.converter.option_kind()
    }

    pub fn choices(&self) -> Vec<(String, String)> {
        self.converter.choices()
    }

    /// Parses and validates a single value.
    async fn convert(&self, input: &str, ctx: &CommandContext) -> Result<AnyValue, CommandError> {
        let value = self.converter.parse(input, ctx).await?;

        if let Some(validator) = &self.validator {
            validator(&*value, ctx)?;
        }

        Ok(value)
    }

    /// Like [`convert`], wrapping converter errors with the argument name.
    ///
    /// [`convert`]: Self::convert
    async fn convert_named(
        &self,
        input: &str,
        ctx: &CommandContext,
    ) -> Result<AnyValue, CommandError> {
        self.convert(input, ctx).await.map_err(|err| {
            ctx.error("argumentParser.error.invalidValue", &[&self.name, &err.0])
        })
    }

    /// Returns the value used when the argument was not given.
    fn absent(&self, ctx: &CommandContext) -> Result<AnyValue, CommandError> {
        match &self.arity {
            Arity::Optional => Ok(self.converter.none()),
            Arity::Defaulting(default) => Ok(default()),
            Arity::List { required: false } => Ok(self.converter.collect(Vec::new())),
            _ => Err(ctx.error("argumentParser.error.missingArgument", &[&self.name])),
        }
    }

    /// Wraps a single explicitly given value into the argument's shape.
    fn shape(&self, value: AnyValue) -> AnyValue {
        match &self.arity {
            Arity::Optional => self.converter.some(value),
            Arity::List { .. } => self.converter.collect(vec![value]),
            _ => value,
        }
    }
}

impl Debug for Argument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argument")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("arity", &self.arity)
            .finish()
    }
}

/// A set of typed command arguments.
///
/// ```ignore
/// struct BanArgs {
///     target: Member,
///     reason: Option<String>,
/// }
///
/// impl Arguments for BanArgs {
///     fn signature() -> Vec<Argument> {
///         vec![
///             Argument::single("target", "Member to ban", MemberConverter::new()),
///             Argument::optional("reason", "Reason for the ban", StringConverter::new()),
///         ]
///     }
///
///     fn from_parsed(args: &mut ParsedArguments) -> Result<Self, CommandError> {
///         Ok(Self {
///             target: args.take("target")?,
///             reason: args.take("reason")?,
///         })
///     }
/// }
/// ```
pub trait Arguments: Sized + Send + Sync + 'static {
    fn signature() -> Vec<Argument>;

    fn from_parsed(args: &mut ParsedArguments) -> Result<Self, CommandError>;
}

impl Arguments for () {
    fn signature() -> Vec<Argument> {
        Vec::new()
    }

    fn from_parsed(_: &mut ParsedArguments) -> Result<Self, CommandError> {
        Ok(())
    }
}

/// Parsed argument values by argument name.
#[derive(Default)]
pub struct ParsedArguments {
    values: HashMap<String, AnyValue>,
}

impl ParsedArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub(crate) fn insert(&mut self, name: String, value: AnyValue) {
        self.values.insert(name, value);
    }

    /// Removes and returns the value of the argument `name`.
    ///
    /// Returns an error if no value exists or it is not a `T`.
    pub fn take<T>(&mut self, name: &str) -> Result<T, CommandError>
    where
        T: 'static,
    {
        let value = self
            .values
            .remove(name)
            .ok_or_else(|| CommandError(format!("No value for argument `{}`", name)))?;

        match value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => Err(CommandError(format!(
                "Argument `{}` is not a `{}`",
                name,
                std::any::type_name::<T>()
            ))),
        }
    }
}

impl Debug for ParsedArguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

/// Parses message command arguments.
///
/// `--name value` pairs for any argument in the signature are taken out
/// first, the remaining tokens are assigned in signature order. Tokens left
/// over after all arguments were parsed are an error.
pub async fn parse_message_arguments(
    signature: &[Argument],
    args: &mut CommandArguments,
    ctx: &CommandContext,
) -> Result<ParsedArguments, CommandError> {
    let mut named = HashMap::new();
    for argument in signature {
        if let Some(value) = args.take_named(&argument.name) {
            named.insert(argument.name.as_str(), value);
        }
    }

    let mut parsed = ParsedArguments::new();

    for argument in signature {
        if let Some(input) = named.remove(argument.name.as_str()) {
            let value = argument.convert_named(&input, ctx).await?;
            parsed.insert(argument.name.clone(), argument.shape(value));
            continue;
        }

        let value = match &argument.arity {
            Arity::Single => match args.peek().cloned() {
                Some(input) => {
                    let value = argument.convert_named(&input, ctx).await?;
                    args.pop();
                    value
                }
                None => argument.absent(ctx)?,
            },
            Arity::Optional | Arity::Defaulting(_) => match args.peek().cloned() {
                Some(input) => match argument.convert(&input, ctx).await {
                    Ok(value) => {
                        args.pop();
                        argument.shape(value)
                    }
                    Err(_) => argument.absent(ctx)?,
                },
                None => argument.absent(ctx)?,
            },
            Arity::List { required } => {
                let mut values = Vec::new();
                let mut first_error = None;

                while let Some(input) = args.peek().cloned() {
                    match argument.convert(&input, ctx).await {
                        Ok(value) => {
                            args.pop();
                            values.push(value);
                        }
                        Err(err) => {
                            first_error = Some(err);
                            break;
                        }
                    }
                }

                if *required && values.is_empty() {
                    return Err(match first_error {
                        Some(err) => ctx.error(
                            "argumentParser.error.invalidValue",
                            &[&argument.name, &err.0],
                        ),
                        None => {
                            ctx.error("argumentParser.error.missingArgument", &[&argument.name])
                        }
                    });
                }

                argument.converter.collect(values)
            }
            Arity::Coalescing => match args.rest() {
                Some(input) => argument.convert_named(&input, ctx).await?,
                None => argument.absent(ctx)?,
            },
        };

        parsed.insert(argument.name.clone(), value);
    }

    if let Some(arg) = args.peek() {
        return Err(ctx.error("argumentParser.error.unexpectedArgument", &[arg]));
    }

    Ok(parsed)
}

/// Parses slash command options.
pub async fn parse_slash_arguments(
    signature: &[Argument],
    options: &[InteractionOption],
    ctx: &CommandContext,
) -> Result<ParsedArguments, CommandError> {
    let mut parsed = ParsedArguments::new();

    for argument in signature {
        let option = options
            .iter()
            .find(|option| option.name == argument.name)
            .and_then(|option| option.value.as_ref());

        let value = match option {
            Some(value) => {
                let input = value.to_argument_string();
                let value = argument.convert_named(&input, ctx).await?;
                argument.shape(value)
            }
            None => argument.absent(ctx)?,
        };

        parsed.insert(argument.name.clone(), value);
    }

    Ok(parsed)
}

/// Renders the usage signature of a command, e.g. `<user> [reason...]`.
pub fn signature_string(signature: &[Argument]) -> String {
    signature
        .iter()
        .map(|argument| {
            let name = match argument.arity {
                Arity::List { .. } | Arity::Coalescing => format!("{}...", argument.name),
                _ => argument.name.clone(),
            };

            if argument.is_required() {
                format!("<{}>", name)
            } else {
                format!("[{}]", name)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tokenizes `input` and parses it against `signature`.
pub async fn parse_input(
    signature: &[Argument],
    input: &str,
    ctx: &CommandContext,
) -> Result<ParsedArguments, CommandError> {
    let mut args = CommandArguments::from(parse_args(input));
    parse_message_arguments(signature, &mut args, ctx).await
}

#[cfg(test)]
mod tests {
    use super::{
        parse_input, parse_slash_arguments, signature_string, Argument, Arguments,
        ParsedArguments,
    };
    use crate::context::tests::context;
    use crate::converters::{BooleanConverter, IntConverter, StringConverter, UserConverter};
    use crate::error::CommandError;
    use crate::slash::interaction::{InteractionOption, OptionKind, OptionValue};
    use crate::supplier::MemorySupplier;

    use extbot::model::{User, UserId};

    #[derive(Debug)]
    struct RollArgs {
        count: i64,
        sides: Option<i64>,
        loud: bool,
        labels: Vec<String>,
    }

    impl Arguments for RollArgs {
        fn signature() -> Vec<Argument> {
            vec![
                Argument::single("count", "Number of dice", IntConverter::new())
                    .validate(|count: &i64, _| {
                        if *count < 1 {
                            return Err(CommandError::new("Roll at least one die."));
                        }

                        Ok(())
                    }),
                Argument::optional("sides", "Sides per die", IntConverter::new()),
                Argument::defaulting("loud", "Announce the result", BooleanConverter, false),
                Argument::list("labels", "Labels", StringConverter::new(), false),
            ]
        }

        fn from_parsed(args: &mut ParsedArguments) -> Result<Self, CommandError> {
            Ok(Self {
                count: args.take("count")?,
                sides: args.take("sides")?,
                loud: args.take("loud")?,
                labels: args.take("labels")?,
            })
        }
    }

    async fn roll(input: &str) -> Result<RollArgs, CommandError> {
        let (ctx, _) = context(MemorySupplier::new(), None);
        let mut parsed = parse_input(&RollArgs::signature(), input, &ctx).await?;
        RollArgs::from_parsed(&mut parsed)
    }

    #[tokio::test]
    async fn test_parse_positional() {
        let args = roll("2 6 yes a b").await.unwrap();
        assert_eq!(args.count, 2);
        assert_eq!(args.sides, Some(6));
        assert!(args.loud);
        assert_eq!(args.labels, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_parse_optional_not_consumed() {
        // `fire` is no number and no boolean, so it ends up in the list.
        let args = roll("2 fire").await.unwrap();
        assert_eq!(args.sides, None);
        assert!(!args.loud);
        assert_eq!(args.labels, vec!["fire"]);

        let args = roll("3").await.unwrap();
        assert_eq!(args.count, 3);
        assert!(args.labels.is_empty());
    }

    #[tokio::test]
    async fn test_parse_named() {
        let args = roll("--sides 20 1 --loud on").await.unwrap();
        assert_eq!(args.count, 1);
        assert_eq!(args.sides, Some(20));
        assert!(args.loud);

        let err = roll("1 --sides twenty").await.unwrap_err();
        assert_eq!(
            err.0,
            "Invalid value for argument `sides`: Value `twenty` is not a valid number."
        );
    }

    #[tokio::test]
    async fn test_parse_errors() {
        assert_eq!(
            roll("").await.unwrap_err().0,
            "Missing required argument: `count`"
        );
        assert_eq!(
            roll("x").await.unwrap_err().0,
            "Invalid value for argument `count`: Value `x` is not a valid number."
        );
        assert_eq!(
            roll("0").await.unwrap_err().0,
            "Invalid value for argument `count`: Roll at least one die."
        );
    }

    #[tokio::test]
    async fn test_parse_unexpected_argument() {
        let (ctx, _) = context(MemorySupplier::new(), None);
        let signature = vec![Argument::single("n", "", IntConverter::new())];

        assert_eq!(
            parse_input(&signature, "1 2", &ctx).await.unwrap_err().0,
            "Unexpected argument: `2`"
        );
    }

    #[tokio::test]
    async fn test_parse_coalescing_and_required_list() {
        let (ctx, _) = context(MemorySupplier::new(), None);

        let signature = vec![
            Argument::single("n", "", IntConverter::new()),
            Argument::coalescing("text", "", StringConverter::new()),
        ];
        let mut parsed = parse_input(&signature, "1 hello   \"big\" world", &ctx)
            .await
            .unwrap();
        assert_eq!(parsed.take::<String>("text").unwrap(), "hello big world");

        let signature = vec![Argument::list("n", "", IntConverter::new(), true)];
        assert_eq!(
            parse_input(&signature, "", &ctx).await.unwrap_err().0,
            "Missing required argument: `n`"
        );
        assert_eq!(
            parse_input(&signature, "a", &ctx).await.unwrap_err().0,
            "Invalid value for argument `n`: Value `a` is not a valid number."
        );
        let mut parsed = parse_input(&signature, "1 2 3", &ctx).await.unwrap();
        assert_eq!(parsed.take::<Vec<i64>>("n").unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_parse_slash_arguments() {
        let supplier = MemorySupplier::new();
        supplier.insert_user(User {
            id: UserId(5),
            bot: false,
            discriminator: 1,
            name: String::from("bob"),
        });
        let (ctx, _) = context(supplier, None);

        let signature = vec![
            Argument::single("target", "", UserConverter),
            Argument::optional("count", "", IntConverter::new()),
        ];
        let options = vec![InteractionOption {
            name: String::from("target"),
            kind: OptionKind::User,
            value: Some(OptionValue::User(UserId(5))),
            options: Vec::new(),
        }];

        let mut parsed = parse_slash_arguments(&signature, &options, &ctx)
            .await
            .unwrap();
        assert_eq!(parsed.take::<User>("target").unwrap().name, "bob");
        assert_eq!(parsed.take::<Option<i64>>("count").unwrap(), None);

        assert!(parse_slash_arguments(&signature, &[], &ctx).await.is_err());
    }

    #[test]
    fn test_signature_string() {
        assert_eq!(signature_string(&RollArgs::signature()), "<count> [sides] [loud] [labels...]");
        assert_eq!(signature_string(&<()>::signature()), "");
    }

    #[test]
    fn test_take_wrong_type() {
        let mut parsed = ParsedArguments::new();
        parsed.insert(String::from("n"), Box::new(1i64));

        assert!(parsed.take::<String>("n").is_err());
        assert!(parsed.take::<i64>("missing").is_err());
    }
}
