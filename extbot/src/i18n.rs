use serde::{Deserialize, Serialize};

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

/// A language tag such as `en` or `de`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale(Cow<'static, str>);

impl Locale {
    pub const ENGLISH: Self = Self(Cow::Borrowed("en"));
    pub const GERMAN: Self = Self(Cow::Borrowed("de"));
    pub const FRENCH: Self = Self(Cow::Borrowed("fr"));

    pub fn new<T>(tag: T) -> Self
    where
        T: Into<Cow<'static, str>>,
    {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::ENGLISH
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provides translated strings for translation keys.
pub trait Translations: Send + Sync {
    /// Returns the raw template stored for `key`, if any.
    fn get(&self, key: &str, locale: &Locale) -> Option<String>;

    /// Returns the translation of `key` with `{0}`, `{1}`, ... replaced by
    /// `replacements`. Unknown keys translate to the key itself.
    fn translate(&self, key: &str, locale: &Locale, replacements: &[&str]) -> String {
        let template = self.get(key, locale).unwrap_or_else(|| key.to_owned());
        replace(&template, replacements)
    }

    fn has_key(&self, key: &str, locale: &Locale) -> bool {
        self.get(key, locale).is_some()
    }
}

/// Substitutes positional `{n}` placeholders in `template`.
///
/// Replacements are inserted verbatim: placeholders inside a replacement are
/// left alone. Placeholders without a replacement are kept as they are.
pub fn replace(template: &str, replacements: &[&str]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        output.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let replacement = after.find('}').and_then(|end| {
            let index: usize = after[..end].parse().ok()?;
            replacements.get(index).map(|r| (*r, end))
        });

        match replacement {
            Some((replacement, end)) => {
                output.push_str(replacement);
                rest = &after[end + 1..];
            }
            None => {
                output.push('{');
                rest = after;
            }
        }
    }

    output.push_str(rest);
    output
}

/// The strings used by the framework itself.
const BUILTIN: &[(&str, &str)] = &[
    ("argumentParser.error.missingArgument", "Missing required argument: `{0}`"),
    ("argumentParser.error.invalidValue", "Invalid value for argument `{0}`: {1}"),
    ("argumentParser.error.unexpectedArgument", "Unexpected argument: `{0}`"),
    ("checks.error.failed", "You are not allowed to use this command here."),
    ("commands.error.guildOnly", "This command can only be used in guilds."),
    ("commands.error.internal", "An error occurred while running this command."),
    ("commands.error.usage", "**Usage:** `{0}`"),
    ("commands.error.lookupFailed", "Unable to look that up right now, please try again later."),
    ("converters.boolean.signatureType", "yes/no"),
    ("converters.boolean.error.invalid", "Value `{0}` is not a valid yes/no answer."),
    ("converters.channel.signatureType", "channel"),
    ("converters.channel.error.invalid", "Value `{0}` is not a valid channel ID."),
    ("converters.channel.error.missing", "Unable to find channel: {0}"),
    ("converters.choice.signatureType", "choice"),
    ("converters.choice.error.invalid", "Value `{0}` must be one of: {1}"),
    ("converters.decimal.signatureType", "decimal"),
    ("converters.decimal.error.invalid", "Value `{0}` is not a valid decimal."),
    ("converters.duration.signatureType", "duration"),
    ("converters.duration.error.invalid", "Value `{0}` is not a valid duration."),
    ("converters.guild.signatureType", "server"),
    ("converters.guild.error.missing", "Unable to find server: {0}"),
    ("converters.member.signatureType", "member"),
    ("converters.member.error.invalid", "Value `{0}` is not a valid member ID."),
    ("converters.member.error.missing", "Unable to find member: {0}"),
    ("converters.number.signatureType", "number"),
    ("converters.number.error.invalid", "Value `{0}` is not a valid number."),
    ("converters.number.error.invalid.base", "Value `{0}` is not a valid base-{1} number."),
    ("converters.regex.signatureType", "regex"),
    ("converters.regex.error.invalid", "Value `{0}` is not a valid regular expression."),
    ("converters.role.signatureType", "role"),
    ("converters.role.error.invalid", "Value `{0}` is not a valid role ID."),
    ("converters.role.error.missing", "Unable to find role: {0}"),
    ("converters.string.signatureType", "text"),
    ("converters.string.error.tooLong", "Value must be at most {0} characters long."),
    ("converters.user.signatureType", "user"),
    ("converters.user.error.invalid", "Value `{0}` is not a valid user ID."),
    ("converters.user.error.missing", "Unable to find user: {0}"),
    ("extensions.help.commandList.title", "Commands"),
    ("extensions.help.commandList.empty", "No commands available."),
    ("extensions.help.commandList.footer", "Use {0}help <command> to get more details about a command."),
    ("extensions.help.error.missingCommand", "Unknown command: `{0}`"),
    ("extensions.help.field.aliases", "Aliases"),
    ("extensions.help.field.subCommands", "Sub-Commands"),
    ("extensions.help.field.usage", "Usage"),
];

/// The default [`Translations`] provider.
///
/// Lookups check the strings registered for the requested locale, then the
/// ones registered for the default locale, then the framework's own English
/// strings.
#[derive(Clone, Debug, Default)]
pub struct DefaultTranslations {
    default_locale: Locale,
    strings: HashMap<Locale, HashMap<String, String>>,
}

impl DefaultTranslations {
    pub fn new(default_locale: Locale) -> Self {
        Self {
            default_locale,
            strings: HashMap::new(),
        }
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Registers or overrides a single string for `locale`.
    pub fn insert<K, V>(&mut self, locale: Locale, key: K, value: V) -> &mut Self
    where
        K: ToString,
        V: ToString,
    {
        self.strings
            .entry(locale)
            .or_default()
            .insert(key.to_string(), value.to_string());
        self
    }

    fn lookup(&self, key: &str, locale: &Locale) -> Option<&String> {
        self.strings.get(locale)?.get(key)
    }
}

impl Translations for DefaultTranslations {
    fn get(&self, key: &str, locale: &Locale) -> Option<String> {
        self.lookup(key, locale)
            .or_else(|| self.lookup(key, &self.default_locale))
            .cloned()
            .or_else(|| {
                BUILTIN
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, v)| (*v).to_owned())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{replace, DefaultTranslations, Locale, Translations};

    #[test]
    fn test_replace() {
        assert_eq!(replace("{0} and {1}", &["a", "b"]), "a and b");
        assert_eq!(replace("{0}{0}", &["x"]), "xx");
        assert_eq!(replace("no placeholders", &["x"]), "no placeholders");
        assert_eq!(replace("{0} {1}", &["a"]), "a {1}");
        assert_eq!(
            replace("Value `{0}` is not a valid base-{1} number.", &["{1}", "16"]),
            "Value `{1}` is not a valid base-16 number."
        );
    }

    #[test]
    fn test_default_translations() {
        let mut translations = DefaultTranslations::new(Locale::ENGLISH);
        translations.insert(Locale::GERMAN, "converters.user.error.missing", "Nutzer nicht gefunden: {0}");

        assert_eq!(
            translations.translate("converters.user.error.missing", &Locale::ENGLISH, &["bob"]),
            "Unable to find user: bob"
        );
        assert_eq!(
            translations.translate("converters.user.error.missing", &Locale::GERMAN, &["bob"]),
            "Nutzer nicht gefunden: bob"
        );
        // Missing german strings fall back to the builtin ones.
        assert_eq!(
            translations.translate("converters.role.signatureType", &Locale::GERMAN, &[]),
            "role"
        );
        assert_eq!(
            translations.translate("unknown.key", &Locale::ENGLISH, &[]),
            "unknown.key"
        );
        assert!(!translations.has_key("unknown.key", &Locale::ENGLISH));
    }

    #[test]
    fn test_default_locale_override() {
        let mut translations = DefaultTranslations::new(Locale::FRENCH);
        translations.insert(Locale::FRENCH, "commands.error.guildOnly", "Serveurs uniquement.");

        assert_eq!(
            translations.translate("commands.error.guildOnly", &Locale::new("es"), &[]),
            "Serveurs uniquement."
        );
    }
}
