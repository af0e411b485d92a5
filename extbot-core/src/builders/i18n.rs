use extbot::i18n::{DefaultTranslations, Locale, Translations};
use extbot::model::{ChannelId, GuildId, UserId};

use futures::future::BoxFuture;

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Picks the locale for an invocation in a guild, channel and by a user.
pub type LocaleResolver =
    Arc<dyn Fn(Option<GuildId>, ChannelId, UserId) -> BoxFuture<'static, Option<Locale>> + Send + Sync>;

#[derive(Clone)]
pub struct I18nBuilder {
    pub(crate) default_locale: Locale,
    pub(crate) resolvers: Vec<LocaleResolver>,
    pub(crate) interaction_user_locale: bool,
    pub(crate) translations: Option<Arc<dyn Translations>>,
}

impl I18nBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_locale(&mut self, locale: Locale) -> &mut Self {
        self.default_locale = locale;
        self
    }

    /// Adds a resolver. Resolvers run in the order they were added, the
    /// first locale returned is used.
    pub fn locale_resolver<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(Option<GuildId>, ChannelId, UserId) -> BoxFuture<'static, Option<Locale>>
            + Send
            + Sync
            + 'static,
    {
        self.resolvers.push(Arc::new(f));
        self
    }

    /// Uses the locale of the invoking user's Discord client for slash
    /// commands when no resolver returned a locale.
    pub fn interaction_user_locale(&mut self, enabled: bool) -> &mut Self {
        self.interaction_user_locale = enabled;
        self
    }

    /// Replaces the default translations provider.
    pub fn translations<T>(&mut self, translations: T) -> &mut Self
    where
        T: Translations + 'static,
    {
        self.translations = Some(Arc::new(translations));
        self
    }

    pub(crate) fn build_translations(&self) -> Arc<dyn Translations> {
        match &self.translations {
            Some(translations) => translations.clone(),
            None => Arc::new(DefaultTranslations::new(self.default_locale.clone())),
        }
    }

    /// Resolves the locale of an invocation. `user_locale` is the locale
    /// reported by the user's client, if any.
    pub(crate) async fn resolve(
        &self,
        guild_id: Option<GuildId>,
        channel_id: ChannelId,
        user_id: UserId,
        user_locale: Option<&str>,
    ) -> Locale {
        for resolver in &self.resolvers {
            if let Some(locale) = resolver(guild_id, channel_id, user_id).await {
                return locale;
            }
        }

        match user_locale {
            Some(locale) if self.interaction_user_locale => {
                // Discord reports regional tags such as `en-US`.
                let language = locale.split('-').next().unwrap_or(locale);
                Locale::new(language.to_owned())
            }
            _ => self.default_locale.clone(),
        }
    }
}

impl Default for I18nBuilder {
    fn default() -> Self {
        Self {
            default_locale: Locale::ENGLISH,
            resolvers: Vec::new(),
            interaction_user_locale: false,
            translations: None,
        }
    }
}

impl Debug for I18nBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("I18nBuilder")
            .field("default_locale", &self.default_locale)
            .field("resolvers", &self.resolvers.len())
            .field("interaction_user_locale", &self.interaction_user_locale)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::I18nBuilder;

    use extbot::i18n::Locale;
    use extbot::model::{ChannelId, GuildId, UserId};

    use futures::FutureExt;

    #[tokio::test]
    async fn test_resolve() {
        let mut i18n = I18nBuilder::new();
        i18n.default_locale(Locale::FRENCH);

        let resolve = |i18n: &I18nBuilder, guild_id: Option<u64>, hint: Option<&'static str>| {
            let i18n = i18n.clone();
            async move {
                i18n.resolve(guild_id.map(GuildId), ChannelId(1), UserId(2), hint)
                    .await
            }
        };

        assert_eq!(resolve(&i18n, None, Some("de")).await, Locale::FRENCH);

        i18n.interaction_user_locale(true);
        assert_eq!(resolve(&i18n, None, Some("en-US")).await, Locale::ENGLISH);

        i18n.locale_resolver(|guild_id, _, _| {
            async move { guild_id.map(|_| Locale::GERMAN) }.boxed()
        });
        assert_eq!(resolve(&i18n, Some(5), None).await, Locale::GERMAN);
        assert_eq!(resolve(&i18n, None, None).await, Locale::FRENCH);
    }

    #[test]
    fn test_build_translations() {
        let i18n = I18nBuilder::new();
        let translations = i18n.build_translations();

        assert_eq!(
            translations.translate("commands.error.usage", &Locale::ENGLISH, &["!ping"]),
            "**Usage:** `!ping`"
        );
    }
}
