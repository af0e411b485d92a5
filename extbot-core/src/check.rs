//! Checks are async predicates deciding whether a command may run for an
//! event. All checks of a command must pass; they run in the order they
//! were added and stop at the first failure.
use crate::error::Result;
use crate::slash::interaction::SlashInteraction;
use crate::supplier::EntitySupplier;

use extbot::model::{ChannelId, GuildId, Member, Message, RoleId, User, UserId};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};

use std::sync::Arc;

pub type Check<E> = Arc<dyn for<'a> Fn(&'a E) -> BoxFuture<'a, bool> + Send + Sync>;

/// Creates a [`Check`] from an async closure.
pub fn check<E, F>(f: F) -> Check<E>
where
    F: for<'a> Fn(&'a E) -> BoxFuture<'a, bool> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Creates a [`Check`] from a synchronous predicate.
pub fn predicate<E, F>(f: F) -> Check<E>
where
    E: 'static,
    F: Fn(&E) -> bool + Send + Sync + 'static,
{
    check(move |event: &E| {
        let res = f(event);
        async move { res }.boxed()
    })
}

/// Runs `checks` in order. Returns `false` as soon as one check fails.
pub async fn run_checks<E>(checks: &[Check<E>], event: &E) -> bool {
    for check in checks {
        if !check(event).await {
            return false;
        }
    }

    true
}

/// An event checks can be run against.
#[async_trait]
pub trait CheckEvent: Send + Sync + 'static {
    fn guild_id(&self) -> Option<GuildId>;

    fn channel_id(&self) -> ChannelId;

    fn author(&self) -> &User;

    fn supplier(&self) -> &dyn EntitySupplier;

    /// Returns the author as a member of the event's guild.
    async fn member(&self) -> Result<Option<Member>> {
        match self.guild_id() {
            Some(guild_id) => self.supplier().member(guild_id, self.author().id).await,
            None => Ok(None),
        }
    }
}

/// A message was created.
#[derive(Clone)]
pub struct MessageCreateEvent {
    pub message: Message,
    pub supplier: Arc<dyn EntitySupplier>,
}

impl CheckEvent for MessageCreateEvent {
    fn guild_id(&self) -> Option<GuildId> {
        self.message.guild_id
    }

    fn channel_id(&self) -> ChannelId {
        self.message.channel_id
    }

    fn author(&self) -> &User {
        &self.message.author
    }

    fn supplier(&self) -> &dyn EntitySupplier {
        &*self.supplier
    }
}

/// A slash command was invoked.
#[derive(Clone)]
pub struct InteractionCreateEvent {
    pub interaction: SlashInteraction,
    pub supplier: Arc<dyn EntitySupplier>,
}

impl CheckEvent for InteractionCreateEvent {
    fn guild_id(&self) -> Option<GuildId> {
        self.interaction.guild_id
    }

    fn channel_id(&self) -> ChannelId {
        self.interaction.channel_id
    }

    fn author(&self) -> &User {
        &self.interaction.user
    }

    fn supplier(&self) -> &dyn EntitySupplier {
        &*self.supplier
    }
}

/// Passes for events from the given guild.
pub fn in_guild<E>(guild_id: GuildId) -> Check<E>
where
    E: CheckEvent,
{
    predicate(move |event: &E| event.guild_id() == Some(guild_id))
}

/// Passes for events from any of the given guilds.
pub fn in_any_guild_of<E>(guild_ids: Vec<GuildId>) -> Check<E>
where
    E: CheckEvent,
{
    predicate(move |event: &E| match event.guild_id() {
        Some(guild_id) => guild_ids.contains(&guild_id),
        None => false,
    })
}

/// Passes for events outside of guilds.
pub fn in_dm<E>() -> Check<E>
where
    E: CheckEvent,
{
    predicate(|event: &E| event.guild_id().is_none())
}

pub fn in_channel<E>(channel_id: ChannelId) -> Check<E>
where
    E: CheckEvent,
{
    predicate(move |event: &E| event.channel_id() == channel_id)
}

pub fn not_bot<E>() -> Check<E>
where
    E: CheckEvent,
{
    predicate(|event: &E| !event.author().bot)
}

pub fn is_user<E>(user_id: UserId) -> Check<E>
where
    E: CheckEvent,
{
    predicate(move |event: &E| event.author().id == user_id)
}

/// Passes if the author has the role in the event's guild. Lookup failures
/// fail the check.
pub fn has_role<E>(role_id: RoleId) -> Check<E>
where
    E: CheckEvent,
{
    check(move |event: &E| {
        async move {
            match event.member().await {
                Ok(Some(member)) => member.has_role(role_id),
                Ok(None) => false,
                Err(err) => {
                    log::warn!("[CHECK] Failed to fetch member: {}", err);
                    false
                }
            }
        }
        .boxed()
    })
}

/// Passes if all `checks` pass.
pub fn all<E>(checks: Vec<Check<E>>) -> Check<E>
where
    E: CheckEvent,
{
    check(move |event: &E| {
        let checks = checks.clone();
        async move { run_checks(&checks, event).await }.boxed()
    })
}

/// Passes if any of `checks` passes. An empty list never passes.
pub fn any<E>(checks: Vec<Check<E>>) -> Check<E>
where
    E: CheckEvent,
{
    check(move |event: &E| {
        let checks = checks.clone();
        async move {
            for check in checks {
                if check(event).await {
                    return true;
                }
            }

            false
        }
        .boxed()
    })
}

pub fn not<E>(inner: Check<E>) -> Check<E>
where
    E: CheckEvent,
{
    check(move |event: &E| {
        let inner = inner.clone();
        async move { !inner(event).await }.boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::{
        all, any, check, has_role, in_dm, in_guild, is_user, not, not_bot, run_checks,
        MessageCreateEvent,
    };
    use crate::supplier::MemorySupplier;

    use extbot::model::{ChannelId, GuildId, Member, Message, MessageId, RoleId, User, UserId};
    use futures::FutureExt;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn event(guild_id: Option<GuildId>, supplier: MemorySupplier) -> MessageCreateEvent {
        MessageCreateEvent {
            message: Message {
                id: MessageId(10),
                channel_id: ChannelId(20),
                guild_id,
                author: User {
                    id: UserId(1),
                    bot: false,
                    discriminator: 1,
                    name: String::from("alice"),
                },
                content: String::from("!ping"),
            },
            supplier: Arc::new(supplier),
        }
    }

    #[tokio::test]
    async fn test_run_checks_short_circuit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let checks = vec![
            in_guild(GuildId(1)),
            check(move |_: &MessageCreateEvent| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { true }.boxed()
            }),
        ];

        let event = event(None, MemorySupplier::new());
        assert!(!run_checks(&checks, &event).await);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(run_checks(&[], &event).await);
    }

    #[tokio::test]
    async fn test_bundled_checks() {
        let event = event(Some(GuildId(1)), MemorySupplier::new());

        assert!(in_guild(GuildId(1))(&event).await);
        assert!(!in_guild(GuildId(2))(&event).await);
        assert!(!in_dm()(&event).await);
        assert!(not_bot()(&event).await);
        assert!(is_user(UserId(1))(&event).await);

        assert!(all(vec![not_bot(), is_user(UserId(1))])(&event).await);
        assert!(!all(vec![not_bot(), in_dm()])(&event).await);
        assert!(any(vec![in_dm(), not_bot()])(&event).await);
        assert!(!any::<MessageCreateEvent>(vec![])(&event).await);
        assert!(not(in_dm())(&event).await);
    }

    #[tokio::test]
    async fn test_has_role() {
        let supplier = MemorySupplier::new();
        supplier.insert_member(Member {
            guild_id: GuildId(1),
            user: User {
                id: UserId(1),
                bot: false,
                discriminator: 1,
                name: String::from("alice"),
            },
            nick: None,
            roles: vec![RoleId(5)],
        });

        let event = event(Some(GuildId(1)), supplier);
        assert!(has_role(RoleId(5))(&event).await);
        assert!(!has_role(RoleId(6))(&event).await);
    }
}
