use crate::error::{Error, Result};

use extbot::model::{Channel, ChannelId, Guild, GuildId, Member, Role, RoleId, User, UserId};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serenity::cache::Cache;
use serenity::http::error::Error as HttpError;
use serenity::http::Http;

use std::collections::HashMap;
use std::sync::Arc;

/// Where entity lookups are served from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupplyStrategy {
    /// Only the cache. Entities missing from the cache are not found.
    Cache,
    /// Always ask the REST api.
    Rest,
    /// Ask the cache first and the REST api when the cache misses.
    CacheWithRestFallback,
    /// Like [`CacheWithRestFallback`], storing REST results in the cache.
    /// serenity already caches REST results itself, so both behave the same.
    ///
    /// [`CacheWithRestFallback`]: Self::CacheWithRestFallback
    CacheWithCachingRestFallback,
}

impl SupplyStrategy {
    pub fn uses_cache(&self) -> bool {
        !matches!(self, Self::Rest)
    }

    pub fn uses_rest(&self) -> bool {
        !matches!(self, Self::Cache)
    }
}

impl Default for SupplyStrategy {
    fn default() -> Self {
        Self::CacheWithRestFallback
    }
}

/// Resolves Discord entities by id.
///
/// Lookups of unknown entities return `Ok(None)`. Errors are reserved for
/// failures of the underlying source.
#[async_trait]
pub trait EntitySupplier: Send + Sync {
    async fn user(&self, id: UserId) -> Result<Option<User>>;

    async fn member(&self, guild_id: GuildId, user_id: UserId) -> Result<Option<Member>>;

    async fn role(&self, guild_id: GuildId, role_id: RoleId) -> Result<Option<Role>>;

    /// Returns all roles of a guild.
    async fn roles(&self, guild_id: GuildId) -> Result<Vec<Role>>;

    async fn channel(&self, id: ChannelId) -> Result<Option<Channel>>;

    async fn guild(&self, id: GuildId) -> Result<Option<Guild>>;

    /// Returns all guilds the bot is part of.
    async fn guilds(&self) -> Result<Vec<Guild>>;

    /// Returns all users known to the supplier. Used for tag searches.
    async fn users(&self) -> Result<Vec<User>>;
}

/// An [`EntitySupplier`] backed by in-memory maps.
#[derive(Debug, Default)]
pub struct MemorySupplier {
    users: RwLock<HashMap<UserId, User>>,
    members: RwLock<HashMap<(GuildId, UserId), Member>>,
    roles: RwLock<HashMap<RoleId, Role>>,
    channels: RwLock<HashMap<ChannelId, Channel>>,
    guilds: RwLock<HashMap<GuildId, Guild>>,
}

impl MemorySupplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: User) {
        self.users.write().insert(user.id, user);
    }

    /// Inserts a member. The member's user is inserted too.
    pub fn insert_member(&self, member: Member) {
        self.insert_user(member.user.clone());

        self.members
            .write()
            .insert((member.guild_id, member.user.id), member);
    }

    pub fn insert_role(&self, role: Role) {
        self.roles.write().insert(role.id, role);
    }

    pub fn insert_channel(&self, channel: Channel) {
        self.channels.write().insert(channel.id, channel);
    }

    pub fn insert_guild(&self, guild: Guild) {
        self.guilds.write().insert(guild.id, guild);
    }
}

#[async_trait]
impl EntitySupplier for MemorySupplier {
    async fn user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn member(&self, guild_id: GuildId, user_id: UserId) -> Result<Option<Member>> {
        Ok(self.members.read().get(&(guild_id, user_id)).cloned())
    }

    async fn role(&self, guild_id: GuildId, role_id: RoleId) -> Result<Option<Role>> {
        Ok(self
            .roles
            .read()
            .get(&role_id)
            .filter(|role| role.guild_id == guild_id)
            .cloned())
    }

    async fn roles(&self, guild_id: GuildId) -> Result<Vec<Role>> {
        Ok(self
            .roles
            .read()
            .values()
            .filter(|role| role.guild_id == guild_id)
            .cloned()
            .collect())
    }

    async fn channel(&self, id: ChannelId) -> Result<Option<Channel>> {
        Ok(self.channels.read().get(&id).cloned())
    }

    async fn guild(&self, id: GuildId) -> Result<Option<Guild>> {
        Ok(self.guilds.read().get(&id).cloned())
    }

    async fn guilds(&self) -> Result<Vec<Guild>> {
        Ok(self.guilds.read().values().cloned().collect())
    }

    async fn users(&self) -> Result<Vec<User>> {
        Ok(self.users.read().values().cloned().collect())
    }
}

/// An [`EntitySupplier`] using the serenity cache and http client.
#[derive(Clone)]
pub struct SerenitySupplier {
    cache: Arc<Cache>,
    http: Arc<Http>,
    strategy: SupplyStrategy,
}

impl SerenitySupplier {
    pub fn new(cache: Arc<Cache>, http: Arc<Http>, strategy: SupplyStrategy) -> Self {
        Self {
            cache,
            http,
            strategy,
        }
    }

    pub fn strategy(&self) -> SupplyStrategy {
        self.strategy
    }
}

/// Returns `true` if `err` is a 404 response.
fn is_not_found(err: &serenity::Error) -> bool {
    match err {
        serenity::Error::Http(err) => match &**err {
            HttpError::UnsuccessfulRequest(resp) => resp.status_code.as_u16() == 404,
            _ => false,
        },
        _ => false,
    }
}

/// Maps a REST response into an optional entity, treating 404 as `None`.
fn found<T, U>(res: serenity::Result<T>) -> Result<Option<U>>
where
    U: From<T>,
{
    match res {
        Ok(val) => Ok(Some(val.into())),
        Err(err) if is_not_found(&err) => Ok(None),
        Err(err) => Err(Error::Client(err)),
    }
}

#[async_trait]
impl EntitySupplier for SerenitySupplier {
    async fn user(&self, id: UserId) -> Result<Option<User>> {
        if self.strategy.uses_cache() {
            if let Some(user) = self.cache.user(id.0) {
                return Ok(Some(user.into()));
            }
        }

        if self.strategy.uses_rest() {
            return found(self.http.get_user(id.0).await);
        }

        Ok(None)
    }

    async fn member(&self, guild_id: GuildId, user_id: UserId) -> Result<Option<Member>> {
        if self.strategy.uses_cache() {
            if let Some(member) = self.cache.member(guild_id.0, user_id.0) {
                return Ok(Some(member.into()));
            }
        }

        if self.strategy.uses_rest() {
            return found(self.http.get_member(guild_id.0, user_id.0).await);
        }

        Ok(None)
    }

    async fn role(&self, guild_id: GuildId, role_id: RoleId) -> Result<Option<Role>> {
        if self.strategy.uses_cache() {
            if let Some(role) = self.cache.role(guild_id.0, role_id.0) {
                return Ok(Some(role.into()));
            }
        }

        if self.strategy.uses_rest() {
            let roles = self.roles(guild_id).await?;
            return Ok(roles.into_iter().find(|role| role.id == role_id));
        }

        Ok(None)
    }

    async fn roles(&self, guild_id: GuildId) -> Result<Vec<Role>> {
        if self.strategy.uses_cache() {
            if let Some(roles) = self.cache.guild_roles(guild_id.0) {
                return Ok(roles.into_values().map(Role::from).collect());
            }
        }

        if self.strategy.uses_rest() {
            return match self.http.get_guild_roles(guild_id.0).await {
                Ok(roles) => Ok(roles.into_iter().map(Role::from).collect()),
                Err(err) if is_not_found(&err) => Ok(Vec::new()),
                Err(err) => Err(err.into()),
            };
        }

        Ok(Vec::new())
    }

    async fn channel(&self, id: ChannelId) -> Result<Option<Channel>> {
        if self.strategy.uses_cache() {
            if let Some(channel) = self.cache.channel(id.0) {
                return Ok(Some(channel.into()));
            }
        }

        if self.strategy.uses_rest() {
            return found(self.http.get_channel(id.0).await);
        }

        Ok(None)
    }

    async fn guild(&self, id: GuildId) -> Result<Option<Guild>> {
        if self.strategy.uses_cache() {
            if let Some(guild) = self.cache.guild(id.0) {
                return Ok(Some(guild.into()));
            }
        }

        if self.strategy.uses_rest() {
            return found(self.http.get_guild(id.0).await);
        }

        Ok(None)
    }

    async fn guilds(&self) -> Result<Vec<Guild>> {
        if self.strategy.uses_cache() {
            let guilds: Vec<Guild> = self
                .cache
                .guilds()
                .into_iter()
                .filter_map(|id| self.cache.guild(id))
                .map(Guild::from)
                .collect();

            if !guilds.is_empty() || !self.strategy.uses_rest() {
                return Ok(guilds);
            }
        }

        let guilds = self.http.get_guilds(None, None).await?;

        Ok(guilds
            .into_iter()
            .map(|info| Guild {
                id: info.id.into(),
                name: info.name,
            })
            .collect())
    }

    async fn users(&self) -> Result<Vec<User>> {
        if !self.strategy.uses_cache() {
            return Ok(Vec::new());
        }

        Ok(self
            .cache
            .users()
            .iter()
            .map(|entry| User::from(entry.value().clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{EntitySupplier, MemorySupplier, SupplyStrategy};

    use extbot::model::{Guild, GuildId, Member, Role, RoleId, User, UserId};

    fn user(id: u64, name: &str) -> User {
        User {
            id: UserId(id),
            bot: false,
            discriminator: 1,
            name: name.to_owned(),
        }
    }

    #[test]
    fn test_supply_strategy() {
        assert_eq!(SupplyStrategy::default(), SupplyStrategy::CacheWithRestFallback);

        assert!(SupplyStrategy::Cache.uses_cache());
        assert!(!SupplyStrategy::Cache.uses_rest());
        assert!(!SupplyStrategy::Rest.uses_cache());
        assert!(SupplyStrategy::Rest.uses_rest());
        assert!(SupplyStrategy::CacheWithCachingRestFallback.uses_cache());
        assert!(SupplyStrategy::CacheWithCachingRestFallback.uses_rest());
    }

    #[tokio::test]
    async fn test_memory_supplier() {
        let supplier = MemorySupplier::new();
        supplier.insert_member(Member {
            guild_id: GuildId(1),
            user: user(2, "alice"),
            nick: None,
            roles: Vec::new(),
        });
        supplier.insert_role(Role {
            id: RoleId(3),
            guild_id: GuildId(1),
            name: String::from("Admin"),
        });
        supplier.insert_guild(Guild {
            id: GuildId(1),
            name: String::from("Home"),
        });

        assert_eq!(supplier.user(UserId(2)).await.unwrap().unwrap().name, "alice");
        assert!(supplier.user(UserId(4)).await.unwrap().is_none());
        assert!(supplier.member(GuildId(1), UserId(2)).await.unwrap().is_some());
        assert!(supplier.member(GuildId(5), UserId(2)).await.unwrap().is_none());

        assert!(supplier.role(GuildId(1), RoleId(3)).await.unwrap().is_some());
        assert!(supplier.role(GuildId(5), RoleId(3)).await.unwrap().is_none());
        assert_eq!(supplier.roles(GuildId(1)).await.unwrap().len(), 1);

        assert_eq!(supplier.guilds().await.unwrap().len(), 1);
        assert_eq!(supplier.users().await.unwrap().len(), 1);
    }
}
