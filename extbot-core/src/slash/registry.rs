use super::{ApplicationCommand, LoadedSlashCommand};
use crate::error::{Error, Result};
use crate::extension::ExtensionId;

use extbot::model::GuildId;

use parking_lot::RwLock;
use serenity::http::Http;
use serenity::model::application::command::Command;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

#[derive(Debug, Default)]
struct InnerSlashCommandRegistry {
    commands: RwLock<Vec<LoadedSlashCommand>>,
    default_guild: Option<GuildId>,
    /// Guilds commands were registered in by an earlier sync.
    synced_guilds: RwLock<BTreeSet<GuildId>>,
}

/// All loaded slash commands.
///
/// A command is registered in its own guild, else in the default guild,
/// else globally. Names are unique per registration target.
#[derive(Clone, Debug, Default)]
pub struct SlashCommandRegistry {
    inner: Arc<InnerSlashCommandRegistry>,
}

impl SlashCommandRegistry {
    pub fn new(default_guild: Option<GuildId>) -> Self {
        Self {
            inner: Arc::new(InnerSlashCommandRegistry {
                commands: RwLock::default(),
                default_guild,
                synced_guilds: RwLock::default(),
            }),
        }
    }

    /// Returns the guild `command` is registered in, `None` if it is a
    /// global command.
    pub fn target(&self, command: &LoadedSlashCommand) -> Option<GuildId> {
        command.guild.or(self.inner.default_guild)
    }

    pub fn add(&self, command: LoadedSlashCommand) -> Result {
        let mut commands = self.inner.commands.write();
        let target = self.target(&command);

        if commands
            .iter()
            .any(|cmd| cmd.name == command.name && self.target(cmd) == target)
        {
            return Err(Error::DuplicateName(command.name));
        }

        commands.push(command);
        Ok(())
    }

    /// Removes the command `name` registered in `guild_id`, or globally if
    /// `guild_id` is `None`.
    pub fn remove(&self, name: &str, guild_id: Option<GuildId>) -> Result {
        let mut commands = self.inner.commands.write();

        let index = commands
            .iter()
            .position(|cmd| cmd.name == name && self.target(cmd) == guild_id)
            .ok_or_else(|| Error::InvalidPath(name.to_owned()))?;

        commands.remove(index);
        Ok(())
    }

    pub fn remove_extension(&self, id: ExtensionId) {
        self.inner
            .commands
            .write()
            .retain(|cmd| cmd.extension != Some(id));
    }

    /// Finds the command an interaction in `guild_id` refers to. Commands of
    /// the guild take precedence over global ones.
    pub fn find(&self, name: &str, guild_id: Option<GuildId>) -> Option<LoadedSlashCommand> {
        let commands = self.inner.commands.read();

        let find = |target: Option<GuildId>| {
            commands
                .iter()
                .find(|cmd| cmd.name == name && self.target(cmd) == target)
        };

        guild_id
            .and_then(|guild_id| find(Some(guild_id)))
            .or_else(|| find(None))
            .cloned()
    }

    pub fn list(&self) -> Vec<LoadedSlashCommand> {
        self.inner.commands.read().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.commands.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.commands.read().is_empty()
    }

    /// Returns the command payloads by registration target, `None` being
    /// global.
    pub fn grouped(&self) -> BTreeMap<Option<GuildId>, Vec<ApplicationCommand>> {
        let commands = self.inner.commands.read();
        let mut grouped: BTreeMap<_, Vec<_>> = BTreeMap::new();

        for command in commands.iter() {
            grouped
                .entry(self.target(command))
                .or_default()
                .push(command.to_application_command());
        }

        grouped
    }

    /// Returns the commands every target has to be overwritten with.
    ///
    /// Global commands and guilds synced before are always included, with an
    /// empty list once they have no commands left, so stale registrations
    /// are cleared.
    pub fn sync_plan(&self) -> BTreeMap<Option<GuildId>, Vec<ApplicationCommand>> {
        let mut plan = self.grouped();

        plan.entry(None).or_default();
        for guild_id in self.inner.synced_guilds.read().iter() {
            plan.entry(Some(*guild_id)).or_default();
        }

        plan
    }

    /// Overwrites the registered commands of every target with the loaded
    /// ones.
    pub async fn sync(&self, http: &Http) -> Result {
        for (target, commands) in self.sync_plan() {
            let count = commands.len();
            let builders: Vec<_> = commands.iter().map(|cmd| cmd.to_builder()).collect();

            match target {
                Some(guild_id) => {
                    serenity::model::id::GuildId::from(guild_id)
                        .set_application_commands(http, |cmds| {
                            for builder in builders {
                                cmds.add_application_command(builder);
                            }
                            cmds
                        })
                        .await?;

                    if count == 0 {
                        self.inner.synced_guilds.write().remove(&guild_id);
                    } else {
                        self.inner.synced_guilds.write().insert(guild_id);
                    }

                    log::info!(
                        "[CORE] Registered {} slash commands in guild {}",
                        count,
                        guild_id
                    );
                }
                None => {
                    Command::set_global_application_commands(http, |cmds| {
                        for builder in builders {
                            cmds.add_application_command(builder);
                        }
                        cmds
                    })
                    .await?;

                    log::info!("[CORE] Registered {} global slash commands", count);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SlashCommandRegistry;
    use crate::error::Error;
    use crate::extension::ExtensionId;
    use crate::slash::{LoadedSlashCommand, SlashCommand};

    use extbot::model::GuildId;

    fn command(name: &str, guild: Option<u64>) -> LoadedSlashCommand {
        let mut cmd = SlashCommand::<()>::new();
        cmd.name(name).description("Test").action(|_| async { Ok(()) });
        if let Some(guild) = guild {
            cmd.guild(GuildId(guild));
        }
        cmd.load().unwrap()
    }

    #[test]
    fn test_add() {
        let registry = SlashCommandRegistry::new(None);
        registry.add(command("ping", None)).unwrap();
        registry.add(command("ping", Some(1))).unwrap();

        assert!(matches!(
            registry.add(command("ping", None)),
            Err(Error::DuplicateName(name)) if name == "ping"
        ));
        assert_eq!(registry.len(), 2);

        registry.remove("ping", Some(GuildId(1))).unwrap();
        assert!(registry.remove("ping", Some(GuildId(1))).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_default_guild() {
        let registry = SlashCommandRegistry::new(Some(GuildId(9)));
        registry.add(command("ping", None)).unwrap();
        registry.add(command("pong", Some(2))).unwrap();

        let grouped = registry.grouped();
        assert!(grouped.get(&None).is_none());
        assert_eq!(grouped[&Some(GuildId(9))][0].name, "ping");
        assert_eq!(grouped[&Some(GuildId(2))][0].name, "pong");

        assert!(registry.find("ping", Some(GuildId(9))).is_some());
        assert!(registry.find("ping", Some(GuildId(2))).is_none());
    }

    #[test]
    fn test_sync_plan() {
        let registry = SlashCommandRegistry::new(Some(GuildId(1)));
        registry.add(command("ping", None)).unwrap();

        let plan = registry.sync_plan();
        assert!(plan[&None].is_empty());
        assert_eq!(plan[&Some(GuildId(1))][0].name, "ping");

        registry.inner.synced_guilds.write().insert(GuildId(1));
        registry.remove("ping", Some(GuildId(1))).unwrap();

        let plan = registry.sync_plan();
        assert_eq!(plan.len(), 2);
        assert!(plan[&None].is_empty());
        assert!(plan[&Some(GuildId(1))].is_empty());
    }

    #[test]
    fn test_find() {
        let registry = SlashCommandRegistry::new(None);
        registry.add(command("ping", None)).unwrap();

        let mut local = command("ping", Some(1));
        local.description = String::from("Local");
        registry.add(local).unwrap();

        assert_eq!(registry.find("ping", Some(GuildId(1))).unwrap().description, "Local");
        assert_eq!(registry.find("ping", Some(GuildId(2))).unwrap().description, "Test");
        assert_eq!(registry.find("ping", None).unwrap().description, "Test");
        assert!(registry.find("pong", None).is_none());
    }

    #[test]
    fn test_remove_extension() {
        let registry = SlashCommandRegistry::new(None);

        let mut owned = command("owned", None);
        owned.set_extension(Some(ExtensionId(1)));
        registry.add(owned).unwrap();
        registry.add(command("free", None)).unwrap();

        registry.remove_extension(ExtensionId(1));
        assert_eq!(registry.list()[0].name, "free");
        assert_eq!(registry.len(), 1);
    }
}
