use super::LoadedCommand;
use crate::error::{Error, Result};
use crate::extension::ExtensionId;
use crate::router::{find_command, lookup};

use extbot::arguments::{parse_args, ArgumentsExt};

use parking_lot::RwLock;

use std::collections::HashSet;
use std::sync::Arc;

/// All loaded message commands.
#[derive(Clone, Debug, Default)]
pub struct MessageCommandRegistry {
    inner: Arc<RwLock<HashSet<LoadedCommand>>>,
}

impl MessageCommandRegistry {
    /// Creates a new `MessageCommandRegistry` with no commands loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a single command. If `path` is `None`, the command is loaded at
    /// the top level, otherwise as a sub command of the command at `path`.
    pub fn add(&self, command: LoadedCommand, path: Option<&str>) -> Result {
        let mut commands = self.inner.write();
        let path = path.map(parse_args).unwrap_or_default();

        with_scope(&mut commands, &path, move |scope| {
            if let Some(name) = conflict(scope, &command) {
                return Err(Error::DuplicateName(name));
            }

            scope.insert(command);
            Ok(())
        })
        .unwrap_or_else(|| Err(Error::InvalidPath(path.join(" "))))
    }

    /// Removes the command called `name`. If a path is provided, the command
    /// is removed from the sub commands of the command at `path`.
    pub fn remove(&self, name: &str, path: Option<&str>) -> Result {
        let mut commands = self.inner.write();
        let path = path.map(parse_args).unwrap_or_default();

        let removed = with_scope(&mut commands, &path, |scope| {
            scope.remove(name.to_lowercase().as_str())
        });

        match removed {
            Some(true) => Ok(()),
            _ => Err(Error::InvalidPath(
                path.iter()
                    .map(String::as_str)
                    .chain(std::iter::once(name))
                    .collect::<Vec<_>>()
                    .join(" "),
            )),
        }
    }

    /// Removes every top level command registered by the extension `id`.
    pub fn remove_extension(&self, id: ExtensionId) {
        self.inner
            .write()
            .retain(|cmd| cmd.extension != Some(id));
    }

    /// Finds the command addressed by the leading arguments, consuming the
    /// command path.
    pub fn find<A>(&self, args: &mut A) -> Option<LoadedCommand>
    where
        A: ArgumentsExt,
    {
        let commands = self.inner.read();

        find_command(&commands, args).cloned()
    }

    /// Returns the command at exactly `path`, e.g. `config prefix`.
    pub fn get(&self, path: &str) -> Option<LoadedCommand> {
        let commands = self.inner.read();
        let mut names = parse_args(path).into_iter();

        let mut command = lookup(&commands, &names.next()?)?;
        for name in names {
            command = lookup(&command.sub_commands, &name)?;
        }

        Some(command.clone())
    }

    /// Returns all top level commands ordered by name.
    pub fn list(&self) -> Vec<LoadedCommand> {
        let mut commands: Vec<_> = self.inner.read().iter().cloned().collect();
        commands.sort_by(|a, b| a.name.cmp(&b.name));
        commands
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

/// Runs `f` on the sub commands of the command at `path`. Returns `None` if
/// no command exists at `path`.
fn with_scope<F, T>(scope: &mut HashSet<LoadedCommand>, path: &[String], f: F) -> Option<T>
where
    F: FnOnce(&mut HashSet<LoadedCommand>) -> T,
{
    let (first, rest) = match path.split_first() {
        Some(split) => split,
        None => return Some(f(scope)),
    };

    let name = lookup(scope, first)?.name.clone();
    // Changing the sub commands of a command does not change its hash.
    let mut parent = scope.take(name.as_str())?;
    let res = with_scope(&mut parent.sub_commands, rest, f);
    scope.insert(parent);

    res
}

/// Returns the first name or alias of `command` already taken in `scope`.
fn conflict(scope: &HashSet<LoadedCommand>, command: &LoadedCommand) -> Option<String> {
    std::iter::once(&command.name)
        .chain(command.aliases.iter())
        .find(|name| scope.iter().any(|cmd| cmd.answers_to(name)))
        .cloned()
}
