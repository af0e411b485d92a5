use crate::command::LoadedCommand;

use extbot::arguments::ArgumentsExt;

use std::collections::HashSet;

/// Returns the command called `name` or having `name` as an alias.
/// Names are matched ignoring case.
pub fn lookup<'life0>(
    commands: &'life0 HashSet<LoadedCommand>,
    name: &str,
) -> Option<&'life0 LoadedCommand> {
    let name = name.to_lowercase();

    commands
        .get(name.as_str())
        .or_else(|| commands.iter().find(|cmd| cmd.aliases.contains(&name)))
}

/// Finds the command addressed by the leading `args`, descending into sub
/// commands as long as the next argument names one. Consumes the arguments
/// forming the command path.
pub fn find_command<'life0, A>(
    commands: &'life0 HashSet<LoadedCommand>,
    args: &mut A,
) -> Option<&'life0 LoadedCommand>
where
    A: ArgumentsExt,
{
    let mut command = lookup(commands, args.peek()?)?;
    args.pop();

    while let Some(arg) = args.peek() {
        match lookup(&command.sub_commands, arg) {
            Some(cmd) => {
                command = cmd;
                args.pop();
            }
            None => break,
        }
    }

    Some(command)
}

#[cfg(test)]
mod tests {
    use super::{find_command, lookup};
    use crate::command::{LoadedCommand, MessageCommand};

    use extbot::arguments::{ArgumentsExt, CommandArguments};

    use std::collections::HashSet;

    fn command(name: &str, alias: &str, sub: Option<LoadedCommand>) -> LoadedCommand {
        let mut cmd = MessageCommand::<()>::new();
        cmd.name(name).alias(alias);

        match sub {
            Some(sub) => {
                cmd.add_sub_command(sub);
            }
            None => {
                cmd.action(|_| async { Ok(()) });
            }
        }

        cmd.load().unwrap()
    }

    #[test]
    fn test_lookup() {
        let commands: HashSet<_> = vec![command("ping", "p", None)].into_iter().collect();

        assert!(lookup(&commands, "ping").is_some());
        assert!(lookup(&commands, "PING").is_some());
        assert!(lookup(&commands, "p").is_some());
        assert!(lookup(&commands, "pong").is_none());
    }

    #[test]
    fn test_find_command() {
        let set = command("set", "s", None);
        let config = command("config", "cfg", Some(set));
        let commands: HashSet<_> = vec![config].into_iter().collect();

        let mut args: CommandArguments = vec!["cfg", "S", "value"].into_iter().collect();
        let cmd = find_command(&commands, &mut args).unwrap();
        assert_eq!(cmd.name, "set");
        assert_eq!(args.as_args(), ["value"]);
        assert_eq!(args.consumed(), ["cfg", "S"]);

        let mut args: CommandArguments = vec!["config", "value"].into_iter().collect();
        assert_eq!(find_command(&commands, &mut args).unwrap().name, "config");
        assert_eq!(args.len(), 1);

        let mut args: CommandArguments = vec!["unknown"].into_iter().collect();
        assert!(find_command(&commands, &mut args).is_none());

        let mut args = CommandArguments::new();
        assert!(find_command(&commands, &mut args).is_none());
    }
}
