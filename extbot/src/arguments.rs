use crate::model::id::{ChannelId, RoleId, UserId};

use std::fmt::{self, Display, Formatter};
use std::iter::FromIterator;
use std::mem;
use std::ops::Deref;
use std::str::FromStr;

/// Splits `input` into arguments.
///
/// Arguments are separated by whitespace. A double-quoted run is kept as a
/// single argument with the quotes removed and `\"` produces a literal quote.
/// An unterminated quote extends to the end of the input. Empty arguments are
/// dropped.
pub fn parse_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    args.push(mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

pub trait ArgumentsExt: AsRef<[String]> {
    /// Returns the number of arguments.
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&String>;

    /// Pops and returns the first argument. Returns `None` if no
    /// arguments are avaliable.
    fn pop(&mut self) -> Option<String>;

    /// Returns `true` if no arguments are avaliable.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the first argument without consuming it.
    fn peek(&self) -> Option<&String> {
        self.get(0)
    }
}

/// A immutable view into a list of arguments.
#[derive(Copy, Clone, Debug)]
pub struct Arguments<'life0>(&'life0 [String]);

impl<'life0> Arguments<'life0> {
    pub fn new(args: &'life0 [String]) -> Self {
        Self(args)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

impl<'life0> ArgumentsExt for Arguments<'life0> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn get(&self, index: usize) -> Option<&String> {
        self.0.get(index)
    }

    fn pop(&mut self) -> Option<String> {
        let (first, rest) = self.0.split_first()?;
        self.0 = rest;
        Some(first.to_owned())
    }
}

impl<'life0> AsRef<[String]> for Arguments<'life0> {
    fn as_ref(&self) -> &[String] {
        self.0
    }
}

impl<'life0> Deref for Arguments<'life0> {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        self.0
    }
}

impl<'life0, 'life1, T> PartialEq<T> for Arguments<'life0>
where
    T: AsRef<[&'life1 str]>,
{
    fn eq(&self, other: &T) -> bool {
        self.0 == other.as_ref()
    }
}

impl<'life0> Display for Arguments<'life0> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// A consuming list of command arguments.
///
/// Popped arguments are not dropped: [`as_full_args`] still returns every
/// argument and [`consumed`] the ones that were already popped, which is
/// used to rebuild the invoked command path.
///
/// [`as_full_args`]: Self::as_full_args
/// [`consumed`]: Self::consumed
#[derive(Clone, Debug, Default)]
pub struct CommandArguments {
    args: Vec<String>,
    offset: usize,
}

impl CommandArguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view over the arguments that were not consumed yet.
    pub fn as_args(&self) -> Arguments {
        Arguments::new(self.as_ref())
    }

    /// Returns a view over all arguments, including consumed ones.
    pub fn as_full_args(&self) -> Arguments {
        Arguments::new(&self.args)
    }

    /// Returns the arguments that were already consumed.
    pub fn consumed(&self) -> &[String] {
        &self.args[..self.offset]
    }

    /// Consumes all remaining arguments and returns them joined by a single
    /// space. Returns `None` if no arguments are left.
    pub fn rest(&mut self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let rest = self.as_ref().join(" ");
        self.offset = self.args.len();
        Some(rest)
    }

    /// Removes a `--name value` pair from the remaining arguments and returns
    /// the value. A trailing `--name` without a value is left untouched.
    pub fn take_named(&mut self, name: &str) -> Option<String> {
        let flag = format!("--{}", name);

        let index = self.args[self.offset..]
            .iter()
            .position(|arg| *arg == flag)?
            + self.offset;

        if index + 1 >= self.args.len() {
            return None;
        }

        let value = self.args.remove(index + 1);
        self.args.remove(index);
        Some(value)
    }
}

impl AsRef<[String]> for CommandArguments {
    fn as_ref(&self) -> &[String] {
        &self.args[self.offset..]
    }
}

impl ArgumentsExt for CommandArguments {
    fn len(&self) -> usize {
        self.args.len() - self.offset
    }

    fn get(&self, index: usize) -> Option<&String> {
        self.args.get(index + self.offset)
    }

    fn pop(&mut self) -> Option<String> {
        let arg = self.args.get(self.offset)?.to_owned();
        self.offset += 1;
        Some(arg)
    }
}

impl<'life0, T> PartialEq<T> for CommandArguments
where
    T: AsRef<[&'life0 str]>,
{
    fn eq(&self, other: &T) -> bool {
        self.as_ref() == other.as_ref()
    }
}

impl Iterator for CommandArguments {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.pop()
    }
}

impl From<Vec<String>> for CommandArguments {
    fn from(args: Vec<String>) -> Self {
        Self { args, offset: 0 }
    }
}

impl<I> FromIterator<I> for CommandArguments
where
    I: ToString,
{
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = I>,
    {
        Self::from(
            iter.into_iter()
                .map(|item| item.to_string())
                .collect::<Vec<_>>(),
        )
    }
}

impl Display for CommandArguments {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.as_args().fmt(f)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InvalidMention;

impl Display for InvalidMention {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "invalid mention")
    }
}

impl std::error::Error for InvalidMention {}

/// Strips `prefix` and `suffix` from `s` and parses the inner snowflake.
fn parse_mention<T>(s: &str, prefix: &str) -> Result<T, InvalidMention>
where
    T: FromStr,
{
    s.strip_prefix(prefix)
        .and_then(|s| s.strip_suffix('>'))
        .ok_or(InvalidMention)?
        .parse()
        .or(Err(InvalidMention))
}

/// A channel mention with the format `<#{id}>`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChannelMention {
    pub id: ChannelId,
}

impl ChannelMention {
    pub fn new<T>(id: T) -> Self
    where
        T: Into<ChannelId>,
    {
        Self { id: id.into() }
    }
}

impl Display for ChannelMention {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<#{}>", self.id)
    }
}

impl FromStr for ChannelMention {
    type Err = InvalidMention;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            id: parse_mention(s, "<#")?,
        })
    }
}

/// A role mention with the format `<@&{id}>`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RoleMention {
    pub id: RoleId,
}

impl RoleMention {
    pub fn new<T>(id: T) -> Self
    where
        T: Into<RoleId>,
    {
        Self { id: id.into() }
    }
}

impl Display for RoleMention {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<@&{}>", self.id)
    }
}

impl FromStr for RoleMention {
    type Err = InvalidMention;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            id: parse_mention(s, "<@&")?,
        })
    }
}

/// A user mention with the format `<@{id}>` or `<@!{id}>`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UserMention {
    pub id: UserId,
}

impl UserMention {
    pub fn new<T>(id: T) -> Self
    where
        T: Into<UserId>,
    {
        Self { id: id.into() }
    }
}

impl Display for UserMention {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<@{}>", self.id)
    }
}

impl FromStr for UserMention {
    type Err = InvalidMention;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = match s.strip_prefix("<@!") {
            Some(_) => parse_mention(s, "<@!")?,
            None => parse_mention(s, "<@")?,
        };

        Ok(Self { id })
    }
}
