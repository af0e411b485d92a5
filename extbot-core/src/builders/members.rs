use extbot::model::GuildId;

/// Which guilds have their members requested from the gateway on ready.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MembersBuilder {
    /// `None` fills every guild.
    pub(crate) guilds: Option<Vec<GuildId>>,
    pub(crate) fill_presences: Option<bool>,
}

impl MembersBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill<I, T>(&mut self, guild_ids: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<GuildId>,
    {
        let guilds = self.guilds.get_or_insert_with(Vec::new);

        for guild_id in guild_ids {
            let guild_id = guild_id.into();
            if !guilds.contains(&guild_id) {
                guilds.push(guild_id);
            }
        }

        self
    }

    pub fn all(&mut self) -> &mut Self {
        self.guilds = None;
        self
    }

    pub fn none(&mut self) -> &mut Self {
        self.guilds = Some(Vec::new());
        self
    }

    /// Requests presences together with members. Requires the privileged
    /// presence intent.
    pub fn fill_presences(&mut self, fill: bool) -> &mut Self {
        self.fill_presences = Some(fill);
        self
    }

    pub fn should_fill(&self, guild_id: GuildId) -> bool {
        match &self.guilds {
            Some(guilds) => guilds.contains(&guild_id),
            None => true,
        }
    }

    /// Whether any guild is filled, which requires the members intent.
    pub fn fills_any(&self) -> bool {
        match &self.guilds {
            Some(guilds) => !guilds.is_empty(),
            None => true,
        }
    }

    pub fn fills_presences(&self) -> bool {
        self.fill_presences.unwrap_or(false)
    }
}

impl Default for MembersBuilder {
    fn default() -> Self {
        Self {
            guilds: Some(Vec::new()),
            fill_presences: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MembersBuilder;

    use extbot::model::GuildId;

    #[test]
    fn test_members_builder() {
        let mut members = MembersBuilder::new();
        assert!(!members.fills_any());
        assert!(!members.should_fill(GuildId(1)));

        members.fill([GuildId(1), GuildId(1), GuildId(2)]);
        assert_eq!(members.guilds, Some(vec![GuildId(1), GuildId(2)]));
        assert!(members.should_fill(GuildId(2)));
        assert!(!members.should_fill(GuildId(3)));

        members.all();
        assert!(members.should_fill(GuildId(3)));
        assert!(members.fills_any());

        members.none().fill_presences(true);
        assert!(!members.fills_any());
        assert!(members.fills_presences());
    }
}
