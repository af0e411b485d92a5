use serde::{Deserialize, Serialize};
use serenity::model::gateway::Activity as SerenityActivity;
use serenity::model::user::OnlineStatus;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Online,
    Idle,
    DoNotDisturb,
    Invisible,
}

impl Default for Status {
    fn default() -> Self {
        Self::Online
    }
}

impl From<Status> for OnlineStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Online => Self::Online,
            Status::Idle => Self::Idle,
            Status::DoNotDisturb => Self::DoNotDisturb,
            Status::Invisible => Self::Invisible,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Activity {
    Playing(String),
    Listening(String),
    Watching(String),
    Competing(String),
}

impl From<&Activity> for SerenityActivity {
    fn from(activity: &Activity) -> Self {
        match activity {
            Activity::Playing(name) => Self::playing(name),
            Activity::Listening(name) => Self::listening(name),
            Activity::Watching(name) => Self::watching(name),
            Activity::Competing(name) => Self::competing(name),
        }
    }
}

/// The presence set when the bot connects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PresenceBuilder {
    pub(crate) status: Status,
    pub(crate) activity: Option<Activity>,
}

impl PresenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&mut self, status: Status) -> &mut Self {
        self.status = status;
        self
    }

    pub fn playing<T>(&mut self, name: T) -> &mut Self
    where
        T: ToString,
    {
        self.activity(Activity::Playing(name.to_string()))
    }

    pub fn listening<T>(&mut self, name: T) -> &mut Self
    where
        T: ToString,
    {
        self.activity(Activity::Listening(name.to_string()))
    }

    pub fn watching<T>(&mut self, name: T) -> &mut Self
    where
        T: ToString,
    {
        self.activity(Activity::Watching(name.to_string()))
    }

    pub fn competing<T>(&mut self, name: T) -> &mut Self
    where
        T: ToString,
    {
        self.activity(Activity::Competing(name.to_string()))
    }

    pub fn activity(&mut self, activity: Activity) -> &mut Self {
        self.activity = Some(activity);
        self
    }

    pub(crate) fn to_serenity(&self) -> (Option<SerenityActivity>, OnlineStatus) {
        (
            self.activity.as_ref().map(SerenityActivity::from),
            self.status.into(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Activity, PresenceBuilder, Status};

    use serenity::model::user::OnlineStatus;

    #[test]
    fn test_presence_builder() {
        let mut presence = PresenceBuilder::new();
        let (activity, status) = presence.to_serenity();
        assert!(activity.is_none());
        assert_eq!(status, OnlineStatus::Online);

        presence.status(Status::Idle).watching("the logs");
        assert_eq!(
            presence.activity,
            Some(Activity::Watching(String::from("the logs")))
        );

        let (activity, status) = presence.to_serenity();
        assert_eq!(activity.unwrap().name, "the logs");
        assert_eq!(status, OnlineStatus::Idle);
    }

    #[test]
    fn test_deserialize_activity() {
        let activity: Activity =
            serde_json::from_str(r#"{"kind": "playing", "name": "chess"}"#).unwrap();
        assert_eq!(activity, Activity::Playing(String::from("chess")));
    }
}
