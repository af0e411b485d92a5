use crate::model::id::{ChannelId, MessageId};

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const BLURPLE: Self = Self(0x5865F2);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLURPLE
    }
}

impl From<u32> for Color {
    fn from(c: u32) -> Self {
        Self(c)
    }
}

impl From<serenity::utils::Colour> for Color {
    fn from(c: serenity::utils::Colour) -> Self {
        Self(c.0)
    }
}

/// [`CreateMessage`] is used to construct a new message or an
/// interaction response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMessage {
    content: Option<String>,
    reference_message: Option<(ChannelId, MessageId)>,
    embed: Option<CreateEmbed>,
    ephemeral: bool,
    mention_reply: Option<bool>,
}

impl CreateMessage {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut builder = Self::default();
        f(&mut builder);
        builder
    }

    /// Set the content of the message.
    pub fn content<T>(&mut self, content: T) -> &mut Self
    where
        T: ToString,
    {
        self.content = Some(content.to_string());
        self
    }

    pub fn reference_message<C, M>(&mut self, channel_id: C, message_id: M) -> &mut Self
    where
        C: Into<ChannelId>,
        M: Into<MessageId>,
    {
        self.reference_message = Some((channel_id.into(), message_id.into()));
        self
    }

    pub fn embed<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut CreateEmbed),
    {
        self.embed = Some(CreateEmbed::new(f));
        self
    }

    /// Only show the message to the invoking user. This is only respected
    /// by interaction responses.
    pub fn ephemeral(&mut self, ephemeral: bool) -> &mut Self {
        self.ephemeral = ephemeral;
        self
    }

    /// Whether replying to a message pings its author.
    pub fn mention_reply(&mut self, mention: bool) -> &mut Self {
        self.mention_reply = Some(mention);
        self
    }

    pub fn get_content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn get_embed(&self) -> Option<&CreateEmbed> {
        self.embed.as_ref()
    }

    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    pub fn has_reference(&self) -> bool {
        self.reference_message.is_some()
    }

    pub fn fill_builder(self, builder: &mut serenity::builder::CreateMessage<'_>) {
        if let Some(content) = self.content {
            builder.content(content);
        }

        if let Some((channel_id, message_id)) = self.reference_message {
            builder.reference_message((
                serenity::model::id::ChannelId::from(channel_id),
                serenity::model::id::MessageId::from(message_id),
            ));
        }

        if let Some(mention) = self.mention_reply {
            builder.allowed_mentions(|m| m.replied_user(mention));
        }

        if let Some(embed) = self.embed {
            builder.embed(|e| {
                embed.fill_builder(e);
                e
            });
        }
    }

    pub fn fill_interaction(
        self,
        builder: &mut serenity::builder::CreateInteractionResponseData<'_>,
    ) {
        if let Some(content) = self.content {
            builder.content(content);
        }

        if let Some(embed) = self.embed {
            builder.embed(|e| {
                embed.fill_builder(e);
                e
            });
        }

        builder.ephemeral(self.ephemeral);
    }

    pub fn fill_followup(
        self,
        builder: &mut serenity::builder::CreateInteractionResponseFollowup<'_>,
    ) {
        if let Some(content) = self.content {
            builder.content(content);
        }

        if let Some(embed) = self.embed {
            builder.embed(|e| {
                embed.fill_builder(e);
                e
            });
        }

        builder.ephemeral(self.ephemeral);
    }
}

impl From<&str> for CreateMessage {
    fn from(content: &str) -> Self {
        let mut builder = Self::default();
        builder.content(content);
        builder
    }
}

impl From<String> for CreateMessage {
    fn from(content: String) -> Self {
        let mut builder = Self::default();
        builder.content = Some(content);
        builder
    }
}

impl From<CreateEmbed> for CreateMessage {
    fn from(embed: CreateEmbed) -> Self {
        Self {
            embed: Some(embed),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEmbed {
    color: Option<Color>,
    description: Option<String>,
    title: Option<String>,
    fields: Vec<(String, String, bool)>,
    footer: Option<String>,
}

impl CreateEmbed {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut builder = Self::default();
        f(&mut builder);
        builder
    }

    pub fn description<T>(&mut self, description: T) -> &mut Self
    where
        T: ToString,
    {
        self.description = Some(description.to_string());
        self
    }

    pub fn title<T>(&mut self, title: T) -> &mut Self
    where
        T: ToString,
    {
        self.title = Some(title.to_string());
        self
    }

    pub fn color<T>(&mut self, color: T) -> &mut Self
    where
        T: Into<Color>,
    {
        self.color = Some(color.into());
        self
    }

    pub fn field<N, V>(&mut self, name: N, value: V, inline: bool) -> &mut Self
    where
        N: ToString,
        V: ToString,
    {
        self.fields.push((name.to_string(), value.to_string(), inline));
        self
    }

    pub fn footer<T>(&mut self, footer: T) -> &mut Self
    where
        T: ToString,
    {
        self.footer = Some(footer.to_string());
        self
    }

    pub fn get_title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn get_color(&self) -> Option<Color> {
        self.color
    }

    pub fn get_fields(&self) -> &[(String, String, bool)] {
        &self.fields
    }

    pub fn get_footer(&self) -> Option<&str> {
        self.footer.as_deref()
    }

    pub fn fill_builder(self, builder: &mut serenity::builder::CreateEmbed) {
        if let Some(description) = self.description {
            builder.description(description);
        }

        if let Some(title) = self.title {
            builder.title(title);
        }

        if let Some(color) = self.color {
            builder.colour(color.0);
        }

        for (name, value, inline) in self.fields {
            builder.field(name, value, inline);
        }

        if let Some(footer) = self.footer {
            builder.footer(|f| f.text(footer));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, CreateMessage};

    #[test]
    fn test_color_from_rgb() {
        assert_eq!(Color::from_rgb(0xFF, 0xA6, 0x00), Color(0xFFA600));
        assert_eq!(Color::default(), Color::BLURPLE);
    }

    #[test]
    fn test_create_message() {
        let message = CreateMessage::new(|m| {
            m.content("Hello").ephemeral(true).embed(|e| {
                e.title("Title").field("a", "b", false);
            });
        });

        assert_eq!(message.get_content(), Some("Hello"));
        assert!(message.is_ephemeral());

        let embed = message.get_embed().unwrap();
        assert_eq!(embed.get_title(), Some("Title"));
        assert_eq!(embed.get_fields().len(), 1);

        let message = CreateMessage::from("plain");
        assert_eq!(message.get_content(), Some("plain"));
        assert!(!message.is_ephemeral());
        assert!(!message.has_reference());
    }
}
