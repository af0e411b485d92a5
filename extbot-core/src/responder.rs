use crate::error::Result;

use extbot::builder::CreateMessage;
use extbot::model::{ChannelId, MessageId};

use async_trait::async_trait;
use parking_lot::Mutex;
use serenity::http::Http;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Sends responses to the invoker of a command.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, message: CreateMessage) -> Result;
}

/// Replies to a message in its channel.
#[derive(Clone)]
pub struct MessageResponder {
    http: Arc<Http>,
    channel_id: ChannelId,
    message_id: MessageId,
}

impl MessageResponder {
    pub fn new(http: Arc<Http>, channel_id: ChannelId, message_id: MessageId) -> Self {
        Self {
            http,
            channel_id,
            message_id,
        }
    }
}

#[async_trait]
impl Responder for MessageResponder {
    async fn respond(&self, mut message: CreateMessage) -> Result {
        if !message.has_reference() {
            message.reference_message(self.channel_id, self.message_id);
        }

        serenity::model::id::ChannelId::from(self.channel_id)
            .send_message(&self.http, |m| {
                message.fill_builder(m);
                m
            })
            .await?;

        Ok(())
    }
}

/// Responds to an application command interaction.
///
/// The first response answers the interaction, every further response is
/// sent as a followup message.
pub struct InteractionResponder {
    http: Arc<Http>,
    interaction: ApplicationCommandInteraction,
    responded: AtomicBool,
}

impl InteractionResponder {
    pub fn new(http: Arc<Http>, interaction: ApplicationCommandInteraction) -> Self {
        Self {
            http,
            interaction,
            responded: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Responder for InteractionResponder {
    async fn respond(&self, message: CreateMessage) -> Result {
        if !self.responded.swap(true, Ordering::SeqCst) {
            self.interaction
                .create_interaction_response(&self.http, |r| {
                    r.kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|d| {
                            message.fill_interaction(d);
                            d
                        })
                })
                .await?;
        } else {
            self.interaction
                .create_followup_message(&self.http, |f| {
                    message.fill_followup(f);
                    f
                })
                .await?;
        }

        Ok(())
    }
}

/// Stores all responses instead of sending them.
#[derive(Debug, Default)]
pub struct RecordingResponder {
    messages: Mutex<Vec<CreateMessage>>,
}

impl RecordingResponder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all responses sent so far.
    pub fn messages(&self) -> Vec<CreateMessage> {
        self.messages.lock().clone()
    }

    /// Returns the content of all responses sent so far.
    pub fn contents(&self) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .filter_map(|m| m.get_content().map(ToOwned::to_owned))
            .collect()
    }
}

#[async_trait]
impl Responder for RecordingResponder {
    async fn respond(&self, message: CreateMessage) -> Result {
        self.messages.lock().push(message);
        Ok(())
    }
}
