use crate::errors::Result;
use crate::structs::Card;

use serenity::model::channel::{Message, Reaction, ReactionType};

/// A message received from the gateway that may contain links to expand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMessage {
    pub id: u64,
    pub channel: u64,
    pub guild: Option<u64>,
    pub author: u64,
    pub author_bot: bool,
    pub content: String,
}

impl From<&Message> for TriggerMessage {
    fn from(msg: &Message) -> TriggerMessage {
        TriggerMessage {
            id: *msg.id.as_u64(),
            channel: *msg.channel_id.as_u64(),
            guild: msg.guild_id.map(|id| *id.as_u64()),
            author: *msg.author.id.as_u64(),
            author_bot: msg.author.bot,
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReactionEvent {
    pub emoji: ReactionType,
    pub user: u64,
    pub channel: u64,
    pub message: u64,
}

impl ReactionEvent {
    /// `None` when discord did not say who reacted
    pub fn from_reaction(reaction: &Reaction) -> Option<ReactionEvent> {
        Some(ReactionEvent {
            emoji: reaction.emoji.clone(),
            user: *reaction.user_id?.as_u64(),
            channel: *reaction.channel_id.as_u64(),
            message: *reaction.message_id.as_u64(),
        })
    }
}

/// A message as sent or fetched, reduced to what expansion and deletion use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub id: u64,
    pub channel: u64,
    pub author: u64,
    pub cards: Vec<Card>,
}

impl PostedMessage {
    pub fn from_message(msg: &Message) -> Result<PostedMessage> {
        Ok(PostedMessage {
            id: *msg.id.as_u64(),
            channel: *msg.channel_id.as_u64(),
            author: *msg.author.id.as_u64(),
            cards: msg
                .embeds
                .iter()
                .map(Card::from_embed)
                .collect::<Result<Vec<Card>>>()?,
        })
    }
}
