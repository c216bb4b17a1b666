use crate::structs::Card;

use chrono::{DateTime, Utc};
use links::MessageReference;
use serenity::model::channel::Attachment;

/// A guild channel a referenced message lives in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceChannel {
    pub id: u64,
    pub guild: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAuthor {
    pub id: u64,
    /// nickname in the guild if one is set, otherwise the username
    pub display_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAttachment {
    pub id: u64,
    pub content_type: Option<String>,
    pub proxy_url: String,
}

impl From<&Attachment> for SourceAttachment {
    fn from(attachment: &Attachment) -> SourceAttachment {
        SourceAttachment {
            id: *attachment.id.as_u64(),
            content_type: attachment.content_type.clone(),
            proxy_url: attachment.proxy_url.clone(),
        }
    }
}

pub(crate) fn is_image(content_type: Option<&str>) -> bool {
    content_type.map_or(false, |t| t.starts_with("image"))
}

/// A message that a link pointed at, with everything needed to preview it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMessage {
    pub id: u64,
    pub channel: SourceChannel,
    pub author: SourceAuthor,
    pub guild_icon_url: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub attachments: Vec<SourceAttachment>,
    pub embeds: Vec<Card>,
}

impl SourceMessage {
    pub const fn reference(&self) -> MessageReference {
        MessageReference::new(self.channel.guild, self.channel.id, self.id)
    }
}
