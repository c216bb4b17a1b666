//! Hooks to change what an expansion displays.
//!
//! A [`Customizer`] returns overrides for the message, guild, channel and
//! attachments being expanded. The overrides never touch the fetched data
//! itself, they are layered over it by [`MessageView`] which is what the
//! cards are composed from.

use crate::structs::{SourceAttachment, SourceChannel, SourceMessage};

use log::{trace, warn};
use serenity::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// What to do with one displayed field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Override<T> {
    /// show the original value
    Keep,
    /// show nothing
    Clear,
    Set(T),
}

impl<T> Default for Override<T> {
    fn default() -> Override<T> {
        Override::Keep
    }
}

impl Override<String> {
    pub fn apply<'a>(&'a self, original: Option<&'a str>) -> Option<&'a str> {
        match self {
            Override::Keep => original,
            Override::Clear => None,
            Override::Set(value) => Some(value.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCustomized {
    pub content: Override<String>,
    pub author_avatar_url: Override<String>,
    /// clearing the name falls back to the original, an author strip needs one
    pub author_name: Override<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuildCustomized {
    pub icon_url: Override<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelCustomized {
    pub name: Override<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentCustomized {
    pub content_type: Override<String>,
    pub proxy_url: Override<String>,
}

#[async_trait]
pub trait Customizer: Send + Sync {
    async fn message(&self, _message: &SourceMessage) -> MessageCustomized {
        MessageCustomized::default()
    }

    async fn guild(&self, _guild: u64) -> GuildCustomized {
        GuildCustomized::default()
    }

    async fn channel(&self, _channel: &SourceChannel) -> ChannelCustomized {
        ChannelCustomized::default()
    }

    async fn attachment(&self, _attachment: &SourceAttachment) -> AttachmentCustomized {
        AttachmentCustomized::default()
    }
}

/// Shows everything as fetched
pub struct NoCustomization;

impl Customizer for NoCustomization {}

type Cache<T> = RwLock<BTreeMap<u64, T>>;

/// Remembers what the wrapped customizer returned for each id, for the life
/// of the process. Snowflakes are unique across entity kinds so one id never
/// maps to two different entities.
pub struct Cached<C> {
    inner: C,
    messages: Cache<MessageCustomized>,
    guilds: Cache<GuildCustomized>,
    channels: Cache<ChannelCustomized>,
    attachments: Cache<AttachmentCustomized>,
}

impl<C: Customizer> Cached<C> {
    pub fn new(inner: C) -> Cached<C> {
        Cached {
            inner,
            messages: RwLock::new(BTreeMap::new()),
            guilds: RwLock::new(BTreeMap::new()),
            channels: RwLock::new(BTreeMap::new()),
            attachments: RwLock::new(BTreeMap::new()),
        }
    }
}

fn check_cache<T: Clone>(cache: &Cache<T>, id: u64) -> Option<T> {
    match cache.read() {
        Ok(cache) => cache.get(&id).cloned(),
        Err(_why) => {
            warn!("Failed to acquire read on customization cache");
            None
        }
    }
}

fn update_cache<T>(cache: &Cache<T>, id: u64, value: T) {
    match cache.write() {
        Ok(mut writable_cache) => {
            writable_cache.insert(id, value);
        }
        Err(_why) => warn!("Failed to acquire write lock on customization cache"),
    }
}

#[async_trait]
impl<C: Customizer> Customizer for Cached<C> {
    async fn message(&self, message: &SourceMessage) -> MessageCustomized {
        if let Some(hit) = check_cache(&self.messages, message.id) {
            trace!("message {} customization cached", message.id);
            return hit;
        }
        let value = self.inner.message(message).await;
        update_cache(&self.messages, message.id, value.clone());
        value
    }

    async fn guild(&self, guild: u64) -> GuildCustomized {
        if let Some(hit) = check_cache(&self.guilds, guild) {
            return hit;
        }
        let value = self.inner.guild(guild).await;
        update_cache(&self.guilds, guild, value.clone());
        value
    }

    async fn channel(&self, channel: &SourceChannel) -> ChannelCustomized {
        if let Some(hit) = check_cache(&self.channels, channel.id) {
            return hit;
        }
        let value = self.inner.channel(channel).await;
        update_cache(&self.channels, channel.id, value.clone());
        value
    }

    async fn attachment(&self, attachment: &SourceAttachment) -> AttachmentCustomized {
        if let Some(hit) = check_cache(&self.attachments, attachment.id) {
            return hit;
        }
        let value = self.inner.attachment(attachment).await;
        update_cache(&self.attachments, attachment.id, value.clone());
        value
    }
}

/// A fetched message seen through its overrides. Every accessor checks the
/// override first and falls back to the original.
#[derive(Debug)]
pub struct MessageView<'a> {
    original: &'a SourceMessage,
    message: MessageCustomized,
    guild: GuildCustomized,
    channel: ChannelCustomized,
    attachments: Vec<AttachmentCustomized>,
}

impl<'a> MessageView<'a> {
    pub fn plain(original: &'a SourceMessage) -> MessageView<'a> {
        MessageView {
            original,
            message: MessageCustomized::default(),
            guild: GuildCustomized::default(),
            channel: ChannelCustomized::default(),
            attachments: Vec::new(),
        }
    }

    pub async fn customize(
        original: &'a SourceMessage,
        customizer: &dyn Customizer,
    ) -> MessageView<'a> {
        let mut attachments = Vec::with_capacity(original.attachments.len());
        for attachment in &original.attachments {
            attachments.push(customizer.attachment(attachment).await);
        }
        MessageView {
            original,
            message: customizer.message(original).await,
            guild: customizer.guild(original.channel.guild).await,
            channel: customizer.channel(&original.channel).await,
            attachments,
        }
    }

    pub const fn original(&self) -> &'a SourceMessage {
        self.original
    }

    /// `None` for an empty message as well as a cleared one
    pub fn content(&self) -> Option<&str> {
        self.message
            .content
            .apply(Some(self.original.content.as_str()))
            .filter(|content| !content.is_empty())
    }

    pub fn author_name(&self) -> &str {
        match &self.message.author_name {
            Override::Set(name) => name,
            Override::Keep | Override::Clear => &self.original.author.display_name,
        }
    }

    pub fn author_avatar_url(&self) -> Option<&str> {
        self.message
            .author_avatar_url
            .apply(self.original.author.avatar_url.as_deref())
    }

    pub fn guild_icon_url(&self) -> Option<&str> {
        self.guild
            .icon_url
            .apply(self.original.guild_icon_url.as_deref())
    }

    pub fn channel_name(&self) -> Option<&str> {
        self.channel
            .name
            .apply(Some(self.original.channel.name.as_str()))
    }

    pub fn attachments(&self) -> impl Iterator<Item = AttachmentView<'_>> {
        self.original
            .attachments
            .iter()
            .enumerate()
            .map(move |(i, original)| AttachmentView {
                original,
                overrides: self.attachments.get(i),
            })
    }
}

#[derive(Debug)]
pub struct AttachmentView<'a> {
    original: &'a SourceAttachment,
    overrides: Option<&'a AttachmentCustomized>,
}

impl AttachmentView<'_> {
    pub fn content_type(&self) -> Option<&str> {
        let original = self.original.content_type.as_deref();
        match self.overrides {
            Some(overrides) => overrides.content_type.apply(original),
            None => original,
        }
    }

    pub fn proxy_url(&self) -> Option<&str> {
        let original = Some(self.original.proxy_url.as_str()).filter(|url| !url.is_empty());
        match self.overrides {
            Some(overrides) => overrides.proxy_url.apply(original),
            None => original,
        }
    }

    pub fn is_image(&self) -> bool {
        crate::structs::source::is_image(self.content_type())
    }
}
