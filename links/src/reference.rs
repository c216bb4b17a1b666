use crate::errors::{Error, Result};
use crate::BASE_PATTERN;

use lazy_static::lazy_static;
use log::trace;
use regex::{Captures, Regex};
use serenity::model::id::{ChannelId, GuildId, MessageId};

/// The snowflakes identifying a single message
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MessageReference {
    pub guild: u64, // called guilds in the discord API, servers in the client
    pub channel: u64,
    pub message: u64,
}

impl MessageReference {
    pub const fn new(guild: u64, channel: u64, message: u64) -> MessageReference {
        MessageReference {
            guild,
            channel,
            message,
        }
    }

    pub(crate) fn from_captures(caps: &Captures<'_>) -> Result<MessageReference> {
        let id = |name: &str| -> Result<u64> {
            Ok(caps.name(name).ok_or(Error::Malformed)?.as_str().parse()?)
        };
        Ok(MessageReference::new(
            id("guild")?,
            id("channel")?,
            id("message")?,
        ))
    }

    /// Returns a URI that references the message in discord. When clicked inside a
    /// discord client it will auto scroll to the message
    #[inline(always)]
    pub fn link(&self) -> String {
        MessageId(self.message).link(ChannelId(self.channel), Some(GuildId(self.guild)))
    }
}

/// Returns every message link in `text`, in the order they appear.
///
/// Links wrapped in angle brackets are skipped, discord uses `<link>` to
/// suppress its own preview and we respect that. Repeated links are yielded
/// once per occurrence.
pub fn find_references(text: &str) -> impl Iterator<Item = MessageReference> + '_ {
    lazy_static! {
        static ref RE: Regex = Regex::new(BASE_PATTERN).unwrap();
    }
    RE.captures_iter(text).filter_map(move |caps| {
        let whole = caps.get(0)?;
        if text[..whole.start()].ends_with('<') || text[whole.end()..].starts_with('>') {
            trace!("skipping suppressed link {}", whole.as_str());
            return None;
        }
        match MessageReference::from_captures(&caps) {
            Ok(reference) => Some(reference),
            Err(why) => {
                trace!("skipping link {}: {why}", whole.as_str());
                None
            }
        }
    })
}
