//! In memory [`ChatClient`] for the handler tests.

use crate::errors::{Error, Result};
use crate::handler::client::ChatClient;
use crate::structs::{Card, PostedMessage, SourceAuthor, SourceChannel, SourceMessage};

use chrono::{TimeZone, Utc};
use serenity::async_trait;
use serenity::model::channel::ReactionType;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

pub const GUILD: u64 = 100000000000000001;
pub const OTHER_GUILD: u64 = 100000000000000002;
pub const CHANNEL: u64 = 200000000000000001;
pub const SOURCE_CHANNEL: u64 = 200000000000000002;
pub const BOT: u64 = 300000000000000001;
pub const POSTER: u64 = 300000000000000002;
pub const AUTHOR: u64 = 300000000000000003;
pub const STRANGER: u64 = 300000000000000004;

const FIRST_POSTED_ID: u64 = 500000000000000001;

pub fn source_message(id: u64, content: &str) -> SourceMessage {
    SourceMessage {
        id,
        channel: SourceChannel {
            id: SOURCE_CHANNEL,
            guild: GUILD,
            name: "general".to_string(),
        },
        author: SourceAuthor {
            id: AUTHOR,
            display_name: "author".to_string(),
            avatar_url: Some("https://cdn.example/avatar.png".to_string()),
        },
        guild_icon_url: Some("https://cdn.example/guild.png".to_string()),
        content: content.to_string(),
        created_at: Utc.timestamp_opt(1_650_000_000, 0).unwrap(),
        attachments: Vec::new(),
        embeds: Vec::new(),
    }
}

pub fn message_link(guild: u64, channel: u64, message: u64) -> String {
    format!("https://discord.com/channels/{guild}/{channel}/{message}")
}

#[derive(Default)]
struct State {
    next_id: u64,
    posted: BTreeMap<u64, PostedMessage>,
    /// ids in the order they were sent
    sent: Vec<u64>,
    edits: Vec<(u64, Vec<Card>)>,
    reactions: Vec<(u64, ReactionType)>,
    deleted: Vec<u64>,
}

#[derive(Default)]
pub struct MockClient {
    sources: HashMap<u64, SourceMessage>,
    channels: HashMap<u64, SourceChannel>,
    fail_deletes: HashSet<u64>,
    state: Mutex<State>,
}

impl MockClient {
    pub fn new() -> MockClient {
        MockClient::default()
    }

    pub fn with_source(mut self, source: SourceMessage) -> MockClient {
        self.channels
            .insert(source.channel.id, source.channel.clone());
        self.sources.insert(source.id, source);
        self
    }

    pub fn failing_delete(mut self, message: u64) -> MockClient {
        self.fail_deletes.insert(message);
        self
    }

    /// Puts a message in the store as if someone had posted it
    pub fn seed_posted(&self, posted: PostedMessage) {
        let mut state = self.state.lock().unwrap();
        state.posted.insert(posted.id, posted);
    }

    /// Card counts of every sent message, in order
    pub fn sent_sizes(&self) -> Vec<usize> {
        let state = self.state.lock().unwrap();
        state
            .sent
            .iter()
            .map(|id| state.posted.get(id).map_or(0, |p| p.cards.len()))
            .collect()
    }

    pub fn sent_ids(&self) -> Vec<u64> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn posted(&self, id: u64) -> Option<PostedMessage> {
        self.state.lock().unwrap().posted.get(&id).cloned()
    }

    pub fn edits(&self) -> Vec<(u64, Vec<Card>)> {
        self.state.lock().unwrap().edits.clone()
    }

    pub fn reactions(&self) -> Vec<(u64, ReactionType)> {
        self.state.lock().unwrap().reactions.clone()
    }

    pub fn deleted(&self) -> Vec<u64> {
        self.state.lock().unwrap().deleted.clone()
    }
}

#[async_trait]
impl ChatClient for MockClient {
    fn bot_user_id(&self) -> u64 {
        BOT
    }

    async fn resolve_channel(&self, guild: u64, channel: u64) -> Result<SourceChannel> {
        match self.channels.get(&channel) {
            Some(found) if found.guild == guild => Ok(found.clone()),
            _ => Err(Error::ConstStr("Unknown Channel")),
        }
    }

    async fn fetch_message(&self, channel: &SourceChannel, message: u64) -> Result<SourceMessage> {
        match self.sources.get(&message) {
            Some(found) if found.channel.id == channel.id => Ok(found.clone()),
            _ => Err(Error::ConstStr("Unknown Message")),
        }
    }

    async fn fetch_posted(&self, _channel: u64, message: u64) -> Result<PostedMessage> {
        self.posted(message)
            .ok_or(Error::ConstStr("Unknown Message"))
    }

    async fn send_cards(&self, channel: u64, cards: &[Card]) -> Result<PostedMessage> {
        let mut state = self.state.lock().unwrap();
        let id = FIRST_POSTED_ID + state.next_id;
        state.next_id += 1;
        let posted = PostedMessage {
            id,
            channel,
            author: BOT,
            cards: cards.to_vec(),
        };
        state.posted.insert(id, posted.clone());
        state.sent.push(id);
        Ok(posted)
    }

    async fn edit_cards(&self, _channel: u64, message: u64, cards: &[Card]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        match state.posted.get_mut(&message) {
            Some(posted) => posted.cards = cards.to_vec(),
            None => return Err(Error::ConstStr("Unknown Message")),
        }
        state.edits.push((message, cards.to_vec()));
        Ok(())
    }

    async fn add_reaction(&self, _channel: u64, message: u64, emoji: &ReactionType) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .reactions
            .push((message, emoji.clone()));
        Ok(())
    }

    async fn delete_message(&self, _channel: u64, message: u64) -> Result<()> {
        if self.fail_deletes.contains(&message) {
            return Err(Error::ConstStr("Unknown Message"));
        }
        let mut state = self.state.lock().unwrap();
        if state.posted.remove(&message).is_none() {
            return Err(Error::ConstStr("Unknown Message"));
        }
        state.deleted.push(message);
        Ok(())
    }
}
