use crate::errors::{Error, Result};
use crate::structs::{Card, PostedMessage, SourceAttachment, SourceAuthor, SourceChannel, SourceMessage};
use crate::utils::timestamp_to_utc;

use log::{debug, warn};
use serde_json::{json, Value};
use serenity::async_trait;
use serenity::cache::Cache;
use serenity::http::Http;
use serenity::model::channel::ReactionType;
use serenity::model::id::{ChannelId, GuildId};
use serenity::prelude::Context;
use std::sync::Arc;

/// Everything the expander needs from discord. Implemented over serenity for
/// the bot and over an in memory store in tests.
#[async_trait]
pub trait ChatClient: Send + Sync {
    fn bot_user_id(&self) -> u64;

    /// Looks a channel up in `guild`, failing if it belongs to another guild
    async fn resolve_channel(&self, guild: u64, channel: u64) -> Result<SourceChannel>;

    async fn fetch_message(&self, channel: &SourceChannel, message: u64) -> Result<SourceMessage>;

    async fn fetch_posted(&self, channel: u64, message: u64) -> Result<PostedMessage>;

    /// Sends a single message carrying `cards`, at most [`crate::structs::MAX_CARDS_PER_POST`]
    async fn send_cards(&self, channel: u64, cards: &[Card]) -> Result<PostedMessage>;

    async fn edit_cards(&self, channel: u64, message: u64, cards: &[Card]) -> Result<()>;

    async fn add_reaction(&self, channel: u64, message: u64, emoji: &ReactionType) -> Result<()>;

    async fn delete_message(&self, channel: u64, message: u64) -> Result<()>;
}

pub struct SerenityClient {
    http: Arc<Http>,
    cache: Arc<Cache>,
    bot_user_id: u64,
}

impl SerenityClient {
    /// Fails if the gateway has not told us who we are yet, without that
    /// neither our own posts nor our own reactions can be recognised.
    pub fn new(ctx: &Context) -> Result<SerenityClient> {
        SerenityClient::from_parts(ctx.http.clone(), ctx.cache.clone())
    }

    pub fn from_parts(http: Arc<Http>, cache: Arc<Cache>) -> Result<SerenityClient> {
        let bot_user_id = *cache.current_user_id().as_u64();
        if bot_user_id == 0 {
            return Err(Error::ConstStr(
                "current user is not cached, the client has not received READY",
            ));
        }
        Ok(SerenityClient {
            http,
            cache,
            bot_user_id,
        })
    }

    async fn guild_icon_url(&self, guild: u64) -> Option<String> {
        if let Some(cached) = self.cache.guild(GuildId(guild)) {
            return cached.icon_url();
        }
        match self.http.get_guild(guild).await {
            Ok(partial) => partial.icon_url(),
            Err(why) => {
                warn!("Failed to fetch guild {guild} for its icon: {why}");
                None
            }
        }
    }
}

fn embeds_body(cards: &[Card]) -> Result<Value> {
    Ok(json!({ "embeds": serde_json::to_value(cards)? }))
}

#[async_trait]
impl ChatClient for SerenityClient {
    fn bot_user_id(&self) -> u64 {
        self.bot_user_id
    }

    async fn resolve_channel(&self, guild: u64, channel: u64) -> Result<SourceChannel> {
        let guild_channel = match self.cache.guild_channel(ChannelId(channel)) {
            Some(cached) => cached,
            None => {
                debug!("channel {channel} not in cache, fetching");
                self.http
                    .get_channel(channel)
                    .await?
                    .guild()
                    .ok_or(Error::ConstStr("linked channel is not a guild channel"))?
            }
        };

        if *guild_channel.guild_id.as_u64() != guild {
            return Err(Error::Internal(format!(
                "channel {channel} does not belong to guild {guild}"
            )));
        }

        Ok(SourceChannel {
            id: channel,
            guild,
            name: guild_channel.name,
        })
    }

    async fn fetch_message(&self, channel: &SourceChannel, message: u64) -> Result<SourceMessage> {
        let msg = self.http.get_message(channel.id, message).await?;

        let nick = msg
            .member
            .as_ref()
            .and_then(|member| member.nick.clone())
            .or_else(|| {
                self.cache
                    .member(GuildId(channel.guild), msg.author.id)
                    .and_then(|member| member.nick)
            });

        Ok(SourceMessage {
            id: message,
            channel: channel.clone(),
            author: SourceAuthor {
                id: *msg.author.id.as_u64(),
                display_name: nick.unwrap_or_else(|| msg.author.name.clone()),
                avatar_url: Some(msg.author.face()),
            },
            guild_icon_url: self.guild_icon_url(channel.guild).await,
            content: msg.content.clone(),
            created_at: timestamp_to_utc(msg.timestamp)?,
            attachments: msg.attachments.iter().map(SourceAttachment::from).collect(),
            embeds: msg
                .embeds
                .iter()
                .map(Card::from_embed)
                .collect::<Result<Vec<Card>>>()?,
        })
    }

    async fn fetch_posted(&self, channel: u64, message: u64) -> Result<PostedMessage> {
        PostedMessage::from_message(&self.http.get_message(channel, message).await?)
    }

    async fn send_cards(&self, channel: u64, cards: &[Card]) -> Result<PostedMessage> {
        let msg = self.http.send_message(channel, &embeds_body(cards)?).await?;
        PostedMessage::from_message(&msg)
    }

    async fn edit_cards(&self, channel: u64, message: u64, cards: &[Card]) -> Result<()> {
        self.http
            .edit_message(channel, message, &embeds_body(cards)?)
            .await?;
        Ok(())
    }

    async fn add_reaction(&self, channel: u64, message: u64, emoji: &ReactionType) -> Result<()> {
        self.http.create_reaction(channel, message, emoji).await?;
        Ok(())
    }

    async fn delete_message(&self, channel: u64, message: u64) -> Result<()> {
        self.http.delete_message(channel, message).await?;
        Ok(())
    }
}
