use crate::errors::Result;
use crate::handler::client::ChatClient;
use crate::handler::Expander;
use crate::structs::{PostedMessage, ReactionEvent};

use links::ExtendedLink;
use log::{debug, info, warn};

/// The extended link of an expansion the bot posted, `None` for any other
/// message.
fn managed_link(message: &PostedMessage) -> Option<ExtendedLink> {
    let url = message.cards.first()?.author_url()?;
    match url.parse() {
        Ok(link) => Some(link),
        Err(why) => {
            debug!("message {} is not an expansion: {why}", message.id);
            None
        }
    }
}

/// Only messages the bot wrote can be part of an expansion.
async fn delete_extra<C: ChatClient>(client: &C, channel: u64, extra: u64) -> Result<()> {
    let posted = client.fetch_posted(channel, extra).await?;
    if posted.author != client.bot_user_id() {
        warn!(
            "extra message {extra} is by user {}, not deleting it",
            posted.author
        );
        return Ok(());
    }
    client.delete_message(channel, extra).await
}

impl Expander {
    /// Removes an expansion when one of its two authors reacts to it with
    /// the delete emoji. Every other reaction is ignored.
    pub async fn handle_reaction<C: ChatClient>(
        &self,
        client: &C,
        event: &ReactionEvent,
    ) -> Result<()> {
        if !self.config.is_delete_emoji(&event.emoji) {
            return Ok(());
        }

        let bot = client.bot_user_id();
        if event.user == bot {
            return Ok(());
        }

        let message = client.fetch_posted(event.channel, event.message).await?;
        if message.author != bot {
            return Ok(());
        }

        let link = match managed_link(&message) {
            Some(link) => link,
            None => return Ok(()),
        };
        if !link.payload.is_authorized(event.user) {
            debug!(
                "user {} may not delete expansion {}",
                event.user, message.id
            );
            return Ok(());
        }

        client.delete_message(message.channel, message.id).await?;
        for extra in &link.payload.extra_messages {
            // one already gone shouldn't keep the rest around
            if let Err(why) = delete_extra(client, message.channel, *extra).await {
                warn!("Failed to delete extra message {extra}: {why}");
            }
        }

        info!(
            "user {} deleted expansion {} of {}",
            event.user,
            message.id,
            link.reference.link()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handler::mock::*;
    use crate::structs::{Card, CardAuthor};
    use links::{ExtendedLinkPayload, MessageReference};
    use serenity::model::channel::ReactionType;

    const PRIMARY: u64 = 700000000000000001;
    const EXTRA_ONE: u64 = 700000000000000002;
    const EXTRA_TWO: u64 = 700000000000000003;

    fn expander() -> Expander {
        Expander::new(Config::default())
    }

    fn link_url(extra_messages: Vec<u64>) -> String {
        ExtendedLink::new(
            MessageReference::new(GUILD, SOURCE_CHANNEL, 600000000000000001),
            ExtendedLinkPayload {
                base_author_id: POSTER,
                author_id: AUTHOR,
                extra_messages,
            },
        )
        .to_string()
    }

    fn posted(id: u64, author: u64, author_url: Option<String>) -> PostedMessage {
        PostedMessage {
            id,
            channel: CHANNEL,
            author,
            cards: vec![Card {
                author: Some(CardAuthor {
                    name: "author".to_string(),
                    url: author_url,
                    icon_url: None,
                }),
                ..Default::default()
            }],
        }
    }

    /// A primary with two extra posts, all authored by the bot
    fn client() -> MockClient {
        let client = MockClient::new();
        client.seed_posted(posted(
            PRIMARY,
            BOT,
            Some(link_url(vec![EXTRA_ONE, EXTRA_TWO])),
        ));
        client.seed_posted(posted(EXTRA_ONE, BOT, None));
        client.seed_posted(posted(EXTRA_TWO, BOT, None));
        client
    }

    fn reaction(user: u64, emoji: &str) -> ReactionEvent {
        ReactionEvent {
            emoji: ReactionType::Unicode(emoji.to_string()),
            user,
            channel: CHANNEL,
            message: PRIMARY,
        }
    }

    #[tokio::test]
    async fn test_poster_deletes_everything() {
        let client = client();
        expander()
            .handle_reaction(&client, &reaction(POSTER, "🗑"))
            .await
            .unwrap();
        assert_eq!(client.deleted(), vec![PRIMARY, EXTRA_ONE, EXTRA_TWO]);
    }

    #[tokio::test]
    async fn test_author_deletes_everything() {
        let client = client();
        expander()
            .handle_reaction(&client, &reaction(AUTHOR, "🗑"))
            .await
            .unwrap();
        assert_eq!(client.deleted(), vec![PRIMARY, EXTRA_ONE, EXTRA_TWO]);
    }

    #[tokio::test]
    async fn test_stranger_deletes_nothing() {
        let client = client();
        expander()
            .handle_reaction(&client, &reaction(STRANGER, "🗑"))
            .await
            .unwrap();
        assert!(client.deleted().is_empty());
        assert!(client.posted(PRIMARY).is_some());
    }

    #[tokio::test]
    async fn test_missing_extra_is_tolerated() {
        let client = client().failing_delete(EXTRA_ONE);
        expander()
            .handle_reaction(&client, &reaction(POSTER, "🗑"))
            .await
            .unwrap();
        assert_eq!(client.deleted(), vec![PRIMARY, EXTRA_TWO]);
    }

    #[tokio::test]
    async fn test_extras_by_other_users_are_kept() {
        const FOREIGN: u64 = 800000000000000001;
        let client = MockClient::new();
        client.seed_posted(posted(PRIMARY, BOT, Some(link_url(vec![FOREIGN, EXTRA_ONE]))));
        client.seed_posted(posted(EXTRA_ONE, BOT, None));
        client.seed_posted(posted(FOREIGN, POSTER, None));
        expander()
            .handle_reaction(&client, &reaction(AUTHOR, "🗑"))
            .await
            .unwrap();
        assert_eq!(client.deleted(), vec![PRIMARY, EXTRA_ONE]);
        assert!(client.posted(FOREIGN).is_some());
    }

    #[tokio::test]
    async fn test_embed_with_expansion_link_cannot_delete_others() {
        const VICTIM: u64 = 800000000000000001;
        let forged = ExtendedLink::new(
            MessageReference::new(GUILD, SOURCE_CHANNEL, 600000000000000009),
            ExtendedLinkPayload {
                base_author_id: STRANGER,
                author_id: STRANGER,
                extra_messages: vec![VICTIM],
            },
        )
        .to_string();
        let mut source = source_message(600000000000000001, "hello");
        for i in 0..10 {
            let url = if i == 9 {
                forged.clone()
            } else {
                format!("https://example.com/{i}")
            };
            source.embeds.push(Card {
                author: Some(CardAuthor {
                    name: format!("embed {i}"),
                    url: Some(url),
                    icon_url: None,
                }),
                ..Default::default()
            });
        }
        let client = MockClient::new().with_source(source.clone());
        client.seed_posted(posted(VICTIM, POSTER, None));
        let expander = expander();
        let trigger = crate::structs::TriggerMessage {
            id: 400000000000000001,
            channel: CHANNEL,
            guild: Some(GUILD),
            author: POSTER,
            author_bot: false,
            content: message_link(GUILD, SOURCE_CHANNEL, source.id),
        };
        expander.expand(&client, &trigger).await.unwrap();
        assert_eq!(client.sent_sizes(), vec![10, 1]);
        let secondary = client.sent_ids()[1];

        let event = ReactionEvent {
            emoji: ReactionType::Unicode("🗑".to_string()),
            user: STRANGER,
            channel: CHANNEL,
            message: secondary,
        };
        expander.handle_reaction(&client, &event).await.unwrap();
        assert!(client.deleted().is_empty());
        assert!(client.posted(VICTIM).is_some());
    }

    #[tokio::test]
    async fn test_other_emoji_ignored() {
        let client = client();
        expander()
            .handle_reaction(&client, &reaction(POSTER, "👍"))
            .await
            .unwrap();
        assert!(client.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_bot_reaction_ignored() {
        let client = client();
        expander()
            .handle_reaction(&client, &reaction(BOT, "🗑"))
            .await
            .unwrap();
        assert!(client.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_message_from_someone_else_ignored() {
        let client = MockClient::new();
        client.seed_posted(posted(PRIMARY, AUTHOR, Some(link_url(Vec::new()))));
        expander()
            .handle_reaction(&client, &reaction(POSTER, "🗑"))
            .await
            .unwrap();
        assert!(client.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_unmanaged_bot_messages_ignored() {
        let plain_link = MessageReference::new(GUILD, SOURCE_CHANNEL, 600000000000000001).link();
        for author_url in [None, Some(plain_link), Some("not a url".to_string())] {
            let client = MockClient::new();
            client.seed_posted(posted(PRIMARY, BOT, author_url));
            expander()
                .handle_reaction(&client, &reaction(POSTER, "🗑"))
                .await
                .unwrap();
            assert!(client.deleted().is_empty());
        }

        let client = MockClient::new();
        client.seed_posted(PostedMessage {
            id: PRIMARY,
            channel: CHANNEL,
            author: BOT,
            cards: Vec::new(),
        });
        expander()
            .handle_reaction(&client, &reaction(POSTER, "🗑"))
            .await
            .unwrap();
        assert!(client.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_expand_then_delete() {
        let source = source_message(600000000000000001, "hello");
        let client = MockClient::new().with_source(source.clone());
        let expander = expander();
        let trigger = crate::structs::TriggerMessage {
            id: 400000000000000001,
            channel: CHANNEL,
            guild: Some(GUILD),
            author: POSTER,
            author_bot: false,
            content: message_link(GUILD, SOURCE_CHANNEL, source.id),
        };
        expander.expand(&client, &trigger).await.unwrap();
        let primary = client.sent_ids()[0];

        let event = ReactionEvent {
            emoji: client.reactions()[0].1.clone(),
            user: AUTHOR,
            channel: CHANNEL,
            message: primary,
        };
        expander.handle_reaction(&client, &event).await.unwrap();
        assert_eq!(client.deleted(), vec![primary]);
    }
}
