use crate::errors::Result;
use crate::handler::client::ChatClient;
use crate::handler::customize::MessageView;
use crate::handler::Expander;
use crate::structs::{
    Card, CardAuthor, CardFooter, CardImage, SourceMessage, TriggerMessage, MAX_CARDS_PER_POST,
};

use links::{find_references, ExtendedLink, ExtendedLinkPayload, MessageReference};
use log::{debug, info, warn};

/// Author name of the leading card added when a preview has no author strip
/// of its own to carry the link
pub const JUMP_CARD_NAME: &str = "jump to origin message";

/// Links in `content` that point into `guild`. Links to other guilds are
/// dropped, we would not be able to read them and should not leak them.
fn same_guild_references(content: &str, guild: u64) -> impl Iterator<Item = MessageReference> + '_ {
    find_references(content).filter(move |reference| {
        let same = reference.guild == guild;
        if !same {
            debug!("ignoring link to guild {}", reference.guild);
        }
        same
    })
}

async fn resolve<C: ChatClient>(client: &C, reference: &MessageReference) -> Result<SourceMessage> {
    let channel = client
        .resolve_channel(reference.guild, reference.channel)
        .await?;
    client.fetch_message(&channel, reference.message).await
}

/// Points the first card's author strip at `url`, or puts a jump card in
/// front when there is no author strip to use.
fn stamp_link(mut cards: Vec<Card>, url: String, color: u32) -> Vec<Card> {
    match cards.first_mut() {
        Some(first) if first.author_name().is_some() => {
            if let Some(author) = first.author.as_mut() {
                author.url = Some(url);
            }
        }
        _ => cards.insert(0, jump_card(url, color)),
    }
    cards
}

/// Embeds on the linked message are reposted as they are, except an author
/// url that reads as an expansion link, which would let the repost pass for
/// one of our own expansions.
fn neutralize_embed(mut card: Card, origin: &str) -> Card {
    if let Some(author) = card.author.as_mut() {
        let forged = author
            .url
            .as_deref()
            .map_or(false, |url| url.parse::<ExtendedLink>().is_ok());
        if forged {
            debug!("replacing expansion link in a reposted embed");
            author.url = Some(origin.to_string());
        }
    }
    card
}

fn jump_card(url: String, color: u32) -> Card {
    Card {
        color: Some(color),
        author: Some(CardAuthor {
            name: JUMP_CARD_NAME.to_string(),
            url: Some(url),
            icon_url: None,
        }),
        ..Default::default()
    }
}

impl Expander {
    /// Posts a preview of every message linked in `trigger`.
    ///
    /// A link that can't be resolved is logged and skipped, the remaining
    /// links are still expanded. Failures while posting are returned.
    pub async fn expand<C: ChatClient>(&self, client: &C, trigger: &TriggerMessage) -> Result<()> {
        if trigger.author_bot {
            return Ok(());
        }
        let guild = match trigger.guild {
            Some(guild) => guild,
            None => return Ok(()),
        };

        let references: Vec<MessageReference> =
            same_guild_references(&trigger.content, guild).collect();
        for reference in references {
            let source = match resolve(client, &reference).await {
                Ok(source) => source,
                Err(why) => {
                    warn!("Failed to resolve {}, skipping: {why}", reference.link());
                    continue;
                }
            };

            let view = MessageView::customize(&source, self.customizer.as_ref()).await;
            let cards = self.compose_cards(&view);
            if cards.is_empty() {
                debug!("message {} has nothing to preview", source.id);
                continue;
            }
            self.post(client, trigger, &source, cards).await?;
        }
        Ok(())
    }

    /// Cards previewing one message, in posting order.
    ///
    /// The first card always has an author strip so the extended link has
    /// somewhere to live once the posts exist.
    pub(crate) fn compose_cards(&self, view: &MessageView<'_>) -> Vec<Card> {
        let original = view.original();
        let mut cards = Vec::new();

        if view.content().is_some() || !original.attachments.is_empty() {
            cards.push(self.compose_primary(view));
        }

        for attachment in view.attachments().skip(1) {
            if !attachment.is_image() {
                continue;
            }
            if let Some(url) = attachment.proxy_url() {
                cards.push(Card::image_only(url, self.config.embed_color));
            }
        }

        let origin = original.reference().link();
        cards.extend(
            original
                .embeds
                .iter()
                .map(|embed| neutralize_embed(embed.clone(), &origin)),
        );

        if cards.is_empty() {
            return cards;
        }
        // the jump card goes in before batching so it counts toward the
        // per post limit, an embed only message of 23 posts as 10, 10, 4
        stamp_link(cards, origin, self.config.embed_color)
    }

    fn compose_primary(&self, view: &MessageView<'_>) -> Card {
        let original = view.original();
        let image = view
            .attachments()
            .next()
            .filter(|attachment| attachment.is_image())
            .and_then(|attachment| attachment.proxy_url().map(str::to_string))
            .map(|url| CardImage { url });

        Card {
            description: view.content().map(str::to_string),
            timestamp: Some(original.created_at.to_rfc3339()),
            color: Some(self.config.embed_color),
            author: Some(CardAuthor {
                name: view.author_name().to_string(),
                url: Some(original.reference().link()),
                icon_url: view.author_avatar_url().map(str::to_string),
            }),
            footer: view.channel_name().map(|name| CardFooter {
                text: name.to_string(),
                icon_url: view.guild_icon_url().map(str::to_string),
            }),
            image,
            ..Default::default()
        }
    }

    /// Sends `cards` in batches, arms the delete reaction on the first post
    /// and then writes the extended link into it. The link lists the ids of
    /// the later posts, so it can only be written after they exist.
    async fn post<C: ChatClient>(
        &self,
        client: &C,
        trigger: &TriggerMessage,
        source: &SourceMessage,
        cards: Vec<Card>,
    ) -> Result<()> {
        let mut posts = Vec::new();
        for batch in cards.chunks(MAX_CARDS_PER_POST) {
            posts.push(client.send_cards(trigger.channel, batch).await?);
        }

        let mut posts = posts.into_iter();
        let primary = match posts.next() {
            Some(primary) => primary,
            None => return Ok(()),
        };
        let extra_messages: Vec<u64> = posts.map(|post| post.id).collect();

        client
            .add_reaction(primary.channel, primary.id, &self.config.delete_emoji)
            .await?;

        let link = ExtendedLink::new(
            source.reference(),
            ExtendedLinkPayload {
                base_author_id: trigger.author,
                author_id: source.author.id,
                extra_messages,
            },
        );
        let stamped = stamp_link(primary.cards, link.to_string(), self.config.embed_color);
        client
            .edit_cards(primary.channel, primary.id, &stamped)
            .await?;

        info!(
            "expanded {} linked in {} into {} with {} extra posts",
            source.reference().link(),
            trigger.id,
            primary.id,
            link.payload.extra_messages.len()
        );
        Ok(())
    }
}
