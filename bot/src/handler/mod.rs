pub mod client;
pub mod customize;
mod delete;
mod expand;
#[cfg(test)]
pub(crate) mod mock;

pub use client::{ChatClient, SerenityClient};
pub use customize::{Cached, Customizer, NoCustomization};

use crate::config::Config;
use crate::errors::Result;
use crate::structs::{ReactionEvent, TriggerMessage};

use log::{error, info, trace};
use serenity::{
    async_trait,
    model::{channel::Message, channel::Reaction, gateway::Ready},
    prelude::*,
};

/// Expands message links and removes expansions on request. Built once at
/// startup and owned by the [`Handler`].
pub struct Expander {
    config: Config,
    customizer: Box<dyn Customizer>,
}

impl Expander {
    pub fn new(config: Config) -> Expander {
        Expander {
            config,
            customizer: Box::new(NoCustomization),
        }
    }

    pub fn with_customizer<C: Customizer + 'static>(mut self, customizer: C) -> Expander {
        self.customizer = Box::new(customizer);
        self
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }
}

pub struct Handler {
    expander: Expander,
}

impl Handler {
    pub const fn new(expander: Expander) -> Handler {
        Handler { expander }
    }
}

pub fn log_error<T>(r: Result<T>, label: &str) {
    if let Err(why) = r {
        error!("{label} failed with error: {why:?}");
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        // dont care about bot messages
        if msg.author.bot {
            return;
        }

        if msg.guild_id.is_none() {
            trace!("message {} is not from a guild, ignoring", msg.id);
            return;
        }

        let client = match SerenityClient::new(&ctx) {
            Ok(client) => client,
            Err(why) => {
                error!("Can't expand message {}: {why}", msg.id);
                return;
            }
        };

        log_error(
            self.expander
                .expand(&client, &TriggerMessage::from(&msg))
                .await,
            "Expand message links",
        );
    }

    async fn reaction_add(&self, ctx: Context, reaction: Reaction) {
        let event = match ReactionEvent::from_reaction(&reaction) {
            Some(event) => event,
            None => return,
        };
        // checked here as well to skip building a client for every reaction
        if !self.expander.config().is_delete_emoji(&event.emoji) {
            return;
        }

        let client = match SerenityClient::new(&ctx) {
            Ok(client) => client,
            Err(why) => {
                error!("Can't handle reaction on {}: {why}", event.message);
                return;
            }
        };

        log_error(
            self.expander.handle_reaction(&client, &event).await,
            "Delete expansion",
        );
    }

    async fn ready(&self, _: Context, ready: Ready) {
        info!(
            "{} is connected to {} guilds!",
            ready.user.name,
            ready.guilds.len()
        );
    }
}
