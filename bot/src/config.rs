use crate::errors::{Error, Result};

use log::debug;
use serenity::model::channel::ReactionType;
use std::env;

/// Wastebasket, U+1F5D1
pub const DEFAULT_DELETE_EMOJI: &str = "\u{1f5d1}";
pub const DEFAULT_EMBED_COLOR: u32 = 0;

const VARIATION_SELECTOR: char = '\u{fe0f}';

#[derive(Debug, Clone)]
pub struct Config {
    /// reaction that removes an expansion when added by one of its authors
    pub delete_emoji: ReactionType,
    /// accent color of the cards the bot composes itself
    pub embed_color: u32,
}

impl Config {
    pub fn new(delete_emoji: &str, embed_color: u32) -> Result<Config> {
        if embed_color > 0xFF_FF_FF {
            return Err(Error::Config(format!(
                "embed color {embed_color:#x} is not a 24 bit rgb value"
            )));
        }
        if delete_emoji.trim().is_empty() {
            return Err(Error::ConstStr("delete emoji is empty"));
        }
        let delete_emoji = ReactionType::try_from(delete_emoji)
            .map_err(|_| Error::Config(format!("{delete_emoji:?} is not an emoji")))?;
        Ok(Config {
            delete_emoji,
            embed_color,
        })
    }

    /// Reads `DELETE_REACTION_EMOJI` and `DEFAULT_EMBED_COLOR`, an unset or
    /// empty variable falls back to its default.
    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let emoji = var("DELETE_REACTION_EMOJI").unwrap_or_else(|| DEFAULT_DELETE_EMOJI.to_string());
        let color = match var("DEFAULT_EMBED_COLOR") {
            Some(raw) => parse_color(&raw)?,
            None => DEFAULT_EMBED_COLOR,
        };
        debug!("using delete emoji {emoji} and embed color {color:#08x}");
        Config::new(emoji.trim(), color)
    }

    /// Custom emoji compare by id, since the name and animated flag on a
    /// reaction event do not always match the configured text. Unicode
    /// emoji ignore a trailing variation selector.
    pub fn is_delete_emoji(&self, emoji: &ReactionType) -> bool {
        match (&self.delete_emoji, emoji) {
            (ReactionType::Custom { id: expected, .. }, ReactionType::Custom { id, .. }) => {
                expected == id
            }
            (ReactionType::Unicode(expected), ReactionType::Unicode(actual)) => {
                expected.trim_end_matches(VARIATION_SELECTOR)
                    == actual.trim_end_matches(VARIATION_SELECTOR)
            }
            _ => false,
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            delete_emoji: ReactionType::Unicode(DEFAULT_DELETE_EMOJI.to_string()),
            embed_color: DEFAULT_EMBED_COLOR,
        }
    }
}

/// Accepts decimal as well as `0x` or `#` prefixed hex
fn parse_color(raw: &str) -> Result<u32> {
    let raw = raw.trim();
    let parsed = if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix('#')) {
        u32::from_str_radix(hex, 16)
    } else {
        raw.parse::<u32>()
    };
    parsed.map_err(|why| Error::Config(format!("embed color {raw:?}: {why}")))
}
