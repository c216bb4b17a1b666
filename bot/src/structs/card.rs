use crate::errors::Result;

use serde::{Deserialize, Serialize};
use serenity::model::channel::Embed;

/// The most embeds discord accepts on a single message
pub const MAX_CARDS_PER_POST: usize = 10;

/// A rich preview, serialized in the shape discord expects for an embed.
///
/// Only the fields a bot may set are kept. Embeds read back from discord carry
/// more (provider, video, proxy urls), those are dropped on conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Card {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<CardFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<CardImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<CardImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<CardAuthor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<CardField>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardFooter {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardImage {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Card {
    pub fn image_only(url: &str, color: u32) -> Card {
        Card {
            color: Some(color),
            image: Some(CardImage {
                url: url.to_string(),
            }),
            ..Default::default()
        }
    }

    /// Converts an embed received from discord by way of its json form, which
    /// both types share.
    pub fn from_embed(embed: &Embed) -> Result<Card> {
        Ok(serde_json::from_value(serde_json::to_value(embed)?)?)
    }

    /// Name of the author strip, if there is one with a non empty name
    pub fn author_name(&self) -> Option<&str> {
        self.author
            .as_ref()
            .map(|author| author.name.as_str())
            .filter(|name| !name.is_empty())
    }

    pub fn author_url(&self) -> Option<&str> {
        self.author.as_ref().and_then(|author| author.url.as_deref())
    }
}
