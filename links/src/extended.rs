use crate::errors::{Error, Result};
use crate::reference::MessageReference;
use crate::BASE_PATTERN;

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::{self, Display};
use std::str::FromStr;

/// Bookkeeping carried in the query string of an extended link
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtendedLinkPayload {
    /// author of the message the link was posted in
    pub base_author_id: u64,
    /// author of the message being expanded
    pub author_id: u64,
    /// ids of the posts after the first one, in posting order
    pub extra_messages: Vec<u64>,
}

impl ExtendedLinkPayload {
    /// Only the two authors involved in an expansion may remove it
    pub fn is_authorized(&self, user_id: u64) -> bool {
        user_id == self.base_author_id || user_id == self.author_id
    }
}

/// A message link with an [`ExtendedLinkPayload`] appended.
///
/// The string form is
/// `{link}?base_aid={base_author_id}&aid={author_id}&extra={id,id,...}`
/// and is only ever read back by this crate, so field names and order are
/// fixed rather than parsed as a general query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedLink {
    pub reference: MessageReference,
    pub payload: ExtendedLinkPayload,
}

impl ExtendedLink {
    pub const fn new(reference: MessageReference, payload: ExtendedLinkPayload) -> ExtendedLink {
        ExtendedLink { reference, payload }
    }
}

impl Display for ExtendedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let extra = self
            .payload
            .extra_messages
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<String>>()
            .join(",");
        write!(
            f,
            "{}?base_aid={}&aid={}&extra={extra}",
            self.reference.link(),
            self.payload.base_author_id,
            self.payload.author_id,
        )
    }
}

impl FromStr for ExtendedLink {
    type Err = Error;

    fn from_str(url: &str) -> Result<ExtendedLink> {
        lazy_static! {
            static ref RE: Regex = Regex::new(&format!(
                r"^{BASE_PATTERN}\?base_aid=(?P<base_aid>[0-9]{{17,20}})&aid=(?P<aid>[0-9]{{17,20}})&extra=(?P<extra>(?:[0-9]{{17,20}}(?:,[0-9]{{17,20}})*)?)$"
            ))
            .unwrap();
        }
        let caps = RE.captures(url).ok_or(Error::Malformed)?;
        let reference = MessageReference::from_captures(&caps)?;
        let id = |name: &str| -> Result<u64> {
            Ok(caps.name(name).ok_or(Error::Malformed)?.as_str().parse()?)
        };

        let extra = caps.name("extra").map_or("", |m| m.as_str());
        let extra_messages = if extra.is_empty() {
            Vec::new()
        } else {
            extra
                .split(',')
                .map(|id| id.parse::<u64>().map_err(Error::from))
                .collect::<Result<Vec<u64>>>()?
        };

        Ok(ExtendedLink::new(
            reference,
            ExtendedLinkPayload {
                base_author_id: id("base_aid")?,
                author_id: id("aid")?,
                extra_messages,
            },
        ))
    }
}
