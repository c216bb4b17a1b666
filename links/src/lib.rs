//! Parsing and encoding of discord message links.
//!
//! Two formats are handled here. Plain message links, as copied from the
//! discord client, and the extended link the bot writes into the author
//! field of an expansion so it can later tell who is allowed to remove it.

mod errors;
mod extended;
mod reference;

pub use errors::{Error, Result};
pub use extended::{ExtendedLink, ExtendedLinkPayload};
pub use reference::{find_references, MessageReference};

/// Pattern for a plain message link, without anchors. The three ids are
/// captured as `guild`, `channel` and `message`.
pub(crate) const BASE_PATTERN: &str = concat!(
    r"https://(?:ptb\.|canary\.)?discord(?:app)?\.com/channels/",
    r"(?P<guild>[0-9]{17,20})/(?P<channel>[0-9]{17,20})/(?P<message>[0-9]{17,20})"
);
