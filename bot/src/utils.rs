use crate::errors::{Error, Result};

use chrono::{DateTime, Utc};
use log::trace;
use serenity::model::Timestamp;

/// serenity hands out its own Timestamp type, the rfc3339 form is the one
/// representation both sides agree on.
#[inline(always)]
pub fn timestamp_to_utc(timestamp: Timestamp) -> Result<DateTime<Utc>> {
    let rfc3339 = timestamp.to_rfc3339();
    trace!("converting timestamp {rfc3339}");

    DateTime::parse_from_rfc3339(&rfc3339)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| Error::Internal(format!("timestamp {rfc3339} couldn't be converted: {err}")))
}
