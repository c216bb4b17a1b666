pub mod card;
pub mod event;
pub mod source;

pub use card::{Card, CardAuthor, CardFooter, CardImage, MAX_CARDS_PER_POST};
pub use event::{PostedMessage, ReactionEvent, TriggerMessage};
pub use source::{SourceAttachment, SourceAuthor, SourceChannel, SourceMessage};
