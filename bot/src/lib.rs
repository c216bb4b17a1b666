#![warn(
    clippy::cognitive_complexity,
    clippy::missing_const_for_fn,
    clippy::option_if_let_else
)]

//! Expands discord message links into previews of the linked message.

pub mod config;
pub mod errors;
pub mod handler;
pub mod structs;
mod utils;
