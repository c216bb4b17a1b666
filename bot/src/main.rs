use expander::config::Config;
use expander::handler::{Expander, Handler};

use log::LevelFilter;
use log::{error, info};
use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use simple_logger::SimpleLogger;
use time::UtcOffset;

use std::env;
use std::process;

fn load_config() -> Config {
    match Config::from_env() {
        Ok(config) => {
            info!("sucessfully loaded config");
            config
        }
        Err(why) => {
            error!("Failed to load config, exiting {why}");
            process::exit(-1);
        }
    }
}

#[tokio::main]
async fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .with_module_level("expander", LevelFilter::Debug)
        .with_module_level("links", LevelFilter::Debug)
        .with_utc_offset(UtcOffset::UTC)
        .init()
        .unwrap();
    // Configure the client with your Discord bot token in the environment.
    let token = env::var("DISCORD_TOKEN").expect("Expected a token in the environment");
    let config = load_config();

    let intents = GatewayIntents::GUILDS
        .union(GatewayIntents::GUILD_MESSAGES)
        .union(GatewayIntents::GUILD_MESSAGE_REACTIONS)
        .union(GatewayIntents::MESSAGE_CONTENT);

    let mut client = Client::builder(&token, intents)
        .event_handler(Handler::new(Expander::new(config)))
        .await
        .expect("Err creating client");

    // Shards will automatically attempt to reconnect, and will perform
    // exponential backoff until it reconnects.
    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }
}
