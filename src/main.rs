mod game;
mod lib;

use std::time::Duration;

use lib::{config::{Config, ListenerConfig}, time::SystemClock};
use game::{
    bot::Bot,
    notification::{LoggingSink, NotificationBus, NotificationSink},
    remote::HttpRemoteClient,
};

fn listener_sinks(config: &Config) -> Vec<Box<dyn NotificationSink>> {
    let mut sinks: Vec<Box<dyn NotificationSink>> = vec![Box::new(LoggingSink)];
    for (name, listener) in &config.listeners {
        match listener {
            // Already covered unconditionally above, named entries of kind `log` just document
            // intent in the config file.
            ListenerConfig::Log => {}
            ListenerConfig::Webhook { url } => {
                log::info!("registering webhook listener '{}' -> {}", name, url);
                sinks.push(Box::new(game::notification::WebhookSink::new(url.clone())));
            }
        }
    }
    sinks
}

#[tokio::main]
async fn main() -> Result<(), lib::error::BotError> {
    std::env::set_var("RUST_LOG", "ogame_sentry=info");
    env_logger::init();

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "bot.toml".to_string());
    let config = Config::load(&config_path)?;

    let client = HttpRemoteClient::new(&config.remote, Duration::from_secs(config.request_timeout))?;
    let notifications = NotificationBus::new(listener_sinks(&config));
    let bot = Bot::new(Box::new(client), notifications, config);

    let clock = SystemClock::default();
    bot.start(&clock).await;
    bot.run(&clock).await;
    Ok(())
}
