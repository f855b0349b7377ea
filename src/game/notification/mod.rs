use async_trait::async_trait;
use log::error;

use crate::{
    lib::time::Time,
    game::{coordinates::Coordinates, fleet::movement::ShipGroup, planet::PlanetId},
};

/// Every event the bot can report to the outside world. Mirrors the `Notify*` dataclass family
/// in `bot.protocol`: one variant per distinct situation a human operator would want to hear
/// about, carrying exactly the fields needed to describe it without re-fetching state.
#[derive(Debug, Clone)]
pub enum Notification {
    BotStarted,
    BotStopped,
    HostileEventDetected { planet: PlanetId, origin: Coordinates, arrival_time: Time },
    HostileEventRecalled { planet: PlanetId, origin: Coordinates },
    PlanetsSafe,
    FleetSaved { planet: PlanetId, destination: Coordinates, ships: ShipGroup },
    FleetSaveFailed { planet: PlanetId, reason: String },
    FleetRecalled { planet: PlanetId },
    SavedFleetRecalled { planet: PlanetId, origin: Coordinates },
    ExpeditionFinished { expedition_index: usize, origin: Coordinates, dest: Coordinates, estimated_finds: u8 },
    ExpeditionCancelled { expedition_index: usize, return_fleet: bool, reason: String },
    DebrisHarvest { destination: Coordinates, debris: u64, shortfall: Option<String> },
    RetryScheduled { attempt: u32, delay_seconds: u32, error: String },
}

/// A destination for notifications. Mirrors `bot.listeners.Listener`'s split between formatting
/// (which varies per sink) and transport (delivery, which can fail independently of formatting).
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, notification: &Notification);

    /// Called when the decision loop itself fails unexpectedly, outside of any single
    /// notification; sinks that page a human typically treat this more urgently than a routine
    /// notification.
    async fn notify_error(&self, error: &str) {
        error!("unhandled notification sink error: {}", error);
    }
}

/// Writes every notification to the log at `info` level. Always installed, even when the operator
/// has configured a webhook sink, so the log remains a complete record regardless of delivery
/// failures downstream.
pub struct LoggingSink;

#[async_trait]
impl NotificationSink for LoggingSink {
    async fn notify(&self, notification: &Notification) {
        log::info!("{:?}", notification);
    }

    async fn notify_error(&self, error: &str) {
        log::error!("{}", error);
    }
}

/// Fans a single notification out to every configured sink. A sink that fails logs its own error
/// and does not prevent the others from receiving the notification.
pub struct NotificationBus {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl NotificationBus {
    pub fn new(sinks: Vec<Box<dyn NotificationSink>>) -> Self {
        NotificationBus { sinks }
    }

    pub async fn notify(&self, notification: Notification) {
        for sink in &self.sinks {
            sink.notify(&notification).await;
        }
    }

    pub async fn notify_error(&self, error: &str) {
        for sink in &self.sinks {
            sink.notify_error(error).await;
        }
    }
}

/// Posts each notification as JSON to a fixed URL. Mirrors `bot.listeners.TelegramListener`'s
/// split between rendering a message and handing it to a transport: rendering happens here via
/// `Debug`/`serde`, delivery failures are logged rather than propagated since a flaky webhook must
/// never stall the decision loop.
pub struct WebhookSink {
    http: reqwest::Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: String) -> Self {
        WebhookSink { http: reqwest::Client::new(), url }
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn notify(&self, notification: &Notification) {
        let body = format!("{:?}", notification);
        if let Err(err) = self.http.post(&self.url).body(body).send().await {
            error!("webhook delivery failed: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingSink(Arc<Mutex<Vec<String>>>);

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn notify(&self, notification: &Notification) {
            self.0.lock().unwrap().push(format!("{:?}", notification));
        }
    }

    #[tokio::test]
    async fn test_bus_fans_out_to_every_sink() {
        let received_a = Arc::new(Mutex::new(Vec::new()));
        let received_b = Arc::new(Mutex::new(Vec::new()));
        let bus = NotificationBus::new(vec![
            Box::new(RecordingSink(received_a.clone())),
            Box::new(RecordingSink(received_b.clone())),
        ]);

        bus.notify(Notification::PlanetsSafe).await;

        assert_eq!(received_a.lock().unwrap().len(), 1);
        assert_eq!(received_b.lock().unwrap().len(), 1);
    }
}
