use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::Duration;
use rand::Rng;

use crate::{
    lib::{config::Config, error::BotError, time::{Clock, Time}},
    game::{
        cache::GameStateCache,
        defence::{self, HostileSnapshot, SavedFleetRecord},
        expedition::{self, ExpeditionState, PendingCancel},
        notification::{Notification, NotificationBus},
        remote::RemoteGameClient,
        scheduler::{EventId, Scheduler, WakePayload},
    },
};

/// Delays, in seconds, between successive retries of a decision pass that failed unexpectedly.
/// The last value repeats for any further attempt. Mirrors `bot.bot.OGameBot._exc_retry_delays`.
const RETRY_DELAYS_SECONDS: [u64; 5] = [5, 10, 15, 30, 60];

/// Ties the scheduler, defence subsystem and expedition subsystem into one decision loop.
/// Corresponds to `bot.bot.OGameBot`: a long-lived object that owns no game state itself beyond
/// what it needs to reconcile between passes (the hostile snapshot, saved-fleet records and
/// expedition repeat counters), everything else is re-fetched from the remote client every pass.
pub struct Bot {
    client: Box<dyn RemoteGameClient>,
    scheduler: Scheduler,
    notifications: NotificationBus,
    config: Config,
    running: AtomicBool,
    hostile_snapshot: Mutex<HostileSnapshot>,
    saved_fleets: Mutex<Vec<SavedFleetRecord>>,
    expedition_states: Mutex<Vec<ExpeditionState>>,
    pending_cancel: Mutex<Option<PendingCancel>>,
    defensive_wake: Mutex<Option<EventId>>,
    retry_attempts: AtomicUsize,
    /// Identifies the wake-up a failed pass is being retried under. While set, an ordinary `Wake`
    /// arriving out of turn (e.g. a stale one pushed before the retry was scheduled) is ignored
    /// rather than run concurrently with the retry it would race.
    retry_sentinel: Mutex<Option<EventId>>,
}

impl Bot {
    pub fn new(client: Box<dyn RemoteGameClient>, notifications: NotificationBus, config: Config) -> Self {
        let expedition_states = config
            .expeditions
            .iter()
            .map(|expedition| ExpeditionState { remaining: Some(expedition.repeat), fleet_id: None })
            .collect();
        Bot {
            client,
            scheduler: Scheduler::new(),
            notifications,
            config,
            running: AtomicBool::new(false),
            hostile_snapshot: Mutex::new(HostileSnapshot::default()),
            saved_fleets: Mutex::new(Vec::new()),
            expedition_states: Mutex::new(expedition_states),
            pending_cancel: Mutex::new(None),
            defensive_wake: Mutex::new(None),
            retry_attempts: AtomicUsize::new(0),
            retry_sentinel: Mutex::new(None),
        }
    }

    /// Starting an already-running bot, or stopping an already-stopped one, is a no-op: both are
    /// idempotent so a supervisor can call them without first checking current state.
    pub async fn start(&self, clock: &dyn Clock) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        self.notifications.notify(Notification::BotStarted).await;
        self.scheduler.push_absolute(clock.now(), 0, WakePayload::Wake);
    }

    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        self.notifications.notify(Notification::BotStopped).await;
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Queues a cancellation for the next reconciliation pass. `WakePayload::SendExpedition`
    /// pushed by a caller still forces an immediate pass; `CancelExpedition` routes here instead
    /// of being handled inline by the scheduler consumer, since cancelling needs the same
    /// movement snapshot the rest of the pass already fetches.
    pub fn cancel_expedition(&self, expedition_index: usize, return_fleet: bool) {
        *self.pending_cancel.lock().unwrap() = Some(PendingCancel { expedition_index, return_fleet });
    }

    /// Drives the queue until [`stop`](Bot::stop) is called. Every due `Wake` triggers one full
    /// reconciliation pass. `SendExpedition` wake-ups just force an extra pass sooner than the
    /// defence schedule would have; `CancelExpedition` payloads are folded into the pending
    /// cancellation consumed by the next pass rather than acted on directly, since a cancel
    /// changes what that pass's own dispatch step should do. A pass that is already retrying
    /// ignores any wake-up that is not the one the retry itself scheduled, so a stale wake from
    /// before the failure cannot race the backoff.
    pub async fn run(&self, clock: &dyn Clock) {
        let running = &self.running;
        self.scheduler
            .run(
                clock,
                || running.load(Ordering::SeqCst),
                |id, payload| async move {
                    if let WakePayload::CancelExpedition { expedition_index, return_fleet } = payload {
                        self.cancel_expedition(expedition_index, return_fleet);
                    }
                    let sentinel = *self.retry_sentinel.lock().unwrap();
                    if sentinel.is_some() && sentinel != Some(id) {
                        return;
                    }
                    self.tick_with_retry(clock).await;
                },
            )
            .await;
    }

    /// One reconciliation pass: defence always runs, expeditions run opportunistically.
    /// Returns the notifications raised so a caller (or test) can assert on them directly instead
    /// of only observing side effects on the configured sinks.
    pub async fn tick(&self, clock: &dyn Clock) -> Result<Vec<Notification>, BotError> {
        let cache = GameStateCache::new(self.client.as_ref());
        let now = clock.now();

        let previous = self.hostile_snapshot.lock().unwrap().clone();
        let mut saved_fleets = self.saved_fleets.lock().unwrap().clone();
        let outcome =
            defence::handle_defence(self.client.as_ref(), &cache, &previous, &mut saved_fleets, &self.config, now).await?;
        *self.hostile_snapshot.lock().unwrap() = outcome.snapshot;
        *self.saved_fleets.lock().unwrap() = saved_fleets;

        if let Some(previous_wake) = self.defensive_wake.lock().unwrap().take() {
            self.scheduler.cancel(previous_wake);
        }
        let next_wake_id = if let Some(next_wake) = outcome.next_wake {
            Some(self.scheduler.push_absolute(next_wake, 0, WakePayload::Wake))
        } else {
            let jitter = rand::thread_rng().gen_range(self.config.sleep_min, self.config.sleep_max + 1);
            Some(self.scheduler.push_absolute(now + Duration::seconds(jitter as i64), 0, WakePayload::Wake))
        };
        *self.defensive_wake.lock().unwrap() = next_wake_id;

        let overview = cache.overview().await?;
        let movement = cache.movement().await?;
        let research = cache.research().await?;
        let pending_cancel = self.pending_cancel.lock().unwrap().take();
        let mut states = self.expedition_states.lock().unwrap();
        let expedition_outcome = expedition::handle_expeditions(
            self.client.as_ref(),
            &overview,
            &movement,
            &research,
            &self.config,
            &mut states,
            pending_cancel,
        )
        .await?;
        drop(states);

        let mut notifications = outcome.notifications;
        notifications.extend(expedition_outcome.notifications);
        for notification in &notifications {
            self.notifications.notify(notification.clone()).await;
        }
        self.retry_attempts.store(0, Ordering::SeqCst);
        *self.retry_sentinel.lock().unwrap() = None;
        Ok(notifications)
    }

    /// Runs [`tick`](Bot::tick), retrying with the backoff ladder on unexpected failure instead of
    /// propagating it, and notifying every sink about the retry so an operator can tell a
    /// transient blip from a silent stall. The attempt counter resets to zero on the next
    /// successful tick, so a long-stable bot that later hits one bad patch starts back at the
    /// shortest delay rather than the longest. While a retry is pending, [`run`](Bot::run) records
    /// the scheduled wake-up as the retry sentinel so an unrelated wake cannot jump ahead of it.
    pub async fn tick_with_retry(&self, clock: &dyn Clock) -> Vec<Notification> {
        match self.tick(clock).await {
            Ok(notifications) => notifications,
            Err(err) => {
                let attempt = self.retry_attempts.fetch_add(1, Ordering::SeqCst);
                let delay = RETRY_DELAYS_SECONDS[attempt.min(RETRY_DELAYS_SECONDS.len() - 1)];
                self.notifications.notify_error(&err.to_string()).await;
                let retry_id = self.scheduler.push_absolute(clock.now() + Duration::seconds(delay as i64), 0, WakePayload::Wake);
                *self.retry_sentinel.lock().unwrap() = Some(retry_id);
                vec![Notification::RetryScheduled { attempt: attempt as u32 + 1, delay_seconds: delay as u32, error: err.to_string() }]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game::{planet::Overview, remote::stub::StubRemoteClient},
        lib::time::VirtualClock,
    };

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let client = StubRemoteClient::default();
        *client.overview.lock().unwrap() = Some(Overview { planets: vec![], character_class: None });
        let bot = Bot::new(Box::new(client), NotificationBus::new(vec![]), Config::default());
        let clock = VirtualClock::new(Time::from_epoch_seconds(0));

        bot.start(&clock).await;
        assert!(bot.is_running());
        bot.start(&clock).await;
        assert!(bot.is_running());
    }

    #[tokio::test]
    async fn test_tick_runs_defence_pass_without_error() {
        let client = StubRemoteClient::default();
        *client.overview.lock().unwrap() = Some(Overview { planets: vec![], character_class: None });
        *client.movement.lock().unwrap() = Some(crate::game::fleet::movement::Movement {
            fleets: vec![],
            free_fleet_slots: 1,
            free_expedition_slots: 1,
        });
        let bot = Bot::new(Box::new(client), NotificationBus::new(vec![]), Config::default());
        let clock = VirtualClock::new(Time::from_epoch_seconds(0));

        let result = bot.tick(&clock).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_cancel_expedition_is_consumed_by_next_tick() {
        use crate::{
            game::coordinates::{BodyType, Coordinates},
            lib::config::{ExpeditionConfig, RepeatCount},
        };

        let client = StubRemoteClient::default();
        *client.overview.lock().unwrap() = Some(Overview { planets: vec![], character_class: None });
        *client.movement.lock().unwrap() = Some(crate::game::fleet::movement::Movement {
            fleets: vec![],
            free_fleet_slots: 1,
            free_expedition_slots: 1,
        });

        let mut config = Config::default();
        config.expeditions.push(ExpeditionConfig {
            origin: Coordinates::new(1, 1, 1, BodyType::Planet),
            origin_type: BodyType::Planet,
            dest: Coordinates::new(1, 1, 16, BodyType::Planet),
            ships: Default::default(),
            cargo: Default::default(),
            speed: 10,
            holding_time: 1,
            repeat: RepeatCount::Forever,
        });
        let bot = Bot::new(Box::new(client), NotificationBus::new(vec![]), config);
        let clock = VirtualClock::new(Time::from_epoch_seconds(0));

        bot.cancel_expedition(0, false);
        bot.tick(&clock).await.unwrap();

        assert!(bot.pending_cancel.lock().unwrap().is_none());
        assert_eq!(bot.expedition_states.lock().unwrap()[0].remaining, Some(RepeatCount::Times(0)));
    }
}
