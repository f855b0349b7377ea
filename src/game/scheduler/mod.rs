use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::sync::Mutex;

use tokio::sync::Notify;

use crate::{
    lib::{time::Clock, time::Time, uuid::Id},
};

pub struct EventTag;
/// Handle returned by [`Scheduler::push`]; the only thing a caller needs to cancel an event.
pub type EventId = Id<EventTag>;

/// What a scheduled wake-up asks the decision loop to do. Mirrors the payload union in
/// `bot.protocol` (`WakeUp`, `SendExpedition`, `CancelExpedition`): a closed set of intents the
/// consumer dispatches on, rather than an open-ended callback.
#[derive(Debug, Clone)]
pub enum WakePayload {
    /// Run a full defence/expedition reconciliation pass.
    Wake,
    /// Dispatch the expedition at this index in the configured expedition list.
    SendExpedition { expedition_index: usize },
    /// Cancel the expedition launched from this index, if still outbound. `return_fleet` controls
    /// whether the currently outbound fleet is actively recalled or simply left to finish its
    /// current flight with no further redispatch once it lands.
    CancelExpedition { expedition_index: usize, return_fleet: bool },
}

struct Entry {
    time: Time,
    priority: i32,
    id: EventId,
    payload: WakePayload,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.priority == other.priority
    }
}
impl Eq for Entry {}

impl Ord for Entry {
    /// Reversed so a [`BinaryHeap`] (a max-heap) pops the earliest time, lowest priority first,
    /// matching `heapq`'s natural min-heap ordering on `(time, priority)` tuples.
    fn cmp(&self, other: &Self) -> Ordering {
        other.time.cmp(&self.time).then_with(|| other.priority.cmp(&self.priority))
    }
}
impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Inner {
    heap: BinaryHeap<Entry>,
    cancelled: HashSet<EventId>,
}

/// A priority timer queue. Any thread may [`push`](Scheduler::push) or
/// [`cancel`](Scheduler::cancel); exactly one consumer should drive [`run`](Scheduler::run).
/// Translates `bot.eventloop.Scheduler`'s `heapq` + `threading.RLock` design into an async,
/// `tokio::sync::Notify`-driven wait instead of `Condition.wait(timeout)`.
pub struct Scheduler {
    inner: Mutex<Inner>,
    notify: Notify,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler {
            inner: Mutex::new(Inner { heap: BinaryHeap::new(), cancelled: HashSet::new() }),
            notify: Notify::new(),
        }
    }

    /// Schedule `payload` to fire at `time`. Lower `priority` values run first among events due
    /// at the same instant.
    pub fn push_absolute(&self, time: Time, priority: i32, payload: WakePayload) -> EventId {
        let id = EventId::new();
        let mut inner = self.inner.lock().unwrap();
        let wake_sooner = inner.heap.peek().map_or(true, |top| time < top.time);
        inner.heap.push(Entry { time, priority, id, payload });
        drop(inner);
        if wake_sooner {
            self.notify.notify_one();
        }
        id
    }

    pub fn push(&self, clock: &dyn Clock, delay: chrono::Duration, priority: i32, payload: WakePayload) -> EventId {
        self.push_absolute(clock.now() + delay, priority, payload)
    }

    /// Cancellation is lazy: the entry is marked and skipped when popped, avoiding an O(n) scan
    /// of the heap (the teacher's `GameServerTask::cancel_task` has the same lazy-delete shape).
    pub fn cancel(&self, id: EventId) {
        self.inner.lock().unwrap().cancelled.insert(id);
        self.notify.notify_one();
    }

    /// Drives the queue until `should_continue` returns false. Sleeps until the next due event,
    /// waking early if a new, sooner event is pushed from another thread in the meantime.
    /// `consume` is awaited in place before the next event is considered, so a slow consumer
    /// naturally throttles how fast the queue drains; this is intentional, the decision loop
    /// processes one wake-up at a time by design (§5 single-threaded reconciliation).
    pub async fn run<F, C, Fut>(&self, clock: &dyn Clock, mut should_continue: F, mut consume: C)
    where
        F: FnMut() -> bool,
        C: FnMut(EventId, WakePayload) -> Fut,
        Fut: std::future::Future<Output = ()>,
    {
        while should_continue() {
            let next_due = {
                let mut inner = self.inner.lock().unwrap();
                loop {
                    let top_id = match inner.heap.peek() {
                        Some(top) => top.id,
                        None => break None,
                    };
                    if inner.cancelled.remove(&top_id) {
                        inner.heap.pop();
                        continue;
                    }
                    break Some(inner.heap.peek().unwrap().time);
                }
            };

            match next_due {
                None => {
                    self.notify.notified().await;
                }
                Some(due) => {
                    let now = clock.now();
                    if due > now {
                        let wait = due - now;
                        tokio::select! {
                            _ = tokio::time::sleep(std::time::Duration::from_secs(wait.num_seconds().max(0) as u64)) => {}
                            _ = self.notify.notified() => {}
                        }
                        continue;
                    }
                    let entry = {
                        let mut inner = self.inner.lock().unwrap();
                        inner.heap.pop()
                    };
                    if let Some(entry) = entry {
                        consume(entry.id, entry.payload).await;
                    }
                }
            }
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Scheduler::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lib::time::VirtualClock;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_events_fire_in_time_then_priority_order() {
        let scheduler = Arc::new(Scheduler::new());
        let clock = VirtualClock::new(Time::from_epoch_seconds(0));
        scheduler.push_absolute(Time::from_epoch_seconds(0), 5, WakePayload::Wake);
        scheduler.push_absolute(Time::from_epoch_seconds(0), 1, WakePayload::SendExpedition { expedition_index: 0 });

        let order = Arc::new(Mutex::new(Vec::new()));
        let order_clone = order.clone();
        let mut ticks = 0;
        scheduler
            .run(
                &clock,
                || {
                    ticks += 1;
                    ticks <= 2
                },
                |_id, payload| {
                    order_clone.lock().unwrap().push(format!("{:?}", payload));
                    async {}
                },
            )
            .await;

        let fired = order.lock().unwrap();
        assert_eq!(fired.len(), 2);
        assert!(fired[0].contains("SendExpedition"));
    }

    #[tokio::test]
    async fn test_cancelled_event_is_skipped() {
        let scheduler = Scheduler::new();
        let clock = VirtualClock::new(Time::from_epoch_seconds(0));
        let id = scheduler.push_absolute(Time::from_epoch_seconds(0), 0, WakePayload::Wake);
        scheduler.cancel(id);

        let mut fired = 0;
        let mut ticks = 0;
        scheduler
            .run(
                &clock,
                || {
                    ticks += 1;
                    ticks <= 1
                },
                |_id, _payload| {
                    fired += 1;
                    async {}
                },
            )
            .await;
        assert_eq!(fired, 0);
    }
}
