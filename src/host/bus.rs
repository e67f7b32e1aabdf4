//! In-process event bus with interval alarms.

use super::{EventKind, EventSource, HostError, HostEvent};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::debug;

type Listeners = Arc<Mutex<HashMap<EventKind, Vec<mpsc::UnboundedSender<HostEvent>>>>>;

/// Publish/subscribe hub standing in for the browser's event APIs.
///
/// Alarms are tokio tasks publishing [`HostEvent::Alarm`] on every period.
#[derive(Default)]
pub struct EventBus {
    listeners: Listeners,
    alarms: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event to every live listener of its kind. Returns how many
    /// listeners received it.
    pub fn publish(&self, event: HostEvent) -> usize {
        deliver(&self.listeners, event)
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .lock()
            .get(&kind)
            .map(|senders| senders.iter().filter(|tx| !tx.is_closed()).count())
            .unwrap_or(0)
    }

    pub fn has_alarm(&self, name: &str) -> bool {
        self.alarms.lock().contains_key(name)
    }
}

fn deliver(listeners: &Listeners, event: HostEvent) -> usize {
    let mut map = listeners.lock();
    let Some(senders) = map.get_mut(&event.kind()) else {
        return 0;
    };
    senders.retain(|tx| tx.send(event.clone()).is_ok());
    senders.len()
}

impl EventSource for EventBus {
    fn subscribe(&self, kind: EventKind) -> Result<mpsc::UnboundedReceiver<HostEvent>, HostError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.lock().entry(kind).or_default().push(tx);
        Ok(rx)
    }

    fn schedule_alarm(&self, name: &str, period: Duration) -> Result<(), HostError> {
        if period.is_zero() {
            return Err(HostError::Rejected(format!("alarm {name} has a zero period")));
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| HostError::Unsupported("alarms outside a tokio runtime"))?;

        let listeners = Arc::clone(&self.listeners);
        let alarm = name.to_string();
        let handle = runtime.spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            loop {
                ticks.tick().await;
                let delivered = deliver(&listeners, HostEvent::Alarm(alarm.clone()));
                debug!(alarm = %alarm, delivered, "Alarm fired");
            }
        });

        if let Some(previous) = self.alarms.lock().insert(name.to_string(), handle) {
            previous.abort();
        }
        Ok(())
    }

    fn clear_alarm(&self, name: &str) -> bool {
        match self.alarms.lock().remove(name) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for EventBus {
    fn drop(&mut self) {
        for (_, handle) in self.alarms.get_mut().drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_reaches_only_matching_kind() {
        let bus = EventBus::new();
        let mut clicks = bus.subscribe(EventKind::ActionClicked).unwrap();
        let mut closes = bus.subscribe(EventKind::AllWindowsClosed).unwrap();

        assert_eq!(bus.publish(HostEvent::ActionClicked), 1);
        assert_eq!(clicks.recv().await, Some(HostEvent::ActionClicked));
        assert!(closes.try_recv().is_err());
    }

    #[tokio::test]
    async fn dropped_listeners_are_pruned() {
        let bus = EventBus::new();
        let rx = bus.subscribe(EventKind::SettingsChanged).unwrap();
        assert_eq!(bus.listener_count(EventKind::SettingsChanged), 1);
        drop(rx);
        assert_eq!(bus.publish(HostEvent::SettingsChanged), 0);
        assert_eq!(bus.listener_count(EventKind::SettingsChanged), 0);
    }

    #[tokio::test]
    async fn alarm_fires_periodically() {
        let bus = EventBus::new();
        let mut alarms = bus.subscribe(EventKind::Alarm).unwrap();
        bus.schedule_alarm("purge", Duration::from_millis(10)).unwrap();

        for _ in 0..2 {
            let event = tokio::time::timeout(Duration::from_secs(2), alarms.recv())
                .await
                .unwrap();
            assert_eq!(event, Some(HostEvent::Alarm("purge".to_string())));
        }
    }

    #[tokio::test]
    async fn clear_alarm_cancels_it() {
        let bus = EventBus::new();
        bus.schedule_alarm("purge", Duration::from_secs(3600)).unwrap();
        assert!(bus.has_alarm("purge"));
        assert!(bus.clear_alarm("purge"));
        assert!(!bus.has_alarm("purge"));
        assert!(!bus.clear_alarm("purge"));
    }

    #[tokio::test]
    async fn zero_period_is_rejected() {
        let bus = EventBus::new();
        let err = bus.schedule_alarm("purge", Duration::ZERO).unwrap_err();
        assert!(matches!(err, HostError::Rejected(_)));
    }

    #[test]
    fn alarm_needs_a_runtime() {
        let bus = EventBus::new();
        let err = bus
            .schedule_alarm("purge", Duration::from_secs(60))
            .unwrap_err();
        assert!(matches!(err, HostError::Unsupported(_)));
    }
}
