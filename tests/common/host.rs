//! Recording host implementation.

use async_trait::async_trait;
use autopurge::config::DataType;
use autopurge::host::{
    BrowsingData, EventBus, EventKind, EventSource, Host, HostError, HostEvent, Manifest,
    Notification, Notifier, RemovalReport, RemovalRequest, SettingsStorage,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Ordered record of host calls, e.g. `load`, `subscribe:alarm`, `remove`.
#[derive(Default)]
pub struct CallLog {
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    /// Index of the first call starting with `prefix`.
    pub fn first(&self, prefix: &str) -> Option<usize> {
        self.calls.lock().iter().position(|c| c.starts_with(prefix))
    }

    /// Index of the last call starting with `prefix`.
    pub fn last(&self, prefix: &str) -> Option<usize> {
        self.calls.lock().iter().rposition(|c| c.starts_with(prefix))
    }
}

struct RecordingStorage {
    log: Arc<CallLog>,
    record: Mutex<Option<String>>,
    failure: Mutex<Option<String>>,
    delay: Mutex<Duration>,
}

#[async_trait]
impl SettingsStorage for RecordingStorage {
    async fn read(&self) -> Result<Option<String>, std::io::Error> {
        let delay = *self.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.log.push("load");
        if let Some(message) = self.failure.lock().clone() {
            return Err(std::io::Error::other(message));
        }
        Ok(self.record.lock().clone())
    }
}

struct RecordingData {
    log: Arc<CallLog>,
    fail: Mutex<bool>,
    requests: Mutex<Vec<RemovalRequest>>,
}

#[async_trait]
impl BrowsingData for RecordingData {
    async fn remove(&self, request: &RemovalRequest) -> Result<RemovalReport, HostError> {
        self.log.push("remove");
        self.requests.lock().push(request.clone());
        if *self.fail.lock() {
            return Err(HostError::Rejected("profile in use".to_string()));
        }
        let mut report = RemovalReport::default();
        for data_type in &request.data_types {
            report.removed.insert(*data_type, 1);
        }
        Ok(report)
    }
}

struct RecordingEvents {
    log: Arc<CallLog>,
    bus: EventBus,
    fail_on: Mutex<Option<EventKind>>,
    fail_alarm: Mutex<bool>,
}

impl EventSource for RecordingEvents {
    fn subscribe(&self, kind: EventKind) -> Result<mpsc::UnboundedReceiver<HostEvent>, HostError> {
        self.log.push(format!("subscribe:{kind}"));
        if *self.fail_on.lock() == Some(kind) {
            return Err(HostError::Unsupported("event kind"));
        }
        self.bus.subscribe(kind)
    }

    fn schedule_alarm(&self, name: &str, period: Duration) -> Result<(), HostError> {
        self.log.push(format!("alarm:{name}"));
        if *self.fail_alarm.lock() {
            return Err(HostError::Unsupported("alarms"));
        }
        self.bus.schedule_alarm(name, period)
    }

    fn clear_alarm(&self, name: &str) -> bool {
        self.log.push(format!("clear_alarm:{name}"));
        self.bus.clear_alarm(name)
    }
}

struct RecordingNotifier {
    log: Arc<CallLog>,
    fail: bool,
    sent: Mutex<Vec<Notification>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn create(&self, notification: Notification) -> Result<(), HostError> {
        self.log.push("notify");
        self.sent.lock().push(notification);
        if self.fail {
            return Err(HostError::Rejected("notifications blocked".to_string()));
        }
        Ok(())
    }
}

/// Scriptable host. Configure with the builder methods, then wrap in `Arc`.
pub struct RecordingHost {
    manifest: Manifest,
    pub log: Arc<CallLog>,
    storage: Arc<RecordingStorage>,
    data: Arc<RecordingData>,
    events: Arc<RecordingEvents>,
    notifier: Option<Arc<RecordingNotifier>>,
}

#[allow(dead_code)]
impl RecordingHost {
    pub fn new() -> Self {
        let log = Arc::new(CallLog::default());
        Self {
            manifest: Manifest {
                name: "Test Purger".to_string(),
                version: "0.0.0".to_string(),
                icon: Some("img/icon48.png".to_string()),
            },
            storage: Arc::new(RecordingStorage {
                log: log.clone(),
                record: Mutex::new(None),
                failure: Mutex::new(None),
                delay: Mutex::new(Duration::ZERO),
            }),
            data: Arc::new(RecordingData {
                log: log.clone(),
                fail: Mutex::new(false),
                requests: Mutex::new(Vec::new()),
            }),
            events: Arc::new(RecordingEvents {
                log: log.clone(),
                bus: EventBus::new(),
                fail_on: Mutex::new(None),
                fail_alarm: Mutex::new(false),
            }),
            notifier: Some(Arc::new(RecordingNotifier {
                log: log.clone(),
                fail: false,
                sent: Mutex::new(Vec::new()),
            })),
            log,
        }
    }

    pub fn with_settings(self, record: &str) -> Self {
        self.store_settings(record);
        self
    }

    pub fn failing_load(self, message: &str) -> Self {
        *self.storage.failure.lock() = Some(message.to_string());
        self
    }

    pub fn with_load_delay(self, delay: Duration) -> Self {
        *self.storage.delay.lock() = delay;
        self
    }

    pub fn failing_subscribe(self, kind: EventKind) -> Self {
        *self.events.fail_on.lock() = Some(kind);
        self
    }

    pub fn failing_alarm(self) -> Self {
        *self.events.fail_alarm.lock() = true;
        self
    }

    pub fn failing_removal(self) -> Self {
        *self.data.fail.lock() = true;
        self
    }

    pub fn failing_notifier(mut self) -> Self {
        self.notifier = Some(Arc::new(RecordingNotifier {
            log: self.log.clone(),
            fail: true,
            sent: Mutex::new(Vec::new()),
        }));
        self
    }

    pub fn without_notifier(mut self) -> Self {
        self.notifier = None;
        self
    }

    /// Replace the persisted record, as an options page would.
    pub fn store_settings(&self, record: &str) {
        *self.storage.record.lock() = Some(record.to_string());
    }

    /// Deliver an event to subscribed listeners.
    pub fn publish(&self, event: HostEvent) -> usize {
        self.events.bus.publish(event)
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.events.bus.listener_count(kind)
    }

    pub fn has_alarm(&self, name: &str) -> bool {
        self.events.bus.has_alarm(name)
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifier
            .as_ref()
            .map(|n| n.sent.lock().clone())
            .unwrap_or_default()
    }

    pub fn removal_requests(&self) -> Vec<RemovalRequest> {
        self.data.requests.lock().clone()
    }

    pub fn removed_types(&self) -> Vec<DataType> {
        self.removal_requests()
            .into_iter()
            .flat_map(|r| r.data_types)
            .collect()
    }
}

impl Host for RecordingHost {
    fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    fn settings_storage(&self) -> Arc<dyn SettingsStorage> {
        self.storage.clone()
    }

    fn browsing_data(&self) -> Arc<dyn BrowsingData> {
        self.data.clone()
    }

    fn events(&self) -> Arc<dyn EventSource> {
        self.events.clone()
    }

    fn notifier(&self) -> Option<Arc<dyn Notifier>> {
        self.notifier
            .as_ref()
            .map(|n| Arc::clone(n) as Arc<dyn Notifier>)
    }
}
