//! Local host runtime assembled from [`HostConfig`].

use super::{
    BrowsingData, EventBus, EventSource, FileSettingsStorage, Host, LogNotifier, Manifest,
    Notifier, ProfileData, SettingsStorage,
};
use crate::config::HostConfig;
use std::sync::Arc;

/// Filesystem profile, TOML settings file, in-process event bus and an
/// optional log notifier.
pub struct LocalHost {
    manifest: Manifest,
    storage: Arc<FileSettingsStorage>,
    profile: Arc<ProfileData>,
    bus: Arc<EventBus>,
    notifier: Option<Arc<LogNotifier>>,
}

impl LocalHost {
    pub fn from_config(config: &HostConfig) -> Self {
        Self {
            manifest: Manifest {
                name: config.extension.name.clone(),
                version: config.extension.version.clone(),
                icon: config.extension.icon.clone(),
            },
            storage: Arc::new(FileSettingsStorage::new(&config.settings_path)),
            profile: Arc::new(ProfileData::new(&config.profile_dir)),
            bus: Arc::new(EventBus::new()),
            notifier: config.notifications.then(|| Arc::new(LogNotifier::new())),
        }
    }

    /// The bus, for feeding externally observed events (signals) in.
    pub fn bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.bus)
    }
}

impl Host for LocalHost {
    fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    fn settings_storage(&self) -> Arc<dyn SettingsStorage> {
        self.storage.clone()
    }

    fn browsing_data(&self) -> Arc<dyn BrowsingData> {
        self.profile.clone()
    }

    fn events(&self) -> Arc<dyn EventSource> {
        self.bus.clone()
    }

    fn notifier(&self) -> Option<Arc<dyn Notifier>> {
        self.notifier
            .as_ref()
            .map(|notifier| Arc::clone(notifier) as Arc<dyn Notifier>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifier_follows_config() {
        let mut config = HostConfig::default();
        assert!(LocalHost::from_config(&config).notifier().is_some());

        config.notifications = false;
        assert!(LocalHost::from_config(&config).notifier().is_none());
    }

    #[test]
    fn manifest_comes_from_extension_block() {
        let mut config = HostConfig::default();
        config.extension.name = "Purger".to_string();
        let host = LocalHost::from_config(&config);
        assert_eq!(host.manifest().name, "Purger");
        assert_eq!(host.manifest().icon.as_deref(), Some("img/icon48.png"));
    }
}
