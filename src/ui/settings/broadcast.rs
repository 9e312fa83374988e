use super::data::Settings;
use async_channel::{Receiver, Sender, TrySendError};
use tracing::debug;

/// Fan-out of `settings_changed` snapshots to registered subscribers.
#[derive(Debug, Default)]
pub struct SettingsBroadcast {
    subscribers: Vec<Sender<Settings>>,
}

impl SettingsBroadcast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<Settings> {
        let (tx, rx) = async_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Delivers `settings` to every live subscriber and drops the ones whose
    /// receiver is gone.
    pub fn emit(&mut self, settings: &Settings) {
        self.subscribers
            .retain(|tx| match tx.try_send(settings.clone()) {
                Ok(()) => true,
                Err(TrySendError::Closed(_)) => {
                    debug!("[settings] dropping closed subscriber");
                    false
                }
                // Unbounded channels never report full.
                Err(TrySendError::Full(_)) => true,
            });
    }
}
