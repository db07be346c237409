use serde_json::Value;

use crate::events::bus::NotificationBus;
use crate::events::host::{HostBridge, HostEvent, HostVerdict};
use crate::events::kind::NotificationKind;
use crate::events::notification::{EventDetail, Notification};
use crate::snapshot::Snapshot;

/// Builds notifications and dispatches them synchronously.
///
/// The emitter never performs the default action. Callers inspect
/// `Notification::is_vetoed` on the returned value and act on it.
#[derive(Default)]
pub struct NotificationEmitter {
    bus: NotificationBus,
    hosts: Vec<Box<dyn HostBridge>>,
}

impl NotificationEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bus_mut(&mut self) -> &mut NotificationBus {
        &mut self.bus
    }

    /// Adds a host forwarder; it runs after the in-process listeners.
    pub fn attach_host(&mut self, bridge: impl HostBridge + 'static) {
        self.hosts.push(Box::new(bridge));
    }

    pub fn emit(
        &mut self,
        kind: NotificationKind,
        detail: EventDetail,
        data: Value,
        snapshot: Snapshot,
    ) -> Notification {
        let notification = Notification::new(kind, detail, data, snapshot);
        tracing::debug!(
            kind = kind.name(),
            cancelable = notification.is_cancelable(),
            "emitting notification"
        );

        self.bus.dispatch(&notification);

        let event = HostEvent::from_notification(&notification);
        for host in &mut self.hosts {
            if host.forward(&event) == HostVerdict::PreventDefault {
                notification.prevent_default();
            }
        }

        if notification.is_vetoed() {
            tracing::debug!(kind = kind.name(), "notification vetoed");
        }
        notification
    }
}
