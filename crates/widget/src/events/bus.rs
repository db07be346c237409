use std::panic::{self, AssertUnwindSafe};

use snafu::Whatever;

use crate::events::kind::NotificationKind;
use crate::events::notification::Notification;

pub type ListenerResult = Result<(), Whatever>;

type Listener = Box<dyn FnMut(&Notification) -> ListenerResult>;

/// Handle returned by `subscribe`, used to remove the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Filter {
    Kind(NotificationKind),
    All,
}

impl Filter {
    fn matches(self, kind: NotificationKind) -> bool {
        match self {
            Self::Kind(wanted) => wanted == kind,
            Self::All => true,
        }
    }
}

struct Registration {
    id: ListenerId,
    filter: Filter,
    listener: Listener,
}

/// In-process publish/subscribe registry scoped to one widget instance.
#[derive(Default)]
pub struct NotificationBus {
    registrations: Vec<Registration>,
    next_id: u64,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, kind: NotificationKind, listener: F) -> ListenerId
    where
        F: FnMut(&Notification) -> ListenerResult + 'static,
    {
        self.register(Filter::Kind(kind), Box::new(listener))
    }

    /// Registers a listener for every kind, e.g. a host forwarder.
    pub fn subscribe_all<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&Notification) -> ListenerResult + 'static,
    {
        self.register(Filter::All, Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|registration| registration.id != id);
        self.registrations.len() != before
    }

    pub fn listener_count(&self, kind: NotificationKind) -> usize {
        self.registrations
            .iter()
            .filter(|registration| registration.filter.matches(kind))
            .count()
    }

    /// Runs every matching listener to completion, in registration order.
    ///
    /// A failing or panicking listener is logged and skipped; later listeners
    /// still run.
    pub fn dispatch(&mut self, notification: &Notification) {
        let kind = notification.kind();
        for registration in self
            .registrations
            .iter_mut()
            .filter(|registration| registration.filter.matches(kind))
        {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                (registration.listener)(notification)
            }));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    tracing::warn!(
                        "listener {:?} failed on '{}': {}",
                        registration.id,
                        kind,
                        error
                    );
                }
                Err(_) => {
                    tracing::warn!("listener {:?} panicked on '{}'", registration.id, kind);
                }
            }
        }
    }

    fn register(&mut self, filter: Filter, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration {
            id,
            filter,
            listener,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::Value;
    use snafu::whatever;

    use super::*;
    use crate::events::notification::EventDetail;
    use crate::snapshot::Snapshot;

    fn notification(kind: NotificationKind) -> Notification {
        Notification::new(kind, EventDetail::default(), Value::Null, Snapshot::default())
    }

    #[test]
    fn listeners_run_in_registration_order_for_their_kind() {
        let mut bus = NotificationBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for label in ["first", "second"] {
            let seen = Rc::clone(&seen);
            bus.subscribe(NotificationKind::ShowToast, move |_| {
                seen.borrow_mut().push(label);
                Ok(())
            });
        }
        let other = Rc::clone(&seen);
        bus.subscribe(NotificationKind::DismissToast, move |_| {
            other.borrow_mut().push("dismiss");
            Ok(())
        });

        bus.dispatch(&notification(NotificationKind::ShowToast));
        assert_eq!(*seen.borrow(), ["first", "second"]);
    }

    #[test]
    fn failing_listeners_do_not_stop_dispatch() {
        let mut bus = NotificationBus::new();
        let reached = Rc::new(RefCell::new(false));

        bus.subscribe(NotificationKind::ChangePath, |_| whatever!("listener exploded"));
        bus.subscribe(NotificationKind::ChangePath, |_| panic!("listener panicked"));
        let flag = Rc::clone(&reached);
        bus.subscribe(NotificationKind::ChangePath, move |notification| {
            notification.prevent_default();
            *flag.borrow_mut() = true;
            Ok(())
        });

        let change = notification(NotificationKind::ChangePath);
        bus.dispatch(&change);

        assert!(*reached.borrow());
        assert!(change.is_vetoed());
    }

    #[test]
    fn unsubscribe_removes_only_that_listener() {
        let mut bus = NotificationBus::new();
        let first = bus.subscribe(NotificationKind::ToggleAudio, |_| Ok(()));
        bus.subscribe_all(|_| Ok(()));

        assert_eq!(bus.listener_count(NotificationKind::ToggleAudio), 2);
        assert_eq!(bus.listener_count(NotificationKind::ToggleVoice), 1);

        assert!(bus.unsubscribe(first));
        assert!(!bus.unsubscribe(first));
        assert_eq!(bus.listener_count(NotificationKind::ToggleAudio), 1);
    }
}
