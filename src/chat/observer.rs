//! Event observers and the fan-out set that notifies them.

use crate::protocol::TextMessage;
use parking_lot::RwLock;
use std::sync::Arc;

/// Receives events produced by a [`ChatClient`](crate::ChatClient).
///
/// Methods are called synchronously on the dispatcher task, so
/// implementations should return quickly. Every method has an empty default.
pub trait ChatObserver: Send + Sync {
    /// A login attempt finished. On success `message` is the full server line,
    /// on failure it is the server's error text.
    fn on_login_result(&self, _success: bool, _message: &str) {}

    /// The connection was closed, locally or by the server.
    fn on_disconnect(&self) {}

    fn on_user_list(&self, _usernames: &[String]) {}

    fn on_message_received(&self, _message: &TextMessage) {}

    /// The server could not deliver a message we sent.
    fn on_message_error(&self, _message: &str) {}

    /// The server did not understand a command we sent.
    fn on_command_error(&self, _message: &str) {}

    fn on_supported_commands(&self, _commands: &[String]) {}
}

/// The set of registered observers.
///
/// Membership is by identity (`Arc` pointer). Notifications iterate a
/// snapshot, so observers may be added or removed from other threads while a
/// notification is in flight.
#[derive(Default)]
pub struct ObserverSet {
    observers: RwLock<Vec<Arc<dyn ChatObserver>>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Returns `false` if it was already registered.
    pub fn add(&self, observer: Arc<dyn ChatObserver>) -> bool {
        let mut observers = self.observers.write();
        if observers.iter().any(|o| Arc::ptr_eq(o, &observer)) {
            return false;
        }
        observers.push(observer);
        true
    }

    /// Unregister an observer. Returns `false` if it was not registered.
    pub fn remove(&self, observer: &Arc<dyn ChatObserver>) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|o| !Arc::ptr_eq(o, observer));
        observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }

    pub(crate) fn notify_login_result(&self, success: bool, message: &str) {
        self.for_each(|o| o.on_login_result(success, message));
    }

    pub(crate) fn notify_disconnect(&self) {
        self.for_each(|o| o.on_disconnect());
    }

    pub(crate) fn notify_user_list(&self, usernames: &[String]) {
        self.for_each(|o| o.on_user_list(usernames));
    }

    pub(crate) fn notify_message_received(&self, message: &TextMessage) {
        self.for_each(|o| o.on_message_received(message));
    }

    pub(crate) fn notify_message_error(&self, message: &str) {
        self.for_each(|o| o.on_message_error(message));
    }

    pub(crate) fn notify_command_error(&self, message: &str) {
        self.for_each(|o| o.on_command_error(message));
    }

    pub(crate) fn notify_supported_commands(&self, commands: &[String]) {
        self.for_each(|o| o.on_supported_commands(commands));
    }

    fn for_each(&self, notify: impl Fn(&dyn ChatObserver)) {
        // The lock is released before any observer runs, so an observer may
        // (un)register itself or others from inside a callback.
        let snapshot = self.observers.read().clone();
        for observer in &snapshot {
            notify(observer.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter {
        disconnects: AtomicUsize,
        errors: AtomicUsize,
    }

    impl ChatObserver for Counter {
        fn on_disconnect(&self) {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
        }

        fn on_command_error(&self, _message: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn duplicates_are_rejected() {
        let set = ObserverSet::new();
        let counter = Arc::new(Counter::default());
        let observer: Arc<dyn ChatObserver> = counter.clone();

        assert!(set.add(observer.clone()));
        assert!(!set.add(observer.clone()));
        assert_eq!(set.len(), 1);

        set.notify_disconnect();
        assert_eq!(counter.disconnects.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn removed_observer_is_not_notified() {
        let set = ObserverSet::new();
        let kept = Arc::new(Counter::default());
        let removed = Arc::new(Counter::default());
        let removed_dyn: Arc<dyn ChatObserver> = removed.clone();

        set.add(kept.clone());
        set.add(removed_dyn.clone());
        assert!(set.remove(&removed_dyn));
        assert!(!set.remove(&removed_dyn));

        set.notify_command_error("nope");
        assert_eq!(kept.errors.load(Ordering::SeqCst), 1);
        assert_eq!(removed.errors.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn observer_can_unregister_during_notification() {
        struct SelfRemoving {
            set: Arc<ObserverSet>,
            me: parking_lot::Mutex<Option<Arc<dyn ChatObserver>>>,
            calls: AtomicUsize,
        }

        impl ChatObserver for SelfRemoving {
            fn on_disconnect(&self) {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if let Some(me) = self.me.lock().take() {
                    self.set.remove(&me);
                }
            }
        }

        let set = Arc::new(ObserverSet::new());
        let observer = Arc::new(SelfRemoving {
            set: set.clone(),
            me: parking_lot::Mutex::new(None),
            calls: AtomicUsize::new(0),
        });
        let as_dyn: Arc<dyn ChatObserver> = observer.clone();
        *observer.me.lock() = Some(as_dyn.clone());
        set.add(as_dyn);

        set.notify_disconnect();
        set.notify_disconnect();
        assert_eq!(observer.calls.load(Ordering::SeqCst), 1);
        assert!(set.is_empty());
    }

    #[test]
    fn concurrent_registration_while_notifying() {
        let set = Arc::new(ObserverSet::new());
        let counter = Arc::new(Counter::default());
        set.add(counter.clone());

        let writer = {
            let set = set.clone();
            std::thread::spawn(move || {
                for _ in 0..500 {
                    let extra: Arc<dyn ChatObserver> = Arc::new(Counter::default());
                    set.add(extra.clone());
                    set.remove(&extra);
                }
            })
        };
        for _ in 0..500 {
            set.notify_disconnect();
        }
        writer.join().unwrap();

        assert_eq!(counter.disconnects.load(Ordering::SeqCst), 500);
        assert_eq!(set.len(), 1);
    }
}
