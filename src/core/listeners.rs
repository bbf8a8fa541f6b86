use crate::domain::model::NotifySummary;
use crate::domain::ports::ModelListener;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock, Weak};

#[derive(Clone)]
enum ListenerSlot {
    Strong(Arc<dyn ModelListener>),
    Weak(Weak<dyn ModelListener>),
}

/// Append-only list of change listeners, notified in registration order.
///
/// Listeners are isolated from each other: an `Err` or a panic from one is
/// logged and the rest still run. A weak listener whose owner is gone stays in
/// the list and is skipped on every notification.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    slots: Arc<RwLock<Vec<ListenerSlot>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener<L: ModelListener + 'static>(&self, listener: L) {
        self.push(ListenerSlot::Strong(Arc::new(listener)));
    }

    /// Registers without keeping `listener` alive.
    pub fn add_weak_listener<L: ModelListener + 'static>(&self, listener: &Arc<L>) {
        let weak: Weak<L> = Arc::downgrade(listener);
        self.push(ListenerSlot::Weak(weak));
    }

    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.add_listener(callback);
    }

    pub fn len(&self) -> usize {
        self.slots.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn notify_listeners(&self) -> NotifySummary {
        // Snapshot so listeners may register more listeners while running.
        let slots = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut summary = NotifySummary::default();
        for (index, slot) in slots.iter().enumerate() {
            let listener = match slot {
                ListenerSlot::Strong(listener) => Arc::clone(listener),
                ListenerSlot::Weak(weak) => match weak.upgrade() {
                    Some(listener) => listener,
                    None => {
                        tracing::error!(
                            "Listener #{} is no longer available, skipping notification",
                            index
                        );
                        summary.skipped += 1;
                        continue;
                    }
                },
            };

            match panic::catch_unwind(AssertUnwindSafe(|| listener.model_changed())) {
                Ok(Ok(())) => summary.delivered += 1,
                Ok(Err(e)) => {
                    tracing::error!("Listener #{} failed: {:#}", index, e);
                    summary.failed += 1;
                }
                Err(payload) => {
                    tracing::error!(
                        "Listener #{} panicked: {}",
                        index,
                        panic_message(payload.as_ref())
                    );
                    summary.failed += 1;
                }
            }
        }

        tracing::debug!(
            "🔔 Notified listeners: {} delivered, {} skipped, {} failed",
            summary.delivered,
            summary.skipped,
            summary.failed
        );
        summary
    }

    fn push(&self, slot: ListenerSlot) {
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(slot);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn recorder(log: &Arc<Mutex<Vec<usize>>>, id: usize) -> impl Fn() -> anyhow::Result<()> {
        let log = Arc::clone(log);
        move || {
            log.lock().unwrap().push(id);
            Ok(())
        }
    }

    #[test]
    fn test_notifies_each_listener_once_in_order() {
        let registry = ListenerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for id in 0..5 {
            registry.on_change(recorder(&log, id));
        }

        let summary = registry.notify_listeners();

        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(summary.delivered, 5);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_same_listener_registered_twice_runs_twice() {
        let registry = ListenerRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        let listener = {
            let count = Arc::clone(&count);
            move || -> anyhow::Result<()> {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        };
        registry.on_change(listener.clone());
        registry.on_change(listener);

        registry.notify_listeners();

        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_dropped_weak_listener_is_skipped() {
        struct Widget {
            hits: Arc<AtomicUsize>,
        }

        impl ModelListener for Widget {
            fn model_changed(&self) -> anyhow::Result<()> {
                self.hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let registry = ListenerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let hits = Arc::new(AtomicUsize::new(0));

        let widget = Arc::new(Widget {
            hits: Arc::clone(&hits),
        });
        registry.add_weak_listener(&widget);
        registry.on_change(recorder(&log, 1));

        registry.notify_listeners();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        drop(widget);
        let summary = registry.notify_listeners();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(*log.lock().unwrap(), vec![1, 1]);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.delivered, 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_failing_and_panicking_listeners_are_isolated() {
        let registry = ListenerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        registry.on_change(|| Err(anyhow::anyhow!("widget is broken")));
        registry.on_change(|| panic!("widget exploded"));
        registry.on_change(recorder(&log, 7));

        let summary = registry.notify_listeners();

        assert_eq!(*log.lock().unwrap(), vec![7]);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.delivered, 1);
    }

    #[test]
    fn test_listener_may_register_another_listener() {
        let registry = ListenerRegistry::new();
        let inner = registry.clone();
        registry.on_change(move || {
            inner.on_change(|| Ok(()));
            Ok(())
        });

        let first = registry.notify_listeners();

        assert_eq!(first.delivered, 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_empty_registry() {
        let registry = ListenerRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.notify_listeners(), NotifySummary::default());
    }
}
