use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

pub type DriverHandler = Arc<dyn Fn() + Send + Sync>;

/// Client-side handlers that replace the server round trip when a driver is added.
#[derive(Clone, Default)]
pub struct DriverHandlers {
    handlers: Arc<RwLock<HashMap<String, DriverHandler>>>,
}

impl DriverHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`, replacing any previous one.
    pub fn register<F>(&self, name: impl Into<String>, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!("Registering driver handler '{}'", name);
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, Arc::new(handler));
    }

    pub fn get(&self, name: &str) -> Option<DriverHandler> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_register_and_lookup() {
        let handlers = DriverHandlers::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        handlers.register("optimizer", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(handlers.get("solver").is_none());

        let handler = handlers.get("optimizer").unwrap();
        handler();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_register_replaces_previous_handler() {
        let handlers = DriverHandlers::new();
        let hits = Arc::new(AtomicUsize::new(0));

        handlers.register("optimizer", || {});
        let counter = Arc::clone(&hits);
        handlers.register("optimizer", move || {
            counter.fetch_add(10, Ordering::SeqCst);
        });

        (handlers.get("optimizer").unwrap())();
        assert_eq!(hits.load(Ordering::SeqCst), 10);
    }
}
