#![allow(dead_code)]

use httpmock::MockServer;
use model_facade::{FacadeConfig, FacadeError, ModelFacade, ScriptedInteraction};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub type Captured<T> = Arc<Mutex<Option<Result<T, FacadeError>>>>;

/// Facade pointed at `server`, answering prompts with `answers`.
pub fn facade_for(
    server: &MockServer,
    answers: &[&str],
) -> (ModelFacade, Arc<ScriptedInteraction>) {
    let config = FacadeConfig::new(server.url("/"));
    let ui = Arc::new(ScriptedInteraction::with_answers(answers.iter().copied()));
    let facade = ModelFacade::new(&config, ui.clone()).unwrap();
    (facade, ui)
}

/// Registers a listener that counts notifications.
pub fn count_notifications(facade: &ModelFacade) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    facade.on_change(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    count
}

pub fn notifications(count: &Arc<AtomicUsize>) -> usize {
    count.load(Ordering::SeqCst)
}

/// Success and error continuations writing into one shared slot.
pub fn capture<T: Send + 'static>() -> (model_facade::Callbacks<T>, Captured<T>) {
    let slot: Captured<T> = Arc::new(Mutex::new(None));
    let on_ok = Arc::clone(&slot);
    let on_err = Arc::clone(&slot);
    let callbacks = model_facade::Callbacks::on_success(move |value| {
        *on_ok.lock().unwrap() = Some(Ok(value));
    })
    .with_error(move |e| {
        *on_err.lock().unwrap() = Some(Err(e));
    });
    (callbacks, slot)
}

pub fn taken<T>(slot: &Captured<T>) -> Result<T, FacadeError> {
    slot.lock()
        .unwrap()
        .take()
        .expect("no continuation was called")
}
