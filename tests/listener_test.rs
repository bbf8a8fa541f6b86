mod common;

use common::facade_for;
use httpmock::prelude::*;
use model_facade::{Callbacks, ModelListener};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

struct TreeView {
    name: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl ModelListener for TreeView {
    fn model_changed(&self) -> anyhow::Result<()> {
        self.log.lock().unwrap().push(self.name);
        Ok(())
    }
}

#[tokio::test]
async fn test_listeners_run_in_registration_order_after_change() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/command");
        then.status(200);
    });

    let (facade, _) = facade_for(&server, &[]);
    let log = Arc::new(Mutex::new(Vec::new()));
    for name in ["objects", "workflow", "files"] {
        facade.add_listener(TreeView {
            name,
            log: Arc::clone(&log),
        });
    }

    facade.issue_command("x = 1", Callbacks::none()).await;

    assert_eq!(*log.lock().unwrap(), vec!["objects", "workflow", "files"]);
}

#[tokio::test]
async fn test_closed_widget_does_not_block_others() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/model");
        then.status(200);
    });

    let (facade, _) = facade_for(&server, &[]);
    let log = Arc::new(Mutex::new(Vec::new()));

    let closed = Arc::new(TreeView {
        name: "closed",
        log: Arc::clone(&log),
    });
    facade.add_weak_listener(&closed);
    facade.on_change(|| Err(anyhow::anyhow!("editor lost its buffer")));
    facade.add_listener(TreeView {
        name: "open",
        log: Arc::clone(&log),
    });
    drop(closed);

    facade.new_model(Callbacks::none()).await;

    assert_eq!(*log.lock().unwrap(), vec!["open"]);
}

#[tokio::test]
async fn test_clones_share_listeners() {
    let server = MockServer::start();
    let (facade, _) = facade_for(&server, &[]);
    let other = facade.clone();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    other.on_change(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    let summary = facade.notify_listeners();

    assert_eq!(summary.delivered, 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(facade.listeners().len(), 1);
}

#[tokio::test]
async fn test_concurrent_operations_each_notify() {
    let server = MockServer::start();
    let command = server.mock(|when, then| {
        when.method(POST).path("/command");
        then.status(200);
    });

    let (facade, _) = facade_for(&server, &[]);
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    facade.on_change(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    let mut handles = Vec::new();
    for i in 0..5 {
        let facade = facade.clone();
        handles.push(tokio::spawn(async move {
            facade
                .issue_command(&format!("x{} = {}", i, i), Callbacks::none())
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    command.assert_hits(5);
    assert_eq!(hits.load(Ordering::SeqCst), 5);
}
