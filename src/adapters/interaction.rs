use crate::domain::ports::Interaction;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Prompts on stdin and reports on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalInteraction;

#[async_trait]
impl Interaction for TerminalInteraction {
    async fn prompt_for_value(&self, message: &str) -> Option<String> {
        eprint!("{}: ", message);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        match lines.next_line().await {
            Ok(Some(line)) if !line.trim().is_empty() => Some(line.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Failed to read answer from stdin: {}", e);
                None
            }
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("⚠️  {}", message);
    }

    fn open_popup(&self, target: &str, title: &str, _height: u32, _width: u32) {
        eprintln!("[{}] open '{}' in the browser to continue", title, target);
    }

    fn show_html(&self, html: &str, title: &str, _height: u32, _width: u32) {
        eprintln!("===== {} =====\n{}", title, html);
    }
}

/// A window the facade asked to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRequest {
    pub target: String,
    pub title: String,
    pub height: u32,
    pub width: u32,
}

/// Answers prompts from a preset queue and records everything shown.
#[derive(Debug, Default)]
pub struct ScriptedInteraction {
    answers: Mutex<VecDeque<String>>,
    alerts: Mutex<Vec<String>>,
    windows: Mutex<Vec<WindowRequest>>,
}

impl ScriptedInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn windows(&self) -> Vec<WindowRequest> {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record_window(&self, target: &str, title: &str, height: u32, width: u32) {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(WindowRequest {
                target: target.to_string(),
                title: title.to_string(),
                height,
                width,
            });
    }
}

#[async_trait]
impl Interaction for ScriptedInteraction {
    async fn prompt_for_value(&self, message: &str) -> Option<String> {
        let answer = self
            .answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        tracing::debug!("Prompt '{}' answered with {:?}", message, answer);
        answer
    }

    fn alert(&self, message: &str) {
        tracing::warn!("Alert: {}", message);
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }

    fn open_popup(&self, target: &str, title: &str, height: u32, width: u32) {
        self.record_window(target, title, height, width);
    }

    fn show_html(&self, html: &str, title: &str, height: u32, width: u32) {
        self.record_window(html, title, height, width);
    }
}
