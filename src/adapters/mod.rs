// Adapters layer: concrete implementations for external systems (http, user interaction).

pub mod http;
pub mod interaction;

pub use http::HttpTransport;
pub use interaction::{ScriptedInteraction, TerminalInteraction, WindowRequest};
