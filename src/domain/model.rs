use reqwest::Method;
use serde::{Deserialize, Serialize};

/// How the body of a successful response is handed to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseEncoding {
    Json,
    Text,
}

/// One exchange with the modeling server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: Method,
    /// Path relative to the server base URL.
    pub path: String,
    /// Sent as query string for GET, form body otherwise.
    pub payload: Vec<(String, String)>,
    pub encoding: ResponseEncoding,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>, encoding: ResponseEncoding) -> Self {
        Self {
            method,
            path: path.into(),
            payload: Vec::new(),
            encoding,
        }
    }

    pub fn get_json(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, ResponseEncoding::Json)
    }

    pub fn get_text(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, ResponseEncoding::Text)
    }

    pub fn post_text(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path, ResponseEncoding::Text)
    }

    pub fn with_field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.payload.push((key.to_string(), value.into()));
        self
    }
}

/// Decoded body of a successful exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

impl ResponseBody {
    pub fn into_json(self) -> serde_json::Value {
        match self {
            ResponseBody::Json(value) => value,
            ResponseBody::Text(text) => serde_json::Value::String(text),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ResponseBody::Json(value) => value.to_string(),
            ResponseBody::Text(text) => text,
        }
    }
}

/// What a facade call did with its request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A required success continuation was missing; nothing was sent.
    Skipped,
    /// A client-side driver handler took over; nothing was sent.
    HandledLocally,
    Completed,
    Failed,
}

impl Dispatch {
    pub fn was_sent(self) -> bool {
        matches!(self, Dispatch::Completed | Dispatch::Failed)
    }
}

/// Source/destination pair for `set_connections`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection(pub String, pub String);

impl Connection {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self(source.into(), destination.into())
    }
}

/// Counts from one round of listener notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifySummary {
    pub delivered: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_spec_builder() {
        let spec = RequestSpec::post_text("command").with_field("command", "x = 1");
        assert_eq!(spec.method, Method::POST);
        assert_eq!(spec.path, "command");
        assert_eq!(spec.payload, vec![("command".to_string(), "x = 1".to_string())]);
        assert_eq!(spec.encoding, ResponseEncoding::Text);
    }

    #[test]
    fn test_connection_serializes_as_pair() {
        let conns = vec![Connection::new("a.out", "b.in")];
        assert_eq!(serde_json::to_string(&conns).unwrap(), r#"[["a.out","b.in"]]"#);
    }

    #[test]
    fn test_dispatch_was_sent() {
        assert!(Dispatch::Completed.was_sent());
        assert!(Dispatch::Failed.was_sent());
        assert!(!Dispatch::Skipped.was_sent());
        assert!(!Dispatch::HandledLocally.was_sent());
    }
}
