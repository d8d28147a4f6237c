// Evolution Client: Event handler table
// event name → one callback; a later registration replaces the earlier one.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};

pub type EventHandler = Arc<dyn Fn(Value) + Send + Sync>;

/// What happened to one inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Handled(String),
    /// No `event` field, or nobody registered for it.
    Ignored,
    Invalid(String),
}

#[derive(Default)]
pub struct HandlerTable {
    handlers: RwLock<HashMap<String, EventHandler>>,
}

impl HandlerTable {
    pub fn insert(&self, event: impl Into<String>, handler: EventHandler) {
        self.handlers.write().insert(event.into(), handler);
    }

    pub fn get(&self, event: &str) -> Option<EventHandler> {
        self.handlers.read().get(event).cloned()
    }

    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode a text frame and run the matching handler with its `data`
    /// (or `{}`). The lock is released before the handler runs, so a
    /// handler may register other handlers.
    pub fn dispatch(&self, text: &str) -> Dispatch {
        let frame: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => return Dispatch::Invalid(e.to_string()),
        };
        let Some(event) = frame.get("event").and_then(Value::as_str) else {
            return Dispatch::Ignored;
        };
        let Some(handler) = self.get(event) else {
            return Dispatch::Ignored;
        };
        let data = match frame.get("data") {
            Some(Value::Null) | None => Value::Object(Map::new()),
            Some(data) => data.clone(),
        };
        handler(data);
        Dispatch::Handled(event.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;

    fn recorder(table: &HandlerTable, event: &str) -> Arc<Mutex<Vec<Value>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        table.insert(event, Arc::new(move |data| sink.lock().push(data)));
        seen
    }

    #[test]
    fn registered_event_runs_once_with_data() {
        let table = HandlerTable::default();
        let seen = recorder(&table, "message");
        let outcome = table.dispatch(r#"{"event":"message","data":{"x":1}}"#);
        assert_eq!(outcome, Dispatch::Handled("message".into()));
        assert_eq!(*seen.lock(), vec![json!({"x": 1})]);
    }

    #[test]
    fn missing_data_becomes_empty_object() {
        let table = HandlerTable::default();
        let seen = recorder(&table, "ping");
        table.dispatch(r#"{"event":"ping"}"#);
        assert_eq!(*seen.lock(), vec![json!({})]);
    }

    #[test]
    fn unregistered_and_malformed_frames_are_no_ops() {
        let table = HandlerTable::default();
        let seen = recorder(&table, "message");
        assert_eq!(table.dispatch(r#"{"event":"other","data":{}}"#), Dispatch::Ignored);
        assert_eq!(table.dispatch(r#"{"data":{}}"#), Dispatch::Ignored);
        assert_eq!(table.dispatch(r#"{"event":7}"#), Dispatch::Ignored);
        assert!(matches!(table.dispatch("not json"), Dispatch::Invalid(_)));
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn last_registration_wins() {
        let table = HandlerTable::default();
        let first = recorder(&table, "message");
        let second = recorder(&table, "message");
        table.dispatch(r#"{"event":"message","data":1}"#);
        assert!(first.lock().is_empty());
        assert_eq!(*second.lock(), vec![json!(1)]);
        assert_eq!(table.len(), 1);
    }
}
