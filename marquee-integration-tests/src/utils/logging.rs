//! Collects the JSON log lines Marquee writes during a test.

use serde::Deserialize;
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr};
use std::{
    collections::HashMap,
    io::Write,
    sync::{Arc, Mutex},
};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Collects the events Marquee logs while a test runs.
///
/// [`marquee_test`](crate::marquee_test) installs the watcher behind a JSON
/// formatting layer. Output is parsed lazily, one complete line at a time, each
/// time the watcher is queried.
#[derive(Default)]
pub struct LogWatcher {
    /// Bytes written by the subscriber that have not been parsed yet. A
    /// trailing partial line stays here until the rest of it arrives.
    pending: Arc<Mutex<Vec<u8>>>,

    /// Every complete line seen so far, in the order it was written.
    events: Vec<LogEvent>,
}

impl LogWatcher {
    /// The events logged so far.
    pub fn events(&mut self) -> &[LogEvent] {
        self.parse_pending();
        &self.events
    }

    /// Test if any logged event matches `predicate`.
    #[must_use = "LogWatcher::has does not make assertions alone, you probably want to wrap it in assert!()"]
    pub fn has<F>(&mut self, predicate: F) -> bool
    where
        F: FnMut(&LogEvent) -> bool,
    {
        self.events().iter().any(predicate)
    }

    /// Test if an event with the `type` field `event_type` was logged, such
    /// as `web.request.success`.
    #[must_use]
    pub fn has_type(&mut self, event_type: &str) -> bool {
        self.has(|event| event.event_type() == Some(event_type))
    }

    /// The first event logged with the `type` field `event_type`.
    pub fn first_of_type(&mut self, event_type: &str) -> Option<&LogEvent> {
        self.events()
            .iter()
            .find(|event| event.event_type() == Some(event_type))
    }

    /// Test if `needle` appears anywhere in the raw log output, including
    /// span fields. Use this to check secrets are never written.
    #[must_use]
    pub fn mentions(&mut self, needle: &str) -> bool {
        self.has(|event| event.line.contains(needle))
    }

    /// Move complete lines from `pending` into `events`.
    fn parse_pending(&mut self) {
        let complete = {
            let mut pending = self.pending.lock().expect("log buffer mutex was poisoned");
            match pending.iter().rposition(|byte| *byte == b'\n') {
                Some(end) => pending.drain(..=end).collect::<Vec<u8>>(),
                None => return,
            }
        };

        let text = String::from_utf8(complete).expect("log output was not UTF-8");
        for line in text.lines().filter(|line| !line.trim().is_empty()) {
            let mut event: LogEvent = serde_json::from_str(line)
                .unwrap_or_else(|error| panic!("Unreadable log line {:?}: {}", line, error));
            event.line = line.to_string();
            self.events.push(event);
        }
    }
}

impl<'a> MakeWriter<'a> for LogWatcher {
    type Writer = LogLineWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogLineWriter {
            pending: self.pending.clone(),
        }
    }
}

/// The half of a [`LogWatcher`] handed to the subscriber. It appends to the
/// watcher's pending buffer.
#[derive(Clone)]
pub struct LogLineWriter {
    /// Shared with the owning watcher.
    pending: Arc<Mutex<Vec<u8>>>,
}

impl Write for LogLineWriter {
    fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
        self.pending
            .lock()
            .map_err(|error| std::io::Error::new(std::io::ErrorKind::Other, error.to_string()))?
            .extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// One line of `tracing_subscriber`'s JSON output.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct LogEvent {
    /// The fields of the event. Marquee events carry `message`, and almost
    /// always `type`.
    pub fields: HashMap<String, Value>,

    #[allow(missing_docs)]
    #[serde_as(as = "DisplayFromStr")]
    pub level: Level,

    /// The module that logged the event, such as `marquee_web::logging`.
    pub target: String,

    /// The line exactly as it was written.
    #[serde(skip)]
    pub line: String,
}

impl LogEvent {
    /// The kind of event, from the `type` field.
    pub fn event_type(&self) -> Option<&str> {
        self.fields.get("type").and_then(Value::as_str)
    }

    /// Whether the event is marked `sensitive`, meaning it carries user input
    /// such as search keywords or addresses.
    pub fn is_sensitive(&self) -> bool {
        self.fields
            .get("sensitive")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Test if the field `name` is a string containing `pat`.
    pub fn field_contains(&self, name: &str, pat: &str) -> bool {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .map_or(false, |value| value.contains(pat))
    }
}
