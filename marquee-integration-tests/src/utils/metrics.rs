//! Captures the statsd lines Marquee sends during a test.

use cadence::{SpyMetricSink, StatsdClient};
use crossbeam_channel::Receiver;
use statsd_parser::{Message, Metric};

/// Records what a [`StatsdClient`] reports, so tests can check it.
pub struct MetricsWatcher {
    /// Raw statsd lines from the spy sink.
    rx: Receiver<Vec<u8>>,

    /// Lines parsed so far, in the order they were sent.
    seen: Vec<Message>,
}

impl MetricsWatcher {
    /// Make a watcher and a client without a prefix that reports to it.
    pub fn new_with_client() -> (Self, StatsdClient) {
        let (rx, sink) = SpyMetricSink::new();
        let watcher = Self { rx, seen: vec![] };
        (watcher, StatsdClient::from_sink("", sink))
    }

    /// Every metric received so far.
    pub fn messages(&mut self) -> &[Message] {
        self.seen.extend(self.rx.try_iter().map(|bytes| {
            let line = String::from_utf8(bytes).expect("metric line was not UTF-8");
            statsd_parser::parse(line).expect("metric line could not be parsed")
        }));
        &self.seen
    }

    /// Test if any metric received matches `predicate`.
    pub fn has<F>(&mut self, predicate: F) -> bool
    where
        F: FnMut(&Message) -> bool,
    {
        self.messages().iter().any(predicate)
    }

    /// Test if the counter `name` was incremented by one, as the
    /// `upstream.<operation>.success` and `.error` counters are.
    pub fn has_incr(&mut self, name: &str) -> bool {
        self.has(|msg| {
            msg.name == name && matches!(&msg.metric, Metric::Counter(counter) if counter.value == 1.0)
        })
    }

    /// Test if the histogram `name` recorded `value`, such as the number of
    /// events a search returned in `search.results`.
    pub fn has_histogram(&mut self, name: &str, value: f64) -> bool {
        self.has(|msg| {
            msg.name == name
                && matches!(&msg.metric, Metric::Histogram(histogram) if (histogram.value - value).abs() < 1e-4)
        })
    }

    /// Test if the timer `name` was recorded with every tag in `tags`.
    ///
    /// `request.duration` is tagged with the matched route pattern as `path`
    /// and the response `status`.
    pub fn has_timer(&mut self, name: &str, tags: &[(&str, &str)]) -> bool {
        self.has(|msg| {
            msg.name == name && matches!(msg.metric, Metric::Timing(_)) && has_tags(msg, tags)
        })
    }
}

/// Test if `msg` carries each `(key, value)` tag.
fn has_tags(msg: &Message, tags: &[(&str, &str)]) -> bool {
    tags.iter().all(|(key, value)| {
        msg.tags
            .as_ref()
            .and_then(|present| present.get(*key))
            .map_or(false, |found| found.as_str() == *value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence::prelude::*;

    #[test]
    fn counters_and_histograms() {
        let (mut watcher, client) = MetricsWatcher::new_with_client();
        client.incr("upstream.search.success").unwrap();
        client.histogram("search.results", 3_u64).unwrap();

        assert!(watcher.has_incr("upstream.search.success"));
        assert!(!watcher.has_incr("upstream.search.error"));
        assert!(watcher.has_histogram("search.results", 3.0));
        assert!(!watcher.has_histogram("search.results", 4.0));
    }

    #[test]
    fn timers_match_on_tags() {
        let (mut watcher, client) = MetricsWatcher::new_with_client();
        client
            .time_with_tags("request.duration", 12_u64)
            .with_tag("path", "/search")
            .with_tag("status", "200")
            .send();

        assert!(watcher.has_timer("request.duration", &[]));
        assert!(watcher.has_timer("request.duration", &[("path", "/search"), ("status", "200")]));
        assert!(!watcher.has_timer("request.duration", &[("status", "502")]));
        assert!(!watcher.has_timer("search.results", &[]));
    }
}
